//! Round layout: which words are shown, and where
//!
//! Every round the previous option widgets are torn down and a fresh set is
//! created. The background widget survives; the renderer remembers its id
//! rather than asking the host what a widget is.

use rand::seq::{IteratorRandom, SliceRandom};
use rand::Rng;

use crate::assets::ImageHandle;

use super::host::{Placement, UiAction, UiHost, Widget, WidgetId, WidgetKind};
use super::template::{GameTemplate, LoadedTemplate};

/// Options shown when the template defines no positions
pub const GRID_SLOTS: usize = 4;
pub const GRID_COLUMNS: u32 = 2;

/// Number of options per round for this template
pub fn slot_count(template: &GameTemplate) -> usize {
    if template.word_positions.is_empty() {
        GRID_SLOTS
    } else {
        template.word_positions.len()
    }
}

/// Pick the words for one round: the target plus up to `slots - 1` other
/// words from the pool, shuffled. Duplicates in the pool are ignored.
pub fn arrange_options<R: Rng + ?Sized>(
    pool: &[String],
    target: &str,
    slots: usize,
    rng: &mut R,
) -> Vec<String> {
    let mut candidates: Vec<&String> = Vec::with_capacity(pool.len());
    for word in pool {
        if word != target && !candidates.contains(&word) {
            candidates.push(word);
        }
    }

    let mut words: Vec<String> = candidates
        .into_iter()
        .choose_multiple(rng, slots.saturating_sub(1))
        .into_iter()
        .cloned()
        .collect();
    words.push(target.to_string());
    words.shuffle(rng);
    words
}

/// One clickable word of the current round
#[derive(Debug, Clone)]
pub struct OptionWidget {
    pub id: WidgetId,
    pub word: String,
    pub image: Option<ImageHandle>,
    pub on_select: UiAction,
}

fn option_placement(template: &GameTemplate, index: usize) -> Placement {
    match template.word_positions.get(index) {
        Some(pos) => {
            let p = pos.point().clamped();
            Placement::Relative { x: p.x, y: p.y }
        }
        None => {
            let index = index as u32;
            Placement::Grid {
                row: index / GRID_COLUMNS,
                column: index % GRID_COLUMNS,
                span: 1,
            }
        }
    }
}

fn replay_placement(template: &GameTemplate, option_count: usize) -> Placement {
    if let Some(pos) = &template.replay_button {
        let p = pos.clamped();
        return Placement::Relative { x: p.x, y: p.y };
    }
    let grid_rows = (option_count.max(GRID_SLOTS) as u32).div_ceil(GRID_COLUMNS);
    Placement::Grid {
        row: grid_rows,
        column: 0,
        span: GRID_COLUMNS,
    }
}

#[derive(Default)]
pub struct LayoutRenderer {
    background: Option<WidgetId>,
    options: Vec<OptionWidget>,
    replay: Option<WidgetId>,
}

impl LayoutRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn background(&self) -> Option<WidgetId> {
        self.background
    }

    pub fn options(&self) -> &[OptionWidget] {
        &self.options
    }

    pub fn replay(&self) -> Option<WidgetId> {
        self.replay
    }

    /// Show `image` as the background, creating the widget on first use
    pub fn set_background(&mut self, host: &mut dyn UiHost, image: ImageHandle) -> WidgetId {
        if let Some(id) = self.background {
            if host.set_widget_image(id, image.clone()) {
                return id;
            }
            tracing::warn!("Background widget {:?} vanished, recreating", id);
        }
        let id = host.create_widget(Widget {
            kind: WidgetKind::Background { image },
            placement: Placement::CENTER,
        });
        self.background = Some(id);
        id
    }

    /// Destroy every widget except the tracked background
    pub fn clear_round(&mut self, host: &mut dyn UiHost) {
        for id in host.widget_ids() {
            if Some(id) != self.background {
                host.destroy_widget(id);
            }
        }
        self.options.clear();
        self.replay = None;
    }

    /// Rebuild the round: one widget per word, then the replay button
    pub fn render(
        &mut self,
        host: &mut dyn UiHost,
        words: &[String],
        loaded: &LoadedTemplate,
    ) -> &[OptionWidget] {
        self.clear_round(host);

        for (i, word) in words.iter().enumerate() {
            let image = loaded.image_for(word);
            let on_select = UiAction::Select(word.clone());
            let id = host.create_widget(Widget {
                kind: WidgetKind::WordButton {
                    word: word.clone(),
                    image: image.clone(),
                    on_select: on_select.clone(),
                },
                placement: option_placement(&loaded.template, i),
            });
            self.options.push(OptionWidget {
                id,
                word: word.clone(),
                image,
                on_select,
            });
        }

        self.replay = Some(host.create_widget(Widget {
            kind: WidgetKind::ReplayButton {
                on_select: UiAction::Replay,
            },
            placement: replay_placement(&loaded.template, words.len()),
        }));

        tracing::debug!("Rendered {} options", self.options.len());
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::testing::MemoryImages;
    use crate::assets::DecodedBitmap;
    use crate::engine::stage::Stage;
    use crate::game::template::TemplateSource;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    fn loaded(json: &str, images: &[&str]) -> LoadedTemplate {
        LoadedTemplate::from_template(
            GameTemplate::parse(json).unwrap(),
            TemplateSource::BuiltIn,
            &MemoryImages::with(images),
            (50, 50),
        )
    }

    #[test]
    fn options_contain_target_once() {
        let pool = words(&["the", "and", "a", "to", "said", "in"]);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let opts = arrange_options(&pool, "said", 4, &mut rng);
            assert_eq!(opts.len(), 4);
            assert_eq!(opts.iter().filter(|w| *w == "said").count(), 1);
            let unique: HashSet<_> = opts.iter().collect();
            assert_eq!(unique.len(), opts.len());
        }
    }

    #[test]
    fn small_pool_limits_options() {
        let pool = words(&["cat", "dog"]);
        let mut rng = StdRng::seed_from_u64(1);
        let opts = arrange_options(&pool, "dog", 5, &mut rng);
        assert_eq!(opts.len(), 2);
    }

    #[test]
    fn single_word_pool() {
        let pool = words(&["cat"]);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(arrange_options(&pool, "cat", 4, &mut rng), words(&["cat"]));
    }

    #[test]
    fn target_position_varies() {
        let pool = words(&["the", "and", "a", "to"]);
        let mut rng = StdRng::seed_from_u64(42);
        let seen: HashSet<usize> = (0..40)
            .map(|_| {
                let opts = arrange_options(&pool, "the", 4, &mut rng);
                opts.iter().position(|w| w == "the").unwrap()
            })
            .collect();
        assert!(seen.len() > 1);
    }

    #[test]
    fn slots_follow_positions() {
        let t = GameTemplate::parse(
            r#"{ "word_positions": [ {"x":0.1,"y":0.1}, {"x":0.5,"y":0.1}, {"x":0.9,"y":0.1} ] }"#,
        )
        .unwrap();
        assert_eq!(slot_count(&t), 3);
        assert_eq!(slot_count(&GameTemplate::builtin()), GRID_SLOTS);
    }

    #[test]
    fn render_creates_options_and_one_replay() {
        let loaded = loaded(r#"{ "images": { "cat": "cat.png", "dog": "dog.png" } }"#, &["cat.png"]);
        let mut stage = Stage::new(800, 600);
        let mut layout = LayoutRenderer::new();

        for _ in 0..3 {
            layout.render(&mut stage, &words(&["dog", "cat"]), &loaded);
            assert_eq!(stage.widget_ids().len(), 3);
            assert_eq!(stage.widgets().filter(|w| w.is_replay()).count(), 1);
        }

        let opts = layout.options();
        assert_eq!(opts[0].on_select, UiAction::Select("dog".into()));
        assert!(opts[0].image.is_none());
        assert!(opts[1].image.is_some());
    }

    #[test]
    fn grid_placement_without_positions() {
        let loaded = loaded("{}", &[]);
        let mut stage = Stage::new(800, 600);
        let mut layout = LayoutRenderer::new();
        layout.render(&mut stage, &words(&["a", "b", "c", "d"]), &loaded);

        let placements: Vec<Placement> = stage.widgets().map(|w| w.placement).collect();
        assert_eq!(placements[3], Placement::Grid { row: 1, column: 1, span: 1 });
        assert_eq!(placements[4], Placement::Grid { row: 2, column: 0, span: 2 });
    }

    #[test]
    fn template_positions_are_clamped() {
        let loaded = loaded(
            r#"{ "word_positions": [ {"x": 1.4, "y": 0.5} ], "replay_button": {"x": 0.5, "y": 0.95} }"#,
            &[],
        );
        let mut stage = Stage::new(800, 600);
        let mut layout = LayoutRenderer::new();
        layout.render(&mut stage, &words(&["the"]), &loaded);

        let placements: Vec<Placement> = stage.widgets().map(|w| w.placement).collect();
        assert_eq!(placements[0], Placement::Relative { x: 1.0, y: 0.5 });
        assert_eq!(placements[1], Placement::Relative { x: 0.5, y: 0.95 });
    }

    #[test]
    fn background_survives_rounds() {
        let loaded = loaded("{}", &[]);
        let mut stage = Stage::new(800, 600);
        let mut layout = LayoutRenderer::new();
        let bg = layout.set_background(&mut stage, Arc::new(DecodedBitmap::filled(4, 4, [1, 2, 3, 255])));

        layout.render(&mut stage, &words(&["a", "b"]), &loaded);
        layout.render(&mut stage, &words(&["c", "d"]), &loaded);

        assert_eq!(layout.background(), Some(bg));
        assert_eq!(stage.widget_ids()[0], bg);
        assert_eq!(stage.widget_ids().len(), 4);
    }

    #[test]
    fn set_background_reuses_widget() {
        let mut stage = Stage::new(800, 600);
        let mut layout = LayoutRenderer::new();
        let first = layout.set_background(&mut stage, Arc::new(DecodedBitmap::filled(2, 2, [0, 0, 0, 255])));
        let second = layout.set_background(&mut stage, Arc::new(DecodedBitmap::filled(3, 3, [9, 9, 9, 255])));
        assert_eq!(first, second);
        assert_eq!(stage.widget_ids(), vec![first]);
    }
}
