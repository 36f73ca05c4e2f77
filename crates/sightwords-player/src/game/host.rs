//! UI host seam: widget primitives and modal notifications
//!
//! The game creates, places and destroys widgets through `UiHost` and never
//! looks inside the host's widget store. Actions are plain data attached to
//! each widget when it is created.

use crate::assets::ImageHandle;

/// Opaque handle of a widget owned by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(pub u64);

/// What happens when a widget is clicked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    /// Answer with this word
    Select(String),
    /// Say the target word again
    Replay,
}

/// Where a widget goes on screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Centered on a fraction of the window size (0..1 on each axis)
    Relative { x: f32, y: f32 },
    /// Cell of the fallback grid; `span` columns wide
    Grid { row: u32, column: u32, span: u32 },
}

impl Placement {
    pub const CENTER: Placement = Placement::Relative { x: 0.5, y: 0.5 };
}

#[derive(Debug, Clone)]
pub enum WidgetKind {
    Background {
        image: ImageHandle,
    },
    WordButton {
        word: String,
        image: Option<ImageHandle>,
        on_select: UiAction,
    },
    ReplayButton {
        on_select: UiAction,
    },
}

#[derive(Debug, Clone)]
pub struct Widget {
    pub kind: WidgetKind,
    pub placement: Placement,
}

impl Widget {
    pub fn action(&self) -> Option<&UiAction> {
        match &self.kind {
            WidgetKind::Background { .. } => None,
            WidgetKind::WordButton { on_select, .. } => Some(on_select),
            WidgetKind::ReplayButton { on_select } => Some(on_select),
        }
    }

    pub fn is_replay(&self) -> bool {
        matches!(self.kind, WidgetKind::ReplayButton { .. })
    }
}

/// Widget and notification primitives offered by the windowing layer
pub trait UiHost {
    fn create_widget(&mut self, widget: Widget) -> WidgetId;
    /// Destroying an unknown id is a no-op
    fn destroy_widget(&mut self, id: WidgetId);
    /// Ids of all live widgets, in creation order
    fn widget_ids(&self) -> Vec<WidgetId>;
    /// Replace the picture of a background or word widget.
    /// Returns false when the id is unknown.
    fn set_widget_image(&mut self, id: WidgetId, image: ImageHandle) -> bool;
    fn set_title(&mut self, title: &str);
    fn notify_info(&mut self, title: &str, message: &str);
    fn notify_error(&mut self, title: &str, message: &str);
}
