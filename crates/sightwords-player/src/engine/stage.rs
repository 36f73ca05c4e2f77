//! Stage, the engine's widget store, implementing `UiHost`
//!
//! Widgets are kept in creation order and laid out on demand from their
//! `Placement`. Notifications queue up as modal notices; while one is shown
//! the widgets underneath do not react to clicks.

use std::collections::BTreeMap;

use crate::assets::ImageHandle;
use crate::game::host::{Placement, UiAction, UiHost, Widget, WidgetId, WidgetKind};
use crate::game::layout::GRID_COLUMNS;

use super::{blit_bitmap, font};

const LABEL_SCALE: i32 = 2;
const BUTTON_PAD_X: i32 = 14;
const BUTTON_PAD_Y: i32 = 8;
const BUTTON_MIN_W: i32 = 96;
const IMAGE_GAP: i32 = 6;

const GRID_CELL_W: i32 = 220;
const GRID_CELL_H: i32 = 120;
const GRID_TOP: i32 = 150;

const NOTICE_W: i32 = 460;
const NOTICE_H: i32 = 170;

const COLOR_BUTTON: u32 = 0xFFE8E8F0;
const COLOR_BUTTON_HOVER: u32 = 0xFFFFF4B0;
const COLOR_BUTTON_EDGE: u32 = 0xFF404060;
const COLOR_LABEL: u32 = 0xFF101020;
const COLOR_REPLAY: u32 = 0xFFB8D8FF;

pub const REPLAY_LABEL: &str = "Replay";

/// Axis-aligned pixel rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    fn centered(cx: i32, cy: i32, w: i32, h: i32) -> Self {
        Self {
            x: cx - w / 2,
            y: cy - h / 2,
            w,
            h,
        }
    }

    pub fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x && py >= self.y && px < self.x + self.w && py < self.y + self.h
    }
}

/// A queued modal message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub is_error: bool,
}

pub struct Stage {
    width: i32,
    height: i32,
    next_id: u64,
    widgets: BTreeMap<WidgetId, Widget>,
    title: String,
    notices: Vec<Notice>,
    hover: Option<WidgetId>,
}

impl Stage {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as i32,
            height: height as i32,
            next_id: 1,
            widgets: BTreeMap::new(),
            title: String::new(),
            notices: Vec::new(),
            hover: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Live widgets in creation order
    pub fn widgets(&self) -> impl Iterator<Item = &Widget> {
        self.widgets.values()
    }

    pub fn widget(&self, id: WidgetId) -> Option<&Widget> {
        self.widgets.get(&id)
    }

    pub fn widget_image(&self, id: WidgetId) -> Option<ImageHandle> {
        match &self.widgets.get(&id)?.kind {
            WidgetKind::Background { image } => Some(image.clone()),
            WidgetKind::WordButton { image, .. } => image.clone(),
            WidgetKind::ReplayButton { .. } => None,
        }
    }

    /// Pending notices, oldest first
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn current_notice(&self) -> Option<&Notice> {
        self.notices.first()
    }

    pub fn has_notice(&self) -> bool {
        !self.notices.is_empty()
    }

    /// Dismiss the notice on screen
    pub fn pop_notice(&mut self) -> Option<Notice> {
        if self.notices.is_empty() {
            None
        } else {
            Some(self.notices.remove(0))
        }
    }

    /// Screen rectangle a widget occupies
    pub fn widget_rect(&self, widget: &Widget) -> Rect {
        let (w, h) = match &widget.kind {
            WidgetKind::Background { image } => (image.width as i32, image.height as i32),
            WidgetKind::WordButton { word, image, .. } => {
                let (bw, bh) = button_size(word);
                match image {
                    Some(img) => (
                        bw.max(img.width as i32),
                        img.height as i32 + IMAGE_GAP + bh,
                    ),
                    None => (bw, bh),
                }
            }
            WidgetKind::ReplayButton { .. } => button_size(REPLAY_LABEL),
        };
        let (cx, cy) = self.anchor(widget.placement);
        Rect::centered(cx, cy, w, h)
    }

    fn anchor(&self, placement: Placement) -> (i32, i32) {
        match placement {
            Placement::Relative { x, y } => (
                (x * self.width as f32).round() as i32,
                (y * self.height as f32).round() as i32,
            ),
            Placement::Grid { row, column, span } => {
                let left = (self.width - GRID_COLUMNS as i32 * GRID_CELL_W) / 2;
                let cx = left + column as i32 * GRID_CELL_W + span.max(1) as i32 * GRID_CELL_W / 2;
                let cy = GRID_TOP + row as i32 * GRID_CELL_H + GRID_CELL_H / 2;
                (cx, cy)
            }
        }
    }

    /// Topmost clickable widget under the point
    pub fn widget_at(&self, px: i32, py: i32) -> Option<WidgetId> {
        self.widgets
            .iter()
            .rev()
            .find(|(_, w)| w.action().is_some() && self.widget_rect(w).contains(px, py))
            .map(|(id, _)| *id)
    }

    /// Action of the widget under the point. Nothing while a notice is up.
    pub fn action_at(&self, px: i32, py: i32) -> Option<UiAction> {
        if self.has_notice() {
            return None;
        }
        let id = self.widget_at(px, py)?;
        self.widgets.get(&id)?.action().cloned()
    }

    pub fn set_hover(&mut self, px: i32, py: i32) {
        self.hover = if self.has_notice() {
            None
        } else {
            self.widget_at(px, py)
        };
    }

    /// Paint backgrounds, then buttons, then the current notice
    pub fn draw(&self, fb: &mut [u32]) {
        let stride = self.width as usize;
        let (backgrounds, controls): (Vec<_>, Vec<_>) = self
            .widgets
            .iter()
            .partition(|(_, w)| matches!(w.kind, WidgetKind::Background { .. }));

        for (id, widget) in backgrounds.into_iter().chain(controls) {
            let rect = self.widget_rect(widget);
            let hovered = self.hover == Some(*id);
            match &widget.kind {
                WidgetKind::Background { image } => {
                    blit_bitmap(fb, stride, image, rect.x, rect.y);
                }
                WidgetKind::WordButton { word, image, .. } => {
                    let (bw, bh) = button_size(word);
                    let mut by = rect.y;
                    if let Some(img) = image {
                        let ix = rect.x + (rect.w - img.width as i32) / 2;
                        blit_bitmap(fb, stride, img, ix, rect.y);
                        by += img.height as i32 + IMAGE_GAP;
                    }
                    let bx = rect.x + (rect.w - bw) / 2;
                    let fill = if hovered { COLOR_BUTTON_HOVER } else { COLOR_BUTTON };
                    draw_button(fb, stride, Rect { x: bx, y: by, w: bw, h: bh }, word, fill);
                }
                WidgetKind::ReplayButton { .. } => {
                    let fill = if hovered { COLOR_BUTTON_HOVER } else { COLOR_REPLAY };
                    draw_button(fb, stride, rect, REPLAY_LABEL, fill);
                }
            }
        }

        if let Some(notice) = self.current_notice() {
            self.draw_notice(fb, notice);
        }
    }

    fn draw_notice(&self, fb: &mut [u32], notice: &Notice) {
        let stride = self.width as usize;
        for pixel in fb.iter_mut() {
            let r = (*pixel >> 16) & 0xFF;
            let g = (*pixel >> 8) & 0xFF;
            let b = *pixel & 0xFF;
            *pixel = 0xFF000000 | ((r / 3) << 16) | ((g / 3) << 8) | (b / 3);
        }

        let bx = (self.width - NOTICE_W) / 2;
        let by = (self.height - NOTICE_H) / 2;
        let edge = if notice.is_error { 0xFFCC4444 } else { 0xFF44AA66 };
        font::draw_rect(fb, stride, bx, by, NOTICE_W, NOTICE_H, 0xFF1A1A2E);
        font::draw_rect_outline(fb, stride, bx, by, NOTICE_W, NOTICE_H, edge);
        font::draw_rect_outline(fb, stride, bx + 2, by + 2, NOTICE_W - 4, NOTICE_H - 4, edge);

        let cx = bx + NOTICE_W / 2;
        font::draw_text_shadow(fb, stride, cx - font::text_width(&notice.title, 2) / 2, by + 16, &notice.title, 0xFFFFFF00, 2);

        let lines = font::wrap_text(&notice.message, NOTICE_W - 40, 1);
        for (i, line) in lines.iter().enumerate() {
            font::draw_text_centered(fb, stride, cx, by + 56 + i as i32 * 14, line, 0xFFFFFFFF, 1);
        }

        font::draw_text_centered(fb, stride, cx, by + NOTICE_H - 24, "Click or press Enter", 0xFF8888AA, 1);
    }
}

fn button_size(label: &str) -> (i32, i32) {
    let w = (font::text_width(label, LABEL_SCALE) + 2 * BUTTON_PAD_X).max(BUTTON_MIN_W);
    let h = font::text_height(LABEL_SCALE) + 2 * BUTTON_PAD_Y;
    (w, h)
}

fn draw_button(fb: &mut [u32], stride: usize, rect: Rect, label: &str, fill: u32) {
    font::draw_rect(fb, stride, rect.x, rect.y, rect.w, rect.h, fill);
    font::draw_rect_outline(fb, stride, rect.x, rect.y, rect.w, rect.h, COLOR_BUTTON_EDGE);
    font::draw_text_centered(
        fb,
        stride,
        rect.x + rect.w / 2,
        rect.y + BUTTON_PAD_Y,
        label,
        COLOR_LABEL,
        LABEL_SCALE,
    );
}

impl UiHost for Stage {
    fn create_widget(&mut self, widget: Widget) -> WidgetId {
        let id = WidgetId(self.next_id);
        self.next_id += 1;
        self.widgets.insert(id, widget);
        id
    }

    fn destroy_widget(&mut self, id: WidgetId) {
        self.widgets.remove(&id);
        if self.hover == Some(id) {
            self.hover = None;
        }
    }

    fn widget_ids(&self) -> Vec<WidgetId> {
        self.widgets.keys().copied().collect()
    }

    fn set_widget_image(&mut self, id: WidgetId, new_image: ImageHandle) -> bool {
        match self.widgets.get_mut(&id).map(|w| &mut w.kind) {
            Some(WidgetKind::Background { image }) => {
                *image = new_image;
                true
            }
            Some(WidgetKind::WordButton { image, .. }) => {
                *image = Some(new_image);
                true
            }
            _ => false,
        }
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn notify_info(&mut self, title: &str, message: &str) {
        tracing::info!("{}: {}", title, message);
        self.notices.push(Notice {
            title: title.to_string(),
            message: message.to_string(),
            is_error: false,
        });
    }

    fn notify_error(&mut self, title: &str, message: &str) {
        tracing::warn!("{}: {}", title, message);
        self.notices.push(Notice {
            title: title.to_string(),
            message: message.to_string(),
            is_error: true,
        });
    }
}
