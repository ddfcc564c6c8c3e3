//! Render targets the components draw into.
//!
//! The browser implementations live in `web`; tests use mocks or in-memory
//! lists. A component whose target is missing is simply never constructed.

use crate::feed::{RowId, RowMarkup};

/// Circumference of the progress ring (2π × 34).
pub const RING_CIRCUMFERENCE: f64 = 213.6;

/// Everything the indicator shows for one accepted progress value.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressFrame {
    pub percent: u8,
    /// `None` keeps the status line that is currently shown.
    pub status: Option<String>,
}

impl ProgressFrame {
    pub fn bar_width(&self) -> String {
        format!("{}%", self.percent)
    }

    pub fn percent_text(&self) -> String {
        format!("{}%", self.percent)
    }

    /// Stroke offset that leaves `percent` of the ring drawn.
    pub fn arc_offset(&self) -> f64 {
        RING_CIRCUMFERENCE * (1.0 - f64::from(self.percent) / 100.0)
    }

    pub fn arc_offset_css(&self) -> String {
        format!("{:.2}", self.arc_offset())
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait ProgressView {
    fn render(&mut self, frame: &ProgressFrame);
    /// Starts the fade-out.
    fn hide(&mut self);
    /// Removes the indicator from the render tree.
    fn detach(&mut self);
}

pub trait FeedView {
    /// Drops whatever the container held before the first population.
    fn clear(&mut self);
    fn append_row(&mut self, id: RowId, row: &RowMarkup);
    fn add_class(&mut self, id: RowId, class: &str);
    fn remove_class(&mut self, id: RowId, class: &str);
    fn remove_row(&mut self, id: RowId);
    /// Height of the rendered rows in pixels, 0 when nothing is painted yet.
    fn content_height(&self) -> u32;
    /// Pins height, min-height and max-height of the container.
    fn lock_height(&mut self, px: u32);
}
