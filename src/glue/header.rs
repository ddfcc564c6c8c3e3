//! Sticky header shading once the page is scrolled.

/// Scroll offset past which the header counts as scrolled.
pub const SCROLLED_THRESHOLD_PX: f64 = 20.0;

pub fn header_scrolled(scroll_y: f64) -> bool {
    scroll_y > SCROLLED_THRESHOLD_PX
}

/// Coalesces scroll events into at most one header update per frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderScroll {
    frame_pending: bool,
    scrolled: bool,
}

impl HeaderScroll {
    /// Returns `true` when the caller should request a frame.
    pub fn on_scroll(&mut self) -> bool {
        !std::mem::replace(&mut self.frame_pending, true)
    }

    /// Recomputes the flag on the frame and returns it.
    pub fn on_frame(&mut self, scroll_y: f64) -> bool {
        self.frame_pending = false;
        self.scrolled = header_scrolled(scroll_y);
        self.scrolled
    }

    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }
}
