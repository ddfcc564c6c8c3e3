//! Mobile navigation drawer.

/// Class toggled on the drawer, its overlay and the hamburger button.
pub const NAV_ACTIVE_CLASS: &str = "active";

/// Open/closed state of the drawer. While open the page body does not scroll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MobileNav {
    open: bool,
}

impl MobileNav {
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Returns `true` when the state changed.
    pub fn open(&mut self) -> bool {
        !std::mem::replace(&mut self.open, true)
    }

    /// Returns `true` when the state changed. Following a link in the drawer
    /// closes it too.
    pub fn close(&mut self) -> bool {
        std::mem::replace(&mut self.open, false)
    }

    /// Value for the body's `overflow` style.
    pub fn body_overflow(&self) -> &'static str {
        if self.open {
            "hidden"
        } else {
            ""
        }
    }
}
