//! Scroll-spy: highlights the main navigation link of the section in view.

pub const SPY_ACTIVE_COLOR: &str = "#C0392B";
pub const SPY_ACTIVE_BACKGROUND: &str = "#FDEDEC";

#[derive(Debug, Clone, Default)]
pub struct ScrollSpy {
    targets: Vec<String>,
    active: Option<usize>,
}

impl ScrollSpy {
    /// `hrefs` are the navigation links in document order, e.g. `#faq`.
    pub fn new<I, S>(hrefs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            targets: hrefs
                .into_iter()
                .map(|href| href.as_ref().trim_start_matches('#').to_string())
                .collect(),
            active: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// A section with `id` scrolled into view. Every highlight is cleared and
    /// the matching link, if any, becomes active. Returns the new active link.
    pub fn section_entered(&mut self, id: &str) -> Option<usize> {
        self.active = self.targets.iter().position(|target| target == id);
        self.active
    }
}
