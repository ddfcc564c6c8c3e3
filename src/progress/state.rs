use crate::view::ProgressFrame;

/// Progress of one page load. Only ever moves forward.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressState {
    current_percent: u8,
    status_text: String,
    dismissed: bool,
}

impl ProgressState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_percent(&self) -> u8 {
        self.current_percent
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    pub fn is_dismissed(&self) -> bool {
        self.dismissed
    }

    /// Applies `value` if, once rounded and clamped, it is strictly greater
    /// than the current percent. Returns the frame to draw, or `None` when the
    /// proposal was discarded.
    pub fn propose_progress(&mut self, value: f64, message: &str) -> Option<ProgressFrame> {
        if self.dismissed {
            return None;
        }
        let percent = clamp_percent(value);
        if percent <= self.current_percent {
            return None;
        }
        self.current_percent = percent;

        let status = if message.is_empty() {
            None
        } else {
            self.status_text = message.to_string();
            Some(self.status_text.clone())
        };
        Some(ProgressFrame { percent, status })
    }

    /// Flips the terminal flag. Returns `false` if it was already set.
    pub fn mark_dismissed(&mut self) -> bool {
        !std::mem::replace(&mut self.dismissed, true)
    }
}

fn clamp_percent(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lower_or_equal_proposals_are_discarded() {
        let mut state = ProgressState::new();
        assert!(state.propose_progress(40.0, "a").is_some());
        assert!(state.propose_progress(40.0, "b").is_none());
        assert!(state.propose_progress(25.0, "c").is_none());
        assert_eq!(state.current_percent(), 40);
        assert_eq!(state.status_text(), "a");
    }

    #[test]
    fn values_are_rounded_and_clamped() {
        let mut state = ProgressState::new();
        assert_eq!(state.propose_progress(19.5, "").unwrap().percent, 20);
        assert_eq!(state.propose_progress(250.0, "").unwrap().percent, 100);

        let mut state = ProgressState::new();
        assert!(state.propose_progress(-5.0, "").is_none());
        assert!(state.propose_progress(f64::NAN, "").is_none());
        assert_eq!(state.current_percent(), 0);
    }

    #[test]
    fn empty_message_keeps_previous_status() {
        let mut state = ProgressState::new();
        state.propose_progress(10.0, "loading");
        let frame = state.propose_progress(30.0, "").unwrap();
        assert_eq!(frame.status, None);
        assert_eq!(state.status_text(), "loading");
    }

    #[test]
    fn nothing_changes_after_dismissal() {
        let mut state = ProgressState::new();
        state.propose_progress(100.0, "done");
        assert!(state.mark_dismissed());
        assert!(!state.mark_dismissed());

        let before = state.clone();
        assert!(state.propose_progress(100.0, "again").is_none());
        assert_eq!(state, before);
    }
}
