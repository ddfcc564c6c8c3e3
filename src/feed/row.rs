use std::fmt;

use super::fixture::FeedRecord;
use crate::error::LandingError;

pub const ROW_CLASS: &str = "rt-row";
pub const ENTER_CLASS: &str = "rt-row-enter";
pub const ENTER_ACTIVE_CLASS: &str = "rt-row-enter-active";
pub const EXIT_CLASS: &str = "rt-row-exit";
pub const EXIT_ACTIVE_CLASS: &str = "rt-row-exit-active";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(pub u64);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row#{}", self.0)
    }
}

/// Where a row is in its enter/exit choreography.
///
/// `Entering` carries the starting style, `Entered` the running enter
/// transition. `Exiting` carries the exit starting style, `ExitActive` the
/// running exit transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPhase {
    Entering,
    Entered,
    Steady,
    Exiting,
    ExitActive,
    Removed,
}

impl TransitionPhase {
    pub fn can_move_to(self, next: TransitionPhase) -> bool {
        use TransitionPhase::*;
        matches!(
            (self, next),
            (Entering, Entered)
                | (Entered, Steady)
                | (Entering | Entered | Steady, Exiting)
                | (Exiting, ExitActive)
                | (Exiting | ExitActive, Removed)
        )
    }

    pub fn is_leaving(self) -> bool {
        matches!(
            self,
            TransitionPhase::Exiting | TransitionPhase::ExitActive | TransitionPhase::Removed
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStatus {
    Complete,
    InProgress,
}

impl RowStatus {
    pub fn label(self) -> &'static str {
        match self {
            RowStatus::Complete => "입금완료",
            RowStatus::InProgress => "처리중",
        }
    }

    fn badge_class(self) -> &'static str {
        match self {
            RowStatus::Complete => "done-st",
            RowStatus::InProgress => "ing-st",
        }
    }

    fn icon_class(self) -> &'static str {
        match self {
            RowStatus::Complete => "fas fa-check-circle",
            RowStatus::InProgress => "fas fa-spinner fa-spin",
        }
    }

    fn row_class(self) -> &'static str {
        match self {
            RowStatus::Complete => "done-row",
            RowStatus::InProgress => "ing-row",
        }
    }
}

/// What a row shows, independent of how the host renders it.
#[derive(Debug, Clone, PartialEq)]
pub struct RowMarkup {
    pub classes: Vec<&'static str>,
    pub avatar_initial: String,
    pub avatar_color: String,
    pub display_name: String,
    pub category_label: &'static str,
    pub category_class: &'static str,
    pub amount: String,
    pub status: RowStatus,
}

impl RowMarkup {
    pub fn class_name(&self) -> String {
        self.classes.join(" ")
    }

    pub fn inner_html(&self) -> String {
        format!(
            concat!(
                r#"<div class="rt-ava" style="background:{color}">{initial}</div>"#,
                r#"<div class="rt-detail">"#,
                r#"<div class="rt-ntype"><strong>{name}</strong>님 · "#,
                r#"<span class="rt-tp {tp}">{category}</span></div>"#,
                r#"<div class="rt-amount">{amount}</div>"#,
                r#"</div>"#,
                r#"<div class="rt-st {badge}"><i class="{icon}"></i> {label}</div>"#,
            ),
            color = escape(&self.avatar_color),
            initial = escape(&self.avatar_initial),
            name = escape(&self.display_name),
            tp = self.category_class,
            category = self.category_label,
            amount = escape(&self.amount),
            badge = self.status.badge_class(),
            icon = self.status.icon_class(),
            label = self.status.label(),
        )
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// A rendered fixture record owned by the feed queue.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedRow {
    id: RowId,
    fixture_index: usize,
    record: FeedRecord,
    phase: TransitionPhase,
}

impl FeedRow {
    pub fn new(id: RowId, fixture_index: usize, record: FeedRecord, phase: TransitionPhase) -> Self {
        Self {
            id,
            fixture_index,
            record,
            phase,
        }
    }

    pub fn id(&self) -> RowId {
        self.id
    }

    /// Position in the fixture the row was built from.
    pub fn fixture_index(&self) -> usize {
        self.fixture_index
    }

    pub fn record(&self) -> &FeedRecord {
        &self.record
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    pub fn advance(&mut self, next: TransitionPhase) -> Result<(), LandingError> {
        if !self.phase.can_move_to(next) {
            return Err(LandingError::IllegalTransition {
                row: self.id,
                from: self.phase,
                to: next,
            });
        }
        tracing::debug!("{} {:?} -> {:?}", self.id, self.phase, next);
        self.phase = next;
        Ok(())
    }

    pub fn markup(&self) -> RowMarkup {
        let status = if self.record.is_complete {
            RowStatus::Complete
        } else {
            RowStatus::InProgress
        };
        let mut classes = vec![ROW_CLASS, status.row_class()];
        if self.phase == TransitionPhase::Entering {
            classes.push(ENTER_CLASS);
        }
        RowMarkup {
            classes,
            avatar_initial: self.record.avatar_initial(),
            avatar_color: self.record.avatar_color.clone(),
            display_name: self.record.display_name.clone(),
            category_label: self.record.category.label(),
            category_class: self.record.category.css_class(),
            amount: self.record.amount.clone(),
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::fixture::Fixture;

    fn row(index: u64, phase: TransitionPhase) -> FeedRow {
        let fixture = Fixture::builtin();
        let (fixture_index, record) = fixture.at(index);
        FeedRow::new(RowId(index), fixture_index, record.clone(), phase)
    }

    #[test]
    fn follows_enter_then_exit_path() {
        let mut row = row(0, TransitionPhase::Entering);
        for next in [
            TransitionPhase::Entered,
            TransitionPhase::Steady,
            TransitionPhase::Exiting,
            TransitionPhase::ExitActive,
            TransitionPhase::Removed,
        ] {
            row.advance(next).unwrap();
        }
        assert_eq!(row.phase(), TransitionPhase::Removed);
    }

    #[test]
    fn rejects_skipping_or_reversing_phases() {
        let mut row = row(0, TransitionPhase::Steady);
        assert!(matches!(
            row.advance(TransitionPhase::Entered),
            Err(LandingError::IllegalTransition { .. })
        ));
        assert!(row.advance(TransitionPhase::Removed).is_err());
        assert_eq!(row.phase(), TransitionPhase::Steady);
    }

    #[test]
    fn complete_record_renders_done_badge() {
        let markup = row(0, TransitionPhase::Steady).markup();
        assert_eq!(markup.class_name(), "rt-row done-row");
        assert_eq!(markup.avatar_initial, "김");
        let html = markup.inner_html();
        assert!(html.contains("<strong>김*수</strong>"));
        assert!(html.contains(r#"<span class="rt-tp tp-mobile">소액결제</span>"#));
        assert!(html.contains("rt-st done-st"));
        assert!(html.contains("입금완료"));
    }

    #[test]
    fn pending_record_renders_spinner_and_enter_class() {
        let markup = row(2, TransitionPhase::Entering).markup();
        assert_eq!(markup.class_name(), "rt-row ing-row rt-row-enter");
        let html = markup.inner_html();
        assert!(html.contains("fa-spinner fa-spin"));
        assert!(html.contains("처리중"));
        assert!(html.contains("tp-card"));
    }

    #[test]
    fn text_is_escaped() {
        let mut markup = row(0, TransitionPhase::Steady).markup();
        markup.display_name = "<b>x</b>".to_string();
        assert!(markup.inner_html().contains("&lt;b&gt;x&lt;/b&gt;"));
    }
}
