//! Readiness signals and the sub-range each one maps into.

use super::capability::ResourceSample;

pub const STATUS_DOM_READY: &str = "페이지 구조 완료";
pub const STATUS_IMAGES_READY: &str = "이미지 준비 완료";
pub const STATUS_FONTS_READY: &str = "폰트 로딩 완료";
pub const STATUS_ALMOST_DONE: &str = "거의 완료...";
pub const STATUS_DONE: &str = "완료!";

const DOM_READY_PERCENT: f64 = 20.0;
const RESOURCE_RANGE: (f64, f64) = (20.0, 70.0);
const IMAGE_RANGE: (f64, f64) = (70.0, 90.0);
const NO_IMAGES_PERCENT: f64 = 80.0;
const FONTS_READY_PERCENT: f64 = 92.0;
const FULL_LOAD_PERCENT: f64 = 98.0;

/// A one-off page readiness occurrence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReadinessSignal {
    DomStructureReady,
    ResourceTimingSample(ResourceSample),
    /// An image finished loading or failed; both count as settled.
    ImageSettled { settled: usize, total: usize },
    /// The font set is ready, or its promise rejected.
    FontsReady,
    FullLoad,
    DeadlineElapsed,
}

/// A percent value a signal asks for, before the anti-regression rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Proposal {
    pub percent: f64,
    pub message: String,
}

impl Proposal {
    fn new(percent: f64, message: impl Into<String>) -> Self {
        Self {
            percent,
            message: message.into(),
        }
    }
}

impl ReadinessSignal {
    pub fn proposal(&self) -> Proposal {
        match *self {
            ReadinessSignal::DomStructureReady => Proposal::new(DOM_READY_PERCENT, STATUS_DOM_READY),
            ReadinessSignal::ResourceTimingSample(sample) => Proposal::new(
                map_ratio(sample.ratio(), RESOURCE_RANGE),
                format!("리소스 로딩 중... ({}/{})", sample.done, sample.effective_total()),
            ),
            ReadinessSignal::ImageSettled { total: 0, .. } => {
                Proposal::new(NO_IMAGES_PERCENT, STATUS_IMAGES_READY)
            }
            ReadinessSignal::ImageSettled { settled, total } => {
                let settled = settled.min(total);
                Proposal::new(
                    map_ratio(settled as f64 / total as f64, IMAGE_RANGE),
                    format!("이미지 로딩 중... ({}/{})", settled, total),
                )
            }
            ReadinessSignal::FontsReady => Proposal::new(FONTS_READY_PERCENT, STATUS_FONTS_READY),
            ReadinessSignal::FullLoad => Proposal::new(FULL_LOAD_PERCENT, STATUS_ALMOST_DONE),
            ReadinessSignal::DeadlineElapsed => Proposal::new(100.0, STATUS_DONE),
        }
    }
}

/// Maps a 0..=1 ratio linearly onto `low..=high`, rounding the span like the
/// indicator rounds its percent.
fn map_ratio(ratio: f64, (low, high): (f64, f64)) -> f64 {
    low + (ratio.clamp(0.0, 1.0) * (high - low)).round()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_samples_map_into_twenty_to_seventy() {
        let none = ReadinessSignal::ResourceTimingSample(ResourceSample { done: 0, total: 10 });
        let half = ReadinessSignal::ResourceTimingSample(ResourceSample { done: 5, total: 10 });
        let all = ReadinessSignal::ResourceTimingSample(ResourceSample { done: 10, total: 10 });

        assert_eq!(none.proposal().percent, 20.0);
        assert_eq!(half.proposal().percent, 45.0);
        assert_eq!(all.proposal().percent, 70.0);
        assert_eq!(half.proposal().message, "리소스 로딩 중... (5/10)");
    }

    #[test]
    fn empty_resource_list_counts_as_one_pending_entry() {
        let empty = ReadinessSignal::ResourceTimingSample(ResourceSample { done: 0, total: 0 });
        let proposal = empty.proposal();
        assert_eq!(proposal.percent, 20.0);
        assert_eq!(proposal.message, "리소스 로딩 중... (0/1)");
    }

    #[test]
    fn images_map_into_seventy_to_ninety() {
        let first = ReadinessSignal::ImageSettled { settled: 1, total: 4 };
        let last = ReadinessSignal::ImageSettled { settled: 4, total: 4 };
        assert_eq!(first.proposal().percent, 75.0);
        assert_eq!(last.proposal().percent, 90.0);
        assert_eq!(first.proposal().message, "이미지 로딩 중... (1/4)");
    }

    #[test]
    fn page_without_images_proposes_eighty() {
        let proposal = ReadinessSignal::ImageSettled { settled: 0, total: 0 }.proposal();
        assert_eq!(proposal.percent, 80.0);
        assert_eq!(proposal.message, STATUS_IMAGES_READY);
    }

    #[test]
    fn fixed_signals() {
        assert_eq!(ReadinessSignal::DomStructureReady.proposal().percent, 20.0);
        assert_eq!(ReadinessSignal::FontsReady.proposal().percent, 92.0);
        assert_eq!(ReadinessSignal::FullLoad.proposal().percent, 98.0);
        assert_eq!(ReadinessSignal::DeadlineElapsed.proposal().percent, 100.0);
    }
}
