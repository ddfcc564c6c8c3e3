//! Host capabilities the aggregator can draw signals from.
//!
//! Detection happens once at the boundary; the aggregator only sees
//! `Option`s and never probes the host itself.

/// Snapshot of sub-resource timing entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceSample {
    /// Entries that have a response end time.
    pub done: usize,
    pub total: usize,
}

impl ResourceSample {
    /// An empty entry list counts as one pending entry.
    pub fn effective_total(&self) -> usize {
        self.total.max(1)
    }

    pub fn ratio(&self) -> f64 {
        let total = self.effective_total();
        self.done.min(total) as f64 / total as f64
    }
}

pub trait ResourceTimingSource {
    fn sample(&self) -> ResourceSample;
}

impl<F> ResourceTimingSource for F
where
    F: Fn() -> ResourceSample,
{
    fn sample(&self) -> ResourceSample {
        self()
    }
}

#[derive(Default)]
pub struct Capabilities {
    pub resource_timing: Option<Box<dyn ResourceTimingSource>>,
}

impl Capabilities {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_resource_timing(source: impl ResourceTimingSource + 'static) -> Self {
        Self {
            resource_timing: Some(Box::new(source)),
        }
    }
}

impl std::fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capabilities")
            .field("resource_timing", &self.resource_timing.is_some())
            .finish()
    }
}
