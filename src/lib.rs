//! Stateful behaviour behind the landing page: the load progress indicator
//! and the live activity feed.
//!
//! Both components are plain state machines driven through [`Scheduler`].
//! Tests step them with [`ManualScheduler`]; in the browser the `web` module
//! binds them to the DOM, timers and animation frames.

pub mod config;
pub mod error;
pub mod page;
pub mod scheduler;
pub mod view;

pub mod progress {
    pub mod aggregator;
    pub mod capability;
    pub mod signal;
    pub mod state;

    pub use aggregator::{ProgressAggregator, ProgressTask};
    pub use capability::{Capabilities, ResourceSample, ResourceTimingSource};
    pub use signal::{Proposal, ReadinessSignal};
    pub use state::ProgressState;
}

pub mod feed {
    pub mod fixture;
    pub mod queue;
    pub mod row;

    pub use fixture::{Category, FeedRecord, Fixture};
    pub use queue::{FeedQueue, FeedTask};
    pub use row::{FeedRow, RowId, RowMarkup, TransitionPhase};
}

pub mod glue {
    pub mod accordion;
    pub mod anchor;
    pub mod counter;
    pub mod header;
    pub mod nav;
    pub mod spy;
}

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{FeedTimings, LandingConfig, ProgressTimings};
pub use error::LandingError;
pub use page::{DocumentPhase, ImageCensus, LandingPage, SettleOnce, Task};
pub use scheduler::{ManualScheduler, Scheduler, TimerId};
