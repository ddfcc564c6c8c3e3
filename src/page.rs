//! Wires the progress indicator and the activity feed onto one timeline.
//!
//! The two components share nothing but the scheduler; either may be absent
//! when its render target is missing from the page.

use std::cell::Cell;

use crate::config::LandingConfig;
use crate::feed::{FeedQueue, FeedTask, Fixture};
use crate::progress::{Capabilities, ProgressAggregator, ProgressTask, ReadinessSignal};
use crate::scheduler::Scheduler;
use crate::view::{FeedView, ProgressView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Progress(ProgressTask),
    Feed(FeedTask),
}

impl From<ProgressTask> for Task {
    fn from(task: ProgressTask) -> Self {
        Task::Progress(task)
    }
}

impl From<FeedTask> for Task {
    fn from(task: FeedTask) -> Self {
        Task::Feed(task)
    }
}

/// Image counts seen when the DOM became ready.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageCensus {
    pub total: usize,
    pub already_complete: usize,
}

/// How far the document had loaded when the behaviour mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentPhase {
    Loading,
    Interactive,
    Complete,
}

impl DocumentPhase {
    /// The structural DOM is already parsed, so `DOMContentLoaded` is past.
    pub fn is_parsed(self) -> bool {
        !matches!(self, DocumentPhase::Loading)
    }

    /// The `load` event has already fired and will not fire again.
    pub fn is_loaded(self) -> bool {
        matches!(self, DocumentPhase::Complete)
    }
}

/// Settles one image. Its load and error listeners share a gate and only the
/// first event through counts.
#[derive(Debug, Default)]
pub struct SettleOnce(Cell<bool>);

impl SettleOnce {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` for the first call only.
    pub fn settle(&self) -> bool {
        !self.0.replace(true)
    }

    pub fn is_settled(&self) -> bool {
        self.0.get()
    }
}

pub struct LandingPage<P, F> {
    progress: Option<ProgressAggregator<P>>,
    feed: Option<FeedQueue<F>>,
}

impl<P: ProgressView, F: FeedView> LandingPage<P, F> {
    pub fn new(progress: Option<ProgressAggregator<P>>, feed: Option<FeedQueue<F>>) -> Self {
        Self { progress, feed }
    }

    /// Builds whichever components have a render target.
    pub fn mount(
        config: &LandingConfig,
        progress_view: Option<P>,
        feed_view: Option<F>,
        fixture: Fixture,
        capabilities: Capabilities,
    ) -> Self {
        let progress = match progress_view {
            Some(view) => Some(ProgressAggregator::new(
                view,
                config.progress.clone(),
                capabilities,
            )),
            None => {
                tracing::debug!("No progress indicator on this page");
                None
            }
        };
        let feed = match feed_view {
            Some(view) => Some(FeedQueue::new(view, fixture, config.feed.clone())),
            None => {
                tracing::debug!("No activity feed on this page");
                None
            }
        };
        Self::new(progress, feed)
    }

    pub fn progress(&self) -> Option<&ProgressAggregator<P>> {
        self.progress.as_ref()
    }

    pub fn feed(&self) -> Option<&FeedQueue<F>> {
        self.feed.as_ref()
    }

    /// Arms the progress deadline and sampler. Call once, as early as possible.
    pub fn start<S: Scheduler<Task>>(&mut self, scheduler: &mut S) {
        if let Some(progress) = self.progress.as_mut() {
            progress.start(scheduler);
        }
    }

    /// The structural DOM is parsed: report it, begin image tracking and fill
    /// the feed. Arms the deadline too if `start` never ran.
    pub fn dom_ready<S: Scheduler<Task>>(&mut self, images: ImageCensus, scheduler: &mut S) {
        if let Some(progress) = self.progress.as_mut() {
            progress.start(scheduler);
            progress.receive(ReadinessSignal::DomStructureReady, scheduler);
            progress.track_images(images.total, images.already_complete, scheduler);
        }
        if let Some(feed) = self.feed.as_mut() {
            feed.populate(scheduler);
        }
    }

    pub fn image_settled<S: Scheduler<Task>>(&mut self, scheduler: &mut S) {
        if let Some(progress) = self.progress.as_mut() {
            progress.image_settled(scheduler);
        }
    }

    /// Delivers full load when the document finished loading before mount.
    /// Returns `false` when the host still has to wait for its `load` event.
    pub fn catch_up<S: Scheduler<Task>>(&mut self, phase: DocumentPhase, scheduler: &mut S) -> bool {
        if !phase.is_loaded() {
            return false;
        }
        tracing::debug!("Document already loaded at mount");
        self.signal(ReadinessSignal::FullLoad, scheduler);
        true
    }

    pub fn signal<S: Scheduler<Task>>(&mut self, signal: ReadinessSignal, scheduler: &mut S) {
        if let Some(progress) = self.progress.as_mut() {
            progress.receive(signal, scheduler);
        }
    }

    pub fn dispatch<S: Scheduler<Task>>(&mut self, task: Task, scheduler: &mut S) {
        match task {
            Task::Progress(task) => {
                if let Some(progress) = self.progress.as_mut() {
                    progress.handle(task, scheduler);
                }
            }
            Task::Feed(task) => {
                if let Some(feed) = self.feed.as_mut() {
                    feed.handle(task, scheduler);
                }
            }
        }
    }
}
