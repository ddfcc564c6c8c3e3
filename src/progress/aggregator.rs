use super::capability::{Capabilities, ResourceTimingSource};
use super::signal::{ReadinessSignal, STATUS_DONE};
use super::state::ProgressState;
use crate::config::ProgressTimings;
use crate::scheduler::{Scheduler, TimerId};
use crate::view::ProgressView;

/// Deferred work of the progress indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressTask {
    SampleResources,
    DeadlineElapsed,
    DismissAfterLoad,
    Hide,
    Detach,
}

#[derive(Debug, Default)]
struct ImageTally {
    total: usize,
    settled: usize,
}

/// Folds readiness signals into one non-regressing indicator and dismisses
/// it after the full-load signal or the deadline, whichever comes first.
pub struct ProgressAggregator<V> {
    view: V,
    state: ProgressState,
    timings: ProgressTimings,
    resources: Option<Box<dyn ResourceTimingSource>>,
    resource_timer: Option<TimerId>,
    images: Option<ImageTally>,
    dom_ready: bool,
    fonts_ready: bool,
    full_load: bool,
    deadline_elapsed: bool,
    started: bool,
    detached: bool,
}

impl<V: ProgressView> ProgressAggregator<V> {
    pub fn new(view: V, timings: ProgressTimings, capabilities: Capabilities) -> Self {
        Self {
            view,
            state: ProgressState::new(),
            timings,
            resources: capabilities.resource_timing,
            resource_timer: None,
            images: None,
            dom_ready: false,
            fonts_ready: false,
            full_load: false,
            deadline_elapsed: false,
            started: false,
            detached: false,
        }
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    pub fn percent(&self) -> u8 {
        self.state.current_percent()
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_sampling(&self) -> bool {
        self.resource_timer.is_some()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Arms the deadline and, when resource timing is available, the sampler.
    /// Runs once.
    pub fn start<S, T>(&mut self, scheduler: &mut S)
    where
        S: Scheduler<T>,
        T: From<ProgressTask>,
    {
        if std::mem::replace(&mut self.started, true) {
            return;
        }
        scheduler.set_timeout(self.timings.deadline_ms, ProgressTask::DeadlineElapsed.into());
        if self.resources.is_some() {
            let id = scheduler.set_interval(
                self.timings.resource_sample_interval_ms,
                ProgressTask::SampleResources.into(),
            );
            self.resource_timer = Some(id);
        } else {
            tracing::debug!("Resource timing unavailable, relying on other signals");
        }
    }

    /// Applies a proposal under the anti-regression rule and redraws on change.
    pub fn propose_progress(&mut self, value: f64, message: &str) -> bool {
        match self.state.propose_progress(value, message) {
            Some(frame) => {
                tracing::debug!("Progress {}% ({})", frame.percent, message);
                self.view.render(&frame);
                true
            }
            None => false,
        }
    }

    pub fn receive<S, T>(&mut self, signal: ReadinessSignal, scheduler: &mut S)
    where
        S: Scheduler<T>,
        T: From<ProgressTask>,
    {
        match signal {
            ReadinessSignal::DomStructureReady => {
                if std::mem::replace(&mut self.dom_ready, true) {
                    return;
                }
                self.apply(signal);
            }
            ReadinessSignal::ResourceTimingSample(_) => {
                let mapped = signal.proposal().percent;
                self.apply(signal);
                if mapped >= 70.0 || self.percent() >= 70 {
                    self.stop_sampling(scheduler);
                }
            }
            ReadinessSignal::ImageSettled { .. } => self.apply(signal),
            ReadinessSignal::FontsReady => {
                if std::mem::replace(&mut self.fonts_ready, true) {
                    return;
                }
                self.apply(signal);
            }
            ReadinessSignal::FullLoad => {
                if std::mem::replace(&mut self.full_load, true) {
                    return;
                }
                self.stop_sampling(scheduler);
                self.apply(signal);
                scheduler.set_timeout(
                    self.timings.load_dismiss_delay_ms,
                    ProgressTask::DismissAfterLoad.into(),
                );
            }
            ReadinessSignal::DeadlineElapsed => {
                if std::mem::replace(&mut self.deadline_elapsed, true) {
                    return;
                }
                if !self.state.is_dismissed() {
                    tracing::info!("Load deadline reached, forcing dismissal");
                }
                self.dismiss(scheduler);
            }
        }
    }

    /// Starts counting page images. Images already complete count at once;
    /// a page without images proposes its value immediately.
    pub fn track_images<S, T>(&mut self, total: usize, already_complete: usize, scheduler: &mut S)
    where
        S: Scheduler<T>,
        T: From<ProgressTask>,
    {
        if self.images.is_some() {
            return;
        }
        self.images = Some(ImageTally { total, settled: 0 });
        if total == 0 {
            self.receive(ReadinessSignal::ImageSettled { settled: 0, total: 0 }, scheduler);
            return;
        }
        for _ in 0..already_complete.min(total) {
            self.image_settled(scheduler);
        }
    }

    /// One image loaded or failed.
    pub fn image_settled<S, T>(&mut self, scheduler: &mut S)
    where
        S: Scheduler<T>,
        T: From<ProgressTask>,
    {
        let Some(tally) = self.images.as_mut() else {
            return;
        };
        if tally.settled >= tally.total {
            return;
        }
        tally.settled += 1;
        let signal = ReadinessSignal::ImageSettled {
            settled: tally.settled,
            total: tally.total,
        };
        self.receive(signal, scheduler);
    }

    pub fn handle<S, T>(&mut self, task: ProgressTask, scheduler: &mut S)
    where
        S: Scheduler<T>,
        T: From<ProgressTask>,
    {
        match task {
            ProgressTask::SampleResources => {
                let Some(sample) = self.resources.as_ref().map(|source| source.sample()) else {
                    self.stop_sampling(scheduler);
                    return;
                };
                if self.resource_timer.is_some() {
                    self.receive(ReadinessSignal::ResourceTimingSample(sample), scheduler);
                }
            }
            ProgressTask::DeadlineElapsed => {
                self.receive(ReadinessSignal::DeadlineElapsed, scheduler)
            }
            ProgressTask::DismissAfterLoad => self.dismiss(scheduler),
            ProgressTask::Hide => {
                self.view.hide();
                scheduler.set_timeout(self.timings.fade_out_ms, ProgressTask::Detach.into());
            }
            ProgressTask::Detach => {
                if !std::mem::replace(&mut self.detached, true) {
                    self.view.detach();
                    tracing::info!("Progress indicator detached");
                }
            }
        }
    }

    /// Drives the bar to 100% and schedules hide and detach. Later calls are
    /// no-ops.
    pub fn dismiss<S, T>(&mut self, scheduler: &mut S)
    where
        S: Scheduler<T>,
        T: From<ProgressTask>,
    {
        if self.state.is_dismissed() {
            return;
        }
        self.stop_sampling(scheduler);
        self.propose_progress(100.0, STATUS_DONE);
        self.state.mark_dismissed();
        scheduler.set_timeout(self.timings.settle_delay_ms, ProgressTask::Hide.into());
    }

    fn apply(&mut self, signal: ReadinessSignal) {
        let proposal = signal.proposal();
        self.propose_progress(proposal.percent, &proposal.message);
    }

    fn stop_sampling<S, T>(&mut self, scheduler: &mut S)
    where
        S: Scheduler<T>,
    {
        if let Some(id) = self.resource_timer.take() {
            scheduler.clear_timer(id);
            tracing::debug!("Resource sampling stopped ({})", id);
        }
    }
}
