//! Cooperative, single-threaded scheduling.
//!
//! Components never hold callbacks. They hand typed task values to a
//! [`Scheduler`] and get them back through their owner's dispatch when the
//! timer or animation frame fires. [`ManualScheduler`] runs that timeline on
//! a virtual clock so tests can step it synchronously.

use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

pub trait Scheduler<T> {
    /// High-resolution clock in milliseconds since the timeline started.
    fn now_ms(&self) -> f64;
    fn set_timeout(&mut self, delay_ms: u32, task: T) -> TimerId;
    fn set_interval(&mut self, period_ms: u32, task: T) -> TimerId;
    /// Cancels a timeout or interval. Unknown or already fired ids are ignored.
    fn clear_timer(&mut self, id: TimerId);
    /// Runs `task` on the next rendering frame.
    fn request_frame(&mut self, task: T);
}

/// One unit of work released by [`ManualScheduler::step`].
#[derive(Debug, PartialEq)]
pub enum Step<T> {
    Timer(T),
    /// Every frame callback that was queued before this frame started.
    Frame(Vec<T>),
}

#[derive(Debug)]
struct PendingTimer<T> {
    id: TimerId,
    task: T,
    period_ms: Option<u64>,
}

/// Deterministic scheduler on a virtual millisecond clock.
///
/// Frames happen on multiples of `frame_interval_ms`. Frame callbacks
/// requested while a frame runs go to the next frame. Timers due at the same
/// instant fire in registration order, and before a frame due at that instant.
#[derive(Debug)]
pub struct ManualScheduler<T> {
    now_ms: u64,
    frame_interval_ms: u64,
    next_id: u64,
    next_seq: u64,
    timers: BTreeMap<(u64, u64), PendingTimer<T>>,
    frame_queue: Vec<T>,
    frame_due: Option<u64>,
    frames_run: u64,
}

impl<T: Clone> ManualScheduler<T> {
    pub fn new(frame_interval_ms: u64) -> Self {
        Self {
            now_ms: 0,
            frame_interval_ms: frame_interval_ms.max(1),
            next_id: 1,
            next_seq: 0,
            timers: BTreeMap::new(),
            frame_queue: Vec::new(),
            frame_due: None,
            frames_run: 0,
        }
    }

    pub fn now(&self) -> u64 {
        self.now_ms
    }

    pub fn frames_run(&self) -> u64 {
        self.frames_run
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn pending_frames(&self) -> usize {
        self.frame_queue.len()
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.timers.values().any(|timer| timer.id == id)
    }

    fn next_frame_at(&self) -> u64 {
        (self.now_ms / self.frame_interval_ms + 1) * self.frame_interval_ms
    }

    fn insert_timer(&mut self, due_ms: u64, timer: PendingTimer<T>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.insert((due_ms, seq), timer);
    }

    /// Releases the next timer or frame due at or before `until_ms` and moves
    /// the clock to it. Returns `None` once nothing else is due.
    pub fn step(&mut self, until_ms: u64) -> Option<Step<T>> {
        let timer_due = self.timers.keys().next().map(|&(due, _)| due);
        let (due, is_frame) = match (timer_due, self.frame_due) {
            (Some(timer), Some(frame)) if frame < timer => (frame, true),
            (Some(timer), _) => (timer, false),
            (None, Some(frame)) => (frame, true),
            (None, None) => return None,
        };
        if due > until_ms {
            return None;
        }
        self.now_ms = self.now_ms.max(due);

        if is_frame {
            self.frames_run += 1;
            self.frame_due = None;
            return Some(Step::Frame(std::mem::take(&mut self.frame_queue)));
        }

        let ((due, _), timer) = self.timers.pop_first()?;
        if let Some(period) = timer.period_ms {
            // Re-armed before dispatch so the task can cancel its own interval.
            self.insert_timer(
                due + period,
                PendingTimer {
                    id: timer.id,
                    task: timer.task.clone(),
                    period_ms: Some(period),
                },
            );
        }
        Some(Step::Timer(timer.task))
    }

    /// Dispatches everything due up to `until_ms`, then parks the clock there.
    pub fn run_until<F>(&mut self, until_ms: u64, mut dispatch: F)
    where
        F: FnMut(T, &mut Self),
    {
        while let Some(step) = self.step(until_ms) {
            match step {
                Step::Timer(task) => dispatch(task, self),
                Step::Frame(tasks) => {
                    for task in tasks {
                        dispatch(task, self);
                    }
                }
            }
        }
        self.now_ms = self.now_ms.max(until_ms);
    }

    pub fn advance_by<F>(&mut self, delta_ms: u64, dispatch: F)
    where
        F: FnMut(T, &mut Self),
    {
        let until = self.now_ms + delta_ms;
        self.run_until(until, dispatch);
    }
}

impl<T: Clone> Default for ManualScheduler<T> {
    fn default() -> Self {
        Self::new(16)
    }
}

impl<T: Clone> Scheduler<T> for ManualScheduler<T> {
    fn now_ms(&self) -> f64 {
        self.now_ms as f64
    }

    fn set_timeout(&mut self, delay_ms: u32, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let due = self.now_ms + u64::from(delay_ms);
        self.insert_timer(
            due,
            PendingTimer {
                id,
                task,
                period_ms: None,
            },
        );
        id
    }

    fn set_interval(&mut self, period_ms: u32, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let period = u64::from(period_ms.max(1));
        self.insert_timer(
            self.now_ms + period,
            PendingTimer {
                id,
                task,
                period_ms: Some(period),
            },
        );
        id
    }

    fn clear_timer(&mut self, id: TimerId) {
        self.timers.retain(|_, timer| timer.id != id);
    }

    fn request_frame(&mut self, task: T) {
        if self.frame_due.is_none() {
            self.frame_due = Some(self.next_frame_at());
        }
        self.frame_queue.push(task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(scheduler: &mut ManualScheduler<&'static str>, until: u64) -> Vec<(u64, &'static str)> {
        let mut fired = Vec::new();
        scheduler.run_until(until, |task, s| fired.push((s.now(), task)));
        fired
    }

    #[test]
    fn timeouts_fire_in_due_order() {
        let mut scheduler = ManualScheduler::new(16);
        scheduler.set_timeout(200, "late");
        scheduler.set_timeout(100, "early");
        scheduler.set_timeout(100, "early-second");

        assert_eq!(
            drain(&mut scheduler, 1000),
            vec![(100, "early"), (100, "early-second"), (200, "late")]
        );
        assert_eq!(scheduler.now(), 1000);
        assert_eq!(scheduler.pending_timers(), 0);
    }

    #[test]
    fn interval_repeats_until_cleared() {
        let mut scheduler = ManualScheduler::new(16);
        let id = scheduler.set_interval(100, "tick");

        assert_eq!(drain(&mut scheduler, 350).len(), 3);
        assert!(scheduler.is_scheduled(id));

        scheduler.clear_timer(id);
        assert!(drain(&mut scheduler, 1000).is_empty());
    }

    #[test]
    fn interval_can_cancel_itself_while_firing() {
        let mut scheduler: ManualScheduler<TimerId> = ManualScheduler::new(16);
        let id = scheduler.set_interval(100, TimerId(0));
        let mut fired = 0;
        scheduler.run_until(1000, |_, s| {
            fired += 1;
            s.clear_timer(id);
        });
        assert_eq!(fired, 1);
    }

    #[test]
    fn frames_requested_during_a_frame_wait_for_the_next_one() {
        let mut scheduler = ManualScheduler::new(16);
        scheduler.request_frame("first");
        let mut seen = Vec::new();
        scheduler.run_until(100, |task, s| {
            seen.push((s.now(), task));
            if task == "first" {
                s.request_frame("second");
            }
        });
        assert_eq!(seen, vec![(16, "first"), (32, "second")]);
        assert_eq!(scheduler.frames_run(), 2);
    }

    #[test]
    fn timer_due_with_a_frame_fires_first() {
        let mut scheduler = ManualScheduler::new(16);
        scheduler.request_frame("frame");
        scheduler.set_timeout(16, "timer");
        assert_eq!(drain(&mut scheduler, 16), vec![(16, "timer"), (16, "frame")]);
    }

    #[test]
    fn nothing_past_the_horizon_is_released() {
        let mut scheduler = ManualScheduler::new(16);
        scheduler.set_timeout(500, "later");
        assert!(drain(&mut scheduler, 499).is_empty());
        assert_eq!(drain(&mut scheduler, 500), vec![(500, "later")]);
    }
}
