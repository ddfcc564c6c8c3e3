use std::collections::VecDeque;

use super::fixture::Fixture;
use super::row::{
    FeedRow, RowId, TransitionPhase, ENTER_ACTIVE_CLASS, ENTER_CLASS, EXIT_ACTIVE_CLASS,
    EXIT_CLASS,
};
use crate::config::FeedTimings;
use crate::scheduler::{Scheduler, TimerId};
use crate::view::FeedView;

/// Frames to wait for a painted container before giving up on the height lock.
const HEIGHT_LOCK_ATTEMPTS: u8 = 10;

/// Deferred work of the activity feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedTask {
    Cycle,
    LockHeight { attempt: u8 },
    /// Applies the enter transition once `deferrals` more frames have passed.
    EnterFrame { row: RowId, deferrals: u8 },
    EnterSettled(RowId),
    /// Applies the exit transition once `deferrals` more frames have passed.
    ExitFrame { row: RowId, deferrals: u8 },
    Remove(RowId),
}

/// Fixed-capacity list of activity rows fed from a looping fixture.
pub struct FeedQueue<V> {
    view: V,
    fixture: Fixture,
    timings: FeedTimings,
    cursor: u64,
    next_row_id: u64,
    rows: VecDeque<FeedRow>,
    locked_height: Option<u32>,
    cycle_timer: Option<TimerId>,
}

impl<V: FeedView> FeedQueue<V> {
    pub fn new(view: V, fixture: Fixture, timings: FeedTimings) -> Self {
        Self {
            view,
            fixture,
            timings,
            cursor: 0,
            next_row_id: 0,
            rows: VecDeque::new(),
            locked_height: None,
            cycle_timer: None,
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Rows in the document, including one that is still sliding out.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows that are not on their way out.
    pub fn live_len(&self) -> usize {
        self.rows.iter().filter(|row| !row.phase().is_leaving()).count()
    }

    pub fn rows(&self) -> impl Iterator<Item = &FeedRow> {
        self.rows.iter()
    }

    pub fn locked_height(&self) -> Option<u32> {
        self.locked_height
    }

    pub fn is_running(&self) -> bool {
        self.cycle_timer.is_some()
    }

    /// Returns the fixture index for the current cursor and moves it on.
    pub fn advance_cursor(&mut self) -> usize {
        let (index, _) = self.fixture.at(self.cursor);
        self.cursor += 1;
        index
    }

    /// Fills the list with `max_rows` rows without animation, then schedules
    /// the height lock and the periodic cycle. Runs once.
    pub fn populate<S, T>(&mut self, scheduler: &mut S)
    where
        S: Scheduler<T>,
        T: From<FeedTask>,
    {
        if self.cycle_timer.is_some() {
            return;
        }
        self.view.clear();
        self.rows.clear();
        for _ in 0..self.timings.max_rows {
            self.push_row(TransitionPhase::Steady);
        }
        scheduler.request_frame(FeedTask::LockHeight { attempt: 1 }.into());
        let id = scheduler.set_interval(self.timings.cycle_period_ms, FeedTask::Cycle.into());
        self.cycle_timer = Some(id);
        tracing::info!("Activity feed populated with {} rows", self.rows.len());
    }

    pub fn handle<S, T>(&mut self, task: FeedTask, scheduler: &mut S)
    where
        S: Scheduler<T>,
        T: From<FeedTask>,
    {
        match task {
            FeedTask::Cycle => self.cycle(scheduler),
            FeedTask::LockHeight { attempt } => self.lock_height(attempt, scheduler),
            FeedTask::EnterFrame { row, deferrals } if deferrals > 0 => {
                scheduler.request_frame(
                    FeedTask::EnterFrame {
                        row,
                        deferrals: deferrals - 1,
                    }
                    .into(),
                );
            }
            FeedTask::EnterFrame { row, .. } => {
                if self.transition(row, TransitionPhase::Entered) {
                    self.view.remove_class(row, ENTER_CLASS);
                    self.view.add_class(row, ENTER_ACTIVE_CLASS);
                    scheduler.set_timeout(
                        self.timings.transition_ms,
                        FeedTask::EnterSettled(row).into(),
                    );
                }
            }
            FeedTask::EnterSettled(row) => {
                let Some(phase) = self.find(row).map(FeedRow::phase) else {
                    return;
                };
                self.view.remove_class(row, ENTER_ACTIVE_CLASS);
                if phase == TransitionPhase::Entered {
                    self.transition(row, TransitionPhase::Steady);
                }
            }
            FeedTask::ExitFrame { row, deferrals } if deferrals > 0 => {
                scheduler.request_frame(
                    FeedTask::ExitFrame {
                        row,
                        deferrals: deferrals - 1,
                    }
                    .into(),
                );
            }
            FeedTask::ExitFrame { row, .. } => {
                if self.transition(row, TransitionPhase::ExitActive) {
                    self.view.add_class(row, EXIT_ACTIVE_CLASS);
                }
            }
            FeedTask::Remove(row) => self.remove(row),
        }
    }

    /// One steady-state step: append the next record and retire the oldest
    /// live row once the list is over capacity.
    fn cycle<S, T>(&mut self, scheduler: &mut S)
    where
        S: Scheduler<T>,
        T: From<FeedTask>,
    {
        let id = self.push_row(TransitionPhase::Entering);
        // Two frames so the starting style is committed before the active one.
        scheduler.request_frame(
            FeedTask::EnterFrame {
                row: id,
                deferrals: 1,
            }
            .into(),
        );

        if self.live_len() <= self.timings.max_rows {
            return;
        }
        let Some(oldest) = self
            .rows
            .iter()
            .find(|row| !row.phase().is_leaving())
            .map(FeedRow::id)
        else {
            return;
        };
        if self.transition(oldest, TransitionPhase::Exiting) {
            self.view.add_class(oldest, EXIT_CLASS);
            scheduler.request_frame(
                FeedTask::ExitFrame {
                    row: oldest,
                    deferrals: 1,
                }
                .into(),
            );
            scheduler.set_timeout(self.timings.transition_ms, FeedTask::Remove(oldest).into());
        }
    }

    fn push_row(&mut self, phase: TransitionPhase) -> RowId {
        let id = RowId(self.next_row_id);
        self.next_row_id += 1;
        let position = self.cursor;
        let fixture_index = self.advance_cursor();
        let (_, record) = self.fixture.at(position);
        let row = FeedRow::new(id, fixture_index, record.clone(), phase);
        self.view.append_row(id, &row.markup());
        self.rows.push_back(row);
        id
    }

    fn lock_height<S, T>(&mut self, attempt: u8, scheduler: &mut S)
    where
        S: Scheduler<T>,
        T: From<FeedTask>,
    {
        if self.locked_height.is_some() {
            return;
        }
        let height = self.view.content_height();
        if height == 0 {
            if attempt < HEIGHT_LOCK_ATTEMPTS {
                scheduler.request_frame(
                    FeedTask::LockHeight {
                        attempt: attempt + 1,
                    }
                    .into(),
                );
            } else {
                tracing::warn!("Feed container never painted, height left unlocked");
            }
            return;
        }
        self.view.lock_height(height);
        self.locked_height = Some(height);
        tracing::info!("Feed container height locked at {}px", height);
    }

    fn remove(&mut self, id: RowId) {
        let Some(position) = self.rows.iter().position(|row| row.id() == id) else {
            return;
        };
        if let Some(mut row) = self.rows.remove(position) {
            if let Err(err) = row.advance(TransitionPhase::Removed) {
                tracing::warn!("{}", err);
            }
            self.view.remove_row(id);
        }
    }

    fn find(&self, id: RowId) -> Option<&FeedRow> {
        self.rows.iter().find(|row| row.id() == id)
    }

    fn transition(&mut self, id: RowId, next: TransitionPhase) -> bool {
        let Some(row) = self.rows.iter_mut().find(|row| row.id() == id) else {
            return false;
        };
        match row.advance(next) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!("{}", err);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::fixture::FeedRecord;
    use crate::feed::row::RowMarkup;
    use crate::scheduler::ManualScheduler;

    const ROW_HEIGHT: u32 = 58;

    #[derive(Default)]
    struct MemoryList {
        rows: Vec<(RowId, Vec<String>)>,
        locked: Option<u32>,
        lock_calls: usize,
        painted: bool,
    }

    impl MemoryList {
        fn classes(&self, id: RowId) -> Vec<String> {
            self.rows
                .iter()
                .find(|(row, _)| *row == id)
                .map(|(_, classes)| classes.clone())
                .unwrap_or_default()
        }

        fn rendered_height(&self) -> u32 {
            self.locked.unwrap_or_else(|| self.content_height())
        }
    }

    impl FeedView for MemoryList {
        fn clear(&mut self) {
            self.rows.clear();
        }

        fn append_row(&mut self, id: RowId, row: &RowMarkup) {
            let classes = row.classes.iter().map(|c| c.to_string()).collect();
            self.rows.push((id, classes));
        }

        fn add_class(&mut self, id: RowId, class: &str) {
            if let Some((_, classes)) = self.rows.iter_mut().find(|(row, _)| *row == id) {
                classes.push(class.to_string());
            }
        }

        fn remove_class(&mut self, id: RowId, class: &str) {
            if let Some((_, classes)) = self.rows.iter_mut().find(|(row, _)| *row == id) {
                classes.retain(|c| c != class);
            }
        }

        fn remove_row(&mut self, id: RowId) {
            self.rows.retain(|(row, _)| *row != id);
        }

        fn content_height(&self) -> u32 {
            if self.painted {
                self.rows.len() as u32 * ROW_HEIGHT
            } else {
                0
            }
        }

        fn lock_height(&mut self, px: u32) {
            self.locked = Some(px);
            self.lock_calls += 1;
        }
    }

    fn painted_queue() -> FeedQueue<MemoryList> {
        let view = MemoryList {
            painted: true,
            ..MemoryList::default()
        };
        FeedQueue::new(view, Fixture::builtin(), FeedTimings::default())
    }

    fn run(queue: &mut FeedQueue<MemoryList>, scheduler: &mut ManualScheduler<FeedTask>, until: u64) {
        scheduler.run_until(until, |task, s| queue.handle(task, s));
    }

    fn indices(queue: &FeedQueue<MemoryList>) -> Vec<usize> {
        queue.rows().map(FeedRow::fixture_index).collect()
    }

    #[test]
    fn populates_max_rows_without_animation() {
        let mut queue = painted_queue();
        let mut scheduler = ManualScheduler::<FeedTask>::new(16);
        queue.populate(&mut scheduler);

        assert_eq!(queue.len(), 6);
        assert_eq!(queue.cursor(), 6);
        assert_eq!(indices(&queue), vec![0, 1, 2, 3, 4, 5]);
        assert!(queue.rows().all(|row| row.phase() == TransitionPhase::Steady));
        assert!(!queue.view().classes(RowId(0)).contains(&ENTER_CLASS.to_string()));
    }

    #[test]
    fn short_fixture_cycles_during_population() {
        let record = Fixture::builtin().at(0).1.clone();
        let other = FeedRecord {
            display_name: "B*c".to_string(),
            ..record.clone()
        };
        let fixture = Fixture::new(vec![record, other]).unwrap();
        let mut queue = FeedQueue::new(MemoryList::default(), fixture, FeedTimings::default());
        queue.populate(&mut ManualScheduler::<FeedTask>::new(16));
        assert_eq!(indices(&queue), vec![0, 1, 0, 1, 0, 1]);
    }

    #[test]
    fn first_cycle_appends_sixth_record_and_retires_first() {
        let mut queue = painted_queue();
        let mut scheduler = ManualScheduler::<FeedTask>::new(16);
        queue.populate(&mut scheduler);

        run(&mut queue, &mut scheduler, 3800);
        assert_eq!(queue.len(), 7);
        assert_eq!(queue.live_len(), 6);
        assert_eq!(queue.rows().last().unwrap().fixture_index(), 6);
        assert_eq!(queue.rows().next().unwrap().phase(), TransitionPhase::Exiting);
        assert!(queue.view().classes(RowId(0)).contains(&EXIT_CLASS.to_string()));

        run(&mut queue, &mut scheduler, 3800 + 460);
        assert_eq!(indices(&queue), vec![1, 2, 3, 4, 5, 6]);
        assert!(queue.view().classes(RowId(0)).is_empty());
    }

    #[test]
    fn enter_transition_waits_two_frames() {
        let mut queue = painted_queue();
        let mut scheduler = ManualScheduler::<FeedTask>::new(16);
        queue.populate(&mut scheduler);
        run(&mut queue, &mut scheduler, 3800);

        let new_row = RowId(6);
        assert!(queue.view().classes(new_row).contains(&ENTER_CLASS.to_string()));

        // First frame after the cycle: still on the starting style.
        run(&mut queue, &mut scheduler, 3808);
        assert_eq!(queue.rows().last().unwrap().phase(), TransitionPhase::Entering);

        // Second frame: active transition applied.
        run(&mut queue, &mut scheduler, 3824);
        assert_eq!(queue.rows().last().unwrap().phase(), TransitionPhase::Entered);
        let classes = queue.view().classes(new_row);
        assert!(classes.contains(&ENTER_ACTIVE_CLASS.to_string()));
        assert!(!classes.contains(&ENTER_CLASS.to_string()));

        run(&mut queue, &mut scheduler, 3824 + 460);
        assert_eq!(queue.rows().last().unwrap().phase(), TransitionPhase::Steady);
        assert!(queue.view().classes(new_row).iter().all(|c| c != ENTER_ACTIVE_CLASS));
    }

    #[test]
    fn exit_transition_is_applied_on_the_second_frame() {
        let mut queue = painted_queue();
        let mut scheduler = ManualScheduler::<FeedTask>::new(16);
        queue.populate(&mut scheduler);
        run(&mut queue, &mut scheduler, 3808);
        assert_eq!(queue.rows().next().unwrap().phase(), TransitionPhase::Exiting);

        run(&mut queue, &mut scheduler, 3824);
        assert_eq!(queue.rows().next().unwrap().phase(), TransitionPhase::ExitActive);
        assert!(queue.view().classes(RowId(0)).contains(&EXIT_ACTIVE_CLASS.to_string()));
    }

    #[test]
    fn height_is_locked_once_and_never_changes() {
        let mut queue = painted_queue();
        let mut scheduler = ManualScheduler::<FeedTask>::new(16);
        queue.populate(&mut scheduler);
        run(&mut queue, &mut scheduler, 16);

        let locked = queue.locked_height().unwrap();
        assert_eq!(locked, 6 * ROW_HEIGHT);

        for cycle in 1..=25u64 {
            run(&mut queue, &mut scheduler, cycle * 3800 + 100);
            // Mid-transition the container holds an extra row, but is pinned.
            assert_eq!(queue.view().rendered_height(), locked);
        }
        assert_eq!(queue.view().lock_calls, 1);
    }

    #[test]
    fn height_lock_waits_for_first_paint() {
        let mut queue = FeedQueue::new(
            MemoryList::default(),
            Fixture::builtin(),
            FeedTimings::default(),
        );
        let mut scheduler = ManualScheduler::<FeedTask>::new(16);
        queue.populate(&mut scheduler);
        run(&mut queue, &mut scheduler, 32);
        assert_eq!(queue.locked_height(), None);

        queue.view.painted = true;
        run(&mut queue, &mut scheduler, 48);
        assert_eq!(queue.locked_height(), Some(6 * ROW_HEIGHT));
    }

    #[test]
    fn height_lock_gives_up_on_a_container_that_never_paints() {
        let mut queue = FeedQueue::new(
            MemoryList::default(),
            Fixture::builtin(),
            FeedTimings::default(),
        );
        let mut scheduler = ManualScheduler::<FeedTask>::new(16);
        queue.populate(&mut scheduler);
        run(&mut queue, &mut scheduler, 1000);
        assert_eq!(queue.locked_height(), None);
        assert_eq!(scheduler.pending_frames(), 0);
    }

    #[test]
    fn never_more_than_six_rows_between_cycles() {
        let mut queue = painted_queue();
        let mut scheduler = ManualScheduler::<FeedTask>::new(16);
        queue.populate(&mut scheduler);

        for cycle in 1..=40u64 {
            let start = cycle * 3800;
            run(&mut queue, &mut scheduler, start);
            assert!(queue.live_len() <= 6);
            assert!(queue.len() <= 7);
            run(&mut queue, &mut scheduler, start + 600);
            assert_eq!(queue.len(), 6);
            assert!(queue.rows().all(|row| row.phase() == TransitionPhase::Steady));
        }
    }

    #[test]
    fn cursor_position_maps_to_fixture_modulo_length() {
        let mut queue = painted_queue();
        let mut scheduler = ManualScheduler::<FeedTask>::new(16);
        queue.populate(&mut scheduler);

        for cycle in 1..=30u64 {
            run(&mut queue, &mut scheduler, cycle * 3800);
            let position = 5 + cycle;
            assert_eq!(
                queue.rows().last().unwrap().fixture_index() as u64,
                position % 12
            );
        }
    }

    #[test]
    fn populate_runs_once() {
        let mut queue = painted_queue();
        let mut scheduler = ManualScheduler::<FeedTask>::new(16);
        queue.populate(&mut scheduler);
        queue.populate(&mut scheduler);
        assert_eq!(queue.len(), 6);
        assert_eq!(queue.cursor(), 6);
        assert!(queue.is_running());
    }
}
