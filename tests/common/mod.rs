#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use landing_live::feed::{RowId, RowMarkup};
use landing_live::view::{FeedView, ProgressFrame, ProgressView};
use landing_live::{LandingPage, ManualScheduler, Task};

pub const ROW_HEIGHT: u32 = 64;

/// Everything the indicator was asked to show, shared so tests can read it
/// while the page owns the view.
#[derive(Debug, Default)]
pub struct ProgressLog {
    pub percents: Vec<u8>,
    pub statuses: Vec<String>,
    pub hidden: usize,
    pub detached: usize,
}

#[derive(Clone, Default)]
pub struct RecordingProgress {
    pub log: Rc<RefCell<ProgressLog>>,
}

impl ProgressView for RecordingProgress {
    fn render(&mut self, frame: &ProgressFrame) {
        let mut log = self.log.borrow_mut();
        log.percents.push(frame.percent);
        if let Some(status) = &frame.status {
            log.statuses.push(status.clone());
        }
    }

    fn hide(&mut self) {
        self.log.borrow_mut().hidden += 1;
    }

    fn detach(&mut self) {
        self.log.borrow_mut().detached += 1;
    }
}

#[derive(Debug, Default)]
pub struct ListState {
    pub rows: Vec<(RowId, Vec<String>)>,
    pub locked: Option<u32>,
    pub lock_calls: usize,
}

impl ListState {
    pub fn rendered_height(&self) -> u32 {
        self.locked
            .unwrap_or(self.rows.len() as u32 * ROW_HEIGHT)
    }
}

#[derive(Clone, Default)]
pub struct MemoryFeed {
    pub state: Rc<RefCell<ListState>>,
}

impl FeedView for MemoryFeed {
    fn clear(&mut self) {
        self.state.borrow_mut().rows.clear();
    }

    fn append_row(&mut self, id: RowId, row: &RowMarkup) {
        let classes = row.classes.iter().map(|c| c.to_string()).collect();
        self.state.borrow_mut().rows.push((id, classes));
    }

    fn add_class(&mut self, id: RowId, class: &str) {
        let mut state = self.state.borrow_mut();
        if let Some((_, classes)) = state.rows.iter_mut().find(|(row, _)| *row == id) {
            classes.push(class.to_string());
        }
    }

    fn remove_class(&mut self, id: RowId, class: &str) {
        let mut state = self.state.borrow_mut();
        if let Some((_, classes)) = state.rows.iter_mut().find(|(row, _)| *row == id) {
            classes.retain(|c| c != class);
        }
    }

    fn remove_row(&mut self, id: RowId) {
        self.state.borrow_mut().rows.retain(|(row, _)| *row != id);
    }

    fn content_height(&self) -> u32 {
        self.state.borrow().rows.len() as u32 * ROW_HEIGHT
    }

    fn lock_height(&mut self, px: u32) {
        let mut state = self.state.borrow_mut();
        state.locked = Some(px);
        state.lock_calls += 1;
    }
}

pub type TestPage = LandingPage<RecordingProgress, MemoryFeed>;

pub fn run(page: &mut TestPage, scheduler: &mut ManualScheduler<Task>, until: u64) {
    scheduler.run_until(until, |task, s| page.dispatch(task, s));
}
