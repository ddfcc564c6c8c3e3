use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::{Rc, Weak};

use gloo_timers::callback::Timeout;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Window;

use super::WebPage;
use crate::page::Task;
use crate::scheduler::{Scheduler, TimerId};

/// Frame fallback when `requestAnimationFrame` is refused.
const FALLBACK_FRAME_MS: u32 = 16;

#[derive(Default)]
struct TimerBook {
    next_id: u64,
    live: HashSet<TimerId>,
}

/// Runs page tasks on browser timers and animation frames.
///
/// Timeouts are forgotten `gloo_timers` handles; cancellation only removes
/// the id from the live set, so a cancelled timer fires into a no-op.
/// Intervals re-arm a fresh timeout before dispatching, which lets a task
/// clear its own interval.
#[derive(Clone)]
pub struct BrowserScheduler {
    window: Window,
    page: Weak<RefCell<WebPage>>,
    book: Rc<RefCell<TimerBook>>,
}

impl BrowserScheduler {
    pub fn new(window: Window, page: &Rc<RefCell<WebPage>>) -> Self {
        Self {
            window,
            page: Rc::downgrade(page),
            book: Rc::new(RefCell::new(TimerBook::default())),
        }
    }

    /// Runs `f` against the page with a scheduler handle. Skipped when the
    /// page is gone or already borrowed further up the stack.
    pub fn with_page(&self, f: impl FnOnce(&mut WebPage, &mut BrowserScheduler)) {
        let Some(page) = self.page.upgrade() else {
            return;
        };
        let mut scheduler = self.clone();
        match page.try_borrow_mut() {
            Ok(mut page) => f(&mut *page, &mut scheduler),
            Err(_) => tracing::warn!("Page busy, dropping re-entrant callback"),
        };
    }

    fn register(&self) -> TimerId {
        let mut book = self.book.borrow_mut();
        book.next_id += 1;
        let id = TimerId(book.next_id);
        book.live.insert(id);
        id
    }

    fn arm(&self, id: TimerId, delay_ms: u32, task: Task, period_ms: Option<u32>) {
        let this = self.clone();
        Timeout::new(delay_ms, move || {
            if !this.book.borrow().live.contains(&id) {
                return;
            }
            match period_ms {
                Some(period) => this.arm(id, period, task, Some(period)),
                None => {
                    this.book.borrow_mut().live.remove(&id);
                }
            }
            this.with_page(|page, scheduler| page.dispatch(task, scheduler));
        })
        .forget();
    }
}

impl Scheduler<Task> for BrowserScheduler {
    fn now_ms(&self) -> f64 {
        self.window
            .performance()
            .map(|performance| performance.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    fn set_timeout(&mut self, delay_ms: u32, task: Task) -> TimerId {
        let id = self.register();
        self.arm(id, delay_ms, task, None);
        id
    }

    fn set_interval(&mut self, period_ms: u32, task: Task) -> TimerId {
        let id = self.register();
        let period = period_ms.max(1);
        self.arm(id, period, task, Some(period));
        id
    }

    fn clear_timer(&mut self, id: TimerId) {
        self.book.borrow_mut().live.remove(&id);
    }

    fn request_frame(&mut self, task: Task) {
        let this = self.clone();
        let callback = Closure::once_into_js(move |_timestamp: f64| {
            this.with_page(|page, scheduler| page.dispatch(task, scheduler));
        });
        if let Err(err) = self.window.request_animation_frame(callback.unchecked_ref()) {
            tracing::warn!("requestAnimationFrame refused ({:?}), using a timeout", err);
            let id = self.register();
            self.arm(id, FALLBACK_FRAME_MS, task, None);
        }
    }
}
