//! Browser bindings: finds the render targets, detects capabilities and
//! feeds DOM lifecycle events into a [`LandingPage`].

pub mod capability;
pub mod glue;
pub mod logging;
pub mod scheduler;
pub mod views;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Document, DocumentReadyState, Event, EventTarget};

use crate::config::LandingConfig;
use crate::error::LandingError;
use crate::feed::Fixture;
use crate::page::{DocumentPhase, ImageCensus, LandingPage, SettleOnce};
use crate::progress::{Capabilities, ReadinessSignal};
use scheduler::BrowserScheduler;
use views::{DomFeedView, DomProgressView};

pub type WebPage = LandingPage<DomProgressView, DomFeedView>;

const CONFIG_ID: &str = "landing-config";
const FIXTURE_ID: &str = "landing-feed";

thread_local! {
    // Timers and listeners only hold weak references; this keeps the page alive.
    static MOUNTED: RefCell<Option<Rc<RefCell<WebPage>>>> = const { RefCell::new(None) };
}

pub(crate) fn js_error(err: JsValue) -> LandingError {
    LandingError::Host(format!("{:?}", err))
}

pub(crate) fn listen(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut() + 'static,
) -> Result<(), LandingError> {
    let callback = Closure::<dyn FnMut()>::new(handler);
    target
        .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
        .map_err(js_error)?;
    callback.forget();
    Ok(())
}

pub(crate) fn listen_event(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), LandingError> {
    let callback = Closure::<dyn FnMut(Event)>::new(handler);
    target
        .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
        .map_err(js_error)?;
    callback.forget();
    Ok(())
}

fn json_block(document: &Document, id: &str) -> Option<String> {
    document.get_element_by_id(id)?.text_content()
}

fn read_config(document: &Document) -> LandingConfig {
    let Some(raw) = json_block(document, CONFIG_ID) else {
        return LandingConfig::default();
    };
    LandingConfig::from_json_str(&raw).unwrap_or_else(|err| {
        tracing::warn!("Ignoring #{}: {}", CONFIG_ID, err);
        LandingConfig::default()
    })
}

fn read_fixture(document: &Document) -> Fixture {
    let Some(raw) = json_block(document, FIXTURE_ID) else {
        return Fixture::builtin();
    };
    Fixture::from_json_str(&raw).unwrap_or_else(|err| {
        tracing::warn!("Ignoring #{}: {}", FIXTURE_ID, err);
        Fixture::builtin()
    })
}

#[wasm_bindgen(start)]
pub fn start() {
    logging::init();
    if let Err(err) = mount() {
        tracing::warn!("Landing page behaviour not mounted: {}", err);
    }
}

pub fn mount() -> Result<(), LandingError> {
    let window = web_sys::window().ok_or(LandingError::MissingTarget("window"))?;
    let document = window
        .document()
        .ok_or(LandingError::MissingTarget("document"))?;

    let config = read_config(&document);
    let capabilities = match capability::resource_timing(&window) {
        Some(source) => Capabilities::with_resource_timing(source),
        None => Capabilities::none(),
    };
    let page = Rc::new(RefCell::new(LandingPage::mount(
        &config,
        DomProgressView::find(&document),
        DomFeedView::find(&document),
        read_fixture(&document),
        capabilities,
    )));
    let scheduler = BrowserScheduler::new(window.clone(), &page);
    MOUNTED.with(|mounted| *mounted.borrow_mut() = Some(Rc::clone(&page)));
    scheduler.with_page(|page, scheduler| page.start(scheduler));

    if document_phase(&document).is_parsed() {
        on_dom_ready(&document, &scheduler);
    } else {
        let ready_document = document.clone();
        let ready_scheduler = scheduler.clone();
        let fired = SettleOnce::new();
        listen(&document, "DOMContentLoaded", move || {
            if fired.settle() {
                on_dom_ready(&ready_document, &ready_scheduler);
            }
        })?;
    }

    let phase = document_phase(&document);
    let mut caught_up = false;
    scheduler.with_page(|page, scheduler| caught_up = page.catch_up(phase, scheduler));
    if !caught_up {
        let load_scheduler = scheduler.clone();
        listen(&window, "load", move || {
            load_scheduler
                .with_page(|page, scheduler| page.signal(ReadinessSignal::FullLoad, scheduler));
        })?;
    }

    glue::wire_header(&window, &document)?;
    glue::wire_faq(&document)?;
    glue::wire_mobile_nav(&document)?;
    glue::wire_counters(&window, &document)?;
    glue::wire_anchor_scroll(&window, &document)?;
    glue::wire_scroll_spy(&document)?;
    Ok(())
}

fn document_phase(document: &Document) -> DocumentPhase {
    match document.ready_state() {
        DocumentReadyState::Loading => DocumentPhase::Loading,
        DocumentReadyState::Interactive => DocumentPhase::Interactive,
        _ => DocumentPhase::Complete,
    }
}

fn on_dom_ready(document: &Document, scheduler: &BrowserScheduler) {
    let images = capability::page_images(document);
    let census = ImageCensus {
        total: images.len(),
        already_complete: images.iter().filter(|image| image.complete()).count(),
    };
    scheduler.with_page(|page, scheduler| page.dom_ready(census, scheduler));

    for image in images.iter().filter(|image| !image.complete()) {
        let settled = Rc::new(SettleOnce::new());
        for event in ["load", "error"] {
            let settled = Rc::clone(&settled);
            let image_scheduler = scheduler.clone();
            let result = listen(image, event, move || {
                if settled.settle() {
                    image_scheduler.with_page(|page, scheduler| page.image_settled(scheduler));
                }
            });
            if let Err(err) = result {
                tracing::warn!("Image listener not attached: {}", err);
            }
        }
    }

    if let Some(promise) = capability::fonts_ready(document) {
        let fonts_scheduler = scheduler.clone();
        spawn_local(async move {
            // A rejected font promise counts the same as a resolved one.
            let _ = JsFuture::from(promise).await;
            fonts_scheduler
                .with_page(|page, scheduler| page.signal(ReadinessSignal::FontsReady, scheduler));
        });
    }
}
