//! Page glue outside the core: header shading, the FAQ accordion, the mobile
//! drawer, counters, anchor scrolling and the scroll-spy.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Array;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, NodeList, ScrollBehavior, ScrollToOptions, Window,
};

use super::{js_error, listen, listen_event};
use crate::error::LandingError;
use crate::glue::accordion::FaqAccordion;
use crate::glue::anchor::{anchor_scroll_top, anchor_selector};
use crate::glue::counter::CountUp;
use crate::glue::header::HeaderScroll;
use crate::glue::nav::{MobileNav, NAV_ACTIVE_CLASS};
use crate::glue::spy::{ScrollSpy, SPY_ACTIVE_BACKGROUND, SPY_ACTIVE_COLOR};

const HEADER_ID: &str = "site-header";
const HEADER_SCROLLED_CLASS: &str = "scrolled";
const FAQ_BUTTON_SELECTOR: &str = ".faq-q";
const FAQ_OPEN_CLASS: &str = "open";

pub fn wire_header(window: &Window, document: &Document) -> Result<(), LandingError> {
    let Some(header) = document.get_element_by_id(HEADER_ID) else {
        return Ok(());
    };
    let state = Rc::new(RefCell::new(HeaderScroll::default()));
    let scroll_window = window.clone();
    listen(window, "scroll", move || {
        if !state.borrow_mut().on_scroll() {
            return;
        }
        let state = Rc::clone(&state);
        let header = header.clone();
        let frame_window = scroll_window.clone();
        let callback = Closure::once_into_js(move |_timestamp: f64| {
            let offset = frame_window.scroll_y().unwrap_or(0.0);
            let scrolled = state.borrow_mut().on_frame(offset);
            let _ = header
                .class_list()
                .toggle_with_force(HEADER_SCROLLED_CLASS, scrolled);
        });
        let _ = scroll_window.request_animation_frame(callback.unchecked_ref());
    })
}

pub fn wire_faq(document: &Document) -> Result<(), LandingError> {
    let buttons = document
        .query_selector_all(FAQ_BUTTON_SELECTOR)
        .map_err(js_error)?;

    let mut accordion = FaqAccordion::new();
    let mut items: Vec<Element> = Vec::new();
    let mut groups: Vec<Element> = Vec::new();
    let mut bindings = Vec::new();

    for index in 0..buttons.length() {
        let Some(button) = buttons
            .item(index)
            .and_then(|node| node.dyn_into::<Element>().ok())
        else {
            continue;
        };
        let Ok(Some(item)) = button.closest(".faq-item") else {
            continue;
        };
        let group = item
            .closest(".faq-list")
            .ok()
            .flatten()
            .or_else(|| item.closest(".faq-col").ok().flatten())
            .map(|list| match groups.iter().position(|known| *known == list) {
                Some(position) => position,
                None => {
                    groups.push(list);
                    groups.len() - 1
                }
            });
        let open = item.class_list().contains(FAQ_OPEN_CLASS);
        let slot = accordion.add_item(group, open);
        items.push(item);
        bindings.push((button, slot));
    }

    let accordion = Rc::new(RefCell::new(accordion));
    let items = Rc::new(items);
    for (button, slot) in bindings {
        let accordion = Rc::clone(&accordion);
        let items = Rc::clone(&items);
        listen(&button, "click", move || {
            for (changed, open) in accordion.borrow_mut().toggle(slot) {
                if let Some(item) = items.get(changed) {
                    let _ = item.class_list().toggle_with_force(FAQ_OPEN_CLASS, open);
                }
            }
        })?;
    }
    Ok(())
}

fn elements(nodes: &NodeList) -> Vec<Element> {
    (0..nodes.length())
        .filter_map(|index| nodes.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// Calls `on_visible` for each of `targets` whenever it crosses `threshold`
/// into view.
fn observe(
    targets: &[Element],
    threshold: f64,
    mut on_visible: impl FnMut(Element) + 'static,
) -> Result<(), LandingError> {
    let callback = Closure::<dyn FnMut(Array)>::new(move |entries: Array| {
        for entry in entries.iter() {
            let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                continue;
            };
            if entry.is_intersecting() {
                on_visible(entry.target());
            }
        }
    });
    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(threshold));
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)
            .map_err(js_error)?;
    callback.forget();
    for target in targets {
        observer.observe(target);
    }
    Ok(())
}

const HAMBURGER_ID: &str = "hamburger";
const MOBILE_NAV_ID: &str = "mobile-nav";
const MOBILE_OVERLAY_ID: &str = "mobile-overlay";
const MOBILE_CLOSE_ID: &str = "mobile-nav-close";

pub fn wire_mobile_nav(document: &Document) -> Result<(), LandingError> {
    let hamburger = document.get_element_by_id(HAMBURGER_ID);
    let drawer = document.get_element_by_id(MOBILE_NAV_ID);
    let overlay = document.get_element_by_id(MOBILE_OVERLAY_ID);
    if hamburger.is_none() && drawer.is_none() {
        return Ok(());
    }

    let parts: Rc<Vec<Element>> = Rc::new(
        [&drawer, &overlay, &hamburger]
            .into_iter()
            .flatten()
            .cloned()
            .collect(),
    );
    let body = document.body();
    let nav = Rc::new(RefCell::new(MobileNav::default()));
    let apply = move |open: bool| {
        let mut nav = nav.borrow_mut();
        let changed = if open { nav.open() } else { nav.close() };
        if !changed {
            return;
        }
        for part in parts.iter() {
            let _ = part.class_list().toggle_with_force(NAV_ACTIVE_CLASS, open);
        }
        if let Some(body) = &body {
            let _ = body.style().set_property("overflow", nav.body_overflow());
        }
    };
    let apply = Rc::new(apply);

    if let Some(hamburger) = &hamburger {
        let apply = Rc::clone(&apply);
        listen(hamburger, "click", move || apply(true))?;
    }
    let mut closers: Vec<Element> = overlay.iter().cloned().collect();
    closers.extend(document.get_element_by_id(MOBILE_CLOSE_ID));
    if let Some(drawer) = &drawer {
        let links = drawer.query_selector_all("a").map_err(js_error)?;
        closers.extend(elements(&links));
    }
    for closer in closers {
        let apply = Rc::clone(&apply);
        listen(&closer, "click", move || apply(false))?;
    }
    Ok(())
}

const COUNTER_SELECTOR: &str = "[data-count]";
const COUNTED_ATTR: &str = "data-counted";
const COUNTER_THRESHOLD: f64 = 0.3;

pub fn wire_counters(window: &Window, document: &Document) -> Result<(), LandingError> {
    let counters = elements(&document.query_selector_all(COUNTER_SELECTOR).map_err(js_error)?);
    if counters.is_empty() {
        return Ok(());
    }
    let window = window.clone();
    observe(&counters, COUNTER_THRESHOLD, move |element| {
        if element.has_attribute(COUNTED_ATTR) {
            return;
        }
        let _ = element.set_attribute(COUNTED_ATTR, "true");
        let started_at = window.performance().map_or(0.0, |performance| performance.now());
        let count = element.get_attribute("data-count").and_then(|raw| {
            CountUp::from_attributes(
                &raw,
                element.get_attribute("data-suffix").as_deref(),
                started_at,
            )
        });
        match count {
            Some(count) => count_frame(window.clone(), element, count),
            None => tracing::debug!("Counter without a numeric data-count"),
        }
    })
}

fn count_frame(window: Window, element: Element, count: CountUp) {
    let next_window = window.clone();
    let callback = Closure::once_into_js(move |timestamp: f64| {
        let frame = count.frame(timestamp);
        element.set_text_content(Some(&frame.text));
        if !frame.done {
            count_frame(next_window, element, count);
        }
    });
    if let Err(err) = window.request_animation_frame(callback.unchecked_ref()) {
        tracing::warn!("Counter frame refused: {:?}", err);
    }
}

const ANCHOR_SELECTOR: &str = r##"a[href^="#"]"##;

pub fn wire_anchor_scroll(window: &Window, document: &Document) -> Result<(), LandingError> {
    let anchors = elements(&document.query_selector_all(ANCHOR_SELECTOR).map_err(js_error)?);
    for anchor in anchors {
        let window = window.clone();
        let document = document.clone();
        let href_source = anchor.clone();
        listen_event(&anchor, "click", move |event| {
            let Some(href) = href_source.get_attribute("href") else {
                return;
            };
            let Some(selector) = anchor_selector(&href) else {
                return;
            };
            let Some(target) = document.query_selector(selector).ok().flatten() else {
                return;
            };
            event.prevent_default();
            let header_height = document
                .get_element_by_id(HEADER_ID)
                .and_then(|header| header.dyn_into::<HtmlElement>().ok())
                .map(|header| f64::from(header.offset_height()));
            let top = anchor_scroll_top(
                target.get_bounding_client_rect().top(),
                window.scroll_y().unwrap_or(0.0),
                header_height,
            );
            let options = ScrollToOptions::new();
            options.set_top(top);
            options.set_behavior(ScrollBehavior::Smooth);
            window.scroll_to_with_scroll_to_options(&options);
        })?;
    }
    Ok(())
}

const SPY_LINK_SELECTOR: &str = r##".main-nav a[href^="#"]"##;
const SPY_SECTION_SELECTOR: &str = "section[id], div[id]";
const SPY_THRESHOLD: f64 = 0.4;

pub fn wire_scroll_spy(document: &Document) -> Result<(), LandingError> {
    let links: Vec<HtmlElement> =
        elements(&document.query_selector_all(SPY_LINK_SELECTOR).map_err(js_error)?)
            .into_iter()
            .filter_map(|link| link.dyn_into::<HtmlElement>().ok())
            .collect();
    if links.is_empty() {
        return Ok(());
    }
    let spy = ScrollSpy::new(
        links
            .iter()
            .map(|link| link.get_attribute("href").unwrap_or_default()),
    );
    let spy = RefCell::new(spy);
    let sections = elements(&document.query_selector_all(SPY_SECTION_SELECTOR).map_err(js_error)?);
    observe(&sections, SPY_THRESHOLD, move |section| {
        let active = spy.borrow_mut().section_entered(&section.id());
        for link in &links {
            let style = link.style();
            let _ = style.remove_property("color");
            let _ = style.remove_property("background");
        }
        if let Some(link) = active.and_then(|index| links.get(index)) {
            let style = link.style();
            let _ = style.set_property("color", SPY_ACTIVE_COLOR);
            let _ = style.set_property("background", SPY_ACTIVE_BACKGROUND);
        }
    })
}
