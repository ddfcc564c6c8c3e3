//! Feature detection against the running browser.

use js_sys::{Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlImageElement, Performance, PerformanceResourceTiming, Window};

use crate::progress::{ResourceSample, ResourceTimingSource};

pub struct PerformanceResources {
    performance: Performance,
}

impl ResourceTimingSource for PerformanceResources {
    fn sample(&self) -> ResourceSample {
        let entries = self.performance.get_entries_by_type("resource");
        let total = entries.length() as usize;
        let done = entries
            .iter()
            .filter_map(|entry| entry.dyn_into::<PerformanceResourceTiming>().ok())
            .filter(|entry| entry.response_end() > 0.0)
            .count();
        ResourceSample { done, total }
    }
}

fn has_property(target: &JsValue, name: &str) -> bool {
    Reflect::has(target, &JsValue::from_str(name)).unwrap_or(false)
}

pub fn resource_timing(window: &Window) -> Option<PerformanceResources> {
    let performance = window.performance()?;
    if !has_property(&performance, "getEntriesByType") {
        return None;
    }
    Some(PerformanceResources { performance })
}

/// The font set's ready promise, when the font loading API exists.
pub fn fonts_ready(document: &Document) -> Option<Promise> {
    if !has_property(document, "fonts") {
        return None;
    }
    document.fonts().ready().ok()
}

pub fn page_images(document: &Document) -> Vec<HtmlImageElement> {
    let Ok(nodes) = document.query_selector_all("img") else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|index| nodes.item(index))
        .filter_map(|node| node.dyn_into::<HtmlImageElement>().ok())
        .collect()
}
