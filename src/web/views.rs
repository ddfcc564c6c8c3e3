use std::collections::HashMap;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, SvgElement};

use crate::feed::{RowId, RowMarkup};
use crate::view::{FeedView, ProgressFrame, ProgressView};

pub const LOADER_ID: &str = "wt-loader";
pub const LOADER_BAR_ID: &str = "wtl-bar";
pub const LOADER_PERCENT_ID: &str = "wtl-percent";
pub const LOADER_STATUS_ID: &str = "wtl-status";
pub const LOADER_ARC_SELECTOR: &str = ".wtl-ring-arc";
pub const LOADER_HIDDEN_CLASS: &str = "wtl-hidden";
pub const FEED_LIST_ID: &str = "rt-list";

fn warn_on_err(result: Result<(), JsValue>, what: &str) {
    if let Err(err) = result {
        tracing::warn!("Failed to {}: {:?}", what, err);
    }
}

pub struct DomProgressView {
    root: Element,
    bar: Option<HtmlElement>,
    percent: Option<Element>,
    status: Option<Element>,
    arc: Option<SvgElement>,
}

impl DomProgressView {
    /// `None` when the page has no loader; the inner parts are each optional.
    pub fn find(document: &Document) -> Option<Self> {
        let root = document.get_element_by_id(LOADER_ID)?;
        let arc = root
            .query_selector(LOADER_ARC_SELECTOR)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<SvgElement>().ok());
        Some(Self {
            bar: document
                .get_element_by_id(LOADER_BAR_ID)
                .and_then(|el| el.dyn_into::<HtmlElement>().ok()),
            percent: document.get_element_by_id(LOADER_PERCENT_ID),
            status: document.get_element_by_id(LOADER_STATUS_ID),
            arc,
            root,
        })
    }
}

impl ProgressView for DomProgressView {
    fn render(&mut self, frame: &ProgressFrame) {
        if let Some(bar) = &self.bar {
            warn_on_err(bar.style().set_property("width", &frame.bar_width()), "size progress bar");
        }
        if let Some(percent) = &self.percent {
            percent.set_text_content(Some(&frame.percent_text()));
        }
        if let Some(arc) = &self.arc {
            warn_on_err(
                arc.style()
                    .set_property("stroke-dashoffset", &frame.arc_offset_css()),
                "offset progress ring",
            );
        }
        if let (Some(status), Some(text)) = (&self.status, &frame.status) {
            status.set_text_content(Some(text));
        }
    }

    fn hide(&mut self) {
        warn_on_err(self.root.class_list().add_1(LOADER_HIDDEN_CLASS), "hide loader");
    }

    fn detach(&mut self) {
        self.root.remove();
    }
}

pub struct DomFeedView {
    document: Document,
    list: HtmlElement,
    rows: HashMap<RowId, Element>,
}

impl DomFeedView {
    pub fn find(document: &Document) -> Option<Self> {
        let list = document
            .get_element_by_id(FEED_LIST_ID)?
            .dyn_into::<HtmlElement>()
            .ok()?;
        Some(Self {
            document: document.clone(),
            list,
            rows: HashMap::new(),
        })
    }
}

impl FeedView for DomFeedView {
    fn clear(&mut self) {
        self.list.set_inner_html("");
        self.rows.clear();
    }

    fn append_row(&mut self, id: RowId, row: &RowMarkup) {
        let element = match self.document.create_element("div") {
            Ok(element) => element,
            Err(err) => {
                tracing::warn!("Failed to create {}: {:?}", id, err);
                return;
            }
        };
        element.set_class_name(&row.class_name());
        element.set_inner_html(&row.inner_html());
        if let Err(err) = self.list.append_child(&element) {
            tracing::warn!("Failed to append {}: {:?}", id, err);
            return;
        }
        self.rows.insert(id, element);
    }

    fn add_class(&mut self, id: RowId, class: &str) {
        if let Some(element) = self.rows.get(&id) {
            warn_on_err(element.class_list().add_1(class), "add row class");
        }
    }

    fn remove_class(&mut self, id: RowId, class: &str) {
        if let Some(element) = self.rows.get(&id) {
            warn_on_err(element.class_list().remove_1(class), "remove row class");
        }
    }

    fn remove_row(&mut self, id: RowId) {
        if let Some(element) = self.rows.remove(&id) {
            element.remove();
        }
    }

    fn content_height(&self) -> u32 {
        self.list.scroll_height().max(0) as u32
    }

    fn lock_height(&mut self, px: u32) {
        let value = format!("{}px", px);
        let style = self.list.style();
        for property in ["height", "min-height", "max-height"] {
            warn_on_err(style.set_property(property, &value), "lock feed height");
        }
    }
}
