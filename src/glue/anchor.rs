//! In-page anchor links scroll smoothly and land below the sticky header.

/// Header height assumed when the page has no header.
pub const FALLBACK_HEADER_PX: f64 = 64.0;
/// Breathing room left between the header and the target.
pub const ANCHOR_GAP_PX: f64 = 12.0;

/// The selector to scroll to for an `href`, or `None` for a bare `#` and for
/// links that leave the page.
pub fn anchor_selector(href: &str) -> Option<&str> {
    if href.len() > 1 && href.starts_with('#') {
        Some(href)
    } else {
        None
    }
}

/// Document offset to scroll to so the target sits just under the header.
///
/// `target_top` is the target's viewport-relative top edge.
pub fn anchor_scroll_top(target_top: f64, scroll_y: f64, header_height: Option<f64>) -> f64 {
    let header = header_height.unwrap_or(FALLBACK_HEADER_PX);
    target_top + scroll_y - header - ANCHOR_GAP_PX
}
