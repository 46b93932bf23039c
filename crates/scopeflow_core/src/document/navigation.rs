//! Scroll-target seam between the comment store and the rendered document.

const PAGE_ANCHOR_PREFIX: &str = "pdf-page-";

/// Scrolls the host viewport to a rendered page.
///
/// Implementations are best effort: a page that is not rendered is ignored.
pub trait PageNavigator {
    fn scroll_to_page(&mut self, page_number: u32);
}

impl<N: PageNavigator + ?Sized> PageNavigator for &mut N {
    fn scroll_to_page(&mut self, page_number: u32) {
        (**self).scroll_to_page(page_number);
    }
}

/// Navigator that drops every request; for hosts without a viewport.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNavigator;

impl PageNavigator for NoopNavigator {
    fn scroll_to_page(&mut self, _page_number: u32) {}
}

/// Remembers the most recent scroll target.
///
/// Used where the host scrolls on its own after asking the core where to go.
#[derive(Debug, Default, Clone, Copy)]
pub struct LastTargetNavigator {
    pub last_page: Option<u32>,
}

impl PageNavigator for LastTargetNavigator {
    fn scroll_to_page(&mut self, page_number: u32) {
        self.last_page = Some(page_number);
    }
}

/// Element id of a rendered page.
pub fn page_anchor_id(page_number: u32) -> String {
    format!("{PAGE_ANCHOR_PREFIX}{page_number}")
}

/// Inverse of [`page_anchor_id`].
pub fn parse_page_anchor(anchor: &str) -> Option<u32> {
    anchor
        .strip_prefix(PAGE_ANCHOR_PREFIX)?
        .parse::<u32>()
        .ok()
        .filter(|page| *page > 0)
}

#[cfg(test)]
mod tests {
    use super::{page_anchor_id, parse_page_anchor, LastTargetNavigator, PageNavigator};

    #[test]
    fn anchor_ids_roundtrip() {
        assert_eq!(page_anchor_id(3), "pdf-page-3");
        assert_eq!(parse_page_anchor("pdf-page-3"), Some(3));
    }

    #[test]
    fn parse_rejects_foreign_and_zero_anchors() {
        assert_eq!(parse_page_anchor("pdf-page-0"), None);
        assert_eq!(parse_page_anchor("pdf-page-x"), None);
        assert_eq!(parse_page_anchor("phase-2"), None);
    }

    #[test]
    fn last_target_keeps_latest_request() {
        let mut nav = LastTargetNavigator::default();
        nav.scroll_to_page(2);
        nav.scroll_to_page(5);
        assert_eq!(nav.last_page, Some(5));
    }
}
