use esea_core::MatchId;
use scraper::{ElementRef, Html, Selector};

use crate::fetch::RenderedPage;

/// A parsed, already-rendered match page.
///
/// Immutable once built; classification and extraction only borrow it.
pub struct PageSnapshot {
    match_id: MatchId,
    document: Html,
}

impl PageSnapshot {
    /// Parses raw page markup. HTML parsing is lenient, so this never fails;
    /// garbage input simply classifies as INVALID.
    #[must_use]
    pub fn parse(match_id: MatchId, html: &str) -> Self {
        Self {
            match_id,
            document: Html::parse_document(html),
        }
    }

    #[must_use]
    pub fn from_page(page: &RenderedPage) -> Self {
        Self::parse(page.match_id, &page.html)
    }

    #[must_use]
    pub fn match_id(&self) -> MatchId {
        self.match_id
    }

    /// First element matching `selector` in document order.
    pub(crate) fn first(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        self.document.select(selector).next()
    }

    pub(crate) fn contains(&self, selector: &Selector) -> bool {
        self.first(selector).is_some()
    }
}

impl std::fmt::Debug for PageSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageSnapshot")
            .field("match_id", &self.match_id)
            .finish_non_exhaustive()
    }
}
