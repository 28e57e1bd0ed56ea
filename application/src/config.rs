//! Application-level configuration.
//!
//! Settings that control how portal operations behave, independent of the
//! transport that carries them.

use thecamp_domain::SortOrder;

/// Letters fetched per listing request when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: usize = 30;

/// Portal client behavior configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// Number of letters requested per page by the letter iterator.
    pub page_size: usize,
    /// Order used by [`CampClient::default_letter_iterator`](crate::CampClient::default_letter_iterator).
    pub default_order: SortOrder,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            default_order: SortOrder::Ascending,
        }
    }
}

impl ClientSettings {
    /// Sets the page size. A page always holds at least one letter.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_default_order(mut self, order: SortOrder) -> Self {
        self.default_order = order;
        self
    }
}
