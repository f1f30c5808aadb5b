use serde::{Deserialize, Serialize};

/// One page of an ordered collection plus the metadata needed to render navigation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub pages: usize,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }

    /// One navigation control per page number
    pub fn page_numbers(&self) -> std::ops::RangeInclusive<usize> {
        1..=self.pages
    }

    /// A single page (or none) needs no navigation controls
    pub fn needs_controls(&self) -> bool {
        self.pages > 1
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
