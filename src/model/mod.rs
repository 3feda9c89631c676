//! Entities and request payloads.

mod account;
mod inventory;
mod logs;
mod medicine;
mod pharmacy;

pub use account::*;
pub use inventory::*;
pub use logs::*;
pub use medicine::*;
pub use pharmacy::*;

use serde::Deserialize;

/// `limit` / `offset` query parameters for list endpoints.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct Page {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl Page {
    const DEFAULT_LIMIT: u32 = 100;
    const MAX_LIMIT: u32 = 1000;

    /// Effective limit: default 100, max 1000.
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT).min(Self::MAX_LIMIT)
    }

    pub fn offset(&self) -> u32 {
        self.offset.unwrap_or(0)
    }

    /// Applies the window to an already ordered iterator.
    pub fn slice<T, I: IntoIterator<Item = T>>(&self, items: I) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset() as usize)
            .take(self.limit() as usize)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::Page;

    #[test]
    fn page_defaults_and_clamps() {
        assert_eq!(Page::default().limit(), 100);
        assert_eq!(Page { limit: Some(5000), offset: None }.limit(), 1000);
        let p = Page { limit: Some(2), offset: Some(1) };
        assert_eq!(p.slice(1..=5), vec![2, 3]);
    }
}
