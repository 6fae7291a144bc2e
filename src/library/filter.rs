use super::{Catalog, MediaFilter, MediaItem};

/// The catalog subset visible under the active filter, in catalog order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredView {
    items: Vec<MediaItem>,
}

impl FilteredView {
    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&MediaItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<Vec<MediaItem>> for FilteredView {
    fn from(items: Vec<MediaItem>) -> Self {
        Self { items }
    }
}

/// Recompute the view for `filter`. Always a fresh view; an empty result is
/// valid and means "nothing in this category".
pub fn apply(catalog: &Catalog, filter: MediaFilter) -> FilteredView {
    let items = catalog
        .items()
        .iter()
        .filter(|item| filter.matches(item))
        .cloned()
        .collect();

    FilteredView { items }
}
