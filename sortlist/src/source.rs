use alloc::vec::Vec;

use crate::{ItemId, ListError};

/// The collaborator that owns the raw records behind a list.
pub trait DataSource {
    type Detail;

    /// Record ids in canonical order. Stable across calls with the same source state.
    fn record_ids(&self) -> Vec<ItemId>;

    /// Total number of records, including ones not loaded yet.
    fn total_count(&self) -> usize;

    /// Details for one record, or [`ListError::NotFound`].
    fn details(&self, id: &ItemId) -> Result<Self::Detail, ListError>;

    /// Asks the source to fetch more records past `loaded`.
    ///
    /// Fire-and-forget: the list keeps rendering what is available and picks up new records on
    /// its next reload.
    fn load_more(&self, loaded: usize) {
        let _ = loaded;
    }
}
