use crate::ItemId;

/// Failures raised by list operations.
///
/// None of these are faults: each one marks an expected transient state (a label row was
/// dragged, a row scrolled away before its measurement arrived) and callers cancel the
/// operation in progress instead of surfacing it.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ListError {
    /// The display index addresses a synthetic group-label row.
    #[error("display row {index} is a group label, not a record")]
    NotARecord { index: usize },

    /// The backing collection does not support persisted ordering.
    #[error("collection does not support manual ordering")]
    NotOrderable,

    /// Details (or a canonical/sibling entry) are missing for an id.
    #[error("no entry found for `{id}`")]
    NotFound { id: ItemId },

    /// A measurement arrived for an id that is not in the current display sequence.
    #[error("measurement for `{id}` is stale")]
    StaleMeasurement { id: ItemId },

    #[error("index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },
}
