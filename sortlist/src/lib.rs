//! A headless engine for long, reorderable lists with variable row heights.
//!
//! The crate covers the geometry and index bookkeeping a windowed renderer needs:
//! per-item height estimates and measurements keyed by stable identity, prefix sums for fast
//! offset → row lookups, overscanned windows, and the projection between the canonical
//! record order and the displayed order (which may carry synthetic group-label rows).
//!
//! It renders nothing. A UI layer is expected to provide:
//! - viewport size and scroll offset
//! - row measurements once rows are laid out
//! - the records, through a [`DataSource`]
//!
//! Scroll restoration and drag-to-reorder live in the `sortlist-adapter` crate.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod error;
mod fenwick;
mod height;
mod key;
mod options;
mod projection;
mod source;
mod types;
mod window;

#[cfg(test)]
mod tests;

pub use error::ListError;
pub use height::{HeightCache, HeightEntry};
pub use options::{EmptyState, HeightPolicy, ListLayout, ListOptions};
pub use projection::{
    DisplaySequence, GroupKeyFn, GroupingMode, Projection, build_display_sequence,
    display_index_to_canonical,
};
pub use source::DataSource;
pub use types::{Align, Item, ItemId, ItemKind, NodeId, Position, Rect};
pub use window::{WindowCalculator, WindowRange, compute_window};
