//! Host-side workflows for the `sortlist` crate.
//!
//! `sortlist` covers geometry and index bookkeeping. This crate adds what a mounted list
//! needs on top of it, still without binding to any UI framework:
//!
//! - Scroll position retention across re-layouts ([`ScrollPositionStore`])
//! - Drag-to-reorder that emits structural edits into an external tree ([`ReorderEngine`])
//! - Scoped text-selection suppression during drags ([`SuppressionGuard`])
//! - A controller tying one list instance together ([`ListController`])
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod controller;
mod reorder;
mod scroll;
mod selection;
mod structure;
mod viewport;


pub use controller::{Content, ListController, Relayout};
pub use reorder::{CancelReason, DropOutcome, ReorderCommit, ReorderEngine, ReorderState};
pub use scroll::{ScrollPositionStore, ScrollState};
pub use selection::{SelectionControl, SuppressionGuard};
pub use structure::{Sibling, SiblingOrder, StructureTarget, array_move};
pub use viewport::ViewportProvider;
