use alloc::vec::Vec;
use core::fmt;

use sortlist::{ItemId, ListError, NodeId, Position, Projection};

use crate::{SelectionControl, SiblingOrder, StructureTarget, SuppressionGuard, array_move};

/// Observable state of a [`ReorderEngine`].
///
/// Committing and cancelling happen inside [`ReorderEngine::drag_end`]; the engine is back to
/// `Idle` by the time it returns, and the [`DropOutcome`] says which way it went.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReorderState {
    Idle,
    Dragging { source: ItemId },
}

/// Why a drag ended without a move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CancelReason {
    /// A drop arrived while no drag was in progress.
    NotDragging,
    /// The drag ended outside any drop target.
    NoTarget,
    /// The row was dropped onto itself.
    SameTarget,
    /// Focus loss or another external interrupt.
    Interrupted,
    /// Resolution failed: a label row, a collection that is not orderable, or an id missing
    /// from the display, canonical or sibling order.
    Rejected(ListError),
}

impl From<ListError> for CancelReason {
    fn from(err: ListError) -> Self {
        Self::Rejected(err)
    }
}

/// The edit emitted for a successful drop.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReorderCommit {
    /// Display index of the dragged row.
    pub source_index: usize,
    /// Display index of the row it was dropped on.
    pub target_index: usize,
    pub container_id: NodeId,
    /// Child order of the container after the move.
    pub new_order: Vec<NodeId>,
    /// Sibling the moved node is placed next to.
    pub anchor_id: NodeId,
    pub moved_id: NodeId,
    pub position: Position,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    Committed(ReorderCommit),
    Cancelled(CancelReason),
}

impl DropOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }

    pub fn commit(&self) -> Option<&ReorderCommit> {
        match self {
            Self::Committed(c) => Some(c),
            Self::Cancelled(_) => None,
        }
    }
}

struct ActiveDrag<C: SelectionControl> {
    source: ItemId,
    suppression: SuppressionGuard<C>,
}

/// Turns a drag gesture over display rows into a single-item move in the backing structure.
///
/// The engine only knows `{ source, target }` identities; gesture recognition stays with the
/// host. Text selection is suppressed from `drag_start` until the drag ends, however it ends.
pub struct ReorderEngine<C: SelectionControl + Clone> {
    control: C,
    orderable: bool,
    drag: Option<ActiveDrag<C>>,
}

impl<C: SelectionControl + Clone> ReorderEngine<C> {
    /// `orderable` marks the list's backing collection as the one users may reorder; drops in
    /// any other collection are cancelled without an edit.
    pub fn new(control: C, orderable: bool) -> Self {
        Self {
            control,
            orderable,
            drag: None,
        }
    }

    pub fn orderable(&self) -> bool {
        self.orderable
    }

    pub fn set_orderable(&mut self, orderable: bool) {
        self.orderable = orderable;
    }

    pub fn state(&self) -> ReorderState {
        match &self.drag {
            Some(drag) => ReorderState::Dragging {
                source: drag.source.clone(),
            },
            None => ReorderState::Idle,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// `Idle -> Dragging`. Starting a new drag while one is active abandons the old one.
    pub fn drag_start(&mut self, source: ItemId) {
        // Release the previous guard first so suppress/restore calls stay paired.
        self.drag = None;
        ldebug!(source = %source, "ReorderEngine::drag_start");
        self.drag = Some(ActiveDrag {
            source,
            suppression: SuppressionGuard::acquire(self.control.clone()),
        });
    }

    /// `Dragging -> Cancelled -> Idle` on focus loss or an external interrupt.
    pub fn cancel(&mut self) -> DropOutcome {
        match self.drag.take() {
            Some(_) => {
                ldebug!("ReorderEngine::cancel: interrupted");
                DropOutcome::Cancelled(CancelReason::Interrupted)
            }
            None => DropOutcome::Cancelled(CancelReason::NotDragging),
        }
    }

    /// Ends the drag over `target` (or outside any row, for `None`).
    ///
    /// On success the structural reorder is emitted before the move instruction, and the
    /// engine returns to `Idle`. Every failure is a silent cancel with no emission.
    pub fn drag_end<D, T>(
        &mut self,
        target: Option<&ItemId>,
        projection: &Projection<D>,
        structure: &mut T,
    ) -> DropOutcome
    where
        T: StructureTarget + ?Sized,
    {
        let Some(ActiveDrag {
            source,
            suppression,
        }) = self.drag.take()
        else {
            return DropOutcome::Cancelled(CancelReason::NotDragging);
        };
        drop(suppression);

        let Some(target) = target else {
            return DropOutcome::Cancelled(CancelReason::NoTarget);
        };
        if *target == source {
            return DropOutcome::Cancelled(CancelReason::SameTarget);
        }

        let commit = match self.plan(&source, target, projection, structure) {
            Ok(commit) => commit,
            Err(err) => {
                ldebug!(
                    source = %source,
                    target = %target,
                    error = %err,
                    "ReorderEngine::drag_end: cancelled"
                );
                return DropOutcome::Cancelled(err.into());
            }
        };

        ldebug!(
            moved = %commit.moved_id,
            anchor = %commit.anchor_id,
            position = ?commit.position,
            "ReorderEngine::drag_end: committed"
        );
        structure.update_order(&commit.container_id, commit.new_order.clone());
        structure.move_near(
            &commit.anchor_id,
            core::slice::from_ref(&commit.moved_id),
            commit.position,
        );
        DropOutcome::Committed(commit)
    }

    fn plan<D, T>(
        &self,
        source: &ItemId,
        target: &ItemId,
        projection: &Projection<D>,
        structure: &T,
    ) -> Result<ReorderCommit, ListError>
    where
        T: StructureTarget + ?Sized,
    {
        let source_index = display_index(projection, source)?;
        let target_index = display_index(projection, target)?;

        if !self.orderable {
            return Err(ListError::NotOrderable);
        }

        let source_record = canonical_record(projection, source_index)?;
        let target_record = canonical_record(projection, target_index)?;

        // Display order and the container's child order come from the same records but are
        // derived independently, so siblings are matched by target id, not by position.
        let siblings = structure.sibling_order();
        let from = sibling_index(&siblings, source_record)?;
        let to = sibling_index(&siblings, target_record)?;

        let mut new_order = siblings.child_ids();
        array_move(&mut new_order, from, to);

        let position = if target_index < source_index {
            Position::Before
        } else {
            Position::After
        };

        Ok(ReorderCommit {
            source_index,
            target_index,
            moved_id: siblings.children[from].id.clone(),
            anchor_id: siblings.children[to].id.clone(),
            container_id: siblings.container_id,
            new_order,
            position,
        })
    }
}

impl<C: SelectionControl + Clone> fmt::Debug for ReorderEngine<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReorderEngine")
            .field("orderable", &self.orderable)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

fn display_index<D>(projection: &Projection<D>, id: &ItemId) -> Result<usize, ListError> {
    projection
        .display_index_of(id)
        .ok_or_else(|| ListError::NotFound { id: id.clone() })
}

fn canonical_record<D>(
    projection: &Projection<D>,
    display_index: usize,
) -> Result<&ItemId, ListError> {
    let index = projection.display_index_to_canonical(display_index)?;
    projection
        .canonical()
        .get(index)
        .ok_or(ListError::IndexOutOfBounds {
            index,
            len: projection.canonical().len(),
        })
}

fn sibling_index(siblings: &SiblingOrder, record: &ItemId) -> Result<usize, ListError> {
    siblings.position_of_target(record).ok_or_else(|| {
        lwarn!(
            container = %siblings.container_id,
            record = %record,
            "ReorderEngine: displayed record has no sibling in the container"
        );
        ListError::NotFound { id: record.clone() }
    })
}
