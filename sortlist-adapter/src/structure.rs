use alloc::vec::Vec;

use sortlist::{ItemId, NodeId, Position};

/// One child of the container that backs the list.
///
/// Link children point at a record through `target`; other children (text, dividers) have
/// none but still occupy a slot in the child order.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sibling {
    pub id: NodeId,
    pub target: Option<ItemId>,
}

impl Sibling {
    pub fn link(id: impl Into<NodeId>, target: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            target: Some(target.into()),
        }
    }

    pub fn other(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            target: None,
        }
    }
}

/// The child order of the backing container, as owned by the structural collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SiblingOrder {
    pub container_id: NodeId,
    pub children: Vec<Sibling>,
}

impl SiblingOrder {
    pub fn new(container_id: impl Into<NodeId>, children: Vec<Sibling>) -> Self {
        Self {
            container_id: container_id.into(),
            children,
        }
    }

    /// Index of the first child linking to `target`.
    pub fn position_of_target(&self, target: &ItemId) -> Option<usize> {
        self.children
            .iter()
            .position(|c| c.target.as_ref() == Some(target))
    }

    pub fn child_ids(&self) -> Vec<NodeId> {
        self.children.iter().map(|c| c.id.clone()).collect()
    }
}

/// The collaborator that owns the hierarchical structure behind the list.
///
/// Both mutations are fire-and-forget; the list never inspects their effect.
pub trait StructureTarget {
    /// Current child order of the container backing the list.
    fn sibling_order(&self) -> SiblingOrder;

    fn update_order(&mut self, container_id: &NodeId, new_child_order: Vec<NodeId>);

    fn move_near(&mut self, anchor_id: &NodeId, moved_ids: &[NodeId], position: Position);
}

/// Moves the element at `from` to `to`, shifting the ones in between.
///
/// Returns `false` (and leaves `items` untouched) when either index is out of bounds.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() || to >= items.len() {
        return false;
    }
    let moved = items.remove(from);
    items.insert(to, moved);
    true
}
