use crate::NodeId;

/// A point in the tree.
///
/// Inside a text node `offset` counts characters; inside an element it counts
/// children, so `offset == child_count` means "after the last child".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DomPosition {
    pub node: NodeId,
    pub offset: usize,
}

impl DomPosition {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}
