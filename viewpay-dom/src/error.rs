//! Document tree error types.

use thiserror::Error;

use crate::tree::NodeId;

/// Error type for document tree operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// The node id does not refer to a live node.
    #[error("Node {0:?} is not in the tree")]
    NotInTree(NodeId),

    /// The operation requires a node with a parent.
    #[error("Node {0:?} has no parent")]
    NoParent(NodeId),

    /// The node is already attached somewhere in the tree.
    #[error("Node {0:?} is already attached")]
    AlreadyAttached(NodeId),
}
