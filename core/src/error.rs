//! Error types shared by the component tree and its platforms.

use thiserror::Error;

use crate::{ElementHandle, NodeId};

/// A failure reported by a [`Dom`](crate::Dom) implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// The handle does not refer to a live element.
    #[error("unknown element {0}")]
    UnknownElement(ElementHandle),
    /// `remove_child` was called with an element that is not a child of the parent.
    #[error("{child} is not a child of {parent}")]
    NotAChild {
        /// The supposed parent.
        parent: ElementHandle,
        /// The element that was not found among its children.
        child: ElementHandle,
    },
    /// The DOM APIs are not accessible (e.g., when executed outside of a browser).
    #[error("DOM is not available")]
    Unavailable,
    /// An exception raised by the platform.
    #[error("platform error: {0}")]
    Platform(String),
}

/// A violated precondition on the component tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UiError {
    /// The node was destroyed, or the id never belonged to this tree.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
    /// `render` was called on a node that already owns a DOM handle.
    #[error("{0} has already been rendered")]
    AlreadyRendered(NodeId),
    /// Adding the child would make a node its own ancestor.
    #[error("cannot add {child} under {parent}: it is an ancestor of the parent")]
    Cycle {
        /// The would-be parent.
        parent: NodeId,
        /// The would-be child.
        child: NodeId,
    },
    /// The platform rejected a mutation.
    #[error(transparent)]
    Dom(#[from] DomError),
}
