//! Events delivered to component handlers.

use crate::{NodeId, Ui};

/// Event type fired on every node of a subtree right after it is attached to the document.
pub const MOUNT: &str = "mount";

/// A boxed event handler.
///
/// Handlers receive the whole [`Ui`] so they can mutate any node, including the
/// one they are attached to.
pub type Handler = Box<dyn FnMut(&mut Ui, &mut Event)>;

/// A platform event wrapped for delivery through the component tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    kind: String,
    value: Option<String>,
    target: Option<NodeId>,
    current_target: Option<NodeId>,
    bubbles: bool,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl Event {
    /// Creates a bubbling event of the given type.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: None,
            target: None,
            current_target: None,
            bubbles: true,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Creates an event that is only delivered to its target.
    #[must_use]
    pub fn non_bubbling(kind: impl Into<String>) -> Self {
        Self {
            bubbles: false,
            ..Self::new(kind)
        }
    }

    /// Attaches a payload, such as the key of a `keypress`.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// The event type, e.g. `click`.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The payload carried by the event, if any.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// The node the event was dispatched to.
    #[must_use]
    pub const fn target(&self) -> Option<NodeId> {
        self.target
    }

    /// The node whose handlers are currently running.
    #[must_use]
    pub const fn current_target(&self) -> Option<NodeId> {
        self.current_target
    }

    /// Whether the event travels up through the target's ancestors.
    #[must_use]
    pub const fn bubbles(&self) -> bool {
        self.bubbles
    }

    /// Cancels the platform's default action.
    pub const fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Returns whether a handler cancelled the default action.
    #[must_use]
    pub const fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Stops delivery to further ancestors once the current node's handlers ran.
    pub const fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Returns whether propagation was stopped.
    #[must_use]
    pub const fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub(crate) const fn set_target(&mut self, target: NodeId) {
        self.target = Some(target);
    }

    pub(crate) const fn set_current_target(&mut self, current: NodeId) {
        self.current_target = Some(current);
    }
}
