//! Arena storage for component nodes.
//!
//! Nodes are addressed by [`NodeId`] (slot index + generation) rather than by
//! pointer, so parent links, handler closures and layout tables can all refer
//! to a node without sharing ownership of it. Freed slots are recycled; the
//! generation makes stale ids fail lookups instead of aliasing a new node.

use std::{
    collections::{BTreeSet, HashMap},
    fmt,
};

use indexmap::IndexMap;

use crate::{ElementHandle, event::Handler};

/// Stable identity of a component node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// The slot this node occupies.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}v{}", self.index, self.generation)
    }
}

pub(crate) struct Node {
    pub(crate) tag: String,
    pub(crate) text: Option<String>,
    pub(crate) attributes: IndexMap<String, String>,
    pub(crate) styles: IndexMap<String, String>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) listeners: IndexMap<String, Vec<Handler>>,
    /// Event types the platform has been asked to forward.
    pub(crate) listening: BTreeSet<String>,
    pub(crate) handle: Option<ElementHandle>,
    pub(crate) enabled: bool,
    pub(crate) visible: bool,
}

impl Node {
    pub(crate) fn new(tag: String) -> Self {
        Self {
            tag,
            text: None,
            attributes: IndexMap::new(),
            styles: IndexMap::new(),
            children: Vec::new(),
            parent: None,
            listeners: IndexMap::new(),
            listening: BTreeSet::new(),
            handle: None,
            enabled: true,
            visible: true,
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("tag", &self.tag)
            .field("text", &self.text)
            .field("attributes", &self.attributes)
            .field("styles", &self.styles)
            .field("children", &self.children)
            .field("parent", &self.parent)
            .field(
                "listeners",
                &self
                    .listeners
                    .iter()
                    .map(|(kind, handlers)| (kind, handlers.len()))
                    .collect::<Vec<_>>(),
            )
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

#[derive(Debug, Default)]
pub(crate) struct Tree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    by_handle: HashMap<ElementHandle, NodeId>,
}

impl Tree {
    pub(crate) fn insert(&mut self, node: Node) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }

        let index = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId {
            index,
            generation: 0,
        }
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    pub(crate) fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub(crate) fn remove(&mut self, id: NodeId) -> Option<Node> {
        let slot = self
            .slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)?;
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        if let Some(handle) = node.handle {
            self.by_handle.remove(&handle);
        }
        Some(node)
    }

    pub(crate) fn bind(&mut self, id: NodeId, handle: ElementHandle) {
        if let Some(node) = self.get_mut(id) {
            node.handle = Some(handle);
            self.by_handle.insert(handle, id);
        }
    }

    pub(crate) fn node_for_handle(&self, handle: ElementHandle) -> Option<NodeId> {
        self.by_handle.get(&handle).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Returns `true` if `ancestor` is `node` or one of its ancestors.
    pub(crate) fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.get(current).and_then(|n| n.parent);
        }
        false
    }
}
