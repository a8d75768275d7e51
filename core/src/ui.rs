//! The component tree and its mount/update rules.
//!
//! A [`Ui`] owns every component node together with the platform [`Dom`] the
//! nodes render into. Setters record into the node and, once the node is
//! mounted, apply the same mutation to its element straight away.

use std::{collections::HashMap, fmt, mem, rc::Rc};

use tracing::{debug, trace};

use crate::{
    Dom, ElementHandle, NodeMut, State, Subscription, UiError,
    effect::EffectQueue,
    event::{Event, Handler, MOUNT},
    layout::{Constraint, Layout},
    tree::{Node, NodeId, Tree},
};

/// Owner of the component arena and the platform it renders into.
pub struct Ui {
    tree: Tree,
    dom: Box<dyn Dom>,
    layouts: HashMap<NodeId, Box<dyn Layout>>,
    effects: EffectQueue,
}

impl fmt::Debug for Ui {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ui")
            .field("nodes", &self.tree.len())
            .field("layouts", &self.layouts)
            .field("effects", &self.effects)
            .finish_non_exhaustive()
    }
}

impl Ui {
    /// Creates an empty tree rendering into `dom`.
    pub fn new(dom: impl Dom + 'static) -> Self {
        Self {
            tree: Tree::default(),
            dom: Box::new(dom),
            layouts: HashMap::new(),
            effects: EffectQueue::default(),
        }
    }

    /// The platform this tree renders into.
    #[must_use]
    pub fn dom(&self) -> &dyn Dom {
        self.dom.as_ref()
    }

    /// Mutable access to the platform, for integrations that need raw elements.
    pub fn dom_mut(&mut self) -> &mut dyn Dom {
        self.dom.as_mut()
    }

    /// The document body of the platform.
    #[must_use]
    pub fn body(&self) -> ElementHandle {
        self.dom.body()
    }

    // ========================================================================
    // Creation & lookup
    // ========================================================================

    /// Creates a detached node for `tag`.
    pub fn create(&mut self, tag: &str) -> NodeMut<'_> {
        let id = self.tree.insert(Node::new(tag.to_string()));
        trace!(node = %id, tag, "created node");
        NodeMut::new(self, id)
    }

    /// Creates a node with the defaults every widget shares (`box-sizing: border-box`).
    pub fn create_widget(&mut self, tag: &str) -> NodeMut<'_> {
        self.create(tag).style("box-sizing", "border-box")
    }

    /// Returns a chainable handle on an existing node.
    pub fn node(&mut self, id: NodeId) -> NodeMut<'_> {
        NodeMut::new(self, id)
    }

    /// Returns `true` if `id` refers to a live node.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.tree.contains(id)
    }

    /// Number of live nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.tree.len()
    }

    fn get(&self, id: NodeId) -> Result<&Node, UiError> {
        self.tree.get(id).ok_or(UiError::UnknownNode(id))
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut Node, UiError> {
        self.tree.get_mut(id).ok_or(UiError::UnknownNode(id))
    }

    /// The tag name of a node.
    #[must_use]
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.tree.get(id).map(|node| node.tag.as_str())
    }

    /// The text recorded on a node.
    #[must_use]
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.tree.get(id).and_then(|node| node.text.as_deref())
    }

    /// An attribute recorded on a node.
    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.tree
            .get(id)
            .and_then(|node| node.attributes.get(name))
            .map(String::as_str)
    }

    /// An inline style recorded on a node.
    #[must_use]
    pub fn style(&self, id: NodeId, property: &str) -> Option<&str> {
        self.tree
            .get(id)
            .and_then(|node| node.styles.get(property))
            .map(String::as_str)
    }

    /// All inline styles recorded on a node, in insertion order.
    #[must_use]
    pub fn styles(&self, id: NodeId) -> Vec<(&str, &str)> {
        self.tree
            .get(id)
            .map(|node| {
                node.styles
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The children of a node, in append order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.tree
            .get(id)
            .map_or(&[][..], |node| node.children.as_slice())
    }

    /// The parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.tree.get(id).and_then(|node| node.parent)
    }

    /// The element a node rendered into.
    #[must_use]
    pub fn handle(&self, id: NodeId) -> Option<ElementHandle> {
        self.tree.get(id).and_then(|node| node.handle)
    }

    /// Returns `true` once the node has been rendered.
    #[must_use]
    pub fn is_mounted(&self, id: NodeId) -> bool {
        self.handle(id).is_some()
    }

    /// The node that rendered `handle`.
    #[must_use]
    pub fn node_for_handle(&self, handle: ElementHandle) -> Option<NodeId> {
        self.tree.node_for_handle(handle)
    }

    /// Finds the nearest node with the given tag, starting at `id` itself.
    #[must_use]
    pub fn closest(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = self.tree.get(current)?;
            if node.tag.eq_ignore_ascii_case(tag) {
                return Some(current);
            }
            cursor = node.parent;
        }
        None
    }

    /// Number of handlers registered for `event_type` on a node.
    #[must_use]
    pub fn listener_count(&self, id: NodeId, event_type: &str) -> usize {
        self.tree
            .get(id)
            .and_then(|node| node.listeners.get(event_type))
            .map_or(0, Vec::len)
    }

    /// Reads a live element property. Unmounted nodes have none.
    #[must_use]
    pub fn property(&self, id: NodeId, name: &str) -> Option<String> {
        self.handle(id)
            .and_then(|handle| self.dom.property(handle, name))
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Sets the text content.
    ///
    /// # Errors
    ///
    /// Fails if the node is unknown or the platform rejects the mutation.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<(), UiError> {
        let text = text.into();
        if let Some(handle) = self.get(id)?.handle {
            self.dom.set_text(handle, &text)?;
        }
        self.get_mut(id)?.text = Some(text);
        Ok(())
    }

    /// Sets an attribute.
    ///
    /// # Errors
    ///
    /// Fails if the node is unknown or the platform rejects the mutation.
    pub fn set_attribute(
        &mut self,
        id: NodeId,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), UiError> {
        let value = value.into();
        if let Some(handle) = self.get(id)?.handle {
            self.dom.set_attribute(handle, name, &value)?;
        }
        self.get_mut(id)?.attributes.insert(name.to_string(), value);
        Ok(())
    }

    /// Removes an attribute.
    ///
    /// # Errors
    ///
    /// Fails if the node is unknown or the platform rejects the mutation.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<(), UiError> {
        if let Some(handle) = self.get(id)?.handle {
            self.dom.remove_attribute(handle, name)?;
        }
        self.get_mut(id)?.attributes.shift_remove(name);
        Ok(())
    }

    /// Sets an inline style property.
    ///
    /// # Errors
    ///
    /// Fails if the node is unknown or the platform rejects the mutation.
    pub fn set_style(
        &mut self,
        id: NodeId,
        property: &str,
        value: impl Into<String>,
    ) -> Result<(), UiError> {
        let value = value.into();
        if let Some(handle) = self.get(id)?.handle {
            self.dom.set_style(handle, property, &value)?;
        }
        self.get_mut(id)?.styles.insert(property.to_string(), value);
        Ok(())
    }

    /// Clears an inline style property.
    ///
    /// # Errors
    ///
    /// Fails if the node is unknown or the platform rejects the mutation.
    pub fn remove_style(&mut self, id: NodeId, property: &str) -> Result<(), UiError> {
        if let Some(handle) = self.get(id)?.handle {
            self.dom.set_style(handle, property, "")?;
        }
        self.get_mut(id)?.styles.shift_remove(property);
        Ok(())
    }

    /// Sets a live element property. Has no effect before the node is mounted.
    ///
    /// # Errors
    ///
    /// Fails if the node is unknown or the platform rejects the mutation.
    pub fn set_property(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), UiError> {
        if let Some(handle) = self.get(id)?.handle {
            self.dom.set_property(handle, name, value)?;
        }
        Ok(())
    }

    /// Registers a handler for `event_type`. Every handler registered for a type fires.
    ///
    /// # Errors
    ///
    /// Fails if the node is unknown or the platform cannot forward the event type.
    pub fn add_event_listener(
        &mut self,
        id: NodeId,
        event_type: &str,
        handler: impl FnMut(&mut Self, &mut Event) + 'static,
    ) -> Result<(), UiError> {
        let node = self.get_mut(id)?;
        node.listeners
            .entry(event_type.to_string())
            .or_default()
            .push(Box::new(handler) as Handler);
        let needs_listen = node.handle.is_some() && !node.listening.contains(event_type);
        if let (true, Some(handle)) = (needs_listen, node.handle) {
            self.dom.listen(handle, event_type)?;
            self.get_mut(id)?.listening.insert(event_type.to_string());
        }
        Ok(())
    }

    /// Appends `child` to `parent`.
    ///
    /// A child that already has a parent is moved. If `parent` is mounted the
    /// child is rendered into it immediately. If `parent` has a layout, the
    /// layout styles the child as if it was added without a constraint.
    ///
    /// # Errors
    ///
    /// Fails if either node is unknown, if `child` is `parent` or one of its
    /// ancestors, or if the platform rejects the mutation.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), UiError> {
        self.attach(parent, child)?;
        self.with_layout(parent, |layout, ui| {
            layout.add_layout_component(ui, child, None);
        });
        Ok(())
    }

    /// Appends `child` to `parent` and lets the parent's layout place it.
    ///
    /// # Errors
    ///
    /// Same as [`Ui::add_child`].
    pub fn add_child_with(
        &mut self,
        parent: NodeId,
        child: NodeId,
        constraint: impl Into<Constraint>,
    ) -> Result<(), UiError> {
        let constraint = constraint.into();
        self.attach(parent, child)?;
        self.with_layout(parent, |layout, ui| {
            layout.add_layout_component(ui, child, Some(&constraint));
        });
        Ok(())
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<(), UiError> {
        self.get(parent)?;
        self.get(child)?;
        if self.tree.is_ancestor_or_self(child, parent) {
            return Err(UiError::Cycle { parent, child });
        }

        if let Some(previous) = self.get(child)?.parent {
            self.detach_from(previous, child);
        }
        self.get_mut(child)?.parent = Some(parent);
        self.get_mut(parent)?.children.push(child);

        if let Some(parent_handle) = self.get(parent)?.handle {
            let mut mounted = Vec::new();
            let element = self.mount(child, &mut mounted)?;
            self.dom.append_child(parent_handle, element)?;
            self.fire_mounted(&mounted);
        } else if let Some(handle) = self.get(child)?.handle {
            // The element follows its node out of the old parent and is
            // appended again when the new parent renders.
            if let Some(dom_parent) = self.dom.parent(handle) {
                self.dom.remove_child(dom_parent, handle)?;
            }
        }
        Ok(())
    }

    fn detach_from(&mut self, parent: NodeId, child: NodeId) {
        if let Some(node) = self.tree.get_mut(parent) {
            node.children.retain(|c| *c != child);
        }
        if let Some(node) = self.tree.get_mut(child) {
            node.parent = None;
        }
        self.with_layout(parent, |layout, _| layout.remove_layout_component(child));
    }

    /// Renders a node and its subtree under `parent`, returning the new element.
    ///
    /// # Errors
    ///
    /// Fails with [`UiError::AlreadyRendered`] if the node already owns an
    /// element, and otherwise if the node is unknown or the platform rejects a
    /// mutation.
    pub fn render(&mut self, id: NodeId, parent: ElementHandle) -> Result<ElementHandle, UiError> {
        if self.get(id)?.handle.is_some() {
            return Err(UiError::AlreadyRendered(id));
        }
        let mut mounted = Vec::new();
        let element = self.mount(id, &mut mounted)?;
        self.dom.append_child(parent, element)?;
        debug!(node = %id, %element, nodes = mounted.len(), "rendered subtree");
        self.fire_mounted(&mounted);
        Ok(element)
    }

    /// Creates elements for `id` and its unmounted descendants.
    fn mount(&mut self, id: NodeId, mounted: &mut Vec<NodeId>) -> Result<ElementHandle, UiError> {
        let node = self.get(id)?;
        if let Some(handle) = node.handle {
            return Ok(handle);
        }
        let tag = node.tag.clone();

        let element = self.dom.create_element(&tag)?;
        let node = self.get(id)?;
        let text = node.text.clone();
        let attributes: Vec<(String, String)> = node
            .attributes
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let styles: Vec<(String, String)> = node
            .styles
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let event_types: Vec<String> = node.listeners.keys().cloned().collect();
        let children = node.children.clone();

        if let Some(text) = text {
            self.dom.set_text(element, &text)?;
        }
        for (name, value) in &attributes {
            self.dom.set_attribute(element, name, value)?;
        }
        for (property, value) in &styles {
            self.dom.set_style(element, property, value)?;
        }
        for event_type in &event_types {
            self.dom.listen(element, event_type)?;
        }

        self.tree.bind(id, element);
        self.get_mut(id)?.listening.extend(event_types);
        mounted.push(id);
        trace!(node = %id, %element, "mounted node");

        for child in children {
            let child_element = self.mount(child, mounted)?;
            self.dom.append_child(element, child_element)?;
        }
        Ok(element)
    }

    fn fire_mounted(&mut self, mounted: &[NodeId]) {
        for id in mounted {
            if self.listener_count(*id, MOUNT) > 0 {
                self.dispatch(*id, Event::non_bubbling(MOUNT));
            }
        }
    }

    /// Detaches a node from its parent, in the tree and in the DOM.
    ///
    /// The node keeps its element and can be added somewhere else.
    ///
    /// # Errors
    ///
    /// Fails if the node is unknown or the platform rejects the mutation.
    pub fn remove_from_parent(&mut self, id: NodeId) -> Result<(), UiError> {
        let node = self.get(id)?;
        let parent = node.parent;
        if let Some(handle) = node.handle {
            if let Some(dom_parent) = self.dom.parent(handle) {
                self.dom.remove_child(dom_parent, handle)?;
            }
        }
        if let Some(parent) = parent {
            self.detach_from(parent, id);
        }
        Ok(())
    }

    /// Removes every child of a node and destroys them.
    ///
    /// # Errors
    ///
    /// Fails if the node is unknown or the platform rejects the mutation.
    pub fn clear(&mut self, id: NodeId) -> Result<(), UiError> {
        if let Some(handle) = self.get(id)?.handle {
            for child in self.dom.children(handle) {
                self.dom.remove_child(handle, child)?;
            }
        }
        let children = mem::take(&mut self.get_mut(id)?.children);
        for child in children {
            self.with_layout(id, |layout, _| layout.remove_layout_component(child));
            self.release(child);
        }
        Ok(())
    }

    /// Detaches a node and frees it together with its subtree.
    ///
    /// # Errors
    ///
    /// Fails if the node is unknown or the platform rejects the mutation.
    pub fn destroy(&mut self, id: NodeId) -> Result<(), UiError> {
        self.remove_from_parent(id)?;
        self.release(id);
        Ok(())
    }

    fn release(&mut self, id: NodeId) {
        let Some(node) = self.tree.remove(id) else {
            return;
        };
        self.layouts.remove(&id);
        if let Some(handle) = node.handle {
            self.dom.release(handle);
            trace!(node = %id, %handle, "released element");
        }
        for child in node.children {
            self.release(child);
        }
    }

    // ========================================================================
    // Component bookkeeping
    // ========================================================================

    /// Returns whether the node accepts interaction.
    #[must_use]
    pub fn is_enabled(&self, id: NodeId) -> bool {
        self.tree.get(id).is_some_and(|node| node.enabled)
    }

    /// Enables or disables a node.
    ///
    /// Disabled nodes carry `disabled="true"`, are dimmed and ignore pointer events.
    ///
    /// # Errors
    ///
    /// Fails if the node is unknown or the platform rejects the mutation.
    pub fn set_enabled(&mut self, id: NodeId, enabled: bool) -> Result<(), UiError> {
        self.get_mut(id)?.enabled = enabled;
        if enabled {
            self.remove_attribute(id, "disabled")?;
            self.set_style(id, "opacity", "1.0")?;
            self.set_style(id, "pointer-events", "auto")
        } else {
            self.set_attribute(id, "disabled", "true")?;
            self.set_style(id, "opacity", "0.6")?;
            self.set_style(id, "pointer-events", "none")
        }
    }

    /// Returns whether the node is shown.
    #[must_use]
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.tree.get(id).is_some_and(|node| node.visible)
    }

    /// Shows or hides a node through `display: none`.
    ///
    /// # Errors
    ///
    /// Fails if the node is unknown or the platform rejects the mutation.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> Result<(), UiError> {
        self.get_mut(id)?.visible = visible;
        if visible {
            self.remove_style(id, "display")
        } else {
            self.set_style(id, "display", "none")
        }
    }

    /// Attaches a layout to a container and applies its declarations.
    ///
    /// Replaces any previous layout. Existing children are not restyled.
    ///
    /// # Errors
    ///
    /// Fails if the node is unknown.
    pub fn set_layout(&mut self, id: NodeId, layout: impl Layout + 'static) -> Result<(), UiError> {
        self.get(id)?;
        let layout: Box<dyn Layout> = Box::new(layout);
        debug!(node = %id, ?layout, "applying layout");
        layout.apply_to(self, id);
        self.layouts.insert(id, layout);
        Ok(())
    }

    /// Re-applies the container declarations of a node's layout.
    pub fn relayout(&mut self, id: NodeId) {
        self.with_layout(id, |layout, ui| layout.layout_container(ui, id));
    }

    /// Returns the layout attached to a container if it is an `L`.
    #[must_use]
    pub fn layout<L: Layout + 'static>(&self, id: NodeId) -> Option<&L> {
        self.layouts
            .get(&id)
            .and_then(|layout| layout.as_any().downcast_ref::<L>())
    }

    /// Returns `true` if the container has a layout.
    #[must_use]
    pub fn has_layout(&self, id: NodeId) -> bool {
        self.layouts.contains_key(&id)
    }

    fn with_layout(&mut self, container: NodeId, f: impl FnOnce(&mut dyn Layout, &mut Self)) {
        if let Some(mut layout) = self.layouts.remove(&container) {
            f(layout.as_mut(), self);
            if self.tree.contains(container) {
                self.layouts.entry(container).or_insert(layout);
            }
        }
    }

    // ========================================================================
    // Events & effects
    // ========================================================================

    /// Delivers an event to `target` and, if it bubbles, to each ancestor.
    ///
    /// Pending effects are flushed afterwards. The returned event reports
    /// whether a handler prevented the default action.
    pub fn dispatch(&mut self, target: NodeId, mut event: Event) -> Event {
        if !self.tree.contains(target) {
            return event;
        }
        event.set_target(target);

        let path = if event.bubbles() {
            let mut path = vec![target];
            let mut cursor = self.parent(target);
            while let Some(current) = cursor {
                path.push(current);
                cursor = self.parent(current);
            }
            path
        } else {
            vec![target]
        };

        for current in path {
            event.set_current_target(current);
            self.invoke(current, &mut event);
            if event.is_propagation_stopped() {
                break;
            }
        }

        self.flush();
        event
    }

    /// Dispatches a fresh bubbling event of `event_type` to `target`.
    pub fn emit(&mut self, target: NodeId, event_type: &str) -> Event {
        self.dispatch(target, Event::new(event_type))
    }

    /// Dispatches an event raised by the platform on `handle`.
    ///
    /// Returns `None` if the element does not belong to this tree.
    pub fn dispatch_element(&mut self, handle: ElementHandle, event: Event) -> Option<Event> {
        let target = self.tree.node_for_handle(handle)?;
        Some(self.dispatch(target, event))
    }

    fn invoke(&mut self, id: NodeId, event: &mut Event) {
        let kind = event.kind().to_string();
        let Some(mut handlers) = self
            .tree
            .get_mut(id)
            .and_then(|node| node.listeners.get_mut(&kind))
            .map(mem::take)
        else {
            return;
        };

        for handler in &mut handlers {
            handler(self, event);
        }

        // Handlers registered while the list was checked out go after the originals.
        if let Some(node) = self.tree.get_mut(id) {
            let slot = node.listeners.entry(kind).or_default();
            let added = mem::take(slot);
            handlers.extend(added);
            *slot = handlers;
        }
    }

    /// A handle on the queue [`Ui::watch`] subscribers push into.
    #[must_use]
    pub fn effects(&self) -> EffectQueue {
        self.effects.clone()
    }

    /// Runs every pending effect, including ones queued by effects.
    pub fn flush(&mut self) {
        while let Some(effect) = self.effects.pop() {
            effect(self);
        }
    }

    /// Subscribes to a state cell with a callback that may mutate the tree.
    ///
    /// The callback runs on the next [`Ui::flush`], which happens automatically
    /// at the end of every [`Ui::dispatch`].
    pub fn watch<T: Clone + 'static>(
        &self,
        state: &State<T>,
        f: impl Fn(&mut Self, &T) + 'static,
    ) -> Subscription {
        let queue = self.effects.clone();
        let f = Rc::new(f);
        state.subscribe(move |value: &T| {
            let f = Rc::clone(&f);
            let value = value.clone();
            queue.push(move |ui: &mut Self| f(ui, &value));
        })
    }
}
