//! Chainable access to a single node.

use tracing::warn;

use crate::{Event, NodeId, Ui, UiError, layout::Constraint, layout::Layout};

/// A mutable view of one node that supports builder-style chaining.
///
/// Setters never fail loudly: a rejected mutation is logged and the chain
/// continues. Use the fallible methods on [`Ui`] when the error matters.
///
/// ```
/// use trellis_core::{MemoryDom, Ui};
///
/// let mut ui = Ui::new(MemoryDom::new());
/// let title = ui
///     .create("h1")
///     .text("Hello")
///     .style("color", "#333")
///     .id();
/// assert_eq!(ui.text(title), Some("Hello"));
/// ```
#[derive(Debug)]
pub struct NodeMut<'a> {
    ui: &'a mut Ui,
    id: NodeId,
}

impl<'a> NodeMut<'a> {
    pub(crate) const fn new(ui: &'a mut Ui, id: NodeId) -> Self {
        Self { ui, id }
    }

    /// The id of the node being edited.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// The tree the node lives in.
    pub fn ui(&mut self) -> &mut Ui {
        &mut *self.ui
    }

    fn report(self, result: Result<(), UiError>, what: &str) -> Self {
        if let Err(error) = result {
            warn!(node = %self.id, %error, "failed to {what}");
        }
        self
    }

    /// Sets the text content.
    #[must_use]
    pub fn text(self, text: impl Into<String>) -> Self {
        let result = self.ui.set_text(self.id, text);
        self.report(result, "set text")
    }

    /// Sets an attribute.
    #[must_use]
    pub fn attr(self, name: &str, value: impl Into<String>) -> Self {
        let result = self.ui.set_attribute(self.id, name, value);
        self.report(result, "set attribute")
    }

    /// Removes an attribute.
    #[must_use]
    pub fn remove_attr(self, name: &str) -> Self {
        let result = self.ui.remove_attribute(self.id, name);
        self.report(result, "remove attribute")
    }

    /// Sets an inline style property.
    #[must_use]
    pub fn style(self, property: &str, value: impl Into<String>) -> Self {
        let result = self.ui.set_style(self.id, property, value);
        self.report(result, "set style")
    }

    /// Sets several inline style properties in order.
    #[must_use]
    pub fn styles<'s>(mut self, declarations: impl IntoIterator<Item = (&'s str, &'s str)>) -> Self {
        for (property, value) in declarations {
            self = self.style(property, value);
        }
        self
    }

    /// Registers an event handler.
    #[must_use]
    pub fn on(self, event_type: &str, handler: impl FnMut(&mut Ui, &mut Event) + 'static) -> Self {
        let result = self.ui.add_event_listener(self.id, event_type, handler);
        self.report(result, "add event listener")
    }

    /// Attaches a layout manager.
    #[must_use]
    pub fn layout(self, layout: impl Layout + 'static) -> Self {
        let result = self.ui.set_layout(self.id, layout);
        self.report(result, "set layout")
    }

    /// Enables or disables the node.
    #[must_use]
    pub fn enabled(self, enabled: bool) -> Self {
        let result = self.ui.set_enabled(self.id, enabled);
        self.report(result, "toggle enabled")
    }

    /// Shows or hides the node.
    #[must_use]
    pub fn visible(self, visible: bool) -> Self {
        let result = self.ui.set_visible(self.id, visible);
        self.report(result, "toggle visibility")
    }

    /// Appends a child.
    ///
    /// # Errors
    ///
    /// See [`Ui::add_child`].
    pub fn child(self, child: NodeId) -> Result<Self, UiError> {
        self.ui.add_child(self.id, child)?;
        Ok(self)
    }

    /// Appends a child with a layout constraint.
    ///
    /// # Errors
    ///
    /// See [`Ui::add_child_with`].
    pub fn child_with(self, child: NodeId, constraint: impl Into<Constraint>) -> Result<Self, UiError> {
        self.ui.add_child_with(self.id, child, constraint)?;
        Ok(self)
    }

    // ========================================================================
    // Style shorthands
    // ========================================================================

    /// Sets the `title` attribute.
    #[must_use]
    pub fn tooltip(self, text: impl Into<String>) -> Self {
        self.attr("title", text)
    }

    /// Sets the `id` attribute.
    #[must_use]
    pub fn dom_id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    /// Sets the width in pixels.
    #[must_use]
    pub fn width(self, px: u32) -> Self {
        self.style("width", format!("{px}px"))
    }

    /// Sets the height in pixels.
    #[must_use]
    pub fn height(self, px: u32) -> Self {
        self.style("height", format!("{px}px"))
    }

    /// Sets both dimensions in pixels.
    #[must_use]
    pub fn size(self, width: u32, height: u32) -> Self {
        self.width(width).height(height)
    }

    /// Sets the CSS `margin` shorthand.
    #[must_use]
    pub fn margin(self, value: &str) -> Self {
        self.style("margin", value)
    }

    /// Sets the CSS `padding` shorthand.
    #[must_use]
    pub fn padding(self, value: &str) -> Self {
        self.style("padding", value)
    }

    /// Sets the background color.
    #[must_use]
    pub fn background(self, color: &str) -> Self {
        self.style("background-color", color)
    }

    /// Sets the text color.
    #[must_use]
    pub fn foreground(self, color: &str) -> Self {
        self.style("color", color)
    }

    /// Sets the CSS `border` shorthand.
    #[must_use]
    pub fn border(self, value: &str) -> Self {
        self.style("border", value)
    }

    /// Sets the CSS `font` shorthand.
    #[must_use]
    pub fn font(self, value: &str) -> Self {
        self.style("font", value)
    }

    /// Sets the font size in pixels.
    #[must_use]
    pub fn font_size(self, px: u32) -> Self {
        self.style("font-size", format!("{px}px"))
    }

    /// Sets the font weight, e.g. `bold` or `600`.
    #[must_use]
    pub fn font_weight(self, weight: &str) -> Self {
        self.style("font-weight", weight)
    }

    /// Sets the text alignment.
    #[must_use]
    pub fn text_align(self, align: &str) -> Self {
        self.style("text-align", align)
    }
}

/// A component backed by a single root node.
///
/// Containers accept anything implementing this, so widgets and raw node ids
/// can be mixed freely.
pub trait Widget {
    /// The root node of the component.
    fn id(&self) -> NodeId;
}

impl Widget for NodeId {
    fn id(&self) -> NodeId {
        *self
    }
}
