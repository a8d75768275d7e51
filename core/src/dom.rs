//! The render boundary between the component tree and a platform DOM.
//!
//! A [`Dom`] hands out opaque [`ElementHandle`]s and performs the handful of
//! mutations the component tree needs. The browser implementation lives in
//! `trellis-web`; [`MemoryDom`](crate::MemoryDom) keeps everything in memory
//! and is what the test-suites render into.

use std::fmt;

use crate::error::DomError;

/// An opaque reference to a live platform element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementHandle(u64);

impl ElementHandle {
    /// Wraps a raw platform identifier.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw platform identifier.
    #[must_use]
    pub const fn into_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element#{}", self.0)
    }
}

/// Operations a platform must provide so components can be mounted into it.
///
/// Mutating methods mirror the DOM APIs of the same name. Query methods exist so
/// that widgets can read back live state (the value of an `input`, the selected
/// index of a `select`) and so tests can inspect what was rendered.
pub trait Dom {
    /// The element that hosts the document body.
    fn body(&self) -> ElementHandle;

    /// Creates a detached element with the given tag name.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses to create the element.
    fn create_element(&mut self, tag: &str) -> Result<ElementHandle, DomError>;

    /// Replaces the text content of an element.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is unknown to the platform.
    fn set_text(&mut self, element: ElementHandle, text: &str) -> Result<(), DomError>;

    /// Sets an attribute.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is unknown or the attribute name is invalid.
    fn set_attribute(
        &mut self,
        element: ElementHandle,
        name: &str,
        value: &str,
    ) -> Result<(), DomError>;

    /// Removes an attribute. Removing a missing attribute is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is unknown.
    fn remove_attribute(&mut self, element: ElementHandle, name: &str) -> Result<(), DomError>;

    /// Sets an inline style property. An empty value clears the property.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is unknown.
    fn set_style(
        &mut self,
        element: ElementHandle,
        property: &str,
        value: &str,
    ) -> Result<(), DomError>;

    /// Sets a live element property such as `value`, `checked` or `selectedIndex`.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is unknown.
    fn set_property(
        &mut self,
        element: ElementHandle,
        name: &str,
        value: &str,
    ) -> Result<(), DomError>;

    /// Appends `child` to `parent`, detaching it from any previous parent first.
    ///
    /// # Errors
    ///
    /// Returns an error if either element is unknown.
    fn append_child(&mut self, parent: ElementHandle, child: ElementHandle)
    -> Result<(), DomError>;

    /// Detaches `child` from `parent`.
    ///
    /// # Errors
    ///
    /// Returns an error if either element is unknown or `child` is not a child of `parent`.
    fn remove_child(&mut self, parent: ElementHandle, child: ElementHandle)
    -> Result<(), DomError>;

    /// Asks the platform to forward events of `event_type` raised on `element`
    /// back to the component tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is unknown.
    fn listen(&mut self, element: ElementHandle, event_type: &str) -> Result<(), DomError>;

    /// Drops an element the component tree no longer uses, together with its
    /// forwarded listeners.
    ///
    /// The element is detached from its parent and its children are left
    /// without one. The handle may be returned again by a later
    /// [`Dom::create_element`]. Unknown handles and the body are ignored.
    fn release(&mut self, element: ElementHandle);

    /// Returns the parent element, if attached.
    fn parent(&self, element: ElementHandle) -> Option<ElementHandle>;

    /// Returns the children of an element in document order.
    fn children(&self, element: ElementHandle) -> Vec<ElementHandle>;

    /// Returns the lower-case tag name of an element.
    fn tag_name(&self, element: ElementHandle) -> Option<String>;

    /// Returns the text content set on an element.
    fn text(&self, element: ElementHandle) -> Option<String>;

    /// Reads an attribute.
    fn attribute(&self, element: ElementHandle, name: &str) -> Option<String>;

    /// Reads an inline style property.
    fn style(&self, element: ElementHandle, property: &str) -> Option<String>;

    /// Reads a live element property.
    fn property(&self, element: ElementHandle, name: &str) -> Option<String>;

    /// Serialises an element and its subtree as HTML.
    fn outer_html(&self, element: ElementHandle) -> Option<String>;
}
