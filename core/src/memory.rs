//! An in-memory [`Dom`] used for tests and for rendering to an HTML string.

use std::collections::{BTreeSet, HashMap};

use indexmap::IndexMap;

use crate::{Dom, DomError, ElementHandle};

#[derive(Debug, Default)]
struct MemoryElement {
    tag: String,
    text: Option<String>,
    attributes: IndexMap<String, String>,
    styles: IndexMap<String, String>,
    properties: HashMap<String, String>,
    children: Vec<ElementHandle>,
    parent: Option<ElementHandle>,
    listening: BTreeSet<String>,
}

/// A DOM that lives entirely in memory.
///
/// Element `0` is the document body. Handles of released elements are handed
/// out again, most recently freed first.
#[derive(Debug)]
pub struct MemoryDom {
    elements: Vec<Option<MemoryElement>>,
    free: Vec<usize>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// Creates a document containing only an empty `body`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            elements: vec![Some(MemoryElement {
                tag: "body".to_string(),
                ..MemoryElement::default()
            })],
            free: Vec::new(),
        }
    }

    /// Number of live elements, including the body.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.iter().flatten().count()
    }

    /// Number of element slots allocated so far, live or free.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.elements.len()
    }

    /// Returns whether the platform was asked to forward `event_type` for `element`.
    #[must_use]
    pub fn is_listening(&self, element: ElementHandle, event_type: &str) -> bool {
        self.get(element)
            .is_some_and(|el| el.listening.contains(event_type))
    }

    fn get(&self, handle: ElementHandle) -> Option<&MemoryElement> {
        usize::try_from(handle.into_raw())
            .ok()
            .and_then(|index| self.elements.get(index))
            .and_then(Option::as_ref)
    }

    fn get_mut(&mut self, handle: ElementHandle) -> Result<&mut MemoryElement, DomError> {
        usize::try_from(handle.into_raw())
            .ok()
            .and_then(|index| self.elements.get_mut(index))
            .and_then(Option::as_mut)
            .ok_or(DomError::UnknownElement(handle))
    }

    fn detach(&mut self, child: ElementHandle) -> Result<(), DomError> {
        if let Some(parent) = self.get_mut(child)?.parent.take() {
            self.get_mut(parent)?.children.retain(|c| *c != child);
        }
        Ok(())
    }

    fn write_html(&self, handle: ElementHandle, out: &mut String) {
        let Some(el) = self.get(handle) else {
            return;
        };
        out.push('<');
        out.push_str(&el.tag);
        for (name, value) in &el.attributes {
            out.push_str(&format!(" {name}=\"{}\"", escape(value)));
        }
        if !el.styles.is_empty() {
            let style = el
                .styles
                .iter()
                .map(|(property, value)| format!("{property}: {value}"))
                .collect::<Vec<_>>()
                .join("; ");
            out.push_str(&format!(" style=\"{}\"", escape(&style)));
        }
        out.push('>');
        if let Some(text) = &el.text {
            out.push_str(&escape(text));
        }
        for child in &el.children {
            self.write_html(*child, out);
        }
        out.push_str("</");
        out.push_str(&el.tag);
        out.push('>');
    }
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl Dom for MemoryDom {
    fn body(&self) -> ElementHandle {
        ElementHandle::from_raw(0)
    }

    fn create_element(&mut self, tag: &str) -> Result<ElementHandle, DomError> {
        if tag.is_empty() || tag.contains(char::is_whitespace) {
            return Err(DomError::Platform(format!("invalid tag name `{tag}`")));
        }
        let element = MemoryElement {
            tag: tag.to_ascii_lowercase(),
            ..MemoryElement::default()
        };
        let index = if let Some(index) = self.free.pop() {
            self.elements[index] = Some(element);
            index
        } else {
            self.elements.push(Some(element));
            self.elements.len() - 1
        };
        Ok(ElementHandle::from_raw(index as u64))
    }

    fn set_text(&mut self, element: ElementHandle, text: &str) -> Result<(), DomError> {
        self.get_mut(element)?.text = Some(text.to_string());
        Ok(())
    }

    fn set_attribute(
        &mut self,
        element: ElementHandle,
        name: &str,
        value: &str,
    ) -> Result<(), DomError> {
        self.get_mut(element)?
            .attributes
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn remove_attribute(&mut self, element: ElementHandle, name: &str) -> Result<(), DomError> {
        self.get_mut(element)?.attributes.shift_remove(name);
        Ok(())
    }

    fn set_style(
        &mut self,
        element: ElementHandle,
        property: &str,
        value: &str,
    ) -> Result<(), DomError> {
        let el = self.get_mut(element)?;
        if value.is_empty() {
            el.styles.shift_remove(property);
        } else {
            el.styles.insert(property.to_string(), value.to_string());
        }
        Ok(())
    }

    fn set_property(
        &mut self,
        element: ElementHandle,
        name: &str,
        value: &str,
    ) -> Result<(), DomError> {
        self.get_mut(element)?
            .properties
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn append_child(
        &mut self,
        parent: ElementHandle,
        child: ElementHandle,
    ) -> Result<(), DomError> {
        self.get_mut(parent)?;
        self.detach(child)?;
        self.get_mut(child)?.parent = Some(parent);
        self.get_mut(parent)?.children.push(child);
        Ok(())
    }

    fn remove_child(
        &mut self,
        parent: ElementHandle,
        child: ElementHandle,
    ) -> Result<(), DomError> {
        if self.get_mut(child)?.parent != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        self.detach(child)
    }

    fn listen(&mut self, element: ElementHandle, event_type: &str) -> Result<(), DomError> {
        self.get_mut(element)?
            .listening
            .insert(event_type.to_string());
        Ok(())
    }

    fn release(&mut self, element: ElementHandle) {
        if element == self.body() || self.detach(element).is_err() {
            return;
        }
        let Some(index) = usize::try_from(element.into_raw()).ok() else {
            return;
        };
        let Some(released) = self.elements.get_mut(index).and_then(Option::take) else {
            return;
        };
        for child in released.children {
            if let Ok(orphan) = self.get_mut(child) {
                orphan.parent = None;
            }
        }
        self.free.push(index);
    }

    fn parent(&self, element: ElementHandle) -> Option<ElementHandle> {
        self.get(element).and_then(|el| el.parent)
    }

    fn children(&self, element: ElementHandle) -> Vec<ElementHandle> {
        self.get(element)
            .map(|el| el.children.clone())
            .unwrap_or_default()
    }

    fn tag_name(&self, element: ElementHandle) -> Option<String> {
        self.get(element).map(|el| el.tag.clone())
    }

    fn text(&self, element: ElementHandle) -> Option<String> {
        self.get(element).and_then(|el| el.text.clone())
    }

    fn attribute(&self, element: ElementHandle, name: &str) -> Option<String> {
        self.get(element)
            .and_then(|el| el.attributes.get(name).cloned())
    }

    fn style(&self, element: ElementHandle, property: &str) -> Option<String> {
        self.get(element)
            .and_then(|el| el.styles.get(property).cloned())
    }

    fn property(&self, element: ElementHandle, name: &str) -> Option<String> {
        self.get(element)
            .and_then(|el| el.properties.get(name).cloned())
    }

    fn outer_html(&self, element: ElementHandle) -> Option<String> {
        self.get(element)?;
        let mut out = String::new();
        self.write_html(element, &mut out);
        Some(out)
    }
}
