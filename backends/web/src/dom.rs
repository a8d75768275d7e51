use std::{cell::RefCell, fmt, rc::Rc};

use js_sys::Reflect;
use tracing::{trace, warn};
use trellis_core::{Dom, DomError, ElementHandle, Event};
use wasm_bindgen::{JsCast, JsValue, closure::Closure};
use web_sys::{Document, Element, HtmlElement, KeyboardEvent, Node, Window};

use crate::error::{WebError, platform};

const STYLE_ELEMENT_ID: &str = "trellis-web-styles";
const DEFAULT_ROOT_ID: &str = "trellis-root";
const HANDLE_KEY: &str = "__trellisHandle";
const DISPATCHED_KEY: &str = "__trellisDispatched";

/// Delivers a platform event to the component tree and reports the outcome.
pub(crate) type Deliver = Box<dyn Fn(ElementHandle, Event) -> Option<Event>>;

/// Slot the application installs its [`Deliver`] callback into once the
/// component tree owning the [`WebDom`] exists.
pub(crate) type EventSink = Rc<RefCell<Option<Deliver>>>;

/// The element a [`WebApp`](crate::WebApp) mounts into.
#[derive(Debug, Clone)]
pub struct DomRoot {
    document: Document,
    element: Element,
}

impl DomRoot {
    /// Creates a [`DomRoot`] pointing at the provided element id.
    ///
    /// Without an id a fresh `div#trellis-root` is appended to the body.
    ///
    /// # Errors
    ///
    /// Returns an error outside a browser or if no element has the given id.
    pub fn new(root_id: Option<&str>, inject_styles: bool) -> Result<Self, WebError> {
        let window: Window = web_sys::window().ok_or(WebError::DomUnavailable)?;
        let document: Document = window.document().ok_or(WebError::DomUnavailable)?;

        if inject_styles {
            inject_stylesheet(&document)?;
        }

        let element = if let Some(id) = root_id {
            document
                .get_element_by_id(id)
                .ok_or_else(|| WebError::RootNotFound(id.to_string()))?
        } else {
            let body = document.body().ok_or(WebError::DomUnavailable)?;
            let host = document.create_element("div")?;
            host.set_id(DEFAULT_ROOT_ID);
            body.append_child(&host)?;
            host
        };
        element.class_list().add_1("trellis-root")?;

        Ok(Self { document, element })
    }

    /// Returns the DOM element representing the mounting point.
    #[must_use]
    pub const fn element(&self) -> &Element {
        &self.element
    }

    /// Returns the owning document.
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// Finds the rendered element carrying `handle` at or below the mounting
    /// point.
    ///
    /// JavaScript libraries that draw into a node, such as a charting
    /// library given a canvas, use this to reach the browser element.
    #[must_use]
    pub fn find(&self, handle: ElementHandle) -> Option<Element> {
        if handle_of(&self.element) == Some(handle) {
            return Some(self.element.clone());
        }
        let descendants = self.element.query_selector_all("*").ok()?;
        (0..descendants.length())
            .filter_map(|index| descendants.item(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .find(|element| handle_of(element) == Some(handle))
    }

    /// Clears the mounting element.
    ///
    /// # Errors
    ///
    /// Returns an error if the browser refuses to detach a child.
    pub fn clear(&self) -> Result<(), WebError> {
        while let Some(child) = self.element.first_child() {
            self.element.remove_child(&child)?;
        }
        Ok(())
    }
}

fn inject_stylesheet(document: &Document) -> Result<(), WebError> {
    if document.get_element_by_id(STYLE_ELEMENT_ID).is_some() {
        return Ok(());
    }

    let style = document.create_element("style")?;
    style.set_id(STYLE_ELEMENT_ID);
    style.set_attribute("data-trellis", "true")?;
    style.set_inner_html(include_str!("../styles/default.css"));

    if let Some(head) = document.head() {
        head.append_child(&style)?;
    } else if let Some(body) = document.body() {
        body.prepend_with_node_1(&style)?;
    } else {
        return Err(WebError::DomUnavailable);
    }
    Ok(())
}

// ============================================================================
// WebDom
// ============================================================================

/// A live element and the listeners forwarding its events.
struct Slot {
    element: Element,
    listeners: Vec<(String, Closure<dyn FnMut(web_sys::Event)>)>,
}

/// A [`Dom`] backed by the browser document.
///
/// Handles index into the elements this DOM created; handle `0` is the root
/// element the application mounts into. Every element also carries its handle
/// as a JavaScript property so events can be mapped back to nodes. Released
/// slots are reused by later elements.
pub struct WebDom {
    document: Document,
    elements: Vec<Option<Slot>>,
    free: Vec<usize>,
    sink: EventSink,
}

impl fmt::Debug for WebDom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let live = self.elements.iter().flatten();
        f.debug_struct("WebDom")
            .field("elements", &live.clone().count())
            .field(
                "listeners",
                &live.map(|slot| slot.listeners.len()).sum::<usize>(),
            )
            .field("free", &self.free.len())
            .finish_non_exhaustive()
    }
}

impl WebDom {
    /// Wraps `root`; its element becomes the body of the component tree.
    ///
    /// # Errors
    ///
    /// Fails if the root element cannot be tagged with its handle.
    pub fn new(root: &DomRoot) -> Result<Self, WebError> {
        let mut dom = Self {
            document: root.document().clone(),
            elements: Vec::new(),
            free: Vec::new(),
            sink: Rc::new(RefCell::new(None)),
        };
        dom.register(root.element().clone())?;
        Ok(dom)
    }

    pub(crate) fn sink(&self) -> EventSink {
        Rc::clone(&self.sink)
    }

    fn register(&mut self, element: Element) -> Result<ElementHandle, WebError> {
        let index = self.free.pop().unwrap_or(self.elements.len());
        let handle = ElementHandle::from_raw(index as u64);
        if let Err(err) = tag_handle(&element, handle) {
            if index < self.elements.len() {
                self.free.push(index);
            }
            return Err(err);
        }
        let slot = Some(Slot {
            element,
            listeners: Vec::new(),
        });
        if index == self.elements.len() {
            self.elements.push(slot);
        } else {
            self.elements[index] = slot;
        }
        Ok(handle)
    }

    fn slot_index(handle: ElementHandle) -> Option<usize> {
        usize::try_from(handle.into_raw()).ok()
    }

    fn element(&self, handle: ElementHandle) -> Result<&Element, DomError> {
        Self::slot_index(handle)
            .and_then(|index| self.elements.get(index))
            .and_then(Option::as_ref)
            .map(|slot| &slot.element)
            .ok_or(DomError::UnknownElement(handle))
    }

    fn lookup(&self, handle: ElementHandle) -> Option<&Element> {
        self.element(handle).ok()
    }
}

#[allow(clippy::cast_precision_loss)]
fn tag_handle(element: &Element, handle: ElementHandle) -> Result<(), WebError> {
    Reflect::set(
        element,
        &JsValue::from_str(HANDLE_KEY),
        &JsValue::from_f64(handle.into_raw() as f64),
    )?;
    Ok(())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn handle_of(element: &Element) -> Option<ElementHandle> {
    let raw = Reflect::get(element, &JsValue::from_str(HANDLE_KEY))
        .ok()?
        .as_f64()?;
    Some(ElementHandle::from_raw(raw as u64))
}

/// The handle of `element` or of its nearest ancestor created by a [`WebDom`].
fn nearest_handle(element: Element) -> Option<ElementHandle> {
    let mut cursor = Some(element);
    while let Some(current) = cursor {
        if let Some(handle) = handle_of(&current) {
            return Some(handle);
        }
        cursor = current.parent_element();
    }
    None
}

/// How a live property value crosses into JavaScript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PropertyKind {
    Flag,
    Number,
    Text,
}

fn property_kind(name: &str) -> PropertyKind {
    match name {
        "checked" | "disabled" | "readOnly" | "selected" | "multiple" | "indeterminate" => {
            PropertyKind::Flag
        }
        "selectedIndex" | "maxLength" | "rows" | "cols" | "tabIndex" => PropertyKind::Number,
        _ => PropertyKind::Text,
    }
}

fn to_js(name: &str, value: &str) -> JsValue {
    match property_kind(name) {
        PropertyKind::Flag => JsValue::from_bool(value == "true"),
        PropertyKind::Number => value
            .parse::<f64>()
            .map_or_else(|_| JsValue::from_str(value), JsValue::from_f64),
        PropertyKind::Text => JsValue::from_str(value),
    }
}

fn from_js(value: &JsValue) -> Option<String> {
    if value.is_undefined() || value.is_null() {
        return None;
    }
    if let Some(flag) = value.as_bool() {
        return Some(flag.to_string());
    }
    if let Some(number) = value.as_f64() {
        return Some(number.to_string());
    }
    value.as_string()
}

/// Forwards a browser event to the component tree exactly once.
///
/// The tree bubbles events itself, so ancestors that also listen for the
/// same type see the event already marked and skip it.
fn forward(sink: &EventSink, raw: &web_sys::Event) {
    let marker = JsValue::from_str(DISPATCHED_KEY);
    if Reflect::get(raw, &marker).is_ok_and(|seen| seen.is_truthy()) {
        return;
    }
    if Reflect::set(raw, &marker, &JsValue::TRUE).is_err() {
        return;
    }

    let Some(handle) = raw
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok())
        .and_then(nearest_handle)
    else {
        return;
    };

    let kind = raw.type_();
    let mut event = if raw.bubbles() {
        Event::new(kind)
    } else {
        Event::non_bubbling(kind)
    };
    if let Some(keyboard) = raw.dyn_ref::<KeyboardEvent>() {
        event = event.with_value(keyboard.key());
    }

    let Ok(slot) = sink.try_borrow() else {
        return;
    };
    let Some(deliver) = slot.as_ref() else {
        trace!(%handle, "event raised before the application was wired");
        return;
    };
    if deliver(handle, event).is_some_and(|event| event.is_default_prevented()) {
        raw.prevent_default();
    }
}

impl Dom for WebDom {
    fn body(&self) -> ElementHandle {
        ElementHandle::from_raw(0)
    }

    fn create_element(&mut self, tag: &str) -> Result<ElementHandle, DomError> {
        let element = self.document.create_element(tag).map_err(platform)?;
        Ok(self.register(element)?)
    }

    fn set_text(&mut self, element: ElementHandle, text: &str) -> Result<(), DomError> {
        self.element(element)?.set_text_content(Some(text));
        Ok(())
    }

    fn set_attribute(
        &mut self,
        element: ElementHandle,
        name: &str,
        value: &str,
    ) -> Result<(), DomError> {
        self.element(element)?
            .set_attribute(name, value)
            .map_err(platform)
    }

    fn remove_attribute(&mut self, element: ElementHandle, name: &str) -> Result<(), DomError> {
        self.element(element)?
            .remove_attribute(name)
            .map_err(platform)
    }

    fn set_style(
        &mut self,
        element: ElementHandle,
        property: &str,
        value: &str,
    ) -> Result<(), DomError> {
        let Some(html) = self.element(element)?.dyn_ref::<HtmlElement>() else {
            warn!(%element, property, "inline styles need an HTML element");
            return Ok(());
        };
        let style = html.style();
        if value.is_empty() {
            style.remove_property(property).map_err(platform)?;
            Ok(())
        } else {
            style.set_property(property, value).map_err(platform)
        }
    }

    fn set_property(
        &mut self,
        element: ElementHandle,
        name: &str,
        value: &str,
    ) -> Result<(), DomError> {
        let target = self.element(element)?;
        Reflect::set(target, &JsValue::from_str(name), &to_js(name, value)).map_err(platform)?;
        Ok(())
    }

    fn append_child(
        &mut self,
        parent: ElementHandle,
        child: ElementHandle,
    ) -> Result<(), DomError> {
        let parent = self.element(parent)?;
        let child = self.element(child)?;
        parent.append_child(child).map_err(platform)?;
        Ok(())
    }

    fn remove_child(
        &mut self,
        parent: ElementHandle,
        child: ElementHandle,
    ) -> Result<(), DomError> {
        let parent_element = self.element(parent)?;
        let child_element = self.element(child)?;
        let parent_node: &Node = parent_element;
        let attached = child_element
            .parent_element()
            .is_some_and(|current| current.is_same_node(Some(parent_node)));
        if !attached {
            return Err(DomError::NotAChild { parent, child });
        }
        parent_element.remove_child(child_element).map_err(platform)?;
        Ok(())
    }

    fn listen(&mut self, element: ElementHandle, event_type: &str) -> Result<(), DomError> {
        let target = self.element(element)?.clone();
        let sink = Rc::clone(&self.sink);
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |raw: web_sys::Event| {
            forward(&sink, &raw);
        });
        target
            .add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())
            .map_err(platform)?;
        trace!(%element, event_type, "listening");
        if let Some(slot) = Self::slot_index(element)
            .and_then(|index| self.elements.get_mut(index))
            .and_then(Option::as_mut)
        {
            slot.listeners.push((event_type.to_owned(), closure));
        }
        Ok(())
    }

    fn release(&mut self, element: ElementHandle) {
        if element == self.body() {
            return;
        }
        let Some(index) = Self::slot_index(element) else {
            return;
        };
        let Some(slot) = self.elements.get_mut(index).and_then(Option::take) else {
            return;
        };

        for (event_type, closure) in &slot.listeners {
            if let Err(err) = slot
                .element
                .remove_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())
            {
                warn!(%element, event_type, ?err, "could not remove listener");
            }
        }
        slot.element.remove();
        if let Err(err) = Reflect::delete_property(&slot.element, &JsValue::from_str(HANDLE_KEY)) {
            warn!(%element, ?err, "could not clear element handle");
        }
        trace!(%element, listeners = slot.listeners.len(), "released");
        self.free.push(index);
    }

    fn parent(&self, element: ElementHandle) -> Option<ElementHandle> {
        self.lookup(element)?
            .parent_element()
            .as_ref()
            .and_then(handle_of)
    }

    fn children(&self, element: ElementHandle) -> Vec<ElementHandle> {
        let Some(element) = self.lookup(element) else {
            return Vec::new();
        };
        let collection = element.children();
        (0..collection.length())
            .filter_map(|index| collection.item(index))
            .filter_map(|child| handle_of(&child))
            .collect()
    }

    fn tag_name(&self, element: ElementHandle) -> Option<String> {
        Some(self.lookup(element)?.tag_name().to_ascii_lowercase())
    }

    fn text(&self, element: ElementHandle) -> Option<String> {
        self.lookup(element)?.text_content()
    }

    fn attribute(&self, element: ElementHandle, name: &str) -> Option<String> {
        self.lookup(element)?.get_attribute(name)
    }

    fn style(&self, element: ElementHandle, property: &str) -> Option<String> {
        let html = self.lookup(element)?.dyn_ref::<HtmlElement>()?;
        let value = html.style().get_property_value(property).ok()?;
        (!value.is_empty()).then_some(value)
    }

    fn property(&self, element: ElementHandle, name: &str) -> Option<String> {
        let target = self.lookup(element)?;
        let value = Reflect::get(target, &JsValue::from_str(name)).ok()?;
        from_js(&value)
    }

    fn outer_html(&self, element: ElementHandle) -> Option<String> {
        Some(self.lookup(element)?.outer_html())
    }
}

#[cfg(test)]
mod tests {
    use super::{PropertyKind, property_kind};

    #[test]
    fn property_kinds() {
        assert_eq!(property_kind("checked"), PropertyKind::Flag);
        assert_eq!(property_kind("disabled"), PropertyKind::Flag);
        assert_eq!(property_kind("selectedIndex"), PropertyKind::Number);
        assert_eq!(property_kind("value"), PropertyKind::Text);
        assert_eq!(property_kind("placeholder"), PropertyKind::Text);
    }
}
