//! Single-line text input.

use trellis_core::{Event, NodeId, Ui, Widget};

use crate::{focus_feedback, live_value};

/// An `<input type="text">`.
///
/// Before the field is mounted its value is kept in the `value` attribute;
/// afterwards reads and writes go through the element's live `value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextField {
    id: NodeId,
}

impl Widget for TextField {
    fn id(&self) -> NodeId {
        self.id
    }
}

impl TextField {
    /// Creates an empty field.
    pub fn new(ui: &mut Ui) -> Self {
        let id = ui
            .create_widget("input")
            .attr("type", "text")
            .styles([
                ("padding", "8px 12px"),
                ("border", "1px solid #dadce0"),
                ("border-radius", "4px"),
                ("font-size", "14px"),
                ("width", "100%"),
                ("transition", "border-color 0.2s"),
            ])
            .id();
        focus_feedback(ui, id);
        Self { id }
    }

    /// Creates a field holding `initial`.
    pub fn with_value(ui: &mut Ui, initial: &str) -> Self {
        let field = Self::new(ui);
        field.set_value(ui, initial);
        field
    }

    /// The current text.
    #[must_use]
    pub fn value(self, ui: &Ui) -> String {
        live_value(ui, self.id, ui.attribute(self.id, "value"))
    }

    /// Replaces the text.
    pub fn set_value(self, ui: &mut Ui, value: &str) -> Self {
        if ui.is_mounted(self.id) {
            let _ = ui.set_property(self.id, "value", value);
        } else {
            let _ = ui.node(self.id).attr("value", value);
        }
        self
    }

    /// Sets the hint shown while the field is empty.
    pub fn placeholder(self, ui: &mut Ui, text: &str) -> Self {
        let _ = ui.node(self.id).attr("placeholder", text);
        self
    }

    /// Limits how many characters can be typed.
    pub fn max_length(self, ui: &mut Ui, length: u32) -> Self {
        let _ = ui.node(self.id).attr("maxlength", format!("{length}"));
        self
    }

    /// Makes the field read-only or editable again.
    pub fn read_only(self, ui: &mut Ui, read_only: bool) -> Self {
        let node = ui.node(self.id);
        let _ = if read_only {
            node.attr("readonly", "readonly")
        } else {
            node.remove_attr("readonly")
        };
        self
    }

    /// Runs `handler` when the committed value changes.
    pub fn on_change(self, ui: &mut Ui, handler: impl FnMut(&mut Ui, &mut Event) + 'static) -> Self {
        let _ = ui.node(self.id).on("change", handler);
        self
    }

    /// Runs `handler` on every edit.
    pub fn on_input(self, ui: &mut Ui, handler: impl FnMut(&mut Ui, &mut Event) + 'static) -> Self {
        let _ = ui.node(self.id).on("input", handler);
        self
    }

    /// Runs `handler` on key presses; the event value carries the key.
    pub fn on_key_press(self, ui: &mut Ui, handler: impl FnMut(&mut Ui, &mut Event) + 'static) -> Self {
        let _ = ui.node(self.id).on("keypress", handler);
        self
    }
}

/// Creates a [`TextField`] holding `initial`.
pub fn field(ui: &mut Ui, initial: &str) -> TextField {
    TextField::with_value(ui, initial)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, rc::Rc};
    use trellis_core::MemoryDom;

    #[test]
    fn value_moves_from_attribute_to_property_on_mount() {
        let mut ui = Ui::new(MemoryDom::new());
        let field = field(&mut ui, "draft");
        assert_eq!(field.value(&ui), "draft");
        assert_eq!(ui.attribute(field.id(), "value"), Some("draft"));

        let body = ui.body();
        let element = ui.render(field.id(), body).unwrap();
        field.set_value(&mut ui, "final");

        assert_eq!(field.value(&ui), "final");
        assert_eq!(ui.dom().property(element, "value").as_deref(), Some("final"));
        // The attribute keeps the initial value, as in HTML.
        assert_eq!(ui.attribute(field.id(), "value"), Some("draft"));
    }

    #[test]
    fn focus_highlights_enabled_fields_only() {
        let mut ui = Ui::new(MemoryDom::new());
        let field = TextField::new(&mut ui);

        ui.emit(field.id(), "focus");
        assert_eq!(ui.style(field.id(), "border-color"), Some("#4285f4"));
        ui.emit(field.id(), "blur");
        assert_eq!(ui.style(field.id(), "border-color"), Some("#dadce0"));

        ui.set_enabled(field.id(), false).unwrap();
        ui.emit(field.id(), "focus");
        assert_eq!(ui.style(field.id(), "border-color"), Some("#dadce0"));
    }

    #[test]
    fn attributes_and_key_events() {
        let mut ui = Ui::new(MemoryDom::new());
        let keys = Rc::new(RefCell::new(String::new()));
        let sink = Rc::clone(&keys);
        let field = TextField::new(&mut ui)
            .placeholder(&mut ui, "Name")
            .max_length(&mut ui, 20)
            .read_only(&mut ui, true)
            .on_key_press(&mut ui, move |_, event| {
                sink.borrow_mut().push_str(event.value().unwrap_or_default());
            });

        assert_eq!(ui.attribute(field.id(), "placeholder"), Some("Name"));
        assert_eq!(ui.attribute(field.id(), "maxlength"), Some("20"));
        assert_eq!(ui.attribute(field.id(), "readonly"), Some("readonly"));
        field.read_only(&mut ui, false);
        assert_eq!(ui.attribute(field.id(), "readonly"), None);

        ui.dispatch(field.id(), Event::new("keypress").with_value("a"));
        ui.dispatch(field.id(), Event::new("keypress").with_value("b"));
        assert_eq!(*keys.borrow(), "ab");
    }
}
