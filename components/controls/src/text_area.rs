//! Multi-line text input.

use trellis_core::{Event, NodeId, Ui, Widget};

use crate::{focus_feedback, live_value};

/// A vertically resizable `<textarea>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextArea {
    id: NodeId,
}

impl Widget for TextArea {
    fn id(&self) -> NodeId {
        self.id
    }
}

impl TextArea {
    /// Creates an empty text area.
    pub fn new(ui: &mut Ui) -> Self {
        let id = ui
            .create_widget("textarea")
            .styles([
                ("padding", "8px 12px"),
                ("border", "1px solid #dadce0"),
                ("border-radius", "4px"),
                ("font-size", "14px"),
                ("font-family", "inherit"),
                ("width", "100%"),
                ("resize", "vertical"),
                ("min-height", "80px"),
                ("transition", "border-color 0.2s"),
            ])
            .id();
        focus_feedback(ui, id);
        Self { id }
    }

    /// Creates a text area with the given visible size in characters.
    pub fn with_size(ui: &mut Ui, rows: u32, cols: u32) -> Self {
        Self::new(ui).rows(ui, rows).cols(ui, cols)
    }

    /// The current text.
    #[must_use]
    pub fn value(self, ui: &Ui) -> String {
        live_value(ui, self.id, ui.text(self.id))
    }

    /// Replaces the text.
    pub fn set_value(self, ui: &mut Ui, value: &str) -> Self {
        if ui.is_mounted(self.id) {
            let _ = ui.set_property(self.id, "value", value);
        } else {
            let _ = ui.node(self.id).text(value);
        }
        self
    }

    /// Sets the hint shown while the area is empty.
    pub fn placeholder(self, ui: &mut Ui, text: &str) -> Self {
        let _ = ui.node(self.id).attr("placeholder", text);
        self
    }

    /// Number of visible text lines.
    pub fn rows(self, ui: &mut Ui, rows: u32) -> Self {
        let _ = ui.node(self.id).attr("rows", format!("{rows}"));
        self
    }

    /// Visible width in characters.
    pub fn cols(self, ui: &mut Ui, cols: u32) -> Self {
        let _ = ui.node(self.id).attr("cols", format!("{cols}"));
        self
    }

    /// Makes the area read-only or editable again.
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::MemoryDom;

    #[test]
    fn initial_value_is_text_content() {
        let mut ui = Ui::new(MemoryDom::new());
        let area = TextArea::with_size(&mut ui, 4, 40).set_value(&mut ui, "hello");

        assert_eq!(ui.attribute(area.id(), "rows"), Some("4"));
        assert_eq!(ui.attribute(area.id(), "cols"), Some("40"));
        assert_eq!(area.value(&ui), "hello");

        let body = ui.body();
        let element = ui.render(area.id(), body).unwrap();
        assert_eq!(
            ui.dom().outer_html(element).map(|html| html.ends_with(">hello</textarea>")),
            Some(true)
        );

        area.set_value(&mut ui, "bye");
        assert_eq!(area.value(&ui), "bye");
    }
}
