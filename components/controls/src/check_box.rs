//! A checkbox with a clickable label.

use trellis_core::{Event, NodeId, State, Ui, Widget};

use crate::Label;

/// A `<div>` wrapping an `<input type="checkbox">` and an optional [`Label`].
///
/// Clicking anywhere on the row toggles the box and raises `change` on the
/// input. The checked flag is held in a [`State`], so it can be read and
/// observed whether or not the box is mounted.
#[derive(Debug, Clone)]
pub struct CheckBox {
    id: NodeId,
    input: NodeId,
    label: Option<Label>,
    checked: State<bool>,
}

impl Widget for CheckBox {
    fn id(&self) -> NodeId {
        self.id
    }
}

impl CheckBox {
    /// Creates an unchecked box. An empty `label` renders no label.
    pub fn new(ui: &mut Ui, label: &str) -> Self {
        let checked = State::new(false);
        let input = ui
            .create("input")
            .attr("type", "checkbox")
            .style("margin-right", "8px")
            .id();
        let id = ui
            .create("div")
            .styles([
                ("display", "flex"),
                ("align-items", "center"),
                ("cursor", "pointer"),
            ])
            .id();
        let _ = ui.add_child(id, input);

        let label = (!label.is_empty()).then(|| Label::new(ui, label));
        if let Some(label) = label {
            let _ = ui.add_child(id, label.id());
        }

        let state = checked.clone();
        let _ = ui.node(id).on("click", move |ui, event| {
            if ui.attribute(id, "disabled").is_some() {
                return;
            }
            // A click on the input itself has already been toggled by the platform.
            let next = if event.target() == Some(input) {
                ui.property(input, "checked")
                    .map_or_else(|| !state.get(), |value| value == "true")
            } else {
                !state.get()
            };
            sync(ui, input, &state, next);
            ui.emit(input, "change");
        });

        Self {
            id,
            input,
            label,
            checked,
        }
    }

    /// The `<input>` element's node.
    #[must_use]
    pub const fn input(&self) -> NodeId {
        self.input
    }

    /// Returns whether the box is ticked.
    #[must_use]
    pub fn is_checked(&self) -> bool {
        self.checked.get()
    }

    /// The observable checked flag.
    #[must_use]
    pub const fn checked(&self) -> &State<bool> {
        &self.checked
    }

    /// Ticks or clears the box without raising `change`.
    pub fn set_checked(&self, ui: &mut Ui, checked: bool) -> &Self {
        sync(ui, self.input, &self.checked, checked);
        self
    }

    /// The label text, empty when there is none.
    #[must_use]
    pub fn label<'a>(&self, ui: &'a Ui) -> &'a str {
        self.label.map_or("", |label| label.text(ui))
    }

    /// Replaces the label text, adding a label if there was none.
    pub fn set_label(&mut self, ui: &mut Ui, text: &str) -> &Self {
        match self.label {
            Some(label) => {
                label.set_text(ui, text);
            }
            None if !text.is_empty() => {
                let label = Label::new(ui, text);
                let _ = ui.add_child(self.id, label.id());
                self.label = Some(label);
            }
            None => {}
        }
        self
    }

    /// Runs `handler` whenever the box is toggled by a click.
    pub fn on_change(&self, ui: &mut Ui, handler: impl FnMut(&mut Ui, &mut Event) + 'static) -> &Self {
        let _ = ui.node(self.input).on("change", handler);
        self
    }
}

fn sync(ui: &mut Ui, input: NodeId, state: &State<bool>, checked: bool) {
    state.set(checked);
    let _ = ui.set_property(input, "checked", if checked { "true" } else { "false" });
}

/// Creates a [`CheckBox`].
pub fn check_box(ui: &mut Ui, label: &str) -> CheckBox {
    CheckBox::new(ui, label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::Cell, rc::Rc};
    use trellis_core::MemoryDom;

    #[test]
    fn clicking_the_row_toggles_and_emits_change() {
        let mut ui = Ui::new(MemoryDom::new());
        let changes = Rc::new(Cell::new(0));
        let counter = Rc::clone(&changes);
        let check = check_box(&mut ui, "Remember me");
        check.on_change(&mut ui, move |_, _| counter.set(counter.get() + 1));
        let body = ui.body();
        ui.render(check.id(), body).unwrap();

        ui.emit(check.id(), "click");
        assert!(check.is_checked());
        assert_eq!(ui.property(check.input(), "checked").as_deref(), Some("true"));

        let label = ui.children(check.id())[1];
        ui.emit(label, "click");
        assert!(!check.is_checked());
        assert_eq!(changes.get(), 2);
    }

    #[test]
    fn clicks_on_the_input_read_the_platform_state() {
        let mut ui = Ui::new(MemoryDom::new());
        let check = check_box(&mut ui, "");
        let body = ui.body();
        ui.render(check.id(), body).unwrap();

        ui.set_property(check.input(), "checked", "true").unwrap();
        ui.emit(check.input(), "click");
        assert!(check.is_checked());
        assert_eq!(ui.children(check.id()).len(), 1);
    }

    #[test]
    fn disabled_boxes_do_not_toggle() {
        let mut ui = Ui::new(MemoryDom::new());
        let check = check_box(&mut ui, "Opt in");
        ui.set_attribute(check.id(), "disabled", "true").unwrap();

        ui.emit(check.id(), "click");
        assert!(!check.is_checked());
    }

    #[test]
    fn label_can_be_added_later() {
        let mut ui = Ui::new(MemoryDom::new());
        let mut check = check_box(&mut ui, "");
        assert_eq!(check.label(&ui), "");

        check.set_label(&mut ui, "Agree");
        assert_eq!(check.label(&ui), "Agree");
        check.set_label(&mut ui, "Accept");
        assert_eq!(check.label(&ui), "Accept");
        assert_eq!(ui.children(check.id()).len(), 2);
        check.set_checked(&mut ui, true);
        assert!(check.checked().get());
    }
}
