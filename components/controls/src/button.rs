//! Clickable push buttons.

use std::{cell::Cell, rc::Rc};

use trellis_core::{Event, NodeId, Ui, Widget};

/// Colour scheme of a [`Button`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ButtonVariant {
    /// Filled with the accent colour.
    #[default]
    Primary,
    /// Light grey with a hairline border.
    Secondary,
    /// Red, for destructive actions.
    Danger,
    /// Green.
    Success,
    /// Amber.
    Warning,
    /// Transparent with an accent border.
    Outline,
}

impl ButtonVariant {
    /// `(background, text colour, border)` of the variant.
    #[must_use]
    pub const fn palette(self) -> (&'static str, &'static str, &'static str) {
        match self {
            Self::Primary => ("#4285f4", "white", "none"),
            Self::Secondary => ("#f1f3f4", "#3c4043", "1px solid #dadce0"),
            Self::Danger => ("#ea4335", "white", "none"),
            Self::Success => ("#34a853", "white", "none"),
            Self::Warning => ("#fbbc05", "white", "none"),
            Self::Outline => ("transparent", "#4285f4", "1px solid #4285f4"),
        }
    }

    /// Background shown while the pointer hovers the button.
    #[must_use]
    pub const fn hover_background(self) -> &'static str {
        match self {
            Self::Primary => "#3367d6",
            Self::Secondary => "#e8eaed",
            Self::Danger => "#d33426",
            Self::Success => "#2d9249",
            Self::Warning => "#f0b400",
            Self::Outline => "rgba(66, 133, 244, 0.08)",
        }
    }
}

/// A styled `<button>` with hover and press feedback.
///
/// Feedback only runs while the button is enabled.
#[derive(Debug, Clone)]
pub struct Button {
    id: NodeId,
    variant: Rc<Cell<ButtonVariant>>,
}

impl Widget for Button {
    fn id(&self) -> NodeId {
        self.id
    }
}

impl Button {
    /// Creates a primary button labelled `text`.
    pub fn new(ui: &mut Ui, text: &str) -> Self {
        let variant = Rc::new(Cell::new(ButtonVariant::Primary));
        let id = ui
            .create_widget("button")
            .text(text)
            .styles([
                ("padding", "8px 16px"),
                ("background-color", "#4285f4"),
                ("color", "white"),
                ("border", "none"),
                ("border-radius", "4px"),
                ("cursor", "pointer"),
                ("font-size", "14px"),
                ("transition", "background-color 0.2s"),
            ])
            .id();

        let hovered = Rc::clone(&variant);
        let left = Rc::clone(&variant);
        let _ = ui
            .node(id)
            .on("mouseover", move |ui, _| {
                if ui.is_enabled(id) {
                    let _ = ui
                        .node(id)
                        .style("background-color", hovered.get().hover_background());
                }
            })
            .on("mouseout", move |ui, _| {
                if ui.is_enabled(id) {
                    let _ = ui
                        .node(id)
                        .style("background-color", left.get().palette().0);
                }
            })
            .on("mousedown", move |ui, _| {
                if ui.is_enabled(id) {
                    let _ = ui.node(id).style("transform", "scale(0.98)");
                }
            })
            .on("mouseup", move |ui, _| {
                if ui.is_enabled(id) {
                    let _ = ui.node(id).style("transform", "scale(1)");
                }
            });

        Self { id, variant }
    }

    /// Registers a click handler.
    pub fn on_click(&self, ui: &mut Ui, handler: impl FnMut(&mut Ui, &mut Event) + 'static) -> &Self {
        let _ = ui.node(self.id).on("click", handler);
        self
    }

    /// The current colour scheme.
    #[must_use]
    pub fn variant(&self) -> ButtonVariant {
        self.variant.get()
    }

    /// Switches the colour scheme.
    pub fn set_variant(&self, ui: &mut Ui, variant: ButtonVariant) -> &Self {
        self.variant.set(variant);
        let (background, color, border) = variant.palette();
        let _ = ui
            .node(self.id)
            .background(background)
            .foreground(color)
            .border(border);
        self
    }

    /// Changes the label.
    pub fn set_text(&self, ui: &mut Ui, text: &str) -> &Self {
        let _ = ui.node(self.id).text(text);
        self
    }
}

/// Creates a primary [`Button`].
pub fn button(ui: &mut Ui, text: &str) -> Button {
    Button::new(ui, text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::MemoryDom;

    #[test]
    fn hover_feedback_follows_variant() {
        let mut ui = Ui::new(MemoryDom::new());
        let button = Button::new(&mut ui, "Delete");
        button.set_variant(&mut ui, ButtonVariant::Danger);
        let id = button.id();

        ui.emit(id, "mouseover");
        assert_eq!(ui.style(id, "background-color"), Some("#d33426"));
        ui.emit(id, "mouseout");
        assert_eq!(ui.style(id, "background-color"), Some("#ea4335"));
        ui.emit(id, "mousedown");
        assert_eq!(ui.style(id, "transform"), Some("scale(0.98)"));
    }

    #[test]
    fn disabled_buttons_ignore_pointer_feedback() {
        let mut ui = Ui::new(MemoryDom::new());
        let button = button(&mut ui, "Save");
        ui.set_enabled(button.id(), false).unwrap();

        ui.emit(button.id(), "mouseover");
        assert_eq!(ui.style(button.id(), "background-color"), Some("#4285f4"));
    }

    #[test]
    fn click_handlers_fire() {
        let mut ui = Ui::new(MemoryDom::new());
        let clicks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&clicks);
        let button = button(&mut ui, "Go");
        button.on_click(&mut ui, move |_, _| counter.set(counter.get() + 1));

        ui.emit(button.id(), "click");
        ui.emit(button.id(), "click");
        assert_eq!(clicks.get(), 2);
        assert_eq!(ui.text(button.id()), Some("Go"));
        assert_eq!(ui.tag(button.id()), Some("button"));
    }
}
