//! `Trellis` Controls Components
//! This crate provides the leaf widgets applications build forms from.
//!
//! Every control is a thin handle around the [`NodeId`] of its root node, so
//! it can be copied into event handlers and added to any container through
//! [`Widget`]. Styling follows a single light theme.

use trellis_core::{NodeId, Ui};

pub mod button;
pub use button::{Button, ButtonVariant, button};
pub mod label;
pub use label::{Label, label};
pub mod text_field;
pub use text_field::{TextField, field};
pub mod text_area;
pub use text_area::TextArea;
pub mod check_box;
pub use check_box::{CheckBox, check_box};
pub mod combo_box;
pub use combo_box::ComboBox;
pub mod progress_bar;
pub use progress_bar::ProgressBar;

pub use trellis_core::Widget;

/// Border colour of idle inputs.
pub(crate) const BORDER_IDLE: &str = "#dadce0";
/// Border colour of focused inputs, also the theme's accent.
pub(crate) const ACCENT: &str = "#4285f4";

/// Highlights the border of an enabled input while it has focus.
pub(crate) fn focus_feedback(ui: &mut Ui, id: NodeId) {
    let _ = ui
        .node(id)
        .on("focus", move |ui, _| {
            if ui.is_enabled(id) {
                let _ = ui
                    .node(id)
                    .style("border-color", ACCENT)
                    .style("outline", "none");
            }
        })
        .on("blur", move |ui, _| {
            if ui.is_enabled(id) {
                let _ = ui.node(id).style("border-color", BORDER_IDLE);
            }
        });
}

/// Live value of a form element, falling back to what was recorded before mount.
pub(crate) fn live_value(ui: &Ui, id: NodeId, recorded: Option<&str>) -> String {
    ui.property(id, "value")
        .or_else(|| recorded.map(str::to_owned))
        .unwrap_or_default()
}
