//! Left-to-right wrapping rows.

use alloc::format;
use core::any::Any;

use trellis_core::{Constraint, Layout, NodeId, Ui};

use crate::set;

/// Horizontal alignment of each flow row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FlowAlignment {
    /// Rows start at the leading edge.
    #[default]
    Leading,
    /// Rows are centred.
    Center,
    /// Rows end at the trailing edge.
    Trailing,
}

impl FlowAlignment {
    const fn justify_content(self) -> &'static str {
        match self {
            Self::Leading => "flex-start",
            Self::Center => "center",
            Self::Trailing => "flex-end",
        }
    }
}

/// Lays children out in wrapping rows with fixed gaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlowLayout {
    alignment: FlowAlignment,
    horizontal_gap: u32,
    vertical_gap: u32,
}

impl Default for FlowLayout {
    fn default() -> Self {
        Self::new(FlowAlignment::Leading, 5, 5)
    }
}

impl FlowLayout {
    /// Creates a flow layout with explicit gaps in pixels.
    #[must_use]
    pub const fn new(alignment: FlowAlignment, horizontal_gap: u32, vertical_gap: u32) -> Self {
        Self {
            alignment,
            horizontal_gap,
            vertical_gap,
        }
    }

    /// Creates a flow layout with the default 5px gaps.
    #[must_use]
    pub const fn aligned(alignment: FlowAlignment) -> Self {
        Self::new(alignment, 5, 5)
    }

    /// Row alignment.
    #[must_use]
    pub const fn alignment(&self) -> FlowAlignment {
        self.alignment
    }

    /// Horizontal and vertical gap, in pixels.
    #[must_use]
    pub const fn gaps(&self) -> (u32, u32) {
        (self.horizontal_gap, self.vertical_gap)
    }
}

impl Layout for FlowLayout {
    fn apply_to(&self, ui: &mut Ui, container: NodeId) {
        set(ui, container, "display", "flex");
        set(ui, container, "flex-wrap", "wrap");
        set(
            ui,
            container,
            "justify-content",
            self.alignment.justify_content(),
        );
        set(
            ui,
            container,
            "gap",
            &format!("{}px {}px", self.vertical_gap, self.horizontal_gap),
        );
    }

    fn add_layout_component(&mut self, ui: &mut Ui, child: NodeId, _: Option<&Constraint>) {
        set(ui, child, "margin", "0");
    }

    fn remove_layout_component(&mut self, _child: NodeId) {}

    fn as_any(&self) -> &dyn Any {
        self
    }
}
