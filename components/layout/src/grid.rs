//! A CSS grid with a fixed number of rows and columns.

use alloc::format;
use core::any::Any;

use trellis_core::{Constraint, GridCell, Layout, NodeId, Ui};

use crate::set;

/// Arranges children on a grid of equal-width columns.
///
/// A dimension of `0` leaves that axis to the browser. Children added with a
/// [`GridCell`] constraint are pinned to that cell; all others are placed
/// automatically in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridLayout {
    rows: u32,
    columns: u32,
    horizontal_gap: u32,
    vertical_gap: u32,
}

impl GridLayout {
    /// Creates a grid without gaps.
    #[must_use]
    pub const fn new(rows: u32, columns: u32) -> Self {
        Self::with_gaps(rows, columns, 0, 0)
    }

    /// Creates a grid with gaps in pixels.
    #[must_use]
    pub const fn with_gaps(rows: u32, columns: u32, horizontal_gap: u32, vertical_gap: u32) -> Self {
        Self {
            rows,
            columns,
            horizontal_gap,
            vertical_gap,
        }
    }

    /// Number of rows, `0` for automatic.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns, `0` for automatic.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    fn place(ui: &mut Ui, child: NodeId, cell: &GridCell) {
        if let Some(column) = cell.column {
            set(ui, child, "grid-column-start", &format!("{}", column + 1));
        }
        if let Some(row) = cell.row {
            set(ui, child, "grid-row-start", &format!("{}", row + 1));
        }
        set(ui, child, "grid-column-end", &format!("span {}", cell.column_span.max(1)));
        set(ui, child, "grid-row-end", &format!("span {}", cell.row_span.max(1)));
    }
}

impl Layout for GridLayout {
    fn apply_to(&self, ui: &mut Ui, container: NodeId) {
        set(ui, container, "display", "grid");
        if self.columns > 0 {
            set(
                ui,
                container,
                "grid-template-columns",
                &format!("repeat({}, 1fr)", self.columns),
            );
        }
        if self.rows > 0 {
            set(
                ui,
                container,
                "grid-template-rows",
                &format!("repeat({}, auto)", self.rows),
            );
        }
        if self.horizontal_gap > 0 || self.vertical_gap > 0 {
            set(
                ui,
                container,
                "gap",
                &format!("{}px {}px", self.vertical_gap, self.horizontal_gap),
            );
        }
    }

    fn add_layout_component(&mut self, ui: &mut Ui, child: NodeId, constraint: Option<&Constraint>) {
        if let Some(Constraint::Cell(cell)) = constraint {
            Self::place(ui, child, cell);
        }
    }

    fn remove_layout_component(&mut self, _child: NodeId) {}

    fn as_any(&self) -> &dyn Any {
        self
    }
}
