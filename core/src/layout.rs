//! The layout-manager seam and the constraints children are added with.
//!
//! A [`Layout`] is a strategy object attached to one container. It translates
//! its own configuration into CSS declarations on the container
//! ([`Layout::apply_to`]) and each child's constraint into declarations on that
//! child ([`Layout::add_layout_component`]). Nothing is measured; the browser
//! does the actual layout work.

use std::{any::Any, fmt::Debug};

use crate::{NodeId, Ui};

/// One of the five slots of a border layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    /// Top row, spanning all columns.
    North,
    /// Bottom row, spanning all columns.
    South,
    /// Right cell of the middle row.
    East,
    /// Left cell of the middle row.
    West,
    /// The stretchy middle cell.
    Center,
}

impl Region {
    /// All regions, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::North,
        Self::South,
        Self::East,
        Self::West,
        Self::Center,
    ];

    /// The CSS `grid-area` name of the region.
    #[must_use]
    pub const fn area(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
            Self::Center => "center",
        }
    }
}

/// Locates a child inside a grid layout.
///
/// `column` and `row` are zero-based; `None` leaves placement to the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    /// Zero-based column, or automatic placement.
    pub column: Option<u32>,
    /// Zero-based row, or automatic placement.
    pub row: Option<u32>,
    /// Number of columns covered.
    pub column_span: u32,
    /// Number of rows covered.
    pub row_span: u32,
}

impl Default for GridCell {
    fn default() -> Self {
        Self {
            column: None,
            row: None,
            column_span: 1,
            row_span: 1,
        }
    }
}

impl GridCell {
    /// A single cell at the given position.
    #[must_use]
    pub const fn at(column: u32, row: u32) -> Self {
        Self {
            column: Some(column),
            row: Some(row),
            column_span: 1,
            row_span: 1,
        }
    }

    /// Sets how many columns and rows the child covers.
    #[must_use]
    pub const fn span(mut self, columns: u32, rows: u32) -> Self {
        self.column_span = columns;
        self.row_span = rows;
        self
    }
}

/// The constraint a child is added to a laid-out container with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constraint {
    /// A border-layout slot.
    Region(Region),
    /// A grid-layout cell.
    Cell(GridCell),
}

impl From<Region> for Constraint {
    fn from(value: Region) -> Self {
        Self::Region(value)
    }
}

impl From<GridCell> for Constraint {
    fn from(value: GridCell) -> Self {
        Self::Cell(value)
    }
}

/// A layout manager attached to a single container.
pub trait Layout: Debug {
    /// Writes the container-level declarations.
    fn apply_to(&self, ui: &mut Ui, container: NodeId);

    /// Writes the declarations for a newly added child.
    ///
    /// Constraints of a kind the layout does not understand are ignored.
    fn add_layout_component(&mut self, ui: &mut Ui, child: NodeId, constraint: Option<&Constraint>);

    /// Forgets any bookkeeping about `child`.
    fn remove_layout_component(&mut self, child: NodeId);

    /// Re-applies the container-level declarations.
    fn layout_container(&self, ui: &mut Ui, container: NodeId) {
        self.apply_to(ui, container);
    }

    /// Allows callers to inspect a concrete layout through [`Ui::layout`].
    fn as_any(&self) -> &dyn Any;
}
