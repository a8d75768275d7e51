//! Five named regions around a stretchy centre.

use alloc::{collections::BTreeMap, format};
use core::any::Any;

use trellis_core::{Constraint, Layout, NodeId, Region, Ui};

use crate::set;

const TEMPLATE_AREAS: &str = r#""north north north" "west center east" "south south south""#;

/// Pins children to the north, south, east, west and center regions.
///
/// Each region holds at most one child. Adding a second child to a region
/// replaces the region's entry; the previous occupant stays in the container
/// until it is removed explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BorderLayout {
    horizontal_gap: u32,
    vertical_gap: u32,
    regions: BTreeMap<Region, NodeId>,
}

impl BorderLayout {
    /// Creates a border layout without gaps.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a border layout with gaps in pixels.
    #[must_use]
    pub fn with_gaps(horizontal_gap: u32, vertical_gap: u32) -> Self {
        Self {
            horizontal_gap,
            vertical_gap,
            regions: BTreeMap::new(),
        }
    }

    /// The child currently pinned to `region`.
    #[must_use]
    pub fn occupant(&self, region: Region) -> Option<NodeId> {
        self.regions.get(&region).copied()
    }

    /// Every occupied region with its child.
    pub fn regions(&self) -> impl Iterator<Item = (Region, NodeId)> + '_ {
        self.regions.iter().map(|(region, child)| (*region, *child))
    }
}

impl Layout for BorderLayout {
    fn apply_to(&self, ui: &mut Ui, container: NodeId) {
        set(ui, container, "display", "grid");
        set(ui, container, "grid-template-areas", TEMPLATE_AREAS);
        set(ui, container, "grid-template-rows", "auto 1fr auto");
        set(ui, container, "grid-template-columns", "auto 1fr auto");
        if self.horizontal_gap > 0 || self.vertical_gap > 0 {
            set(
                ui,
                container,
                "gap",
                &format!("{}px {}px", self.vertical_gap, self.horizontal_gap),
            );
        }
        set(ui, container, "height", "100%");
    }

    fn add_layout_component(&mut self, ui: &mut Ui, child: NodeId, constraint: Option<&Constraint>) {
        let region = match constraint {
            None => Region::Center,
            Some(Constraint::Region(region)) => *region,
            Some(Constraint::Cell(_)) => return,
        };
        self.regions.retain(|_, occupant| *occupant != child);
        self.regions.insert(region, child);
        set(ui, child, "grid-area", region.area());
    }

    fn remove_layout_component(&mut self, child: NodeId) {
        self.regions.retain(|_, occupant| *occupant != child);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
