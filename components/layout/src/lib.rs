#![no_std]
//! Layout managers for `Trellis`.
//!
//! A layout manager is attached to one container with
//! [`Ui::set_layout`](trellis_core::Ui::set_layout) and translates Swing-style
//! placement rules into CSS declarations. The browser does all measuring:
//!
//! - [`FlowLayout`] wraps children in a row with `display: flex`,
//! - [`GridLayout`] places children on a CSS grid, optionally pinned to cells,
//! - [`BorderLayout`] pins up to five children to named regions.
//!
//! # Example
//!
//! ```rust
//! use trellis_core::{MemoryDom, Region, Ui};
//! use trellis_layout::BorderLayout;
//!
//! let mut ui = Ui::new(MemoryDom::new());
//! let header = ui.create("header").text("Title").id();
//! let frame = ui.create("div").layout(BorderLayout::new()).id();
//! ui.add_child_with(frame, header, Region::North).unwrap();
//!
//! assert_eq!(ui.style(header, "grid-area"), Some("north"));
//! ```

extern crate alloc;

pub use trellis_core::layout::*;

pub mod border;
pub use border::BorderLayout;
pub mod flow;
pub use flow::{FlowAlignment, FlowLayout};
pub mod grid;
pub use grid::GridLayout;

use trellis_core::{NodeId, Ui};

/// Writes one declaration; failures are logged by the node builder.
pub(crate) fn set(ui: &mut Ui, node: NodeId, property: &str, value: &str) {
    let _ = ui.node(node).style(property, value);
}
