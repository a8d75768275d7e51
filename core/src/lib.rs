//! Core building blocks for `Trellis`.
//!
//! This crate owns everything that is independent of a concrete browser:
//!
//! - the [`Ui`] component tree, where every widget is a node with a tag, text,
//!   attributes, inline styles, handlers and an optional [`Layout`],
//! - the [`Dom`] trait, the narrow boundary through which nodes are rendered
//!   into real elements, together with an in-memory [`MemoryDom`],
//! - the observable [`State`] cell and the [`EffectQueue`] that lets state
//!   changes mutate the tree.
//!
//! Nodes may be configured before or after they are rendered. Before
//! [`Ui::render`] every mutation is recorded; afterwards it is applied to the
//! element immediately as well.
//!
//! # Example
//!
//! ```rust
//! use trellis_core::{MemoryDom, Ui};
//!
//! let mut ui = Ui::new(MemoryDom::new());
//! let button = ui.create("button").text("Save").id();
//! let panel = ui.create("div").child(button).unwrap().id();
//!
//! let body = ui.body();
//! let element = ui.render(panel, body).unwrap();
//! assert_eq!(
//!     ui.dom().outer_html(element).as_deref(),
//!     Some("<div><button>Save</button></div>")
//! );
//! ```

mod dom;
pub mod effect;
mod error;
pub mod event;
pub mod layout;
mod memory;
mod node;
pub mod state;
mod tree;
mod ui;

pub use dom::{Dom, ElementHandle};
pub use effect::{Effect, EffectQueue};
pub use error::{DomError, UiError};
pub use event::{Event, Handler, MOUNT};
pub use layout::{Constraint, GridCell, Layout, Region};
pub use memory::MemoryDom;
pub use node::{NodeMut, Widget};
pub use state::{State, Subscription};
pub use tree::NodeId;
pub use ui::Ui;

#[cfg(test)]
mod tests;
