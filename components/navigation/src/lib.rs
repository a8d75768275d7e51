//! Client-side routing for `Trellis`.
//!
//! A [`Router`] maps path patterns such as `/users/:id` to factories that
//! build a fresh component tree. Navigating clears the router's container and
//! mounts the tree built for the new path, recording the path in a
//! [`History`].
//!
//! # Example
//!
//! ```rust
//! use trellis_core::{MemoryDom, Ui};
//! use trellis_navigation::{MemoryHistory, Router};
//!
//! let mut ui = Ui::new(MemoryDom::new());
//! let outlet = ui.create("main").id();
//!
//! let mut router = Router::new(outlet, MemoryHistory::new("/"));
//! router.add_route("/users/:id", |ui, route| {
//!     let id = route.params().get("id").unwrap_or_default().to_owned();
//!     ui.create("h1").text(format!("User {id}")).id()
//! });
//!
//! assert!(router.navigate_to(&mut ui, "/users/42").unwrap());
//! let page = ui.children(outlet)[0];
//! assert_eq!(ui.text(page), Some("User 42"));
//! ```

mod history;
mod pattern;
mod router;

pub use history::{History, MemoryHistory};
pub use pattern::{RouteParams, RoutePattern};
pub use router::{NOT_FOUND_TEXT, Resolution, RouteFactory, RouteMatch, Router};
