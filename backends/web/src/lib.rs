#![allow(clippy::module_name_repetitions)]

//! Browser backend for Trellis.
//!
//! [`WebDom`] implements [`trellis_core::Dom`] over `web-sys`, so a
//! [`trellis_core::Ui`] renders straight into the document. [`WebApp`] is the
//! usual entry point: it locates or creates the root element, injects the
//! default stylesheet, installs a panic hook that reports to the console,
//! and forwards browser events into the component tree.
//!
//! [`BrowserHistory`] connects a [`trellis_navigation::Router`] to the
//! session history; hand the router to [`WebApp::route`] so `popstate`
//! events re-render the page.
//!
//! ```rust,no_run
//! use trellis_navigation::Router;
//! use trellis_web::{BrowserHistory, WebAppBuilder, WebError};
//!
//! fn main() -> Result<(), WebError> {
//!     let mut app = WebAppBuilder::new().with_root_id("app").build()?;
//!     let outlet = app.with_ui(|ui| ui.create("main").id())?;
//!     app.mount(&outlet)?;
//!
//!     let mut router = Router::new(outlet, BrowserHistory::new()?);
//!     router.add_route("/", |ui, _| ui.create("h1").text("Home").id());
//!     app.route(router)?;
//!     Ok(())
//! }
//! ```

mod app;
mod dom;
mod error;
mod history;

pub use app::{WebApp, WebAppBuilder};
pub use dom::{DomRoot, WebDom};
pub use error::WebError;
pub use history::BrowserHistory;
