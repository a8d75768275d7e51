//! Containers that group other widgets.

pub mod panel;
pub mod tab_pane;

pub use panel::Panel;
pub use tab_pane::TabPane;
