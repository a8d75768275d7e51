#![doc = include_str!("../README.md")]
#![allow(clippy::multiple_crate_versions)]

pub mod chart;
#[cfg(feature = "web")]
pub mod chart_js;
pub mod component;
pub mod logging;
pub mod sales;
pub mod widget;

pub use trellis_controls as controls;
pub use trellis_layout as layout;
pub use trellis_navigation as navigation;

#[doc(inline)]
pub use trellis_core::{
    Constraint, Dom, DomError, ElementHandle, Event, MemoryDom, NodeId, NodeMut, State,
    Subscription, Ui, UiError, Widget,
};

pub mod prelude {
    //! The types most applications need, for glob import.
    //!
    //! ```rust
    //! use trellis::prelude::*;
    //!
    //! let mut ui = Ui::new(MemoryDom::new());
    //! let panel = Panel::titled(&mut ui, "Totals");
    //! let total = Label::new(&mut ui, "42");
    //! panel.add(&mut ui, &total).unwrap();
    //! ```
    pub use super::{
        Constraint, Event, MemoryDom, NodeId, State, Ui, UiError, Widget,
        chart::{Binding, ChartComponent, ChartConfig, ChartType, Dataset},
        component::{ColumnType, DataTable, Row, Table},
        sales::{OrMock, SalesRecord, SalesStore},
        widget::{Panel, TabPane},
    };
    pub use trellis_controls::{
        Button, ButtonVariant, CheckBox, ComboBox, Label, ProgressBar, TextArea, TextField,
    };
    pub use trellis_core::{MOUNT, Region};
    pub use trellis_layout::{BorderLayout, FlowAlignment, FlowLayout, GridLayout};
    pub use trellis_navigation::{History, MemoryHistory, Router};
}

pub use tracing as log;
