//! Charts drawn by an external charting library.
//!
//! Trellis does not draw charts itself. A [`ChartComponent`] owns a canvas
//! and a [`ChartConfig`] in the JSON shape the library expects, and asks a
//! [`ChartRuntime`] to draw into the canvas once it is mounted. When the
//! runtime reports the library as unavailable, the component shows a short
//! message instead.
//!
//! Records held in a [`State`] can drive a chart through a [`Binding`], which
//! turns rows into labels and datasets:
//!
//! ```rust
//! use serde_json::json;
//! use trellis::chart::Binding;
//!
//! let rows = [
//!     json!({"month": "January", "category": "Electronics", "revenue": 120}),
//!     json!({"month": "January", "category": "Accessories", "revenue": 15}),
//!     json!({"month": "February", "category": "Electronics", "revenue": 130}),
//! ]
//! .map(|row| row.as_object().cloned().unwrap_or_default());
//!
//! let data = Binding::fields("month", "revenue")
//!     .by_category("category")
//!     .chart_data(&rows);
//! assert_eq!(data.labels, ["January", "February"]);
//! assert_eq!(data.datasets[1].data, [15.0, 0.0]);
//! ```

use std::{cell::RefCell, fmt, rc::Rc};

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};
use trellis_core::{ElementHandle, MOUNT, NodeId, State, Subscription, Ui, UiError, Widget};

use crate::component::{Row, data_table};

/// Series colours for grouped charts, used in order and then repeated.
pub const PALETTE: [&str; 12] = [
    "#4285f4", "#ea4335", "#fbbc05", "#34a853", "#673ab7", "#3f51b5", "#2196f3", "#03a9f4",
    "#00bcd4", "#009688", "#4caf50", "#8bc34a",
];

/// Message shown in place of the canvas when no library is available.
pub const UNAVAILABLE_TEXT: &str = "Chart library not available";

/// Chart kinds understood by the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartType {
    /// Vertical bars.
    #[default]
    Bar,
    /// Connected points.
    Line,
    /// Pie.
    Pie,
    /// Pie with a hole.
    Doughnut,
    /// Spider web.
    Radar,
    /// Equal-angle segments of varying radius.
    PolarArea,
}

impl ChartType {
    /// The name the library uses for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Pie => "pie",
            Self::Doughnut => "doughnut",
            Self::Radar => "radar",
            Self::PolarArea => "polarArea",
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A colour for a whole series or one colour per point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Paint {
    /// Same colour for every point.
    Single(String),
    /// Colour of each point, in order.
    PerPoint(Vec<String>),
}

impl From<&str> for Paint {
    fn from(color: &str) -> Self {
        Self::Single(color.to_owned())
    }
}

impl From<Vec<String>> for Paint {
    fn from(colors: Vec<String>) -> Self {
        Self::PerPoint(colors)
    }
}

/// One series of values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// Legend entry.
    pub label: String,
    /// One value per chart label.
    pub data: Vec<f64>,
    /// Fill colour.
    pub background_color: Paint,
    /// Outline colour.
    pub border_color: Paint,
    /// Outline width in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<u32>,
}

impl Dataset {
    /// A series with the given fill and outline colours.
    pub fn new(
        label: impl Into<String>,
        data: Vec<f64>,
        background: impl Into<Paint>,
        border: impl Into<Paint>,
    ) -> Self {
        Self {
            label: label.into(),
            data,
            background_color: background.into(),
            border_color: border.into(),
            border_width: None,
        }
    }

    /// Sets the outline width.
    #[must_use]
    pub const fn with_border_width(mut self, width: u32) -> Self {
        self.border_width = Some(width);
        self
    }
}

/// Labels and series of a chart.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartData {
    /// Category axis labels.
    pub labels: Vec<String>,
    /// Series drawn against the labels.
    pub datasets: Vec<Dataset>,
}

/// Everything the library needs to draw a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Chart kind.
    #[serde(rename = "type")]
    pub kind: ChartType,
    /// Labels and series.
    pub data: ChartData,
    /// Library options. Defaults to a responsive chart that fills its box.
    pub options: Map<String, Value>,
}

impl ChartConfig {
    /// An empty chart of `kind` with the default options.
    #[must_use]
    pub fn new(kind: ChartType) -> Self {
        Self {
            kind,
            data: ChartData::default(),
            options: default_options(),
        }
    }

    /// Replaces the options. Keys not given keep their defaults.
    pub fn set_options(&mut self, options: Map<String, Value>) {
        let mut merged = default_options();
        merged.extend(options);
        self.options = merged;
    }

    /// The configuration as the library's JSON.
    ///
    /// # Errors
    ///
    /// Fails only if a value cannot be represented in JSON, such as a NaN.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self::new(ChartType::default())
    }
}

fn default_options() -> Map<String, Value> {
    let mut options = Map::new();
    options.insert("responsive".into(), Value::Bool(true));
    options.insert("maintainAspectRatio".into(), Value::Bool(false));
    options
}

type Extractor<T> = Box<dyn Fn(&Row) -> T>;

/// Turns rows into chart labels and datasets.
///
/// Without a category every row is one point of a single series. With a
/// category, each distinct category becomes a series and each distinct label
/// a point; a label missing from a category counts as 0.
pub struct Binding {
    series: String,
    label: Extractor<String>,
    value: Extractor<f64>,
    category: Option<Extractor<String>>,
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("series", &self.series)
            .field("grouped", &self.category.is_some())
            .finish_non_exhaustive()
    }
}

impl Binding {
    /// Labels from `label_field`, values from `value_field`.
    ///
    /// Values that are not numbers count as 0.
    #[must_use]
    pub fn fields(label_field: &str, value_field: &str) -> Self {
        let label_field = label_field.to_owned();
        let value_key = value_field.to_owned();
        Self {
            series: value_field.to_owned(),
            label: Box::new(move |row| {
                row.get(&label_field)
                    .map(data_table::cell_text)
                    .unwrap_or_default()
            }),
            value: Box::new(move |row| {
                row.get(&value_key)
                    .and_then(data_table::number)
                    .unwrap_or(0.0)
            }),
            category: None,
        }
    }

    /// Custom extractors. `series` names the single series.
    pub fn new(
        series: impl Into<String>,
        label: impl Fn(&Row) -> String + 'static,
        value: impl Fn(&Row) -> f64 + 'static,
    ) -> Self {
        Self {
            series: series.into(),
            label: Box::new(label),
            value: Box::new(value),
            category: None,
        }
    }

    /// Groups rows into one series per distinct value of `field`.
    #[must_use]
    pub fn by_category(self, field: &str) -> Self {
        let field = field.to_owned();
        self.with_category(move |row| {
            row.get(&field)
                .map(data_table::cell_text)
                .unwrap_or_default()
        })
    }

    /// Groups rows into one series per distinct result of `category`.
    #[must_use]
    pub fn with_category(mut self, category: impl Fn(&Row) -> String + 'static) -> Self {
        self.category = Some(Box::new(category));
        self
    }

    /// Labels and datasets for `rows`.
    #[must_use]
    pub fn chart_data(&self, rows: &[Row]) -> ChartData {
        match &self.category {
            Some(category) => self.grouped(rows, category),
            None => self.single(rows),
        }
    }

    fn grouped(&self, rows: &[Row], category: &Extractor<String>) -> ChartData {
        let mut labels = IndexSet::new();
        let mut groups: IndexMap<String, IndexMap<String, f64>> = IndexMap::new();
        for row in rows {
            let label = (self.label)(row);
            labels.insert(label.clone());
            // Later rows win for the same label and category.
            groups
                .entry(category(row))
                .or_default()
                .insert(label, (self.value)(row));
        }

        let datasets = groups
            .into_iter()
            .zip(PALETTE.iter().cycle())
            .map(|((name, values), color)| {
                let data = labels
                    .iter()
                    .map(|label| values.get(label).copied().unwrap_or(0.0))
                    .collect();
                Dataset::new(name, data, format!("{color}33").as_str(), *color)
            })
            .collect();
        ChartData {
            labels: labels.into_iter().collect(),
            datasets,
        }
    }

    fn single(&self, rows: &[Row]) -> ChartData {
        let labels = rows.iter().map(|row| (self.label)(row)).collect();
        let data: Vec<f64> = rows.iter().map(|row| (self.value)(row)).collect();
        let hues = (0..data.len()).map(|i| (i * 30) % 360);
        let background: Vec<String> = hues
            .clone()
            .map(|hue| format!("hsla({hue}, 70%, 60%, 0.2)"))
            .collect();
        let border: Vec<String> = hues
            .map(|hue| format!("hsla({hue}, 70%, 60%, 1)"))
            .collect();
        let series =
            Dataset::new(self.series.clone(), data, background, border).with_border_width(1);
        ChartData {
            labels,
            datasets: vec![series],
        }
    }
}

/// A chart drawn by the library.
pub trait ChartHandle {
    /// Redraws with new labels, datasets or options.
    fn update(&mut self, config: &ChartConfig);
    /// Releases the chart. The handle is not used afterwards.
    fn destroy(&mut self);
}

/// Result of asking a [`ChartRuntime`] for a chart.
pub enum Capability {
    /// The library drew the chart.
    Available(Box<dyn ChartHandle>),
    /// No library is loaded.
    Unavailable,
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available(_) => f.write_str("Available(..)"),
            Self::Unavailable => f.write_str("Unavailable"),
        }
    }
}

/// Access to a charting library.
pub trait ChartRuntime {
    /// Draws a chart described by `config` into the canvas `canvas`.
    fn create(&self, canvas: ElementHandle, config: &ChartConfig) -> Capability;
}

struct Model {
    config: ChartConfig,
    runtime: Rc<dyn ChartRuntime>,
    chart: Option<Box<dyn ChartHandle>>,
    fallback: Option<NodeId>,
}

impl Model {
    fn redraw(&mut self) {
        let Self { config, chart, .. } = self;
        if let Some(chart) = chart {
            chart.update(config);
        }
    }
}

/// A canvas drawn by a [`ChartRuntime`].
///
/// Configuration can change at any time. Before the canvas is mounted the
/// changes are only recorded; afterwards the drawn chart is updated.
#[derive(Clone)]
pub struct ChartComponent {
    id: NodeId,
    canvas: NodeId,
    model: Rc<RefCell<Model>>,
}

impl fmt::Debug for ChartComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let model = self.model.borrow();
        f.debug_struct("ChartComponent")
            .field("id", &self.id)
            .field("canvas", &self.canvas)
            .field("config", &model.config)
            .field("drawn", &model.chart.is_some())
            .finish()
    }
}

impl Widget for ChartComponent {
    fn id(&self) -> NodeId {
        self.id
    }
}

impl ChartComponent {
    /// Creates an empty chart of `kind`.
    pub fn new(ui: &mut Ui, runtime: Rc<dyn ChartRuntime>, kind: ChartType) -> Self {
        let id = ui
            .create_widget("div")
            .styles([("position", "relative"), ("width", "100%")])
            .id();
        let canvas = ui
            .create("canvas")
            .styles([("width", "100%"), ("height", "300px"), ("max-height", "100%")])
            .id();
        if let Err(error) = ui.add_child(id, canvas) {
            warn!(%error, "could not attach chart canvas");
        }

        let chart = Self {
            id,
            canvas,
            model: Rc::new(RefCell::new(Model {
                config: ChartConfig::new(kind),
                runtime,
                chart: None,
                fallback: None,
            })),
        };
        let mounted = chart.clone();
        let _ = ui.node(canvas).on(MOUNT, move |ui, _| mounted.draw(ui));
        chart
    }

    /// The canvas element's node.
    #[must_use]
    pub const fn canvas(&self) -> NodeId {
        self.canvas
    }

    /// A copy of the current configuration.
    #[must_use]
    pub fn config(&self) -> ChartConfig {
        self.model.borrow().config.clone()
    }

    /// Returns `true` while the library holds a drawn chart.
    #[must_use]
    pub fn is_drawn(&self) -> bool {
        self.model.borrow().chart.is_some()
    }

    /// Changes the chart kind. A drawn chart is destroyed and drawn again.
    pub fn set_type(&self, ui: &mut Ui, kind: ChartType) -> &Self {
        let previous = {
            let mut model = self.model.borrow_mut();
            model.config.kind = kind;
            model.chart.take()
        };
        if let Some(mut previous) = previous {
            previous.destroy();
            self.draw(ui);
        }
        self
    }

    /// Replaces the labels.
    pub fn set_labels<S: Into<String>>(&self, labels: impl IntoIterator<Item = S>) -> &Self {
        let mut model = self.model.borrow_mut();
        model.config.data.labels = labels.into_iter().map(Into::into).collect();
        model.redraw();
        self
    }

    /// Appends a series.
    pub fn add_dataset(&self, dataset: Dataset) -> &Self {
        let mut model = self.model.borrow_mut();
        model.config.data.datasets.push(dataset);
        model.redraw();
        self
    }

    /// Removes every series.
    pub fn clear_datasets(&self) -> &Self {
        let mut model = self.model.borrow_mut();
        model.config.data.datasets.clear();
        model.redraw();
        self
    }

    /// Replaces the library options. See [`ChartConfig::set_options`].
    pub fn set_options(&self, options: Map<String, Value>) -> &Self {
        let mut model = self.model.borrow_mut();
        model.config.set_options(options);
        model.redraw();
        self
    }

    /// Keeps the chart in step with `rows`.
    ///
    /// The current rows are shown right away. An empty list leaves the chart
    /// as it was.
    pub fn bind(&self, ui: &Ui, rows: &State<Vec<Row>>, binding: Binding) -> Subscription {
        rows.with(|current| self.show(current, &binding));
        let chart = self.clone();
        ui.watch(rows, move |_, current| chart.show(current, &binding))
    }

    fn show(&self, rows: &[Row], binding: &Binding) {
        if rows.is_empty() {
            return;
        }
        let data = binding.chart_data(rows);
        let mut model = self.model.borrow_mut();
        model.config.data = data;
        model.redraw();
    }

    fn draw(&self, ui: &mut Ui) {
        let Some(canvas) = ui.handle(self.canvas) else {
            return;
        };
        let (runtime, config) = {
            let model = self.model.borrow();
            (Rc::clone(&model.runtime), model.config.clone())
        };
        match runtime.create(canvas, &config) {
            Capability::Available(chart) => {
                debug!(kind = %config.kind, %canvas, "chart drawn");
                self.model.borrow_mut().chart = Some(chart);
            }
            Capability::Unavailable => {
                warn!("charting library unavailable; showing fallback");
                if let Err(error) = self.show_fallback(ui) {
                    warn!(%error, "could not show chart fallback");
                }
            }
        }
    }

    fn show_fallback(&self, ui: &mut Ui) -> Result<(), UiError> {
        if self.model.borrow().fallback.is_some() {
            return Ok(());
        }
        ui.set_visible(self.canvas, false)?;
        let message = ui
            .create("div")
            .text(UNAVAILABLE_TEXT)
            .padding("20px")
            .text_align("center")
            .foreground("#666")
            .id();
        ui.add_child(self.id, message)?;
        self.model.borrow_mut().fallback = Some(message);
        Ok(())
    }

    /// Releases the drawn chart and destroys the component's nodes.
    ///
    /// # Errors
    ///
    /// Fails if the component was already destroyed.
    pub fn destroy(&self, ui: &mut Ui) -> Result<(), UiError> {
        let chart = self.model.borrow_mut().chart.take();
        if let Some(mut chart) = chart {
            chart.destroy();
        }
        ui.destroy(self.id)
    }
}
