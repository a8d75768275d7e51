//! [Chart.js](https://www.chartjs.org) bindings for charts rendered in the
//! browser.
//!
//! The library is looked up on `window` each time a chart is drawn, so a page
//! that loads it from a `<script>` tag needs no further wiring:
//!
//! ```rust,ignore
//! use std::rc::Rc;
//! use trellis::{chart::{ChartComponent, ChartType}, chart_js::ChartJsRuntime};
//!
//! let runtime = Rc::new(ChartJsRuntime::new(app.root()));
//! let chart = app.with_ui(|ui| ChartComponent::new(ui, runtime, ChartType::Bar))?;
//! ```

use std::fmt;

use js_sys::{Array, Function, JSON, Reflect};
use tracing::{debug, warn};
use trellis_core::ElementHandle;
use trellis_web::DomRoot;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Element;

use crate::chart::{Capability, ChartConfig, ChartHandle, ChartRuntime};

/// Name of the constructor Chart.js installs on `window`.
pub const GLOBAL: &str = "Chart";

/// A [`ChartRuntime`] that draws with the Chart.js constructor found on
/// `window`.
///
/// Charts report [`Capability::Unavailable`] while the library is not
/// loaded, so the component falls back to its message.
#[derive(Debug, Clone)]
pub struct ChartJsRuntime {
    root: DomRoot,
    global: String,
}

impl ChartJsRuntime {
    /// A runtime drawing into canvases rendered under `root`.
    #[must_use]
    pub fn new(root: &DomRoot) -> Self {
        Self {
            root: root.clone(),
            global: GLOBAL.to_owned(),
        }
    }

    /// Looks the constructor up under another global name.
    #[must_use]
    pub fn with_global(mut self, name: impl Into<String>) -> Self {
        self.global = name.into();
        self
    }

    fn constructor(&self) -> Option<Function> {
        let window = web_sys::window()?;
        Reflect::get(&window, &JsValue::from_str(&self.global))
            .ok()?
            .dyn_into::<Function>()
            .ok()
    }

    fn construct(
        constructor: &Function,
        canvas: &Element,
        config: &ChartConfig,
    ) -> Result<JsValue, JsValue> {
        let json = config
            .to_json()
            .map_err(|error| JsValue::from_str(&error.to_string()))?;
        let config = JSON::parse(&json)?;
        Reflect::construct(constructor, &Array::of2(canvas, &config))
    }
}

impl ChartRuntime for ChartJsRuntime {
    fn create(&self, canvas: ElementHandle, config: &ChartConfig) -> Capability {
        let Some(constructor) = self.constructor() else {
            debug!(global = %self.global, "Chart.js is not loaded");
            return Capability::Unavailable;
        };
        let Some(element) = self.root.find(canvas) else {
            warn!(%canvas, "chart canvas is not in the document");
            return Capability::Unavailable;
        };
        match Self::construct(&constructor, &element, config) {
            Ok(chart) => Capability::Available(Box::new(ChartJs { chart })),
            Err(error) => {
                warn!(?error, kind = %config.kind, "Chart.js rejected the chart");
                Capability::Unavailable
            }
        }
    }
}

/// A live Chart.js instance.
struct ChartJs {
    chart: JsValue,
}

impl fmt::Debug for ChartJs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartJs").finish_non_exhaustive()
    }
}

impl ChartJs {
    fn call(&self, method: &str) -> Result<JsValue, JsValue> {
        Reflect::get(&self.chart, &JsValue::from_str(method))?
            .dyn_into::<Function>()?
            .call0(&self.chart)
    }

    fn replace(&self, config: &ChartConfig) -> Result<(), JsValue> {
        let (data, options) =
            update_payload(config).map_err(|error| JsValue::from_str(&error.to_string()))?;
        Reflect::set(&self.chart, &JsValue::from_str("data"), &JSON::parse(&data)?)?;
        Reflect::set(
            &self.chart,
            &JsValue::from_str("options"),
            &JSON::parse(&options)?,
        )?;
        self.call("update")?;
        Ok(())
    }
}

impl ChartHandle for ChartJs {
    fn update(&mut self, config: &ChartConfig) {
        if let Err(error) = self.replace(config) {
            warn!(?error, "Chart.js update failed");
        }
    }

    fn destroy(&mut self) {
        if let Err(error) = self.call("destroy") {
            warn!(?error, "Chart.js destroy failed");
        }
    }
}

/// The `data` and `options` documents assigned to a live chart before it is
/// told to update.
fn update_payload(config: &ChartConfig) -> Result<(String, String), serde_json::Error> {
    Ok((
        serde_json::to_string(&config.data)?,
        serde_json::to_string(&config.options)?,
    ))
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::update_payload;
    use crate::chart::{ChartConfig, ChartType, Dataset};

    #[test]
    fn update_payload_splits_data_from_options() {
        let mut config = ChartConfig::new(ChartType::Line);
        config.data.labels = vec!["January".into(), "February".into()];
        config.data.datasets.push(Dataset::new("Revenue", vec![1.0, 2.5], "#4285f4", "#4285f4"));

        let (data, options) = update_payload(&config).unwrap();
        let data: Value = serde_json::from_str(&data).unwrap();
        let options: Value = serde_json::from_str(&options).unwrap();

        assert_eq!(data["labels"], json!(["January", "February"]));
        assert_eq!(data["datasets"][0]["label"], "Revenue");
        assert_eq!(data["datasets"][0]["data"], json!([1.0, 2.5]));
        assert_eq!(options["responsive"], true);
        assert_eq!(options["maintainAspectRatio"], false);
        assert!(options.get("type").is_none());
    }
}
