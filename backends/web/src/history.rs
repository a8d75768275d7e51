use tracing::warn;
use trellis_navigation::History;
use wasm_bindgen::JsValue;
use web_sys::Window;

use crate::error::WebError;

/// [`History`] backed by the browser's session history.
///
/// Moving back or forward is asynchronous in the browser: the page learns
/// about the new location from the `popstate` event, which
/// [`WebApp::route`](crate::WebApp::route) forwards to the router.
#[derive(Debug, Clone)]
pub struct BrowserHistory {
    history: web_sys::History,
    location: web_sys::Location,
}

impl BrowserHistory {
    /// Binds to the history of the current window.
    ///
    /// # Errors
    ///
    /// Returns [`WebError::DomUnavailable`] outside a browser.
    pub fn new() -> Result<Self, WebError> {
        let window: Window = web_sys::window().ok_or(WebError::DomUnavailable)?;
        Ok(Self {
            history: window.history()?,
            location: window.location(),
        })
    }
}

impl History for BrowserHistory {
    fn current_path(&self) -> String {
        self.location
            .pathname()
            .unwrap_or_else(|_| String::from("/"))
    }

    fn push(&mut self, path: &str) {
        if let Err(error) = self
            .history
            .push_state_with_url(&JsValue::NULL, "", Some(path))
        {
            warn!(path, error = %WebError::from(error), "pushState failed");
        }
    }

    fn back(&mut self) {
        if let Err(error) = self.history.back() {
            warn!(error = %WebError::from(error), "history.back failed");
        }
    }

    fn forward(&mut self) {
        if let Err(error) = self.history.forward() {
            warn!(error = %WebError::from(error), "history.forward failed");
        }
    }
}
