use thiserror::Error;
use trellis_core::{DomError, UiError};
use wasm_bindgen::JsValue;

/// Errors that can occur while running the web backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebError {
    /// The DOM APIs are not accessible (e.g., when executed outside of a browser).
    #[error("DOM is not available")]
    DomUnavailable,
    /// The configured root element could not be found.
    #[error("root element '{0}' not found")]
    RootNotFound(String),
    /// The component tree is borrowed by an event handler that is still running.
    #[error("component tree is busy")]
    Busy,
    /// A JavaScript exception surfaced as an error.
    #[error("JavaScript error: {0}")]
    Js(String),
    /// The component tree rejected an operation.
    #[error(transparent)]
    Ui(#[from] UiError),
}

impl From<JsValue> for WebError {
    fn from(value: JsValue) -> Self {
        let message = value
            .as_string()
            .unwrap_or_else(|| format!("{value:?}"));
        Self::Js(message)
    }
}

impl From<WebError> for JsValue {
    fn from(value: WebError) -> Self {
        Self::from_str(&value.to_string())
    }
}

impl From<WebError> for DomError {
    fn from(value: WebError) -> Self {
        match value {
            WebError::DomUnavailable => Self::Unavailable,
            WebError::Ui(UiError::Dom(error)) => error,
            other => Self::Platform(other.to_string()),
        }
    }
}

/// Converts a JavaScript exception into a [`DomError`].
pub(crate) fn platform(value: JsValue) -> DomError {
    WebError::from(value).into()
}

#[cfg(test)]
mod tests {
    use trellis_core::{DomError, UiError};

    use super::WebError;

    #[test]
    fn messages() {
        assert_eq!(WebError::DomUnavailable.to_string(), "DOM is not available");
        assert_eq!(
            WebError::RootNotFound("app".into()).to_string(),
            "root element 'app' not found"
        );
    }

    #[test]
    fn converts_into_dom_errors() {
        assert_eq!(DomError::from(WebError::DomUnavailable), DomError::Unavailable);
        assert_eq!(
            DomError::from(WebError::Js("boom".into())),
            DomError::Platform("JavaScript error: boom".into())
        );
        assert_eq!(
            DomError::from(WebError::Ui(UiError::Dom(DomError::Unavailable))),
            DomError::Unavailable
        );
    }
}
