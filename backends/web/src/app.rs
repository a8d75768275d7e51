use std::{cell::RefCell, fmt, rc::Rc};

use tracing::{debug, warn};
use trellis_core::{ElementHandle, Ui, Widget};
use trellis_navigation::Router;
use wasm_bindgen::{JsCast, prelude::*};

use crate::{
    dom::{DomRoot, WebDom},
    error::WebError,
};

/// Builder for [`WebApp`].
#[derive(Debug, Default, Clone)]
pub struct WebAppBuilder {
    root_id: Option<String>,
    inject_default_styles: bool,
}

impl WebAppBuilder {
    /// Creates a new builder with default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            root_id: None,
            inject_default_styles: true,
        }
    }

    /// Sets the DOM element identifier that should host the application.
    #[must_use]
    pub fn with_root_id(mut self, id: impl Into<String>) -> Self {
        self.root_id = Some(id.into());
        self
    }

    /// Controls whether the backend injects the default Trellis stylesheet.
    #[must_use]
    pub const fn inject_default_styles(mut self, inject: bool) -> Self {
        self.inject_default_styles = inject;
        self
    }

    /// Finalises the builder and creates a [`WebApp`].
    ///
    /// # Errors
    ///
    /// Returns an error if the DOM root element cannot be found or initialized.
    pub fn build(self) -> Result<WebApp, WebError> {
        WebApp::new_with_options(&self)
    }
}

/// Entry point for running Trellis inside the browser.
///
/// The app owns the component tree. Browser events raised on rendered
/// elements are dispatched through it, and a handler that prevents the
/// default action prevents the browser's as well.
#[wasm_bindgen]
pub struct WebApp {
    ui: Rc<RefCell<Ui>>,
    root: DomRoot,
    popstate: Option<Closure<dyn FnMut(web_sys::Event)>>,
}

impl fmt::Debug for WebApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebApp")
            .field("ui", &self.ui)
            .field("root", &self.root)
            .field("routing", &self.popstate.is_some())
            .finish()
    }
}

impl WebApp {
    fn new_with_options(builder: &WebAppBuilder) -> Result<Self, WebError> {
        console_error_panic_hook::set_once();

        let root = DomRoot::new(builder.root_id.as_deref(), builder.inject_default_styles)?;
        let dom = WebDom::new(&root)?;
        let sink = dom.sink();
        let ui = Rc::new(RefCell::new(Ui::new(dom)));

        let tree = Rc::downgrade(&ui);
        *sink.borrow_mut() = Some(Box::new(move |handle, event| {
            let tree = tree.upgrade()?;
            let Ok(mut ui) = tree.try_borrow_mut() else {
                warn!(kind = event.kind(), "component tree is busy; event dropped");
                return None;
            };
            ui.dispatch_element(handle, event)
        }));

        debug!(root = ?builder.root_id, "web app created");
        Ok(Self {
            ui,
            root,
            popstate: None,
        })
    }

    /// Shared handle on the component tree.
    #[must_use]
    pub fn ui(&self) -> Rc<RefCell<Ui>> {
        Rc::clone(&self.ui)
    }

    /// The element the application renders into.
    #[must_use]
    pub const fn root(&self) -> &DomRoot {
        &self.root
    }

    /// Runs `f` with exclusive access to the component tree.
    ///
    /// # Errors
    ///
    /// Returns [`WebError::Busy`] when called from inside an event handler.
    pub fn with_ui<R>(&self, f: impl FnOnce(&mut Ui) -> R) -> Result<R, WebError> {
        let mut ui = self.ui.try_borrow_mut().map_err(|_| WebError::Busy)?;
        Ok(f(&mut ui))
    }

    /// Renders `widget` into the root element.
    ///
    /// # Errors
    ///
    /// Returns an error if the widget was already rendered or the browser
    /// rejects one of its elements.
    pub fn mount(&self, widget: &impl Widget) -> Result<ElementHandle, WebError> {
        let element = self.with_ui(|ui| {
            let body = ui.body();
            ui.render(widget.id(), body)
        })??;
        Ok(element)
    }

    /// Starts `router` and keeps it in step with the browser's back and
    /// forward buttons.
    ///
    /// The router should record into a
    /// [`BrowserHistory`](crate::BrowserHistory). Routing again replaces the
    /// previous router's `popstate` listener.
    ///
    /// # Errors
    ///
    /// Returns an error if the first page cannot be rendered or the listener
    /// cannot be installed.
    pub fn route(&mut self, router: Router) -> Result<Rc<RefCell<Router>>, WebError> {
        let window = web_sys::window().ok_or(WebError::DomUnavailable)?;
        let router = Rc::new(RefCell::new(router));
        self.with_ui(|ui| Router::start(&router, ui))??;

        let tree = Rc::downgrade(&self.ui);
        let routes = Rc::downgrade(&router);
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
            let (Some(tree), Some(routes)) = (tree.upgrade(), routes.upgrade()) else {
                return;
            };
            let (Ok(mut ui), Ok(mut router)) = (tree.try_borrow_mut(), routes.try_borrow_mut())
            else {
                warn!("popstate ignored while the tree is busy");
                return;
            };
            if let Err(error) = router.handle_popstate(&mut ui) {
                warn!(%error, "popstate navigation failed");
            }
        });

        if let Some(previous) = self.popstate.take() {
            window.remove_event_listener_with_callback(
                "popstate",
                previous.as_ref().unchecked_ref(),
            )?;
        }
        window.add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref())?;
        self.popstate = Some(closure);
        Ok(router)
    }
}

#[wasm_bindgen]
impl WebApp {
    /// Convenience constructor exposed to JavaScript callers.
    #[wasm_bindgen(constructor)]
    /// Creates a new [`WebApp`] using the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the DOM root element cannot be found or initialized.
    pub fn new() -> Result<Self, WebError> {
        Self::new_with_options(&WebAppBuilder::new())
    }

    /// The markup currently rendered inside the root element.
    #[wasm_bindgen(js_name = innerHtml)]
    #[must_use]
    pub fn inner_html(&self) -> String {
        self.root.element().inner_html()
    }
}
