//! Path-to-page routing.

use std::{cell::RefCell, fmt, rc::Rc};

use indexmap::IndexMap;
use tracing::{debug, warn};
use trellis_core::{Event, NodeId, Ui, UiError};

use crate::{History, RouteParams, RoutePattern};

/// Text of the page shown when no route (not even `/`) matches.
pub const NOT_FOUND_TEXT: &str = "404 - Page not found";

/// Builds the component tree for a matched route.
pub type RouteFactory = Rc<dyn Fn(&mut Ui, &RouteMatch) -> NodeId>;

/// A path resolved against a registered route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pattern: String,
    path: String,
    params: RouteParams,
}

impl RouteMatch {
    /// The template of the route that matched.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The path that was navigated to.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Parameters captured by the template.
    #[must_use]
    pub const fn params(&self) -> &RouteParams {
        &self.params
    }
}

/// Outcome of [`Router::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A registered route, possibly the `/` fallback.
    Matched(RouteMatch),
    /// Nothing matched and no `/` route exists.
    NotFound,
}

struct Route {
    pattern: RoutePattern,
    factory: RouteFactory,
}

/// Renders one page at a time into a container node.
///
/// Routes resolve in this order: a route registered with exactly the path,
/// then the first `:param` template that matches in registration order, then
/// the `/` route, and finally a literal not-found page.
pub struct Router {
    container: NodeId,
    routes: IndexMap<String, Route>,
    current_path: Option<String>,
    history: Box<dyn History>,
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("container", &self.container)
            .field("routes", &self.routes.keys().collect::<Vec<_>>())
            .field("current_path", &self.current_path)
            .finish_non_exhaustive()
    }
}

impl Router {
    /// Creates a router rendering into `container`.
    pub fn new(container: NodeId, history: impl History + 'static) -> Self {
        Self {
            container,
            routes: IndexMap::new(),
            current_path: None,
            history: Box::new(history),
        }
    }

    /// The node pages are mounted under.
    #[must_use]
    pub const fn container(&self) -> NodeId {
        self.container
    }

    /// The last path navigated to.
    #[must_use]
    pub fn current_path(&self) -> Option<&str> {
        self.current_path.as_deref()
    }

    /// The history navigation is recorded in.
    #[must_use]
    pub fn history(&self) -> &dyn History {
        self.history.as_ref()
    }

    /// Mutable access to the history, e.g. to go back.
    pub fn history_mut(&mut self) -> &mut dyn History {
        self.history.as_mut()
    }

    /// Registers a route. Registering the same template again replaces its factory.
    pub fn add_route(
        &mut self,
        pattern: &str,
        factory: impl Fn(&mut Ui, &RouteMatch) -> NodeId + 'static,
    ) -> &mut Self {
        self.routes.insert(
            pattern.to_owned(),
            Route {
                pattern: RoutePattern::parse(pattern),
                factory: Rc::new(factory),
            },
        );
        self
    }

    /// Finds the route `path` would render, without navigating.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Resolution {
        let matched = |route: &Route, params: RouteParams| {
            Resolution::Matched(RouteMatch {
                pattern: route.pattern.as_str().to_owned(),
                path: path.to_owned(),
                params,
            })
        };

        if let Some(route) = self.routes.get(path) {
            return matched(route, RouteParams::default());
        }
        for route in self.routes.values() {
            if !route.pattern.is_dynamic() {
                continue;
            }
            if let Some(params) = route.pattern.matches(path) {
                return matched(route, params);
            }
        }
        self.routes
            .get("/")
            .map_or(Resolution::NotFound, |route| {
                matched(route, RouteParams::default())
            })
    }

    /// Returns the parameter `name` captured from `path` by the first
    /// matching template that declares it.
    #[must_use]
    pub fn parameter(&self, path: &str, name: &str) -> Option<String> {
        self.routes
            .values()
            .filter(|route| route.pattern.is_dynamic())
            .filter_map(|route| route.pattern.matches(path))
            .find_map(|params| params.get(name).map(str::to_owned))
    }

    /// Navigates to `path`, recording it in the history.
    ///
    /// Returns `false` without doing anything if `path` is the current path.
    ///
    /// # Errors
    ///
    /// Fails if the container no longer exists or the platform rejects the
    /// new page.
    pub fn navigate_to(&mut self, ui: &mut Ui, path: &str) -> Result<bool, UiError> {
        if self.current_path.as_deref() == Some(path) {
            return Ok(false);
        }
        self.history.push(path);
        self.show(ui, path)?;
        Ok(true)
    }

    /// Navigates to the history's current entry without adding a new one.
    ///
    /// Call this after the history moved, e.g. on a browser `popstate`.
    ///
    /// # Errors
    ///
    /// See [`Router::navigate_to`].
    pub fn handle_popstate(&mut self, ui: &mut Ui) -> Result<bool, UiError> {
        let path = self.history.current_path();
        if self.current_path.as_deref() == Some(path.as_str()) {
            return Ok(false);
        }
        self.show(ui, &path)?;
        Ok(true)
    }

    fn show(&mut self, ui: &mut Ui, path: &str) -> Result<(), UiError> {
        let resolution = self.resolve(path);
        debug!(path, ?resolution, "navigating");
        self.current_path = Some(path.to_owned());

        ui.clear(self.container)?;
        let page = match &resolution {
            Resolution::Matched(route) => match self.routes.get(route.pattern()) {
                Some(entry) => {
                    let factory = Rc::clone(&entry.factory);
                    factory(ui, route)
                }
                None => not_found(ui),
            },
            Resolution::NotFound => not_found(ui),
        };
        ui.add_child(self.container, page)
    }

    /// Renders the history's current path and starts intercepting link clicks
    /// inside the router's container.
    ///
    /// # Errors
    ///
    /// See [`Router::navigate_to`].
    pub fn start(router: &Rc<RefCell<Self>>, ui: &mut Ui) -> Result<(), UiError> {
        let container = router.borrow().container;
        Self::intercept_links(router, ui, container)?;
        router.borrow_mut().handle_popstate(ui)?;
        Ok(())
    }

    /// Intercepts clicks on relative links anywhere under `scope`.
    ///
    /// Links whose `href` starts with `http` or `#` keep their default behaviour.
    ///
    /// # Errors
    ///
    /// Fails if `scope` does not exist.
    pub fn intercept_links(
        router: &Rc<RefCell<Self>>,
        ui: &mut Ui,
        scope: NodeId,
    ) -> Result<(), UiError> {
        let router = Rc::downgrade(router);
        ui.add_event_listener(scope, "click", move |ui, event: &mut Event| {
            let Some(href) = link_target(ui, event) else {
                return;
            };
            let Some(router) = router.upgrade() else {
                return;
            };
            event.prevent_default();
            let Ok(mut router) = router.try_borrow_mut() else {
                warn!(href, "router is busy; link click ignored");
                return;
            };
            if let Err(error) = router.navigate_to(ui, &href) {
                warn!(href, %error, "navigation failed");
            }
        })
    }
}

fn not_found(ui: &mut Ui) -> NodeId {
    ui.create("div").text(NOT_FOUND_TEXT).id()
}

/// The `href` of the relative link an event was raised inside, if any.
fn link_target(ui: &Ui, event: &Event) -> Option<String> {
    let anchor = ui.closest(event.target()?, "a")?;
    let href = ui.attribute(anchor, "href")?;
    if href.starts_with("http") || href.starts_with('#') {
        return None;
    }
    Some(href.to_owned())
}
