use crate::controller::ControllerClass;
use http::Method;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// One (path pattern, method, controller, action) binding.
#[derive(Debug, Clone)]
pub struct Route {
    method: Method,
    path_pattern: Arc<str>,
    controller: ControllerClass,
    action: Arc<str>,
}

impl Route {
    #[must_use]
    pub fn new(method: Method, path_pattern: &str, controller: ControllerClass, action: &str) -> Self {
        Self {
            method,
            path_pattern: Arc::from(path_pattern),
            controller,
            action: Arc::from(action),
        }
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn path_pattern(&self) -> &str {
        &self.path_pattern
    }

    #[must_use]
    pub fn controller(&self) -> &ControllerClass {
        &self.controller
    }

    /// Default action executed when the route matches
    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} -> {}#{}",
            self.method,
            self.path_pattern,
            self.controller.short_name(),
            self.action
        )
    }
}

/// Canonical order of methods in an `Allow` header.
const METHOD_ORDER: [Method; 9] = [
    Method::GET,
    Method::HEAD,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
    Method::OPTIONS,
    Method::TRACE,
    Method::CONNECT,
];

fn method_rank(method: &Method) -> usize {
    METHOD_ORDER
        .iter()
        .position(|m| m == method)
        .unwrap_or(METHOD_ORDER.len())
}

/// Routes registered for one concrete path, keyed by method.
#[derive(Debug, Clone, Default)]
pub struct Endpoint {
    routes: SmallVec<[(Method, Arc<Route>); 4]>,
}

impl Endpoint {
    /// Route handling `method` at this path, if any.
    #[must_use]
    pub fn handler_for(&self, method: &Method) -> Option<&Arc<Route>> {
        self.routes.iter().find(|(m, _)| m == method).map(|(_, r)| r)
    }

    /// Methods accepted here, for `Allow` headers; `None` when there are none.
    ///
    /// `OPTIONS` is always advertised since the dispatcher answers it itself.
    #[must_use]
    pub fn allow(&self) -> Option<String> {
        if self.routes.is_empty() {
            return None;
        }
        let mut methods: Vec<&str> = self.routes.iter().map(|(m, _)| m.as_str()).collect();
        if self.handler_for(&Method::OPTIONS).is_none() {
            methods.push(Method::OPTIONS.as_str());
        }
        Some(methods.join(", "))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.routes.iter().map(|(m, _)| m)
    }

    pub fn routes(&self) -> impl Iterator<Item = &Arc<Route>> {
        self.routes.iter().map(|(_, r)| r)
    }

    /// Route rendered when this endpoint is the nearest match for a path:
    /// the GET route when present, otherwise the first in method order.
    #[must_use]
    pub fn primary_route(&self) -> Option<&Arc<Route>> {
        self.handler_for(&Method::GET)
            .or_else(|| self.routes.first().map(|(_, r)| r))
    }

    /// Insert keeping canonical method order; returns the replaced route.
    pub(crate) fn insert(&mut self, route: Arc<Route>) -> Option<Arc<Route>> {
        let method = route.method().clone();
        if let Some(slot) = self.routes.iter_mut().find(|(m, _)| *m == method) {
            return Some(std::mem::replace(&mut slot.1, route));
        }
        let rank = method_rank(&method);
        let at = self
            .routes
            .iter()
            .position(|(m, _)| method_rank(m) > rank)
            .unwrap_or(self.routes.len());
        self.routes.insert(at, (method, route));
        None
    }
}
