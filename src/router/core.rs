use crate::controller::ControllerClass;
use http::Method;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::error::RouterError;
use super::pattern::PathPattern;
use super::radix::{segments, RadixRouter};
use super::route::{Endpoint, Route};

/// Route table consulted by the dispatcher.
///
/// Built once at startup with [`Router::add`], then shared read-only. Lookups
/// walk a radix tree keyed by path segments; argument extraction uses the
/// compiled [`PathPattern`] of the matched route.
#[derive(Clone, Debug, Default)]
pub struct Router {
    radix: RadixRouter,
    patterns: HashMap<Arc<str>, PathPattern>,
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `controller#action` for `method` on `path`.
    ///
    /// The path is normalised to a leading slash and no trailing slash.
    /// Registering the same method and path twice replaces the first route.
    ///
    /// # Errors
    ///
    /// [`RouterError::UnknownAction`] when the controller's action table has
    /// no such action, [`RouterError::InvalidPattern`] for malformed
    /// `{param}` segments.
    pub fn add(
        &mut self,
        method: Method,
        path: &str,
        controller: ControllerClass,
        action: &str,
    ) -> Result<(), RouterError> {
        if !controller.has_action(action) {
            return Err(RouterError::UnknownAction {
                controller: controller.short_name().to_string(),
                action: action.to_string(),
            });
        }

        let path = normalize_path(path);
        validate_segments(&path)?;

        if !self.patterns.contains_key(path.as_str()) {
            let pattern = PathPattern::parse(&path).map_err(|e| RouterError::InvalidPattern {
                pattern: path.clone(),
                reason: e.to_string(),
            })?;
            self.patterns.insert(Arc::from(path.as_str()), pattern);
        }

        let route = Arc::new(Route::new(method, &path, controller, action));
        match self.radix.insert(Arc::clone(&route)) {
            Some(previous) => warn!(
                route = %route,
                replaced = %previous,
                "Route registered twice, keeping the latest"
            ),
            None => debug!(route = %route, "Route registered"),
        }
        Ok(())
    }

    /// Builder form of [`Router::add`].
    ///
    /// # Errors
    ///
    /// Same as [`Router::add`].
    pub fn route(
        mut self,
        method: Method,
        path: &str,
        controller: ControllerClass,
        action: &str,
    ) -> Result<Self, RouterError> {
        self.add(method, path, controller, action)?;
        Ok(self)
    }

    /// Endpoint registered for a concrete request path.
    ///
    /// Returns an empty endpoint for paths that only exist as the prefix of a
    /// longer route.
    #[must_use]
    pub fn find_endpoint(&self, path: &str) -> Option<&Endpoint> {
        let endpoint = self.radix.endpoint(path);
        debug!(path = %path, found = endpoint.is_some(), "Endpoint lookup");
        endpoint
    }

    /// Compiled pattern for a registered route.
    #[must_use]
    pub fn path_of(&self, route: &Route) -> Option<&PathPattern> {
        self.patterns.get(route.path_pattern())
    }

    /// Closest registered route for `path`.
    ///
    /// Tries the full path, then drops trailing segments one at a time down
    /// to `/`. At each step the endpoint's GET route wins, otherwise its
    /// first route in method order.
    #[must_use]
    pub fn find_nearest_route(&self, path: &str) -> Option<Arc<Route>> {
        let segments = segments(path);
        for len in (0..=segments.len()).rev() {
            let Some(endpoint) = self.radix.endpoint_for_segments(&segments[..len]) else {
                continue;
            };
            if let Some(route) = endpoint.primary_route() {
                debug!(path = %path, nearest = %route, "Nearest route resolved");
                return Some(Arc::clone(route));
            }
        }
        debug!(path = %path, "No nearest route");
        None
    }

    /// Every registered route
    #[must_use]
    pub fn routes(&self) -> Vec<Arc<Route>> {
        self.radix.routes()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Log the routing table at info level.
    pub fn dump_routes(&self) {
        let routes = self.routes();
        info!(routes_count = routes.len(), "Routing table");
        for route in routes {
            info!(route = %route, "Route");
        }
    }
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

fn validate_segments(path: &str) -> Result<(), RouterError> {
    let invalid = |reason: &str| RouterError::InvalidPattern {
        pattern: path.to_string(),
        reason: reason.to_string(),
    };

    let mut names: Vec<&str> = Vec::new();
    for segment in segments(path) {
        if !segment.contains(['{', '}']) {
            continue;
        }
        let Some(name) = segment
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
        else {
            return Err(invalid("parameters must span a whole segment"));
        };
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(invalid("parameter names must be non-empty identifiers"));
        }
        if names.contains(&name) {
            return Err(invalid("duplicate parameter name"));
        }
        names.push(name);
    }
    Ok(())
}
