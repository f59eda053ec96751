//! Radix tree of endpoints
//!
//! Each node represents one path segment and holds the [`Endpoint`] for the
//! path ending there. Nodes created only as prefixes of longer routes hold an
//! empty endpoint, so a lookup can distinguish "path unknown" from "path known
//! but nothing registered on it".
//!
//! - Static segments (e.g. `users`) match exactly
//! - Parameter segments (e.g. `{id}`) match any single segment
//! - Static children are tried before the parameter child
//!
//! A position holds at most one parameter node whatever the parameter is
//! called, so `/items/{id}` and `/items/{item_id}` share one endpoint. Each
//! route keeps its own pattern for argument extraction.

use std::borrow::Cow;
use std::sync::Arc;

use super::route::{Endpoint, Route};

/// Split a path into its non-empty segments.
pub(crate) fn segments(path: &str) -> Vec<&str> {
    path.trim_start_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .collect()
}

/// Node in the radix tree
#[derive(Clone, Debug)]
struct RadixNode {
    /// The path segment this node represents (without leading /)
    segment: Cow<'static, str>,
    /// Routes for the path ending at this node
    endpoint: Endpoint,
    /// Child nodes for static segments
    children: Vec<RadixNode>,
    /// Child for a parameter segment, shared by every parameter name
    param_child: Option<Box<RadixNode>>,
}

impl RadixNode {
    fn new(segment: Cow<'static, str>) -> Self {
        Self {
            segment,
            endpoint: Endpoint::default(),
            children: Vec::new(),
            param_child: None,
        }
    }

    /// Insert a route; returns the route it replaced, if any.
    fn insert(&mut self, segments: &[&str], route: Arc<Route>) -> Option<Arc<Route>> {
        let Some((&segment, remaining)) = segments.split_first() else {
            return self.endpoint.insert(route);
        };

        if segment.starts_with('{') && segment.ends_with('}') {
            let child = self
                .param_child
                .get_or_insert_with(|| Box::new(RadixNode::new(Cow::Owned(segment.to_string()))));
            return child.insert(remaining, route);
        }

        if let Some(child) = self.children.iter_mut().find(|c| c.segment == segment) {
            return child.insert(remaining, route);
        }

        let mut child = RadixNode::new(Cow::Owned(segment.to_string()));
        let replaced = child.insert(remaining, route);
        self.children.push(child);
        replaced
    }

    /// Find the node for `segments`, preferring a node that has routes.
    ///
    /// A node reached only as a prefix is returned when no populated node
    /// matches.
    fn search(&self, segments: &[&str]) -> Option<&RadixNode> {
        let Some((&segment, remaining)) = segments.split_first() else {
            return Some(self);
        };

        let mut fallback = None;
        let candidates = self
            .children
            .iter()
            .filter(|c| c.segment == segment)
            .chain(self.param_child.as_deref());

        for child in candidates {
            if let Some(node) = child.search(remaining) {
                if !node.endpoint.is_empty() {
                    return Some(node);
                }
                fallback.get_or_insert(node);
            }
        }

        fallback
    }

    fn collect_routes(&self, out: &mut Vec<Arc<Route>>) {
        out.extend(self.endpoint.routes().map(Arc::clone));
        for child in self.children.iter().chain(self.param_child.as_deref()) {
            child.collect_routes(out);
        }
    }
}

/// Radix tree mapping paths to endpoints
#[derive(Clone, Debug)]
pub struct RadixRouter {
    root: RadixNode,
}

impl Default for RadixRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl RadixRouter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: RadixNode::new(Cow::Borrowed("")),
        }
    }

    /// Insert `route` under its path pattern; returns the replaced route.
    pub fn insert(&mut self, route: Arc<Route>) -> Option<Arc<Route>> {
        let pattern = route.path_pattern().to_string();
        self.root.insert(&segments(&pattern), route)
    }

    /// Endpoint for a concrete request path.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> Option<&Endpoint> {
        self.endpoint_for_segments(&segments(path))
    }

    pub(crate) fn endpoint_for_segments(&self, segments: &[&str]) -> Option<&Endpoint> {
        self.root.search(segments).map(|node| &node.endpoint)
    }

    /// Every registered route, depth first.
    #[must_use]
    pub fn routes(&self) -> Vec<Arc<Route>> {
        let mut out = Vec::new();
        self.root.collect_routes(&mut out);
        out
    }
}
