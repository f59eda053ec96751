use crate::controller::{ActionResult, ActiveController, NOT_FOUND};
use crate::error::{Fault, Halt};
use crate::router::{Route, Router};
use crate::runtime_config::RuntimeConfig;
use crate::server::{Body, Request, Response};
use crate::status::{default_body, has_no_entity_body};
use http::Method;
use std::backtrace::Backtrace;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, info_span, warn};

use super::exchange::Exchange;

/// Controller constructed during the current dispatch, if any.
///
/// Owned by the caller of [`Dispatcher::try_route`] for the length of one
/// request and handed back to [`Dispatcher::default_body_of_nearest_route`].
pub type CurrentController = Option<ActiveController>;

/// Outcome of [`Dispatcher::try_route`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    /// No endpoint, or an endpoint without methods: the caller answers 404
    Missing,
    /// The request method has no handler here; a 405 with `Allow` was written
    MethodNotAllowed,
    /// A route was executed (its outcome may still be a halt or a fault)
    Executed(Outcome),
}

impl Routed {
    /// Whether a route was found and executed.
    #[must_use]
    pub fn is_found(self) -> bool {
        matches!(self, Routed::Executed(_))
    }
}

/// How an executed route ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Halted,
    /// Contained fault; the response is a 500
    Faulted,
}

/// Tagged result of one guarded call into controller code.
enum Attempt<T> {
    Completed(T),
    Halted(Halt),
    Faulted(Fault),
}

/// Run controller code, turning errors and panics into a tagged result.
///
/// A [`Halt`] returned as an error is not a fault.
fn guarded<T>(f: impl FnOnce() -> anyhow::Result<T>) -> Attempt<T> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Attempt::Completed(value),
        Ok(Err(err)) => match err.downcast::<Halt>() {
            Ok(halt) => Attempt::Halted(halt),
            Err(err) => Attempt::Faulted(Fault::Error(err)),
        },
        Err(payload) => Attempt::Faulted(Fault::from_panic(payload)),
    }
}

/// Routes requests to controller actions.
///
/// The dispatcher holds only the route table and configuration, both
/// immutable, so one instance (or its clones) can serve any number of
/// concurrent requests. All per-request state lives in the [`Exchange`] and
/// the [`CurrentController`] slot the caller passes in.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    router: Arc<Router>,
    config: RuntimeConfig,
}

impl Dispatcher {
    /// Dispatcher over `router` with configuration from the environment.
    #[must_use]
    pub fn new(router: Router) -> Self {
        Self::with_config(router, RuntimeConfig::from_env())
    }

    #[must_use]
    pub fn with_config(router: Router, config: RuntimeConfig) -> Self {
        info!(
            routes_count = router.routes().len(),
            fault_backtrace = config.fault_backtrace,
            slow_request_ms = config.slow_request_ms,
            "Dispatcher ready"
        );
        Self {
            router: Arc::new(router),
            config,
        }
    }

    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    #[must_use]
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Run the full request lifecycle and return the finished response.
    ///
    /// 1. `OPTIONS` is answered from the endpoint's `Allow` value
    /// 2. [`Dispatcher::try_route`]; a miss becomes a 404
    /// 3. A response still lacking a body gets one from
    ///    [`Dispatcher::default_body_of_nearest_route`]
    /// 4. Bodyless statuses and `HEAD` requests are sent without a body
    pub fn call(&self, request: Request) -> Response {
        let started = Instant::now();
        let span = info_span!(
            "dispatch",
            request_id = %request.request_id,
            method = %request.method,
            path = %request.path
        );
        let _entered = span.enter();

        let request_id = request.request_id.to_string();
        let is_head = request.is_head();
        let mut exchange = Exchange::new(request);
        let mut current: CurrentController = None;

        if !self.try_options(&mut exchange) {
            match self.try_route(&mut exchange, &mut current) {
                Routed::Missing => exchange.set_status(404),
                Routed::MethodNotAllowed | Routed::Executed(_) => {}
            }
        }

        if exchange.response.body().is_none() {
            let body = self.default_body_of_nearest_route(&mut exchange, &mut current);
            exchange.response.set_body(body);
        }

        let status = exchange.status();
        if has_no_entity_body(status) || is_head {
            exchange.response.take_body();
        }
        exchange.response.set_header("x-request-id", request_id);
        drop(current);

        let latency_ms = started.elapsed().as_millis() as u64;
        if latency_ms > self.config.slow_request_ms {
            warn!(status, latency_ms, "Slow request dispatched");
        } else {
            info!(status, latency_ms, "Request dispatched");
        }

        exchange.into_response()
    }

    /// Answer an `OPTIONS` request when no route handles `OPTIONS` explicitly.
    ///
    /// Returns `true` when the request was answered here: `200` with `Allow`,
    /// or `404` when the path accepts nothing.
    pub fn try_options(&self, exchange: &mut Exchange) -> bool {
        if exchange.request.method != Method::OPTIONS {
            return false;
        }
        let endpoint = self.router.find_endpoint(&exchange.request.path);
        if endpoint.is_some_and(|e| e.handler_for(&Method::OPTIONS).is_some()) {
            return false;
        }
        match endpoint.and_then(|e| e.allow()) {
            Some(allow) => {
                debug!(allow = %allow, "Answering OPTIONS");
                exchange.set_status(200);
                exchange.response.set_header("Allow", allow);
            }
            None => exchange.set_status(404),
        }
        true
    }

    /// Find the route for the request and execute it.
    ///
    /// `HEAD` is routed as `GET`. A path whose endpoint has routes but none for
    /// the method gets a 405 with `Allow` and no controller is constructed.
    pub fn try_route(&self, exchange: &mut Exchange, current: &mut CurrentController) -> Routed {
        let method = if exchange.request.is_head() {
            Method::GET
        } else {
            exchange.request.http_method().clone()
        };

        let Some(endpoint) = self.router.find_endpoint(&exchange.request.path) else {
            debug!(method = %method, "No endpoint for path");
            return Routed::Missing;
        };

        let Some(route) = endpoint.handler_for(&method) else {
            let Some(allow) = endpoint.allow() else {
                debug!(method = %method, "Endpoint declares no methods");
                return Routed::Missing;
            };
            info!(method = %method, allow = %allow, "Method not allowed");
            Halt::method_not_allowed(allow).apply(&mut exchange.response);
            return Routed::MethodNotAllowed;
        };

        let route = Arc::clone(route);
        exchange.set_status(200);
        Routed::Executed(self.execute_route(exchange, &route, None, current))
    }

    /// Bind path arguments, construct the route's controller and run `action`
    /// (the route's own action when `None`).
    ///
    /// Arguments are bound from the leading segments of the request path, so
    /// a nearest route run for a deeper path still sees its own parameters.
    ///
    /// The constructed controller replaces whatever `current` held. Faults
    /// are contained here: the status becomes 500 and, when a controller was
    /// constructed, its `server_error` hook may render a body.
    pub fn execute_route(
        &self,
        exchange: &mut Exchange,
        route: &Route,
        action: Option<&str>,
        current: &mut CurrentController,
    ) -> Outcome {
        let action = action.unwrap_or_else(|| route.action());
        let controller_name = route.controller().short_name();
        debug!(controller = controller_name, action, "Executing route");
        *current = None;

        let attempt = guarded(|| -> ActionResult {
            let pattern = self
                .router
                .path_of(route)
                .ok_or_else(|| anyhow::anyhow!("route {route} is not registered"))?;
            for (name, value) in pattern.extract_leading_arguments(&exchange.request.path) {
                exchange.request.params.insert(name.to_string(), value);
            }
            let controller = current.insert(route.controller().instantiate(exchange)?);
            controller.execute(action, exchange)
        });

        match attempt {
            Attempt::Completed(body) => {
                if body.is_some() {
                    exchange.response.set_body(body);
                }
                debug!(
                    controller = controller_name,
                    action,
                    status = exchange.status(),
                    "Route executed"
                );
                Outcome::Completed
            }
            Attempt::Halted(halt) => {
                debug!(controller = controller_name, action, status = halt.status, "Route halted");
                halt.apply(&mut exchange.response);
                Outcome::Halted
            }
            Attempt::Faulted(fault) => {
                self.dump_error(controller_name, action, &fault);
                exchange.set_status(500);
                if let Some(controller) = current.as_mut() {
                    self.run_server_error(exchange, controller, &fault);
                }
                Outcome::Faulted
            }
        }
    }

    /// Body for a response that has none yet.
    ///
    /// `None` for bodyless statuses. Otherwise the nearest route renders it:
    /// its `not_found` action for a 404, else the `default_body` of the
    /// controller in `current` or of a fresh instance of the route's
    /// controller. Without any nearby route the generic body is used.
    pub fn default_body_of_nearest_route(
        &self,
        exchange: &mut Exchange,
        current: &mut CurrentController,
    ) -> Option<Body> {
        let status = exchange.status();
        if has_no_entity_body(status) {
            return None;
        }

        let Some(route) = self.router.find_nearest_route(&exchange.request.path) else {
            debug!(status, "No nearby route, using generic body");
            return Some(default_body(status));
        };

        if exchange.response.is_not_found() {
            self.execute_route(exchange, &route, Some(NOT_FOUND), current);
            return exchange.response.body().cloned();
        }

        if let Some(controller) = current.as_mut() {
            return self.render_default_body(exchange, controller);
        }

        let constructed = guarded(|| route.controller().instantiate(exchange));
        match constructed {
            Attempt::Completed(mut controller) => self.render_default_body(exchange, &mut controller),
            Attempt::Halted(halt) => {
                warn!(status = halt.status, "Halt ignored while building a fallback controller");
                Some(default_body(status))
            }
            Attempt::Faulted(fault) => {
                warn!(
                    controller = route.controller().short_name(),
                    fault_kind = fault.kind(),
                    fault = %fault,
                    "Fallback controller construction failed, using generic body"
                );
                Some(default_body(status))
            }
        }
    }

    fn render_default_body(
        &self,
        exchange: &mut Exchange,
        controller: &mut ActiveController,
    ) -> Option<Body> {
        let status = exchange.status();
        match guarded(|| Ok(controller.default_body(exchange))) {
            Attempt::Completed(body) => body,
            Attempt::Halted(_) => Some(default_body(status)),
            Attempt::Faulted(fault) => {
                self.dump_error(controller.name(), "default_body", &fault);
                Some(default_body(status))
            }
        }
    }

    fn run_server_error(&self, exchange: &mut Exchange, controller: &mut ActiveController, fault: &Fault) {
        match guarded(|| controller.server_error(exchange, fault)) {
            Attempt::Completed(Some(body)) => exchange.response.set_body(Some(body)),
            Attempt::Completed(None) => {}
            Attempt::Halted(halt) => halt.apply(&mut exchange.response),
            Attempt::Faulted(nested) => {
                error!(
                    controller = controller.name(),
                    fault = %fault,
                    nested_fault = %nested,
                    "server_error hook failed"
                );
            }
        }
    }

    fn dump_error(&self, controller: &str, action: &str, fault: &Fault) {
        if self.config.fault_backtrace {
            let backtrace = Backtrace::force_capture();
            error!(
                controller,
                action,
                fault_kind = fault.kind(),
                fault = %fault,
                backtrace = %backtrace,
                "Route execution failed"
            );
        } else {
            error!(
                controller,
                action,
                fault_kind = fault.kind(),
                fault = %fault,
                "Route execution failed"
            );
        }
    }
}
