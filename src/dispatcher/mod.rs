//! # Dispatcher Module
//!
//! Drives one request through routing, controller execution, error recovery
//! and fallback body generation.
//!
//! ## Request Flow
//!
//! 1. The endpoint for the request path is looked up (`HEAD` routes as `GET`)
//! 2. No endpoint: the request is a miss and the caller answers 404
//! 3. Endpoint without a handler for the method: 405 with an `Allow` header
//! 4. Otherwise the status is set to 200, path arguments are merged into the
//!    request params and the route's controller runs the action
//! 5. A response left without a body is rendered by the nearest route
//!
//! ## Error Handling
//!
//! Errors and panics raised while binding arguments, constructing the
//! controller or running the action are contained at the execution boundary:
//! the fault is logged, the status becomes 500 and the controller's
//! `server_error` hook may render a body. A controller that failed to
//! construct gets no hook. Nothing propagates past the dispatcher.
//!
//! ## Concurrency
//!
//! [`Dispatcher`] is immutable after construction. Per-request state lives in
//! an [`Exchange`] and a [`CurrentController`] slot owned by the caller, so a
//! single dispatcher can be shared across threads.
//!
//! ```rust
//! use brrtdispatch::controller::{ControllerClass, EchoController};
//! use brrtdispatch::dispatcher::Dispatcher;
//! use brrtdispatch::router::Router;
//! use brrtdispatch::runtime_config::RuntimeConfig;
//! use brrtdispatch::server::Request;
//! use http::Method;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let router = Router::new()
//!     .route(Method::GET, "/pets/{id}", ControllerClass::of::<EchoController>(), "show")?;
//! let dispatcher = Dispatcher::with_config(router, RuntimeConfig::default());
//!
//! let response = dispatcher.call(Request::new(Method::GET, "/pets/7"));
//! assert_eq!(response.status(), 200);
//!
//! let response = dispatcher.call(Request::new(Method::POST, "/pets/7"));
//! assert_eq!(response.status(), 405);
//! assert_eq!(response.header("allow"), Some("GET, OPTIONS"));
//! # Ok(())
//! # }
//! ```

mod core;
mod exchange;

pub use self::core::{CurrentController, Dispatcher, Outcome, Routed};
pub use exchange::Exchange;
