//! # brrtdispatch
//!
//! **brrtdispatch** is the request-dispatch core of a controller-based web
//! framework: it routes an incoming request to a controller action, executes
//! it, and turns every outcome into a complete HTTP response.
//!
//! ## Overview
//!
//! - `HEAD` is routed as `GET` and answered without a body
//! - A path that exists for other methods answers `405` with an `Allow` header
//! - Errors and panics inside controllers become `500`, with the controller's
//!   `server_error` hook given a chance to render the body
//! - Responses that still lack a body are rendered by the nearest route
//! - Cookies are read from the request and written as response directives
//!
//! ## Architecture
//!
//! - **[`router`]** - Route table: radix tree of endpoints and compiled path patterns
//! - **[`controller`]** - `Controller` trait and per-type action tables
//! - **[`dispatcher`]** - `try_route`, `execute_route`, fallback bodies and the full lifecycle
//! - **[`server`]** - `Request` / `Response` types and `http` conversions
//! - **[`cookies`]** - Key-addressable cookie accessor
//! - **[`status`]** - Status classes that never carry a body
//! - **[`error`]** - `Fault` and `Halt`
//! - **[`logging`]** / **[`runtime_config`]** - Environment driven setup
//! - **[`cli`]** - `brrtdispatch` command line
//!
//! ## Quick Start
//!
//! ```rust
//! use brrtdispatch::controller::{ActionResult, ActionTable, Controller, ControllerClass};
//! use brrtdispatch::dispatcher::{Dispatcher, Exchange};
//! use brrtdispatch::router::Router;
//! use brrtdispatch::runtime_config::RuntimeConfig;
//! use brrtdispatch::server::Request;
//! use http::Method;
//! use serde_json::json;
//!
//! struct Pets;
//!
//! impl Pets {
//!     fn show(&mut self, exchange: &mut Exchange) -> ActionResult {
//!         let id = exchange.request.param("id").unwrap_or_default().to_string();
//!         exchange.cookies().set("last_pet", id.as_str());
//!         Ok(Some(json!({ "id": id })))
//!     }
//! }
//!
//! impl Controller for Pets {
//!     fn new(_exchange: &mut Exchange) -> anyhow::Result<Self> {
//!         Ok(Pets)
//!     }
//!
//!     fn actions(table: &mut ActionTable<Self>) {
//!         table.add("show", Self::show);
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let router = Router::new().route(Method::GET, "/pets/{id}", ControllerClass::of::<Pets>(), "show")?;
//! let dispatcher = Dispatcher::with_config(router, RuntimeConfig::default());
//!
//! let response = dispatcher.call(Request::new(Method::GET, "/pets/42"));
//! assert_eq!(response.status(), 200);
//! assert_eq!(response.body(), Some(&json!({ "id": "42" })));
//! assert_eq!(response.set_cookie_headers(), vec!["last_pet=42; Path=/"]);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod controller;
pub mod cookies;
pub mod dispatcher;
pub mod error;
pub mod ids;
pub mod logging;
pub mod router;
pub mod runtime_config;
pub mod server;
pub mod status;

pub use controller::{Controller, ControllerClass};
pub use dispatcher::{Dispatcher, Exchange};
pub use router::Router;
pub use server::{Request, Response};
