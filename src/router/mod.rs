//! # Router Module
//!
//! The route table behind the dispatcher. Routes bind an HTTP method and a
//! path pattern such as `/pets/{id}` to a controller action.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Registering routes and validating their patterns and actions
//! - Finding the [`Endpoint`] (all routes by method) for a request path
//! - Extracting path arguments through the route's compiled [`PathPattern`]
//! - Resolving the nearest route for fallback bodies
//!
//! It does not pick the method or run anything; that is the dispatcher's job.
//!
//! ## Architecture
//!
//! 1. **Registration**: each pattern is compiled once into an anchored regex
//!    and its route is inserted into a radix tree of path segments.
//!
//! 2. **Lookup**: a request path walks the tree (static segments before
//!    parameters) to reach an endpoint. Nodes that exist only as prefixes of
//!    longer routes yield an empty endpoint.
//!
//! ## Example
//!
//! ```rust
//! use brrtdispatch::controller::{ControllerClass, EchoController};
//! use brrtdispatch::router::Router;
//! use http::Method;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let echo = ControllerClass::of::<EchoController>();
//! let router = Router::new()
//!     .route(Method::GET, "/pets/{id}", echo.clone(), "show")?
//!     .route(Method::DELETE, "/pets/{id}", echo, "destroy")?;
//!
//! let endpoint = router.find_endpoint("/pets/7").expect("endpoint");
//! assert_eq!(endpoint.allow().as_deref(), Some("GET, DELETE, OPTIONS"));
//!
//! let route = endpoint.handler_for(&Method::GET).expect("route");
//! let args = router.path_of(route).expect("pattern").extract_arguments("/pets/7");
//! assert_eq!(args[0].1, "7");
//! # Ok(())
//! # }
//! ```

mod core;
mod error;
mod pattern;
mod radix;
mod route;
#[cfg(test)]
mod tests;

pub use self::core::Router;
pub use error::RouterError;
pub use pattern::{ParamVec, PathPattern, MAX_INLINE_PARAMS};
pub use radix::RadixRouter;
pub use route::{Endpoint, Route};
