//! # Controller Module
//!
//! Controllers own the application logic behind routes. Each route binds a
//! path and method to a controller type and one of its actions.
//!
//! ## Lifecycle
//!
//! 1. At registration, [`ControllerClass::of`] resolves the controller's
//!    [`ActionTable`] once.
//! 2. When a route executes, the dispatcher constructs a fresh controller via
//!    [`Controller::new`], keeps it as the request's current controller, and
//!    runs the named action.
//! 3. On a fault the dispatcher sets status 500 and calls
//!    [`Controller::server_error`] on that same instance.
//! 4. When the response still lacks a body, [`Controller::default_body`] (or
//!    [`Controller::not_found`] for 404s) renders one.
//!
//! The controller is dropped with the request; instances are never shared.

mod core;
mod echo;

pub use self::core::{
    Action, ActionResult, ActionTable, ActiveController, Controller, ControllerClass, NOT_FOUND,
};
pub use echo::{EchoController, ECHO_ACTIONS};
