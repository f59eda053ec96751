//! # CLI Module
//!
//! Command-line front end for trying route tables without writing a server.
//! Every route in the table is bound to the built-in echo controller.
//!
//! ## Commands
//!
//! ### `routes`
//!
//! Print every registered route:
//!
//! ```bash
//! brrtdispatch routes --table routes.yaml
//! ```
//!
//! ### `request`
//!
//! Dispatch one simulated request and print the full response:
//!
//! ```bash
//! brrtdispatch request --table routes.yaml --method POST --path /pets/7 \
//!     --cookie visits=2 --header "X-Request-Id: 01J0000000000000000000000" \
//!     --body '{"name": "Rex"}'
//! ```
//!
//! Options:
//! - `--table <FILE>` - Route table, JSON when the extension is `.json`, YAML otherwise
//! - `--method <METHOD>` - HTTP method (default: GET)
//! - `--path <TARGET>` - Path with optional query string
//! - `--cookie <NAME=VALUE>` - Request cookie, repeatable
//! - `--header <"NAME: VALUE">` - Request header, repeatable
//! - `--body <JSON>` - Request body
//!
//! ## Route Table
//!
//! ```yaml
//! routes:
//!   - { method: GET, path: /, action: index }
//!   - { method: GET, path: "/pets/{id}", action: show }
//!   - { method: DELETE, path: "/pets/{id}", action: destroy }
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{
    build_request, execute, run_cli, write_response, Cli, Commands, RouteEntry, RouteTable,
};
