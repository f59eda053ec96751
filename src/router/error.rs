use std::fmt;

/// Error returned when registering a route fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// The path pattern does not compile
    InvalidPattern {
        /// Pattern as given to the router
        pattern: String,
        /// Compiler message
        reason: String,
    },
    /// The controller has no action with this name
    UnknownAction {
        /// Controller type name
        controller: String,
        /// Requested action
        action: String,
    },
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterError::InvalidPattern { pattern, reason } => {
                write!(f, "Invalid path pattern '{pattern}': {reason}")
            }
            RouterError::UnknownAction { controller, action } => {
                write!(f, "Controller {controller} has no action '{action}'")
            }
        }
    }
}

impl std::error::Error for RouterError {}
