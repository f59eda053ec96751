//! Fault and halt values that flow through the execution boundary.
//!
//! Controller code reports failures as `anyhow::Error`. The dispatcher sorts
//! what comes back into three buckets: a normal completion, a [`Halt`]
//! (deliberate short-circuit, not an error), or a [`Fault`] (anything else,
//! including panics) which becomes a 500.

use crate::server::{Body, Response};
use std::any::Any;
use std::fmt;

/// A failure raised while binding parameters, constructing a controller or
/// running one of its actions.
#[derive(Debug)]
pub enum Fault {
    /// An error returned through `anyhow::Result`
    Error(anyhow::Error),
    /// A panic caught at the execution boundary
    Panic(String),
}

impl Fault {
    /// Build a fault from the payload of a caught panic.
    #[must_use]
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Fault::Panic(message)
    }

    /// Short classification used in log fields.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Fault::Error(_) => "error",
            Fault::Panic(_) => "panic",
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::Error(err) => write!(f, "{err:#}"),
            Fault::Panic(message) => write!(f, "panicked: {message}"),
        }
    }
}

impl From<anyhow::Error> for Fault {
    fn from(err: anyhow::Error) -> Self {
        Fault::Error(err)
    }
}

/// Immediate short-circuit of request processing.
///
/// A halt carries the status, optional body and extra headers to write into
/// the response. Actions raise one with `return Err(Halt::new(403).into())`;
/// the dispatcher applies it and skips the rest of normal dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct Halt {
    pub status: u16,
    pub body: Option<Body>,
    pub headers: Vec<(String, String)>,
}

impl Halt {
    #[must_use]
    pub fn new(status: u16) -> Self {
        Self {
            status,
            body: None,
            headers: Vec::new(),
        }
    }

    /// `405 Method Not Allowed` advertising the accepted methods.
    #[must_use]
    pub fn method_not_allowed(allow: impl Into<String>) -> Self {
        Self::new(405).with_header("Allow", allow)
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Write status, body (when present) and headers into `response`.
    pub fn apply(self, response: &mut Response) {
        response.set_status(self.status);
        if let Some(body) = self.body {
            response.set_body(Some(body));
        }
        for (name, value) in self.headers {
            response.set_header(&name, value);
        }
    }
}

impl fmt::Display for Halt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "halted with status {}", self.status)
    }
}

impl std::error::Error for Halt {}
