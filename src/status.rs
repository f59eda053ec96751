//! HTTP status helpers owned by the dispatch core.
//!
//! The dispatcher needs two facts about a status code: whether a response with
//! that status may carry an entity body at all, and which reason phrase to use
//! for the generic fallback body. Both live here instead of being borrowed from
//! a server implementation.

use crate::server::Body;
use http::StatusCode;

/// Status codes whose responses must never carry an entity body
/// (RFC 9110 §6.4.1: every 1xx, 204 No Content, 304 Not Modified).
pub const STATUS_WITH_NO_ENTITY_BODY: [u16; 6] = [100, 101, 102, 103, 204, 304];

/// Returns `true` when a response with `status` must be sent without a body.
///
/// Unassigned informational codes (e.g. `199`) are treated like the rest of
/// the 1xx class.
#[inline]
#[must_use]
pub fn has_no_entity_body(status: u16) -> bool {
    (100..200).contains(&status) || STATUS_WITH_NO_ENTITY_BODY.contains(&status)
}

/// Canonical reason phrase for `status`, or `"Unknown"` for unassigned codes.
#[must_use]
pub fn status_reason(status: u16) -> &'static str {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("Unknown")
}

/// Generic body used when no controller is available to render one.
#[must_use]
pub fn default_body(status: u16) -> Body {
    Body::String(format!("<h1>{}</h1>", status_reason(status)))
}
