//! Request and response types the dispatcher works against.
//!
//! The serving layer owns sockets and wire parsing; it hands the dispatcher a
//! [`Request`] (or an `http::Request<Vec<u8>>`) and gets a [`Response`] back,
//! which converts into an `http::Response<Vec<u8>>` with
//! [`Response::to_http`].

pub mod request;
pub mod response;

pub use request::{parse_cookies, parse_query_params, Request};
pub use response::{
    Body, CookieDirective, CookieOptions, HeaderVec, Response, SameSite, MAX_INLINE_HEADERS,
};
