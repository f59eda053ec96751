//! Key-addressable cookie access for controllers.
//!
//! Reads come from the cookies parsed off the request; writes become cookie
//! directives on the response. A cookie set during a request is not visible to
//! [`Cookies::get`] until the client sends it back.
//!
//! ```rust
//! use brrtdispatch::cookies::Cookies;
//! use brrtdispatch::server::{CookieOptions, Response};
//! use std::collections::HashMap;
//!
//! let request_cookies = HashMap::from([("cat".to_string(), "old cat".to_string())]);
//! let mut response = Response::new();
//! let mut cookies = Cookies::new(&request_cookies, &mut response);
//!
//! assert_eq!(cookies.get("cat"), Some("old cat"));
//! cookies.set("cat", "nice cat");
//! cookies.set("dog", CookieOptions::new("good dog").max_age(60));
//! cookies.set("fish", None::<&str>);
//! assert_eq!(cookies.get("cat"), Some("old cat"));
//! ```

use crate::server::{CookieOptions, Response};
use std::collections::HashMap;
use tracing::trace;

/// New value for a cookie, as accepted by [`Cookies::set`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieValue {
    /// Remove the cookie (scoped to path `/`)
    Delete,
    /// Plain value, sent with path `/`
    Plain(String),
    /// Value plus transport options, passed through unchanged
    Options(CookieOptions),
}

impl From<&str> for CookieValue {
    fn from(value: &str) -> Self {
        CookieValue::Plain(value.to_string())
    }
}

impl From<String> for CookieValue {
    fn from(value: String) -> Self {
        CookieValue::Plain(value)
    }
}

impl From<&String> for CookieValue {
    fn from(value: &String) -> Self {
        CookieValue::Plain(value.clone())
    }
}

impl From<i64> for CookieValue {
    fn from(value: i64) -> Self {
        CookieValue::Plain(value.to_string())
    }
}

impl From<u64> for CookieValue {
    fn from(value: u64) -> Self {
        CookieValue::Plain(value.to_string())
    }
}

impl From<bool> for CookieValue {
    fn from(value: bool) -> Self {
        CookieValue::Plain(value.to_string())
    }
}

impl From<CookieOptions> for CookieValue {
    fn from(options: CookieOptions) -> Self {
        CookieValue::Options(options)
    }
}

impl<T: Into<CookieValue>> From<Option<T>> for CookieValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CookieValue::Delete, Into::into)
    }
}

/// Cookie accessor bridging request cookies and response cookie directives.
#[derive(Debug)]
pub struct Cookies<'a> {
    request_cookies: &'a HashMap<String, String>,
    response: &'a mut Response,
}

impl<'a> Cookies<'a> {
    #[must_use]
    pub fn new(request_cookies: &'a HashMap<String, String>, response: &'a mut Response) -> Self {
        Self {
            request_cookies,
            response,
        }
    }

    /// Value of the request cookie `key`, if the client sent one.
    #[must_use]
    pub fn get(&self, key: impl AsRef<str>) -> Option<&'a str> {
        self.request_cookies.get(key.as_ref()).map(String::as_str)
    }

    /// Set or delete the response cookie `key`.
    ///
    /// `None` deletes the cookie at path `/`, [`CookieOptions`] are passed on
    /// verbatim, and any other value is set with path `/`.
    pub fn set(&mut self, key: impl AsRef<str>, new_value: impl Into<CookieValue>) {
        let key = key.as_ref();
        match new_value.into() {
            CookieValue::Delete => {
                trace!(cookie = %key, "Cookie delete directive");
                self.response
                    .delete_cookie(key, CookieOptions::default().path("/"));
            }
            CookieValue::Options(options) => {
                trace!(cookie = %key, "Cookie set directive with options");
                self.response.set_cookie(key, options);
            }
            CookieValue::Plain(value) => {
                trace!(cookie = %key, "Cookie set directive");
                self.response
                    .set_cookie(key, CookieOptions::new(value).path("/"));
            }
        }
    }
}
