use crate::ids::RequestId;
use http::Method;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Incoming request as seen by the dispatcher.
///
/// `params` starts out holding the query string parameters; path arguments
/// are merged into it when a route executes, overwriting query values that
/// share a key.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// Correlation id for logging
    pub request_id: RequestId,
    /// HTTP method (GET, POST, etc.)
    pub method: Method,
    /// Request path without the query string
    pub path: String,
    /// HTTP headers (lowercase keys)
    pub headers: HashMap<String, String>,
    /// Parsed cookies from the Cookie header
    pub cookies: HashMap<String, String>,
    /// Query parameters plus, after execution, path arguments
    pub params: HashMap<String, String>,
    /// Parsed JSON body (if any)
    pub body: Option<Value>,
}

impl Request {
    /// Build a request from a method and a request target (`/path?query`).
    #[must_use]
    pub fn new(method: Method, target: &str) -> Self {
        let path = target.split('?').next().unwrap_or("/");
        let path = if path.is_empty() { "/" } else { path };
        Self {
            request_id: RequestId::new(),
            method,
            path: path.to_string(),
            headers: HashMap::new(),
            cookies: HashMap::new(),
            params: parse_query_params(target),
            body: None,
        }
    }

    /// Add a header; a `Cookie` header also refreshes [`Request::cookies`].
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        let name = name.to_ascii_lowercase();
        if name == "cookie" {
            let merged = match self.headers.get("cookie") {
                Some(existing) => format!("{existing}; {value}"),
                None => value.to_string(),
            };
            self.headers.insert(name, merged);
            self.cookies = parse_cookies(&self.headers);
        } else {
            if name == "x-request-id" {
                self.request_id = RequestId::from_header_or_new(Some(value));
            }
            self.headers.insert(name, value.to_string());
        }
        self
    }

    /// Add a single request cookie.
    #[must_use]
    pub fn with_cookie(self, name: &str, value: &str) -> Self {
        let pair = format!("{name}={}", urlencoding::encode(value));
        self.with_header("cookie", &pair)
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[inline]
    #[must_use]
    pub fn http_method(&self) -> &Method {
        &self.method
    }

    #[inline]
    #[must_use]
    pub fn is_head(&self) -> bool {
        self.method == Method::HEAD
    }

    #[inline]
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Get a header by name (case-insensitive per RFC 7230)
    #[inline]
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

impl From<http::Request<Vec<u8>>> for Request {
    fn from(req: http::Request<Vec<u8>>) -> Self {
        let (parts, body) = req.into_parts();
        let target = parts
            .uri
            .path_and_query()
            .map_or_else(|| parts.uri.path().to_string(), |pq| pq.as_str().to_string());
        let mut request = Request::new(parts.method, &target);

        for (name, value) in &parts.headers {
            if let Ok(value) = value.to_str() {
                request = request.with_header(name.as_str(), value);
            }
        }

        if !body.is_empty() {
            match serde_json::from_slice::<Value>(&body) {
                Ok(json) => request.body = Some(json),
                Err(err) => debug!(
                    request_id = %request.request_id,
                    body_size_bytes = body.len(),
                    error = %err,
                    "Request body is not JSON, ignoring"
                ),
            }
        }

        debug!(
            request_id = %request.request_id,
            method = %request.method,
            path = %request.path,
            header_count = request.headers.len(),
            cookie_count = request.cookies.len(),
            param_count = request.params.len(),
            "HTTP request parsed"
        );

        request
    }
}

/// Parse the `cookie` header into a name → value map.
///
/// Values are percent-decoded; a value that fails to decode is kept verbatim.
#[must_use]
pub fn parse_cookies(headers: &HashMap<String, String>) -> HashMap<String, String> {
    headers
        .get("cookie")
        .map(|c| {
            c.split(';')
                .filter_map(|pair| {
                    let mut parts = pair.trim().splitn(2, '=');
                    let name = parts.next()?.trim();
                    if name.is_empty() {
                        return None;
                    }
                    let raw = parts.next().unwrap_or("").trim();
                    let value = urlencoding::decode(raw)
                        .map_or_else(|_| raw.to_string(), |v| v.into_owned());
                    Some((name.to_string(), value))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Parse query string parameters from a request target
///
/// Extracts everything after the `?` character and URL-decodes parameter names and values.
#[must_use]
pub fn parse_query_params(target: &str) -> HashMap<String, String> {
    if let Some(pos) = target.find('?') {
        let query_str = &target[pos + 1..];
        url::form_urlencoded::parse(query_str.as_bytes())
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    } else {
        HashMap::new()
    }
}
