use regex::Regex;
use smallvec::SmallVec;
use std::sync::Arc;

/// Maximum number of path arguments before heap allocation.
/// Most routes have ≤4 path params (e.g. /users/{id}/posts/{post_id}).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated path argument storage for the hot path.
///
/// Names are `Arc<str>` shared with the compiled pattern; values are per-request.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Compiled path pattern such as `/users/{id}/posts/{post_id}`.
#[derive(Debug, Clone)]
pub struct PathPattern {
    source: Arc<str>,
    regex: Regex,
    /// Same pattern, matching any path that continues below it
    prefix: Regex,
    param_names: Vec<Arc<str>>,
}

impl PathPattern {
    /// Compile `pattern` into an anchored regex.
    ///
    /// `{name}` segments match one non-empty path segment; everything else
    /// matches literally. A trailing slash on the request path is tolerated.
    ///
    /// # Errors
    ///
    /// Returns the regex error when the compiled pattern is invalid.
    pub fn parse(pattern: &str) -> Result<Self, regex::Error> {
        let mut body = String::with_capacity(pattern.len() + 8);
        let mut param_names = Vec::with_capacity(pattern.matches('{').count());

        for segment in pattern.split('/').filter(|s| !s.is_empty()) {
            if segment.starts_with('{') && segment.ends_with('}') && segment.len() > 2 {
                let name = &segment[1..segment.len() - 1];
                body.push_str("/([^/]+)");
                param_names.push(Arc::from(name));
            } else {
                body.push('/');
                body.push_str(&regex::escape(segment));
            }
        }

        let exact = if body.is_empty() {
            "^/$".to_string()
        } else {
            format!("^{body}/?$")
        };

        Ok(Self {
            source: Arc::from(pattern),
            regex: Regex::new(&exact)?,
            prefix: Regex::new(&format!("^{body}(?:/|$)"))?,
            param_names,
        })
    }

    /// The pattern as registered
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn param_names(&self) -> &[Arc<str>] {
        &self.param_names
    }

    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Arguments captured from `path`; empty when the path does not match.
    ///
    /// Captured values are percent-decoded.
    #[must_use]
    pub fn extract_arguments(&self, path: &str) -> ParamVec {
        self.capture(&self.regex, path)
    }

    /// Arguments captured from the leading segments of `path`.
    ///
    /// Matches paths that continue below the pattern, so `/items/{id}` binds
    /// `id` from `/items/5/reviews`. An exact match binds the same arguments
    /// as [`PathPattern::extract_arguments`].
    #[must_use]
    pub fn extract_leading_arguments(&self, path: &str) -> ParamVec {
        self.capture(&self.prefix, path)
    }

    fn capture(&self, regex: &Regex, path: &str) -> ParamVec {
        let mut arguments = ParamVec::new();
        let Some(captures) = regex.captures(path) else {
            return arguments;
        };
        for (name, capture) in self.param_names.iter().zip(captures.iter().skip(1)) {
            if let Some(m) = capture {
                let raw = m.as_str();
                let value = urlencoding::decode(raw)
                    .map_or_else(|_| raw.to_string(), |v| v.into_owned());
                arguments.push((Arc::clone(name), value));
            }
        }
        arguments
    }
}
