use crate::cookies::Cookies;
use crate::server::{Request, Response};

/// One request and the response being built for it.
///
/// Owned by a single dispatch; controllers receive it by mutable reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    pub request: Request,
    pub response: Response,
}

impl Exchange {
    #[must_use]
    pub fn new(request: Request) -> Self {
        Self {
            request,
            response: Response::new(),
        }
    }

    /// Cookie accessor over the request cookies and this response.
    pub fn cookies(&mut self) -> Cookies<'_> {
        Cookies::new(&self.request.cookies, &mut self.response)
    }

    #[inline]
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.request.param(name)
    }

    #[inline]
    #[must_use]
    pub fn status(&self) -> u16 {
        self.response.status()
    }

    #[inline]
    pub fn set_status(&mut self, status: u16) {
        self.response.set_status(status);
    }

    #[must_use]
    pub fn into_response(self) -> Response {
        self.response
    }
}
