//! Minimal HTTP carriers and cookie handling.
//!
//! The engine implements no transport of its own. These types are the seam
//! shared with whatever HTTP layer hosts it: requests expose a `Cookie`
//! header to read, responses collect `Set-Cookie` headers to send. A host
//! framework adapts its own request/response objects to these.

use std::collections::HashMap;

use crate::config::CookieOptions;

/// HTTP request wrapper. Only the headers matter to the session engine.
#[derive(Debug, Clone, Default)]
pub struct HttpRequest {
    pub headers: HashMap<String, String>,
}

impl HttpRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header (builder style, mainly for tests and adapters).
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Find the named cookie in this request's `Cookie` header.
    pub fn cookie(&self, name: &str) -> Option<Cookie> {
        Cookie::parse(self.headers.get("Cookie")?, name)
    }
}

/// HTTP response wrapper.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    pub fn ok() -> Self {
        Self::new(200)
    }

    /// Attach a cookie to this response.
    pub fn set_cookie(&mut self, cookie: &Cookie) {
        self.headers
            .insert("Set-Cookie".to_string(), cookie.to_header_value());
    }
}

/// A named cookie value plus its attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub options: CookieOptions,
}

impl Cookie {
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        options: CookieOptions,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            options,
        }
    }

    /// Render as a `Set-Cookie` header value.
    ///
    /// A negative max-age renders as `Max-Age=0`, which forces immediate
    /// client-side expiry; zero omits the attribute entirely.
    pub fn to_header_value(&self) -> String {
        let mut header = format!("{}={}", self.name, self.value);

        if !self.options.path.is_empty() {
            header.push_str(&format!("; Path={}", self.options.path));
        }
        if !self.options.domain.is_empty() {
            header.push_str(&format!("; Domain={}", self.options.domain));
        }
        if self.options.max_age < 0 {
            header.push_str("; Max-Age=0");
        } else if self.options.max_age > 0 {
            header.push_str(&format!("; Max-Age={}", self.options.max_age));
        }
        if self.options.secure {
            header.push_str("; Secure");
        }
        if self.options.http_only {
            header.push_str("; HttpOnly");
        }

        header
    }

    /// Find the cookie called `name` in a `Cookie` request header.
    ///
    /// Browsers send only `name=value` pairs, but non-browser clients may
    /// echo attribute fragments after the pair; any that directly follow
    /// the matched pair are folded into the returned cookie's options so
    /// attributes presented by the client are preserved. An attribute
    /// fragment with an unparseable value is ignored, leaving the
    /// default.
    pub fn parse(header: &str, name: &str) -> Option<Cookie> {
        let mut found: Option<Cookie> = None;

        for part in header.split(';').map(str::trim) {
            let (key, value) = match part.split_once('=') {
                Some((k, v)) => (k.trim(), v.trim()),
                None => (part, ""),
            };

            if let Some(cookie) = found.as_mut() {
                match key.to_ascii_lowercase().as_str() {
                    "path" => cookie.options.path = value.to_string(),
                    "domain" => cookie.options.domain = value.to_string(),
                    "max-age" => {
                        if let Ok(seconds) = value.parse() {
                            cookie.options.max_age = seconds;
                        }
                    }
                    "secure" => cookie.options.secure = true,
                    "httponly" => cookie.options.http_only = true,
                    // Next cookie pair; attribute run is over.
                    _ => break,
                }
            } else if key == name {
                found = Some(Cookie::new(name, value, CookieOptions::default()));
            }
        }

        found
    }
}
