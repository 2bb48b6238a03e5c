//! CORS preflight/simple-request header decisions.
//!
//! This stays a thin decision function over `HeaderMap`, not a dispatch
//! middleware — routing and transport stay out of this crate entirely.

use crate::byte_string::ByteString;
use crate::header_map::{CaseInsensitiveAsciiHashing, HeaderMap, NameValidator};

pub const ORIGIN: &str = "Origin";
pub const ACCESS_CONTROL_REQUEST_METHOD: &str = "Access-Control-Request-Method";
pub const ACCESS_CONTROL_REQUEST_HEADERS: &str = "Access-Control-Request-Headers";
pub const ACCESS_CONTROL_ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
pub const ACCESS_CONTROL_ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
pub const ACCESS_CONTROL_ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";
pub const ACCESS_CONTROL_ALLOW_CREDENTIALS: &str = "Access-Control-Allow-Credentials";
pub const ACCESS_CONTROL_MAX_AGE: &str = "Access-Control-Max-Age";
pub const ACCESS_CONTROL_EXPOSE_HEADERS: &str = "Access-Control-Expose-Headers";
pub const VARY: &str = "Vary";

fn name(s: &str) -> ByteString {
    ByteString::from(s)
}

/// Static allow-list configuration the handler decides against.
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub allow_credentials: bool,
    pub max_age_seconds: Option<i64>,
    pub exposed_headers: Vec<String>,
}

impl CorsConfig {
    fn origin_allowed(&self, origin: &str) -> bool {
        self.allowed_origins.iter().any(|o| o == "*" || o == origin)
    }
}

/// Whether `request` carries a CORS preflight: `OPTIONS` plus
/// `Access-Control-Request-Method` present.
pub fn is_preflight_request<H: Default + crate::header_map::NameHashingStrategy, N: Default + NameValidator>(
    method: &str,
    request: &HeaderMap<ByteString, H, N>,
) -> bool {
    method.eq_ignore_ascii_case("OPTIONS")
        && request.contains_name(&name(ACCESS_CONTROL_REQUEST_METHOD))
}

/// Applies the CORS decision, writing `Access-Control-*` / `Vary`
/// headers into `response`. Returns `false` (writing nothing) when the
/// request carries no `Origin` or the origin isn't allow-listed.
pub fn apply_cors<N: Default + NameValidator>(
    config: &CorsConfig,
    method: &str,
    request: &HeaderMap<ByteString, CaseInsensitiveAsciiHashing, N>,
    response: &mut HeaderMap<ByteString, CaseInsensitiveAsciiHashing, N>,
) -> bool {
    let origin = match request.get(&name(ORIGIN)) {
        Some(o) => o.to_native_string().to_owned(),
        None => return false,
    };
    if !config.origin_allowed(&origin) {
        return false;
    }

    let allow_origin = if config.allowed_origins.iter().any(|o| o == "*") && !config.allow_credentials {
        "*".to_string()
    } else {
        origin
    };
    response.add(name(ACCESS_CONTROL_ALLOW_ORIGIN), ByteString::from(allow_origin)).unwrap();
    response.add(name(VARY), name(ORIGIN)).unwrap();

    if config.allow_credentials {
        response
            .add(name(ACCESS_CONTROL_ALLOW_CREDENTIALS), name("true"))
            .unwrap();
    }

    if is_preflight_request(method, request) {
        if !config.allowed_methods.is_empty() {
            response
                .add(name(ACCESS_CONTROL_ALLOW_METHODS), ByteString::from(config.allowed_methods.join(", ")))
                .unwrap();
        }

        let requested_headers = request
            .get(&name(ACCESS_CONTROL_REQUEST_HEADERS))
            .map(|h| h.to_native_string().to_owned());
        let allow_headers = if !config.allowed_headers.is_empty() {
            config.allowed_headers.join(", ")
        } else {
            requested_headers.unwrap_or_default()
        };
        if !allow_headers.is_empty() {
            response
                .add(name(ACCESS_CONTROL_ALLOW_HEADERS), ByteString::from(allow_headers))
                .unwrap();
        }

        if let Some(max_age) = config.max_age_seconds {
            response.add_long(name(ACCESS_CONTROL_MAX_AGE), max_age).unwrap();
        }
    } else if !config.exposed_headers.is_empty() {
        response
            .add(name(ACCESS_CONTROL_EXPOSE_HEADERS), ByteString::from(config.exposed_headers.join(", ")))
            .unwrap();
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header_map::AcceptAnyName;

    fn config() -> CorsConfig {
        CorsConfig {
            allowed_origins: vec!["https://example.com".to_string()],
            allowed_methods: vec!["GET".to_string(), "POST".to_string()],
            allowed_headers: vec!["X-Custom".to_string()],
            allow_credentials: true,
            max_age_seconds: Some(600),
            exposed_headers: vec!["X-Exposed".to_string()],
        }
    }

    #[test]
    fn preflight_detected_via_options_and_request_method_header() {
        let mut req: HeaderMap<ByteString, CaseInsensitiveAsciiHashing, AcceptAnyName> = HeaderMap::new();
        req.add(name(ACCESS_CONTROL_REQUEST_METHOD), name("POST")).unwrap();
        assert!(is_preflight_request("OPTIONS", &req));
        assert!(!is_preflight_request("GET", &req));
    }

    #[test]
    fn preflight_writes_allow_headers() {
        let mut req: HeaderMap<ByteString, CaseInsensitiveAsciiHashing, AcceptAnyName> = HeaderMap::new();
        req.add(name(ORIGIN), name("https://example.com")).unwrap();
        req.add(name(ACCESS_CONTROL_REQUEST_METHOD), name("POST")).unwrap();

        let mut res: HeaderMap<ByteString, CaseInsensitiveAsciiHashing, AcceptAnyName> = HeaderMap::new();
        let cfg = config();
        assert!(apply_cors(&cfg, "OPTIONS", &req, &mut res));

        assert_eq!(res.get(&name(ACCESS_CONTROL_ALLOW_ORIGIN)), Some(&name("https://example.com")));
        assert_eq!(res.get(&name(ACCESS_CONTROL_ALLOW_METHODS)), Some(&name("GET, POST")));
        assert_eq!(res.get(&name(ACCESS_CONTROL_ALLOW_CREDENTIALS)), Some(&name("true")));
        assert_eq!(res.get(&name(ACCESS_CONTROL_MAX_AGE)), Some(&name("600")));
    }

    #[test]
    fn disallowed_origin_writes_nothing() {
        let mut req: HeaderMap<ByteString, CaseInsensitiveAsciiHashing, AcceptAnyName> = HeaderMap::new();
        req.add(name(ORIGIN), name("https://evil.example")).unwrap();

        let mut res: HeaderMap<ByteString, CaseInsensitiveAsciiHashing, AcceptAnyName> = HeaderMap::new();
        assert!(!apply_cors(&config(), "GET", &req, &mut res));
        assert!(res.is_empty());
    }

    #[test]
    fn simple_request_exposes_headers() {
        let mut req: HeaderMap<ByteString, CaseInsensitiveAsciiHashing, AcceptAnyName> = HeaderMap::new();
        req.add(name(ORIGIN), name("https://example.com")).unwrap();

        let mut res: HeaderMap<ByteString, CaseInsensitiveAsciiHashing, AcceptAnyName> = HeaderMap::new();
        assert!(apply_cors(&config(), "GET", &req, &mut res));
        assert_eq!(res.get(&name(ACCESS_CONTROL_EXPOSE_HEADERS)), Some(&name("X-Exposed")));
        assert!(res.get(&name(ACCESS_CONTROL_ALLOW_METHODS)).is_none());
    }
}
