//! CORS allow-list with `*.` host wildcards.

use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Allowed browser origins.
///
/// Entries are exact origins (`http://localhost:5173`) or a scheme followed by
/// `*.` and a domain (`https://*.lovable.app`), which admits any subdomain.
#[derive(Debug, Clone, Default)]
pub struct OriginMatcher {
    exact: Vec<String>,
    /// `(scheme prefix, domain suffix)`, e.g. `("https://", ".lovable.app")`.
    wildcard: Vec<(String, String)>,
}

impl OriginMatcher {
    pub fn new<S: AsRef<str>>(origins: &[S]) -> Self {
        let mut matcher = Self::default();

        for origin in origins {
            let origin = origin.as_ref().trim().trim_end_matches('/');
            if origin.is_empty() {
                continue;
            }
            match origin.split_once("*.") {
                Some((scheme, domain)) if !domain.is_empty() => matcher
                    .wildcard
                    .push((scheme.to_string(), format!(".{}", domain))),
                _ => matcher.exact.push(origin.to_string()),
            }
        }

        matcher
    }

    pub fn matches(&self, origin: &str) -> bool {
        if self.exact.iter().any(|o| o == origin) {
            return true;
        }

        self.wildcard.iter().any(|(scheme, suffix)| {
            origin
                .strip_prefix(scheme.as_str())
                .and_then(|rest| rest.strip_suffix(suffix.as_str()))
                .is_some_and(|sub| !sub.is_empty() && !sub.contains('/'))
        })
    }
}

/// CORS layer admitting the configured origins.
pub fn cors_layer<S: AsRef<str>>(origins: &[S]) -> CorsLayer {
    let matcher = OriginMatcher::new(origins);

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _| {
            origin.to_str().is_ok_and(|o| matcher.matches(o))
        }))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}
