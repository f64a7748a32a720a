//! Request authorization
//!
//! A single pure predicate over (method, key, supplied secret). It is kept
//! free of server types so the decision table can be unit tested against
//! literal tuples.
//!
//! Rules:
//! - PUT and DELETE require the shared secret header to match exactly.
//! - GET is allowed only for keys on the configured allow-list.
//! - Every other method is denied outright.

use std::collections::HashSet;

use axum::http::Method;

use crate::config::AuthConfig;

/// Header carrying the shared secret for mutating requests
pub const AUTH_HEADER: &str = "X-Custom-Auth-Key";

/// Authorization predicate built once at startup from [`AuthConfig`].
/// Immutable for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct Authorizer {
    secret: Option<String>,
    allow_list: HashSet<String>,
}

impl Authorizer {
    /// Build an authorizer from configuration
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            secret: config.secret.clone(),
            allow_list: config.allow_list.iter().cloned().collect(),
        }
    }

    /// Decide whether a request may proceed to the store.
    ///
    /// Pure: no side effects, no clock, no I/O. Callers must not touch the
    /// store when this returns false.
    pub fn authorize(&self, method: &Method, key: &str, supplied_secret: Option<&str>) -> bool {
        if *method == Method::PUT || *method == Method::DELETE {
            self.secret_matches(supplied_secret)
        } else if *method == Method::GET {
            self.allow_list.contains(key)
        } else {
            false
        }
    }

    /// Exact-equality check against the configured secret.
    ///
    /// With no secret configured this always fails: mutations are denied by
    /// default rather than letting a missing header match a missing secret.
    fn secret_matches(&self, supplied: Option<&str>) -> bool {
        match self.secret.as_deref() {
            Some(secret) => supplied == Some(secret),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authorizer(secret: Option<&str>) -> Authorizer {
        Authorizer::new(&AuthConfig {
            secret: secret.map(String::from),
            allow_list: vec!["worker.txt".to_string()],
        })
    }

    #[test]
    fn test_put_requires_matching_secret() {
        let auth = authorizer(Some("s3cret"));
        assert!(auth.authorize(&Method::PUT, "anything", Some("s3cret")));
        assert!(!auth.authorize(&Method::PUT, "anything", Some("wrong")));
        assert!(!auth.authorize(&Method::PUT, "anything", None));
    }

    #[test]
    fn test_delete_requires_matching_secret() {
        let auth = authorizer(Some("s3cret"));
        assert!(auth.authorize(&Method::DELETE, "worker.txt", Some("s3cret")));
        assert!(!auth.authorize(&Method::DELETE, "worker.txt", Some("")));
        assert!(!auth.authorize(&Method::DELETE, "worker.txt", None));
    }

    #[test]
    fn test_get_uses_allow_list_only() {
        let auth = authorizer(Some("s3cret"));
        assert!(auth.authorize(&Method::GET, "worker.txt", None));
        // A valid secret does not widen read access
        assert!(!auth.authorize(&Method::GET, "secret.txt", Some("s3cret")));
        assert!(!auth.authorize(&Method::GET, "", None));
    }

    #[test]
    fn test_other_methods_always_denied() {
        let auth = authorizer(Some("s3cret"));
        for method in [Method::POST, Method::PATCH, Method::HEAD, Method::OPTIONS] {
            assert!(!auth.authorize(&method, "worker.txt", Some("s3cret")));
            assert!(!auth.authorize(&method, "worker.txt", None));
        }
    }

    #[test]
    fn test_unset_secret_denies_all_mutations() {
        let auth = authorizer(None);
        assert!(!auth.authorize(&Method::PUT, "worker.txt", None));
        assert!(!auth.authorize(&Method::PUT, "worker.txt", Some("")));
        assert!(!auth.authorize(&Method::DELETE, "worker.txt", None));
        // Reads are unaffected by the missing secret
        assert!(auth.authorize(&Method::GET, "worker.txt", None));
    }

    #[test]
    fn test_key_is_not_normalized() {
        let auth = authorizer(Some("s3cret"));
        // Only the exact allow-listed spelling is readable
        assert!(!auth.authorize(&Method::GET, "/worker.txt", None));
        assert!(!auth.authorize(&Method::GET, "./worker.txt", None));
    }
}
