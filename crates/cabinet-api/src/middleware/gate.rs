// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Request gate.
//!
//! The gate reads the token header, verifies it, applies the route's access
//! rule and either forwards the request with an [`AuthContext`] attached or
//! answers it directly with the matching error response.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::{HeaderMap, HeaderName, Request},
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};

use crate::auth::{AccessRule, AuthContext, Clock, Decision, Denial, Principal, SystemClock, TokenRejection, TokenVerifier};
use crate::error::{ApiError, ApiResult};

/// Header carrying the token unless configured otherwise.
pub const DEFAULT_AUTH_HEADER: &str = "x-docs-cabinet-authentication";

// =============================================================================
// Gate
// =============================================================================

/// Result of evaluating a request at the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Forward to the next handler on behalf of the principal.
    Forward(Principal),
    /// Answer with the error response for the denial.
    Deny(Denial),
}

/// Token gate shared by every guarded route.
#[derive(Debug, Clone)]
pub struct Gate {
    verifier: Arc<TokenVerifier>,
    clock: Arc<dyn Clock>,
    header: HeaderName,
    mount: Arc<str>,
}

impl Gate {
    /// Creates a gate reading the default header and the wall clock.
    pub fn new(verifier: Arc<TokenVerifier>) -> Self {
        Self {
            verifier,
            clock: Arc::new(SystemClock),
            header: HeaderName::from_static(DEFAULT_AUTH_HEADER),
            mount: Arc::from(""),
        }
    }

    /// Sets the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Sets the header carrying the token.
    pub fn with_header(mut self, header: HeaderName) -> Self {
        self.header = header;
        self
    }

    /// Sets the header carrying the token from its name.
    pub fn with_header_name(self, name: &str) -> ApiResult<Self> {
        let header = HeaderName::try_from(name)
            .map_err(|e| ApiError::internal(format!("invalid auth header '{}': {}", name, e)))?;
        Ok(self.with_header(header))
    }

    /// Sets the path prefix the target segment is read after.
    pub fn with_mount(mut self, mount: impl AsRef<str>) -> Self {
        self.mount = Arc::from(mount.as_ref().trim_end_matches('/'));
        self
    }

    /// Returns the header carrying the token.
    pub fn header(&self) -> &HeaderName {
        &self.header
    }

    /// Returns the verifier.
    pub fn verifier(&self) -> &TokenVerifier {
        &self.verifier
    }

    /// Returns the time source.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Evaluates a request against `rule`.
    pub fn evaluate(&self, rule: AccessRule, headers: &HeaderMap, path: &str) -> GateOutcome {
        let principal = match self.authenticate(headers) {
            Ok(principal) => principal,
            Err(rejection) => return GateOutcome::Deny(rejection.into()),
        };

        match rule.decide(&principal, target_segment(path, &self.mount)) {
            Decision::Allow => GateOutcome::Forward(principal),
            Decision::Deny(denial) => GateOutcome::Deny(denial),
        }
    }

    /// Verifies the token carried by `headers`.
    ///
    /// An absent or blank header is a missing token. A `Bearer ` prefix is
    /// stripped; a value holding only the scheme was sent on purpose and is
    /// rejected as an invalid token.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Principal, TokenRejection> {
        let token = match headers.get(&self.header) {
            None => None,
            Some(value) => Some(value.to_str().map_err(|_| TokenRejection::Invalid)?.trim()),
        };
        let token = token.map(|t| t.strip_prefix("Bearer ").unwrap_or(t));

        self.verifier.verify(token, self.clock.now())
    }

    /// Creates a layer guarding routes with `rule`.
    pub fn layer(&self, rule: AccessRule) -> GateLayer {
        GateLayer {
            gate: self.clone(),
            rule,
        }
    }
}

/// Returns the first non-empty path segment after `mount`.
///
/// Paths that do not start with `mount` are read from their beginning, which
/// covers routers that strip the prefix before the gate runs.
///
/// The segment is read as sent, without percent-decoding. `%35` is not an
/// integer here even though a decoding `Path` extractor would read it as `5`,
/// so encoded ids are refused rather than matched against the principal.
pub fn target_segment<'a>(path: &'a str, mount: &str) -> Option<&'a str> {
    let mount = mount.trim_end_matches('/');
    let rest = match path.strip_prefix(mount) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => path,
    };
    rest.split('/').find(|segment| !segment.is_empty())
}

// =============================================================================
// GateLayer
// =============================================================================

/// Layer applying a [`Gate`] with a fixed access rule.
#[derive(Debug, Clone)]
pub struct GateLayer {
    gate: Gate,
    rule: AccessRule,
}

impl<S> Layer<S> for GateLayer {
    type Service = GateMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        GateMiddleware {
            inner,
            gate: self.gate.clone(),
            rule: self.rule,
        }
    }
}

// =============================================================================
// GateMiddleware
// =============================================================================

/// Middleware produced by [`GateLayer`].
#[derive(Debug, Clone)]
pub struct GateMiddleware<S> {
    inner: S,
    gate: Gate,
    rule: AccessRule,
}

impl<S> Service<Request<Body>> for GateMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let outcome = self.gate.evaluate(self.rule, req.headers(), req.uri().path());
        let mut inner = self.inner.clone();
        let rule = self.rule;

        Box::pin(async move {
            match outcome {
                GateOutcome::Forward(principal) => {
                    req.extensions_mut().insert(AuthContext::new(principal, rule));
                    inner.call(req).await
                }
                GateOutcome::Deny(denial) => Ok(ApiError::from(denial).into_response()),
            }
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use axum::http::{HeaderValue, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::auth::{FixedClock, TokenConfig};

    const NOW: i64 = 1_700_000_000;
    const SECRET: &str = "gate-test-secret-key-of-32-bytes!";

    fn gate() -> Gate {
        let verifier = TokenVerifier::new(TokenConfig::new(SECRET)).unwrap();
        Gate::new(Arc::new(verifier))
            .with_clock(Arc::new(FixedClock::new(NOW)))
            .with_mount("/api/users")
    }

    fn headers_with(gate: &Gate, token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(gate.header().clone(), HeaderValue::from_str(token).unwrap());
        headers
    }

    fn token(gate: &Gate, id: i64, role_id: i64) -> String {
        gate.verifier().issue(Principal::new(id, role_id), NOW).unwrap()
    }

    #[test]
    fn test_target_segment() {
        assert_eq!(target_segment("/api/users/5/documents", "/api/users"), Some("5"));
        assert_eq!(target_segment("/api/users//7", "/api/users/"), Some("7"));
        assert_eq!(target_segment("/api/users", "/api/users"), None);
        assert_eq!(target_segment("/5/documents", "/api/users"), Some("5"));
        assert_eq!(target_segment("/api/usersabc/1", "/api/users"), Some("api"));
        assert_eq!(target_segment("/abc", ""), Some("abc"));
    }

    #[test]
    fn test_missing_header() {
        let gate = gate();
        assert_eq!(
            gate.evaluate(AccessRule::OwnerOrAdmin, &HeaderMap::new(), "/api/users/5"),
            GateOutcome::Deny(Denial::MissingToken)
        );
        assert_eq!(
            gate.evaluate(AccessRule::AdminOnly, &headers_with(&gate, ""), "/api/users"),
            GateOutcome::Deny(Denial::MissingToken)
        );
    }

    #[test]
    fn test_invalid_token() {
        let gate = gate();
        assert_eq!(
            gate.evaluate(AccessRule::Authenticated, &headers_with(&gate, "garbage"), "/api/me"),
            GateOutcome::Deny(Denial::InvalidToken)
        );

        let mut headers = HeaderMap::new();
        headers.insert(gate.header().clone(), HeaderValue::from_bytes(b"\xfftoken").unwrap());
        assert_eq!(
            gate.evaluate(AccessRule::Authenticated, &headers, "/api/me"),
            GateOutcome::Deny(Denial::InvalidToken)
        );
    }

    #[test]
    fn test_bare_bearer_scheme_is_invalid() {
        let gate = gate();
        for value in ["Bearer ", "Bearer", "  Bearer   "] {
            assert_eq!(
                gate.evaluate(AccessRule::Authenticated, &headers_with(&gate, value), "/api/me"),
                GateOutcome::Deny(Denial::InvalidToken),
                "{value:?}"
            );
        }
    }

    #[test]
    fn test_percent_encoded_target_is_malformed() {
        let gate = gate();
        let headers = headers_with(&gate, &token(&gate, 5, 0));

        assert_eq!(target_segment("/api/users/%35/documents", "/api/users"), Some("%35"));
        assert_eq!(
            gate.evaluate(AccessRule::OwnerOrAdmin, &headers, "/api/users/%35/documents"),
            GateOutcome::Deny(Denial::MalformedTarget)
        );
    }

    #[test]
    fn test_bearer_prefix_tolerated() {
        let gate = gate();
        let headers = headers_with(&gate, &format!("Bearer {}", token(&gate, 5, 0)));
        assert_eq!(
            gate.evaluate(AccessRule::OwnerOrAdmin, &headers, "/api/users/5"),
            GateOutcome::Forward(Principal::new(5, 0))
        );
    }

    #[test]
    fn test_rules_applied_after_verification() {
        let gate = gate();
        let regular = headers_with(&gate, &token(&gate, 5, 0));
        let admin = headers_with(&gate, &token(&gate, 1, 1));

        assert_eq!(
            gate.evaluate(AccessRule::OwnerOrAdmin, &regular, "/api/users/9/documents"),
            GateOutcome::Deny(Denial::forbidden())
        );
        assert_eq!(
            gate.evaluate(AccessRule::OwnerOrAdmin, &admin, "/api/users/abc"),
            GateOutcome::Deny(Denial::MalformedTarget)
        );
        assert_eq!(
            gate.evaluate(AccessRule::AdminOnly, &regular, "/api/users"),
            GateOutcome::Deny(Denial::forbidden())
        );
        assert_eq!(
            gate.evaluate(AccessRule::AdminOnly, &admin, "/api/users"),
            GateOutcome::Forward(Principal::new(1, 1))
        );
    }

    #[test]
    fn test_custom_header_name() {
        let gate = gate().with_header_name("x-token").unwrap();
        let headers = headers_with(&gate, &token(&gate, 2, 0));

        assert_eq!(gate.header().as_str(), "x-token");
        assert!(matches!(
            gate.evaluate(AccessRule::Authenticated, &headers, "/api/me"),
            GateOutcome::Forward(_)
        ));
        assert!(gate.clone().with_header_name("bad header").is_err());
    }

    #[tokio::test]
    async fn test_middleware_forwards_with_context() {
        let gate = gate();
        let service = gate.layer(AccessRule::OwnerOrAdmin).layer(tower::service_fn(
            |req: Request<Body>| async move {
                let ctx = req.extensions().get::<AuthContext>().copied().unwrap();
                Ok::<_, Infallible>(ctx.user_id().to_string().into_response())
            },
        ));

        let req = Request::builder()
            .uri("/api/users/5/documents")
            .header(DEFAULT_AUTH_HEADER, token(&gate, 5, 0))
            .body(Body::empty())
            .unwrap();
        let res = service.oneshot(req).await.unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let body = res.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"5");
    }

    #[tokio::test]
    async fn test_middleware_answers_denials() {
        let gate = gate();
        let service = gate.layer(AccessRule::OwnerOrAdmin).layer(tower::service_fn(
            |_req: Request<Body>| async move {
                Ok::<_, Infallible>(StatusCode::IM_A_TEAPOT.into_response())
            },
        ));

        let req = Request::builder()
            .uri("/api/users/9/documents")
            .header(DEFAULT_AUTH_HEADER, token(&gate, 5, 0))
            .body(Body::empty())
            .unwrap();
        let res = service.oneshot(req).await.unwrap();

        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        let body = res.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "ForbiddenOperationError");
    }
}
