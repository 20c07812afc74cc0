//! Request plumbing shared by every route: request ids, bearer auth, and
//! a process-wide rate limit. Auth keys come from [`hypeon_core::AppConfig`],
//! not ambient process state, and all failures speak the API's own error
//! envelope.

use std::{
    collections::HashSet,
    sync::{Arc, Mutex, PoisonError},
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::api::ApiError;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request ID carried as a request extension, either caller-supplied or
/// generated here.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Accepted bearer tokens. An empty key set means auth is switched off.
#[derive(Debug, Clone)]
pub struct AuthState {
    keys: Arc<HashSet<String>>,
}

impl AuthState {
    /// Builds auth state from the configured key list.
    ///
    /// Development tolerates an empty list (auth off, with a warning) so
    /// local runs need no tokens. Any other environment refuses to start
    /// unauthenticated.
    pub fn new(api_keys: &[String], is_development: bool) -> anyhow::Result<Self> {
        let keys: HashSet<String> = api_keys.iter().cloned().collect();

        if keys.is_empty() {
            if !is_development {
                anyhow::bail!(
                    "HYPEON_API_KEYS must list at least one bearer token outside development"
                );
            }
            tracing::warn!("no API keys configured; bearer auth disabled for development");
        }

        Ok(Self {
            keys: Arc::new(keys),
        })
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        !self.keys.is_empty()
    }

    fn allows(&self, token: &str) -> bool {
        self.keys.contains(token)
    }
}

#[derive(Debug)]
struct Window {
    opened_at: Instant,
    admitted: usize,
}

/// Fixed-window rate limiter shared across all protected routes.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_requests: usize,
    window: Duration,
    inner: Arc<Mutex<Window>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            inner: Arc::new(Mutex::new(Window {
                opened_at: Instant::now(),
                admitted: 0,
            })),
        }
    }

    /// Admits or rejects one request as of `now`. A window older than the
    /// configured duration is reopened before counting.
    fn admit_at(&self, now: Instant) -> bool {
        let mut window = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if now.duration_since(window.opened_at) >= self.window {
            window.opened_at = now;
            window.admitted = 0;
        }

        if window.admitted < self.max_requests {
            window.admitted += 1;
            true
        } else {
            false
        }
    }

    fn admit(&self) -> bool {
        self.admit_at(Instant::now())
    }
}

fn request_id_of(req: &Request) -> String {
    req.extensions()
        .get::<RequestId>()
        .map_or_else(String::new, |id| id.0.clone())
}

/// Attaches a request ID to the request extensions and echoes it on the
/// response. A caller-supplied `x-request-id` header wins over generation.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map_or_else(|| Uuid::new_v4().to_string(), ToOwned::to_owned);

    req.extensions_mut().insert(RequestId(id.clone()));
    let mut res = next.run(req).await;

    if let Ok(value) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    res
}

/// Rejects requests lacking a configured bearer token. A no-op when the
/// key set is empty (development).
pub async fn require_bearer_auth(
    State(auth): State<AuthState>,
    req: Request,
    next: Next,
) -> Response {
    if !auth.enabled() {
        return next.run(req).await;
    }

    let authorized = extract_bearer_token(req.headers().get(AUTHORIZATION))
        .is_some_and(|token| auth.allows(token));
    if authorized {
        return next.run(req).await;
    }

    ApiError::new(
        request_id_of(&req),
        "unauthorized",
        "missing or invalid bearer token",
    )
    .into_response()
}

/// Rejects requests past the window's budget with the API's rate-limit
/// error.
pub async fn enforce_rate_limit(
    State(rate_limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    if rate_limit.admit() {
        return next.run(req).await;
    }

    ApiError::new(request_id_of(&req), "rate_limited", "rate limit exceeded").into_response()
}

fn extract_bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|token| !token.trim().is_empty())
}
