mod metrics;
mod products;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use hypeon_core::DatasetSnapshot;

use crate::middleware::{
    enforce_rate_limit, request_id, require_bearer_auth, AuthState, RateLimitState, RequestId,
};

#[derive(Clone)]
pub struct AppState {
    pub snapshot: Arc<DatasetSnapshot>,
    pub loaded_at: DateTime<Utc>,
}

impl AppState {
    #[must_use]
    pub fn new(snapshot: DatasetSnapshot) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
            loaded_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: Vec<T>,
    pub total_count: usize,
    pub last_updated: DateTime<Utc>,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    shopify_rows: usize,
    amazon_rows: usize,
    tiktok_rows: usize,
    reddit_post_rows: usize,
    reddit_comment_rows: usize,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(data: Vec<T>, last_updated: DateTime<Utc>, request_id: String) -> Self {
        Self {
            total_count: data.len(),
            data,
            last_updated,
            meta: ResponseMeta::new(request_id),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn normalize_limit(limit: Option<i64>) -> usize {
    usize::try_from(limit.unwrap_or(50).clamp(1, 200)).unwrap_or(50)
}

pub(super) fn normalize_offset(offset: Option<i64>) -> usize {
    usize::try_from(offset.unwrap_or(0).max(0)).unwrap_or(0)
}

/// Applies offset/limit to a fully-computed record list, keeping
/// `total_count` at the pre-pagination size.
pub(super) fn paginate<T>(records: Vec<T>, limit: usize, offset: usize) -> (Vec<T>, usize) {
    let total = records.len();
    let page = records.into_iter().skip(offset).take(limit).collect();
    (page, total)
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

fn protected_router(auth: AuthState, rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/metrics/growth", get(metrics::list_growth))
        .route("/api/v1/metrics/sentiment", get(metrics::list_sentiment))
        .route("/api/v1/metrics/engagement", get(metrics::list_engagement))
        .route("/api/v1/metrics/hype", get(metrics::list_hype))
        .route("/api/v1/metrics/trend", get(metrics::list_trend))
        .route("/api/v1/products/growth", get(products::list_product_growth))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    rate_limit,
                    enforce_rate_limit,
                ))
                .layer(axum::middleware::from_fn_with_state(
                    auth,
                    require_bearer_auth,
                )),
        )
}

pub fn build_app(state: AppState, auth: AuthState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(protected_router(auth, rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let snapshot = &state.snapshot;
    (
        StatusCode::OK,
        Json(ApiResponse::new(
            vec![HealthData {
                status: "ok",
                shopify_rows: snapshot.shopify.len(),
                amazon_rows: snapshot.amazon.len(),
                tiktok_rows: snapshot.tiktok.len(),
                reddit_post_rows: snapshot.reddit_posts.len(),
                reddit_comment_rows: snapshot.reddit_comments.len(),
            }],
            state.loaded_at,
            req_id.0,
        )),
    )
}

pub fn default_rate_limit_state() -> RateLimitState {
    RateLimitState::new(120, Duration::from_secs(60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use hypeon_core::Dataset;
    use serde_json::json;
    use tower::ServiceExt;

    fn dataset(records: serde_json::Value) -> Dataset {
        Dataset::from_records(records).expect("record array")
    }

    pub(crate) fn sample_snapshot() -> DatasetSnapshot {
        DatasetSnapshot {
            shopify: dataset(json!([
                {"niche": "carpet", "product_id": "s1", "title": "Shag Rug", "stock_status": "in stock"},
                {"niche": "curtain", "product_id": "s2", "title": "Linen Curtain", "stock_status": "sold out"}
            ])),
            amazon: dataset(json!([
                {"niche": "carpet", "asin": "B01", "title": "Area Rug", "rating": 4.5, "reviews_count": 900},
                {"niche": "curtain", "asin": "B02", "title": "Blackout Curtain", "rating": 3.8, "reviews_count": 120}
            ])),
            tiktok: dataset(json!([
                {"niche": "carpet", "video_id": "v1", "views": 9000, "likes": 700, "comments": 90,
                 "shares": 45, "description": "love this rug, great quality"},
                {"niche": "curtain", "video_id": "v2", "views": 4000, "likes": 300, "comments": 60,
                 "shares": 20, "description": "works perfectly, highly recommend"}
            ])),
            reddit_posts: dataset(json!([
                {"niche": "carpet", "title": "durable carpet recs", "post_body": "looking for quality",
                 "upvotes": 120, "comments_count": 30}
            ])),
            reddit_comments: dataset(json!([
                {"niche": "carpet", "comment_text": "great pick, very happy"}
            ])),
        }
    }

    pub(crate) fn test_app() -> Router {
        let auth = AuthState::new(&[], true).expect("auth");
        build_app(
            AppState::new(sample_snapshot()),
            auth,
            default_rate_limit_state(),
        )
    }

    fn secured_app(keys: &[String], rate_limit: RateLimitState) -> Router {
        let auth = AuthState::new(keys, false).expect("auth");
        build_app(AppState::new(sample_snapshot()), auth, rate_limit)
    }

    pub(crate) async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json = serde_json::from_slice(&body).expect("json parse");
        (status, json)
    }

    #[test]
    fn normalize_limit_applies_defaults_and_bounds() {
        assert_eq!(normalize_limit(None), 50);
        assert_eq!(normalize_limit(Some(0)), 1);
        assert_eq!(normalize_limit(Some(1_000)), 200);
        assert_eq!(normalize_limit(Some(25)), 25);
    }

    #[test]
    fn normalize_offset_floors_negative_values() {
        assert_eq!(normalize_offset(None), 0);
        assert_eq!(normalize_offset(Some(-5)), 0);
        assert_eq!(normalize_offset(Some(10)), 10);
    }

    #[test]
    fn api_error_validation_error_maps_to_bad_request() {
        let response = ApiError::new("req-1", "validation_error", "invalid input").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn health_reports_dataset_sizes() {
        let (status, json) = get_json(test_app(), "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        let row = &json["data"][0];
        assert_eq!(row["status"].as_str(), Some("ok"));
        assert_eq!(row["shopify_rows"].as_u64(), Some(2));
        assert_eq!(row["reddit_comment_rows"].as_u64(), Some(1));
        assert!(json["meta"]["request_id"].is_string());
    }

    #[tokio::test]
    async fn responses_echo_provided_request_id() {
        let app = test_app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .header("x-request-id", "test-req-42")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(
            response.headers().get("x-request-id").map(|v| v.to_str().ok()),
            Some(Some("test-req-42"))
        );
    }

    async fn get_with_auth(
        app: Router,
        uri: &str,
        bearer: Option<&str>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = bearer {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let response = app
            .oneshot(builder.body(Body::empty()).expect("request"))
            .await
            .expect("response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json = serde_json::from_slice(&body).expect("json parse");
        (status, json)
    }

    fn keys(token: &str) -> Vec<String> {
        vec![token.to_string()]
    }

    #[tokio::test]
    async fn protected_routes_reject_missing_and_wrong_tokens() {
        let app = secured_app(&keys("good-token"), default_rate_limit_state());

        let (status, json) = get_with_auth(app.clone(), "/api/v1/metrics/trend", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"]["code"].as_str(), Some("unauthorized"));

        let (status, json) =
            get_with_auth(app, "/api/v1/metrics/trend", Some("wrong-token")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"]["code"].as_str(), Some("unauthorized"));
    }

    #[tokio::test]
    async fn protected_routes_accept_a_configured_token() {
        let app = secured_app(&keys("good-token"), default_rate_limit_state());
        let (status, json) =
            get_with_auth(app, "/api/v1/metrics/trend", Some("good-token")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(!json["data"].as_array().expect("data array").is_empty());
    }

    #[tokio::test]
    async fn health_stays_public_when_auth_is_enabled() {
        let app = secured_app(&keys("good-token"), default_rate_limit_state());
        let (status, _) = get_with_auth(app, "/api/v1/health", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn burst_past_the_rate_limit_returns_429() {
        let app = secured_app(
            &keys("good-token"),
            RateLimitState::new(2, std::time::Duration::from_secs(60)),
        );

        for _ in 0..2 {
            let (status, _) =
                get_with_auth(app.clone(), "/api/v1/metrics/growth", Some("good-token")).await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, json) =
            get_with_auth(app, "/api/v1/metrics/growth", Some("good-token")).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(json["error"]["code"].as_str(), Some("rate_limited"));
    }
}
