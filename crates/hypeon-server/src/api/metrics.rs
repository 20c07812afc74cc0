use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use hypeon_core::NicheKey;
use hypeon_metrics::{
    composite_records, engagement_score, growth_rate, hype_score, sentiment_score, CompositeRecord,
    NicheScores,
};

use super::{normalize_limit, normalize_offset, paginate, ApiResponse, AppState};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub struct MetricsQuery {
    pub niche: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct NicheScoreItem {
    pub niche: NicheKey,
    pub score: f64,
}

fn score_items(scores: NicheScores, filter: Option<&NicheKey>) -> Vec<NicheScoreItem> {
    scores
        .into_iter()
        .filter(|(niche, _)| filter.is_none_or(|wanted| niche == wanted))
        .map(|(niche, score)| NicheScoreItem { niche, score })
        .collect()
}

/// Parses the optional `niche` query param into a normalized key, so
/// `?niche=Carpets` matches the `carpet` niche.
fn niche_filter(raw: Option<&str>) -> Option<NicheKey> {
    let key = NicheKey::normalize(raw?);
    (!key.is_empty()).then_some(key)
}

fn respond_scores(
    scores: NicheScores,
    query: &MetricsQuery,
    state: &AppState,
    request_id: String,
) -> Json<ApiResponse<NicheScoreItem>> {
    let filter = niche_filter(query.niche.as_deref());
    let items = score_items(scores, filter.as_ref());
    let (page, total) = paginate(
        items,
        normalize_limit(query.limit),
        normalize_offset(query.offset),
    );
    let mut response = ApiResponse::new(page, state.loaded_at, request_id);
    response.total_count = total;
    Json(response)
}

pub async fn list_growth(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<MetricsQuery>,
) -> impl IntoResponse {
    respond_scores(growth_rate(&state.snapshot), &query, &state, req_id.0)
}

pub async fn list_sentiment(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<MetricsQuery>,
) -> impl IntoResponse {
    respond_scores(sentiment_score(&state.snapshot), &query, &state, req_id.0)
}

pub async fn list_engagement(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<MetricsQuery>,
) -> impl IntoResponse {
    respond_scores(engagement_score(&state.snapshot), &query, &state, req_id.0)
}

pub async fn list_hype(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<MetricsQuery>,
) -> impl IntoResponse {
    respond_scores(hype_score(&state.snapshot), &query, &state, req_id.0)
}

pub async fn list_trend(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<MetricsQuery>,
) -> Json<ApiResponse<CompositeRecord>> {
    let filter = niche_filter(query.niche.as_deref());
    let records: Vec<CompositeRecord> = composite_records(&state.snapshot)
        .into_iter()
        .filter(|record| filter.as_ref().is_none_or(|wanted| &record.niche == wanted))
        .collect();
    let (page, total) = paginate(
        records,
        normalize_limit(query.limit),
        normalize_offset(query.offset),
    );
    let mut response = ApiResponse::new(page, state.loaded_at, req_id.0);
    response.total_count = total;
    Json(response)
}
