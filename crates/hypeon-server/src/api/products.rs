use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;

use hypeon_core::{NicheKey, Platform};
use hypeon_metrics::{product_growth, MetricsError, ProductGrowthRecord};

use super::{normalize_limit, normalize_offset, paginate, ApiError, ApiResponse, AppState};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub struct ProductGrowthQuery {
    pub platform: Option<String>,
    pub niche: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

fn parse_platform(raw: Option<&str>) -> Result<Platform, String> {
    match raw.map(str::trim).map(str::to_ascii_lowercase).as_deref() {
        Some("shopify") => Ok(Platform::Shopify),
        Some("amazon") => Ok(Platform::Amazon),
        Some(other) => Err(format!(
            "unsupported platform '{other}'; expected shopify or amazon"
        )),
        None => Err("platform query parameter is required".to_string()),
    }
}

fn map_metrics_error(request_id: String, error: &MetricsError) -> ApiError {
    match error {
        MetricsError::MissingNicheFilter => {
            ApiError::new(request_id, "validation_error", error.to_string())
        }
        MetricsError::UnsupportedPlatform(_) => {
            ApiError::new(request_id, "bad_request", error.to_string())
        }
    }
}

pub async fn list_product_growth(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ProductGrowthQuery>,
) -> Result<Json<ApiResponse<ProductGrowthRecord>>, ApiError> {
    let platform = parse_platform(query.platform.as_deref())
        .map_err(|message| ApiError::new(req_id.0.clone(), "validation_error", message))?;
    let niche = NicheKey::normalize(query.niche.as_deref().unwrap_or_default());

    let records = product_growth(&state.snapshot, platform, &niche)
        .map_err(|e| map_metrics_error(req_id.0.clone(), &e))?;

    let (page, total) = paginate(
        records,
        normalize_limit(query.limit),
        normalize_offset(query.offset),
    );
    let mut response = ApiResponse::new(page, state.loaded_at, req_id.0);
    response.total_count = total;
    Ok(Json(response))
}
