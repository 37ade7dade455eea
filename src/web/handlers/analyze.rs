// GET /analyzeimage?media_url=...: annotate a single image.
//
// Returns the annotation record exactly as the pipeline sees it, which is
// handy for checking what the aggregator will be fed.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::web::{api_error, AppState};

#[derive(Debug, Deserialize)]
pub struct AnalyzeParams {
    pub media_url: Option<String>,
}

pub async fn analyze_image(
    State(state): State<AppState>,
    Query(params): Query<AnalyzeParams>,
) -> impl IntoResponse {
    let Some(url) = params.media_url.filter(|u| !u.trim().is_empty()) else {
        return api_error(StatusCode::BAD_REQUEST, "media_url query parameter is required");
    };

    match state.vision.analyze_image(&url).await {
        Ok(annotation) => Json(annotation).into_response(),
        Err(e) => {
            tracing::error!(error = format!("{e:#}"), url = url, "Image analysis failed");
            api_error(StatusCode::BAD_GATEWAY, "Image analysis unavailable")
        }
    }
}
