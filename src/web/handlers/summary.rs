// POST /instagrammedia: summarize a batch of feed posts.
//
// The body is the Graph API media array. Up to the configured image cap are
// annotated, then aggregated into a Summary.
//
// 400: body is not a post array
// 502: any annotation in the batch failed (the whole batch is dropped)
// 422: the annotated batch could not be summarized (empty, or an image with no colors)

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::aggregate;
use crate::models::Post;
use crate::pipeline::batch;
use crate::web::{api_error, AppState};

pub async fn summarize_media(
    State(state): State<AppState>,
    body: Result<Json<Vec<Post>>, JsonRejection>,
) -> impl IntoResponse {
    let posts = match body {
        Ok(Json(posts)) => posts,
        Err(rejection) => {
            return api_error(StatusCode::BAD_REQUEST, &rejection.body_text());
        }
    };

    let images =
        match batch::fetch_batch(state.vision.as_ref(), &posts, state.config.image_cap).await {
            Ok(images) => images,
            Err(e) => {
                tracing::error!(error = format!("{e:#}"), "Batch analysis failed");
                return api_error(StatusCode::BAD_GATEWAY, "Image analysis unavailable");
            }
        };

    match aggregate::aggregate(&images) {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Rejected batch");
            api_error(StatusCode::UNPROCESSABLE_ENTITY, &e.to_string())
        }
    }
}
