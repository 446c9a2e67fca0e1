use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;

use crate::app::services::AppServices;

pub async fn community_stats(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let stats = services.adapter().community_stats(Utc::now()).await;
    (StatusCode::OK, Json(stats)).into_response()
}
