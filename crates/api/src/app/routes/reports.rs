use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use tracing::warn;

use roicalc_core::SessionId;
use roicalc_reporting::{render_document, render_slides, Report};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/:id/report/document", get(document))
        .route("/:id/report/slides", get(slides))
        .route("/:id/history", get(history))
}

fn build_report(services: &AppServices, id: SessionId) -> Result<Report, axum::response::Response> {
    let state = services.session(id).map_err(errors::session_error_to_response)?;
    Report::from_wizard(&state, Utc::now().date_naive()).map_err(|e| {
        warn!(operation = "export", session_id = %id, error = %e, "report not available");
        errors::export_error_to_response(e)
    })
}

pub async fn document(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_session_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let report = match build_report(&services, id) {
        Ok(report) => report,
        Err(resp) => return resp,
    };

    let pages = render_document(&report);
    (StatusCode::OK, Json(dto::document_to_json(&report, &pages))).into_response()
}

pub async fn slides(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_session_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let report = match build_report(&services, id) {
        Ok(report) => report,
        Err(resp) => return resp,
    };

    let slides = render_slides(&report);
    (StatusCode::OK, Json(dto::slides_to_json(&report, &slides))).into_response()
}

/// Stored calculations for a session, newest first.
pub async fn history(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Query(query): Query<dto::HistoryQuery>,
) -> axum::response::Response {
    let id = match errors::parse_session_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let limit = query
        .limit
        .unwrap_or(dto::DEFAULT_HISTORY_LIMIT)
        .clamp(1, dto::MAX_HISTORY_LIMIT);

    match services.adapter().history(id, limit).await {
        Ok(records) => {
            let items = records.iter().map(dto::calculation_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}
