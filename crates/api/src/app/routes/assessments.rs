use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};

use roicalc_estimator::{assess, insights, suggest, AssessmentResponses};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/:line", post(submit_assessment))
}

/// How many same-role responses are returned alongside an estimate.
const PEER_LIMIT: usize = 10;

/// Personal estimate for one product line, with suggested answers for the
/// visitor's profile and recent responses from the same role.
///
/// The benchmark and peers shown are read before this response is stored; the
/// write happens after the reply, detached.
pub async fn submit_assessment(
    Extension(services): Extension<Arc<AppServices>>,
    Path(line): Path<String>,
    Query(query): Query<dto::AssessmentQuery>,
    Json(body): Json<AssessmentResponses>,
) -> axum::response::Response {
    let line = match errors::parse_product_line(&line) {
        Ok(line) => line,
        Err(resp) => return resp,
    };
    let session_id = match query.session_id.as_deref() {
        Some(raw) => match errors::parse_session_id(raw) {
            Ok(id) => Some(id),
            Err(resp) => return resp,
        },
        None => None,
    };
    if let Err(e) = body.validate() {
        return errors::domain_error_to_response(e);
    }

    let estimate = assess(line, &body);
    let benchmark = services.adapter().fetch_benchmark(&body.job_title, line).await;
    let notes = insights(&body, &estimate, benchmark.as_ref().map(|b| b.avg_hours_saved_weekly));
    let suggestions = suggest(line, &body);
    let peers = services
        .adapter()
        .similar_responses(&body.job_title, line, PEER_LIMIT)
        .await;

    let adapter = services.adapter().clone();
    let recorded = estimate.clone();
    tokio::spawn(async move {
        adapter.record_assessment(session_id, line, &body, &recorded).await;
    });

    (
        StatusCode::OK,
        Json(dto::assessment_to_json(
            &estimate,
            &notes,
            benchmark.as_ref(),
            &suggestions,
            &peers,
        )),
    )
        .into_response()
}
