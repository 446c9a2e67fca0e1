use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/:line", get(get_benchmark))
}

pub async fn get_benchmark(
    Extension(services): Extension<Arc<AppServices>>,
    Path(line): Path<String>,
    Query(query): Query<dto::BenchmarkQuery>,
) -> axum::response::Response {
    let line = match errors::parse_product_line(&line) {
        Ok(line) => line,
        Err(resp) => return resp,
    };
    let Some(job_title) = query.job_title.filter(|t| !t.trim().is_empty()) else {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "job_title is required",
        );
    };

    match services.adapter().try_fetch_benchmark(&job_title, line).await {
        Ok(Some(benchmark)) => (StatusCode::OK, Json(benchmark)).into_response(),
        Ok(None) => errors::json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("no benchmark yet for {job_title} / {line}"),
        ),
        Err(e) => errors::store_error_to_response(e),
    }
}
