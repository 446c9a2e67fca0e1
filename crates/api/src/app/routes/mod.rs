use axum::{routing::get, Router};

pub mod assessments;
pub mod benchmarks;
pub mod reports;
pub mod stats;
pub mod system;
pub mod wizard;

/// Router for every endpoint except `/health`.
pub fn router() -> Router {
    Router::new()
        .route("/stats", get(stats::community_stats))
        .nest("/wizard", wizard::router().merge(reports::router()))
        .nest("/assessments", assessments::router())
        .nest("/benchmarks", benchmarks::router())
}
