use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use tracing::info;

use roicalc_core::SessionId;
use roicalc_estimator::ProductLineInput;
use roicalc_wizard::{CompanyProfile, Transition, WizardState};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(start_wizard))
        .route("/:id", get(get_wizard))
        .route("/:id/selection", put(set_selection))
        .route("/:id/company", put(submit_company))
        .route("/:id/inputs/:line", put(submit_input))
        .route("/:id/next", post(next_step))
        .route("/:id/back", post(previous_step))
        .route("/:id/restart", post(restart_wizard))
}

pub async fn start_wizard(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::StartQuery>,
) -> axum::response::Response {
    let preselect = match query.preselect.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => match errors::parse_product_line(raw) {
            Ok(line) => Some(line),
            Err(resp) => return resp,
        },
        None => None,
    };

    let (id, state) = services.create_session(preselect);
    (StatusCode::CREATED, Json(dto::wizard_to_json(id, &state))).into_response()
}

pub async fn get_wizard(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_session_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.session(id) {
        Ok(state) => (StatusCode::OK, Json(dto::wizard_to_json(id, &state))).into_response(),
        Err(e) => errors::session_error_to_response(e),
    }
}

pub async fn set_selection(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::SelectionRequest>,
) -> axum::response::Response {
    let id = match errors::parse_session_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    snapshot(id, services.update(id, |w| w.set_selection(&body.products)))
}

pub async fn submit_company(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<CompanyProfile>,
) -> axum::response::Response {
    let id = match errors::parse_session_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    snapshot(id, services.update(id, |w| w.submit_company(body)))
}

pub async fn submit_input(
    Extension(services): Extension<Arc<AppServices>>,
    Path((id, line)): Path<(String, String)>,
    Json(body): Json<serde_json::Value>,
) -> axum::response::Response {
    let id = match errors::parse_session_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let line = match errors::parse_product_line(&line) {
        Ok(line) => line,
        Err(resp) => return resp,
    };
    let input = match ProductLineInput::from_json(line, body) {
        Ok(input) => input,
        Err(e) => return errors::domain_error_to_response(e),
    };

    snapshot(id, services.update(id, |w| w.submit_input(input)))
}

pub async fn next_step(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_session_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let (transition, state) = match services.update(id, |w| w.next()) {
        Ok(updated) => updated,
        Err(e) => return errors::session_error_to_response(e),
    };

    if let Transition::Completed(total) = &transition {
        info!(
            session_id = %id,
            time_saved_hours = total.time_saved_hours,
            cost_saved = total.cost_saved,
            badge = %total.badge,
            "wizard completed"
        );
        submit_in_background(&services, id, state.clone());
    }

    (StatusCode::OK, Json(dto::transition_to_json(id, &transition, &state))).into_response()
}

pub async fn previous_step(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_session_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    snapshot(id, services.update(id, |w| w.back()))
}

pub async fn restart_wizard(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_session_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    snapshot(
        id,
        services.update(id, |w| {
            w.restart();
            Ok(())
        }),
    )
}

fn snapshot<T>(
    id: SessionId,
    updated: Result<(T, WizardState), crate::app::services::SessionError>,
) -> axum::response::Response {
    match updated {
        Ok((_, state)) => (StatusCode::OK, Json(dto::wizard_to_json(id, &state))).into_response(),
        Err(e) => errors::session_error_to_response(e),
    }
}

/// The visitor already has their numbers; persistence runs detached and only logs.
fn submit_in_background(services: &Arc<AppServices>, id: SessionId, state: WizardState) {
    let adapter = services.adapter().clone();
    tokio::spawn(async move {
        adapter.submit_wizard(id, &state).await;
    });
}
