use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use roicalc_core::{DomainError, SessionId};
use roicalc_estimator::ProductLine;
use roicalc_infra::StoreError;
use roicalc_reporting::ExportError;
use roicalc_wizard::WizardError;

use crate::app::services::SessionError;

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn session_error_to_response(err: SessionError) -> axum::response::Response {
    match err {
        SessionError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", err.to_string()),
        SessionError::Wizard(e) => wizard_error_to_response(e),
    }
}

pub fn wizard_error_to_response(err: WizardError) -> axum::response::Response {
    match err {
        WizardError::Blocked(msg) => json_error(StatusCode::CONFLICT, "blocked", msg),
        WizardError::AtFirstStep => {
            json_error(StatusCode::CONFLICT, "at_first_step", err.to_string())
        }
        WizardError::WrongStep { .. } => {
            json_error(StatusCode::CONFLICT, "wrong_step", err.to_string())
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
    }
}

pub fn export_error_to_response(err: ExportError) -> axum::response::Response {
    match err {
        ExportError::NotReady => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "not_ready", err.to_string())
        }
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    json_error(StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", err.to_string())
}

pub fn parse_session_id(raw: &str) -> Result<SessionId, axum::response::Response> {
    raw.parse().map_err(|_| {
        json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid wizard session id")
    })
}

pub fn parse_product_line(raw: &str) -> Result<ProductLine, axum::response::Response> {
    raw.parse().map_err(|_| {
        json_error(
            StatusCode::BAD_REQUEST,
            "invalid_product_line",
            "product line must be one of: m365, code-assist, low-code, crm, security",
        )
    })
}
