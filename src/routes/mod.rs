// Route exports
pub mod admin;
pub mod health;
pub mod payments;
pub mod profiles;
pub mod suggestions;

use crate::core::Matchmaker;
use crate::models::ErrorResponse;
use crate::services::{AuthError, CacheManager, Identity, IdentityVerifier, ProfileError, ProfileService, RazorpayClient};
use actix_web::{error, http::header, http::StatusCode, web, HttpRequest, HttpResponse};
use std::sync::Arc;

/// Application state shared across all handlers
///
/// Built once at startup; every external client lives here.
#[derive(Clone)]
pub struct AppState {
    pub matchmaker: Matchmaker,
    pub profiles: Arc<ProfileService>,
    pub payments: Arc<RazorpayClient>,
    pub identity: Arc<IdentityVerifier>,
    pub cache: Arc<CacheManager>,
    pub max_browse_limit: u16,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(health::configure)
            .configure(suggestions::configure)
            .configure(profiles::configure)
            .configure(payments::configure)
            .configure(admin::configure),
    );
}

/// Build a JSON error response
pub(crate) fn error_response(status: StatusCode, error: &str, message: impl ToString) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message: message.to_string(),
        status_code: status.as_u16(),
    })
}

/// Resolve the caller from the `Authorization` header
pub(crate) fn authenticate(state: &AppState, req: &HttpRequest) -> Result<Identity, HttpResponse> {
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    state.identity.authenticate(header).map_err(|e| {
        tracing::debug!("Rejected request to {}: {}", req.path(), e);
        auth_error_response(&e)
    })
}

pub(crate) fn auth_error_response(e: &AuthError) -> HttpResponse {
    match e {
        AuthError::Forbidden => error_response(StatusCode::FORBIDDEN, "forbidden", e),
        _ => error_response(StatusCode::UNAUTHORIZED, "unauthorized", e),
    }
}

pub(crate) fn forbidden() -> HttpResponse {
    error_response(StatusCode::FORBIDDEN, "forbidden", "Not allowed to act on this profile")
}

pub(crate) fn validation_failed(errors: impl ToString) -> HttpResponse {
    error_response(StatusCode::BAD_REQUEST, "Validation failed", errors)
}

pub(crate) fn profile_error_response(e: ProfileError) -> HttpResponse {
    match &e {
        ProfileError::NotFound(_) => error_response(StatusCode::NOT_FOUND, "not_found", &e),
        ProfileError::AlreadyExists(_) => error_response(StatusCode::CONFLICT, "already_exists", &e),
        ProfileError::InvalidTarget(_) => error_response(StatusCode::BAD_REQUEST, "invalid_target", &e),
        ProfileError::LikeLimitReached(_) => error_response(StatusCode::PAYMENT_REQUIRED, "like_limit_reached", &e),
        ProfileError::Store(_) => {
            tracing::error!("Document store failure: {}", e);
            error_response(StatusCode::BAD_GATEWAY, "store_unavailable", &e)
        }
    }
}

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}
