use actix_web::{web, HttpRequest, HttpResponse};
use crate::models::{AdminFilter, AdminProfilesResponse};
use crate::routes::{auth_error_response, authenticate, profile_error_response, AppState};

/// Configure admin routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/admin/profiles", web::get().to(list_profiles))
        .route("/admin/profiles/{id}/deactivate", web::post().to(deactivate_profile));
}

fn require_admin(state: &AppState, http_req: &HttpRequest) -> Result<(), HttpResponse> {
    let identity = authenticate(state, http_req)?;
    identity.require_admin().map_err(|e| {
        tracing::warn!("Non-admin {} attempted {}", identity.user_id, http_req.path());
        auth_error_response(&e)
    })
}

/// Filtered profile listing
///
/// GET /api/v1/admin/profiles?gender=female&subscribed=true&active=true&search=pune
async fn list_profiles(
    state: web::Data<AppState>,
    query: web::Query<AdminFilter>,
    http_req: HttpRequest,
) -> HttpResponse {
    if let Err(response) = require_admin(&state, &http_req) {
        return response;
    }

    match state.profiles.list_profiles(&query).await {
        Ok(profiles) => HttpResponse::Ok().json(AdminProfilesResponse {
            total_results: profiles.len(),
            profiles,
        }),
        Err(e) => profile_error_response(e),
    }
}

/// Hide a profile from browsing
///
/// POST /api/v1/admin/profiles/{id}/deactivate
async fn deactivate_profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
    http_req: HttpRequest,
) -> HttpResponse {
    if let Err(response) = require_admin(&state, &http_req) {
        return response;
    }

    match state.profiles.set_active(&path, false).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(e) => profile_error_response(e),
    }
}
