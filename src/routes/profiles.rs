use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use validator::Validate;
use crate::models::{BrowseQuery, BrowseResponse, CreateProfileRequest, LikeResponse, ProfileCard, UpdateProfileRequest};
use crate::routes::{authenticate, error_response, forbidden, profile_error_response, validation_failed, AppState};

/// Configure profile routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/profiles", web::post().to(create_profile))
        .route("/profiles/browse", web::get().to(browse_profiles))
        .route("/profiles/{id}", web::get().to(get_profile))
        .route("/profiles/{id}", web::patch().to(update_profile))
        .route("/profiles/{id}", web::delete().to(delete_profile))
        .route("/profiles/{id}/like", web::post().to(like_profile))
        .route("/profiles/{id}/dislike", web::post().to(dislike_profile));
}

/// Create the caller's profile
///
/// POST /api/v1/profiles
async fn create_profile(
    state: web::Data<AppState>,
    req: web::Json<CreateProfileRequest>,
    http_req: HttpRequest,
) -> HttpResponse {
    let identity = match authenticate(&state, &http_req) {
        Ok(identity) => identity,
        Err(response) => return response,
    };

    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    match state.profiles.create_profile(&identity.user_id, req.into_inner()).await {
        Ok(profile) => HttpResponse::Created().json(profile),
        Err(e) => profile_error_response(e),
    }
}

/// Get a profile
///
/// GET /api/v1/profiles/{id}
///
/// Owners and admins receive the full document; everyone else gets the
/// public card.
async fn get_profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
    http_req: HttpRequest,
) -> HttpResponse {
    let identity = match authenticate(&state, &http_req) {
        Ok(identity) => identity,
        Err(response) => return response,
    };
    let user_id = path.into_inner();

    match state.profiles.get_profile(&user_id).await {
        Ok(profile) if identity.can_act_for(&user_id) => HttpResponse::Ok().json(profile),
        Ok(profile) if profile.is_active => HttpResponse::Ok().json(ProfileCard::from(profile)),
        Ok(_) => error_response(StatusCode::NOT_FOUND, "not_found", format!("Profile not found: {}", user_id)),
        Err(e) => profile_error_response(e),
    }
}

/// Partially update a profile
///
/// PATCH /api/v1/profiles/{id}
async fn update_profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<UpdateProfileRequest>,
    http_req: HttpRequest,
) -> HttpResponse {
    let identity = match authenticate(&state, &http_req) {
        Ok(identity) => identity,
        Err(response) => return response,
    };
    let user_id = path.into_inner();

    if !identity.can_act_for(&user_id) {
        return forbidden();
    }

    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }
    if req.is_empty() {
        return validation_failed("No fields to update");
    }

    match state.profiles.update_profile(&user_id, &req).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(e) => profile_error_response(e),
    }
}

/// Delete a profile
///
/// DELETE /api/v1/profiles/{id}
async fn delete_profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
    http_req: HttpRequest,
) -> HttpResponse {
    let identity = match authenticate(&state, &http_req) {
        Ok(identity) => identity,
        Err(response) => return response,
    };
    let user_id = path.into_inner();

    if !identity.can_act_for(&user_id) {
        return forbidden();
    }

    match state.profiles.delete_profile(&user_id).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => profile_error_response(e),
    }
}

/// Browse profiles the caller has not reacted to yet
///
/// GET /api/v1/profiles/browse?limit=20
async fn browse_profiles(
    state: web::Data<AppState>,
    query: web::Query<BrowseQuery>,
    http_req: HttpRequest,
) -> HttpResponse {
    let identity = match authenticate(&state, &http_req) {
        Ok(identity) => identity,
        Err(response) => return response,
    };

    let limit = query.limit.clamp(1, state.max_browse_limit.max(1)) as usize;

    match state.profiles.browse(&identity.user_id, limit).await {
        Ok(profiles) => {
            let profiles: Vec<ProfileCard> = profiles.into_iter().map(ProfileCard::from).collect();
            HttpResponse::Ok().json(BrowseResponse {
                total_results: profiles.len(),
                profiles,
            })
        }
        Err(e) => profile_error_response(e),
    }
}

/// Like a profile
///
/// POST /api/v1/profiles/{id}/like
async fn like_profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
    http_req: HttpRequest,
) -> HttpResponse {
    let identity = match authenticate(&state, &http_req) {
        Ok(identity) => identity,
        Err(response) => return response,
    };

    match state.profiles.like(&identity.user_id, &path).await {
        Ok(outcome) => HttpResponse::Ok().json(LikeResponse {
            success: true,
            mutual: outcome.mutual,
        }),
        Err(e) => profile_error_response(e),
    }
}

/// Dislike a profile
///
/// POST /api/v1/profiles/{id}/dislike
async fn dislike_profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
    http_req: HttpRequest,
) -> HttpResponse {
    let identity = match authenticate(&state, &http_req) {
        Ok(identity) => identity,
        Err(response) => return response,
    };

    match state.profiles.dislike(&identity.user_id, &path).await {
        Ok(()) => HttpResponse::Ok().json(LikeResponse {
            success: true,
            mutual: false,
        }),
        Err(e) => profile_error_response(e),
    }
}
