use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use validator::Validate;
use crate::core::BackendError;
use crate::models::{ParsedSuggestionsResponse, SuggestMatchesRequest};
use crate::routes::{authenticate, error_response, profile_error_response, validation_failed, AppState};

/// Configure suggestion routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/suggestions", web::post().to(find_suggestions))
        .route("/suggestions/parsed", web::post().to(suggest_matches))
        .route("/suggestions/for-me", web::post().to(suggest_for_me));
}

/// Backend failures all surface as one generic state
fn could_not_find_matches(e: &BackendError) -> HttpResponse {
    tracing::warn!("Suggestion backend failed: {}", e);
    error_response(StatusCode::BAD_GATEWAY, "could_not_find_matches", e)
}

/// Raw suggestions endpoint
///
/// POST /api/v1/suggestions
///
/// Request body:
/// ```json
/// {
///   "profileDetails": "string",
///   "matchingCriteria": "string"
/// }
/// ```
///
/// Responds with `{ "suggestedMatches": "string" }`.
async fn find_suggestions(
    state: web::Data<AppState>,
    req: web::Json<SuggestMatchesRequest>,
    http_req: HttpRequest,
) -> HttpResponse {
    let identity = match authenticate(&state, &http_req) {
        Ok(identity) => identity,
        Err(response) => return response,
    };

    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    tracing::info!("Finding suggestions for user {}", identity.user_id);

    match state.matchmaker.find_suggestions(req.into_inner().into()).await {
        Ok(suggestions) => HttpResponse::Ok().json(suggestions),
        Err(e) => could_not_find_matches(&e),
    }
}

/// Parsed suggestions endpoint
///
/// POST /api/v1/suggestions/parsed
///
/// Same body as `/suggestions`; responds with one record per suggestion line.
async fn suggest_matches(
    state: web::Data<AppState>,
    req: web::Json<SuggestMatchesRequest>,
    http_req: HttpRequest,
) -> HttpResponse {
    if let Err(response) = authenticate(&state, &http_req) {
        return response;
    }

    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    match state.matchmaker.suggest_matches(req.into_inner().into()).await {
        Ok(matches) => HttpResponse::Ok().json(ParsedSuggestionsResponse {
            total_results: matches.len(),
            matches,
        }),
        Err(e) => could_not_find_matches(&e),
    }
}

/// Suggestions for the caller's own stored profile
///
/// POST /api/v1/suggestions/for-me
async fn suggest_for_me(state: web::Data<AppState>, http_req: HttpRequest) -> HttpResponse {
    let identity = match authenticate(&state, &http_req) {
        Ok(identity) => identity,
        Err(response) => return response,
    };

    let profile = match state.profiles.get_profile(&identity.user_id).await {
        Ok(profile) => profile,
        Err(e) => return profile_error_response(e),
    };

    match state.matchmaker.suggest_for_profile(&profile).await {
        Ok(matches) => {
            tracing::info!("Suggested {} matches for user {}", matches.len(), identity.user_id);
            HttpResponse::Ok().json(ParsedSuggestionsResponse {
                total_results: matches.len(),
                matches,
            })
        }
        Err(e) => could_not_find_matches(&e),
    }
}
