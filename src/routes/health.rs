use actix_web::{web, HttpResponse};
use crate::models::{CacheHealth, HealthResponse};
use crate::routes::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let stats = state.cache.stats();

    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        cache: CacheHealth {
            l1_entries: stats.l1_size,
            redis_enabled: stats.redis_enabled,
        },
        change_subscribers: state.profiles.feed().subscriber_count(),
    })
}
