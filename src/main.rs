use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use vivah_match::config::{LoggingSettings, Settings};
use vivah_match::core::Matchmaker;
use vivah_match::routes::{self, handle_json_payload_error, handle_query_payload_error, AppState};
use vivah_match::services::{
    AppwriteClient, AppwriteCollections, CacheManager, ChangeFeed, GeminiClient, IdentityVerifier,
    ProfileService, RazorpayClient,
};

fn init_logging(logging: &LoggingSettings) {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| logging.format.clone());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .with_target(false)
        .with_level(true);

    match log_format.as_str() {
        "pretty" => subscriber.pretty().init(),
        "json" => subscriber.json().init(),
        _ => subscriber.init(),
    }
}

async fn build_cache(settings: &Settings) -> Arc<CacheManager> {
    let ttl = settings.cache.ttl_secs.unwrap_or(300);
    let l1_size = settings.cache.l1_cache_size.unwrap_or(1000);

    let Some(redis_url) = settings.cache.redis_url.as_deref() else {
        info!("Cache manager initialized without Redis (L1: {} entries, TTL: {}s)", l1_size, ttl);
        return Arc::new(CacheManager::in_memory(l1_size, ttl));
    };

    match CacheManager::new(redis_url, l1_size, ttl).await {
        Ok(cache) => {
            info!("Cache manager initialized (L1: {} entries, TTL: {}s, Redis enabled)", l1_size, ttl);
            Arc::new(cache)
        }
        Err(e) => {
            warn!("Failed to connect to Redis ({}), falling back to in-process cache", e);
            Arc::new(CacheManager::in_memory(l1_size, ttl))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    init_logging(&settings.logging);
    info!("Starting Vivah Match service...");

    let appwrite = Arc::new(AppwriteClient::new(
        settings.appwrite.endpoint.clone(),
        settings.appwrite.api_key.clone(),
        settings.appwrite.project_id.clone(),
        settings.appwrite.database_id.clone(),
        AppwriteCollections {
            profiles: settings.collection.profiles.clone(),
        },
    ));

    info!("Appwrite client initialized");

    let cache = build_cache(&settings).await;

    let profiles = Arc::new(ProfileService::new(
        appwrite,
        cache.clone(),
        ChangeFeed::new(256),
        settings.matchmaking.free_like_limit,
        settings.matchmaking.admin_page_size,
    ));

    // Audit trail of profile changes
    let mut changes = profiles.feed().subscribe();
    tokio::spawn(async move {
        while let Some(change) = changes.recv().await {
            info!("Profile {} {:?}", change.user_id, change.kind);
        }
    });

    let gemini = Arc::new(GeminiClient::new(
        settings.gemini.endpoint.clone(),
        settings.gemini.api_key.clone(),
        settings.gemini.model.clone(),
        settings.gemini.temperature,
        settings.gemini.timeout_secs,
    ));
    let matchmaker = Matchmaker::new(gemini, settings.matchmaking.default_criteria.clone());

    info!("Matchmaker initialized with model {}", settings.gemini.model);

    if settings.payment.plans.is_empty() {
        error!("No subscription plans configured; payments will reject every order");
    }

    let payments = Arc::new(RazorpayClient::new(
        settings.payment.endpoint.clone(),
        settings.payment.key_id.clone(),
        settings.payment.key_secret.clone(),
        settings.payment.currency.clone(),
        settings.payment.plans.clone(),
    ));

    let identity = match IdentityVerifier::new(&settings.auth.jwt_secret, settings.auth.admin_emails.clone()) {
        Ok(verifier) => Arc::new(verifier),
        Err(e) => {
            error!("Cannot verify session tokens: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    let app_state = AppState {
        matchmaker,
        profiles,
        payments,
        identity,
        cache,
        max_browse_limit: settings.matchmaking.max_browse_limit,
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
