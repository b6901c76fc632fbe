// HTTP tests for the /api/v1 routes

use actix_web::{http::StatusCode, test, web, App};
use async_trait::async_trait;
use jsonwebtoken::{encode, EncodingKey, Header};
use mockito::Matcher;
use serde_json::{json, Value};
use std::sync::Arc;
use vivah_match::core::{BackendError, Matchmaker, SuggestionBackend};
use vivah_match::models::{ErrorResponse, MatchRequest, MatchSuggestions, ParsedSuggestionsResponse, Plan};
use vivah_match::routes::{configure_routes, handle_json_payload_error, AppState};
use vivah_match::services::payment::sign;
use vivah_match::services::{
    AppwriteClient, AppwriteCollections, CacheManager, ChangeFeed, Claims, IdentityVerifier, ProfileService,
    RazorpayClient,
};

const JWT_SECRET: &str = "api-test-secret";
const RAZORPAY_SECRET: &str = "rzp_test_secret";

struct FixedBackend(Result<&'static str, BackendError>);

#[async_trait]
impl SuggestionBackend for FixedBackend {
    async fn suggest(&self, _request: &MatchRequest) -> Result<MatchSuggestions, BackendError> {
        self.0.clone().map(|text| MatchSuggestions {
            suggested_matches: text.to_string(),
        })
    }
}

fn token(user_id: &str, role: Option<&str>) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        email: Some(format!("{}@example.com", user_id)),
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
        role: role.map(str::to_string),
    };
    let jwt = encode(&Header::default(), &claims, &EncodingKey::from_secret(JWT_SECRET.as_bytes())).unwrap();
    format!("Bearer {}", jwt)
}

fn app_state(backend: FixedBackend, store_url: &str, gateway_url: &str) -> AppState {
    let appwrite = Arc::new(AppwriteClient::new(
        store_url.to_string(),
        "key".to_string(),
        "project".to_string(),
        "vivah".to_string(),
        AppwriteCollections {
            profiles: "profiles".to_string(),
        },
    ));
    let cache = Arc::new(CacheManager::in_memory(100, 60));

    AppState {
        matchmaker: Matchmaker::with_default_criteria(Arc::new(backend)),
        profiles: Arc::new(ProfileService::new(appwrite, cache.clone(), ChangeFeed::new(16), 10, 50)),
        payments: Arc::new(RazorpayClient::new(
            gateway_url.to_string(),
            "rzp_test_key".to_string(),
            RAZORPAY_SECRET.to_string(),
            "INR".to_string(),
            vec![Plan {
                id: "gold".to_string(),
                name: "Gold".to_string(),
                amount: 119900,
                duration_days: 90,
            }],
        )),
        identity: Arc::new(IdentityVerifier::new(JWT_SECRET, vec!["ops@example.com".to_string()]).unwrap()),
        cache,
        max_browse_limit: 50,
    }
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
                .configure(configure_routes),
        )
        .await
    };
}

const OFFLINE: &str = "http://127.0.0.1:9";

#[actix_web::test]
async fn test_health() {
    let app = init_app!(app_state(FixedBackend(Ok("")), OFFLINE, OFFLINE));

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["cache"]["redis_enabled"], false);
    assert_eq!(body["change_subscribers"], 0);
}

#[actix_web::test]
async fn test_suggestions_require_token() {
    let app = init_app!(app_state(FixedBackend(Ok("")), OFFLINE, OFFLINE));

    let req = test::TestRequest::post()
        .uri("/api/v1/suggestions/parsed")
        .set_json(json!({ "profileDetails": "x", "matchingCriteria": "y" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_parsed_suggestions() {
    let app = init_app!(app_state(
        FixedBackend(Ok("Riya Kapoor (91/100) Shared love of travel.\n\nSam Verma (76/100) Similar career goals.")),
        OFFLINE,
        OFFLINE
    ));

    let req = test::TestRequest::post()
        .uri("/api/v1/suggestions/parsed")
        .insert_header(("Authorization", token("u1", None)))
        .set_json(json!({ "profileDetails": "28, engineer, Pune" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: ParsedSuggestionsResponse = test::read_body_json(resp).await;
    assert_eq!(body.total_results, 2);
    assert_eq!(body.matches[0].name, "Riya Kapoor");
    assert_eq!(body.matches[1].compatibility_score, 76);
}

#[actix_web::test]
async fn test_raw_suggestions_pass_through() {
    let app = init_app!(app_state(FixedBackend(Ok("Anjali Rao (87/100) Great hobbies match.")), OFFLINE, OFFLINE));

    let req = test::TestRequest::post()
        .uri("/api/v1/suggestions")
        .insert_header(("Authorization", token("u1", None)))
        .set_json(json!({ "profileDetails": "x", "matchingCriteria": "y" }))
        .to_request();
    let body: MatchSuggestions = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.suggested_matches, "Anjali Rao (87/100) Great hobbies match.");
}

#[actix_web::test]
async fn test_backend_failure_maps_to_could_not_find_matches() {
    let app = init_app!(app_state(
        FixedBackend(Err(BackendError::QuotaExceeded("daily limit".into()))),
        OFFLINE,
        OFFLINE
    ));

    let req = test::TestRequest::post()
        .uri("/api/v1/suggestions/parsed")
        .insert_header(("Authorization", token("u1", None)))
        .set_json(json!({ "profileDetails": "x", "matchingCriteria": "y" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "could_not_find_matches");
}

#[actix_web::test]
async fn test_blank_profile_details_rejected() {
    let app = init_app!(app_state(FixedBackend(Ok("")), OFFLINE, OFFLINE));

    let req = test::TestRequest::post()
        .uri("/api/v1/suggestions")
        .insert_header(("Authorization", token("u1", None)))
        .set_json(json!({ "profileDetails": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_admin_routes_need_admin() {
    let app = init_app!(app_state(FixedBackend(Ok("")), OFFLINE, OFFLINE));

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/profiles")
        .insert_header(("Authorization", token("u1", None)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_admin_listing() {
    let mut store = mockito::Server::new_async().await;
    let _list = store
        .mock("GET", "/databases/vivah/collections/profiles/documents")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({
                "total": 1,
                "documents": [{
                    "userId": "a", "name": "Asha", "email": "asha@example.com",
                    "gender": "female", "age": 26
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let app = init_app!(app_state(FixedBackend(Ok("")), &store.url(), OFFLINE));

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/profiles?gender=female")
        .insert_header(("Authorization", token("staff", Some("admin"))))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["total_results"], 1);
    assert_eq!(body["profiles"][0]["userId"], "a");
}

#[actix_web::test]
async fn test_payment_with_bad_signature() {
    let app = init_app!(app_state(FixedBackend(Ok("")), OFFLINE, OFFLINE));

    let req = test::TestRequest::post()
        .uri("/api/v1/payments/verify")
        .insert_header(("Authorization", token("u1", None)))
        .set_json(json!({ "orderId": "order_1", "paymentId": "pay_1", "signature": "deadbeef" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "invalid_signature");
}

fn paid_order(order_id: &str, user_id: &str, status: &str) -> String {
    json!({
        "id": order_id, "amount": 119900, "currency": "INR", "status": status,
        "notes": { "plan_id": "gold", "user_id": user_id }
    })
    .to_string()
}

fn confirmation(order_id: &str, payment_id: &str) -> serde_json::Value {
    json!({
        "orderId": order_id,
        "paymentId": payment_id,
        "signature": sign(RAZORPAY_SECRET, &format!("{}|{}", order_id, payment_id))
    })
}

#[actix_web::test]
async fn test_verified_payment_activates_subscription_once() {
    let mut gateway = mockito::Server::new_async().await;
    let _order = gateway
        .mock("GET", "/orders/order_1")
        .with_status(200)
        .with_body(paid_order("order_1", "u1", "paid"))
        .create_async()
        .await;

    let mut store = mockito::Server::new_async().await;
    let lookup = store
        .mock("GET", "/databases/vivah/collections/profiles/documents/u1")
        .with_status(200)
        .with_body(
            json!({ "userId": "u1", "name": "U", "email": "u1@example.com", "gender": "male", "age": 30 })
                .to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    let activate = store
        .mock("PATCH", "/databases/vivah/collections/profiles/documents/u1")
        .match_body(Matcher::PartialJson(json!({
            "data": { "subscription": { "plan": "gold", "status": "active", "paymentId": "pay_1" } }
        })))
        .with_status(200)
        .with_body(
            json!({
                "userId": "u1", "name": "U", "email": "u1@example.com", "gender": "male", "age": 30,
                "subscription": {
                    "plan": "gold", "status": "active", "paymentId": "pay_1",
                    "activatedAt": "2026-01-01T00:00:00Z", "expiresAt": "2026-04-01T00:00:00Z"
                }
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let app = init_app!(app_state(FixedBackend(Ok("")), &store.url(), &gateway.url()));

    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/api/v1/payments/verify")
            .insert_header(("Authorization", token("u1", None)))
            .set_json(confirmation("order_1", "pay_1"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    lookup.assert_async().await;
    activate.assert_async().await;
}

#[actix_web::test]
async fn test_unpaid_order_is_refused() {
    let mut gateway = mockito::Server::new_async().await;
    let _order = gateway
        .mock("GET", "/orders/order_3")
        .with_status(200)
        .with_body(paid_order("order_3", "u1", "created"))
        .create_async()
        .await;

    let mut store = mockito::Server::new_async().await;
    let activate = store
        .mock("PATCH", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let app = init_app!(app_state(FixedBackend(Ok("")), &store.url(), &gateway.url()));

    let req = test::TestRequest::post()
        .uri("/api/v1/payments/verify")
        .insert_header(("Authorization", token("u1", None)))
        .set_json(confirmation("order_3", "pay_3"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "order_not_paid");
    activate.assert_async().await;
}

#[actix_web::test]
async fn test_order_of_another_user_is_refused() {
    let mut gateway = mockito::Server::new_async().await;
    let _order = gateway
        .mock("GET", "/orders/order_2")
        .with_status(200)
        .with_body(paid_order("order_2", "someone-else", "paid"))
        .create_async()
        .await;

    let app = init_app!(app_state(FixedBackend(Ok("")), OFFLINE, &gateway.url()));

    let req = test::TestRequest::post()
        .uri("/api/v1/payments/verify")
        .insert_header(("Authorization", token("u1", None)))
        .set_json(confirmation("order_2", "pay_2"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
