use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use validator::Validate;
use crate::models::{CreateOrderRequest, OrderResponse, VerifyPaymentRequest, VerifyPaymentResponse};
use crate::routes::{authenticate, error_response, forbidden, profile_error_response, validation_failed, AppState};
use crate::services::PaymentError;

/// Configure payment routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/payments/plans", web::get().to(list_plans))
        .route("/payments/orders", web::post().to(create_order))
        .route("/payments/verify", web::post().to(verify_payment));
}

fn payment_error_response(e: PaymentError) -> HttpResponse {
    match &e {
        PaymentError::UnknownPlan(_) => error_response(StatusCode::BAD_REQUEST, "unknown_plan", &e),
        PaymentError::InvalidSignature => error_response(StatusCode::BAD_REQUEST, "invalid_signature", &e),
        PaymentError::OrderNotPaid(_) => error_response(StatusCode::BAD_REQUEST, "order_not_paid", &e),
        _ => {
            tracing::error!("Payment gateway failure: {}", e);
            error_response(StatusCode::BAD_GATEWAY, "payment_gateway_error", &e)
        }
    }
}

/// List subscription plans
///
/// GET /api/v1/payments/plans
async fn list_plans(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.payments.plans())
}

/// Open a payment order
///
/// POST /api/v1/payments/orders
///
/// Request body:
/// ```json
/// { "planId": "gold" }
/// ```
async fn create_order(
    state: web::Data<AppState>,
    req: web::Json<CreateOrderRequest>,
    http_req: HttpRequest,
) -> HttpResponse {
    let identity = match authenticate(&state, &http_req) {
        Ok(identity) => identity,
        Err(response) => return response,
    };

    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    match state.payments.create_order(&req.plan_id, &identity.user_id).await {
        Ok(order) => HttpResponse::Ok().json(OrderResponse {
            order_id: order.id,
            amount: order.amount,
            currency: order.currency,
            key_id: state.payments.key_id().to_string(),
        }),
        Err(e) => payment_error_response(e),
    }
}

/// Verify a checkout confirmation and activate the subscription
///
/// POST /api/v1/payments/verify
///
/// Request body:
/// ```json
/// {
///   "orderId": "order_...",
///   "paymentId": "pay_...",
///   "signature": "hex"
/// }
/// ```
async fn verify_payment(
    state: web::Data<AppState>,
    req: web::Json<VerifyPaymentRequest>,
    http_req: HttpRequest,
) -> HttpResponse {
    let identity = match authenticate(&state, &http_req) {
        Ok(identity) => identity,
        Err(response) => return response,
    };

    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    if !state.payments.verify_signature(&req.order_id, &req.payment_id, &req.signature) {
        tracing::warn!("Signature mismatch for order {} from user {}", req.order_id, identity.user_id);
        return payment_error_response(PaymentError::InvalidSignature);
    }

    let order = match state.payments.fetch_order(&req.order_id).await {
        Ok(order) => order,
        Err(e) => return payment_error_response(e),
    };

    if order.user_id() != Some(identity.user_id.as_str()) {
        tracing::warn!("User {} tried to redeem order {} of another user", identity.user_id, order.id);
        return forbidden();
    }

    if !order.is_paid() {
        tracing::warn!("Order {} redeemed while {:?}", order.id, order.status);
        return payment_error_response(PaymentError::OrderNotPaid(order.id));
    }

    let plan = match order.plan_id().map(|id| state.payments.plan(id)) {
        Some(Ok(plan)) => plan.clone(),
        Some(Err(e)) => return payment_error_response(e),
        None => {
            return payment_error_response(PaymentError::InvalidResponse(format!(
                "order {} carries no plan",
                order.id
            )))
        }
    };

    match state
        .profiles
        .activate_subscription(&identity.user_id, &plan, &req.payment_id)
        .await
    {
        Ok(subscription) => HttpResponse::Ok().json(VerifyPaymentResponse {
            success: true,
            subscription,
        }),
        Err(e) => profile_error_response(e),
    }
}
