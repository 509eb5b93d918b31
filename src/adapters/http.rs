use {
    crate::{
        AppState,
        adapters::api_errors::ApiError,
        domain::{
            error::{ErrorCode, PaymentError},
            payment::{PaymentRequest, PaymentResponse},
        },
    },
    axum::{
        Json, Router,
        extract::{State, rejection::JsonRejection},
        http::StatusCode,
        middleware,
        response::{IntoResponse, Response},
        routing::{get, post},
    },
    std::time::Duration,
    tower::ServiceBuilder,
    tower_http::timeout::TimeoutLayer,
};

pub fn router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/", get(|| async { "ok" }))
        .route("/providers", get(list_providers))
        .route("/payments", post(create_payment))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::map_response(normalize_timeout))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::GATEWAY_TIMEOUT,
                    request_timeout,
                )),
        )
        .with_state(state)
}

/// The timeout layer answers with an empty 504; give it the normalized body.
/// Handlers never produce 504 themselves.
async fn normalize_timeout(response: Response) -> Response {
    if response.status() != StatusCode::GATEWAY_TIMEOUT {
        return response;
    }
    tracing::warn!(stage = "http", "request timed out before the processor answered");
    let err = PaymentError::new(
        ErrorCode::ProcessingError,
        "request timed out before the provider responded",
    );
    (StatusCode::GATEWAY_TIMEOUT, Json(err)).into_response()
}

pub async fn list_providers(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "providers": state.processor.registry().names() }))
}

/// Malformed bodies come back in the same normalized shape as validation
/// failures.
pub async fn create_payment(
    State(state): State<AppState>,
    body: Result<Json<PaymentRequest>, JsonRejection>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let Json(request) = body.map_err(|rejection| {
        tracing::info!(error = %rejection.body_text(), "unreadable payment request");
        PaymentError::new(ErrorCode::InvalidRequest, rejection.body_text())
    })?;

    let response = state.processor.process_payment(request).await?;
    Ok(Json(response))
}
