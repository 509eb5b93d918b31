use {
    crate::domain::error::{ErrorCode, PaymentError},
    axum::{
        Json,
        http::StatusCode,
        response::{IntoResponse, Response},
    },
};

/// Newtype so the normalized error can be returned straight from a handler.
pub struct ApiError(pub PaymentError);

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        Self(err)
    }
}

pub fn status_for(code: &ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidProvider => StatusCode::NOT_FOUND,
        ErrorCode::InvalidRequest => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::Provider(_) => StatusCode::PAYMENT_REQUIRED,
        ErrorCode::ProcessingError | ErrorCode::ParsingError => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (status_for(self.0.code()), Json(self.0)).into_response()
    }
}
