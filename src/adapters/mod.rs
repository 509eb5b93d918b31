pub mod api_errors;
pub mod http;
pub mod mastercard;
pub mod simulation;
pub mod visa;
pub mod wire;
