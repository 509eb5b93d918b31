use {
    super::context::RequestContext,
    super::error::{InvokeError, ParseError, PaymentError, ValidationError},
    super::payment::{PaymentRequest, PaymentResponse},
    serde::de::DeserializeOwned,
    std::{future::Future, pin::Pin},
};

/// Provider-native payload. Only the adapter that produced it decodes it.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Json(serde_json::Value),
    Raw(Vec<u8>),
}

impl Envelope {
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, ParseError> {
        match self {
            Self::Json(value) => Ok(T::deserialize(value)?),
            Self::Raw(bytes) => Ok(serde_json::from_slice(bytes)?),
        }
    }
}

/// Two-outcome result of the external call, plus the case where the call
/// never completed.
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    Success(Envelope),
    Failure(Envelope),
    Aborted(InvokeError),
}

pub type InvokeFuture<'a> = Pin<Box<dyn Future<Output = Invocation> + Send + 'a>>;

/// Capability contract implemented once per external provider.
pub trait PaymentProvider: Send + Sync {
    /// Registry key. Must be stable and non-empty.
    fn name(&self) -> &str;

    /// Pure, fail-fast check. Never laxer than `validation::check_baseline`.
    fn validate(&self, request: &PaymentRequest) -> Result<(), ValidationError>;

    /// The single external round trip. Must honour `ctx`.
    fn invoke<'a>(&'a self, ctx: &'a RequestContext, request: &'a PaymentRequest)
    -> InvokeFuture<'a>;

    fn parse_success(&self, envelope: &Envelope) -> Result<PaymentResponse, ParseError>;

    fn parse_error(&self, envelope: &Envelope) -> Result<PaymentError, ParseError>;
}
