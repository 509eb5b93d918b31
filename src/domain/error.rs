use {
    derive_more::Display,
    serde::{Serialize, Serializer},
    thiserror::Error,
};

/// Upper bound on operator-facing detail carried in `error_message`.
pub const MAX_ERROR_DETAIL: usize = 256;

/// Closed set of normalized error codes. `Provider` carries the code an
/// adapter translated from the provider's own business error.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ErrorCode {
    #[display("INVALID_PROVIDER")]
    InvalidProvider,
    #[display("INVALID_REQUEST")]
    InvalidRequest,
    #[display("PROCESSING_ERROR")]
    ProcessingError,
    #[display("PARSING_ERROR")]
    ParsingError,
    #[display("{_0}")]
    Provider(String),
}

impl ErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            Self::InvalidProvider => "INVALID_PROVIDER",
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::ProcessingError => "PROCESSING_ERROR",
            Self::ParsingError => "PARSING_ERROR",
            Self::Provider(code) => code,
        }
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Normalized error returned to the caller for every non-success outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{error_code}: {error_message}")]
pub struct PaymentError {
    success: bool,
    error_code: ErrorCode,
    error_message: String,
}

impl PaymentError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_code: code,
            error_message: message.into(),
        }
    }

    /// Business error reported by a provider, already translated by its adapter.
    pub fn provider(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Provider(code.into()), message)
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn code(&self) -> &ErrorCode {
        &self.error_code
    }

    pub fn message(&self) -> &str {
        &self.error_message
    }
}

/// First baseline or adapter-specific rule a request violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("amount must be greater than 0")]
    NonPositiveAmount,
    #[error("amount exceeds maximum limit of {0}")]
    AmountAboveLimit(String),
    #[error("currency is required")]
    MissingCurrency,
    #[error("currency must be a 3-letter ISO 4217 code")]
    MalformedCurrency,
    #[error("currency {0} is not supported by this provider")]
    UnsupportedCurrency(String),
    #[error("card number is required")]
    MissingCardNumber,
    #[error("card number must be between 13 and 19 digits")]
    CardNumberLength,
    #[error("card number must contain only digits")]
    CardNumberNotNumeric,
    #[error("expiry month and year are required")]
    MissingExpiry,
    #[error("expiry month must be between 1 and 12")]
    InvalidExpiryMonth,
    #[error("expiry year must be 2 or 4 digits")]
    InvalidExpiryYear,
    #[error("CVV is required")]
    MissingCvv,
    #[error("CVV must be 3 or 4 digits")]
    CvvLength,
}

/// Failure to decode a provider envelope into the normalized schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("field `{field}`: expected {expected}")]
    WrongShape {
        field: &'static str,
        expected: &'static str,
    },
    #[error("field `{field}`: invalid amount {value:?}")]
    InvalidAmount { field: &'static str, value: String },
    #[error("field `{field}`: invalid timestamp {value:?}")]
    InvalidTimestamp { field: &'static str, value: String },
    #[error("undecodable envelope: {0}")]
    Undecodable(String),
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        Self::Undecodable(truncate(&err.to_string(), MAX_ERROR_DETAIL))
    }
}

/// Reasons an external call did not complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvokeError {
    #[error("request cancelled")]
    Cancelled,
    #[error("deadline exceeded")]
    DeadlineExceeded,
    #[error("transport: {0}")]
    Transport(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("provider name must not be empty")]
    EmptyName,
    #[error("provider '{0}' registered more than once")]
    DuplicateProvider(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key}: {reason}")]
    Invalid { key: &'static str, reason: String },
    #[error("unknown provider in ENABLED_PROVIDERS: {0}")]
    UnknownProvider(String),
}

const CUT_MARKER: &str = "…";

/// Cut `s` on a char boundary so the result, marker included, is at most
/// `max` bytes.
pub fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max.saturating_sub(CUT_MARKER.len());
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{CUT_MARKER}", &s[..end])
}
