use {
    super::{
        simulation::{Reply, SimulatedNetwork},
        wire::{NativeAmount, NativeTimestamp},
    },
    crate::domain::{
        context::RequestContext,
        error::{ParseError, PaymentError, ValidationError},
        payment::{PaymentRequest, PaymentResponse},
        provider::{Envelope, Invocation, InvokeFuture, PaymentProvider},
        validation::{self, Limits},
    },
    chrono::Utc,
    serde::Deserialize,
    uuid::Uuid,
};

pub const NAME: &str = "visa";
pub const DEFAULT_FAILURE_RATE: f64 = 0.15;

const SUPPORTED_CURRENCIES: [&str; 4] = ["USD", "EUR", "GBP", "JPY"];

/// Nested wire shape: amounts live under `value`, errors carry their code
/// under `details`.
pub struct VisaProvider {
    name: String,
    limits: Limits,
    network: SimulatedNetwork,
}

impl VisaProvider {
    pub fn new(network: SimulatedNetwork) -> Self {
        Self {
            name: NAME.to_string(),
            limits: Limits::default(),
            network,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    fn approved(request: &PaymentRequest) -> Envelope {
        let id = Uuid::now_v7().simple().to_string().to_uppercase();
        Envelope::Json(serde_json::json!({
            "payment_id": format!("PAY-{id}"),
            "state": "SUCCESS",
            "value": {
                "amount": request.amount.to_string(),
                "currency_code": request.currency,
            },
            "processed_at": Utc::now().timestamp(),
        }))
    }

    fn declined() -> Envelope {
        Envelope::Json(serde_json::json!({
            "error_type": "PAYMENT_FAILED",
            "reason": "Card declined",
            "details": { "code": "EE000011" },
        }))
    }
}

#[derive(Debug, Deserialize)]
struct VisaPayment {
    payment_id: String,
    state: String,
    value: VisaValue,
    processed_at: NativeTimestamp,
}

#[derive(Debug, Deserialize)]
struct VisaValue {
    amount: NativeAmount,
    currency_code: String,
}

#[derive(Debug, Deserialize)]
struct VisaError {
    error_type: String,
    reason: String,
    details: VisaErrorDetails,
}

#[derive(Debug, Deserialize)]
struct VisaErrorDetails {
    code: String,
}

impl PaymentProvider for VisaProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, request: &PaymentRequest) -> Result<(), ValidationError> {
        validation::check_baseline(request, &self.limits)?;

        let currency = request.currency.to_ascii_uppercase();
        if !SUPPORTED_CURRENCIES.contains(&currency.as_str()) {
            return Err(ValidationError::UnsupportedCurrency(currency));
        }

        let year = &request.expiry_year;
        if !validation::is_all_digits(year) || !matches!(year.len(), 2 | 4) {
            return Err(ValidationError::InvalidExpiryYear);
        }
        Ok(())
    }

    fn invoke<'a>(
        &'a self,
        ctx: &'a RequestContext,
        request: &'a PaymentRequest,
    ) -> InvokeFuture<'a> {
        Box::pin(async move {
            match self.network.round_trip(ctx).await {
                Ok(Reply::Approved) => Invocation::Success(Self::approved(request)),
                Ok(Reply::Declined) => Invocation::Failure(Self::declined()),
                Err(reason) => Invocation::Aborted(reason),
            }
        })
    }

    fn parse_success(&self, envelope: &Envelope) -> Result<PaymentResponse, ParseError> {
        let payment: VisaPayment = envelope.decode()?;
        let amount = payment.value.amount.to_decimal("value.amount")?;
        let processed_at = payment.processed_at.to_utc("processed_at")?;

        Ok(PaymentResponse::new(
            payment.payment_id,
            payment.state,
            amount,
            payment.value.currency_code,
            Some(processed_at),
        ))
    }

    fn parse_error(&self, envelope: &Envelope) -> Result<PaymentError, ParseError> {
        let err: VisaError = envelope.decode()?;
        Ok(PaymentError::provider(
            err.details.code,
            format!(
                "ErrorType:{} :: ErrorReason: {}",
                err.error_type, err.reason
            ),
        ))
    }
}
