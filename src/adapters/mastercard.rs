use {
    super::{
        simulation::{Reply, SimulatedNetwork},
        wire::{NativeAmount, NativeTimestamp, field_as, required, required_str, to_object},
    },
    crate::domain::{
        context::RequestContext,
        error::{ParseError, PaymentError, ValidationError},
        payment::{PaymentRequest, PaymentResponse},
        provider::{Envelope, Invocation, InvokeFuture, PaymentProvider},
        validation::{self, Limits},
    },
    chrono::{SecondsFormat, Utc},
    serde::Deserialize,
    uuid::Uuid,
};

pub const NAME: &str = "mastercard";
pub const DEFAULT_FAILURE_RATE: f64 = 0.10;

/// Flat wire shape: `{transaction_id, status, amount, currency, timestamp}`
/// on success, `{error_code, message}` on failure.
pub struct MastercardProvider {
    name: String,
    limits: Limits,
    network: SimulatedNetwork,
}

impl MastercardProvider {
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
        Envelope::Json(serde_json::json!({
            "transaction_id": format!("TX{}", Uuid::now_v7().simple()),
            "status": "APPROVED",
            "amount": request.amount.to_string(),
            "currency": request.currency,
            "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        }))
    }

    fn declined() -> Envelope {
        Envelope::Json(serde_json::json!({
            "error_code": "MC0001",
            "message": "Insufficient funds",
        }))
    }
}

#[derive(Debug, Deserialize)]
struct MastercardError {
    error_code: String,
    message: String,
}

impl PaymentProvider for MastercardProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, request: &PaymentRequest) -> Result<(), ValidationError> {
        validation::check_baseline(request, &self.limits)?;

        if !validation::is_all_digits(&request.card_number) {
            return Err(ValidationError::CardNumberNotNumeric);
        }
        match request.expiry_month.parse::<u8>() {
            Ok(1..=12) => Ok(()),
            _ => Err(ValidationError::InvalidExpiryMonth),
        }
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
        let obj = to_object(envelope)?;

        let transaction_id = required_str(&obj, "transaction_id")?;
        let status = required_str(&obj, "status")?;
        let amount = field_as::<NativeAmount>(
            required(&obj, "amount")?,
            "amount",
            "a decimal string or number",
        )?
        .to_decimal("amount")?;
        let currency = required_str(&obj, "currency")?;

        let timestamp = match obj.get("timestamp") {
            None | Some(serde_json::Value::Null) => None,
            Some(raw) => Some(
                field_as::<NativeTimestamp>(
                    raw,
                    "timestamp",
                    "epoch seconds or an RFC 3339 string",
                )?
                .to_utc("timestamp")?,
            ),
        };

        Ok(PaymentResponse::new(
            transaction_id,
            status,
            amount,
            currency,
            timestamp,
        ))
    }

    fn parse_error(&self, envelope: &Envelope) -> Result<PaymentError, ParseError> {
        let err: MastercardError = envelope.decode()?;
        Ok(PaymentError::provider(err.error_code, err.message))
    }
}
