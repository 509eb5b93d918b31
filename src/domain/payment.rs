use {
    chrono::{DateTime, Utc},
    rust_decimal::Decimal,
    serde::{Deserialize, Serialize},
    std::fmt,
};

/// Provider-agnostic payment request. `mode` selects the provider.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub mode: String,
    pub amount: Decimal,
    pub currency: String,
    pub card_number: String,
    pub expiry_month: String,
    pub expiry_year: String,
    pub cvv: String,
}

impl PaymentRequest {
    /// Card number reduced to its last four digits, for logs.
    pub fn masked_card(&self) -> String {
        let n = self.card_number.chars().count();
        let tail: String = self.card_number.chars().skip(n.saturating_sub(4)).collect();
        format!("****{tail}")
    }
}

impl fmt::Debug for PaymentRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentRequest")
            .field("mode", &self.mode)
            .field("amount", &self.amount)
            .field("currency", &self.currency)
            .field("card_number", &self.masked_card())
            .field("expiry_month", &self.expiry_month)
            .field("expiry_year", &self.expiry_year)
            .field("cvv", &"***")
            .finish()
    }
}

/// Normalized result of a successful pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentResponse {
    success: bool,
    transaction_id: String,
    status: String,
    amount: Decimal,
    currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<DateTime<Utc>>,
}

impl PaymentResponse {
    pub fn new(
        transaction_id: impl Into<String>,
        status: impl Into<String>,
        amount: Decimal,
        currency: impl Into<String>,
        timestamp: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            success: true,
            transaction_id: transaction_id.into(),
            status: status.into(),
            amount,
            currency: currency.into(),
            timestamp,
        }
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }
}
