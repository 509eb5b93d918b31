#![allow(dead_code)]

use pay_router::adapters::mastercard::MastercardProvider;
use pay_router::adapters::simulation::{FixedOutcome, SimulatedNetwork};
use pay_router::adapters::visa::VisaProvider;
use pay_router::domain::context::RequestContext;
use pay_router::domain::error::{ParseError, PaymentError, ValidationError};
use pay_router::domain::payment::{PaymentRequest, PaymentResponse};
use pay_router::domain::provider::{Envelope, Invocation, InvokeFuture, PaymentProvider};
use pay_router::services::payment_processor::PaymentProcessor;
use pay_router::services::registry::ProviderRegistry;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// The canonical valid request, routed to `mode`.
pub fn request(mode: &str) -> PaymentRequest {
    PaymentRequest {
        mode: mode.to_string(),
        amount: dec!(100.00),
        currency: "USD".to_string(),
        card_number: "4111111111111111".to_string(),
        expiry_month: "12".to_string(),
        expiry_year: "2025".to_string(),
        cvv: "123".to_string(),
    }
}

pub fn request_with_amount(mode: &str, amount: Decimal) -> PaymentRequest {
    PaymentRequest {
        amount,
        ..request(mode)
    }
}

pub fn mastercard(outcome: FixedOutcome) -> MastercardProvider {
    MastercardProvider::new(SimulatedNetwork::new(outcome))
}

pub fn visa(outcome: FixedOutcome) -> VisaProvider {
    VisaProvider::new(SimulatedNetwork::new(outcome))
}

pub fn processor(providers: Vec<Arc<dyn PaymentProvider>>) -> PaymentProcessor {
    let registry = ProviderRegistry::new(providers).expect("registry");
    PaymentProcessor::new(Arc::new(registry))
}

/// Both reference adapters with pinned outcomes.
pub fn reference_processor(mc: FixedOutcome, vi: FixedOutcome) -> PaymentProcessor {
    let providers: Vec<Arc<dyn PaymentProvider>> =
        vec![Arc::new(mastercard(mc)), Arc::new(visa(vi))];
    processor(providers)
}

/// Wraps a real adapter but replies to `invoke` with a canned outcome and
/// counts how often the external call was reached.
pub struct ScriptedProvider<P> {
    inner: P,
    reply: Invocation,
    calls: AtomicUsize,
}

impl<P: PaymentProvider> ScriptedProvider<P> {
    pub fn new(inner: P, reply: Invocation) -> Arc<Self> {
        Arc::new(Self {
            inner,
            reply,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<P: PaymentProvider> PaymentProvider for ScriptedProvider<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn validate(&self, request: &PaymentRequest) -> Result<(), ValidationError> {
        self.inner.validate(request)
    }

    fn invoke<'a>(
        &'a self,
        _ctx: &'a RequestContext,
        _request: &'a PaymentRequest,
    ) -> InvokeFuture<'a> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.reply.clone();
        Box::pin(async move { reply })
    }

    fn parse_success(&self, envelope: &Envelope) -> Result<PaymentResponse, ParseError> {
        self.inner.parse_success(envelope)
    }

    fn parse_error(&self, envelope: &Envelope) -> Result<PaymentError, ParseError> {
        self.inner.parse_error(envelope)
    }
}

pub fn json(value: serde_json::Value) -> Envelope {
    Envelope::Json(value)
}
