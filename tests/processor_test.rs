mod common;

use common::*;
use pay_router::adapters::mastercard::MastercardProvider;
use pay_router::adapters::simulation::{FixedOutcome, SimulatedNetwork};
use pay_router::domain::context::RequestContext;
use pay_router::domain::error::{ErrorCode, InvokeError, MAX_ERROR_DETAIL};
use pay_router::domain::provider::{Invocation, PaymentProvider};
use rust_decimal_macros::dec;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

// ── Resolve ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn unknown_mode_is_invalid_provider() {
    let processor = reference_processor(FixedOutcome::Succeed, FixedOutcome::Succeed);

    let err = processor.process_payment(request("amex")).await.unwrap_err();

    assert_eq!(err.code(), &ErrorCode::InvalidProvider);
    assert!(!err.success());
    assert_eq!(err.message(), "invalid provider name provided: 'amex'");
}

#[tokio::test]
async fn provider_names_are_case_sensitive() {
    let processor = reference_processor(FixedOutcome::Succeed, FixedOutcome::Succeed);

    let err = processor.process_payment(request("VISA")).await.unwrap_err();
    assert_eq!(err.code(), &ErrorCode::InvalidProvider);
}

// ── Validate ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn validation_failure_never_reaches_provider() {
    let scripted = ScriptedProvider::new(
        mastercard(FixedOutcome::Succeed),
        Invocation::Success(json(json!({}))),
    );
    let processor = processor(vec![scripted.clone() as Arc<dyn PaymentProvider>]);

    let err = processor
        .process_payment(request_with_amount("mastercard", dec!(0)))
        .await
        .unwrap_err();

    assert_eq!(err.code(), &ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "amount must be greater than 0");
    assert_eq!(scripted.calls(), 0);
}

#[tokio::test]
async fn validation_reports_first_failing_rule() {
    let processor = reference_processor(FixedOutcome::Succeed, FixedOutcome::Succeed);
    let mut req = request("visa");
    req.currency = String::new();
    req.cvv = "1".into();

    let err = processor.process_payment(req).await.unwrap_err();
    assert_eq!(err.code(), &ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "currency is required");
}

// ── Invoke / error parse ───────────────────────────────────────────────────

#[tokio::test]
async fn mastercard_decline_is_mapped() {
    let processor = reference_processor(FixedOutcome::Fail, FixedOutcome::Succeed);

    let err = processor
        .process_payment(request("mastercard"))
        .await
        .unwrap_err();

    assert_eq!(err.code(), &ErrorCode::Provider("MC0001".into()));
    assert_eq!(err.message(), "Insufficient funds");
}

#[tokio::test]
async fn visa_decline_is_mapped() {
    let processor = reference_processor(FixedOutcome::Succeed, FixedOutcome::Fail);

    let err = processor.process_payment(request("visa")).await.unwrap_err();

    assert_eq!(err.code().as_str(), "EE000011");
    assert_eq!(
        err.message(),
        "ErrorType:PAYMENT_FAILED :: ErrorReason: Card declined"
    );
}

#[tokio::test]
async fn undecodable_error_envelope_is_processing_error() {
    let scripted = ScriptedProvider::new(
        visa(FixedOutcome::Succeed),
        Invocation::Failure(json(json!({ "unexpected": true }))),
    );
    let processor = processor(vec![scripted.clone() as Arc<dyn PaymentProvider>]);

    let err = processor.process_payment(request("visa")).await.unwrap_err();

    assert_eq!(err.code(), &ErrorCode::ProcessingError);
    assert!(err.message().starts_with("visa error response:"), "{}", err.message());
    assert_eq!(scripted.calls(), 1);
}

#[tokio::test]
async fn aborted_call_is_processing_error() {
    let scripted = ScriptedProvider::new(
        mastercard(FixedOutcome::Succeed),
        Invocation::Aborted(InvokeError::Transport("connection reset".into())),
    );
    let processor = processor(vec![scripted as Arc<dyn PaymentProvider>]);

    let err = processor
        .process_payment(request("mastercard"))
        .await
        .unwrap_err();

    assert_eq!(err.code(), &ErrorCode::ProcessingError);
    assert_eq!(
        err.message(),
        "mastercard call did not complete: transport: connection reset"
    );
}

// ── Success parse ──────────────────────────────────────────────────────────

#[tokio::test]
async fn malformed_success_envelope_is_parsing_error() {
    let scripted = ScriptedProvider::new(
        mastercard(FixedOutcome::Succeed),
        Invocation::Success(json(json!({
            "status": "APPROVED",
            "amount": "10.00",
            "currency": "USD",
        }))),
    );
    let processor = processor(vec![scripted as Arc<dyn PaymentProvider>]);

    let err = processor
        .process_payment(request("mastercard"))
        .await
        .unwrap_err();

    assert_eq!(err.code(), &ErrorCode::ParsingError);
    assert!(err.message().contains("transaction_id"), "{}", err.message());
}

#[tokio::test]
async fn oversized_parse_detail_is_bounded() {
    let huge = "9".repeat(10_000);
    let scripted = ScriptedProvider::new(
        visa(FixedOutcome::Succeed),
        Invocation::Success(json(json!({
            "payment_id": huge,
            "state": "SUCCESS",
            "value": { "amount": 5, "currency_code": "USD" },
            "processed_at": { "nested": huge },
        }))),
    );
    let processor = processor(vec![scripted as Arc<dyn PaymentProvider>]);

    let err = processor.process_payment(request("visa")).await.unwrap_err();

    assert_eq!(err.code(), &ErrorCode::ParsingError);
    assert!(err.message().len() <= MAX_ERROR_DETAIL, "{}", err.message().len());
}

// ── End to end ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn mastercard_end_to_end_success() {
    let processor = reference_processor(FixedOutcome::Succeed, FixedOutcome::Succeed);

    let resp = processor
        .process_payment(request("mastercard"))
        .await
        .unwrap();

    assert!(resp.success());
    assert_eq!(resp.status(), "APPROVED");
    assert_eq!(resp.amount(), dec!(100.00));
    assert_eq!(resp.currency(), "USD");
    assert!(resp.transaction_id().starts_with("TX"));
    assert!(resp.timestamp().is_some());
}

#[tokio::test]
async fn visa_end_to_end_success() {
    let processor = reference_processor(FixedOutcome::Succeed, FixedOutcome::Succeed);

    let resp = processor.process_payment(request("visa")).await.unwrap();

    assert!(resp.success());
    assert_eq!(resp.status(), "SUCCESS");
    assert_eq!(resp.amount(), dec!(100));
    assert_eq!(resp.currency(), "USD");
    assert!(resp.transaction_id().starts_with("PAY-"));
}

// ── Cancellation ───────────────────────────────────────────────────────────

#[tokio::test]
async fn cancelled_before_invoke_short_circuits() {
    let scripted = ScriptedProvider::new(
        mastercard(FixedOutcome::Succeed),
        Invocation::Success(json(json!({}))),
    );
    let processor = processor(vec![scripted.clone() as Arc<dyn PaymentProvider>]);
    let (handle, ctx) = RequestContext::new();
    handle.cancel();

    let err = processor
        .process_payment_with(&ctx, request("mastercard"))
        .await
        .unwrap_err();

    assert_eq!(err.code(), &ErrorCode::ProcessingError);
    assert_eq!(err.message(), "request cancelled before reaching provider");
    assert_eq!(scripted.calls(), 0);
}

#[tokio::test]
async fn cancelled_context_still_fails_validation_first() {
    let processor = reference_processor(FixedOutcome::Succeed, FixedOutcome::Succeed);
    let (handle, ctx) = RequestContext::new();
    handle.cancel();

    let mut req = request("visa");
    req.cvv = "12".into();
    let err = processor.process_payment_with(&ctx, req).await.unwrap_err();

    assert_eq!(err.code(), &ErrorCode::InvalidRequest);
}

#[tokio::test(start_paused = true)]
async fn cancellation_during_invoke_surfaces_as_processing_error() {
    let slow = mastercard_slow(Duration::from_secs(30));
    let processor = processor(vec![Arc::new(slow) as Arc<dyn PaymentProvider>]);
    let (handle, ctx) = RequestContext::new();

    let call = tokio::spawn({
        let processor = processor.clone();
        async move { processor.process_payment_with(&ctx, request("mastercard")).await }
    });
    tokio::time::sleep(Duration::from_secs(1)).await;
    handle.cancel();

    let err = call.await.unwrap().unwrap_err();
    assert_eq!(err.code(), &ErrorCode::ProcessingError);
    assert!(err.message().ends_with("request cancelled"), "{}", err.message());
}

#[tokio::test(start_paused = true)]
async fn invoke_timeout_bounds_slow_provider() {
    let slow = mastercard_slow(Duration::from_secs(30));
    let processor = processor(vec![Arc::new(slow) as Arc<dyn PaymentProvider>])
        .with_invoke_timeout(Duration::from_secs(2));

    let err = processor
        .process_payment(request("mastercard"))
        .await
        .unwrap_err();

    assert_eq!(err.code(), &ErrorCode::ProcessingError);
    assert!(err.message().ends_with("deadline exceeded"), "{}", err.message());
}

#[tokio::test(start_paused = true)]
async fn expired_caller_deadline_short_circuits() {
    let processor = reference_processor(FixedOutcome::Succeed, FixedOutcome::Succeed);
    let ctx = RequestContext::background().with_timeout(Duration::from_millis(10));
    tokio::time::sleep(Duration::from_millis(20)).await;

    let err = processor
        .process_payment_with(&ctx, request("visa"))
        .await
        .unwrap_err();

    assert_eq!(err.message(), "deadline exceeded before reaching provider");
}

fn mastercard_slow(latency: Duration) -> MastercardProvider {
    MastercardProvider::new(SimulatedNetwork::new(FixedOutcome::Succeed).with_latency(latency))
}
