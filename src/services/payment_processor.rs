use {
    crate::domain::{
        context::RequestContext,
        error::{ErrorCode, MAX_ERROR_DETAIL, PaymentError, truncate},
        payment::{PaymentRequest, PaymentResponse},
        provider::Invocation,
    },
    crate::services::registry::ProviderRegistry,
    std::{sync::Arc, time::Duration},
};

/// Runs resolve → validate → invoke → parse for one request and folds every
/// failure into a [`PaymentError`]. Holds nothing mutable, so clones can be
/// shared freely across tasks.
#[derive(Clone)]
pub struct PaymentProcessor {
    registry: Arc<ProviderRegistry>,
    invoke_timeout: Option<Duration>,
}

impl PaymentProcessor {
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self {
            registry,
            invoke_timeout: None,
        }
    }

    /// Deadline applied to every `invoke`, on top of any caller deadline.
    pub fn with_invoke_timeout(mut self, timeout: Duration) -> Self {
        self.invoke_timeout = Some(timeout);
        self
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub async fn process_payment(
        &self,
        request: PaymentRequest,
    ) -> Result<PaymentResponse, PaymentError> {
        self.process_payment_with(&RequestContext::background(), request)
            .await
    }

    #[tracing::instrument(
        name = "payment",
        skip_all,
        fields(mode = %request.mode, card = %request.masked_card())
    )]
    pub async fn process_payment_with(
        &self,
        ctx: &RequestContext,
        request: PaymentRequest,
    ) -> Result<PaymentResponse, PaymentError> {
        // ── Resolve ──────────────────────────────────────────────────────
        let Some(provider) = self.registry.resolve(&request.mode) else {
            tracing::warn!(stage = "resolve", "unknown provider");
            return Err(PaymentError::new(
                ErrorCode::InvalidProvider,
                format!(
                    "invalid provider name provided: '{}'",
                    truncate(&request.mode, 64)
                ),
            ));
        };
        let name = provider.name();

        // ── Validate ─────────────────────────────────────────────────────
        if let Err(e) = provider.validate(&request) {
            tracing::info!(provider = %name, stage = "validate", reason = %e, "request rejected");
            return Err(PaymentError::new(ErrorCode::InvalidRequest, e.to_string()));
        }

        // ── Invoke ───────────────────────────────────────────────────────
        let ctx = match self.invoke_timeout {
            Some(timeout) => ctx.clone().with_timeout(timeout),
            None => ctx.clone(),
        };
        if let Err(reason) = ctx.check() {
            tracing::warn!(provider = %name, stage = "invoke", %reason, "not sent");
            return Err(PaymentError::new(
                ErrorCode::ProcessingError,
                format!("{reason} before reaching provider"),
            ));
        }

        match provider.invoke(&ctx, &request).await {
            // ── Parse ────────────────────────────────────────────────────
            Invocation::Success(envelope) => match provider.parse_success(&envelope) {
                Ok(response) => {
                    tracing::info!(
                        provider = %name,
                        transaction_id = %response.transaction_id(),
                        status = %response.status(),
                        "payment approved"
                    );
                    Ok(response)
                }
                Err(e) => {
                    tracing::error!(provider = %name, stage = "parse_success", error = %e, "provider contract drift");
                    Err(PaymentError::new(
                        ErrorCode::ParsingError,
                        truncate(
                            &format!("{name} success response: {e}"),
                            MAX_ERROR_DETAIL,
                        ),
                    ))
                }
            },
            Invocation::Failure(envelope) => match provider.parse_error(&envelope) {
                Ok(mapped) => {
                    tracing::info!(
                        provider = %name,
                        error_code = %mapped.code(),
                        "payment declined by provider"
                    );
                    Err(mapped)
                }
                Err(e) => {
                    tracing::error!(provider = %name, stage = "parse_error", error = %e, "provider contract drift");
                    Err(PaymentError::new(
                        ErrorCode::ProcessingError,
                        truncate(&format!("{name} error response: {e}"), MAX_ERROR_DETAIL),
                    ))
                }
            },
            Invocation::Aborted(reason) => {
                tracing::warn!(provider = %name, stage = "invoke", %reason, "provider call did not complete");
                Err(PaymentError::new(
                    ErrorCode::ProcessingError,
                    truncate(
                        &format!("{name} call did not complete: {reason}"),
                        MAX_ERROR_DETAIL,
                    ),
                ))
            }
        }
    }
}
