pub mod adapters;
pub mod config;
pub mod domain;
pub mod services;

use {
    adapters::{
        mastercard::{self, MastercardProvider},
        simulation::{RandomOutcome, SimulatedNetwork},
        visa::{self, VisaProvider},
    },
    config::AppConfig,
    domain::{error::RegistryError, provider::PaymentProvider},
    services::{payment_processor::PaymentProcessor, registry::ProviderRegistry},
    std::sync::Arc,
};

#[derive(Clone)]
pub struct AppState {
    pub processor: PaymentProcessor,
}

/// Builds the enabled adapters explicitly and wires them into a processor.
pub fn build_processor(config: &AppConfig) -> Result<PaymentProcessor, RegistryError> {
    let mut providers: Vec<Arc<dyn PaymentProvider>> = Vec::new();

    if config.is_enabled(mastercard::NAME) {
        let network = SimulatedNetwork::new(RandomOutcome::new(config.mastercard_failure_rate))
            .with_latency(config.provider_latency);
        providers.push(Arc::new(MastercardProvider::new(network)));
    }
    if config.is_enabled(visa::NAME) {
        let network = SimulatedNetwork::new(RandomOutcome::new(config.visa_failure_rate))
            .with_latency(config.provider_latency);
        providers.push(Arc::new(VisaProvider::new(network)));
    }

    let registry = ProviderRegistry::new(providers)?;
    tracing::info!(providers = ?registry.names(), "provider registry ready");

    Ok(PaymentProcessor::new(Arc::new(registry)).with_invoke_timeout(config.invoke_budget()))
}
