//! Process configuration, read from the environment (and `.env` if present).

use {
    crate::{
        adapters::{mastercard, visa},
        domain::error::ConfigError,
    },
    std::{env, net::SocketAddr, str::FromStr, time::Duration},
};

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub request_timeout: Duration,
    pub invoke_timeout: Option<Duration>,
    pub provider_latency: Duration,
    pub mastercard_failure_rate: f64,
    pub visa_failure_rate: f64,
    pub enabled_providers: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            request_timeout: Duration::from_millis(5000),
            invoke_timeout: None,
            provider_latency: Duration::ZERO,
            mastercard_failure_rate: mastercard::DEFAULT_FAILURE_RATE,
            visa_failure_rate: visa::DEFAULT_FAILURE_RATE,
            enabled_providers: vec![mastercard::NAME.into(), visa::NAME.into()],
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Unset keys fall back to [`AppConfig::default`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let bind_addr = parsed(&lookup, "BIND_ADDR")?.unwrap_or(defaults.bind_addr);
        let request_timeout =
            millis(&lookup, "REQUEST_TIMEOUT_MS")?.unwrap_or(defaults.request_timeout);
        let invoke_timeout = millis(&lookup, "INVOKE_TIMEOUT_MS")?;
        let provider_latency =
            millis(&lookup, "PROVIDER_LATENCY_MS")?.unwrap_or(defaults.provider_latency);
        let mastercard_failure_rate = rate(&lookup, "MASTERCARD_FAILURE_RATE")?
            .unwrap_or(defaults.mastercard_failure_rate);
        let visa_failure_rate =
            rate(&lookup, "VISA_FAILURE_RATE")?.unwrap_or(defaults.visa_failure_rate);

        let enabled_providers = match lookup("ENABLED_PROVIDERS") {
            Some(raw) => {
                let names: Vec<String> = raw
                    .split(',')
                    .map(|s| s.trim().to_ascii_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect();
                if let Some(unknown) = names
                    .iter()
                    .find(|n| n.as_str() != mastercard::NAME && n.as_str() != visa::NAME)
                {
                    return Err(ConfigError::UnknownProvider(unknown.clone()));
                }
                names
            }
            None => defaults.enabled_providers,
        };

        Ok(Self {
            bind_addr,
            request_timeout,
            invoke_timeout,
            provider_latency,
            mastercard_failure_rate,
            visa_failure_rate,
            enabled_providers,
        })
    }

    pub fn is_enabled(&self, provider: &str) -> bool {
        self.enabled_providers.iter().any(|p| p == provider)
    }

    /// Deadline given to each provider call. Always leaves a fifth of the
    /// request timeout so a slow provider is reported before the HTTP layer
    /// gives up on the request.
    pub fn invoke_budget(&self) -> Duration {
        let ceiling = self.request_timeout * 4 / 5;
        self.invoke_timeout.map_or(ceiling, |t| t.min(ceiling))
    }
}

fn parsed<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
                key,
                reason: e.to_string(),
            })
        })
        .transpose()
}

fn millis(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<Duration>, ConfigError> {
    Ok(parsed::<u64>(lookup, key)?.map(Duration::from_millis))
}

fn rate(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<f64>, ConfigError> {
    match parsed::<f64>(lookup, key)? {
        Some(r) if !(0.0..=1.0).contains(&r) => Err(ConfigError::Invalid {
            key,
            reason: format!("must be within [0, 1], got {r}"),
        }),
        other => Ok(other),
    }
}
