use {
    crate::domain::{error::RegistryError, provider::PaymentProvider},
    std::{collections::HashMap, sync::Arc},
};

/// Name-indexed set of adapters, fixed at construction and shared read-only.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn PaymentProvider>>,
}

impl ProviderRegistry {
    /// Rejects empty names and name collisions.
    pub fn new(
        providers: impl IntoIterator<Item = Arc<dyn PaymentProvider>>,
    ) -> Result<Self, RegistryError> {
        let mut map = HashMap::new();
        for provider in providers {
            let name = provider.name().to_string();
            if name.is_empty() {
                return Err(RegistryError::EmptyName);
            }
            if map.contains_key(&name) {
                return Err(RegistryError::DuplicateProvider(name));
            }
            map.insert(name, provider);
        }
        Ok(Self { providers: map })
    }

    /// Last registration wins on a name collision. For deliberate overrides,
    /// e.g. swapping a provider for a sandbox double.
    pub fn with_overrides(
        providers: impl IntoIterator<Item = Arc<dyn PaymentProvider>>,
    ) -> Result<Self, RegistryError> {
        let mut map = HashMap::new();
        for provider in providers {
            let name = provider.name().to_string();
            if name.is_empty() {
                return Err(RegistryError::EmptyName);
            }
            if map.insert(name.clone(), provider).is_some() {
                tracing::warn!(provider = %name, "provider overridden by later registration");
            }
        }
        Ok(Self { providers: map })
    }

    pub fn resolve(&self, name: &str) -> Option<Arc<dyn PaymentProvider>> {
        self.providers.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
