//! # In-Memory Configuration Sources
//!
//! - [`InMemoryPricingContext`]: the shared services context cache
//! - [`InMemoryConfigFetcher`]: scripted [`ConfigFetcher`] for offline use and tests
//!
//! Both use `Arc<RwLock<HashMap>>` for thread-safe access.

use crate::domain::entities::service_config::ServiceConfig;
use crate::domain::value_objects::ServiceId;
use crate::infrastructure::config_source::traits::{
    ConfigFetcher, FetchError, FetchResult, PricingContext,
};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// In-memory implementation of [`PricingContext`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryPricingContext {
    storage: Arc<RwLock<HashMap<ServiceId, ServiceConfig>>>,
}

impl InMemoryPricingContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context pre-loaded with documents.
    #[must_use]
    pub fn with_configs(configs: impl IntoIterator<Item = ServiceConfig>) -> Self {
        let context = Self::new();
        for config in configs {
            context.store(config);
        }
        context
    }

    /// Returns the number of cached documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.read().len()
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every cached document.
    pub fn clear(&self) {
        self.storage.write().clear();
    }
}

impl PricingContext for InMemoryPricingContext {
    fn cached_pricing_for_service(&self, service_id: &ServiceId) -> Option<ServiceConfig> {
        self.storage.read().get(service_id).cloned()
    }

    fn store(&self, config: ServiceConfig) {
        self.storage
            .write()
            .insert(config.service_id.clone(), config);
    }
}

/// Scripted outcome of one fetch.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// The service answers with this document.
    Found(ServiceConfig),
    /// The service has no active document.
    Missing,
    /// The fetch fails.
    Fail(FetchError),
}

impl FetchOutcome {
    fn into_result(self) -> FetchResult<Option<ServiceConfig>> {
        match self {
            Self::Found(config) => Ok(Some(config)),
            Self::Missing => Ok(None),
            Self::Fail(error) => Err(error),
        }
    }
}

#[derive(Debug, Default)]
struct Script {
    queued: VecDeque<(Duration, FetchOutcome)>,
    standing: Option<FetchOutcome>,
}

/// Scripted implementation of [`ConfigFetcher`].
///
/// Queued outcomes are consumed one per fetch, in order, each after its
/// delay; once a service's queue is empty the standing outcome (default
/// [`FetchOutcome::Missing`]) is returned immediately.
#[derive(Debug, Clone, Default)]
pub struct InMemoryConfigFetcher {
    scripts: Arc<RwLock<HashMap<ServiceId, Script>>>,
    calls: Arc<AtomicUsize>,
}

impl InMemoryConfigFetcher {
    /// Creates a fetcher answering `Missing` for every service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the standing outcome for a service.
    pub fn set_outcome(&self, service_id: ServiceId, outcome: FetchOutcome) {
        self.scripts.write().entry(service_id).or_default().standing = Some(outcome);
    }

    /// Queues a one-shot outcome delivered after `delay`.
    pub fn push_outcome(&self, service_id: ServiceId, delay: Duration, outcome: FetchOutcome) {
        self.scripts
            .write()
            .entry(service_id)
            .or_default()
            .queued
            .push_back((delay, outcome));
    }

    /// Returns the number of fetches performed.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_outcome(&self, service_id: &ServiceId) -> (Duration, FetchOutcome) {
        let mut scripts = self.scripts.write();
        let Some(script) = scripts.get_mut(service_id) else {
            return (Duration::ZERO, FetchOutcome::Missing);
        };
        script.queued.pop_front().unwrap_or_else(|| {
            (
                Duration::ZERO,
                script.standing.clone().unwrap_or(FetchOutcome::Missing),
            )
        })
    }
}

#[async_trait]
impl ConfigFetcher for InMemoryConfigFetcher {
    async fn fetch_active(&self, service_id: &ServiceId) -> FetchResult<Option<ServiceConfig>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (delay, outcome) = self.next_outcome(service_id);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        outcome.into_result()
    }

    fn name(&self) -> &'static str {
        "in_memory"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::service_config::RateTree;

    fn doc(service: &str, version: u32) -> ServiceConfig {
        let mut rates = RateTree::default();
        rates.default_contract_months = Some(24);
        ServiceConfig::active(ServiceId::new(service), version, rates)
    }

    mod context {
        use super::*;

        #[test]
        fn store_replaces_previous_document() {
            let context = InMemoryPricingContext::new();
            assert!(context.is_empty());

            context.store(doc("drain_service", 1));
            context.store(doc("drain_service", 2));

            let cached = context
                .cached_pricing_for_service(&ServiceId::new("drain_service"))
                .unwrap();
            assert_eq!(cached.version, 2);
            assert_eq!(context.len(), 1);
        }

        #[test]
        fn keeps_inactive_documents() {
            let context = InMemoryPricingContext::with_configs([doc("drain_service", 1).deactivated()]);
            let cached = context
                .cached_pricing_for_service(&ServiceId::new("drain_service"))
                .unwrap();
            assert!(!cached.is_active);

            context.clear();
            assert!(context.is_empty());
        }
    }

    mod fetcher {
        use super::*;

        #[tokio::test]
        async fn unknown_service_is_missing() {
            let fetcher = InMemoryConfigFetcher::new();
            let result = fetcher.fetch_active(&ServiceId::new("x")).await.unwrap();
            assert!(result.is_none());
            assert_eq!(fetcher.calls(), 1);
        }

        #[tokio::test]
        async fn queued_outcomes_precede_standing_outcome() {
            let fetcher = InMemoryConfigFetcher::new();
            let id = ServiceId::new("drain_service");
            fetcher.set_outcome(id.clone(), FetchOutcome::Found(doc("drain_service", 9)));
            fetcher.push_outcome(
                id.clone(),
                Duration::ZERO,
                FetchOutcome::Fail(FetchError::timeout("slow")),
            );

            assert!(fetcher.fetch_active(&id).await.is_err());
            let found = fetcher.fetch_active(&id).await.unwrap().unwrap();
            assert_eq!(found.version, 9);
            assert_eq!(fetcher.calls(), 2);
        }
    }
}
