//! # Configuration Resolver
//!
//! Resolves the effective pricing configuration of a service from three
//! sources with a declared priority.
//!
//! # Fallback Chain
//!
//! ```text
//! fetched active (Remote)  ->  shared context (Cached)  ->  compiled-in (Static)
//! ```
//!
//! Resolution never fails. Every leaf is taken from the highest-priority
//! source defining it, and [`Resolution::is_degraded`] tells the caller that
//! pricing may be stale.
//!
//! # Last Resolver Wins
//!
//! Each call takes a generation ticket for its service. When a newer call
//! for the same service starts before an older one finishes, the older
//! resolution is superseded: it is not written to the shared context and
//! quote sessions refuse to apply it. Different services resolve
//! independently.
//!
//! # Examples
//!
//! ```
//! use service_quote::application::services::ConfigResolver;
//! use service_quote::domain::entities::SchemaRegistry;
//! use service_quote::domain::value_objects::{ConfigTier, ServiceId};
//! use service_quote::infrastructure::config_source::{InMemoryConfigFetcher, InMemoryPricingContext};
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let resolver = ConfigResolver::new(
//!     Arc::new(InMemoryConfigFetcher::new()),
//!     Arc::new(InMemoryPricingContext::new()),
//!     Arc::new(SchemaRegistry::builtin()),
//! );
//!
//! let resolution = resolver.resolve(&ServiceId::new("power_washing")).await;
//! assert_eq!(resolution.tier(), ConfigTier::Static);
//! assert!(resolution.is_degraded());
//! assert!(resolution.is_current());
//! # });
//! ```

use crate::domain::entities::effective_config::EffectiveConfig;
use crate::domain::entities::service_config::ServiceConfig;
use crate::domain::entities::service_schema::{SchemaRegistry, ServiceSchema};
use crate::domain::value_objects::{ConfigTier, ServiceId};
use crate::infrastructure::config_source::traits::{ConfigFetcher, PricingContext};
use dashmap::DashMap;
use futures::future::join_all;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Generation ticket of one resolution.
#[derive(Clone)]
pub struct GenerationTicket {
    counter: Arc<AtomicU64>,
    generation: u64,
}

impl GenerationTicket {
    /// Returns the generation number.
    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns true if no newer resolution of the same service has started.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.counter.load(Ordering::SeqCst) == self.generation
    }
}

impl fmt::Debug for GenerationTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationTicket")
            .field("generation", &self.generation)
            .field("current", &self.is_current())
            .finish()
    }
}

/// Outcome of resolving one service's configuration.
#[derive(Debug, Clone)]
pub struct Resolution {
    config: Arc<EffectiveConfig>,
    schema: Arc<ServiceSchema>,
    ticket: GenerationTicket,
    fetch_failed: bool,
}

impl Resolution {
    /// Returns the effective configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &Arc<EffectiveConfig> {
        &self.config
    }

    /// Returns the schema the configuration was resolved against.
    #[inline]
    #[must_use]
    pub fn schema(&self) -> &Arc<ServiceSchema> {
        &self.schema
    }

    /// Returns the service key.
    #[must_use]
    pub fn service_id(&self) -> &ServiceId {
        self.config.service_id()
    }

    /// Returns the source tier.
    #[must_use]
    pub fn tier(&self) -> ConfigTier {
        self.config.tier()
    }

    /// Returns true when pricing may be stale.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.config.tier().is_degraded()
    }

    /// Returns true if the config service was unreachable or errored.
    #[inline]
    #[must_use]
    pub fn fetch_failed(&self) -> bool {
        self.fetch_failed
    }

    /// Returns true if applying this resolution must clear custom amounts.
    ///
    /// Freshly confirmed remote rates override stale manual prices.
    #[must_use]
    pub fn clears_custom_overrides(&self) -> bool {
        self.config.tier() == ConfigTier::Remote
    }

    /// Returns the generation ticket.
    #[inline]
    #[must_use]
    pub fn ticket(&self) -> &GenerationTicket {
        &self.ticket
    }

    /// Returns the generation number.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.ticket.generation()
    }

    /// Returns true if this is the newest resolution of its service.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.ticket.is_current()
    }
}

/// Resolves effective configurations with explicit dependencies.
pub struct ConfigResolver {
    fetcher: Arc<dyn ConfigFetcher>,
    context: Arc<dyn PricingContext>,
    schemas: Arc<SchemaRegistry>,
    generations: DashMap<ServiceId, Arc<AtomicU64>>,
}

impl fmt::Debug for ConfigResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigResolver")
            .field("fetcher", &self.fetcher.name())
            .field("schemas", &self.schemas.len())
            .field("services_tracked", &self.generations.len())
            .finish()
    }
}

impl ConfigResolver {
    /// Creates a resolver.
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn ConfigFetcher>,
        context: Arc<dyn PricingContext>,
        schemas: Arc<SchemaRegistry>,
    ) -> Self {
        Self {
            fetcher,
            context,
            schemas,
            generations: DashMap::new(),
        }
    }

    /// Returns the schema registry.
    #[inline]
    #[must_use]
    pub fn schemas(&self) -> &Arc<SchemaRegistry> {
        &self.schemas
    }

    fn next_ticket(&self, service_id: &ServiceId) -> GenerationTicket {
        let counter = self
            .generations
            .entry(service_id.clone())
            .or_insert_with(|| Arc::new(AtomicU64::new(0)))
            .clone();
        let generation = counter.fetch_add(1, Ordering::SeqCst) + 1;
        GenerationTicket {
            counter,
            generation,
        }
    }

    async fn fetch_usable(&self, service_id: &ServiceId) -> (Option<ServiceConfig>, bool) {
        match self.fetcher.fetch_active(service_id).await {
            Ok(Some(doc)) if doc.is_usable() => (Some(doc), false),
            Ok(Some(doc)) => {
                tracing::debug!(
                    service_id = %service_id,
                    version = doc.version,
                    active = doc.is_active,
                    "fetched config is inactive or empty, trying cache"
                );
                (None, false)
            }
            Ok(None) => {
                tracing::debug!(service_id = %service_id, "no active config, trying cache");
                (None, false)
            }
            Err(e) => {
                tracing::warn!(
                    service_id = %service_id,
                    fetcher = self.fetcher.name(),
                    error = %e,
                    "config fetch failed, trying cache"
                );
                (None, true)
            }
        }
    }

    /// Resolves the effective configuration of one service.
    ///
    /// Never fails; unknown services resolve against an empty schema.
    pub async fn resolve(&self, service_id: &ServiceId) -> Resolution {
        let ticket = self.next_ticket(service_id);
        let schema = self.schemas.get_or_empty(service_id);

        let (fetched, fetch_failed) = self.fetch_usable(service_id).await;
        let cached = self.context.cached_pricing_for_service(service_id);
        let config = EffectiveConfig::from_layers(&schema, cached.as_ref(), fetched.as_ref());

        if !ticket.is_current() {
            tracing::debug!(
                service_id = %service_id,
                generation = ticket.generation(),
                "resolution superseded, discarding"
            );
        } else if let Some(doc) = fetched {
            self.context.store(doc);
        }

        tracing::info!(
            service_id = %service_id,
            tier = %config.tier(),
            version = ?config.version(),
            generation = ticket.generation(),
            "config resolved"
        );

        Resolution {
            config: Arc::new(config),
            schema,
            ticket,
            fetch_failed,
        }
    }

    /// Resolves several services concurrently, in input order.
    pub async fn resolve_many(&self, service_ids: &[ServiceId]) -> Vec<Resolution> {
        join_all(service_ids.iter().map(|id| self.resolve(id))).await
    }

    /// Returns the latest generation started for a service, if any.
    #[must_use]
    pub fn current_generation(&self, service_id: &ServiceId) -> Option<u64> {
        self.generations
            .get(service_id)
            .map(|counter| counter.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::service_config::RateTree;
    use crate::infrastructure::config_source::in_memory::{
        FetchOutcome, InMemoryConfigFetcher, InMemoryPricingContext,
    };
    use crate::infrastructure::config_source::traits::FetchError;
    use rust_decimal::Decimal;
    use std::time::Duration;

    fn id() -> ServiceId {
        ServiceId::new("power_washing")
    }

    fn doc(version: u32, worker_rate: i64) -> ServiceConfig {
        let mut rates = RateTree::default();
        rates.core_rates.worker_rate = Some(Decimal::from(worker_rate));
        ServiceConfig::active(id(), version, rates)
    }

    fn setup() -> (ConfigResolver, InMemoryConfigFetcher, InMemoryPricingContext) {
        let fetcher = InMemoryConfigFetcher::new();
        let context = InMemoryPricingContext::new();
        let resolver = ConfigResolver::new(
            Arc::new(fetcher.clone()),
            Arc::new(context.clone()),
            Arc::new(SchemaRegistry::builtin()),
        );
        (resolver, fetcher, context)
    }

    mod tiers {
        use super::*;

        #[tokio::test]
        async fn remote_is_used_and_cached() {
            let (resolver, fetcher, context) = setup();
            fetcher.set_outcome(id(), FetchOutcome::Found(doc(3, 220)));

            let resolution = resolver.resolve(&id()).await;
            assert_eq!(resolution.tier(), ConfigTier::Remote);
            assert!(!resolution.is_degraded());
            assert!(resolution.clears_custom_overrides());
            assert_eq!(resolution.config().core().worker_rate, Decimal::from(220));
            assert_eq!(context.cached_pricing_for_service(&id()).unwrap().version, 3);
        }

        #[tokio::test]
        async fn fetch_error_falls_back_to_cache() {
            let (resolver, fetcher, context) = setup();
            context.store(doc(2, 190).deactivated());
            fetcher.set_outcome(id(), FetchOutcome::Fail(FetchError::connection("refused")));

            let resolution = resolver.resolve(&id()).await;
            assert_eq!(resolution.tier(), ConfigTier::Cached);
            assert!(resolution.fetch_failed());
            assert!(!resolution.clears_custom_overrides());
            assert_eq!(resolution.config().core().worker_rate, Decimal::from(190));
        }

        #[tokio::test]
        async fn inactive_fetch_falls_back_to_static() {
            let (resolver, fetcher, _context) = setup();
            fetcher.set_outcome(id(), FetchOutcome::Found(doc(5, 999).deactivated()));

            let resolution = resolver.resolve(&id()).await;
            assert_eq!(resolution.tier(), ConfigTier::Static);
            assert!(!resolution.fetch_failed());
            assert_eq!(resolution.config().core().worker_rate, Decimal::from(200));
        }

        #[tokio::test]
        async fn remote_leaves_overlay_cached_leaves() {
            let (resolver, fetcher, context) = setup();
            let mut cached = RateTree::default();
            cached.core_rates.hourly_rate = Some(Decimal::from(140));
            context.store(ServiceConfig::active(id(), 1, cached));
            fetcher.set_outcome(id(), FetchOutcome::Found(doc(2, 230)));

            let resolution = resolver.resolve(&id()).await;
            assert_eq!(resolution.config().core().worker_rate, Decimal::from(230));
            assert_eq!(resolution.config().core().hourly_rate, Decimal::from(140));
        }

        #[tokio::test]
        async fn unknown_service_uses_empty_schema() {
            let (resolver, _fetcher, _context) = setup();
            let resolution = resolver.resolve(&ServiceId::new("snow_removal")).await;
            assert_eq!(resolution.tier(), ConfigTier::Static);
            assert!(resolution.schema().areas().is_empty());
            assert_eq!(resolution.config().core().minimum_visit, Decimal::ZERO);
        }
    }

    mod generations {
        use super::*;

        #[tokio::test]
        async fn superseded_resolution_is_discarded() {
            let (resolver, fetcher, context) = setup();
            fetcher.push_outcome(
                id(),
                Duration::from_millis(50),
                FetchOutcome::Found(doc(1, 210)),
            );
            fetcher.push_outcome(id(), Duration::ZERO, FetchOutcome::Found(doc(2, 240)));

            let service_id = id();
            let (slow, fast) = tokio::join!(resolver.resolve(&service_id), async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                resolver.resolve(&service_id).await
            });

            assert!(!slow.is_current());
            assert!(fast.is_current());
            assert_eq!(fast.generation(), 2);
            assert_eq!(context.cached_pricing_for_service(&id()).unwrap().version, 2);
            assert_eq!(resolver.current_generation(&id()), Some(2));
        }

        #[tokio::test]
        async fn services_do_not_interfere() {
            let (resolver, _fetcher, _context) = setup();
            let ids = [ServiceId::new("power_washing"), ServiceId::new("drain_service")];

            let resolutions = resolver.resolve_many(&ids).await;
            assert_eq!(resolutions.len(), 2);
            assert!(resolutions.iter().all(Resolution::is_current));
            let resolved: Vec<&ServiceId> =
                resolutions.iter().map(Resolution::service_id).collect();
            assert_eq!(resolved, ids.iter().collect::<Vec<_>>());
        }
    }
}
