//! HTTP config fetcher integration tests
//!
//! Runs the fetcher and the resolver against a mock config service.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use serde_json::json;
use service_quote::application::services::ConfigResolver;
use service_quote::domain::entities::{RateTree, SchemaRegistry, ServiceConfig};
use service_quote::domain::value_objects::{ConfigTier, ServiceId};
use service_quote::infrastructure::config_source::{
    ConfigFetcher, FetchError, HttpConfigFetcher, InMemoryPricingContext, PricingContext,
};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ACTIVE_PATH: &str = "/service-configs/active/power_washing";

fn active_document() -> serde_json::Value {
    json!({
        "serviceId": "power_washing",
        "version": 12,
        "isActive": true,
        "config": {
            "coreRates": { "workerRate": "225", "minimumVisit": "500" },
            "billingConversions": { "weekly": { "monthlyMultiplier": "4.345" } }
        }
    })
}

async fn serve(status: u16, body: Option<serde_json::Value>) -> MockServer {
    let server = MockServer::start().await;
    let mut response = ResponseTemplate::new(status);
    if let Some(body) = body {
        response = response.set_body_json(body);
    }
    Mock::given(method("GET"))
        .and(path(ACTIVE_PATH))
        .respond_with(response)
        .mount(&server)
        .await;
    server
}

fn service_id() -> ServiceId {
    ServiceId::new("power_washing")
}

mod fetcher {
    use super::*;

    #[tokio::test]
    async fn parses_active_document() {
        let server = serve(200, Some(active_document())).await;
        let fetcher = HttpConfigFetcher::new(server.uri(), 2000).unwrap();

        let doc = fetcher.fetch_active(&service_id()).await.unwrap().unwrap();
        assert_eq!(doc.version, 12);
        assert!(doc.is_usable());
        assert_eq!(doc.rates.core_rates.worker_rate, Some(Decimal::from(225)));
    }

    #[tokio::test]
    async fn not_found_is_none() {
        let server = serve(404, None).await;
        let fetcher = HttpConfigFetcher::new(server.uri(), 2000).unwrap();
        assert!(fetcher.fetch_active(&service_id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn server_error_is_status_error() {
        let server = serve(503, None).await;
        let fetcher = HttpConfigFetcher::new(server.uri(), 2000).unwrap();

        let err = fetcher.fetch_active(&service_id()).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn malformed_body_is_protocol_error() {
        let server = serve(200, Some(json!({ "version": "not a number" }))).await;
        let fetcher = HttpConfigFetcher::new(server.uri(), 2000).unwrap();

        let err = fetcher.fetch_active(&service_id()).await.unwrap_err();
        assert!(matches!(err, FetchError::Protocol(_)));
    }

    #[tokio::test]
    async fn slow_service_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(ACTIVE_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(active_document())
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;
        let fetcher = HttpConfigFetcher::new(server.uri(), 50).unwrap();

        let err = fetcher.fetch_active(&service_id()).await.unwrap_err();
        assert!(matches!(err, FetchError::Timeout(_)));
    }
}

mod resolver {
    use super::*;

    fn resolver(server: &MockServer, context: &InMemoryPricingContext) -> ConfigResolver {
        ConfigResolver::new(
            Arc::new(HttpConfigFetcher::new(server.uri(), 2000).unwrap()),
            Arc::new(context.clone()),
            Arc::new(SchemaRegistry::builtin()),
        )
    }

    #[tokio::test]
    async fn remote_document_is_resolved_and_cached() {
        let server = serve(200, Some(active_document())).await;
        let context = InMemoryPricingContext::new();

        let resolution = resolver(&server, &context).resolve(&service_id()).await;
        assert_eq!(resolution.tier(), ConfigTier::Remote);
        assert_eq!(resolution.config().core().worker_rate, Decimal::from(225));
        assert_eq!(resolution.config().core().hourly_rate, Decimal::from(125));
        assert_eq!(context.cached_pricing_for_service(&service_id()).unwrap().version, 12);
    }

    #[tokio::test]
    async fn server_error_falls_through_to_cache() {
        let server = serve(500, None).await;
        let mut rates = RateTree::default();
        rates.core_rates.worker_rate = Some(Decimal::from(205));
        let context = InMemoryPricingContext::with_configs([
            ServiceConfig::active(service_id(), 11, rates).deactivated(),
        ]);

        let resolution = resolver(&server, &context).resolve(&service_id()).await;
        assert_eq!(resolution.tier(), ConfigTier::Cached);
        assert!(resolution.fetch_failed());
        assert!(resolution.is_degraded());
        assert_eq!(resolution.config().core().worker_rate, Decimal::from(205));
    }

    #[tokio::test]
    async fn not_found_without_cache_is_static() {
        let server = serve(404, None).await;
        let context = InMemoryPricingContext::new();

        let resolution = resolver(&server, &context).resolve(&service_id()).await;
        assert_eq!(resolution.tier(), ConfigTier::Static);
        assert!(!resolution.fetch_failed());
        assert!(context.is_empty());
    }
}
