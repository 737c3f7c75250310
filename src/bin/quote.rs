//! Command-line quoting tool.
//!
//! Resolves the pricing configuration of a service, prices a quote request
//! and prints the result as JSON.

use anyhow::{Context, bail};
use clap::Parser;
use service_quote::application::services::{ConfigResolver, QuoteAggregator};
use service_quote::domain::entities::{QuoteRequest, SchemaRegistry, ServiceConfig};
use service_quote::domain::value_objects::{Frequency, ServiceId};
use service_quote::infrastructure::config_source::{
    ConfigFetcher, HttpConfigFetcher, InMemoryConfigFetcher, InMemoryPricingContext,
};
use service_quote::infrastructure::logging::init_logging;
use service_quote::infrastructure::settings::EngineSettings;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "quote")]
#[command(about = "Price a commercial service quote")]
struct Args {
    /// Service to quote, e.g. power_washing. Defaults to the request's service.
    #[arg(short, long)]
    service: Option<String>,

    /// Quote request JSON; without it the service's default form is priced
    #[arg(short, long)]
    request: Option<PathBuf>,

    /// Settings file (TOML, JSON or YAML)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Do not contact the config service
    #[arg(long)]
    offline: bool,

    /// Service config JSON preloaded into the pricing context cache
    #[arg(long)]
    cached_config: Option<PathBuf>,

    /// Visit frequency, e.g. weekly, quarterly, one-time
    #[arg(short, long)]
    frequency: Option<Frequency>,

    /// Contract length in months
    #[arg(short = 'm', long)]
    contract_months: Option<u32>,

    /// Waive the trip charge
    #[arg(long)]
    all_inclusive: bool,

    /// Print single-line JSON
    #[arg(long)]
    compact: bool,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

fn build_fetcher(args: &Args, settings: &EngineSettings) -> anyhow::Result<Arc<dyn ConfigFetcher>> {
    match (&settings.config_service.base_url, args.offline) {
        (Some(base_url), false) => Ok(Arc::new(HttpConfigFetcher::new(
            base_url.as_str(),
            settings.config_service.timeout_ms,
        )?)),
        _ => {
            tracing::info!("running offline, config service not contacted");
            Ok(Arc::new(InMemoryConfigFetcher::new()))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let settings = EngineSettings::load(args.settings.as_deref())?;
    init_logging(&settings.logging)?;

    let request: Option<QuoteRequest> = args
        .request
        .as_deref()
        .map(read_json::<QuoteRequest>)
        .transpose()?;
    let service_id = match (&args.service, &request) {
        (Some(service), Some(request)) if ServiceId::new(service) != *request.service_id() => {
            bail!(
                "--service {} does not match the request's service {}",
                service,
                request.service_id()
            )
        }
        (Some(service), _) => ServiceId::new(service),
        (None, Some(request)) => request.service_id().clone(),
        (None, None) => bail!("either --service or --request is required"),
    };

    let context = match args.cached_config.as_deref() {
        Some(path) => {
            let cached: ServiceConfig = read_json(path)?;
            InMemoryPricingContext::with_configs([cached])
        }
        None => InMemoryPricingContext::new(),
    };

    let resolver = ConfigResolver::new(
        build_fetcher(&args, &settings)?,
        Arc::new(context),
        Arc::new(SchemaRegistry::builtin()),
    );
    let resolution = resolver.resolve(&service_id).await;
    let config = resolution.config();
    if resolution.is_degraded() {
        tracing::warn!(
            service_id = %service_id,
            tier = %resolution.tier(),
            "pricing may be stale"
        );
    }

    let mut request = match request {
        Some(mut request) => {
            let cleared = request.apply_config(config, resolution.clears_custom_overrides());
            if cleared > 0 {
                tracing::info!(
                    service_id = %service_id,
                    cleared,
                    "custom amounts cleared by fresh config"
                );
            }
            request
        }
        None => QuoteRequest::from_schema(resolution.schema(), config)
            .with_terms(settings.quoting.default_terms()),
    };
    if let Some(frequency) = args.frequency {
        request.terms_mut().frequency = frequency;
    }
    if let Some(months) = args.contract_months {
        request.terms_mut().contract_months = Some(months);
    }
    if args.all_inclusive {
        request.set_all_inclusive(true);
    }

    let result = QuoteAggregator::new().aggregate(&request, config);
    let output = if args.compact {
        serde_json::to_string(&result)?
    } else {
        serde_json::to_string_pretty(&result)?
    };
    println!("{output}");
    Ok(())
}
