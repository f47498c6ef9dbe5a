//! # Pricing Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize the rate feed and auth backend adapters
//! - Create the rate service and route guard
//! - Start the HTTP server

mod config;

use opentelemetry::global;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pricing_hex::{
    RateService,
    inbound::{CurrencyResolver, HttpServer, RateLimiterState, RouteGuard},
    outbound::{HostedAuth, OpenErApiFeed},
};

fn init_tracer() -> anyhow::Result<(sdktrace::Tracer, sdktrace::SdkTracerProvider)> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    // Use gRPC exporter with batch processing (non-blocking)
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()?;

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    global::set_tracer_provider(provider.clone());

    use opentelemetry::trace::TracerProvider as _;
    Ok((provider.tracer("pricing-service"), provider))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Export spans only when a collector is configured
    let otel = match std::env::var_os("OTEL_EXPORTER_OTLP_ENDPOINT") {
        Some(_) => Some(init_tracer()?),
        None => None,
    };
    let (telemetry, otel_provider) = match otel {
        Some((tracer, provider)) => (
            Some(tracing_opentelemetry::layer().with_tracer(tracer)),
            Some(provider),
        ),
        None => (None, None),
    };

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,pricing_app=debug,pricing_hex=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(telemetry)
        .init();

    // Load configuration
    let config = config::Config::from_env()?;

    tracing::info!("Starting pricing server on port {}", config.port);
    tracing::info!(
        upstream = %config.rates_upstream_url,
        revalidate_secs = config.rates_revalidate.as_secs(),
        "Using rate feed"
    );

    let feed = OpenErApiFeed::new(&config.rates_upstream_url, config.rates_timeout)?;
    let service = RateService::with_revalidate(feed, config.rates_revalidate);

    let auth = HostedAuth::new(
        &config.auth_backend_url,
        &config.auth_backend_key,
        config.auth_timeout,
    )?;
    let guard = RouteGuard::with_session_cookie(auth, &config.session_cookie);

    // Create and run the HTTP server
    let limiter = RateLimiterState::new(config.rates_rate_limit_per_minute)
        .with_trusted_proxies(config.trusted_proxies);
    let mut server = HttpServer::new(service, guard)
        .with_rate_limiter(limiter)
        .with_resolver(CurrencyResolver::new(config.geo_country_headers));
    if let Some(dir) = config.site_dir {
        tracing::info!(dir = %dir.display(), "Serving site files");
        server = server.with_site_dir(dir);
    }
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    // Ensure traces are flushed before exit
    if let Some(provider) = otel_provider {
        let _ = provider.shutdown();
    }
    Ok(())
}
