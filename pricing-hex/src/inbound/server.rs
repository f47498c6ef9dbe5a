//! HTTP Server configuration and startup.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{Router, middleware, routing::get};
use tower_http::{services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use pricing_types::{AuthBackend, RateFeed};

use super::RATES_PATH;
use super::currency::{CurrencyResolver, currency_middleware};
use super::guard::{RouteGuard, guard_middleware};
use super::handlers::{self, AppState};
use super::rate_limit::RateLimiterState;
use crate::RateService;
use crate::openapi::ApiDoc;

/// How often idle rate limiter entries are dropped.
const LIMITER_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// HTTP Server for the pricing edge.
pub struct HttpServer<F: RateFeed, A: AuthBackend> {
    service: Arc<RateService<F>>,
    resolver: Arc<CurrencyResolver>,
    guard: Arc<RouteGuard<A>>,
    rate_limiter: Arc<RateLimiterState>,
    site_dir: Option<PathBuf>,
}

impl<F: RateFeed, A: AuthBackend> HttpServer<F, A> {
    /// Creates a new HTTP server with default CDN headers and rate limiting.
    pub fn new(service: RateService<F>, guard: RouteGuard<A>) -> Self {
        Self {
            service: Arc::new(service),
            resolver: Arc::new(CurrencyResolver::default()),
            guard: Arc::new(guard),
            rate_limiter: Arc::new(RateLimiterState::default()), // 120 req/min default
            site_dir: None,
        }
    }

    /// Overrides the per-client allowance on the rates proxy.
    pub fn with_rate_limit(self, requests_per_minute: u32) -> Self {
        self.with_rate_limiter(RateLimiterState::new(requests_per_minute))
    }

    /// Replaces the rates proxy limiter, e.g. one with trusted proxies.
    pub fn with_rate_limiter(mut self, limiter: RateLimiterState) -> Self {
        self.rate_limiter = Arc::new(limiter);
        self
    }

    /// Overrides the country headers the resolver trusts.
    pub fn with_resolver(mut self, resolver: CurrencyResolver) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    /// Serves pre-rendered pages from `dir` for unmatched routes.
    pub fn with_site_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.site_dir = Some(dir.into());
        self
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        // Build HTTP metrics layer (uses globally set MeterProvider)
        let metrics = axum_otel_metrics::HttpMetricsLayerBuilder::new().build();

        let router = Router::new()
            .route("/health", get(handlers::health))
            .route(RATES_PATH, get(handlers::rates::<F>))
            .route("/api/currency", get(handlers::currency))
            .merge(SwaggerUi::new("/docs").url("/api/openapi.json", ApiDoc::openapi()));

        let router = match &self.site_dir {
            Some(dir) => router.fallback_service(ServeDir::new(dir)),
            None => router.fallback(handlers::not_found),
        };

        let state = Arc::new(AppState {
            service: self.service.clone(),
            rate_limiter: self.rate_limiter.clone(),
        });

        // Last layer added runs first: trace, currency, guard.
        router
            .layer(metrics)
            .layer(middleware::from_fn_with_state(
                self.guard.clone(),
                guard_middleware::<A>,
            ))
            .layer(middleware::from_fn_with_state(
                self.resolver.clone(),
                currency_middleware,
            ))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        let limiter = self.rate_limiter.clone();
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(LIMITER_SWEEP_INTERVAL);
            loop {
                tick.tick().await;
                limiter.retain_recent();
            }
        });

        axum::serve(
            listener,
            self.router()
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
