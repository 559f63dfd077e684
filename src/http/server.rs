//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, limits, metrics, sessions)
//! - Apply configuration reloads to the running server
//! - Purge expired sessions in the background
//! - Serve until shutdown is triggered or a signal arrives

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::FromRef,
    middleware,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{AppConfig, SharedConfig};
use crate::http::handlers;
use crate::http::templates::Templates;
use crate::lifecycle::signals;
use crate::observability::metrics;
use crate::session::{session_middleware, MemoryStore, SessionStore};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: SharedConfig,
    pub sessions: Arc<dyn SessionStore>,
    pub templates: Templates,
}

impl FromRef<AppState> for SharedConfig {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Templates {
    fn from_ref(state: &AppState) -> Self {
        state.templates.clone()
    }
}

/// HTTP server for the application.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a server backed by an in-memory session store.
    pub fn new(config: AppConfig) -> Result<Self, tera::Error> {
        let ttl = config.session.store_ttl();
        Self::with_store(config, Arc::new(MemoryStore::new(ttl)))
    }

    /// Create a server with a caller-provided session store.
    pub fn with_store(config: AppConfig, sessions: Arc<dyn SessionStore>) -> Result<Self, tera::Error> {
        let templates = Templates::from_config(&config.templates)?;
        let state = AppState {
            config: SharedConfig::new(config),
            sessions,
            templates,
        };

        let router = Self::build_router(state.clone());
        Ok(Self { router, state })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Body limit and timeout are fixed at startup; reloads do not change them.
    #[allow(deprecated)]
    fn build_router(state: AppState) -> Router {
        let config = state.config.load();

        Router::new()
            .route("/", get(handlers::hello_world))
            .route("/pretty", get(handlers::pretty_hello_world))
            .route("/contact", get(handlers::contact).post(handlers::contact))
            .route("/health", get(handlers::health))
            .route_layer(middleware::from_fn(metrics::track_metrics))
            .layer(middleware::from_fn_with_state(state.clone(), session_middleware))
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for driving the app without a listener.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Serve on `listener` until `shutdown` fires or SIGINT/SIGTERM arrives.
    ///
    /// Configs received on `config_updates` replace the live configuration.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<AppConfig>,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let live_config = self.state.config.clone();
        let updater = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                if config.forms.csrf_tokens <= 0 {
                    tracing::warn!(
                        csrf_tokens = config.forms.csrf_tokens,
                        "Reloaded csrf_tokens retains no tokens; protected forms will always fail"
                    );
                }
                tracing::info!(csrf_tokens = config.forms.csrf_tokens, "Applying reloaded configuration");
                live_config.store(config);
            }
        });

        let sessions = self.state.sessions.clone();
        let purge_every = Duration::from_secs(self.state.config.load().session.purge_interval_secs.max(1));
        let purger = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(purge_every);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let purged = sessions.purge_expired();
                if purged > 0 {
                    tracing::debug!(purged, "Purged expired sessions");
                }
            }
        });

        let result = axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await;

        updater.abort();
        purger.abort();

        tracing::info!("HTTP server stopped");
        result
    }
}

/// Wait for an explicit trigger or an OS signal.
///
/// A closed trigger channel leaves only OS signals.
async fn shutdown_signal(mut shutdown: broadcast::Receiver<()>) {
    let requested = async move {
        if let Err(broadcast::error::RecvError::Closed) = shutdown.recv().await {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = requested => tracing::info!("Shutdown requested"),
        _ = signals::wait_for_signal() => {}
    }
}
