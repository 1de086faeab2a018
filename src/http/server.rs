//! HTTP server setup.
//!
//! # Responsibilities
//! - Put the configured gate chain in front of an application router
//! - Serve with peer addresses attached to every request
//! - Swap the guarded router when a new configuration arrives
//! - Shut down gracefully on the lifecycle broadcast

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{
    extract::{Request, State},
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceExt;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::GateServiceConfig;
use crate::gate::GateChain;

/// Application router guarded by the currently installed gate chain.
pub struct LiveRouter {
    app: Router,
    chain: ArcSwap<GateChain>,
    guarded: ArcSwap<Router>,
}

impl LiveRouter {
    pub fn new(app: Router, chain: GateChain) -> Self {
        let guarded = chain.guard(app.clone());
        Self {
            app,
            chain: ArcSwap::from_pointee(chain),
            guarded: ArcSwap::from_pointee(guarded),
        }
    }

    /// Swap in a new chain. In-flight requests finish on the old one.
    pub fn install(&self, chain: GateChain) {
        self.guarded.store(Arc::new(chain.guard(self.app.clone())));
        self.chain.store(Arc::new(chain));
    }

    pub fn chain(&self) -> Arc<GateChain> {
        self.chain.load_full()
    }

    async fn dispatch(&self, req: Request) -> Response {
        let router = Router::clone(&self.guarded.load());
        match router.oneshot(req).await {
            Ok(res) => res,
            Err(never) => match never {},
        }
    }
}

/// HTTP server guarding an application with address gates.
pub struct GateServer {
    router: Router,
    live: Arc<LiveRouter>,
    config: GateServiceConfig,
}

impl GateServer {
    /// Guard the default handler, which answers `200 OK` to everything.
    pub fn new(config: GateServiceConfig) -> Self {
        Self::with_app(config, Router::new().fallback(upstream_handler))
    }

    /// Guard an arbitrary application router.
    pub fn with_app(config: GateServiceConfig, app: Router) -> Self {
        let live = Arc::new(LiveRouter::new(app, GateChain::from_config(&config.gates)));
        let router = Self::build_router(&config, live.clone());

        tracing::info!(gates = config.gates.len(), "Gate chain installed");

        Self {
            router,
            live,
            config,
        }
    }

    #[allow(deprecated)]
    fn build_router(config: &GateServiceConfig, live: Arc<LiveRouter>) -> Router {
        Router::new()
            .fallback(live_handler)
            .with_state(live)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// Handle to the live, reloadable router.
    pub fn live(&self) -> Arc<LiveRouter> {
        self.live.clone()
    }

    pub fn config(&self) -> &GateServiceConfig {
        &self.config
    }

    /// Serve until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<GateServiceConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let live = self.live.clone();
        let bind_address = self.config.listener.bind_address.clone();
        let reloader = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                if config.listener.bind_address != bind_address {
                    tracing::warn!(
                        current = %bind_address,
                        requested = %config.listener.bind_address,
                        "Listener changes require a restart"
                    );
                }
                reload(&live, &config);
            }
        });

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                if shutdown.recv().await.is_err() {
                    tracing::warn!("Shutdown channel closed");
                }
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Replace the live chain with one built from `config`.
pub fn reload(live: &LiveRouter, config: &GateServiceConfig) {
    live.install(GateChain::from_config(&config.gates));
    tracing::info!(gates = config.gates.len(), "Gate chain reloaded");
}

async fn live_handler(State(live): State<Arc<LiveRouter>>, req: Request) -> Response {
    live.dispatch(req).await
}

async fn upstream_handler() -> &'static str {
    "OK\n"
}
