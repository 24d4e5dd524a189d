//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the page handler as fallback
//! - Wire up middleware (request ID, tracing, timeout, body limit, headers)
//! - Resolve each request path against the current route table
//! - Swap in new route tables as validated configs arrive
//! - Serve until shutdown, draining in-flight requests

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Method, Request, Uri},
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::validation::validate_config;
use crate::config::{AppConfig, ConfigError};
use crate::http::request::{request_id, MakeRequestUuidV4, X_REQUEST_ID};
use crate::http::response;
use crate::lifecycle::shutdown;
use crate::observability::metrics;
use crate::routing::{decode_path, RouteError, RouteTable};
use crate::views::PageShell;

/// Everything a request needs to pick and render a page.
///
/// Swapped as a unit on reload so a request never sees a new route table
/// with an old page shell.
#[derive(Debug)]
pub struct Site {
    pub routes: RouteTable,
    pub shell: PageShell,
}

impl Site {
    pub fn from_config(config: &AppConfig) -> Result<Self, RouteError> {
        Ok(Self {
            routes: RouteTable::from_config(&config.routes)?,
            shell: PageShell::from(&config.app),
        })
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub site: Arc<ArcSwap<Site>>,
}

/// HTTP server serving the application's views.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
    site: Arc<ArcSwap<Site>>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// The configuration is validated first, so values that would break every
    /// request (a zero timeout or body limit) are rejected up front.
    pub fn new(config: AppConfig) -> Result<Self, ConfigError> {
        validate_config(&config).map_err(ConfigError::Validation)?;
        let site = Arc::new(ArcSwap::from_pointee(Site::from_config(&config)?));
        let state = AppState { site: site.clone() };
        let router = Self::build_router(&config, state);

        Ok(Self {
            router,
            config,
            site,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        let mut router = Router::new().fallback(page_handler).with_state(state);

        if config.security.enable_headers {
            router = router
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::REFERRER_POLICY,
                    HeaderValue::from_static("same-origin"),
                ));
        }

        router.layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4))
                .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        method = %req.method(),
                        path = %req.uri().path(),
                        request_id = %request_id(req),
                    )
                }))
                .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
                // Timeout must sit inside the body limit: it needs a `Default` response body.
                .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
                .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
        )
    }

    /// The fully layered service, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Rebuild the route table and page shell from `config` and swap them in.
    ///
    /// On error the current site keeps serving.
    pub fn reload(&self, config: &AppConfig) -> Result<(), ConfigError> {
        apply_config(&self.site, config)
    }

    /// Snapshot of the site currently being served.
    pub fn site(&self) -> Arc<Site> {
        self.site.load_full()
    }

    /// Get a reference to the startup config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run the server until `shutdown` fires.
    ///
    /// Configs received on `config_updates` are applied as they arrive.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<AppConfig>,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.site.load().routes.len(),
            "HTTP server starting"
        );

        let site = self.site.clone();
        let reloader = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                if let Err(e) = apply_config(&site, &config) {
                    tracing::error!(error = %e, "Rejected config update, keeping current routes");
                }
            }
        });

        let grace = Duration::from_secs(self.config.timeouts.shutdown_secs);
        let drain_deadline = {
            let rx = shutdown.resubscribe();
            async move {
                shutdown::wait(rx).await;
                tokio::time::sleep(grace).await;
            }
        };

        let serve = axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .into_future();

        let result = tokio::select! {
            res = serve => res,
            _ = drain_deadline => {
                tracing::warn!(grace_secs = grace.as_secs(), "In-flight requests did not drain in time");
                Ok(())
            }
        };

        reloader.abort();
        tracing::info!("HTTP server stopped");
        result
    }
}

fn apply_config(site: &ArcSwap<Site>, config: &AppConfig) -> Result<(), ConfigError> {
    let built = validate_config(config)
        .map_err(ConfigError::Validation)
        .and_then(|()| Site::from_config(config).map_err(ConfigError::from));
    match built {
        Ok(new_site) => {
            tracing::info!(routes = new_site.routes.len(), "Route table reloaded");
            site.store(Arc::new(new_site));
            metrics::record_reload(true);
            Ok(())
        }
        Err(e) => {
            metrics::record_reload(false);
            Err(e)
        }
    }
}

/// Resolve the request path to a view and render it.
async fn page_handler(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    let start = Instant::now();
    let site = state.site.load();
    let path = uri.path();

    let Some(route) = site.routes.resolve(&decode_path(path)) else {
        tracing::debug!(path = %path, "No route matched");
        metrics::record_request("none", 404, start);
        return response::not_found(path);
    };
    let view = route.view;

    if method != Method::GET && method != Method::HEAD {
        tracing::debug!(method = %method, view = %view, "Method not allowed");
        metrics::record_request(view.slug(), 405, start);
        return response::method_not_allowed();
    }

    tracing::debug!(view = %view, pattern = %route.pattern, "Rendering view");
    let html = view.render(&site.shell);
    metrics::record_request(view.slug(), 200, start);
    response::page(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RouteConfig;
    use crate::routing::View;

    #[test]
    fn test_reload_swaps_routes() {
        let server = HttpServer::new(AppConfig::default()).unwrap();
        assert!(server.site().routes.resolve("/workouts").is_none());

        let mut config = AppConfig::default();
        config.routes.insert(0, RouteConfig::new("/workouts", View::NewExercise));
        server.reload(&config).unwrap();

        let site = server.site();
        assert_eq!(site.routes.resolve("/workouts").map(|r| r.view), Some(View::NewExercise));
    }

    #[test]
    fn test_invalid_reload_keeps_current_site() {
        let server = HttpServer::new(AppConfig::default()).unwrap();

        let mut config = AppConfig::default();
        config.routes.push(RouteConfig::new("/", View::NewExercise));
        assert!(server.reload(&config).is_err());

        assert_eq!(server.site().routes.len(), 2);
        assert_eq!(server.site().routes.resolve("/").map(|r| r.view), Some(View::Home));
    }

    #[test]
    fn test_new_rejects_bad_routes() {
        let mut config = AppConfig::default();
        config.routes = vec![RouteConfig::new("home", View::Home)];
        assert!(HttpServer::new(config).is_err());
    }

    #[test]
    fn test_new_rejects_values_that_break_every_request() {
        let mut config = AppConfig::default();
        config.timeouts.request_secs = 0;
        config.security.max_body_size = 0;

        match HttpServer::new(config) {
            Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 2),
            Err(other) => panic!("expected validation error, got {other}"),
            Ok(_) => panic!("zero timeout and body limit should be rejected"),
        }
    }

    #[test]
    fn test_reload_is_validated() {
        let server = HttpServer::new(AppConfig::default()).unwrap();

        let mut config = AppConfig::default();
        config.routes.insert(0, RouteConfig::new("/workouts", View::NewExercise));
        config.timeouts.request_secs = 0;
        assert!(matches!(server.reload(&config), Err(ConfigError::Validation(_))));
        assert!(server.site().routes.resolve("/workouts").is_none());
    }
}
