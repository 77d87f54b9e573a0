//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID, domain culture)
//! - Bind server to listener
//! - Apply configuration updates by swapping the resolver

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::Extension,
    http::Request,
    middleware,
    routing::{any, get},
    Json, Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::culture::{DomainCulture, Resolver, WhitelistError};
use crate::http::middleware::{domain_culture_middleware, SharedResolver};
use crate::http::request::{MakeRequestUuid, X_REQUEST_ID};
use crate::observability::metrics;

/// HTTP server exposing the resolved domain culture.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
    resolver: SharedResolver,
}

impl HttpServer {
    /// Create a new HTTP server. Fails if the whitelist is unusable.
    pub fn new(config: AppConfig) -> Result<Self, WhitelistError> {
        let resolver = Resolver::from_config(&config.culture)?;
        metrics::record_whitelist_size(resolver.index().len());

        let resolver: SharedResolver = Arc::new(ArcSwap::from_pointee(resolver));
        let router = Self::build_router(&config, resolver.clone());
        Ok(Self {
            router,
            config,
            resolver,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, resolver: SharedResolver) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/", any(domain_culture_handler))
            .route("/{*path}", any(domain_culture_handler))
            .layer(middleware::from_fn_with_state(resolver, domain_culture_middleware))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get(X_REQUEST_ID)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id
                )
            }))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server until `shutdown` fires.
    ///
    /// Every config received on `config_updates` rebuilds the resolver; only
    /// the `[culture]` table takes effect without a restart.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<AppConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            domains = self.resolver.load().index().len(),
            "HTTP server starting"
        );

        let resolver = self.resolver.clone();
        let reloader = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                // Errors are logged and counted inside apply_config.
                let _ = apply_config(&resolver, &config);
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                if shutdown.recv().await.is_err() {
                    tracing::debug!("Shutdown sender dropped");
                }
                tracing::info!("Shutdown signal received");
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The router, for embedding or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Handle to the live resolver.
    pub fn resolver(&self) -> SharedResolver {
        self.resolver.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

/// Build a resolver from `config` and publish it.
///
/// Requests already holding the previous resolver finish with it. On error the
/// current resolver stays in place.
pub fn apply_config(resolver: &SharedResolver, config: &AppConfig) -> Result<(), WhitelistError> {
    match Resolver::from_config(&config.culture) {
        Ok(next) => {
            let domains = next.index().len();
            resolver.store(Arc::new(next));
            metrics::record_config_reload("applied");
            metrics::record_whitelist_size(domains);
            tracing::info!(domains, "Domain culture configuration reloaded");
            Ok(())
        }
        Err(e) => {
            metrics::record_config_reload("rejected");
            tracing::error!(error = %e, "Rejected domain culture configuration, keeping current");
            Err(e)
        }
    }
}

/// Echo the resolved domain culture as JSON.
async fn domain_culture_handler(
    Extension(domain_culture): Extension<DomainCulture>,
) -> Json<DomainCulture> {
    Json(domain_culture)
}

async fn health_handler() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DomainSettings;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    fn config() -> AppConfig {
        let mut config = AppConfig::default();
        config.culture.default = "com".into();
        config.culture.white_list.insert(
            "com".into(),
            DomainSettings::new(
                ["en-AU", "en-GB", "en-IE", "en-US", "es-MX", "fr-CA"],
                "en-US",
            ),
        );
        config
            .culture
            .white_list
            .insert("commx".into(), DomainSettings::new(["es-MX", "en-US"], "es-MX"));
        config
    }

    async fn get_json(router: Router, request: Request<Body>) -> (StatusCode, DomainCulture) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_handler_echoes_header_resolution() {
        let server = HttpServer::new(config()).unwrap();
        let request = Request::builder()
            .uri("/catalog/items")
            .header("domain", "COM")
            .header("accept-language", "da, fr-CA;q=0.8, en;q=0.7")
            .body(Body::empty())
            .unwrap();

        let (status, body) = get_json(server.router(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.domain, "com");
        assert_eq!(body.culture, "fr-CA");
        assert_eq!(body.language, "fr");
        assert_eq!(body.accept_language, "da, fr-CA;q=0.8, en;q=0.7");
    }

    #[tokio::test]
    async fn test_handler_uses_query_params() {
        let server = HttpServer::new(config()).unwrap();
        let request = Request::builder()
            .method("POST")
            .uri("/?domain=commx&culture=en-US")
            .body(Body::empty())
            .unwrap();

        let (_, body) = get_json(server.router(), request).await;
        assert_eq!(body.domain, "commx");
        assert_eq!(body.culture, "en-US");
        assert_eq!(body.accept_language, "en-US, en, *");
    }

    #[tokio::test]
    async fn test_json_uses_camel_case() {
        let server = HttpServer::new(config()).unwrap();
        let response = server
            .router()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "domain": "com",
                "culture": "en-US",
                "language": "en",
                "acceptLanguage": "en-US, en, *",
            })
        );
    }

    #[tokio::test]
    async fn test_request_id_generated_and_propagated() {
        let server = HttpServer::new(config()).unwrap();

        let response = server
            .router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(X_REQUEST_ID));

        let response = server
            .router()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(X_REQUEST_ID, "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()[X_REQUEST_ID], "abc-123");
    }

    #[tokio::test]
    async fn test_apply_config_swaps_resolver() {
        let server = HttpServer::new(config()).unwrap();

        let mut updated = config();
        updated.culture.default = "commx".into();
        apply_config(&server.resolver(), &updated).unwrap();

        let (_, body) = get_json(
            server.router(),
            Request::builder().uri("/").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(body.domain, "commx");
        assert_eq!(body.culture, "es-MX");
    }

    #[tokio::test]
    async fn test_apply_config_keeps_current_on_error() {
        let server = HttpServer::new(config()).unwrap();

        let mut broken = config();
        broken.culture.default = "missing".into();
        assert_eq!(
            apply_config(&server.resolver(), &broken),
            Err(WhitelistError::UnknownDefaultDomain("missing".into()))
        );
        assert_eq!(server.resolver().load().index().default_domain(), "com");
    }

    #[test]
    fn test_new_rejects_invalid_whitelist() {
        assert!(matches!(
            HttpServer::new(AppConfig::default()),
            Err(WhitelistError::EmptyWhitelist)
        ));
    }
}
