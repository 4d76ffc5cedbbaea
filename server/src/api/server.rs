//! API server initialization

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use prometheus_client::registry::Registry;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use super::middleware;
use super::routes::{health, metrics, presence, sources};
use crate::core::CoreApp;
use crate::core::constants::PRESENCE_BODY_LIMIT;
use crate::domain::StatsCollector;

pub struct ApiServer {
    app: CoreApp,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        Self { app }
    }

    /// Returns CoreApp after graceful shutdown
    pub async fn start(self) -> Result<CoreApp> {
        let Self { app } = self;

        let shutdown = app.shutdown.clone();
        let host = app.config.server.host.clone();
        let port = app.config.server.port;

        let router = build_router(app.collector.clone(), app.registry.clone(), app.config.debug);

        let listener = TcpListener::bind((host.as_str(), port))
            .await
            .with_context(|| format!("Failed to bind {}:{}", host, port))?;
        tracing::debug!(addr = ?listener.local_addr().ok(), "Listening");

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown.wait())
        .await?;

        Ok(app)
    }
}

/// Build the full HTTP router
pub fn build_router(
    collector: Arc<StatsCollector>,
    registry: Arc<Registry>,
    debug: bool,
) -> Router {
    let presence_routes = presence::routes(collector.clone(), debug)
        .layer(DefaultBodyLimit::max(PRESENCE_BODY_LIMIT));

    Router::new()
        .merge(metrics::routes(registry))
        .nest("/api/v1/health", health::routes())
        .nest("/api/v1/presence", presence_routes)
        .nest("/api/v1/sources", sources::routes(collector))
        .fallback(middleware::handle_404)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use crate::api::StatsExposition;
    use crate::domain::stats::{DescriptorRegistry, RawStat, SourceId};

    fn test_router() -> (Router, Arc<StatsCollector>) {
        let collector = Arc::new(StatsCollector::new("jitsi_jvb", DescriptorRegistry::jvb()));
        let registry = Arc::new(StatsExposition::registry(collector.clone()));
        (build_router(collector.clone(), registry, false), collector)
    }

    fn presence_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/presence")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (router, _) = test_router();
        let response = router.oneshot(get_request("/api/v1/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_presence_accepted() {
        let (router, collector) = test_router();
        let response = router
            .oneshot(presence_request(
                r#"{"from": "jvbbrewery@internal.auth.meet.example/jvb-1",
                    "stats": [{"name": "participants", "value": "5"},
                              {"name": "version", "value": "2.3"}]}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["source"], "jvb-1");
        assert_eq!(body["stats"], 2);

        let sources = collector.sources();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].stats, 2);
        assert_eq!(sources[0].exported, 1);
    }

    #[tokio::test]
    async fn test_presence_rejects_bare_jid() {
        let (router, collector) = test_router();
        let response = router
            .oneshot(presence_request(
                r#"{"from": "jvbbrewery@internal.auth.meet.example", "stats": []}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["code"], "INVALID_JID");
        assert!(collector.sources().is_empty());
    }

    #[tokio::test]
    async fn test_presence_rejects_malformed_json() {
        let (router, _) = test_router();
        let response = router.oneshot(presence_request("{ not json")).await.unwrap();
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_metrics_after_presence() {
        let (router, _) = test_router();
        let response = router
            .clone()
            .oneshot(presence_request(
                r#"{"from": "room@muc.example/jvb-1",
                    "stats": [{"name": "conferences", "value": "3"},
                              {"name": "conference_sizes", "value": "[0,2,1]"}]}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let response = router.oneshot(get_request("/metrics")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            crate::core::constants::METRICS_CONTENT_TYPE
        );

        let body = body_string(response).await;
        assert!(body.contains("jitsi_jvb_conferences{source=\"jvb-1\"} 3"));
        assert!(body.contains("jitsi_jvb_conference_sizes_count{source=\"jvb-1\"} 3"));
        assert!(body.trim_end().ends_with("# EOF"));
    }

    #[tokio::test]
    async fn test_metrics_one_family_per_stat() {
        let (router, collector) = test_router();
        collector.push(SourceId::new("jvb-1"), vec![RawStat::new("threads", "10")]);
        collector.push(SourceId::new("jvb-2"), vec![RawStat::new("threads", "12")]);

        let response = router.oneshot(get_request("/metrics")).await.unwrap();
        let body = body_string(response).await;
        assert_eq!(body.matches("# HELP jitsi_jvb_threads").count(), 1);
        assert!(body.contains("jitsi_jvb_threads{source=\"jvb-1\"} 10"));
        assert!(body.contains("jitsi_jvb_threads{source=\"jvb-2\"} 12"));
    }

    #[tokio::test]
    async fn test_sources_listing() {
        let (router, collector) = test_router();
        collector.push(SourceId::new("b"), vec![RawStat::new("threads", "1")]);
        collector.push(SourceId::new("a"), vec![]);

        let response = router.oneshot(get_request("/api/v1/sources")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["source"], "a");
        assert_eq!(data[0]["stats"], 0);
        assert_eq!(data[1]["source"], "b");
        assert_eq!(data[1]["exported"], 1);
        assert!(data[1]["received_at"].is_string());
    }

    #[tokio::test]
    async fn test_unknown_route_returns_404() {
        let (router, _) = test_router();
        let response = router.oneshot(get_request("/nope")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
