//! rest-query server
//!
//! Serves an in-memory item catalogue whose list endpoint is driven by a
//! declared query model.

use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rq_core::config::AppConfig;

mod catalogue;

use catalogue::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    dotenvy::dotenv().ok();
    let config = AppConfig::from_env().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config from env: {}, using defaults", e);
        AppConfig::default()
    });

    info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.server.host,
        port = config.server.port,
        sort_by_key = config.query.sort_by_key(),
        sort_by_descending_key = config.query.sort_by_descending_key(),
        "Starting rest-query server"
    );

    let addr = config.server_addr();
    let state = AppState::new(config, catalogue::sample_items())?;
    let app = build_router(state);

    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,rq_server=debug,rq_api=debug,rq_queries=debug,tower_http=debug".into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Build the application router
fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/", get(api_root))
        .route(
            "/items",
            get(catalogue::list_items).post(catalogue::create_item),
        );

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api_routes)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// API root, advertising the query keys of the item list
async fn api_root(State(state): State<AppState>) -> Json<serde_json::Value> {
    let query = &state.config.query;
    Json(serde_json::json!({
        "_type": "Root",
        "coreVersion": env!("CARGO_PKG_VERSION"),
        "sortByKey": query.sort_by_key(),
        "sortByDescendingKey": query.sort_by_descending_key(),
        "allowedSortKeyTypes": query.allowed_sort_key_types(),
        "_links": {
            "self": { "href": "/api/v1" },
            "items": { "href": "/api/v1/items" }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use rq_core::QueryConfig;
    use tower::ServiceExt;

    fn app() -> Router {
        build_router(AppState::new(AppConfig::default(), catalogue::sample_items()).unwrap())
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn ids(body: &serde_json::Value) -> Vec<u64> {
        body["elements"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["id"].as_u64().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(app(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_api_root() {
        let (status, body) = get_json(app(), "/api/v1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["_type"], "Root");
        assert_eq!(body["sortByKey"], "sort_by");
        assert_eq!(body["sortByDescendingKey"], "sort_by_descending");
    }

    #[tokio::test]
    async fn test_list_items_filters_and_sorts() {
        let (status, body) =
            get_json(app(), "/api/v1/items?status=available&sort_by_descending=price").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["_type"], "Collection");
        assert_eq!(body["count"], 4);
        assert_eq!(ids(&body), vec![2, 4, 1, 5]);
    }

    #[tokio::test]
    async fn test_list_items_reports_rejected_elements() {
        let (status, body) = get_json(app(), "/api/v1/items?status=archived").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 5);
        assert_eq!(body["query"]["rejected"][0]["key"], "status");
    }

    #[tokio::test]
    async fn test_list_items_with_unparseable_filter_is_bad_request() {
        let (status, body) = get_json(app(), "/api/v1/items?min_price=cheap").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errorIdentifier"], "urn:rest-query:api:errors:InvalidQuery");
    }

    #[tokio::test]
    async fn test_custom_sort_keys() {
        let config = AppConfig {
            query: QueryConfig::builder()
                .sort_by_key("order")
                .sort_by_descending_key("order_desc")
                .build()
                .unwrap(),
            ..Default::default()
        };
        let app = build_router(AppState::new(config, catalogue::sample_items()).unwrap());

        let (_, body) = get_json(app, "/api/v1/items?order_desc=created_on").await;
        assert_eq!(ids(&body), vec![5, 4, 2, 1, 3]);
    }

    #[tokio::test]
    async fn test_create_item() {
        let state = AppState::new(AppConfig::default(), vec![]).unwrap();
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/items")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"name": "Bookshelf", "status": "available", "price": 75.0, "createdOn": "2024-05-02"}"#,
            ))
            .unwrap();

        let response = build_router(state.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(state.items.read().await.len(), 1);

        let (_, body) = get_json(build_router(state), "/api/v1/items").await;
        assert_eq!(body["elements"][0]["name"], "Bookshelf");
        assert_eq!(body["elements"][0]["createdOn"], "2024-05-02");
    }

    #[tokio::test]
    async fn test_create_invalid_item_is_unprocessable() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/items")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"name": "", "status": "sold", "price": -1.0}"#))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body["errors"],
            serde_json::json!([
                {"field": "name", "message": "must be 1 to 64 characters"},
                {"field": "price", "message": "must not be negative"},
                {"field": "status", "message": "must be one of: available, discontinued"},
            ])
        );
    }
}
