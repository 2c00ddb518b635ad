/// API Routes definition

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::store::TvlStore;

pub fn create_router(store: Arc<TvlStore>, enable_cors: bool) -> Router {
    let mut app = Router::new()
        .route("/tvl/:protocol", get(handlers::get_tvl))
        .route("/health", get(handlers::health_check))
        .with_state(store)
        // Add tracing middleware
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        app = app.layer(CorsLayer::permissive());
    }

    app
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::core::TvlPoint;

    fn router() -> Router {
        let mut store = TvlStore::default();
        store.insert(
            "Minswap",
            vec![
                TvlPoint { timestamp: "2024-01-01".to_string(), tvl: 100.0 },
                TvlPoint { timestamp: "2024-01-02".to_string(), tvl: 150.0 },
            ],
        );
        create_router(Arc::new(store), false)
    }

    async fn get(router: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_get_tvl_case_insensitive() {
        let (status, body) = get(router(), "/tvl/minswap").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!([
                {"timestamp": "2024-01-01", "tvl": 100.0},
                {"timestamp": "2024-01-02", "tvl": 150.0}
            ])
        );

        let (status, _) = get(router(), "/tvl/MinSwap").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_protocol_returns_error_object() {
        let (status, body) = get(router(), "/tvl/liqwid").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"], "No TVL data found");
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get(router(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["protocols"], 1);
    }
}
