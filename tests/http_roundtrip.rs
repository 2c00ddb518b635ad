#![cfg(feature = "server")]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use dada_dash::core::{ApplyOutcome, ChartPanel, HttpTvlSource, TvlPoint, TvlSource};
use dada_dash::screens::Dashboard;
use dada_dash::server::{create_router, TvlStore};

async fn spawn_server(store: TvlStore) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_router(Arc::new(store), false);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn minswap_store() -> TvlStore {
    let mut store = TvlStore::default();
    store.insert(
        "minswap",
        vec![
            TvlPoint { timestamp: "2024-01-01".to_string(), tvl: 100.0 },
            TvlPoint { timestamp: "2024-01-02".to_string(), tvl: 150.0 },
        ],
    );
    store
}

#[tokio::test]
async fn fetches_series_through_http() {
    let addr = spawn_server(minswap_store()).await;
    let source = HttpTvlSource::new(&format!("http://{}", addr), Duration::from_secs(5)).unwrap();

    let mut panel = ChartPanel::new("Minswap");
    assert_eq!(panel.refresh(&source).await, ApplyOutcome::Replaced(2));
    assert_eq!(panel.series()[1].tvl, 150.0);
    assert_eq!(panel.series()[1].timestamp, "2024-01-02");
}

#[tokio::test]
async fn missing_protocol_keeps_empty_series() {
    let addr = spawn_server(minswap_store()).await;
    let source = HttpTvlSource::new(&format!("http://{}", addr), Duration::from_secs(5)).unwrap();

    // The error object is valid JSON but not a series
    let err = source.fetch_series("Indigo").await.unwrap_err();
    assert_eq!(err.kind(), "unexpected shape");

    let mut panel = ChartPanel::new("Indigo");
    assert_eq!(panel.refresh(&source).await, ApplyOutcome::Failed);
    assert!(panel.series().is_empty());
}

#[tokio::test]
async fn dashboard_panels_succeed_and_fail_independently() {
    let addr = spawn_server(minswap_store()).await;
    let source = HttpTvlSource::new(&format!("http://{}", addr), Duration::from_secs(5)).unwrap();

    let mut dashboard = Dashboard::new(&["Minswap".to_string(), "Indigo".to_string()]);
    for (index, ticket) in dashboard.mount() {
        let result = source.fetch_series(&ticket.protocol).await;
        dashboard.apply(index, &ticket, result);
    }

    let panels = dashboard.panels();
    assert_eq!(panels.len(), 2);
    assert_eq!(panels[0].series().len(), 2);
    assert!(panels[0].last_error().is_none());
    assert!(panels[1].series().is_empty());
    assert!(panels[1].last_error().is_some());
}
