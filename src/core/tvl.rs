/// TVL data model and the HTTP source that serves it
///
/// The endpoint contract is `GET {endpoint}/tvl/{protocol_lowercase}` returning
/// a JSON array of `{ "timestamp": string, "tvl": number }`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::FetchError;

/// One observation of a protocol's locked value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TvlPoint {
    /// Opaque label, never parsed as a date
    pub timestamp: String,
    pub tvl: f64,
}

/// Ordered points exactly as received from the endpoint
pub type ProtocolSeries = Vec<TvlPoint>;

/// Request path for a protocol display name
pub fn request_path(protocol: &str) -> String {
    format!("/tvl/{}", protocol.to_lowercase())
}

/// Decode a response body, keeping "not JSON" apart from "wrong JSON"
pub fn parse_series(body: &[u8]) -> std::result::Result<ProtocolSeries, FetchError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(FetchError::MalformedJson)?;

    serde_json::from_value(value).map_err(FetchError::UnexpectedShape)
}

/// Fetched series as a single JSON object keyed by protocol name
pub fn series_report(fetched: &[(String, ProtocolSeries)]) -> serde_json::Result<serde_json::Value> {
    let mut report = serde_json::Map::new();
    for (protocol, series) in fetched {
        report.insert(protocol.clone(), serde_json::to_value(series)?);
    }
    Ok(serde_json::Value::Object(report))
}

/// Anything that can produce the TVL history of a protocol
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TvlSource: Send + Sync {
    async fn fetch_series(&self, protocol: &str) -> std::result::Result<ProtocolSeries, FetchError>;
}

/// Reads series from the TVL HTTP endpoint
#[derive(Clone)]
pub struct HttpTvlSource {
    client: Client,
    endpoint: String,
}

impl HttpTvlSource {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn url_for(&self, protocol: &str) -> String {
        format!("{}{}", self.endpoint, request_path(protocol))
    }
}

#[async_trait]
impl TvlSource for HttpTvlSource {
    async fn fetch_series(&self, protocol: &str) -> std::result::Result<ProtocolSeries, FetchError> {
        let url = self.url_for(protocol);
        tracing::debug!(%url, "fetching TVL series");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| FetchError::Transport { url: url.clone(), source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Transport { url: url.clone(), source })?;

        let series = parse_series(&body)?;
        tracing::debug!(%url, points = series.len(), "TVL series received");
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_path_lowercases_only() {
        assert_eq!(request_path("Minswap"), "/tvl/minswap");
        assert_eq!(request_path("INDIGO"), "/tvl/indigo");
        assert_eq!(request_path("Liqwid Finance"), "/tvl/liqwid finance");
        assert_eq!(request_path(""), "/tvl/");
    }

    #[test]
    fn test_url_joins_endpoint_without_double_slash() {
        let source = HttpTvlSource::new("http://localhost:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(source.endpoint(), "http://localhost:8000");
        assert_eq!(source.url_for("Minswap"), "http://localhost:8000/tvl/minswap");
    }

    #[test]
    fn test_parse_series_keeps_order() {
        let body = br#"[{"timestamp":"2024-01-02","tvl":150},{"timestamp":"2024-01-01","tvl":100}]"#;
        let series = parse_series(body).unwrap();
        assert_eq!(
            series,
            vec![
                TvlPoint { timestamp: "2024-01-02".to_string(), tvl: 150.0 },
                TvlPoint { timestamp: "2024-01-01".to_string(), tvl: 100.0 },
            ]
        );
    }

    #[test]
    fn test_parse_series_error_kinds() {
        assert!(matches!(parse_series(b"<html>"), Err(FetchError::MalformedJson(_))));
        assert!(matches!(
            parse_series(br#"{"error":"No TVL data found"}"#),
            Err(FetchError::UnexpectedShape(_))
        ));
        assert!(matches!(
            parse_series(br#"[{"timestamp":"2024-01-01"}]"#),
            Err(FetchError::UnexpectedShape(_))
        ));
    }

    #[test]
    fn test_series_report_is_one_document() {
        let fetched = vec![
            ("Minswap".to_string(), vec![TvlPoint { timestamp: "2024-01-01".to_string(), tvl: 100.0 }]),
            ("Indigo".to_string(), Vec::new()),
        ];

        let report = series_report(&fetched).unwrap();
        let text = serde_json::to_string_pretty(&report).unwrap();
        let reparsed: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(reparsed, report);
        assert_eq!(report["Minswap"][0]["timestamp"], "2024-01-01");
        assert_eq!(report["Minswap"][0]["tvl"], 100.0);
        assert_eq!(report["Indigo"], serde_json::json!([]));
        assert_eq!(series_report(&[]).unwrap(), serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        // Port 9 (discard) is closed on any sane test host
        let source = HttpTvlSource::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = source.fetch_series("Minswap").await.unwrap_err();
        assert_eq!(err.kind(), "network error");
    }
}
