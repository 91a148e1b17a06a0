use crate::api::{self, SharedConfig, SharedService};
use axum::{extract::FromRef, routing::get, Router};

#[derive(Clone)]
pub struct AppState {
    pub service: SharedService,
    pub config: SharedConfig,
}

impl FromRef<AppState> for SharedService {
    fn from_ref(app_state: &AppState) -> SharedService {
        app_state.service.clone()
    }
}

impl FromRef<AppState> for SharedConfig {
    fn from_ref(app_state: &AppState) -> SharedConfig {
        app_state.config.clone()
    }
}

/// Routes without transport layers (rate limiting, CORS) so they can be
/// driven directly in tests
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(api::health_handler))
        .route("/analysis/{ticker}", get(api::analysis_handler))
        .route("/history/{ticker}", get(api::history_handler))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis_service::AnalysisService;
    use crate::config::AppConfig;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use chrono::NaiveDate;
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use stockscope::prelude::*;
    use tower::ServiceExt;

    /// Serves a fixed series regardless of the requested ticker
    struct StubSource {
        closes: Vec<f64>,
    }

    #[async_trait]
    impl PriceSource for StubSource {
        async fn fetch_history(
            &self,
            request: &HistoryRequest,
        ) -> Result<PriceSeries, SourceError> {
            if self.closes.is_empty() {
                return Err(SourceError::NoData(request.ticker.clone()));
            }
            if request.interval == Interval::Monthly {
                return Err(SourceError::UnsupportedInterval {
                    provider: "stub",
                    interval: request.interval,
                });
            }
            let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
            let records = self
                .closes
                .iter()
                .enumerate()
                .map(|(i, &c)| {
                    let date = start + chrono::Duration::days(i as i64);
                    PriceRecord::new(date, c, c + 1.0, c - 1.0, c, 100)
                })
                .collect();
            Ok(PriceSeries::new(request.ticker.clone(), records))
        }

        fn name(&self) -> &'static str {
            "stub"
        }
    }

    fn app(closes: Vec<f64>) -> Router {
        let config = AppConfig::from_yaml_str("{}").unwrap();
        router(AppState {
            service: Arc::new(AnalysisService::new(Arc::new(StubSource { closes }))),
            config: Arc::new(config),
        })
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(vec![])
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_analysis_returns_report() {
        let (status, body) = get_json(
            app(vec![100.0, 102.0, 104.0, 106.0]),
            "/analysis/msft?start=2024-01-01&end=2024-01-31",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ticker"], "MSFT");
        assert_eq!(body["record_count"], 4);
        assert!(body["returns"][0].is_null());
        assert!((body["trend"]["slope"].as_f64().unwrap() - 2.0).abs() < 1e-6);
        assert!((body["volatility"]["average_true_range"].as_f64().unwrap() - 2.0).abs() < 1e-9);
        assert_eq!(body["charts"]["candlesticks"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_history_returns_series() {
        let (status, body) = get_json(app(vec![10.0, 11.0]), "/history/AAPL").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ticker"], "AAPL");
        assert_eq!(body["records"].as_array().unwrap().len(), 2);
        assert_eq!(body["records"][0]["date"], "2024-01-01");
    }

    #[tokio::test]
    async fn test_missing_data_is_not_found() {
        let (status, body) = get_json(app(vec![]), "/analysis/MSFT").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("MSFT"));
    }

    #[tokio::test]
    async fn test_single_record_is_unprocessable() {
        let (status, _) = get_json(app(vec![100.0]), "/analysis/MSFT").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_bad_request_inputs() {
        let (status, _) = get_json(app(vec![1.0, 2.0]), "/analysis/MS%20FT").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get_json(app(vec![1.0, 2.0]), "/analysis/MSFT?start=yesterday").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get_json(app(vec![1.0, 2.0]), "/analysis/MSFT?interval=5m").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = get_json(app(vec![1.0, 2.0]), "/history/MSFT?interval=1mo").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("1mo"));
    }
}
