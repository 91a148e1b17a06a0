use crate::analysis_service::{AnalysisService, ServiceError};
use crate::config::AppConfig;
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use stockscope::prelude::*;
use tracing::{debug, info, instrument, warn};

pub type SharedService = Arc<AnalysisService>;
pub type SharedConfig = Arc<AppConfig>;

/// Optional query string shared by the history and analysis endpoints
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub start: Option<String>,
    pub end: Option<String>,
    pub interval: Option<String>,
}

impl HistoryQuery {
    fn to_request(&self, ticker: &str, config: &AppConfig) -> Result<HistoryRequest, RequestError> {
        let start = match &self.start {
            Some(value) => stockscope::models::parse_date(value)?,
            None => config.default_start,
        };
        let end = match &self.end {
            Some(value) => stockscope::models::parse_date(value)?,
            None => config.default_end,
        };
        let interval = match &self.interval {
            Some(value) => value.parse()?,
            None => Interval::Daily,
        };
        HistoryRequest::new(ticker, start, end, interval)
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServiceError::Source(SourceError::NoData(_)) => StatusCode::NOT_FOUND,
            ServiceError::Source(SourceError::UnsupportedInterval { .. }) => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::Source(_) => StatusCode::BAD_GATEWAY,
            ServiceError::Analysis(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        warn!(%status, error = %self, "Request failed");
        error_response(status, self.to_string())
    }
}

pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

#[instrument(skip(service, config, query))]
pub async fn analysis_handler(
    State(service): State<SharedService>,
    State(config): State<SharedConfig>,
    Path(ticker): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Response {
    debug!(?query, "Received analysis request");

    let request = match query.to_request(&ticker, &config) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Rejected analysis request");
            return error_response(StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    match service.analyze(&request).await {
        Ok(report) => {
            info!(
                ticker = %report.ticker,
                records = report.record_count,
                slope = report.trend.slope,
                "Returning analysis report"
            );
            (StatusCode::OK, Json(report)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

#[instrument(skip(service, config, query))]
pub async fn history_handler(
    State(service): State<SharedService>,
    State(config): State<SharedConfig>,
    Path(ticker): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Response {
    debug!(?query, "Received history request");

    let request = match query.to_request(&ticker, &config) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Rejected history request");
            return error_response(StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    match service.history(&request).await {
        Ok(series) => (StatusCode::OK, Json(series)).into_response(),
        Err(e) => e.into_response(),
    }
}
