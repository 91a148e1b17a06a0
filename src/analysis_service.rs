use std::sync::Arc;
use stockscope::prelude::*;
use stockscope::Timer;

#[derive(Debug)]
pub enum ServiceError {
    Source(SourceError),
    Analysis(AnalysisError),
}

impl From<SourceError> for ServiceError {
    fn from(error: SourceError) -> Self {
        ServiceError::Source(error)
    }
}

impl From<AnalysisError> for ServiceError {
    fn from(error: AnalysisError) -> Self {
        ServiceError::Analysis(error)
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::Source(e) => write!(f, "{}", e),
            ServiceError::Analysis(e) => write!(f, "{}", e),
        }
    }
}

/// Runs fetch then analyze for one request. Holds no per-request state.
pub struct AnalysisService {
    source: Arc<dyn PriceSource>,
}

impl AnalysisService {
    pub fn new(source: Arc<dyn PriceSource>) -> Self {
        Self { source }
    }

    pub async fn history(&self, request: &HistoryRequest) -> Result<PriceSeries, ServiceError> {
        let series = self.source.fetch_history(request).await?;
        tracing::info!(
            ticker = %request.ticker,
            source = self.source.name(),
            records = series.len(),
            "Fetched price history"
        );
        Ok(series)
    }

    pub async fn analyze(&self, request: &HistoryRequest) -> Result<AnalysisReport, ServiceError> {
        let series = self.history(request).await?;

        let timer = Timer::start("Analysis");
        let report = build_report(&series)?;
        tracing::debug!(elapsed_ms = timer.elapsed_ms(), "Built analysis report");

        Ok(report)
    }
}
