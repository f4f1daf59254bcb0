use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
    #[error("Metrics error: {0}")]
    Metrics(#[from] crate::engine::MetricsError),
    #[error("Ingestion error: {0}")]
    Ingest(#[from] crate::datasource::IngestError),
    #[error("Report error: {0}")]
    Report(#[from] crate::report::ReportError),
}
