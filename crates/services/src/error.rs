#[derive(Debug, Clone, thiserror::Error)]
pub enum ServiceError {
    #[error("Backend request failed: {0}")]
    Backend(String),
}
