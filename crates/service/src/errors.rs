use thiserror::Error;

/// Failures of the file-backed storage layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("read error: {0}")]
    Read(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("encode error: {0}")]
    Encode(String),
    #[error("write error: {0}")]
    Write(String),
}

impl ServiceError {
    /// True when the failure happened while loading existing data.
    pub fn is_read_side(&self) -> bool {
        matches!(self, ServiceError::Read(_) | ServiceError::Decode(_))
    }
}
