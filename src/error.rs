use thiserror::Error;

#[derive(Debug, Error)]
pub enum YarnError {
    #[error("no compatible GPU adapter found")]
    GpuNotAvailable,

    #[error("device request failed: {0}")]
    DeviceRequest(String),

    #[error("buffer mapping failed: {0}")]
    BufferMapping(String),

    #[error("invalid strand config: {0}")]
    InvalidConfig(String),

    #[error("failed to read config: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("generation engine has stopped")]
    EngineStopped,
}

pub type Result<T> = std::result::Result<T, YarnError>;
