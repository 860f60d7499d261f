use thiserror::Error;

/// Everything that can go wrong between picking a file and committing a value.
#[derive(Debug, Error)]
pub enum ImageInputError {
    #[error("not a base64 data URI: {0}")]
    InvalidValue(String),

    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("failed to encode image: {0}")]
    Encode(String),

    #[error("failed to read picked file: {0}")]
    Read(#[from] std::io::Error),

    #[error("invalid bounding size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("invalid props: {0}")]
    Config(#[from] serde_json::Error),

    #[error("failed to read props file: {0}")]
    PropsFile(#[source] std::io::Error),

    #[error("failed to serialize view: {0}")]
    Output(#[source] serde_json::Error),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, ImageInputError>;
