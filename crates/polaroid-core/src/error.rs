use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image decode error: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Crop service error: {0}")]
    Crop(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Nothing to render")]
    Empty,
    #[error("Font error: {0}")]
    Font(String),
    #[error("Encoding error: {0}")]
    Encode(String),
    #[cfg(feature = "fetch")]
    #[error("Fetch error: {0}")]
    Fetch(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;
