#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Every token was filtered out. Callers report this as "no words matched".
    #[error("no words matched the filters")]
    EmptyResult,
    #[error("mask has no drawable area ({width}x{height})")]
    InvalidMask { width: u32, height: u32 },
    #[error("brightness grid has {actual} cells, expected {expected}")]
    MaskDimensions { expected: usize, actual: usize },
    #[error("invalid layout config: {0}")]
    InvalidConfig(String),
    #[error("font data could not be parsed")]
    InvalidFont,
    #[error("invalid color: {0}")]
    InvalidColor(String),
    #[error("layout cancelled after placing {placed} words")]
    Cancelled { placed: usize },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
