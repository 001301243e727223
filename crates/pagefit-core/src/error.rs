use thiserror::Error;

#[derive(Error, Debug)]
pub enum PageFitError {
    #[error("Failed to parse PDF: {0}")]
    ParseError(String),

    #[error("Page {page} has invalid geometry ({width} x {height})")]
    InvalidGeometry { page: u32, width: f32, height: f32 },

    #[error("Page {0} has no usable MediaBox")]
    MissingMediaBox(u32),

    #[error("Invalid target page size: {0}")]
    InvalidTarget(String),

    #[error("PDF operation failed: {0}")]
    OperationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, PageFitError>;
