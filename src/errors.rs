use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Data error: {0}")]
    Data(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Player error: {0}")]
    Player(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
