use thiserror::Error;

pub type Result<T> = std::result::Result<T, SettingsError>;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Settings blob error: {0}")]
    BlobError(#[from] serde_json::Error),

    #[error("Persistence failed: {0}")]
    Persistence(String),
}
