use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The embedding model could not be loaded or inference failed.
    #[error("Model error ({model}): {message}")]
    Model { model: String, message: String },

    /// The vector index could not be opened at construction time.
    #[error("Failed to load index at {path}: {message}")]
    IndexLoad { path: String, message: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Search failed: {0}")]
    Search(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub fn model(model: impl Into<String>, message: impl ToString) -> Self {
        Self::Model { model: model.into(), message: message.to_string() }
    }

    pub fn index_load(path: impl AsRef<std::path::Path>, message: impl ToString) -> Self {
        Self::IndexLoad { path: path.as_ref().display().to_string(), message: message.to_string() }
    }

    pub fn search(message: impl ToString) -> Self {
        Self::Search(message.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
