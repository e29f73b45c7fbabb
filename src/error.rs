use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FingerspellError {
    /// Rejected at construction, never mid-decode.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// `predict` was called before `load` completed.
    #[error("classifier is not loaded")]
    NotReady,

    #[error("feature vector has wrong length: expected {expected}, got {actual}")]
    InvalidFeatureLength { expected: usize, actual: usize },

    #[error("model file not found at {0} and no download url configured")]
    ModelNotFound(PathBuf),

    /// Model acquisition or session construction failed; the chain carries
    /// the download/IO context.
    #[error(transparent)]
    ModelLoad(#[from] anyhow::Error),

    #[error("inference failed: {0}")]
    Inference(String),
}
