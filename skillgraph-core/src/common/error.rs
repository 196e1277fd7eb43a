use thiserror::Error;

/// Error taxonomy for the core. Almost everything in this system degrades
/// with a warning instead of failing; the variants here cover the cases
/// that genuinely cannot be papered over at the point they occur. Callers
/// higher up still downgrade most of them to a skipped source or an
/// unchanged table.
#[derive(Error, Debug)]
pub enum SkillGraphError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot error: {message}")]
    Snapshot { message: String },

    #[error("configuration error: {message}")]
    Config { message: String },

    /// The one fatal condition: no usable source data at all. A graph
    /// built from zero entities serves nobody, so this surfaces to the
    /// operator instead of being silently tolerated.
    #[error("no usable source data: {message}")]
    NoSourceData { message: String },
}

pub type Result<T> = std::result::Result<T, SkillGraphError>;
