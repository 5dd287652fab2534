use std::path::PathBuf;

/// Errors raised while loading catalogues or settings.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV is missing required columns (found {found:?}); need a timestamp and a magnitude")]
    MissingColumns { found: Vec<String> },

    #[error("no valid records found ({skipped} rows skipped)")]
    NoRecords { skipped: usize },

    #[error("unsupported file type '{0}'")]
    UnsupportedFile(String),

    #[error("no configuration directory available on this platform")]
    NoConfigDir,
}

impl AppError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
