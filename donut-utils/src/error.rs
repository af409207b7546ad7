use thiserror::Error;

/// Failures that only cost the current repository, download or profile edit.
///
/// The pipeline prints these and moves on to the next item; they never end the run.
#[derive(Error, Debug)]
pub enum DonutError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Received non-200 response code from {url}: {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to unmarshal {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid filename format, cannot find version: {filename}")]
    MissingVersion { filename: String },

    #[error("Failed to {action} {path}: {source}")]
    File {
        action: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported shell '{shell}'")]
    UnsupportedShell { shell: String },

    #[error("Home directory could not be determined")]
    HomeDirNotFound,
}

impl DonutError {
    /// Wrap an I/O failure on `path`, naming what was being done.
    pub fn file(
        action: &'static str,
        path: &std::path::Path,
    ) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.display().to_string();
        move |source| DonutError::File {
            action,
            path,
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, DonutError>;
