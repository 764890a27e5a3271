use std::{io, path::PathBuf, time::Duration};

use thiserror::Error;

pub type Result<T, E = SkillError> = std::result::Result<T, E>;

/// Everything a tool invocation can fail with. Only `TransientFailure` is
/// ever retried.
#[derive(Debug, Error)]
pub enum SkillError {
    #[error("No API key provided. Pass --api-key or set GRSAI_API_KEY")]
    MissingCredential,

    #[error(transparent)]
    InvalidInput(#[from] InputError),

    #[error("Unauthorized (HTTP 401): check your API key. Details: {message}")]
    AuthenticationFailure { message: String },

    #[error("Transient failure: {message}")]
    TransientFailure { message: String },

    #[error("Generation failed: {message}")]
    GenerationFailure { message: String },

    #[error("Unexpected response: {message}")]
    ProtocolError { message: String },

    #[error("Generation timed out after {}s (task: {job_id})", .waited.as_secs())]
    Timeout { job_id: String, waited: Duration },

    #[error("HTTP client error: {message}")]
    Transport { message: String },

    #[error("Failed to write {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SkillError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransientFailure { .. })
    }

    pub(crate) fn protocol(message: impl Into<String>) -> Self {
        Self::ProtocolError {
            message: message.into(),
        }
    }
}

/// Rejected user input, detected before any request is sent.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Invalid input: prompt must not be empty")]
    EmptyPrompt,

    #[error("Invalid input: image not found: {}", .0.display())]
    ImageNotFound(PathBuf),

    #[error("Invalid input: not a file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("Invalid input: unsupported image format '{0}'. Use jpg, png, webp, or gif")]
    UnsupportedImageFormat(String),

    #[error("Invalid input: could not read image {}: {source}", .path.display())]
    UnreadableImage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
