//! Error taxonomy shared by the pipeline, the CLI and the web handlers.
//!
//! Each variant says *which* stage failed so the caller can react to it:
//! the CLI turns it into an exit code, the web layer into an HTTP status.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// The geocoder returned no match for the requested city.
    #[error("Location not found: '{city}'.")]
    LocationNotFound { city: String },

    /// An upstream API answered with a non-success status.
    #[error("Fetch error: upstream returned status {status}: {body}")]
    FetchFailed { status: u16, body: String },

    /// The upstream payload did not have the expected shape.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// The regression could not be fitted or evaluated.
    #[error("Model fit failed: {0}")]
    FitFailed(String),

    /// Chart rendering failed.
    #[error("Chart rendering failed: {0}")]
    Render(String),

    /// PDF generation failed.
    #[error("PDF generation failed: {0}")]
    Pdf(String),

    /// Invalid runtime configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Process exit code used by the CLI front-end.
    ///
    /// - 2: bad input or configuration
    /// - 3: upstream/network failure
    /// - 4: data, fit or rendering failure
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::LocationNotFound { .. } | AppError::Config(_) => 2,
            AppError::FetchFailed { .. } | AppError::Http(_) => 3,
            AppError::MalformedPayload(_)
            | AppError::FitFailed(_)
            | AppError::Render(_)
            | AppError::Pdf(_)
            | AppError::Io(_)
            | AppError::Json(_) => 4,
        }
    }

    /// Whether the failure came from an upstream service rather than from the input.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            AppError::FetchFailed { .. } | AppError::Http(_) | AppError::MalformedPayload(_)
        )
    }
}
