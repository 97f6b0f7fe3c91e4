//! Error types for Panoplot.
//!
//! This module provides a unified error handling approach using `thiserror`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Panoplot operations.
pub type Result<T> = std::result::Result<T, PanoplotError>;

/// Errors that can occur in Panoplot.
#[derive(Debug, Error)]
pub enum PanoplotError {
    /// Invalid figure, style or axes configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Failed to read a style file.
    #[error("Failed to read style file: {path}")]
    StyleFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed line in a style file.
    #[error("Malformed style entry on line {line}: {text}")]
    MalformedStyle { line: usize, text: String },

    /// Data does not fit the requested plot.
    #[error("Invalid plot: {0}")]
    InvalidPlot(String),

    /// Operation called in the wrong lifecycle state.
    #[error("Resource state error: {0}")]
    ResourceState(String),

    /// Rendering backend failure.
    #[error("Backend error: {0}")]
    Backend(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PanoplotError {
    /// Create a Configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create an InvalidPlot error.
    pub fn invalid_plot(msg: impl Into<String>) -> Self {
        Self::InvalidPlot(msg.into())
    }

    /// Create a ResourceState error.
    pub fn resource_state(msg: impl Into<String>) -> Self {
        Self::ResourceState(msg.into())
    }

    /// Create a StyleFile error.
    pub fn style_file(path: PathBuf, source: std::io::Error) -> Self {
        Self::StyleFile { path, source }
    }
}
