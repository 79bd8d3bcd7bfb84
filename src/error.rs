//! Error types for sheet validation, layout and rendering.

use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced while building or rendering a tag sheet.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("number of {axis} must be in [{min}..{max}], got {value}")]
    InvalidDimension {
        axis: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },

    #[error("{axis} margin must be in [{min:.1}..{max:.1}] mm, got {value:.1}")]
    InvalidMargin {
        axis: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("prefix {prefix:?} is not a well-formed URI")]
    InvalidPrefix {
        prefix: String,
        #[source]
        source: url::ParseError,
    },

    #[error("excluding {excluded:?} leaves no letters for tags")]
    InvalidAlphabet { excluded: String },

    #[error("rendering failed")]
    RenderingFailure(#[from] RenderError),
}

/// Failures reported by the rendering collaborator.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to write {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to compress image data")]
    Compress(#[source] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("failed to encode symbol for {payload:?}")]
    Symbol {
        payload: String,
        #[source]
        source: qrcode::types::QrError,
    },

    #[error("manifest error: {0}")]
    Manifest(#[from] csv::Error),
}
