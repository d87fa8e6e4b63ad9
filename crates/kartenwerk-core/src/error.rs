// SPDX-License-Identifier: MIT
//
// Unified error types for Kartenwerk.

use thiserror::Error;

/// Top-level error type for all Kartenwerk operations.
#[derive(Debug, Error)]
pub enum KartenwerkError {
    // -- Image pipeline errors --
    #[error("image decode failed: {0}")]
    Decode(String),

    #[error("image encode failed: {0}")]
    Encode(String),

    #[error("render surface unavailable: {0}")]
    RenderSurface(String),

    // -- Print output errors --
    #[error("PDF generation failed: {0}")]
    PdfError(String),

    // -- Session errors --
    #[error("design limit reached: a session holds at most {0} card designs")]
    DesignLimit(usize),

    #[error("cannot remove the last remaining card design")]
    LastDesign,

    #[error("no card design with id {0}")]
    UnknownDesign(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, KartenwerkError>;
