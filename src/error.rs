//! Failure taxonomy for theme operations.
//!
//! Only the failures callers actually branch on get a typed variant; everything
//! else travels as `anyhow::Error` with context attached at the call site.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ThemeError {
    /// Hex color string that is not `#rrggbb` (leading `#` optional).
    #[error("invalid color format: {0:?}")]
    InvalidColorFormat(String),

    /// Wallpaper or other image that could not be decoded.
    #[error("failed to decode image {}: {source}", .path.display())]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Named theme missing from the registry. Maps to exit code 1.
    #[error("theme '{name}' not found at {}", .path.display())]
    ThemeNotFound { name: String, path: PathBuf },

    /// A required external binary (sassc, gsettings) is not on PATH.
    /// Non-fatal: the affected output is skipped with a warning.
    #[error("required tool '{0}' not found on PATH")]
    ExternalToolMissing(&'static str),
}
