use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Malformed WXR document: {0}")]
    MalformedInput(String),

    #[error("The export has no wp:base_blog_url, asset URLs cannot be localized")]
    MissingBaseUrl,

    #[error("Unknown timezone '{0}'")]
    UnknownTimezone(String),

    #[error("Font file is missing: {}", .0.display())]
    MissingFont(PathBuf),

    #[error("Font file {} could not be parsed: {}", .0.display(), .1)]
    InvalidFont(PathBuf, String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("PDF rendering failed: {0}")]
    Pdf(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
