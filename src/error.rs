//! Error types for toclint operations.

use thiserror::Error;

/// Errors that can occur while auditing or editing a table of contents.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Invalid naming pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid EPUB: {0}")]
    InvalidEpub(String),

    #[error("No table of contents: {0}")]
    NoToc(String),

    #[error("No existing chapter entries to anchor placeholders to")]
    NoAnchor,

    #[error("Config error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("UTF-8 decoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, Error>;
