use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IconFontError {
    #[error("Invalid compile options: {0}")]
    Configuration(String),

    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not parse SVG document {path:?}: {source}")]
    XmlParse {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },

    #[error("No <svg> element found in {path:?}")]
    MissingSvgElement { path: PathBuf },

    #[error("Missing {dimension} attribute in {path:?}")]
    MissingDimension {
        path: PathBuf,
        dimension: &'static str,
    },

    #[error("The {dimension} of {path:?} must be a positive number, found {value}")]
    InvalidDimension {
        path: PathBuf,
        dimension: &'static str,
        value: f64,
    },

    #[error("No path or polygon data found in {path:?}")]
    NoOutlineData { path: PathBuf },

    #[error("Ill-constructed outline in {path:?}: {reason}")]
    BadOutline { path: PathBuf, reason: String },

    #[error("Expected {path:?} to be in the format 'xxxx-icon-name.svg'")]
    MissingUnicode { path: PathBuf },

    #[error("Could not read manifest {path:?}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed manifest {path:?}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Font ascent ({ascent}) must be greater than descent ({descent})")]
    InvalidMetrics { ascent: f64, descent: f64 },

    #[error("Font height must be a positive number, found {font_height}")]
    InvalidFontHeight { font_height: f64 },

    #[error("Compilation was cancelled")]
    Cancelled,

    #[error("Glyph worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    #[error("{step} failed: {reason}")]
    External { step: String, reason: String },
}

impl IconFontError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        IconFontError::Io {
            path: path.into(),
            source,
        }
    }

    /// The icon file this error points at, if any.
    pub fn source_path(&self) -> Option<&std::path::Path> {
        match self {
            IconFontError::XmlParse { path, .. }
            | IconFontError::MissingSvgElement { path }
            | IconFontError::MissingDimension { path, .. }
            | IconFontError::InvalidDimension { path, .. }
            | IconFontError::NoOutlineData { path }
            | IconFontError::BadOutline { path, .. }
            | IconFontError::MissingUnicode { path }
            | IconFontError::Io { path, .. } => Some(path),
            _ => None,
        }
    }
}
