//! Error and warning types shared by every stage of the pipeline.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Conditions that abort an operation.
#[derive(Error, Debug)]
pub enum Error {
    /// A required file or directory is missing
    #[error("{} not found", path.display())]
    NotFound { path: PathBuf },

    /// `ventoy.json` could not be parsed
    #[error("Invalid JSON syntax in {}: {source}", path.display())]
    Syntax {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A single icon could not be decoded, resized or written
    #[error("Failed to process {}: {reason}", path.display())]
    Processing { path: PathBuf, reason: String },

    /// The freshly written document did not parse back; the original is untouched
    #[error("Syntax error in the rewritten {}, no changes were made: {source}", path.display())]
    Validation {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Nothing to operate on
    #[error("{0}")]
    NoTargets(String),

    /// Tool settings file is unreadable or out of range
    #[error("Settings error: {0}")]
    Settings(String),

    /// A rename could not be staged
    #[error("Cannot rename {path}: {reason}")]
    InvalidRename { path: String, reason: String },

    /// IO error with the path it happened on
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::NotFound { path }
        } else {
            Error::Io { path, source }
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Non-fatal conditions collected while an operation keeps going.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// Theme directory has no `icons/` folder; the theme was skipped
    MissingIconsFolder { theme: String },
    /// Icon failed to decode, resize or save and is absent from the icon map
    IconSkipped { icon: String, reason: String },
    /// Similarity could not be computed; the `-alt` icon was kept
    SimilarityFailed { icon: String, reason: String },
    /// The redundant `-alt` icon could not be deleted and stays mapped
    AltNotRemoved { icon: String, reason: String },
    /// The representative icon used for sizing could not be read
    SizeProbeFailed { theme: String, icon: String, reason: String },
    /// A theme's `icons/` folder could not be listed for sizing
    IconsUnlisted { theme: String, reason: String },
    /// A file or directory on the volume could not be read while scanning
    UnreadableEntry { path: PathBuf, reason: String },
    /// Sibling resolution variants of a theme could not be listed
    VariantsUnlisted { theme: String, reason: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::MissingIconsFolder { theme } => {
                write!(f, "No icons folder found in theme {theme}. Skipping.")
            }
            Warning::IconSkipped { icon, reason } => {
                write!(f, "Failed to process {icon}: {reason}. Skipping this icon.")
            }
            Warning::SimilarityFailed { icon, reason } => write!(
                f,
                "Failed to calculate similarity for {icon}: {reason}. Keeping the '-alt' icon."
            ),
            Warning::AltNotRemoved { icon, reason } => write!(
                f,
                "Failed to remove {icon}-alt.png: {reason}. Keeping the '-alt' icon."
            ),
            Warning::SizeProbeFailed {
                theme,
                icon,
                reason,
            } => write!(
                f,
                "Failed to load {icon} in theme {theme} ({reason}). Using default icon size."
            ),
            Warning::IconsUnlisted { theme, reason } => write!(
                f,
                "Failed to list icons in theme {theme} ({reason}). Using default icon size."
            ),
            Warning::UnreadableEntry { path, reason } => {
                write!(f, "Cannot read {} ({reason}). Skipping.", path.display())
            }
            Warning::VariantsUnlisted { theme, reason } => write!(
                f,
                "Failed to list resolution variants of theme {theme} ({reason}). Using only {theme}."
            ),
        }
    }
}
