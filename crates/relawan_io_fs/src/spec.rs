//! Source entry models and top-level selection errors.

use std::fmt;
use std::path::PathBuf;

use filetime::FileTime;

////////////////////////////////////////////////////////////////////////////////
// #region StructsInit

/// One candidate file as seen by the selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSourceEntry {
    /// File basename used for pattern matching.
    pub name_file: String,
    /// Full path used for reading.
    pub path_file: PathBuf,
    /// Creation time (falls back to modification time where unsupported).
    pub time_created: FileTime,
}

impl SpecSourceEntry {
    /// Build an entry from a basename and creation time, rooted at `path_dir`.
    pub fn new(path_dir: impl Into<PathBuf>, name_file: &str, time_created: FileTime) -> Self {
        Self {
            name_file: name_file.to_string(),
            path_file: path_dir.into().join(name_file),
            time_created,
        }
    }
}

/// Result of one selection pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSourceSelection {
    /// Newest registry file. Always present on success.
    pub registry: SpecSourceEntry,
    /// Newest family detail file, when any matched.
    pub family: Option<SpecSourceEntry>,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// "Selection failed" errors.
#[derive(Debug)]
pub enum SelectSourceError {
    /// Pattern failed to compile.
    InvalidPattern(String),
    /// No file matches the required registry pattern.
    NoInputFound {
        /// Pattern that matched nothing.
        pattern: String,
    },
    /// Directory listing failed.
    ListingFailed {
        /// Directory that could not be listed.
        path: PathBuf,
        /// Underlying IO error text.
        message: String,
    },
}

impl fmt::Display for SelectSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPattern(msg) => write!(f, "{msg}"),
            Self::NoInputFound { pattern } => {
                write!(f, "No registry CSV file found matching {pattern:?}")
            }
            Self::ListingFailed { path, message } => {
                write!(f, "Failed to list directory {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for SelectSourceError {}

// #endregion
////////////////////////////////////////////////////////////////////////////////
