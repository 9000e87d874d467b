// ---------------------------------------------------------------------------
// SaveError: error types for save/load operations
// ---------------------------------------------------------------------------

use std::fmt;

use simulation::Version;

/// Errors that can occur during save/load operations.
///
/// Policy-driven refusals (incompatible save in unattended mode, a declined
/// upgrade prompt, a hand-off to a legacy engine) are not errors; they are
/// reported through `LoadResult::NotLoaded`.
#[derive(Debug)]
pub enum SaveError {
    /// I/O or compression failure (file not found, disk full, bad LZ4 frame).
    Io(std::io::Error),
    /// A config file could not be parsed.
    Config(String),
    /// The container could not be encoded (e.g. a field too large to frame).
    Encode(String),
    /// Structural framing violation, short read, or checksum mismatch.
    CorruptContainer(String),
    /// Save was made by an engine with different major/minor/patch and no
    /// legacy engine could take it over.
    VersionIncompatible { loaded: Version, running: Version },
    /// A delegate entry names a type that is not in the registry.
    UnknownDelegateType(String),
    /// A delegate rejected its persisted state.
    DelegateStateCorrupt { delegate: String, reason: String },
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "I/O error: {e}"),
            SaveError::Config(msg) => write!(f, "Invalid save config: {msg}"),
            SaveError::Encode(msg) => write!(f, "Encoding error: {msg}"),
            SaveError::CorruptContainer(msg) => write!(f, "Corrupt save container: {msg}"),
            SaveError::VersionIncompatible { loaded, running } => write!(
                f,
                "Incompatible engine versions, and no old engine found. We are: {running}. \
                 Trying to load game created with: {loaded}"
            ),
            SaveError::UnknownDelegateType(key) => {
                write!(f, "Unknown delegate type: {key}")
            }
            SaveError::DelegateStateCorrupt { delegate, reason } => {
                write!(f, "Delegate {delegate} rejected its saved state: {reason}")
            }
        }
    }
}

impl std::error::Error for SaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SaveError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_error_display_io() {
        let err = SaveError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));
        let msg = format!("{err}");
        assert!(msg.contains("I/O error"), "got: {msg}");
        assert!(msg.contains("file not found"), "got: {msg}");
    }

    #[test]
    fn test_save_error_display_version_incompatible() {
        let err = SaveError::VersionIncompatible {
            loaded: Version::new(1, 8, 0, 9),
            running: Version::new(1, 9, 0, 3),
        };
        let msg = format!("{err}");
        assert!(msg.contains("1.8.0.9"), "got: {msg}");
        assert!(msg.contains("1.9.0.3"), "got: {msg}");
    }

    #[test]
    fn test_save_error_display_delegate_state() {
        let err = SaveError::DelegateStateCorrupt {
            delegate: "purchase".to_string(),
            reason: "truncated".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("purchase"), "got: {msg}");
        assert!(msg.contains("truncated"), "got: {msg}");
    }

    #[test]
    fn test_save_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let save_err: SaveError = io_err.into();
        assert!(matches!(save_err, SaveError::Io(_)));
        assert!(std::error::Error::source(&save_err).is_some());
    }

    #[test]
    fn test_save_error_display_config() {
        let err = SaveError::Config("expected value at line 1 column 1".to_string());
        let msg = format!("{err}");
        assert!(msg.contains("Invalid save config"), "got: {msg}");
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn test_save_error_debug() {
        let err = SaveError::UnknownDelegateType("battle".to_string());
        let debug = format!("{err:?}");
        assert!(debug.contains("UnknownDelegateType"), "got: {debug}");
    }
}
