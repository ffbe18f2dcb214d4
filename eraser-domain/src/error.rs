use std::fmt;
use std::io;
use std::path::PathBuf;

/// The caller passed something the engine can't work with. Never worth retrying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    EmptyPath,
    UnknownMode(String),
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::EmptyPath => f.write_str("No path provided"),
            ConfigurationError::UnknownMode(name) => write!(f, "Unknown overwrite mode: {name}"),
        }
    }
}

impl std::error::Error for ConfigurationError {}

impl From<crate::mode::ParseModeError> for ConfigurationError {
    fn from(err: crate::mode::ParseModeError) -> Self {
        ConfigurationError::UnknownMode(err.0)
    }
}

/// The underlying failure, naming the operation that went wrong.
pub type Cause = Box<dyn std::error::Error + Send + Sync>;

/// Every way an erase call can fail. No partial result ever comes with one of these.
#[derive(Debug)]
pub enum EraseError {
    Configuration(ConfigurationError),
    PathNotFound { path: PathBuf, cause: Cause },
    PermissionDenied { path: PathBuf, cause: Cause },
    /// A file operation was given a directory, or the other way round.
    IsDirectoryMismatch { path: PathBuf, expected_dir: bool },
    /// Symbolic links and special files are never followed or overwritten.
    UnsupportedFileType(PathBuf),
    HardLinked { path: PathBuf, links: u64 },
    IoFailure { path: PathBuf, cause: Cause },
    /// Stopped through an abort handle (no cause) or by an interrupted system call.
    Interrupted { path: PathBuf, cause: Option<Cause> },
}

impl EraseError {
    /// The path the failure is about, if there is one.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            EraseError::Configuration(_) => None,
            EraseError::PathNotFound { path, .. }
            | EraseError::PermissionDenied { path, .. }
            | EraseError::IsDirectoryMismatch { path, .. }
            | EraseError::UnsupportedFileType(path)
            | EraseError::HardLinked { path, .. }
            | EraseError::IoFailure { path, .. }
            | EraseError::Interrupted { path, .. } => Some(path),
        }
    }

    // sorts an underlying failure into the public taxonomy by its io::ErrorKind
    pub(crate) fn from_io_kind<E>(path: PathBuf, kind: Option<io::ErrorKind>, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let cause: Cause = Box::new(cause);
        match kind {
            Some(io::ErrorKind::NotFound) => EraseError::PathNotFound { path, cause },
            Some(io::ErrorKind::PermissionDenied) => EraseError::PermissionDenied { path, cause },
            Some(io::ErrorKind::Interrupted) => EraseError::Interrupted {
                path,
                cause: Some(cause),
            },
            _ => EraseError::IoFailure { path, cause },
        }
    }
}

impl fmt::Display for EraseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EraseError::Configuration(inner) => write!(f, "Invalid request: {inner}"),
            EraseError::PathNotFound { path, cause } => {
                write!(f, "{} doesn't exist: {cause}", path.display())
            }
            EraseError::PermissionDenied { path, cause } => {
                write!(f, "Permission denied on {}: {cause}", path.display())
            }
            EraseError::IsDirectoryMismatch {
                path,
                expected_dir: true,
            } => write!(f, "{} isn't a directory", path.display()),
            EraseError::IsDirectoryMismatch {
                path,
                expected_dir: false,
            } => write!(f, "{} is a directory", path.display()),
            EraseError::UnsupportedFileType(path) => {
                write!(f, "{} isn't a regular file", path.display())
            }
            EraseError::HardLinked { path, links } => write!(
                f,
                "{} has {} hard links, refusing to overwrite shared data",
                path.display(),
                links
            ),
            EraseError::IoFailure { path, cause } => {
                write!(f, "Unable to erase {}: {cause}", path.display())
            }
            EraseError::Interrupted { path, cause: None } => {
                write!(f, "Interrupted at {}", path.display())
            }
            EraseError::Interrupted {
                path,
                cause: Some(cause),
            } => write!(f, "Interrupted at {}: {cause}", path.display()),
        }
    }
}

impl std::error::Error for EraseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EraseError::PathNotFound { cause, .. }
            | EraseError::PermissionDenied { cause, .. }
            | EraseError::IoFailure { cause, .. }
            | EraseError::Interrupted {
                cause: Some(cause), ..
            } => Some(cause.as_ref()),
            _ => None,
        }
    }
}

impl From<ConfigurationError> for EraseError {
    fn from(err: ConfigurationError) -> Self {
        EraseError::Configuration(err)
    }
}

impl From<(PathBuf, crate::erase::Error)> for EraseError {
    fn from((path, err): (PathBuf, crate::erase::Error)) -> Self {
        use crate::erase::Error;

        match err {
            Error::InvalidFileType => EraseError::IsDirectoryMismatch {
                path,
                expected_dir: false,
            },
            Error::UnsupportedFileType => EraseError::UnsupportedFileType(path),
            Error::HardLinks(links) => EraseError::HardLinked { path, links },
            err => {
                let kind = err.io_kind();
                EraseError::from_io_kind(path, kind, err)
            }
        }
    }
}

impl From<(PathBuf, crate::erase_dir::Error)> for EraseError {
    fn from((root, err): (PathBuf, crate::erase_dir::Error)) -> Self {
        use crate::erase_dir::Error;

        match err {
            Error::InvalidFileType => EraseError::IsDirectoryMismatch {
                path: root,
                expected_dir: true,
            },
            Error::Aborted(at) => EraseError::Interrupted {
                path: at,
                cause: None,
            },
            // always report the entry that failed, not the root
            Error::EraseFile(child, inner) => EraseError::from((child, inner)),
            Error::OpenDir(at, inner)
            | Error::ReadDirEntries(at, inner)
            | Error::RemoveLink(at, inner)
            | Error::RemoveDir(at, inner) => {
                let kind = inner.io_kind();
                EraseError::from_io_kind(at, kind, inner)
            }
        }
    }
}
