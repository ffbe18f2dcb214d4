//! This provides functionality for "shredding" a directory. It walks the directory depth-first and
//! calls [`crate::erase::execute`] on every file, removing each directory once it has been emptied.
//!
//! Without `recursive` only the direct file children are erased; sub-directories are left alone
//! and the directory itself is kept if it still holds any of them.
//!
//! The walk stops at the first failure, leaving the remaining entries untouched.

use log::{debug, info, warn};
use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crate::mode::OverwriteMode;
use crate::storage::{self, EntryKind, Storage};

#[derive(Debug)]
pub enum Error {
    OpenDir(PathBuf, storage::Error),
    InvalidFileType,
    ReadDirEntries(PathBuf, storage::Error),
    EraseFile(PathBuf, crate::erase::Error),
    RemoveLink(PathBuf, storage::Error),
    RemoveDir(PathBuf, storage::Error),
    Aborted(PathBuf),
}

impl Error {
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            Error::OpenDir(_, inner)
            | Error::ReadDirEntries(_, inner)
            | Error::RemoveLink(_, inner)
            | Error::RemoveDir(_, inner) => inner.io_kind(),
            Error::EraseFile(_, inner) => inner.io_kind(),
            Error::InvalidFileType | Error::Aborted(_) => None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::OpenDir(path, inner) => {
                write!(f, "Unable to open directory {}: {inner}", path.display())
            }
            Error::InvalidFileType => f.write_str("Invalid file type"),
            Error::ReadDirEntries(path, inner) => {
                write!(f, "Unable to get all entries of {}: {inner}", path.display())
            }
            Error::EraseFile(path, inner) => {
                write!(f, "Unable to erase file {}: {inner}", path.display())
            }
            Error::RemoveLink(path, inner) => {
                write!(f, "Unable to remove link {}: {inner}", path.display())
            }
            Error::RemoveDir(path, inner) => {
                write!(f, "Unable to remove directory {}: {inner}", path.display())
            }
            Error::Aborted(path) => write!(f, "Aborted before {}", path.display()),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::OpenDir(_, inner)
            | Error::ReadDirEntries(_, inner)
            | Error::RemoveLink(_, inner)
            | Error::RemoveDir(_, inner) => Some(inner),
            Error::EraseFile(_, inner) => Some(inner),
            Error::InvalidFileType | Error::Aborted(_) => None,
        }
    }
}

pub struct Request<'a, P: AsRef<Path>> {
    pub path: P,
    /// Falls back to a single pass of zeros.
    pub mode: Option<OverwriteMode>,
    pub recursive: bool,
    pub seed: u64,
    /// Checked before every entry; a pass in flight is never interrupted.
    pub abort: &'a AtomicBool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    pub files_erased: usize,
    pub bytes_written: u64,
    pub passes: usize,
}

struct Walk<'a, S> {
    stor: &'a S,
    mode: OverwriteMode,
    recursive: bool,
    seed: u64,
    abort: &'a AtomicBool,
    res: Response,
}

impl<'a, S> Walk<'a, S> {
    fn check_abort(&self, next: &Path) -> Result<(), Error> {
        if self.abort.load(Ordering::SeqCst) {
            return Err(Error::Aborted(next.to_path_buf()));
        }
        Ok(())
    }

    fn dir<RW>(&mut self, path: &Path) -> Result<(), Error>
    where
        RW: Read + Write + Seek,
        S: Storage<RW>,
    {
        let dir = self
            .stor
            .read_file(path)
            .map_err(|e| Error::OpenDir(path.to_path_buf(), e))?;
        let entries = self
            .stor
            .read_dir(&dir)
            .map_err(|e| Error::ReadDirEntries(path.to_path_buf(), e))?;

        let mut skipped_dirs = 0;

        for entry in entries {
            self.check_abort(&entry.path)?;

            match entry.kind {
                EntryKind::Dir if self.recursive => self.dir::<RW>(&entry.path)?,
                EntryKind::Dir => {
                    debug!("Skipping sub-directory {}", entry.path.display());
                    skipped_dirs += 1;
                }
                EntryKind::Symlink | EntryKind::Other => {
                    // links and special files hold no data of their own
                    self.stor
                        .remove_link(&entry.path)
                        .map_err(|e| Error::RemoveLink(entry.path.clone(), e))?;
                    debug!("Unlinked {}", entry.path.display());
                }
                EntryKind::File => {
                    let erased = crate::erase::execute(
                        self.stor,
                        crate::erase::Request {
                            path: &entry.path,
                            mode: self.mode,
                            seed: self.seed,
                        },
                    )
                    .map_err(|e| Error::EraseFile(entry.path.clone(), e))?;

                    self.res.files_erased += 1;
                    self.res.bytes_written += erased.bytes_written;
                    self.res.passes += erased.passes;
                }
            }
        }

        if skipped_dirs > 0 {
            warn!(
                "Keeping {}: it still holds {} sub-directories",
                path.display(),
                skipped_dirs
            );
            return Ok(());
        }

        self.stor
            .remove_dir(dir)
            .map_err(|e| Error::RemoveDir(path.to_path_buf(), e))?;
        debug!("Removed directory {}", path.display());

        Ok(())
    }
}

pub fn execute<RW, P>(stor: &impl Storage<RW>, req: Request<P>) -> Result<Response, Error>
where
    RW: Read + Write + Seek,
    P: AsRef<Path>,
{
    let start_time = Instant::now();
    let path = req.path.as_ref();

    let kind = stor
        .entry_kind(path)
        .map_err(|e| Error::OpenDir(path.to_path_buf(), e))?;
    if kind != EntryKind::Dir {
        return Err(Error::InvalidFileType);
    }

    let mut walk = Walk {
        stor,
        mode: req.mode.unwrap_or_default(),
        recursive: req.recursive,
        seed: req.seed,
        abort: req.abort,
        res: Response::default(),
    };

    walk.check_abort(path)?;
    walk.dir::<RW>(path)?;

    info!(
        "Erased {} files in {} [took {:.2}s]",
        walk.res.files_erased,
        path.display(),
        start_time.elapsed().as_secs_f32()
    );

    Ok(walk.res)
}
