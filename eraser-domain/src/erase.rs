//! This provides functionality for "shredding" a file.
//!
//! The file is overwritten with every pass of the chosen [`OverwriteMode`], truncated, renamed to a
//! random name and only then unlinked. If any step fails the file is left in place.
//!
//! This will not be effective on flash storage or copy-on-write file systems, since there
//! the overwritten blocks are not guaranteed to be the ones that held the original data.

use log::{debug, info};
use std::io::{Read, Seek, Write};
use std::path::Path;
use std::time::Instant;

use crate::mode::OverwriteMode;
use crate::pattern::PassGenerator;
use crate::storage::{self, EntryKind, Storage};

#[derive(Debug)]
pub enum Error {
    OpenFile(storage::Error),
    InvalidFileType,
    UnsupportedFileType,
    HardLinks(u64),
    Permissions(storage::Error),
    Overwrite(crate::overwrite::Error),
    Truncate(storage::Error),
    RemoveFile(storage::Error),
}

impl Error {
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            Error::OpenFile(inner)
            | Error::Permissions(inner)
            | Error::Truncate(inner)
            | Error::RemoveFile(inner) => inner.io_kind(),
            Error::Overwrite(inner) => inner.io_kind(),
            Error::InvalidFileType | Error::UnsupportedFileType | Error::HardLinks(_) => None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::OpenFile(inner) => write!(f, "Unable to open file: {inner}"),
            Error::InvalidFileType => f.write_str("Invalid file type"),
            Error::UnsupportedFileType => f.write_str("Not a regular file"),
            Error::HardLinks(n) => write!(f, "File has {n} hard links, expected exactly one"),
            Error::Permissions(inner) => write!(f, "Unable to make file writable: {inner}"),
            Error::Overwrite(inner) => write!(f, "Unable to overwrite file: {inner}"),
            Error::Truncate(inner) => write!(f, "Unable to truncate file: {inner}"),
            Error::RemoveFile(inner) => write!(f, "Unable to remove file: {inner}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::OpenFile(inner)
            | Error::Permissions(inner)
            | Error::Truncate(inner)
            | Error::RemoveFile(inner) => Some(inner),
            Error::Overwrite(inner) => Some(inner),
            Error::InvalidFileType | Error::UnsupportedFileType | Error::HardLinks(_) => None,
        }
    }
}

pub struct Request<P: AsRef<Path>> {
    pub path: P,
    pub mode: OverwriteMode,
    pub seed: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Response {
    pub bytes_written: u64,
    pub passes: usize,
}

pub fn execute<RW, P>(stor: &impl Storage<RW>, req: Request<P>) -> Result<Response, Error>
where
    RW: Read + Write + Seek,
    P: AsRef<Path>,
{
    let start_time = Instant::now();
    let path = req.path.as_ref();

    match stor.entry_kind(path).map_err(Error::OpenFile)? {
        EntryKind::File => {}
        EntryKind::Dir => return Err(Error::InvalidFileType),
        EntryKind::Symlink | EntryKind::Other => return Err(Error::UnsupportedFileType),
    }

    // overwriting a shared inode would destroy the data behind the other names too
    let links = stor.hard_links(path).map_err(Error::OpenFile)?;
    if links > 1 {
        return Err(Error::HardLinks(links));
    }

    stor.make_writable(path).map_err(Error::Permissions)?;

    let file = stor.write_file(path).map_err(Error::OpenFile)?;
    let len = stor.file_len(&file).map_err(Error::OpenFile)?;
    let block_size = stor.block_size(&file).map_err(Error::OpenFile)?;

    debug!(
        "{}: {} bytes, block size {}, mode {}",
        path.display(),
        len,
        block_size,
        req.mode
    );

    let overwritten = crate::overwrite::execute(
        stor,
        crate::overwrite::Request {
            file: &file,
            block_size,
            passes: PassGenerator::new(req.mode, len, req.seed),
        },
    )
    .map_err(Error::Overwrite)?;

    stor.truncate_file(&file, 0).map_err(Error::Truncate)?;
    stor.sync_file(&file).map_err(Error::Truncate)?;

    stor.remove_file(file).map_err(Error::RemoveFile)?;

    info!(
        "Erased {} with {} passes [took {:.2}s]",
        path.display(),
        overwritten.passes,
        start_time.elapsed().as_secs_f32()
    );

    Ok(Response {
        bytes_written: overwritten.bytes_written,
        passes: overwritten.passes,
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::storage::InMemoryStorage;

    use super::*;

    const SEED: u64 = 123456;

    #[test]
    fn should_erase_file() {
        let stor = InMemoryStorage::default();
        stor.add_hello_txt();

        let req = Request {
            path: "hello.txt",
            mode: OverwriteMode::Simple,
            seed: SEED,
        };
        match execute(&stor, req) {
            Ok(res) => {
                assert_eq!(stor.files().get(&PathBuf::from("hello.txt")), None);
                assert_eq!(res.bytes_written, 11);
                assert_eq!(res.passes, 1);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn should_count_bytes_of_every_pass() {
        let stor = InMemoryStorage::default();
        stor.add_large_bin(1500);

        let req = Request {
            path: "large.bin",
            mode: OverwriteMode::Dod,
            seed: SEED,
        };
        match execute(&stor, req) {
            Ok(res) => {
                assert_eq!(res.bytes_written, 1500 * 7);
                assert_eq!(res.passes, 7);
                assert!(stor.files().is_empty());
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn should_not_open_file() {
        let stor = InMemoryStorage::default();

        let req = Request {
            path: "hello.txt",
            mode: OverwriteMode::Simple,
            seed: SEED,
        };
        match execute(&stor, req) {
            Err(e @ Error::OpenFile(_)) => {
                assert_eq!(e.io_kind(), Some(std::io::ErrorKind::NotFound));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn should_not_erase_dir() {
        let stor = InMemoryStorage::default();
        stor.add_bar_foo_folder();

        let req = Request {
            path: "bar/",
            mode: OverwriteMode::Simple,
            seed: SEED,
        };
        match execute(&stor, req) {
            Err(Error::InvalidFileType) => assert_eq!(stor.files().len(), 6),
            _ => unreachable!(),
        }
    }

    #[test]
    fn should_not_follow_links() {
        let stor = InMemoryStorage::default();
        stor.add_hello_txt();
        stor.add_link("link.txt", "hello.txt");

        let req = Request {
            path: "link.txt",
            mode: OverwriteMode::Simple,
            seed: SEED,
        };
        match execute(&stor, req) {
            Err(Error::UnsupportedFileType) => {
                assert_eq!(stor.content("hello.txt"), Some(b"hello world".to_vec()));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn should_refuse_hard_linked_file() {
        let stor = InMemoryStorage::default();
        stor.add_hello_txt();
        stor.set_hard_links("hello.txt", 2);

        let req = Request {
            path: "hello.txt",
            mode: OverwriteMode::Simple,
            seed: SEED,
        };
        match execute(&stor, req) {
            Err(Error::HardLinks(2)) => {
                assert_eq!(stor.content("hello.txt"), Some(b"hello world".to_vec()));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn should_report_permission_denied() {
        let stor = InMemoryStorage::default();
        stor.add_hello_txt();
        stor.lock_permissions("hello.txt");

        let req = Request {
            path: "hello.txt",
            mode: OverwriteMode::Simple,
            seed: SEED,
        };
        match execute(&stor, req) {
            Err(e @ Error::Permissions(_)) => {
                assert_eq!(e.io_kind(), Some(std::io::ErrorKind::PermissionDenied));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn should_keep_file_when_second_dod_pass_fails() {
        let stor = InMemoryStorage::default();
        stor.add_large_bin(100);
        stor.fail_writes_after("large.bin", 150);

        let req = Request {
            path: "large.bin",
            mode: OverwriteMode::Dod,
            seed: SEED,
        };
        match execute(&stor, req) {
            Err(Error::Overwrite(crate::overwrite::Error::Overwrite { pass: 2, .. })) => {
                // the file still exists, holding the first (synced) pass
                assert_eq!(stor.content("large.bin"), Some(vec![0xF6; 100]));
            }
            _ => unreachable!(),
        }
    }
}
