//! Streams every pass of a [`PassGenerator`] over an open file.
//!
//! Passes are strictly ordered: a pass is rewound, written in full and synced to the medium
//! before the next one starts.

use log::debug;
use std::fmt;
use std::io::{Read, Seek, Write};

use crate::pattern::PassGenerator;
use crate::storage::{self, Entry, Storage};

#[derive(Debug)]
pub enum Error {
    FileAccess,
    ResetCursorPosition(std::io::Error),
    Overwrite { pass: usize, inner: std::io::Error },
    SyncFile { pass: usize, inner: storage::Error },
}

impl Error {
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            Error::FileAccess => None,
            Error::ResetCursorPosition(inner) | Error::Overwrite { inner, .. } => {
                Some(inner.kind())
            }
            Error::SyncFile { inner, .. } => inner.io_kind(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::FileAccess => f.write_str("Unable to write to a directory"),
            Error::ResetCursorPosition(inner) => {
                write!(f, "Unable to reset cursor position: {inner}")
            }
            Error::Overwrite { pass, inner } => {
                write!(f, "Unable to overwrite on pass {pass}: {inner}")
            }
            Error::SyncFile { pass, inner } => write!(f, "Unable to sync pass {pass}: {inner}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FileAccess => None,
            Error::ResetCursorPosition(inner) | Error::Overwrite { inner, .. } => Some(inner),
            Error::SyncFile { inner, .. } => Some(inner),
        }
    }
}

pub struct Request<'a, RW>
where
    RW: Read + Write + Seek,
{
    pub file: &'a Entry<RW>,
    pub block_size: usize,
    pub passes: PassGenerator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Response {
    pub bytes_written: u64,
    pub passes: usize,
}

pub fn execute<RW>(stor: &impl Storage<RW>, req: Request<RW>) -> Result<Response, Error>
where
    RW: Read + Write + Seek,
{
    let writer = req.file.try_writer().map_err(|_| Error::FileAccess)?;
    let mut block_buf = vec![0u8; req.block_size.max(1)];

    let mut bytes_written = 0;
    let mut passes = 0;

    for mut pass in req.passes {
        // passes are numbered from 1 in messages
        let pass_n = pass.index() + 1;
        debug!(
            "{}: pass {} ({}), {} bytes",
            req.file.path().display(),
            pass_n,
            pass.spec(),
            pass.len()
        );

        {
            let mut writer = writer.borrow_mut();
            writer.rewind().map_err(Error::ResetCursorPosition)?;

            loop {
                let n = pass.read(&mut block_buf).map_err(|inner| Error::Overwrite {
                    pass: pass_n,
                    inner,
                })?;
                if n == 0 {
                    break;
                }
                writer
                    .write_all(&block_buf[..n])
                    .map_err(|inner| Error::Overwrite {
                        pass: pass_n,
                        inner,
                    })?;
            }
        }

        stor.sync_file(req.file)
            .map_err(|inner| Error::SyncFile {
                pass: pass_n,
                inner,
            })?;

        bytes_written += pass.len();
        passes += 1;
    }

    Ok(Response {
        bytes_written,
        passes,
    })
}
