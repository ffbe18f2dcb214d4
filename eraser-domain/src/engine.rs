//! The public face of the crate: an [`Eraser`] validates a call, runs it against its storage,
//! times it and turns whatever went wrong into an [`EraseError`].

use std::fs;
use std::io::{Read, Seek, Write};
use std::marker::PhantomData;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{ConfigurationError, EraseError};
use crate::mode::OverwriteMode;
use crate::storage::{FileStorage, Storage};

/// Stops an [`Eraser`] from starting on any further file.
///
/// A pass that is already being written always runs to the end.
#[derive(Debug, Clone, Default)]
pub struct AbortHandle(Arc<AtomicBool>);

impl AbortHandle {
    pub fn abort(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EraseResult {
    pub elapsed: Duration,
    /// Bytes written over all passes of all files.
    pub bytes_processed: u64,
    pub passes: usize,
    pub files_erased: usize,
}

impl EraseResult {
    pub fn millis(&self) -> u128 {
        self.elapsed.as_millis()
    }
}

pub struct Eraser<RW, S>
where
    RW: Read + Write + Seek,
    S: Storage<RW>,
{
    stor: Arc<S>,
    seed: Option<u64>,
    abort: AbortHandle,
    _stream: PhantomData<fn() -> RW>,
}

pub type FsEraser = Eraser<fs::File, FileStorage>;

impl Default for FsEraser {
    fn default() -> Self {
        Eraser::new(Arc::new(FileStorage))
    }
}

impl<RW, S> Clone for Eraser<RW, S>
where
    RW: Read + Write + Seek,
    S: Storage<RW>,
{
    fn clone(&self) -> Self {
        Self {
            stor: self.stor.clone(),
            seed: self.seed,
            abort: self.abort.clone(),
            _stream: PhantomData,
        }
    }
}

fn validate(path: &Path) -> Result<(), EraseError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigurationError::EmptyPath.into());
    }
    Ok(())
}

impl<RW, S> Eraser<RW, S>
where
    RW: Read + Write + Seek,
    S: Storage<RW>,
{
    pub fn new(stor: Arc<S>) -> Self {
        Self {
            stor,
            seed: None,
            abort: AbortHandle::default(),
            _stream: PhantomData,
        }
    }

    /// Makes every random pass reproducible. Meant for tests, since a known seed
    /// lets anyone regenerate the random passes.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(crate::pattern::gen_seed)
    }

    pub fn erase_file<P: AsRef<Path>>(&self, path: P) -> Result<EraseResult, EraseError> {
        self.erase_file_with_mode(path, OverwriteMode::Simple)
    }

    pub fn erase_file_with_mode<P: AsRef<Path>>(
        &self,
        path: P,
        mode: OverwriteMode,
    ) -> Result<EraseResult, EraseError> {
        let start_time = Instant::now();
        let path = path.as_ref();
        validate(path)?;

        if self.abort.is_aborted() {
            return Err(EraseError::Interrupted {
                path: path.to_path_buf(),
                cause: None,
            });
        }

        let res = crate::erase::execute(
            self.stor.as_ref(),
            crate::erase::Request {
                path,
                mode,
                seed: self.seed(),
            },
        )
        .map_err(|e| EraseError::from((path.to_path_buf(), e)))?;

        Ok(EraseResult {
            elapsed: start_time.elapsed(),
            bytes_processed: res.bytes_written,
            passes: res.passes,
            files_erased: 1,
        })
    }

    pub fn erase_directory<P: AsRef<Path>>(
        &self,
        path: P,
        recursive: bool,
    ) -> Result<EraseResult, EraseError> {
        self.erase_dir(path.as_ref(), None, recursive)
    }

    pub fn erase_directory_with_mode<P: AsRef<Path>>(
        &self,
        path: P,
        mode: OverwriteMode,
        recursive: bool,
    ) -> Result<EraseResult, EraseError> {
        self.erase_dir(path.as_ref(), Some(mode), recursive)
    }

    fn erase_dir(
        &self,
        path: &Path,
        mode: Option<OverwriteMode>,
        recursive: bool,
    ) -> Result<EraseResult, EraseError> {
        let start_time = Instant::now();
        validate(path)?;

        let res = crate::erase_dir::execute(
            self.stor.as_ref(),
            crate::erase_dir::Request {
                path,
                mode,
                recursive,
                seed: self.seed(),
                abort: &self.abort.0,
            },
        )
        .map_err(|e| EraseError::from((path.to_path_buf(), e)))?;

        Ok(EraseResult {
            elapsed: start_time.elapsed(),
            bytes_processed: res.bytes_written,
            passes: res.passes,
            files_erased: res.files_erased,
        })
    }
}
