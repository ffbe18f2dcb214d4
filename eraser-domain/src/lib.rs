//! Multi-pass overwriting and removal of files and directories.
//!
//! Most callers only need [`engine::Eraser`] (or [`engine::FsEraser`] for the local file system).
//! The modules below it are usable on their own against any [`storage::Storage`].

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod engine;
pub mod erase;
pub mod erase_dir;
pub mod error;
pub mod mode;
pub mod overwrite;
pub mod pattern;
pub mod storage;

pub use engine::{AbortHandle, EraseResult, Eraser, FsEraser};
pub use error::{ConfigurationError, EraseError};
pub use mode::OverwriteMode;
