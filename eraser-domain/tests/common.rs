#![allow(dead_code)]

use eraser_domain::storage::{Error, FileStorage, Storage};
use std::fs;
use std::io::Write;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A [`FileStorage`] rooted in its own temporary directory, removed on drop.
pub struct TestFileStorage {
    inner: FileStorage,
    root: TempDir,
}

impl TestFileStorage {
    pub fn new() -> Self {
        Self {
            inner: FileStorage,
            root: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path<P: AsRef<Path>>(&self, rel: P) -> PathBuf {
        self.root.path().join(rel)
    }
}

impl Deref for TestFileStorage {
    type Target = FileStorage;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

pub fn save_text_file<P>(stor: &TestFileStorage, path: P, content: &str) -> Result<(), Error>
where
    P: AsRef<Path>,
{
    let file = stor.create_file(stor.path(path))?;
    file.try_writer()?
        .borrow_mut()
        .write_all(content.as_bytes())
        .map_err(Error::FlushFile)?;
    stor.flush_file(&file)
}

// --------------------------------
// TEST DATA
// -------------------------------

pub fn add_hello_txt(stor: &TestFileStorage) -> Result<PathBuf, Error> {
    save_text_file(stor, "hello.txt", "hello world")?;
    Ok(stor.path("hello.txt"))
}

/// `d/` holding the files `a` and `b` and the sub-directory `s/` with one file of its own.
pub fn add_d_folder(stor: &TestFileStorage) -> Result<PathBuf, Error> {
    stor.create_dir_all(stor.path("d/s"))?;
    save_text_file(stor, "d/a", "first secret")?;
    save_text_file(stor, "d/b", "second secret")?;
    save_text_file(stor, "d/s/inner", "third secret")?;
    Ok(stor.path("d"))
}

pub fn add_bar_foo_folder_with_hidden(stor: &TestFileStorage) -> Result<PathBuf, Error> {
    let bar = PathBuf::from("bar");
    let foo_bar = bar.join(".foo");

    for (i, folder) in [bar, foo_bar].into_iter().enumerate() {
        stor.create_dir_all(stor.path(&folder))?;

        for (j, file) in ["hello", "world"].into_iter().enumerate() {
            let file_path = folder.join(format!(
                "{}{}.txt",
                if i == 0 && j == 0 { "." } else { "" },
                file
            ));

            save_text_file(stor, file_path, file)?;
        }
    }

    Ok(stor.path("bar"))
}

pub fn dir_names(path: &Path) -> Vec<String> {
    let mut names = fs::read_dir(path)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect::<Vec<_>>();
    names.sort_unstable();
    names
}
