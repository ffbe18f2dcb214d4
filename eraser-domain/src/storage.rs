use rand::distributions::{Alphanumeric, DistString};
use std::cell::RefCell;
use std::fs;
use std::io::{self, Read, Seek, Write};
use std::path::{Path, PathBuf};

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::io::SeekFrom;
#[cfg(test)]
use std::sync::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
#[cfg(test)]
use std::thread;

/// Used when the file system doesn't report a usable preferred block size.
pub const DEFAULT_BLOCK_SIZE: usize = 512;

// anything at or below this is not a real block size
const MIN_BLOCK_SIZE: u64 = 16;

const MIN_HIDDEN_NAME_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMode {
    Read,
    Write,
}

#[derive(Debug)]
pub enum Error {
    CreateDir(io::Error),
    CreateFile(io::Error),
    OpenFile(FileMode, io::Error),
    Metadata(io::Error),
    Permissions(io::Error),
    FlushFile(io::Error),
    SyncFile(io::Error),
    TruncateFile(io::Error),
    RenameFile(io::Error),
    RemoveFile(io::Error),
    RemoveDir(io::Error),
    DirEntries(io::Error),
    FileAccess,
}

impl Error {
    /// The kind of the underlying I/O failure, if there is one.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Error::CreateDir(inner)
            | Error::CreateFile(inner)
            | Error::OpenFile(_, inner)
            | Error::Metadata(inner)
            | Error::Permissions(inner)
            | Error::FlushFile(inner)
            | Error::SyncFile(inner)
            | Error::TruncateFile(inner)
            | Error::RenameFile(inner)
            | Error::RemoveFile(inner)
            | Error::RemoveDir(inner)
            | Error::DirEntries(inner) => Some(inner.kind()),
            Error::FileAccess => None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::CreateDir(inner) => write!(f, "Unable to create a new directory: {inner}"),
            Error::CreateFile(inner) => write!(f, "Unable to create a new file: {inner}"),
            Error::OpenFile(mode, inner) => {
                write!(f, "Unable to open the file in {mode:?} mode: {inner}")
            }
            Error::Metadata(inner) => write!(f, "Unable to read file metadata: {inner}"),
            Error::Permissions(inner) => write!(f, "Unable to change permissions: {inner}"),
            Error::FlushFile(inner) => write!(f, "Unable to flush the file: {inner}"),
            Error::SyncFile(inner) => write!(f, "Unable to sync the file to disk: {inner}"),
            Error::TruncateFile(inner) => write!(f, "Unable to truncate the file: {inner}"),
            Error::RenameFile(inner) => write!(f, "Unable to rename the file: {inner}"),
            Error::RemoveFile(inner) => write!(f, "Unable to remove the file: {inner}"),
            Error::RemoveDir(inner) => write!(f, "Unable to remove dir: {inner}"),
            Error::DirEntries(inner) => write!(f, "Unable to read directory: {inner}"),
            Error::FileAccess => f.write_str("Wrong entry type for this operation"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FileAccess => None,
            Error::CreateDir(inner)
            | Error::CreateFile(inner)
            | Error::OpenFile(_, inner)
            | Error::Metadata(inner)
            | Error::Permissions(inner)
            | Error::FlushFile(inner)
            | Error::SyncFile(inner)
            | Error::TruncateFile(inner)
            | Error::RenameFile(inner)
            | Error::RemoveFile(inner)
            | Error::RemoveDir(inner)
            | Error::DirEntries(inner) => Some(inner),
        }
    }
}

/// What a path points at, without following symbolic links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    Other,
}

impl From<fs::FileType> for EntryKind {
    fn from(file_type: fs::FileType) -> Self {
        if file_type.is_symlink() {
            EntryKind::Symlink
        } else if file_type.is_dir() {
            EntryKind::Dir
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub path: PathBuf,
    pub kind: EntryKind,
}

pub trait Storage<RW>: Send + Sync
where
    RW: Read + Write + Seek,
{
    fn create_dir_all<P: AsRef<Path>>(&self, path: P) -> Result<(), Error>;
    fn create_file<P: AsRef<Path>>(&self, path: P) -> Result<Entry<RW>, Error>;
    fn entry_kind<P: AsRef<Path>>(&self, path: P) -> Result<EntryKind, Error>;
    fn read_file<P: AsRef<Path>>(&self, path: P) -> Result<Entry<RW>, Error>;
    /// Opens an existing file for reading and writing, keeping its content.
    fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<Entry<RW>, Error>;
    fn flush_file(&self, file: &Entry<RW>) -> Result<(), Error>;
    /// Flushes buffered bytes and waits until they reach the medium.
    fn sync_file(&self, file: &Entry<RW>) -> Result<(), Error>;
    fn file_len(&self, file: &Entry<RW>) -> Result<u64, Error>;
    fn block_size(&self, _file: &Entry<RW>) -> Result<usize, Error> {
        Ok(DEFAULT_BLOCK_SIZE)
    }
    fn hard_links<P: AsRef<Path>>(&self, _path: P) -> Result<u64, Error> {
        Ok(1)
    }
    /// Grants the owner read and write permission.
    fn make_writable<P: AsRef<Path>>(&self, path: P) -> Result<(), Error>;
    fn truncate_file(&self, file: &Entry<RW>, len: u64) -> Result<(), Error>;
    /// Renames the file to a random name and unlinks it.
    fn remove_file(&self, file: Entry<RW>) -> Result<(), Error>;
    /// Unlinks a symbolic link without touching its target.
    fn remove_link<P: AsRef<Path>>(&self, path: P) -> Result<(), Error>;
    /// Removes an empty directory.
    fn remove_dir(&self, dir: Entry<RW>) -> Result<(), Error>;
    /// Lists the immediate children of a directory, sorted by name.
    fn read_dir(&self, dir: &Entry<RW>) -> Result<Vec<DirEntry>, Error>;
}

pub struct FileStorage;

impl FileStorage {
    fn random_sibling(path: &Path) -> PathBuf {
        let name_len = path
            .file_name()
            .map_or(0, |name| name.len())
            .max(MIN_HIDDEN_NAME_LEN);

        loop {
            let candidate =
                path.with_file_name(Alphanumeric.sample_string(&mut rand::thread_rng(), name_len));
            if fs::symlink_metadata(&candidate).is_err() {
                break candidate;
            }
        }
    }
}

impl Storage<fs::File> for FileStorage {
    fn create_dir_all<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        fs::create_dir_all(&path).map_err(Error::CreateDir)
    }

    fn create_file<P: AsRef<Path>>(&self, path: P) -> Result<Entry<fs::File>, Error> {
        let path = path.as_ref().to_path_buf();
        let file = fs::File::options()
            .create_new(true)
            .read(true)
            .write(true)
            .open(&path)
            .map_err(Error::CreateFile)?;
        Ok(Entry::File(FileData {
            path,
            stream: RefCell::new(file),
        }))
    }

    fn entry_kind<P: AsRef<Path>>(&self, path: P) -> Result<EntryKind, Error> {
        fs::symlink_metadata(path)
            .map(|meta| meta.file_type().into())
            .map_err(Error::Metadata)
    }

    fn read_file<P: AsRef<Path>>(&self, path: P) -> Result<Entry<fs::File>, Error> {
        let path = path.as_ref().to_path_buf();
        if path.is_dir() {
            Ok(Entry::Dir(path))
        } else {
            let file = fs::File::open(&path).map_err(|e| Error::OpenFile(FileMode::Read, e))?;
            Ok(Entry::File(FileData {
                path,
                stream: RefCell::new(file),
            }))
        }
    }

    fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<Entry<fs::File>, Error> {
        let path = path.as_ref().to_path_buf();
        let file = fs::File::options()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|e| Error::OpenFile(FileMode::Write, e))?;

        Ok(Entry::File(FileData {
            path,
            stream: RefCell::new(file),
        }))
    }

    fn flush_file(&self, file: &Entry<fs::File>) -> Result<(), Error> {
        file.try_writer()?
            .borrow_mut()
            .flush()
            .map_err(Error::FlushFile)
    }

    fn sync_file(&self, file: &Entry<fs::File>) -> Result<(), Error> {
        let mut stream = file.try_writer()?.borrow_mut();
        stream.flush().map_err(Error::FlushFile)?;
        stream.sync_data().map_err(Error::SyncFile)
    }

    fn file_len(&self, file: &Entry<fs::File>) -> Result<u64, Error> {
        let fs_file = match file {
            Entry::File(FileData { stream, .. }) => stream.borrow(),
            Entry::Dir(_) => return Err(Error::FileAccess),
        };
        let file_meta = fs::File::metadata(&fs_file).map_err(Error::Metadata)?;
        Ok(file_meta.len())
    }

    #[cfg(unix)]
    fn block_size(&self, file: &Entry<fs::File>) -> Result<usize, Error> {
        use std::os::unix::fs::MetadataExt;

        let fs_file = file.try_reader()?.borrow();
        let blksize = fs_file.metadata().map_err(Error::Metadata)?.blksize();
        if blksize > MIN_BLOCK_SIZE {
            Ok(blksize.try_into().unwrap_or(DEFAULT_BLOCK_SIZE))
        } else {
            Ok(DEFAULT_BLOCK_SIZE)
        }
    }

    #[cfg(unix)]
    fn hard_links<P: AsRef<Path>>(&self, path: P) -> Result<u64, Error> {
        use std::os::unix::fs::MetadataExt;

        fs::symlink_metadata(path)
            .map(|meta| meta.nlink())
            .map_err(Error::Metadata)
    }

    fn make_writable<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let mut perms = fs::metadata(&path)
            .map_err(Error::Metadata)?
            .permissions();

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let mode = perms.mode();
            if mode & 0o600 == 0o600 {
                return Ok(());
            }
            perms.set_mode(mode | 0o600);
        }

        #[cfg(not(unix))]
        {
            if !perms.readonly() {
                return Ok(());
            }
            perms.set_readonly(false);
        }

        fs::set_permissions(&path, perms).map_err(Error::Permissions)
    }

    fn truncate_file(&self, file: &Entry<fs::File>, len: u64) -> Result<(), Error> {
        file.try_writer()?
            .borrow()
            .set_len(len)
            .map_err(Error::TruncateFile)
    }

    fn remove_file(&self, file: Entry<fs::File>) -> Result<(), Error> {
        if file.is_dir() {
            return Err(Error::FileAccess);
        }

        let path = file.path().to_path_buf();
        // the handle has to be closed before renaming on some platforms
        drop(file);

        let hidden = Self::random_sibling(&path);
        fs::rename(&path, &hidden).map_err(Error::RenameFile)?;
        fs::remove_file(hidden).map_err(Error::RemoveFile)
    }

    fn remove_link<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        fs::remove_file(path).map_err(Error::RemoveFile)
    }

    fn remove_dir(&self, dir: Entry<fs::File>) -> Result<(), Error> {
        if !dir.is_dir() {
            return Err(Error::FileAccess);
        }

        fs::remove_dir(dir.path()).map_err(Error::RemoveDir)
    }

    fn read_dir(&self, dir: &Entry<fs::File>) -> Result<Vec<DirEntry>, Error> {
        if !dir.is_dir() {
            return Err(Error::FileAccess);
        }

        walkdir::WalkDir::new(dir.path())
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .map(|res| {
                res.map(|e| DirEntry {
                    path: e.path().to_owned(),
                    kind: e.file_type().into(),
                })
                .map_err(|e| Error::DirEntries(e.into()))
            })
            .collect()
    }
}

/// An in-memory stream that can be told to fail once it has written a number of bytes.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct InMemoryStream {
    cursor: io::Cursor<Vec<u8>>,
    write_budget: Option<usize>,
}

#[cfg(test)]
impl InMemoryStream {
    fn new(buf: Vec<u8>, write_budget: Option<usize>) -> Self {
        Self {
            cursor: io::Cursor::new(buf),
            write_budget,
        }
    }

    pub fn get_ref(&self) -> &Vec<u8> {
        self.cursor.get_ref()
    }
}

#[cfg(test)]
impl Read for InMemoryStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.cursor.read(buf)
    }
}

#[cfg(test)]
impl Write for InMemoryStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.write_budget {
            Some(0) if !buf.is_empty() => {
                Err(io::Error::new(io::ErrorKind::Other, "injected write failure"))
            }
            Some(budget) => {
                let written = self.cursor.write(&buf[..buf.len().min(budget)])?;
                self.write_budget = Some(budget - written);
                Ok(written)
            }
            None => self.cursor.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.cursor.flush()
    }
}

#[cfg(test)]
impl Seek for InMemoryStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.cursor.seek(pos)
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct InMemoryStorage {
    pub files: RwLock<HashMap<PathBuf, IMFile>>,
    write_faults: Mutex<HashMap<PathBuf, usize>>,
}

#[cfg(test)]
impl InMemoryStorage {
    fn save_text_file<P: AsRef<Path>>(&self, path: P, content: &str) {
        let buf = content.bytes().collect::<Vec<_>>();
        self.save_file(path, IMFile::File(InMemoryFile::new(buf)));
    }

    fn save_file<P: AsRef<Path>>(&self, path: P, im_file: IMFile) {
        self.mut_files().insert(path.as_ref().to_owned(), im_file);
    }

    pub(crate) fn files(&self) -> RwLockReadGuard<'_, HashMap<PathBuf, IMFile>> {
        loop {
            match self.files.try_read() {
                Ok(files) => break files,
                _ => thread::sleep(std::time::Duration::from_micros(100)),
            }
        }
    }

    pub(crate) fn mut_files(&self) -> RwLockWriteGuard<'_, HashMap<PathBuf, IMFile>> {
        loop {
            match self.files.try_write() {
                Ok(files) => break files,
                _ => thread::sleep(std::time::Duration::from_micros(100)),
            }
        }
    }

    fn not_found() -> io::Error {
        io::Error::new(io::ErrorKind::NotFound, "no such file or directory")
    }

    /// Streams opened for `path` fail after writing `bytes` bytes.
    pub(crate) fn fail_writes_after<P: AsRef<Path>>(&self, path: P, bytes: usize) {
        self.write_faults
            .lock()
            .unwrap()
            .insert(path.as_ref().to_owned(), bytes);
    }

    pub(crate) fn content<P: AsRef<Path>>(&self, path: P) -> Option<Vec<u8>> {
        match self.files().get(path.as_ref()) {
            Some(IMFile::File(f)) => Some(f.buf.clone()),
            _ => None,
        }
    }

    fn update_file<P: AsRef<Path>>(&self, path: P, update: impl FnOnce(&mut InMemoryFile)) {
        if let Some(IMFile::File(f)) = self.mut_files().get_mut(path.as_ref()) {
            update(f);
        }
    }

    // --------------------------------
    // TEST DATA
    // -------------------------------

    pub(crate) fn add_hello_txt(&self) {
        self.save_text_file("hello.txt", "hello world");
    }

    pub(crate) fn add_large_bin(&self, len: usize) {
        self.save_file(
            "large.bin",
            IMFile::File(InMemoryFile::new(vec![0x5A; len])),
        );
    }

    pub(crate) fn add_bar_foo_folder(&self) {
        self.save_file("bar/", IMFile::Dir);
        self.save_text_file("bar/hello.txt", "hello");
        self.save_text_file("bar/world.txt", "world");
        self.save_file("bar/foo/", IMFile::Dir);
        self.save_text_file("bar/foo/hello.txt", "hello");
        self.save_text_file("bar/foo/world.txt", "world");
    }

    pub(crate) fn add_bar_foo_folder_with_hidden(&self) {
        self.save_file("bar/", IMFile::Dir);
        self.save_text_file("bar/.hello.txt", "hello");
        self.save_text_file("bar/world.txt", "world");
        self.save_file("bar/.foo/", IMFile::Dir);
        self.save_text_file("bar/.foo/hello.txt", "hello");
        self.save_text_file("bar/.foo/world.txt", "world");
    }

    pub(crate) fn add_flat_folder(&self) {
        self.save_file("flat/", IMFile::Dir);
        self.save_text_file("flat/a.txt", "aaaa");
        self.save_text_file("flat/b.txt", "bbbbbb");
    }

    pub(crate) fn add_link<P: AsRef<Path>, T: AsRef<Path>>(&self, path: P, target: T) {
        self.save_file(path, IMFile::Link(target.as_ref().to_owned()));
    }

    pub(crate) fn set_hard_links<P: AsRef<Path>>(&self, path: P, links: u64) {
        self.update_file(path, |f| f.links = links);
    }

    pub(crate) fn lock_permissions<P: AsRef<Path>>(&self, path: P) {
        self.update_file(path, |f| f.locked = true);
    }
}

#[cfg(test)]
impl Storage<InMemoryStream> for InMemoryStorage {
    fn create_dir_all<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let mut files = self.mut_files();
        for dir in path.as_ref().ancestors().filter(|p| !p.as_os_str().is_empty()) {
            match files.get(dir) {
                Some(IMFile::Dir) => {}
                Some(_) => {
                    return Err(Error::CreateDir(io::Error::new(
                        io::ErrorKind::AlreadyExists,
                        "not a directory",
                    )))
                }
                None => {
                    files.insert(dir.to_owned(), IMFile::Dir);
                }
            }
        }
        Ok(())
    }

    fn create_file<P: AsRef<Path>>(&self, path: P) -> Result<Entry<InMemoryStream>, Error> {
        let file_path = path.as_ref().to_path_buf();

        if self.files().contains_key(&file_path) {
            return Err(Error::CreateFile(io::Error::new(
                io::ErrorKind::AlreadyExists,
                "file exists",
            )));
        }

        self.save_file(file_path.clone(), IMFile::File(InMemoryFile::default()));

        Ok(Entry::File(FileData {
            path: file_path,
            stream: RefCell::new(InMemoryStream::default()),
        }))
    }

    fn entry_kind<P: AsRef<Path>>(&self, path: P) -> Result<EntryKind, Error> {
        match self.files().get(path.as_ref()) {
            Some(IMFile::File(_)) => Ok(EntryKind::File),
            Some(IMFile::Dir) => Ok(EntryKind::Dir),
            Some(IMFile::Link(_)) => Ok(EntryKind::Symlink),
            None => Err(Error::Metadata(Self::not_found())),
        }
    }

    fn read_file<P: AsRef<Path>>(&self, path: P) -> Result<Entry<InMemoryStream>, Error> {
        let in_file = self
            .files()
            .get(path.as_ref())
            .cloned()
            .ok_or_else(|| Error::OpenFile(FileMode::Read, Self::not_found()))?;

        let file_path = path.as_ref().to_path_buf();

        match in_file {
            IMFile::Dir => Ok(Entry::Dir(file_path)),
            IMFile::File(f) => Ok(Entry::File(FileData {
                path: file_path,
                stream: RefCell::new(InMemoryStream::new(f.buf, None)),
            })),
            IMFile::Link(_) => Err(Error::FileAccess),
        }
    }

    fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<Entry<InMemoryStream>, Error> {
        let file_path = path.as_ref().to_path_buf();

        let file = self
            .files()
            .get(&file_path)
            .cloned()
            .ok_or_else(|| Error::OpenFile(FileMode::Write, Self::not_found()))?;

        let buf = match file {
            IMFile::File(f) => f.buf,
            IMFile::Dir | IMFile::Link(_) => return Err(Error::FileAccess),
        };
        let budget = self.write_faults.lock().unwrap().get(&file_path).copied();

        Ok(Entry::File(FileData {
            path: file_path,
            stream: RefCell::new(InMemoryStream::new(buf, budget)),
        }))
    }

    fn flush_file(&self, file: &Entry<InMemoryStream>) -> Result<(), Error> {
        if file.is_dir() {
            return Err(Error::FileAccess);
        }

        let writer = file.try_writer()?;
        writer.borrow_mut().flush().map_err(Error::FlushFile)?;

        let buf = writer.borrow().get_ref().clone();
        self.update_file(file.path(), |f| {
            f.len = buf.len();
            f.buf = buf;
        });

        Ok(())
    }

    fn sync_file(&self, file: &Entry<InMemoryStream>) -> Result<(), Error> {
        self.flush_file(file)
    }

    fn file_len(&self, file: &Entry<InMemoryStream>) -> Result<u64, Error> {
        let cur = match file {
            Entry::File(FileData { stream, .. }) => stream.borrow(),
            Entry::Dir(_) => return Err(Error::FileAccess),
        };

        Ok(cur.get_ref().len() as u64)
    }

    fn hard_links<P: AsRef<Path>>(&self, path: P) -> Result<u64, Error> {
        match self.files().get(path.as_ref()) {
            Some(IMFile::File(f)) => Ok(f.links),
            Some(_) => Ok(1),
            None => Err(Error::Metadata(Self::not_found())),
        }
    }

    fn make_writable<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        match self.files().get(path.as_ref()) {
            Some(IMFile::File(f)) if f.locked => Err(Error::Permissions(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "operation not permitted",
            ))),
            Some(_) => Ok(()),
            None => Err(Error::Metadata(Self::not_found())),
        }
    }

    fn truncate_file(&self, file: &Entry<InMemoryStream>, len: u64) -> Result<(), Error> {
        let writer = file.try_writer()?;
        let len = usize::try_from(len).map_err(|_| {
            Error::TruncateFile(io::Error::new(io::ErrorKind::InvalidInput, "too large"))
        })?;
        writer.borrow_mut().cursor.get_mut().resize(len, 0);
        Ok(())
    }

    fn remove_file(&self, file: Entry<InMemoryStream>) -> Result<(), Error> {
        if file.is_dir() {
            return Err(Error::FileAccess);
        }

        self.mut_files()
            .remove(file.path())
            .ok_or_else(|| Error::RemoveFile(Self::not_found()))?;
        Ok(())
    }

    fn remove_link<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let mut files = self.mut_files();
        match files.get(path.as_ref()) {
            Some(IMFile::Link(_)) => {
                files.remove(path.as_ref());
                Ok(())
            }
            Some(_) => Err(Error::FileAccess),
            None => Err(Error::RemoveFile(Self::not_found())),
        }
    }

    fn remove_dir(&self, dir: Entry<InMemoryStream>) -> Result<(), Error> {
        if !dir.is_dir() {
            return Err(Error::FileAccess);
        }

        let dir_path = dir.path();
        let mut files = self.mut_files();

        let has_children = files
            .keys()
            .any(|k| k.starts_with(dir_path) && k.as_path() != dir_path);
        if has_children {
            return Err(Error::RemoveDir(io::Error::new(
                io::ErrorKind::Other,
                "directory not empty",
            )));
        }

        files
            .remove(dir_path)
            .map(|_| ())
            .ok_or_else(|| Error::RemoveDir(Self::not_found()))
    }

    fn read_dir(&self, dir: &Entry<InMemoryStream>) -> Result<Vec<DirEntry>, Error> {
        if !dir.is_dir() {
            return Err(Error::FileAccess);
        }

        let dir_path = dir.path();

        let mut entries = self
            .files()
            .iter()
            .filter(|(k, _)| k.parent() == Some(dir_path))
            .map(|(k, f)| DirEntry {
                path: k.clone(),
                kind: match f {
                    IMFile::File(_) => EntryKind::File,
                    IMFile::Dir => EntryKind::Dir,
                    IMFile::Link(_) => EntryKind::Symlink,
                },
            })
            .collect::<Vec<_>>();
        entries.sort_unstable_by(|a, b| a.path.cmp(&b.path));

        Ok(entries)
    }
}

#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryFile {
    pub buf: Vec<u8>,
    pub len: usize,
    pub links: u64,
    pub locked: bool,
}

#[cfg(test)]
impl InMemoryFile {
    fn new(buf: Vec<u8>) -> Self {
        Self {
            len: buf.len(),
            buf,
            links: 1,
            locked: false,
        }
    }
}

#[cfg(test)]
impl Default for InMemoryFile {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IMFile {
    File(InMemoryFile),
    Dir,
    Link(PathBuf),
}

pub struct FileData<RW>
where
    RW: Read + Write + Seek,
{
    path: PathBuf,
    stream: RefCell<RW>,
}

pub enum Entry<RW>
where
    RW: Read + Write + Seek,
{
    File(FileData<RW>),
    Dir(PathBuf),
}

impl<RW> Entry<RW>
where
    RW: Read + Write + Seek,
{
    pub fn path(&self) -> &Path {
        match self {
            Entry::File(FileData { path, .. }) | Entry::Dir(path) => path,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Entry::Dir(_))
    }

    pub fn try_reader(&self) -> Result<&RefCell<RW>, Error> {
        match self {
            Entry::File(file) => Ok(&file.stream),
            Entry::Dir(_) => Err(Error::FileAccess),
        }
    }

    pub fn try_writer(&self) -> Result<&RefCell<RW>, Error> {
        match self {
            Entry::File(file) => Ok(&file.stream),
            Entry::Dir(_) => Err(Error::FileAccess),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted_file_names(file_names: &[PathBuf]) -> Vec<&str> {
        let mut keys = file_names
            .iter()
            .map(|k| k.to_str().unwrap())
            .collect::<Vec<_>>();
        keys.sort_unstable();
        keys
    }

    #[test]
    fn should_create_a_new_file() {
        let stor = InMemoryStorage::default();

        match stor.create_file("hello.txt") {
            Ok(file) => {
                let im_file = stor.files().get(file.path()).cloned();
                assert_eq!(im_file, Some(IMFile::File(InMemoryFile::default())));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn should_throw_an_error_if_file_already_exist() {
        let stor = InMemoryStorage::default();
        stor.add_hello_txt();

        match stor.create_file("hello.txt") {
            Err(Error::CreateFile(_)) => {}
            _ => unreachable!(),
        }
    }

    #[test]
    fn should_not_open_file_to_read() {
        let stor = InMemoryStorage::default();

        match stor.read_file("hello.txt") {
            Err(Error::OpenFile(FileMode::Read, e)) => {
                assert_eq!(e.kind(), io::ErrorKind::NotFound);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn should_not_open_file_to_write() {
        let stor = InMemoryStorage::default();

        match stor.write_file("hello.txt") {
            Err(Error::OpenFile(FileMode::Write, e)) => {
                assert_eq!(e.kind(), io::ErrorKind::NotFound);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn should_keep_content_when_opened_in_write_mode() {
        let stor = InMemoryStorage::default();
        stor.add_hello_txt();

        let file = stor.write_file("hello.txt").unwrap();
        assert_eq!(stor.file_len(&file).unwrap(), 11);
        assert_eq!(stor.content("hello.txt"), Some(b"hello world".to_vec()));
    }

    #[test]
    fn should_write_content_to_file() {
        let stor = InMemoryStorage::default();
        let content = "hello world";

        let file = stor.create_file("hello.txt").unwrap();
        file.try_writer()
            .unwrap()
            .borrow_mut()
            .write_all(content.as_bytes())
            .unwrap();

        match stor.flush_file(&file) {
            Ok(_) => {
                let im_file = stor.files().get(file.path()).cloned();
                assert_eq!(
                    im_file,
                    Some(IMFile::File(InMemoryFile::new(content.as_bytes().to_vec())))
                );
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn should_fail_writes_after_budget() {
        let stor = InMemoryStorage::default();
        stor.add_hello_txt();
        stor.fail_writes_after("hello.txt", 4);

        let file = stor.write_file("hello.txt").unwrap();
        let result = file
            .try_writer()
            .unwrap()
            .borrow_mut()
            .write_all(b"abcdefgh");

        assert!(result.is_err());
    }

    #[test]
    fn should_truncate_file_on_sync() {
        let stor = InMemoryStorage::default();
        stor.add_hello_txt();

        let file = stor.write_file("hello.txt").unwrap();
        stor.truncate_file(&file, 0).unwrap();
        stor.sync_file(&file).unwrap();

        assert_eq!(stor.content("hello.txt"), Some(vec![]));
    }

    #[test]
    fn should_remove_a_file_in_write_mode() {
        let stor = InMemoryStorage::default();
        stor.add_hello_txt();

        let file = stor.write_file("hello.txt").unwrap();
        let file_path = file.path().to_path_buf();

        match stor.remove_file(file) {
            Ok(_) => {
                let im_file = stor.files().get(&file_path).cloned();
                assert_eq!(im_file, None);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn should_get_file_length() {
        let stor = InMemoryStorage::default();
        stor.add_hello_txt();

        let file = stor.read_file("hello.txt").unwrap();

        match stor.file_len(&file) {
            Ok(len) => assert_eq!(len, b"hello world".len() as u64),
            _ => unreachable!(),
        }
    }

    #[test]
    fn should_open_dir() {
        let stor = InMemoryStorage::default();
        stor.add_bar_foo_folder();

        match stor.read_file("bar/foo/") {
            Ok(Entry::Dir(path)) => assert_eq!(path, PathBuf::from("bar/foo/")),
            _ => unreachable!(),
        }
    }

    #[test]
    fn should_classify_entries() {
        let stor = InMemoryStorage::default();
        stor.add_hello_txt();
        stor.add_bar_foo_folder();
        stor.add_link("link.txt", "hello.txt");

        assert_eq!(stor.entry_kind("hello.txt").unwrap(), EntryKind::File);
        assert_eq!(stor.entry_kind("bar/").unwrap(), EntryKind::Dir);
        assert_eq!(stor.entry_kind("link.txt").unwrap(), EntryKind::Symlink);
        match stor.entry_kind("missing.txt") {
            Err(e) => assert_eq!(e.io_kind(), Some(io::ErrorKind::NotFound)),
            _ => unreachable!(),
        }
    }

    #[test]
    fn should_not_remove_non_empty_dir() {
        let stor = InMemoryStorage::default();
        stor.add_bar_foo_folder();

        let dir = stor.read_file("bar/foo/").unwrap();

        match stor.remove_dir(dir) {
            Err(Error::RemoveDir(_)) => assert!(stor.files().contains_key(Path::new("bar/foo/"))),
            _ => unreachable!(),
        }
    }

    #[test]
    fn should_remove_empty_dir() {
        let stor = InMemoryStorage::default();
        stor.create_dir_all("empty/").unwrap();

        let dir = stor.read_file("empty/").unwrap();

        match stor.remove_dir(dir) {
            Ok(()) => assert!(stor.files().is_empty()),
            _ => unreachable!(),
        }
    }

    #[test]
    fn should_return_immediate_children_of_dir() {
        let stor = InMemoryStorage::default();
        stor.add_hello_txt();
        stor.add_bar_foo_folder();

        let file = stor.read_file("bar/").unwrap();

        match stor.read_dir(&file) {
            Ok(entries) => {
                let file_names = entries.iter().map(|e| e.path.clone()).collect::<Vec<_>>();
                assert_eq!(
                    sorted_file_names(&file_names),
                    vec!["bar/foo/", "bar/hello.txt", "bar/world.txt"]
                );
                assert_eq!(entries[0].kind, EntryKind::Dir);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn should_include_hidden_files_names() {
        let stor = InMemoryStorage::default();
        stor.add_hello_txt();
        stor.add_bar_foo_folder_with_hidden();

        let file = stor.read_file("bar/").unwrap();

        match stor.read_dir(&file) {
            Ok(entries) => {
                let file_names = entries.into_iter().map(|e| e.path).collect::<Vec<_>>();
                assert_eq!(
                    sorted_file_names(&file_names),
                    vec!["bar/.foo/", "bar/.hello.txt", "bar/world.txt"]
                );
            }
            _ => unreachable!(),
        }
    }
}
