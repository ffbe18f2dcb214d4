mod common;
use common::*;
use eraser_domain::{EraseError, FsEraser, OverwriteMode};
use std::fs;

#[test]
fn should_erase_file_from_disk() {
    let stor = TestFileStorage::new();
    let path = add_hello_txt(&stor).unwrap();

    match FsEraser::default().erase_file_with_mode(&path, OverwriteMode::Simple) {
        Ok(res) => {
            assert!(!path.exists());
            assert_eq!(res.passes, 1);
            assert_eq!(res.bytes_processed, 11);
            // no renamed leftovers either
            assert!(dir_names(&stor.path("")).is_empty());
        }
        _ => unreachable!(),
    }
}

#[test]
fn should_erase_with_every_mode() {
    let stor = TestFileStorage::new();
    let eraser = FsEraser::default().with_seed(42);

    for mode in OverwriteMode::ALL {
        let path = stor.path(format!("{}.bin", mode.name()));
        fs::write(&path, vec![0xAB; 4096 + 7]).unwrap();

        match eraser.erase_file_with_mode(&path, mode) {
            Ok(res) => {
                assert!(!path.exists());
                assert_eq!(res.passes, mode.pass_count());
                assert_eq!(res.bytes_processed, (4096 + 7) * mode.pass_count() as u64);
            }
            _ => unreachable!(),
        }
    }
}

#[test]
fn should_erase_empty_file() {
    let stor = TestFileStorage::new();
    let path = stor.path("empty");
    fs::write(&path, b"").unwrap();

    match FsEraser::default().erase_file_with_mode(&path, OverwriteMode::Dod) {
        Ok(res) => {
            assert!(!path.exists());
            assert_eq!(res.bytes_processed, 0);
        }
        _ => unreachable!(),
    }
}

#[test]
fn should_erase_disjoint_paths_from_several_threads() {
    let stor = TestFileStorage::new();
    let eraser = FsEraser::default();
    let dir = add_d_folder(&stor).unwrap();
    let files = (0..4)
        .map(|n| {
            let path = stor.path(format!("{n}.bin"));
            fs::write(&path, vec![n as u8; 10_000]).unwrap();
            path
        })
        .collect::<Vec<_>>();

    let dir_handle = {
        let eraser = eraser.clone();
        let dir = dir.clone();
        std::thread::spawn(move || eraser.erase_directory(dir, true))
    };
    let file_handles = files
        .iter()
        .cloned()
        .map(|path| {
            let eraser = eraser.clone();
            std::thread::spawn(move || eraser.erase_file_with_mode(path, OverwriteMode::OpenBsd))
        })
        .collect::<Vec<_>>();

    match dir_handle.join().unwrap() {
        Ok(res) => assert_eq!(res.files_erased, 3),
        _ => unreachable!(),
    }
    for handle in file_handles {
        match handle.join().unwrap() {
            Ok(res) => assert_eq!(res.bytes_processed, 30_000),
            _ => unreachable!(),
        }
    }

    assert!(!dir.exists());
    assert!(files.iter().all(|path| !path.exists()));
    assert!(dir_names(&stor.path("")).is_empty());
}

#[test]
fn should_report_missing_path() {
    match FsEraser::default().erase_file("/nonexistent/path") {
        Err(err @ EraseError::PathNotFound { .. }) => {
            assert_eq!(err.path().unwrap().to_str(), Some("/nonexistent/path"));
            assert!(std::error::Error::source(&err).is_some());
        }
        _ => unreachable!(),
    }
}

#[test]
fn should_not_erase_dir_as_file() {
    let stor = TestFileStorage::new();
    let dir = add_d_folder(&stor).unwrap();

    match FsEraser::default().erase_file(&dir) {
        Err(EraseError::IsDirectoryMismatch {
            expected_dir: false,
            ..
        }) => assert_eq!(dir_names(&dir), vec!["a", "b", "s"]),
        _ => unreachable!(),
    }
}

#[test]
fn should_keep_subdirs_when_not_recursive() {
    let stor = TestFileStorage::new();
    let dir = add_d_folder(&stor).unwrap();

    match FsEraser::default().erase_directory(&dir, false) {
        Ok(res) => {
            assert_eq!(res.files_erased, 2);
            assert_eq!(dir_names(&dir), vec!["s"]);
            assert_eq!(dir_names(&dir.join("s")), vec!["inner"]);
        }
        _ => unreachable!(),
    }
}

#[test]
fn should_remove_whole_tree_when_recursive() {
    let stor = TestFileStorage::new();
    let dir = add_d_folder(&stor).unwrap();

    match FsEraser::default().erase_directory_with_mode(&dir, OverwriteMode::OpenBsd, true) {
        Ok(res) => {
            assert!(!dir.exists());
            assert_eq!(res.files_erased, 3);
            assert_eq!(res.passes, 9);
        }
        _ => unreachable!(),
    }
}

#[test]
fn should_erase_hidden_entries() {
    let stor = TestFileStorage::new();
    let dir = add_bar_foo_folder_with_hidden(&stor).unwrap();

    match FsEraser::default().erase_directory(&dir, true) {
        Ok(res) => {
            assert!(!dir.exists());
            assert_eq!(res.files_erased, 4);
        }
        _ => unreachable!(),
    }
}

#[cfg(unix)]
#[test]
fn should_unlink_symlinks_without_touching_targets() {
    let stor = TestFileStorage::new();
    let target = add_hello_txt(&stor).unwrap();
    let dir = add_d_folder(&stor).unwrap();
    std::os::unix::fs::symlink(&target, dir.join("link")).unwrap();

    match FsEraser::default().erase_directory(&dir, true) {
        Ok(res) => {
            assert!(!dir.exists());
            assert_eq!(res.files_erased, 3);
            assert_eq!(fs::read_to_string(&target).unwrap(), "hello world");
        }
        _ => unreachable!(),
    }
}

#[cfg(unix)]
#[test]
fn should_refuse_symlink_as_file() {
    let stor = TestFileStorage::new();
    let target = add_hello_txt(&stor).unwrap();
    let link = stor.path("link");
    std::os::unix::fs::symlink(&target, &link).unwrap();

    match FsEraser::default().erase_file(&link) {
        Err(EraseError::UnsupportedFileType(_)) => {
            assert_eq!(fs::read_to_string(&target).unwrap(), "hello world");
        }
        _ => unreachable!(),
    }
}

#[cfg(unix)]
#[test]
fn should_refuse_hard_linked_file() {
    let stor = TestFileStorage::new();
    let path = add_hello_txt(&stor).unwrap();
    fs::hard_link(&path, stor.path("other.txt")).unwrap();

    match FsEraser::default().erase_file(&path) {
        Err(EraseError::HardLinked { links: 2, .. }) => {
            assert_eq!(fs::read_to_string(stor.path("other.txt")).unwrap(), "hello world");
        }
        _ => unreachable!(),
    }
}

#[cfg(unix)]
#[test]
fn should_erase_read_only_file() {
    use std::os::unix::fs::PermissionsExt;

    let stor = TestFileStorage::new();
    let path = add_hello_txt(&stor).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o400)).unwrap();

    match FsEraser::default().erase_file(&path) {
        Ok(_) => assert!(!path.exists()),
        _ => unreachable!(),
    }
}
