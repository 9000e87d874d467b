//! Atomic file write using the write-rename pattern.
//!
//! Writes data to a temporary file (`{path}.tmp`), calls `sync_all()` to
//! ensure bytes are flushed to persistent storage, then atomically renames
//! the temp file to the final path. A crash during the write leaves the
//! previous save untouched.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Path of the temporary file used while writing `path`.
pub fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Atomically writes `data` to `path`.
///
/// 1. Write to `{path}.tmp`
/// 2. `sync_all()` to flush to disk
/// 3. `rename` temp to final path (atomic on POSIX; near-atomic on Windows)
pub fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let tmp_path = tmp_path_for(path);

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = File::create(&tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;

    fs::rename(&tmp_path, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("savegame_atomic_write_test_{name}"));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_tmp_path_appends_suffix() {
        assert_eq!(
            tmp_path_for(Path::new("saves/autosave.tsvg")),
            PathBuf::from("saves/autosave.tsvg.tmp")
        );
    }

    #[test]
    fn test_atomic_write_creates_file() {
        let dir = test_dir("creates_file");
        let path = dir.join("game.tsvg");

        atomic_write(&path, b"hello world").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"hello world");
        assert!(!tmp_path_for(&path).exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_atomic_write_overwrites_existing() {
        let dir = test_dir("overwrites");
        let path = dir.join("game.tsvg");

        atomic_write(&path, b"round 1").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"round 1");

        atomic_write(&path, b"round 2").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"round 2");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let dir = test_dir("parent_dirs");
        let path = dir.join("nested").join("deep").join("game.tsvg");

        atomic_write(&path, b"nested data").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"nested data");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_atomic_write_replaces_leftover_tmp() {
        let dir = test_dir("leftover_tmp");
        let path = dir.join("game.tsvg");
        let tmp_path = tmp_path_for(&path);

        fs::write(&path, b"original").unwrap();
        fs::write(&tmp_path, b"partial garbage").unwrap();

        atomic_write(&path, b"new save").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"new save");
        assert!(!tmp_path.exists());

        let _ = fs::remove_dir_all(&dir);
    }
}
