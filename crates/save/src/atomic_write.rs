//! Atomic file write using the write-rename pattern.
//!
//! Writes data to a temporary file (`{path}.tmp`), calls `sync_all()` to
//! flush bytes to persistent storage, then renames the temp file over the
//! final path. A crash mid-write leaves the previous save untouched.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

pub fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let tmp_path = path.with_extension("tmp");

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = File::create(&tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;

    // atomic on POSIX; near-atomic on Windows
    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("hearthstead_atomic_write_{name}"));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_creates_file_and_cleans_temp() {
        let dir = test_dir("creates");
        let path = dir.join("slot.hstd");

        atomic_write(&path, b"hello world").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"hello world");
        assert!(!path.with_extension("tmp").exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_overwrites_existing() {
        let dir = test_dir("overwrites");
        let path = dir.join("slot.hstd");

        atomic_write(&path, b"version 1").unwrap();
        atomic_write(&path, b"version 2").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"version 2");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_creates_parent_dirs() {
        let dir = test_dir("parents");
        let path = dir.join("nested/deep/slot.hstd");

        atomic_write(&path, b"nested data").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"nested data");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_succeeds_despite_stale_temp_file() {
        // a leftover .tmp from a crashed write must not block a new write
        let dir = test_dir("stale_tmp");
        let path = dir.join("slot.hstd");

        fs::write(&path, b"original").unwrap();
        fs::write(path.with_extension("tmp"), b"partial garbage").unwrap();

        atomic_write(&path, b"new save").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"new save");
        assert!(!path.with_extension("tmp").exists());

        let _ = fs::remove_dir_all(&dir);
    }
}
