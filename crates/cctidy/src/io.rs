//! File reading, backups, and atomic writes.
//!
//! Writes go to a temp file in the destination directory and are renamed
//! over the original, so an interrupted run never leaves a truncated
//! config file behind. The original file's permission bits are preserved.

use std::io::Write as _;
use std::path::{
    Path,
    PathBuf,
};

use eyre::{
    Result,
    WrapErr,
};

/// Reads a file, mapping "not found" to `None`.
pub async fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).wrap_err_with(|| format!("failed to read {}", path.display())),
    }
}

/// Copies `path` to `<path>.bak`, overwriting any previous backup.
pub async fn back_up(path: &Path) -> Result<PathBuf> {
    let backup_path = backup_path(path);
    tokio::fs::copy(path, &backup_path)
        .await
        .wrap_err_with(|| format!("failed to back up {}", path.display()))?;
    Ok(backup_path)
}

pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".bak");
    PathBuf::from(name)
}

/// Atomically replaces `path` with `bytes`.
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let path = path.to_path_buf();
    let bytes = bytes.to_vec();
    tokio::task::spawn_blocking(move || write_atomic_sync(&path, &bytes)).await?
}

fn write_atomic_sync(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| eyre::eyre!("no parent directory for {}", path.display()))?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)
        .wrap_err_with(|| format!("failed to create temp file in {}", parent.display()))?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;

    // Keep the original permission bits; the temp file defaults to 0600.
    if let Ok(metadata) = std::fs::metadata(path) {
        std::fs::set_permissions(temp.path(), metadata.permissions())?;
    }

    temp.persist(path)
        .wrap_err_with(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}
