//! Cross-process write lock for a category directory.

use std::{
  fs::{File, OpenOptions},
  path::Path,
};

use fs2::FileExt;

use crate::Result;

/// Holds an exclusive advisory lock on `<dir>/.<name>.lock` until dropped.
pub(crate) struct DirLock {
  file: File,
}

impl DirLock {
  /// Block until the lock is held.
  pub(crate) fn acquire(dir: &Path) -> Result<Self> {
    let name = dir
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .unwrap_or_default();
    let path = dir.join(format!(".{name}.lock"));
    let file = OpenOptions::new()
      .create(true)
      .read(true)
      .write(true)
      .truncate(false)
      .open(&path)?;
    file.lock_exclusive()?;
    Ok(Self { file })
  }
}

impl Drop for DirLock {
  fn drop(&mut self) { let _ = FileExt::unlock(&self.file); }
}
