//! Finding the backing spreadsheet for a category.

use std::{
  fs,
  path::{Path, PathBuf},
  time::SystemTime,
};

use gym_core::Category;

use crate::{Error, Result};

/// Directory holding `category`'s spreadsheets.
pub fn category_dir(root: &Path, category: Category) -> PathBuf {
  root.join(category.dir_name())
}

/// The newest `<label>_*.xlsx` file in the category directory.
///
/// Newest is by creation time, or modification time where the filesystem
/// does not record creation. Equal timestamps fall back to the path so the
/// choice is stable.
pub fn locate(root: &Path, category: Category) -> Result<PathBuf> {
  let dir = category_dir(root, category);
  let pattern = format!(
    "{}/{}_*.xlsx",
    glob::Pattern::escape(&dir.to_string_lossy()),
    category.file_label()
  );

  let mut newest: Option<(SystemTime, PathBuf)> = None;
  for path in glob::glob(&pattern)?.filter_map(Result::ok) {
    let meta = fs::metadata(&path)?;
    if !meta.is_file() {
      continue;
    }
    let stamp = meta.created().or_else(|_| meta.modified())?;
    if newest.as_ref().is_none_or(|(t, p)| (stamp, &path) > (*t, p)) {
      newest = Some((stamp, path));
    }
  }

  newest.map(|(_, path)| path).ok_or(Error::NoBackingFile {
    dir,
    label: category.file_label(),
  })
}
