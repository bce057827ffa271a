//! Whole-file reads and replace-by-rename writes.

use std::{
  io::ErrorKind,
  path::{Path, PathBuf},
};

use tokio::{fs::File, io::AsyncWriteExt as _};

use crate::Result;

/// Contents of `path`, or `None` when it does not exist.
pub async fn read_if_exists(path: &Path) -> Result<Option<Vec<u8>>> {
  match tokio::fs::read(path).await {
    Ok(bytes) => Ok(Some(bytes)),
    Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
    Err(e) => Err(e.into()),
  }
}

/// Write `bytes` to a sibling temp file, flush it to disk, then rename it
/// over `path`. Readers see either the old contents or the new, never a
/// partial write.
pub async fn write_replace(path: &Path, bytes: &[u8]) -> Result<()> {
  let tmp = temp_sibling(path);
  let mut file = File::create(&tmp).await?;
  file.write_all(bytes).await?;
  file.sync_all().await?;
  drop(file);
  tokio::fs::rename(&tmp, path).await?;
  Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
  let mut name = path.file_name().unwrap_or_default().to_os_string();
  name.push(".tmp");
  path.with_file_name(name)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn write_replace_swaps_contents_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.json");

    write_replace(&path, b"old").await.unwrap();
    write_replace(&path, b"new").await.unwrap();

    assert_eq!(read_if_exists(&path).await.unwrap().as_deref(), Some(&b"new"[..]));
    assert!(!temp_sibling(&path).exists());
  }

  #[tokio::test]
  async fn write_replace_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gone").join("data.json");
    assert!(write_replace(&path, b"x").await.is_err());
    assert!(read_if_exists(&path).await.unwrap().is_none());
  }

  #[test]
  fn temp_file_sits_next_to_target() {
    assert_eq!(
      temp_sibling(Path::new("/var/lib/hbnb/data.json")),
      PathBuf::from("/var/lib/hbnb/data.json.tmp")
    );
  }
}
