//! Filesystem helpers for render outputs.

use std::path::Path;
use tokio::fs;
use tracing::{debug, warn};

use crate::error::{MediaError, MediaResult};

/// Move a file, falling back to copy-and-delete when the destination is on
/// another filesystem (EXDEV). The copy lands in a temp file next to the
/// destination first so the final rename is atomic.
pub async fn move_file(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> MediaResult<()> {
    let src = src.as_ref();
    let dst = dst.as_ref();

    if let Some(parent) = dst.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    match fs::rename(src, dst).await {
        Ok(()) => Ok(()),
        Err(e) if is_cross_device_error(&e) => {
            debug!(src = %src.display(), dst = %dst.display(), "cross-device move, copying");
            copy_and_delete(src, dst).await
        }
        Err(e) => Err(MediaError::from(e)),
    }
}

/// EXDEV is error code 18 on Linux and macOS.
fn is_cross_device_error(e: &std::io::Error) -> bool {
    e.raw_os_error() == Some(18)
}

async fn copy_and_delete(src: &Path, dst: &Path) -> MediaResult<()> {
    let tmp_dst = dst.with_extension("tmp");

    fs::copy(src, &tmp_dst).await?;

    if let Err(e) = fs::rename(&tmp_dst, dst).await {
        let _ = std::fs::remove_file(&tmp_dst);
        return Err(MediaError::from(e));
    }

    // Source removal is best effort
    if let Err(e) = fs::remove_file(src).await {
        warn!(src = %src.display(), error = %e, "failed to remove source after move");
    }

    Ok(())
}

/// Confirm a render produced a plausibly-sized file.
pub async fn verify_output(path: impl AsRef<Path>, min_bytes: u64) -> MediaResult<u64> {
    let path = path.as_ref();
    let meta = fs::metadata(path)
        .await
        .map_err(|_| MediaError::FileNotFound(path.to_path_buf()))?;
    let size = meta.len();
    if size < min_bytes {
        return Err(MediaError::OutputTooSmall {
            path: path.to_path_buf(),
            size,
        });
    }
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_move_file_same_filesystem() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("source.mp4");
        let dst = dir.path().join("dest.mp4");

        fs::write(&src, b"render output").await.unwrap();
        move_file(&src, &dst).await.unwrap();

        assert!(!src.exists());
        assert_eq!(fs::read_to_string(&dst).await.unwrap(), "render output");
    }

    #[tokio::test]
    async fn test_move_file_creates_parent() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("source.mp4");
        let dst = dir.path().join("nested").join("dest.mp4");

        fs::write(&src, b"x").await.unwrap();
        move_file(&src, &dst).await.unwrap();
        assert!(dst.exists());
    }

    #[tokio::test]
    async fn test_verify_output_size_floor() {
        let dir = TempDir::new().unwrap();
        let small = dir.path().join("small.mp4");
        fs::write(&small, vec![0u8; 100]).await.unwrap();

        let err = verify_output(&small, 10 * 1024).await.unwrap_err();
        assert!(matches!(err, MediaError::OutputTooSmall { size: 100, .. }));

        let big = dir.path().join("big.mp4");
        fs::write(&big, vec![0u8; 20 * 1024]).await.unwrap();
        assert_eq!(verify_output(&big, 10 * 1024).await.unwrap(), 20 * 1024);
    }

    #[test]
    fn test_is_cross_device_error() {
        assert!(is_cross_device_error(&std::io::Error::from_raw_os_error(18)));
        assert!(!is_cross_device_error(&std::io::Error::from_raw_os_error(2)));
    }
}
