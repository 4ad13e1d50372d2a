//! Reading captured photos from disk.

use std::path::Path;

use snowdex_core::{ImageData, ImageError};

/// Read a photo from `path` and decode it into [`ImageData`].
///
/// Accepts raw PNG/JPEG/GIF/WebP files as well as text files holding a data
/// URI, which is what a browser export of a capture looks like.
///
/// # Errors
///
/// Returns `ImageError` if the file cannot be read, is empty, or is not a
/// recognized image.
pub async fn read_image(path: impl AsRef<Path>) -> Result<ImageData, ImageError> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Read image");

    if bytes.starts_with(b"data:") {
        let uri = String::from_utf8_lossy(&bytes);
        return ImageData::from_data_uri(uri.trim());
    }

    ImageData::from_bytes(bytes)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";

    #[tokio::test]
    async fn test_read_raw_png() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("snowman.png");
        std::fs::write(&path, PNG_BYTES).unwrap();

        let image = read_image(&path).await.unwrap();
        assert_eq!(image.mime_type(), "image/png");
        assert_eq!(image.as_bytes(), PNG_BYTES);
    }

    #[tokio::test]
    async fn test_read_data_uri_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("snowman.txt");
        let uri = ImageData::from_bytes(PNG_BYTES.to_vec()).unwrap().to_data_uri();
        std::fs::write(&path, format!("{uri}\n")).unwrap();

        let image = read_image(&path).await.unwrap();
        assert_eq!(image.as_bytes(), PNG_BYTES);
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let err = read_image(tmp.path().join("nope.jpg")).await.unwrap_err();
        assert!(matches!(err, ImageError::Io(_)));
    }

    #[tokio::test]
    async fn test_read_empty_and_unknown() {
        let tmp = tempfile::tempdir().unwrap();
        let empty = tmp.path().join("empty.jpg");
        let text = tmp.path().join("notes.txt");
        std::fs::write(&empty, b"").unwrap();
        std::fs::write(&text, b"just some notes").unwrap();

        assert!(matches!(read_image(&empty).await, Err(ImageError::Empty)));
        assert!(matches!(
            read_image(&text).await,
            Err(ImageError::UnsupportedFormat)
        ));
    }
}
