//! Image uploads stored on local disk and served under `/media`.

use image::{ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

/// Formats accepted for uploads.
pub const ALLOWED_FORMATS: [ImageFormat; 4] = [
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

/// Public URL prefix for stored files.
pub const MEDIA_URL_PREFIX: &str = "/media/";

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Unsupported image format: {0}. Allowed: JPEG, PNG, GIF, WebP")]
    UnsupportedFormat(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Invalid media path: {0}")]
    InvalidPath(String),

    #[error("Media storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which collection an image belongs to; each has its own subdirectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Cocktail,
    Ingredient,
}

impl MediaKind {
    pub fn dir_name(&self) -> &'static str {
        match self {
            MediaKind::Cocktail => "cocktails",
            MediaKind::Ingredient => "ingredients",
        }
    }
}

/// Detect the image format from magic bytes and check it is allowed.
/// Returns the file extension to store it under.
pub fn detect_image(data: &[u8]) -> Result<&'static str, MediaError> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| MediaError::InvalidImage(e.to_string()))?;

    let format = reader
        .format()
        .ok_or_else(|| MediaError::UnsupportedFormat("unknown".to_string()))?;

    if !ALLOWED_FORMATS.contains(&format) {
        return Err(MediaError::UnsupportedFormat(format!("{:?}", format)));
    }

    // Reading the header catches truncated or corrupt files without a full decode
    reader
        .into_dimensions()
        .map_err(|e| MediaError::InvalidImage(e.to_string()))?;

    Ok(match format {
        ImageFormat::Jpeg => "jpg",
        ImageFormat::Png => "png",
        ImageFormat::Gif => "gif",
        _ => "webp",
    })
}

#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_dirs(&self) -> Result<(), MediaError> {
        for kind in [MediaKind::Cocktail, MediaKind::Ingredient] {
            tokio::fs::create_dir_all(self.root.join(kind.dir_name())).await?;
        }
        Ok(())
    }

    /// Validate and write an uploaded image. Returns its public URL.
    pub async fn save(&self, kind: MediaKind, data: &[u8]) -> Result<String, MediaError> {
        let ext = detect_image(data)?;
        let file_name = format!("{}.{}", Uuid::new_v4(), ext);

        let dir = self.root.join(kind.dir_name());
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&file_name), data).await?;

        Ok(format!(
            "{}{}/{}",
            MEDIA_URL_PREFIX,
            kind.dir_name(),
            file_name
        ))
    }

    /// Map a public URL back to a path inside the store.
    fn resolve(&self, url: &str) -> Result<PathBuf, MediaError> {
        let relative = url
            .strip_prefix(MEDIA_URL_PREFIX)
            .ok_or_else(|| MediaError::InvalidPath(url.to_string()))?;

        let relative = Path::new(relative);
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(MediaError::InvalidPath(url.to_string()));
        }

        Ok(self.root.join(relative))
    }

    /// Delete the file behind `url`. A file that is already gone is not an error.
    pub async fn remove(&self, url: &str) -> Result<(), MediaError> {
        let path = self.resolve(url)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "Image file already missing");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Best-effort removal used after the owning record is already gone.
    pub async fn remove_logged(&self, url: &str) {
        if let Err(e) = self.remove(url).await {
            tracing::warn!(url, error = %e, "Failed to remove image file");
        }
    }
}

#[cfg(test)]
pub(crate) mod test_images {
    use image::{ImageBuffer, ImageFormat, Rgb};
    use std::io::Cursor;

    pub fn encode(format: ImageFormat) -> Vec<u8> {
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_pixel(4, 4, Rgb([200, 30, 60]));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    pub fn png() -> Vec<u8> {
        encode(ImageFormat::Png)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_detects_allowed_formats() {
        assert_eq!(detect_image(&test_images::png()).unwrap(), "png");
        assert_eq!(
            detect_image(&test_images::encode(ImageFormat::Jpeg)).unwrap(),
            "jpg"
        );
        assert_eq!(
            detect_image(&test_images::encode(ImageFormat::Gif)).unwrap(),
            "gif"
        );
    }

    #[test]
    fn test_rejects_non_images() {
        let err = detect_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, MediaError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_rejects_truncated_png() {
        let png = test_images::png();
        let err = detect_image(&png[..12]).unwrap_err();
        assert!(matches!(err, MediaError::InvalidImage(_)));
    }

    #[tokio::test]
    async fn test_save_and_remove() {
        let dir = TempDir::new().unwrap();
        let store = MediaStore::new(dir.path());

        let url = store
            .save(MediaKind::Cocktail, &test_images::png())
            .await
            .unwrap();
        assert!(url.starts_with("/media/cocktails/"));
        assert!(url.ends_with(".png"));

        let path = dir.path().join(url.trim_start_matches("/media/"));
        assert!(path.exists());

        store.remove(&url).await.unwrap();
        assert!(!path.exists());

        // Second removal tolerates the missing file
        store.remove(&url).await.unwrap();
    }

    #[tokio::test]
    async fn test_save_rejects_invalid_upload_without_writing() {
        let dir = TempDir::new().unwrap();
        let store = MediaStore::new(dir.path());

        assert!(store
            .save(MediaKind::Ingredient, b"GIF-ish but not really")
            .await
            .is_err());
        assert!(!dir.path().join("ingredients").exists());
    }

    #[tokio::test]
    async fn test_remove_rejects_path_traversal() {
        let dir = TempDir::new().unwrap();
        let store = MediaStore::new(dir.path());

        for url in [
            "/media/../secret.txt",
            "/media/cocktails/../../etc/passwd",
            "/etc/passwd",
        ] {
            assert!(matches!(
                store.remove(url).await,
                Err(MediaError::InvalidPath(_))
            ));
        }
    }
}
