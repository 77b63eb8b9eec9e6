//! Image storage boundary. The core only ever reads, writes and deletes by
//! opaque filename relative to the upload directory; file content is never
//! interpreted.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::ApiError;

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
pub const MAX_IMAGES_PER_REQUEST: usize = 10;

const ALLOWED_EXTENSIONS: [&str; 5] = ["jpeg", "jpg", "png", "gif", "webp"];

pub trait ImageStore: Send + Sync {
    fn save(&self, filename: &str, bytes: &[u8]) -> io::Result<()>;
    fn remove(&self, filename: &str) -> io::Result<()>;
}

pub struct DiskImageStore {
    dir: PathBuf,
}

impl DiskImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, filename: &str) -> io::Result<PathBuf> {
        // Filenames are opaque basenames; anything that looks like a path
        // component is refused outright.
        if filename.is_empty()
            || filename.contains('/')
            || filename.contains('\\')
            || filename.contains("..")
        {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("refusing suspicious image filename: {}", filename),
            ));
        }
        Ok(self.dir.join(filename))
    }
}

impl ImageStore for DiskImageStore {
    fn save(&self, filename: &str, bytes: &[u8]) -> io::Result<()> {
        fs::write(self.path_for(filename)?, bytes)
    }

    fn remove(&self, filename: &str) -> io::Result<()> {
        let path = self.path_for(filename)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            // Already gone is fine; release is idempotent.
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        }
    }
}

/// Produces a unique stored filename for an upload, keeping only the
/// original extension. Rejects anything outside the image allow-list.
pub fn generate_filename(original_name: &str, content_type: Option<&str>) -> Result<String, ApiError> {
    let extension = Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .ok_or_else(|| {
            ApiError::Validation("Only image files (jpeg, jpg, png, gif, webp) are allowed.".to_string())
        })?;

    let mimetype_ok = content_type.map(|ct| ct.starts_with("image/")).unwrap_or(false);
    if !mimetype_ok || !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ApiError::Validation(
            "Only image files (jpeg, jpg, png, gif, webp) are allowed.".to_string(),
        ));
    }

    Ok(format!("images-{}.{}", Uuid::new_v4(), extension))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_names_are_unique_and_keep_the_extension() {
        let a = generate_filename("front.JPG", Some("image/jpeg")).unwrap();
        let b = generate_filename("front.JPG", Some("image/jpeg")).unwrap();
        assert_ne!(a, b);
        assert!(a.ends_with(".jpg"));
    }

    #[test]
    fn non_image_uploads_are_rejected() {
        assert!(generate_filename("malware.exe", Some("image/png")).is_err());
        assert!(generate_filename("photo.png", Some("application/pdf")).is_err());
        assert!(generate_filename("noextension", Some("image/png")).is_err());
        assert!(generate_filename("photo.png", None).is_err());
    }

    #[test]
    fn disk_store_saves_and_releases() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskImageStore::new(dir.path()).unwrap();

        store.save("images-test.png", b"not really a png").unwrap();
        assert!(dir.path().join("images-test.png").exists());

        store.remove("images-test.png").unwrap();
        assert!(!dir.path().join("images-test.png").exists());

        // Releasing an absent file is a no-op.
        store.remove("images-test.png").unwrap();
    }

    #[test]
    fn path_traversal_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskImageStore::new(dir.path()).unwrap();
        assert!(store.remove("../etc/passwd").is_err());
        assert!(store.save("a/b.png", b"x").is_err());
    }
}
