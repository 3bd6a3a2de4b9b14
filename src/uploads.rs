//! Managed directory of uploaded technician images.
//!
//! Stored references look like `uploads/<generated-name>`, which is also the URL
//! path the static file route serves them from.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tokio::{fs, io::AsyncWriteExt};

use crate::{errors::AppError, structs::Upload, utils::sanitize_file_name};

/// Route prefix and reference prefix of uploaded files.
pub const UPLOAD_ROUTE: &str = "uploads";

const MAX_NAME_ATTEMPTS: u32 = 100;

#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_dir(&self) -> Result<(), AppError> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Writes the upload under a fresh name and returns its store-relative reference.
    pub async fn save(&self, upload: &Upload) -> Result<String, AppError> {
        let stamp = chrono::Utc::now().timestamp_millis();
        let name = sanitize_file_name(&upload.original_name);

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let file_name = if attempt == 0 {
                format!("{}-{}", stamp, name)
            } else {
                format!("{}-{}-{}", stamp, attempt, name)
            };
            let path = self.root.join(&file_name);

            let mut file = match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };
            file.write_all(&upload.data).await?;
            file.flush().await?;

            log::debug!("Stored upload {} ({} bytes)", path.display(), upload.data.len());
            return Ok(format!("{}/{}", UPLOAD_ROUTE, file_name));
        }

        Err(AppError::IoError(std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!("no free file name for upload '{}'", name),
        )))
    }

    /// Maps a stored reference to its path on disk; `None` for anything outside the store.
    pub fn resolve(&self, reference: &str) -> Option<PathBuf> {
        let file_name = reference.strip_prefix(UPLOAD_ROUTE)?.strip_prefix('/')?;
        if file_name.is_empty()
            || file_name.contains(['/', '\\'])
            || file_name == "."
            || file_name == ".."
        {
            return None;
        }
        Some(self.root.join(file_name))
    }

    pub async fn exists(&self, reference: &str) -> bool {
        match self.resolve(reference) {
            Some(path) => fs::try_exists(path).await.unwrap_or(false),
            None => false,
        }
    }

    /// Best-effort removal. Never fails the caller; problems are only logged.
    pub async fn remove(&self, reference: &str) {
        let Some(path) = self.resolve(reference) else {
            log::warn!("Not removing '{}': outside the upload directory", reference);
            return;
        };

        match fs::remove_file(&path).await {
            Ok(()) => log::debug!("Removed upload {}", path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::warn!("Upload {} was already gone", path.display())
            }
            Err(e) => log::error!("Failed to remove upload {}: {}", path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::web::Bytes;

    fn upload(name: &str, data: &'static [u8]) -> Upload {
        Upload {
            original_name: name.to_owned(),
            data: Bytes::from_static(data),
        }
    }

    #[actix_web::test]
    async fn save_writes_file_under_generated_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());

        let reference = store.save(&upload("my photo.png", b"png-bytes")).await.unwrap();

        assert!(reference.starts_with("uploads/"));
        assert!(reference.ends_with("-my_photo.png"));
        let path = store.resolve(&reference).unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"png-bytes");
    }

    #[actix_web::test]
    async fn same_name_uploads_never_collide() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());

        let first = store.save(&upload("qr.png", b"one")).await.unwrap();
        let second = store.save(&upload("qr.png", b"two")).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(std::fs::read(store.resolve(&first).unwrap()).unwrap(), b"one");
        assert_eq!(std::fs::read(store.resolve(&second).unwrap()).unwrap(), b"two");
    }

    #[actix_web::test]
    async fn remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());
        let reference = store.save(&upload("a.jpg", b"a")).await.unwrap();

        store.remove(&reference).await;
        assert!(!store.exists(&reference).await);
        store.remove(&reference).await;
    }

    #[test]
    fn resolve_rejects_foreign_references() {
        let store = UploadStore::new("/srv/uploads");
        assert_eq!(
            store.resolve("uploads/1-a.png"),
            Some(PathBuf::from("/srv/uploads/1-a.png"))
        );
        assert_eq!(store.resolve("uploads/../technicians.db"), None);
        assert_eq!(store.resolve("uploads/.."), None);
        assert_eq!(store.resolve("uploads/"), None);
        assert_eq!(store.resolve("/etc/passwd"), None);
        assert_eq!(store.resolve("uploadsx/a.png"), None);
    }

    #[actix_web::test]
    async fn remove_leaves_files_outside_the_store_alone() {
        let dir = tempfile::tempdir().unwrap();
        let outside = dir.path().join("keep.txt");
        std::fs::write(&outside, b"keep").unwrap();
        let store = UploadStore::new(dir.path().join("uploads"));

        store.remove("uploads/../keep.txt").await;

        assert!(outside.exists());
    }
}
