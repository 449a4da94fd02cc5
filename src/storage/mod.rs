//! Blob store de fotos
//!
//! El store se trata como opaco: `allocate` genera nombre y ruta sin
//! tocar disco (las filas se escriben primero, dentro de la
//! transacción), `store` materializa los bytes después del commit y
//! `delete` es limpieza best-effort tras un borrado ya commiteado.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::utils::errors::{AppError, AppResult};

pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;
pub const MAX_PHOTOS_PER_ORDER: i64 = 6;

const ALLOWED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Archivo subido por el caller, todavía sin persistir
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_name: String,
    pub bytes: Vec<u8>,
}

/// Nombre y ruta asignados a un blob
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub filename: String,
    pub path: String,
}

#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Asignar nombre/ruta sin IO. Valida extensión y tamaño.
    fn allocate(&self, file: &UploadedFile) -> AppResult<StoredFile>;

    /// Escribir los bytes en la ruta asignada (post-commit)
    async fn store(&self, stored: &StoredFile, bytes: &[u8]) -> AppResult<()>;

    /// Borrar el blob. `Ok(false)` si no existía.
    async fn delete(&self, path: &str) -> AppResult<bool>;
}

/// Extrae la extensión en minúsculas del nombre original
pub fn file_extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Store en disco local bajo `UPLOAD_DIR`
pub struct LocalPhotoStore {
    upload_dir: PathBuf,
}

impl LocalPhotoStore {
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self { upload_dir: upload_dir.into() }
    }
}

#[async_trait]
impl PhotoStore for LocalPhotoStore {
    fn allocate(&self, file: &UploadedFile) -> AppResult<StoredFile> {
        let ext = file_extension(&file.original_name).ok_or_else(|| {
            AppError::validation("INVALID_PHOTO", Some("files"), "File has no extension")
        })?;

        if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(AppError::validation(
                "INVALID_PHOTO",
                Some("files"),
                format!("Unsupported file type '.{}': only jpg, jpeg, png", ext),
            ));
        }

        if file.bytes.len() > MAX_PHOTO_BYTES {
            return Err(AppError::validation(
                "INVALID_PHOTO",
                Some("files"),
                "File exceeds the 5MB limit",
            ));
        }

        let filename = format!("{}.{}", Uuid::new_v4(), ext);
        let path = self.upload_dir.join(&filename);

        Ok(StoredFile {
            filename,
            path: path.to_string_lossy().into_owned(),
        })
    }

    async fn store(&self, stored: &StoredFile, bytes: &[u8]) -> AppResult<()> {
        tokio::fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(|e| AppError::Internal(format!("Error creating upload dir: {}", e)))?;

        tokio::fs::write(&stored.path, bytes)
            .await
            .map_err(|e| AppError::Internal(format!("Error writing photo blob: {}", e)))?;

        Ok(())
    }

    async fn delete(&self, path: &str) -> AppResult<bool> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AppError::Internal(format!("Error deleting photo blob: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str, len: usize) -> UploadedFile {
        UploadedFile {
            original_name: name.to_string(),
            bytes: vec![0u8; len],
        }
    }

    #[test]
    fn test_allocate_genera_nombre_unico_con_extension() {
        let store = LocalPhotoStore::new("/tmp/uploads");
        let a = store.allocate(&upload("motor.JPG", 100)).unwrap();
        let b = store.allocate(&upload("motor.JPG", 100)).unwrap();

        assert!(a.filename.ends_with(".jpg"));
        assert_ne!(a.filename, b.filename);
        assert!(a.path.ends_with(&a.filename));
    }

    #[test]
    fn test_allocate_rechaza_extension_invalida() {
        let store = LocalPhotoStore::new("/tmp/uploads");
        let err = store.allocate(&upload("nota.pdf", 100)).unwrap_err();
        assert_eq!(err.code(), "INVALID_PHOTO");
    }

    #[test]
    fn test_allocate_rechaza_archivo_muy_grande() {
        let store = LocalPhotoStore::new("/tmp/uploads");
        let err = store.allocate(&upload("foto.png", MAX_PHOTO_BYTES + 1)).unwrap_err();
        assert_eq!(err.code(), "INVALID_PHOTO");
    }

    #[tokio::test]
    async fn test_store_y_delete_en_disco() {
        let dir = std::env::temp_dir().join(format!("fotos-test-{}", Uuid::new_v4()));
        let store = LocalPhotoStore::new(&dir);

        let file = upload("frente.png", 16);
        let stored = store.allocate(&file).unwrap();
        store.store(&stored, &file.bytes).await.unwrap();

        assert!(store.delete(&stored.path).await.unwrap());
        // segundo delete: el blob ya no existe
        assert!(!store.delete(&stored.path).await.unwrap());

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
