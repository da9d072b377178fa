use std::path::{Component, Path, PathBuf};

use axum::{
    extract::State,
    http::{
        header::{CACHE_CONTROL, CONTENT_TYPE},
        StatusCode,
    },
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use color_eyre::eyre::eyre;
use color_eyre::Result;

use crate::{names, AppState};

const MEDIA_CACHE_CONTROL: &str = "max-age=3600, must-revalidate";

// ---------------------------------------------------------------------------
// ObjectStore trait
// ---------------------------------------------------------------------------

pub trait ObjectStore: Send + Sync {
    fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

// ---------------------------------------------------------------------------
// Upload validation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadError {
    NotAnImage,
    TooLarge,
}

impl UploadError {
    pub fn message(&self) -> &'static str {
        match self {
            UploadError::NotAnImage => "Thumbnails must be an image file.",
            UploadError::TooLarge => "Thumbnails must be 5 MB or smaller.",
        }
    }
}

/// Checks an upload's declared content type and size against the thumbnail
/// limits.
pub fn validate_image_upload(content_type: Option<&str>, size: u64) -> Result<(), UploadError> {
    match content_type {
        Some(ct) if ct.starts_with("image/") => {}
        _ => return Err(UploadError::NotAnImage),
    }

    if size > names::MAX_THUMBNAIL_BYTES {
        return Err(UploadError::TooLarge);
    }

    Ok(())
}

pub fn extension_for_content_type(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        _ => "img",
    }
}

// ---------------------------------------------------------------------------
// DiskStore
// ---------------------------------------------------------------------------

/// Object store rooted at a local directory, served back under /media.
#[derive(Clone)]
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Maps an object path to a filesystem path. Rejects anything that could
    /// escape the root (absolute paths, `..` components).
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let rel = Path::new(path);
        if rel.as_os_str().is_empty()
            || rel
                .components()
                .any(|c| !matches!(c, Component::Normal(_)))
        {
            return None;
        }
        Some(self.root.join(rel))
    }
}

impl ObjectStore for DiskStore {
    fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
    ) -> impl std::future::Future<Output = Result<()>> + Send {
        let target = self.resolve(path);
        let path = path.to_string();
        async move {
            let target = target.ok_or_else(|| eyre!("invalid object path: {path}"))?;

            if let Some(parent) = target.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&target, bytes).await?;

            tracing::info!("object stored: {path}");
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Serving
// ---------------------------------------------------------------------------

pub fn routes() -> Router<AppState> {
    Router::new().route("/{*path}", get(send_object))
}

async fn send_object(
    State(state): State<AppState>,
    axum::extract::Path(path): axum::extract::Path<String>,
) -> Response {
    let Some(target) = state.storage.resolve(&path) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let Ok(bytes) = tokio::fs::read(&target).await else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let content_type = match target.extension() {
        Some(ext) if ext == "png" => "image/png",
        Some(ext) if ext == "jpg" || ext == "jpeg" => "image/jpeg",
        Some(ext) if ext == "gif" => "image/gif",
        Some(ext) if ext == "webp" => "image/webp",
        Some(ext) if ext == "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    };

    (
        [
            (CONTENT_TYPE, content_type),
            (CACHE_CONTROL, MEDIA_CACHE_CONTROL),
        ],
        bytes,
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn small_image_passes_validation() {
        assert_eq!(validate_image_upload(Some("image/png"), 1024), Ok(()));
    }

    #[test]
    fn image_at_size_limit_passes_validation() {
        assert_eq!(
            validate_image_upload(Some("image/jpeg"), names::MAX_THUMBNAIL_BYTES),
            Ok(())
        );
    }

    #[test]
    fn six_megabyte_image_is_rejected() {
        assert_eq!(
            validate_image_upload(Some("image/png"), 6 * 1024 * 1024),
            Err(UploadError::TooLarge)
        );
    }

    #[test]
    fn one_byte_over_the_limit_is_rejected() {
        assert_eq!(
            validate_image_upload(Some("image/png"), names::MAX_THUMBNAIL_BYTES + 1),
            Err(UploadError::TooLarge)
        );
    }

    #[test]
    fn non_image_content_type_is_rejected() {
        assert_eq!(
            validate_image_upload(Some("application/pdf"), 1024),
            Err(UploadError::NotAnImage)
        );
        assert_eq!(validate_image_upload(None, 1024), Err(UploadError::NotAnImage));
    }

    #[test]
    fn extension_mapping_covers_common_types() {
        assert_eq!(extension_for_content_type("image/png"), "png");
        assert_eq!(extension_for_content_type("image/jpeg"), "jpg");
        assert_eq!(extension_for_content_type("image/tiff"), "img");
    }

    #[test]
    fn resolve_rejects_traversal() {
        let store = DiskStore::new("/tmp/objects");
        assert!(store.resolve("../etc/passwd").is_none());
        assert!(store.resolve("a/../../b").is_none());
        assert!(store.resolve("/absolute").is_none());
        assert!(store.resolve("").is_none());
        assert!(store.resolve("thumbnails/abc.png").is_some());
    }

    #[tokio::test]
    async fn put_writes_the_file_under_root() {
        let root = std::env::temp_dir().join(format!("partnerhub-store-{}", ulid::Ulid::new()));
        let store = DiskStore::new(&root);

        store
            .put("thumbnails/test.png", b"not really a png".to_vec())
            .await
            .unwrap();

        let written = std::fs::read(root.join("thumbnails/test.png")).unwrap();
        assert_eq!(written, b"not really a png");

        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn put_rejects_bad_paths() {
        let root = std::env::temp_dir().join(format!("partnerhub-store-{}", ulid::Ulid::new()));
        let store = DiskStore::new(&root);

        assert!(store.put("../outside.png", b"x".to_vec()).await.is_err());
        assert!(!root.exists());
    }
}
