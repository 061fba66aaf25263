//! Photo storage (S3-compatible bucket, local directory or memory).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions, PutPayload};
use time::OffsetDateTime;

use crate::state::StorageConfig;

/// Largest photo accepted for upload (5 MB).
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// Extensions accepted for upload.
pub const PHOTO_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// Path locally stored photos are served under.
pub const LOCAL_URL_PREFIX: &str = "/uploads";

/// Which backend photos are written to.
#[derive(Debug, Clone, Default)]
pub enum PhotoStoreConfig {
    /// In-memory storage (for testing)
    #[default]
    Memory,

    /// Local directory, served back by the API server
    Local { path: PathBuf },

    /// S3-compatible storage (AWS S3, MinIO, R2, ...)
    S3 {
        endpoint: String,
        access_key: String,
        secret_key: String,
        bucket: String,
        region: Option<String>,
        /// Base of returned photo URLs (defaults to <endpoint>/<bucket>)
        public_url: Option<String>,
    },
}

impl PhotoStoreConfig {
    /// S3 when the `[storage.s3]` section is complete, the local uploads
    /// directory otherwise.
    pub fn select(storage: &StorageConfig, uploads_path: &Path) -> Self {
        match &storage.s3 {
            Some(s3) if s3.has_credentials() => PhotoStoreConfig::S3 {
                endpoint: s3.endpoint.clone(),
                access_key: s3.access_key.clone(),
                secret_key: s3.secret_key.clone(),
                bucket: s3.bucket.clone(),
                region: s3.region.clone(),
                public_url: s3.public_url.clone(),
            },
            _ => PhotoStoreConfig::Local {
                path: uploads_path.to_path_buf(),
            },
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PhotoStoreError {
    #[error("Only image files are allowed (jpg, jpeg, png, gif, webp)")]
    UnsupportedType,
    #[error("File too large (max {} MB)", MAX_PHOTO_BYTES / (1024 * 1024))]
    TooLarge,
    #[error("object storage error: {0}")]
    ObjectStore(#[from] object_store::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid storage configuration: {0}")]
    InvalidConfig(String),
    #[error("S3 bucket '{0}' does not exist. Create it before starting the server.")]
    BucketNotFound(String),
}

/// A photo that has been written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPhoto {
    pub key: String,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct PhotoStore {
    inner: Arc<dyn ObjectStore>,
    /// URL prefix the object key is appended to
    public_base: String,
    /// Set for the local backend, whose files the API server serves
    local_dir: Option<PathBuf>,
    /// Whether the backend keeps per-object content types
    keeps_content_type: bool,
}

impl PhotoStore {
    pub async fn new(config: PhotoStoreConfig) -> Result<Self, PhotoStoreError> {
        match config {
            PhotoStoreConfig::Memory => Ok(Self::memory()),

            PhotoStoreConfig::Local { path } => {
                tokio::fs::create_dir_all(&path).await?;
                let store = LocalFileSystem::new_with_prefix(&path)
                    .map_err(|e| PhotoStoreError::InvalidConfig(e.to_string()))?;
                tracing::info!(path = %path.display(), "storing photos on the local filesystem");

                Ok(Self {
                    inner: Arc::new(store),
                    public_base: LOCAL_URL_PREFIX.to_string(),
                    local_dir: Some(path),
                    keeps_content_type: false,
                })
            }

            PhotoStoreConfig::S3 {
                endpoint,
                access_key,
                secret_key,
                bucket,
                region,
                public_url,
            } => {
                let store: Arc<dyn ObjectStore> = Arc::new(
                    AmazonS3Builder::new()
                        .with_endpoint(&endpoint)
                        .with_access_key_id(access_key)
                        .with_secret_access_key(secret_key)
                        .with_bucket_name(&bucket)
                        .with_region(region.as_deref().unwrap_or("us-east-1"))
                        .with_allow_http(endpoint.starts_with("http://"))
                        .build()
                        .map_err(|e| PhotoStoreError::InvalidConfig(e.to_string()))?,
                );

                ensure_bucket_exists(store.as_ref(), &bucket).await?;
                tracing::info!(endpoint = %endpoint, bucket = %bucket, "storing photos in S3");

                let public_base = public_url.unwrap_or_else(|| {
                    format!("{}/{}", endpoint.trim_end_matches('/'), bucket)
                });

                Ok(Self {
                    inner: store,
                    public_base: public_base.trim_end_matches('/').to_string(),
                    local_dir: None,
                    keeps_content_type: true,
                })
            }
        }
    }

    /// In-memory store; photos get local-style URLs but are never served.
    pub fn memory() -> Self {
        Self {
            inner: Arc::new(InMemory::new()),
            public_base: LOCAL_URL_PREFIX.to_string(),
            local_dir: None,
            keeps_content_type: true,
        }
    }

    /// Directory to serve under [`LOCAL_URL_PREFIX`], if photos live on disk.
    pub fn local_dir(&self) -> Option<&Path> {
        self.local_dir.as_deref()
    }

    /// Validate and store an uploaded photo under a fresh key.
    pub async fn put_photo(
        &self,
        original_name: &str,
        data: Bytes,
    ) -> Result<StoredPhoto, PhotoStoreError> {
        let content_type = photo_content_type(original_name)?;
        if data.len() > MAX_PHOTO_BYTES {
            return Err(PhotoStoreError::TooLarge);
        }

        let key = object_key(original_name, OffsetDateTime::now_utc());
        let path = ObjectPath::from(key.as_str());

        let mut attributes = Attributes::new();
        if self.keeps_content_type {
            attributes.insert(Attribute::ContentType, content_type.into());
        }
        let options = PutOptions {
            attributes,
            ..Default::default()
        };
        self.inner
            .put_opts(&path, PutPayload::from_bytes(data), options)
            .await?;

        tracing::debug!(key = %key, "stored photo");
        Ok(StoredPhoto {
            url: format!("{}/{}", self.public_base, key),
            key,
        })
    }

    pub async fn get_photo(&self, key: &str) -> Result<Option<Bytes>, PhotoStoreError> {
        match self.inner.get(&ObjectPath::from(key)).await {
            Ok(result) => Ok(Some(result.bytes().await?)),
            Err(object_store::Error::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Fails fast when the configured bucket is missing.
async fn ensure_bucket_exists(store: &dyn ObjectStore, bucket: &str) -> Result<(), PhotoStoreError> {
    use futures::TryStreamExt;

    let prefix = ObjectPath::from("");
    let mut stream = store.list(Some(&prefix));
    match stream.try_next().await {
        Ok(_) => Ok(()),
        Err(object_store::Error::NotFound { .. }) => {
            Err(PhotoStoreError::BucketNotFound(bucket.to_string()))
        }
        Err(e) => {
            let msg = e.to_string();
            if msg.contains("NoSuchBucket") {
                return Err(PhotoStoreError::BucketNotFound(bucket.to_string()));
            }
            Err(e.into())
        }
    }
}

/// Content type for an accepted photo name, judged by its extension.
pub fn photo_content_type(name: &str) -> Result<&'static str, PhotoStoreError> {
    let extension = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or(PhotoStoreError::UnsupportedType)?;

    if !PHOTO_EXTENSIONS.contains(&extension.as_str()) {
        return Err(PhotoStoreError::UnsupportedType);
    }

    mime_guess::from_ext(&extension)
        .first_raw()
        .ok_or(PhotoStoreError::UnsupportedType)
}

/// `<unix-millis>-<name>`, with anything outside `[A-Za-z0-9._-]` in the
/// name replaced by `_`.
fn object_key(original_name: &str, now: OffsetDateTime) -> String {
    let file_name = Path::new(original_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(original_name);

    let sanitized: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let millis = now.unix_timestamp_nanos() / 1_000_000;
    format!("{}-{}", millis, sanitized)
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;
    use crate::state::S3Config;

    #[test]
    fn test_object_key_is_timestamped_and_sanitized() {
        let now = datetime!(2024-02-14 12:00:00 UTC);
        assert_eq!(
            object_key("our trip (1).JPG", now),
            "1707912000000-our_trip__1_.JPG"
        );
        assert_eq!(object_key("../../etc/passwd.png", now), "1707912000000-passwd.png");
    }

    #[test]
    fn test_only_images_are_accepted() {
        assert_eq!(photo_content_type("a.jpg").unwrap(), "image/jpeg");
        assert_eq!(photo_content_type("a.JPEG").unwrap(), "image/jpeg");
        assert_eq!(photo_content_type("a.png").unwrap(), "image/png");
        assert_eq!(photo_content_type("a.webp").unwrap(), "image/webp");
        assert!(photo_content_type("a.pdf").is_err());
        assert!(photo_content_type("no-extension").is_err());
    }

    #[test]
    fn test_backend_selection() {
        let uploads = PathBuf::from("/tmp/uploads");

        let local = PhotoStoreConfig::select(&StorageConfig::default(), &uploads);
        assert!(matches!(local, PhotoStoreConfig::Local { ref path } if path == &uploads));

        let mut storage = StorageConfig {
            uploads_dir: None,
            s3: Some(S3Config {
                endpoint: "http://localhost:9000".to_string(),
                access_key: "minio".to_string(),
                secret_key: "".to_string(),
                bucket: "photos".to_string(),
                region: None,
                public_url: None,
            }),
        };
        assert!(matches!(
            PhotoStoreConfig::select(&storage, &uploads),
            PhotoStoreConfig::Local { .. }
        ));

        if let Some(s3) = storage.s3.as_mut() {
            s3.secret_key = "minio123".to_string();
        }
        assert!(matches!(
            PhotoStoreConfig::select(&storage, &uploads),
            PhotoStoreConfig::S3 { .. }
        ));
    }

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = PhotoStore::memory();
        let data = Bytes::from_static(b"\x89PNG fake");

        let stored = store.put_photo("beach.png", data.clone()).await.unwrap();
        assert!(stored.url.starts_with("/uploads/"));
        assert!(stored.url.ends_with("-beach.png"));
        assert_eq!(store.get_photo(&stored.key).await.unwrap(), Some(data));
        assert_eq!(store.get_photo("missing.png").await.unwrap(), None);

        assert!(matches!(
            store.put_photo("notes.txt", Bytes::from_static(b"hi")).await,
            Err(PhotoStoreError::UnsupportedType)
        ));
        let huge = Bytes::from(vec![0u8; MAX_PHOTO_BYTES + 1]);
        assert!(matches!(
            store.put_photo("huge.jpg", huge).await,
            Err(PhotoStoreError::TooLarge)
        ));
    }

    #[tokio::test]
    async fn test_local_store_writes_into_directory() {
        let temp = tempfile::tempdir().unwrap();
        let store = PhotoStore::new(PhotoStoreConfig::Local {
            path: temp.path().to_path_buf(),
        })
        .await
        .unwrap();

        let stored = store
            .put_photo("sunset.jpg", Bytes::from_static(b"jpeg bytes"))
            .await
            .unwrap();

        assert_eq!(store.local_dir(), Some(temp.path()));
        assert_eq!(stored.url, format!("/uploads/{}", stored.key));
        assert!(temp.path().join(&stored.key).exists());
    }
}
