use anyhow::Context;
use bytes::Bytes;
use rand::{distributions::Alphanumeric, Rng};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::storage::StorageClient;

pub const MAX_FILE_SIZE: usize = 2 * 1024 * 1024; // 2MB
pub const ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/webp", "image/gif"];

/// A file pulled out of the multipart body, not yet checked.
pub struct UploadItem {
    pub original_name: String,
    pub content_type: String,
    pub body: Bytes,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub url: String,
    pub filename: String,
    pub original_name: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub files: Vec<UploadedFile>,
}

/// Image type actually present in the bytes.
pub fn sniff_image(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [0x89, b'P', b'N', b'G', ..] => Some("image/png"),
        [b'G', b'I', b'F', b'8', ..] => Some("image/gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("image/webp"),
        _ => None,
    }
}

fn ext_for(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" => ".jpg",
        "image/png" => ".png",
        "image/gif" => ".gif",
        "image/webp" => ".webp",
        _ => "",
    }
}

/// `{epoch-ms}-{random}{ext}`.
pub fn generate_filename(mime: &str) -> String {
    let ms = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    let random: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    format!("{ms}-{random}{}", ext_for(mime))
}

/// Returns the sniffed MIME type of an acceptable file.
pub fn check_file(item: &UploadItem) -> ApiResult<&'static str> {
    let name = &item.original_name;
    if !ALLOWED_MIME_TYPES.contains(&item.content_type.as_str()) {
        return Err(ApiError::validation(format!(
            "{name}: unsupported file type {}. Allowed: JPEG, PNG, WebP, GIF",
            item.content_type
        )));
    }
    if item.body.is_empty() {
        return Err(ApiError::validation(format!("{name}: file is empty")));
    }
    if item.body.len() > MAX_FILE_SIZE {
        return Err(ApiError::validation(format!(
            "{name}: file too large, maximum size is 2MB"
        )));
    }
    sniff_image(&item.body)
        .ok_or_else(|| ApiError::validation(format!("{name}: content is not a valid image")))
}

/// Checks every file first; nothing is stored unless all of them pass.
/// If the backend fails partway, objects already written for the batch are
/// removed again.
pub async fn store_files(
    storage: &dyn StorageClient,
    items: Vec<UploadItem>,
) -> ApiResult<UploadResponse> {
    if items.is_empty() {
        return Err(ApiError::validation("No files provided"));
    }
    let mimes = items.iter().map(check_file).collect::<ApiResult<Vec<_>>>()?;

    let mut files: Vec<UploadedFile> = Vec::with_capacity(items.len());
    for (item, mime) in items.into_iter().zip(mimes) {
        let filename = generate_filename(mime);
        let stored = storage
            .put_object(&filename, item.body, mime)
            .await
            .with_context(|| format!("store upload {filename}"));
        if let Err(e) = stored {
            discard(storage, &files).await;
            return Err(e.into());
        }
        info!(%filename, original = %item.original_name, "file uploaded");
        files.push(UploadedFile {
            url: storage.public_url(&filename),
            filename,
            original_name: item.original_name,
        });
    }
    Ok(UploadResponse { files })
}

async fn discard(storage: &dyn StorageClient, files: &[UploadedFile]) {
    for file in files {
        if let Err(e) = storage.delete_object(&file.filename).await {
            warn!(filename = %file.filename, error = ?e, "failed to remove partial upload");
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    pub const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    /// PNG signature padded to `len` bytes.
    pub fn png_of_len(len: usize) -> Vec<u8> {
        let mut body = PNG_HEADER.to_vec();
        body.resize(len, 0);
        body
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::png_of_len;
    use super::*;
    use crate::storage::MemoryStorage;

    fn item(name: &str, ct: &str, body: Vec<u8>) -> UploadItem {
        UploadItem {
            original_name: name.into(),
            content_type: ct.into(),
            body: Bytes::from(body),
        }
    }

    #[test]
    fn sniffs_known_signatures() {
        assert_eq!(sniff_image(&[0xFF, 0xD8, 0xFF, 0xE0]), Some("image/jpeg"));
        assert_eq!(sniff_image(&png_of_len(16)), Some("image/png"));
        assert_eq!(sniff_image(b"GIF89a.."), Some("image/gif"));
        assert_eq!(sniff_image(b"RIFF\x00\x00\x00\x00WEBPVP8 "), Some("image/webp"));
        assert_eq!(sniff_image(b"<svg></svg>"), None);
        assert_eq!(sniff_image(&[]), None);
    }

    #[test]
    fn filenames_are_timestamped_and_random() {
        let re = regex::Regex::new(r"^\d{13,}-[a-z0-9]{8}\.png$").unwrap();
        let a = generate_filename("image/png");
        let b = generate_filename("image/png");
        assert!(re.is_match(&a), "{a}");
        assert_ne!(a, b);
    }

    #[test]
    fn rejects_bad_files() {
        let cases = [
            item("a.pdf", "application/pdf", png_of_len(10)),
            item("b.png", "image/png", vec![]),
            item("c.png", "image/png", png_of_len(3 * 1024 * 1024)),
            item("d.png", "image/png", b"not really a png".to_vec()),
        ];
        for case in &cases {
            assert!(matches!(check_file(case), Err(ApiError::Validation(_))));
        }
        assert_eq!(
            check_file(&item("ok.png", "image/png", png_of_len(MAX_FILE_SIZE))).unwrap(),
            "image/png"
        );
    }

    #[tokio::test]
    async fn stores_valid_files() {
        let storage = MemoryStorage::default();
        let res = store_files(&storage, vec![item("cat.png", "image/png", png_of_len(1024 * 1024))])
            .await
            .unwrap();
        assert_eq!(res.files.len(), 1);
        let file = &res.files[0];
        assert_eq!(file.original_name, "cat.png");
        assert_eq!(file.url, format!("/uploads/{}", file.filename));
        assert!(storage.objects.lock().unwrap().contains_key(&file.filename));
    }

    #[tokio::test]
    async fn one_bad_file_rejects_the_batch() {
        let storage = MemoryStorage::default();
        let res = store_files(
            &storage,
            vec![
                item("ok.png", "image/png", png_of_len(100)),
                item("big.png", "image/png", png_of_len(3 * 1024 * 1024)),
            ],
        )
        .await;
        assert!(matches!(res, Err(ApiError::Validation(_))));
        assert!(storage.objects.lock().unwrap().is_empty());
    }

    /// Accepts a fixed number of writes, then fails.
    struct FailingAfter {
        inner: MemoryStorage,
        remaining: std::sync::Mutex<usize>,
    }

    #[async_trait::async_trait]
    impl StorageClient for FailingAfter {
        async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<()> {
            {
                let mut remaining = self.remaining.lock().unwrap();
                if *remaining == 0 {
                    anyhow::bail!("bucket unavailable");
                }
                *remaining -= 1;
            }
            self.inner.put_object(key, body, content_type).await
        }

        async fn delete_object(&self, key: &str) -> anyhow::Result<()> {
            self.inner.delete_object(key).await
        }

        fn public_url(&self, key: &str) -> String {
            self.inner.public_url(key)
        }
    }

    #[tokio::test]
    async fn backend_failure_removes_stored_files() {
        let storage = FailingAfter {
            inner: MemoryStorage::default(),
            remaining: std::sync::Mutex::new(2),
        };
        let res = store_files(
            &storage,
            vec![
                item("a.png", "image/png", png_of_len(100)),
                item("b.png", "image/png", png_of_len(100)),
                item("c.png", "image/png", png_of_len(100)),
            ],
        )
        .await;
        assert!(matches!(res, Err(ApiError::Internal(_))));
        assert!(storage.inner.objects.lock().unwrap().is_empty());
    }
}
