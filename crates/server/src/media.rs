//! 图片文件存储。
//!
//! 数据库只保存相对路径，图片内容写在 media 根目录下。

use std::io;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

const IMAGE_DIR: &str = "images";

/// 媒体存储错误类型。
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("媒体文件不存在: {0}")]
    NotFound(String),

    #[error("非法的媒体路径: {0}")]
    InvalidPath(String),

    #[error("IO 错误: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, MediaError>;

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

    /// 写入图片内容，返回相对于根目录的路径。
    ///
    /// 先写入临时文件再重命名，读取方不会看到写了一半的文件。
    pub async fn save(&self, answer_name: &str, payload: &[u8]) -> Result<String> {
        let dir = self.root.join(IMAGE_DIR);
        tokio::fs::create_dir_all(&dir).await?;

        let file_name = format!("{}_{}", slugify(answer_name), Uuid::new_v4().simple());
        let temp_path = dir.join(format!(".{file_name}.tmp"));
        let final_path = dir.join(&file_name);

        tokio::fs::write(&temp_path, payload).await?;
        if let Err(err) = tokio::fs::rename(&temp_path, &final_path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(err.into());
        }

        let relative = format!("{IMAGE_DIR}/{file_name}");
        debug!(path = %relative, bytes = payload.len(), "image payload stored");
        Ok(relative)
    }

    pub async fn load(&self, relative: &str) -> Result<Vec<u8>> {
        let path = self.resolve(relative)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(MediaError::NotFound(relative.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// 删除已写入的图片，文件不存在时视为成功。
    pub async fn remove(&self, relative: &str) -> Result<()> {
        let path = self.resolve(relative)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn resolve(&self, relative: &str) -> Result<PathBuf> {
        let candidate = Path::new(relative);
        let is_plain = candidate
            .components()
            .all(|component| matches!(component, Component::Normal(_)));

        if relative.is_empty() || !is_plain {
            return Err(MediaError::InvalidPath(relative.to_string()));
        }

        Ok(self.root.join(candidate))
    }
}

/// 根据文件头识别常见图片类型。
pub fn sniff_content_type(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        "image/png"
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        "image/gif"
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else {
        "application/octet-stream"
    }
}

fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }

    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "image".to_string()
    } else {
        slug.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_store() -> MediaStore {
        MediaStore::new(std::env::temp_dir().join(format!("guess-media-{}", Uuid::new_v4())))
    }

    #[test]
    fn slugify_keeps_ascii_words() {
        assert_eq!(slugify("Ada Lovelace"), "ada-lovelace");
        assert_eq!(slugify("  O'Neil, Jr. "), "o-neil-jr");
        assert_eq!(slugify("蔡伦"), "image");
    }

    #[test]
    fn sniffs_common_image_headers() {
        assert_eq!(sniff_content_type(&[0xFF, 0xD8, 0xFF, 0xE0]), "image/jpeg");
        assert_eq!(sniff_content_type(b"\x89PNG\r\n\x1a\n...."), "image/png");
        assert_eq!(sniff_content_type(b"GIF89a..."), "image/gif");
        assert_eq!(sniff_content_type(b"RIFF\0\0\0\0WEBPVP8 "), "image/webp");
        assert_eq!(sniff_content_type(b"hello"), "application/octet-stream");
    }

    #[tokio::test]
    async fn saved_payload_can_be_loaded() {
        let store = scratch_store();

        let path = store
            .save("Ada Lovelace", b"payload")
            .await
            .expect("save should succeed");

        assert!(path.starts_with("images/ada-lovelace_"));
        let loaded = store.load(&path).await.expect("load should succeed");
        assert_eq!(loaded, b"payload");

        let _ = tokio::fs::remove_dir_all(store.root()).await;
    }

    #[tokio::test]
    async fn each_save_gets_a_distinct_path() {
        let store = scratch_store();

        let first = store.save("Ada", b"one").await.expect("save");
        let second = store.save("Ada", b"two").await.expect("save");

        assert_ne!(first, second);

        let _ = tokio::fs::remove_dir_all(store.root()).await;
    }

    #[tokio::test]
    async fn traversal_paths_are_rejected() {
        let store = scratch_store();

        let err = store
            .load("../etc/passwd")
            .await
            .expect_err("traversal should be rejected");
        assert!(matches!(err, MediaError::InvalidPath(_)));

        let err = store.load("/etc/passwd").await.expect_err("absolute path");
        assert!(matches!(err, MediaError::InvalidPath(_)));
    }

    #[tokio::test]
    async fn removed_payload_is_gone() {
        let store = scratch_store();
        let path = store.save("Ada", b"payload").await.expect("save");

        store.remove(&path).await.expect("remove");
        store.remove(&path).await.expect("second remove is a no-op");

        assert!(matches!(store.load(&path).await, Err(MediaError::NotFound(_))));
        let _ = tokio::fs::remove_dir_all(store.root()).await;
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let store = scratch_store();

        let err = store
            .load("images/nobody_0000")
            .await
            .expect_err("missing file");
        assert!(matches!(err, MediaError::NotFound(_)));
    }
}
