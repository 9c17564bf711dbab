//! Saving generated images to disk.

use crate::error::{ForgeError, Result};
use crate::image::ImageReference;
use chrono::Utc;
use std::path::{Path, PathBuf};

/// Saves `reference` into `dir`, returning the written path.
///
/// Inline references write their payload directly; remote references fetch
/// the byte stream first. Files are named `ai-generated-<millis>.<ext>` so
/// repeated downloads never collide.
pub async fn save_image(
    client: &reqwest::Client,
    reference: &ImageReference,
    dir: impl AsRef<Path>,
) -> Result<PathBuf> {
    let filename = format!(
        "ai-generated-{}.{}",
        Utc::now().timestamp_millis(),
        reference.file_extension()
    );
    let path = dir.as_ref().join(filename);

    let bytes = match reference {
        ImageReference::Inline { data, .. } => data.clone(),
        ImageReference::Url(url) => {
            let response = client.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(ForgeError::Api {
                    status: status.as_u16(),
                    message: "failed to fetch image for download".into(),
                });
            }
            response.bytes().await?.to_vec()
        }
    };

    std::fs::write(&path, bytes)?;
    tracing::debug!(path = %path.display(), "saved generated image");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_inline_reference_writes_payload() {
        let dir = tempfile::tempdir().unwrap();
        let reference = ImageReference::Inline {
            data: vec![0x89, 0x50, 0x4E, 0x47],
            mime_type: "image/png".into(),
        };

        let client = reqwest::Client::new();
        let path = save_image(&client, &reference, dir.path()).await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), vec![0x89, 0x50, 0x4E, 0x47]);
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("ai-generated-"));
        assert!(name.ends_with(".png"));
    }

    #[tokio::test]
    async fn test_extension_follows_mime_type() {
        let dir = tempfile::tempdir().unwrap();
        let reference = ImageReference::Inline {
            data: vec![0xFF, 0xD8, 0xFF],
            mime_type: "image/jpeg".into(),
        };

        let client = reqwest::Client::new();
        let path = save_image(&client, &reference, dir.path()).await.unwrap();
        assert!(path.to_str().unwrap().ends_with(".jpg"));
    }
}
