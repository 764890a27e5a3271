use std::path::Path;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use log::info;

use crate::error::InputError;

/// A local image, loaded and encoded for inline upload.
#[derive(Debug, Clone)]
pub struct ImageAttachment {
    pub mime: &'static str,
    pub data: Vec<u8>,
}

fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

impl ImageAttachment {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(InputError::ImageNotFound(path.to_path_buf()));
        }
        if !path.is_file() {
            return Err(InputError::NotAFile(path.to_path_buf()));
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_lowercase();
        let mime = mime_for_extension(&ext).ok_or(InputError::UnsupportedImageFormat(ext))?;

        let data = std::fs::read(path).map_err(|source| InputError::UnreadableImage {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            "Loaded image: {} ({} KB, {mime})",
            path.display(),
            data.len() / 1024
        );

        Ok(Self { mime, data })
    }

    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.data))
    }
}
