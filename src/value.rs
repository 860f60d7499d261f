use std::fmt;
use std::path::PathBuf;

use base64::{engine::general_purpose, Engine as _};
use image::ImageFormat;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ImageInputError, Result};

const BASE64_MARKER: &str = ";base64,";
const FALLBACK_MIME: &str = "application/octet-stream";

/// An embeddable image, stored as a `data:` URI. The empty string means "no image".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageValue(String);

impl ImageValue {
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Encodes raw bytes as `data:<mime>;base64,<payload>`.
    pub fn from_bytes(mime: &str, bytes: &[u8]) -> Self {
        let payload = general_purpose::STANDARD.encode(bytes);
        Self(format!("data:{mime}{BASE64_MARKER}{payload}"))
    }

    /// Media type declared by the data URI, if this is one.
    pub fn mime_type(&self) -> Option<&str> {
        let rest = self.0.strip_prefix("data:")?;
        let end = rest.find([';', ','])?;
        Some(&rest[..end]).filter(|mime| !mime.is_empty())
    }

    /// Returns the bytes carried by the data URI.
    pub fn decode_payload(&self) -> Result<Vec<u8>> {
        if !self.0.starts_with("data:") {
            return Err(ImageInputError::InvalidValue(self.preview()));
        }

        let start = self
            .0
            .find(BASE64_MARKER)
            .ok_or_else(|| ImageInputError::InvalidValue(self.preview()))?;

        general_purpose::STANDARD
            .decode(&self.0[start + BASE64_MARKER.len()..])
            .map_err(|e| ImageInputError::Decode(format!("bad base64 payload: {e}")))
    }

    // Data URIs get long; keep error messages readable.
    fn preview(&self) -> String {
        self.0.chars().take(32).collect()
    }
}

impl From<String> for ImageValue {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ImageValue {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl fmt::Display for ImageValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A file handed to the widget by the host's file-selection control.
#[derive(Debug, Clone)]
pub enum PickedFile {
    Path(PathBuf),
    Bytes {
        name: Option<String>,
        mime: Option<String>,
        data: Vec<u8>,
    },
}

impl PickedFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self::Bytes {
            name: None,
            mime: None,
            data,
        }
    }

    /// Display name, as a file input would show it.
    pub fn name(&self) -> Option<String> {
        match self {
            PickedFile::Path(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned()),
            PickedFile::Bytes { name, .. } => name.clone(),
        }
    }

    /// Reads the file into a data URI.
    pub async fn read(self) -> Result<ImageValue> {
        let (name, declared, data) = match self {
            PickedFile::Path(path) => {
                let data = tokio::fs::read(&path).await?;
                (Some(path.to_string_lossy().into_owned()), None, data)
            }
            PickedFile::Bytes { name, mime, data } => (name, mime, data),
        };

        let mime = declared
            .or_else(|| sniff_mime(&data, name.as_deref()))
            .unwrap_or_else(|| FALLBACK_MIME.to_owned());

        debug!("Read picked file ({} bytes, {mime})", data.len());

        Ok(ImageValue::from_bytes(&mime, &data))
    }
}

fn sniff_mime(data: &[u8], name: Option<&str>) -> Option<String> {
    image::guess_format(data)
        .ok()
        .or_else(|| name.and_then(|n| ImageFormat::from_path(n).ok()))
        .map(|format| format.to_mime_type().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

    #[test]
    fn test_from_bytes_builds_data_uri() {
        let value = ImageValue::from_bytes("image/png", b"abc");
        assert_eq!(value.as_str(), "data:image/png;base64,YWJj");
        assert_eq!(value.mime_type(), Some("image/png"));
        assert_eq!(value.decode_payload().unwrap(), b"abc");
    }

    #[test]
    fn test_decode_payload_rejects_plain_strings() {
        let value = ImageValue::from("https://example.com/a.png");
        assert!(matches!(
            value.decode_payload(),
            Err(ImageInputError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_decode_payload_rejects_non_base64_uri() {
        let value = ImageValue::from("data:text/plain,hello");
        assert!(matches!(
            value.decode_payload(),
            Err(ImageInputError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_empty_value() {
        assert!(ImageValue::empty().is_empty());
        assert!(ImageValue::default().is_empty());
        assert_eq!(ImageValue::empty().mime_type(), None);
    }

    #[tokio::test]
    async fn test_read_sniffs_mime_from_content() {
        let file = PickedFile::from_bytes(PNG_MAGIC.to_vec());
        let value = file.read().await.unwrap();
        assert_eq!(value.mime_type(), Some("image/png"));
    }

    #[tokio::test]
    async fn test_read_prefers_declared_mime() {
        let file = PickedFile::Bytes {
            name: Some("photo.png".into()),
            mime: Some("image/webp".into()),
            data: PNG_MAGIC.to_vec(),
        };
        let value = file.read().await.unwrap();
        assert_eq!(value.mime_type(), Some("image/webp"));
    }

    #[tokio::test]
    async fn test_read_falls_back_to_extension_then_octet_stream() {
        let named = PickedFile::Bytes {
            name: Some("photo.jpg".into()),
            mime: None,
            data: b"not an image".to_vec(),
        };
        let value = named.read().await.unwrap();
        assert_eq!(value.mime_type(), Some("image/jpeg"));

        let unnamed = PickedFile::from_bytes(b"not an image".to_vec());
        let value = unnamed.read().await.unwrap();
        assert_eq!(value.mime_type(), Some("application/octet-stream"));
    }

    #[tokio::test]
    async fn test_read_missing_path_is_read_error() {
        let file = PickedFile::from_path("/definitely/not/here.png");
        let result = file.read().await;
        assert!(matches!(result, Err(ImageInputError::Read(_))));
    }
}
