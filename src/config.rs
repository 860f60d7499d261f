use std::path::Path;

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

use crate::error::{ImageInputError, Result};
use crate::value::ImageValue;

/// Side of the square used for display sizing when no `maxSize` is given.
pub const DEFAULT_SIZE: u32 = 150;

/// Bounding box used both for display sizing and as the resize threshold.
///
/// Both sides are always positive; deserializing a zero side fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMaxSize")]
pub struct MaxSize {
    width: u32,
    height: u32,
}

#[derive(Deserialize)]
struct RawMaxSize {
    width: u32,
    height: u32,
}

impl TryFrom<RawMaxSize> for MaxSize {
    type Error = ImageInputError;

    fn try_from(raw: RawMaxSize) -> Result<Self> {
        Self::new(raw.width, raw.height)
    }
}

impl MaxSize {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ImageInputError::InvalidSize { width, height });
        }
        Ok(Self { width, height })
    }

    /// Square bound; a zero side is bumped to one pixel.
    pub fn square(side: u32) -> Self {
        let side = side.max(1);
        Self {
            width: side,
            height: side,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl Default for MaxSize {
    fn default() -> Self {
        Self::square(DEFAULT_SIZE)
    }
}

/// Widget configuration as handed over by the owning form.
///
/// The change callback is not part of this struct; set it on the controller.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageInputProps {
    /// Alt text for the image.
    pub description: Option<String>,
    /// Initial value when the widget is uncontrolled.
    pub default_value: ImageValue,
    pub disabled: bool,
    /// Enables resizing of picked images.
    pub max_size: Option<MaxSize>,
    /// Shown instead of the image while the value is empty.
    pub placeholder: Option<String>,
    pub title: Option<String>,
    /// Externally controlled value; overrides internal state when non-empty.
    pub value: Option<ImageValue>,
}

impl ImageInputProps {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads props from a JSON file.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(ImageInputError::PropsFile)?;
        Self::from_json(&json)
    }
}

/// Encoding used when a resized image is written back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg { quality: u8 },
}

impl OutputFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg { .. } => "image/jpeg",
        }
    }
}

/// Knobs for the redraw step.
#[derive(Debug, Clone, Copy)]
pub struct ResizeOptions {
    pub filter: FilterType,
    pub format: OutputFormat,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            filter: FilterType::Lanczos3,
            format: OutputFormat::Png,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_props_from_json_camel_case() {
        let props = ImageInputProps::from_json(
            r#"{
                "description": "Avatar",
                "defaultValue": "data:image/png;base64,AAAA",
                "disabled": true,
                "maxSize": { "width": 100, "height": 80 },
                "placeholder": "Drop a picture",
                "title": "Profile picture"
            }"#,
        )
        .unwrap();

        assert_eq!(props.description.as_deref(), Some("Avatar"));
        assert_eq!(props.default_value.as_str(), "data:image/png;base64,AAAA");
        assert!(props.disabled);
        assert_eq!(props.max_size, Some(MaxSize::new(100, 80).unwrap()));
        assert_eq!(props.placeholder.as_deref(), Some("Drop a picture"));
        assert_eq!(props.value, None);
    }

    #[test]
    fn test_props_defaults_when_empty() {
        let props = ImageInputProps::from_json("{}").unwrap();
        assert!(props.default_value.is_empty());
        assert!(!props.disabled);
        assert!(props.max_size.is_none());
    }

    #[test]
    fn test_props_reject_zero_max_size() {
        let result = ImageInputProps::from_json(r#"{ "maxSize": { "width": 0, "height": 10 } }"#);
        assert!(matches!(result, Err(ImageInputError::Config(_))));
    }

    #[test]
    fn test_max_size_rejects_zero_sides() {
        assert!(matches!(
            MaxSize::new(0, 10),
            Err(ImageInputError::InvalidSize {
                width: 0,
                height: 10
            })
        ));
        assert!(MaxSize::new(10, 0).is_err());
        assert_eq!(MaxSize::square(0), MaxSize::square(1));
    }

    #[tokio::test]
    async fn test_props_from_missing_file() {
        let result = ImageInputProps::from_file("/no/such/props.json").await;
        let err = result.unwrap_err();
        assert!(matches!(err, ImageInputError::PropsFile(_)));
        assert!(err.to_string().starts_with("failed to read props file"));
    }

    #[tokio::test]
    async fn test_props_from_file() {
        let name = format!("props-{}.json", std::process::id());
        let path = std::env::temp_dir().join(name);
        let json = r#"{ "disabled": true }"#;
        tokio::fs::write(&path, json).await.unwrap();

        let props = ImageInputProps::from_file(&path).await;
        tokio::fs::remove_file(&path).await.unwrap();

        assert!(props.unwrap().disabled);
    }

    #[test]
    fn test_default_max_size_is_square() {
        assert_eq!(MaxSize::default(), MaxSize::square(DEFAULT_SIZE));
    }
}
