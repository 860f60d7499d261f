use serde::Serialize;

use crate::config::MaxSize;
use crate::controller::ImageInput;
use crate::error::{ImageInputError, Result};

pub const ACCEPT: &str = "image/*";
pub const CLEAR_LABEL: &str = "X";
pub const CLEAR_TITLE: &str = "Remove image";

/// What the host should draw for the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInputView {
    pub content: Content,
    pub file_control: FileControl,
    pub clear: ClearControl,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Content {
    Placeholder {
        text: String,
        size: MaxSize,
    },
    Image {
        src: String,
        alt: Option<String>,
        title: Option<String>,
        /// Fixed size while empty; `None` lets the image use its natural size.
        size: Option<MaxSize>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileControl {
    pub accept: &'static str,
    pub disabled: bool,
    pub selected_file: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClearControl {
    pub label: &'static str,
    pub title: &'static str,
}

impl ImageInputView {
    /// Pretty JSON, for hosts that render out of process.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(ImageInputError::Output)
    }
}

impl ImageInput {
    pub fn view(&self) -> ImageInputView {
        let content = match &self.props.placeholder {
            Some(text) if self.image.is_empty() => Content::Placeholder {
                text: text.clone(),
                size: self.size,
            },
            _ => Content::Image {
                src: self.image.to_string(),
                alt: self.props.description.clone(),
                title: self.props.title.clone(),
                size: self.image.is_empty().then_some(self.size),
            },
        };

        ImageInputView {
            content,
            file_control: FileControl {
                accept: ACCEPT,
                disabled: self.props.disabled,
                selected_file: self.selected_file.clone(),
            },
            clear: ClearControl {
                label: CLEAR_LABEL,
                title: CLEAR_TITLE,
            },
        }
    }
}
