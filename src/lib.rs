//! Image picker form control.
//!
//! Turns a picked file into a `data:` URI, downsizing it to fit a bounding box
//! when one is configured, and reports the result through a change callback.
//! The widget is host-agnostic: hosts feed it files and external values and
//! draw the [`ImageInputView`] it produces.

pub mod config;
pub mod controller;
pub mod error;
pub mod render;
pub mod resize;
pub mod state;
pub mod value;

pub use config::{ImageInputProps, MaxSize, OutputFormat, ResizeOptions, DEFAULT_SIZE};
pub use controller::{ChangeCallback, ImageInput};
pub use error::{ImageInputError, Result};
pub use render::{ClearControl, Content, FileControl, ImageInputView};
pub use resize::{resize, target_size, Resizer};
pub use state::reconcile;
pub use value::{ImageValue, PickedFile};
