use std::future::Future;

use tracing::{debug, error, info, warn};

use crate::config::{ImageInputProps, MaxSize, ResizeOptions};
use crate::error::{ImageInputError, Result};
use crate::resize::Resizer;
use crate::state::reconcile;
use crate::value::{ImageValue, PickedFile};

pub type ChangeCallback = Box<dyn FnMut(&ImageValue) + Send>;

/// Image picker form control.
///
/// Holds the displayed value and turns picked files into (optionally resized)
/// data URIs. Rendering is left to the host, see [`ImageInput::view`].
pub struct ImageInput {
    pub(crate) props: ImageInputProps,
    pub(crate) size: MaxSize,
    pub(crate) image: ImageValue,
    pub(crate) selected_file: Option<String>,
    resizer: Resizer,
    on_change: Option<ChangeCallback>,
}

impl ImageInput {
    pub fn new(props: ImageInputProps) -> Self {
        let mut input = Self {
            size: props.max_size.unwrap_or_default(),
            image: props.default_value.clone(),
            props,
            selected_file: None,
            resizer: Resizer::default(),
            on_change: None,
        };
        input.sync_external();
        input
    }

    pub fn with_resize_options(mut self, options: ResizeOptions) -> Self {
        self.resizer = Resizer::new(options);
        self
    }

    pub fn on_change<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&ImageValue) + Send + 'static,
    {
        self.on_change = Some(Box::new(callback));
        self
    }

    pub fn value(&self) -> &ImageValue {
        &self.image
    }

    /// Bounding size used for display, and for resizing when `maxSize` is set.
    pub fn size(&self) -> MaxSize {
        self.size
    }

    pub fn props(&self) -> &ImageInputProps {
        &self.props
    }

    /// Feeds the owner's current `value` prop. Call it on every re-render:
    /// a non-empty value that differs from what is displayed takes over.
    ///
    /// Returns whether the displayed value changed.
    pub fn set_value(&mut self, value: Option<ImageValue>) -> bool {
        self.props.value = value;
        self.sync_external()
    }

    // A controlled value wins over whatever the widget itself last wrote.
    fn sync_external(&mut self) -> bool {
        match reconcile(&self.image, self.props.value.as_ref()) {
            Some(next) => {
                debug!("External value overrides displayed image");
                self.image = next;
                true
            }
            None => false,
        }
    }

    /// Handles a file picked by the user. `None` (dialog dismissed) is a no-op.
    ///
    /// A file that cannot be read is ignored. Decode and encode failures leave
    /// the displayed value untouched and are returned.
    pub async fn pick(&mut self, file: Option<PickedFile>) -> Result<()> {
        let Some(file) = file else {
            debug!("No file picked");
            return Ok(());
        };

        self.selected_file = file.name();

        match self.load(file).await {
            Ok(value) => {
                self.commit(value);
                Ok(())
            }
            Err(ImageInputError::Read(e)) => {
                warn!("Could not read picked file: {e}");
                Ok(())
            }
            Err(e) => {
                error!("Dropping picked image: {e}");
                Err(e)
            }
        }
    }

    /// Reads and, if `maxSize` is configured, resizes a picked file.
    ///
    /// The returned future does not borrow the widget, so several picks may
    /// be in flight at once; feed each result to [`ImageInput::commit`] as it
    /// completes.
    pub fn load(
        &self,
        file: PickedFile,
    ) -> impl Future<Output = Result<ImageValue>> + Send + 'static {
        let max_size = self.props.max_size;
        let resizer = self.resizer;

        async move {
            let value = file.read().await?;
            match max_size {
                Some(bounds) => resizer.resize(&value, bounds).await,
                None => Ok(value),
            }
        }
    }

    /// Makes `value` the displayed image and notifies the owner.
    ///
    /// While the owner controls the widget through a non-empty `value`, the
    /// controlled value stays displayed; the callback still receives `value`.
    pub fn commit(&mut self, value: ImageValue) {
        info!("Image updated ({} chars)", value.as_str().len());
        self.image = value.clone();
        self.sync_external();
        self.notify(&value);
    }

    /// Resets the file control and empties the displayed value.
    pub fn clear(&mut self) {
        info!("Image cleared");
        self.selected_file = None;
        self.image = ImageValue::empty();
        self.sync_external();
        self.notify(&ImageValue::empty());
    }

    fn notify(&mut self, value: &ImageValue) {
        if let Some(callback) = self.on_change.as_mut() {
            callback(value);
        }
    }
}
