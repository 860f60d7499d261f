use std::io::Cursor;

use image::{codecs::jpeg::JpegEncoder, DynamicImage, GenericImageView, ImageFormat};
use tracing::{debug, info};

use crate::config::{MaxSize, OutputFormat, ResizeOptions};
use crate::error::{ImageInputError, Result};
use crate::value::ImageValue;

/// Size the image should be redrawn at, or `None` when it already fits.
///
/// Only the dominant side is checked against its own bound: a landscape image
/// that is narrow enough but too tall (or a portrait one that is short enough
/// but too wide) is redrawn at its natural size rather than scaled down.
pub fn target_size(
    width: u32,
    height: u32,
    max_width: u32,
    max_height: u32,
) -> Option<(u32, u32)> {
    if width <= max_width && height <= max_height {
        return None;
    }

    let (mut new_width, mut new_height) = (width as f64, height as f64);

    if width > height {
        if width > max_width {
            new_height *= max_width as f64 / width as f64;
            new_width = max_width as f64;
        }
    } else if height > max_height {
        new_width *= max_height as f64 / height as f64;
        new_height = max_height as f64;
    }

    Some((to_pixels(new_width), to_pixels(new_height)))
}

fn to_pixels(length: f64) -> u32 {
    (length.round() as u32).max(1)
}

/// Downsizes data URI images to fit a bounding box.
#[derive(Debug, Clone, Copy, Default)]
pub struct Resizer {
    options: ResizeOptions,
}

impl Resizer {
    pub fn new(options: ResizeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ResizeOptions {
        &self.options
    }

    /// Decodes and redraws on the blocking pool.
    pub async fn resize(&self, source: &ImageValue, bounds: MaxSize) -> Result<ImageValue> {
        let source = source.clone();
        let options = self.options;
        let task = tokio::task::spawn_blocking(move || resize_blocking(&source, bounds, options));
        task.await?
    }
}

/// Resizes `source` so it fits in `max_width`x`max_height`, with default options.
pub async fn resize(source: &ImageValue, max_width: u32, max_height: u32) -> Result<ImageValue> {
    let bounds = MaxSize::new(max_width, max_height)?;
    Resizer::default().resize(source, bounds).await
}

/// Synchronous core of [`Resizer::resize`].
pub fn resize_blocking(
    source: &ImageValue,
    bounds: MaxSize,
    options: ResizeOptions,
) -> Result<ImageValue> {
    let bytes = source.decode_payload()?;
    let image = image::load_from_memory(&bytes)
        .map_err(|e| ImageInputError::Decode(e.to_string()))?;

    let (width, height) = image.dimensions();
    let (max_width, max_height) = (bounds.width(), bounds.height());

    let Some((new_width, new_height)) = target_size(width, height, max_width, max_height) else {
        debug!("Image {width}x{height} fits in {max_width}x{max_height}, keeping it");
        return Ok(source.clone());
    };

    info!("Resizing image {width}x{height} -> {new_width}x{new_height}");

    let surface = if (new_width, new_height) == (width, height) {
        DynamicImage::ImageRgba8(image.to_rgba8())
    } else {
        let resized = image.resize_exact(new_width, new_height, options.filter);
        DynamicImage::ImageRgba8(resized.to_rgba8())
    };

    let encoded = encode(&surface, options.format)?;
    debug!("Encoded resized image: {} bytes", encoded.len());

    Ok(ImageValue::from_bytes(options.format.mime_type(), &encoded))
}

fn encode(surface: &DynamicImage, format: OutputFormat) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();

    let written = match format {
        OutputFormat::Png => {
            let mut cursor = Cursor::new(&mut buffer);
            surface.write_to(&mut cursor, ImageFormat::Png)
        }
        OutputFormat::Jpeg { quality } => {
            let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
            let rgb = DynamicImage::ImageRgb8(surface.to_rgb8());
            rgb.write_with_encoder(encoder)
        }
    };
    written.map_err(|e| ImageInputError::Encode(e.to_string()))?;

    if buffer.is_empty() {
        return Err(ImageInputError::Encode("encoder produced no data".to_string()));
    }

    Ok(buffer)
}
