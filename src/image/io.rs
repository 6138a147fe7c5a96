//! I/O helpers for the command-line tool.
//!
//! - `load_depth_png`: read a 16-bit grayscale PNG into an owned depth buffer.
//! - `load_color_image`: read a PNG/JPEG/etc. into an owned RGB buffer.
//! - `save_mask_png`: write a binary mask as a 0/255 grayscale PNG.
//! - `save_grayscale_f32`: write an `ImageF32` in `[0, 1]` to a grayscale PNG.
//! - `save_grayscale_u8`: write raw 8-bit samples (e.g. a label map).
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{ChannelOrder, ColorImage, DepthImage, ImageF32, ImageView, Mask};
use image::{GrayImage, ImageBuffer};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Owned depth frame with borrowed view conversion.
#[derive(Clone, Debug)]
pub struct DepthBuffer {
    width: usize,
    height: usize,
    data: Vec<u16>,
}

impl DepthBuffer {
    pub fn new(width: usize, height: usize, data: Vec<u16>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Borrow as a read-only `DepthImage` view
    pub fn as_view(&self) -> DepthImage<'_> {
        DepthImage::new(self.width, self.height, &self.data)
    }
}

/// Owned RGB frame with borrowed view conversion.
#[derive(Clone, Debug)]
pub struct ColorBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl ColorBuffer {
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_view(&self) -> ColorImage<'_> {
        ColorImage::new(self.width, self.height, ChannelOrder::Rgb, &self.data)
    }
}

/// Load a 16-bit depth image. 8-bit inputs are widened without rescaling.
pub fn load_depth_png(path: &Path) -> Result<DepthBuffer, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_luma16();
    let width = img.width() as usize;
    let height = img.height() as usize;
    Ok(DepthBuffer::new(width, height, img.into_raw()))
}

/// Load an image from disk and convert to 8-bit RGB.
pub fn load_color_image(path: &Path) -> Result<ColorBuffer, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_rgb8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    Ok(ColorBuffer::new(width, height, img.into_raw()))
}

/// Save a binary mask as a 0/255 grayscale PNG.
pub fn save_mask_png(mask: &Mask, path: &Path) -> Result<(), String> {
    save_grayscale_u8(mask.w, mask.h, mask.to_u8(), path)
}

/// Save a float image with values in `[0, 1]` as an 8-bit grayscale PNG.
pub fn save_grayscale_f32(image: &ImageF32, path: &Path) -> Result<(), String> {
    let bytes = image
        .rows()
        .flat_map(|row| row.iter().map(|&v| (v * 255.0).clamp(0.0, 255.0) as u8))
        .collect();
    save_grayscale_u8(image.w, image.h, bytes, path)
}

/// Save a tightly packed 8-bit grayscale buffer to a PNG.
pub fn save_grayscale_u8(
    width: usize,
    height: usize,
    data: Vec<u8>,
    path: &Path,
) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let image: GrayImage = ImageBuffer::from_raw(width as u32, height as u32, data)
        .ok_or_else(|| format!("{width}x{height} buffer does not match its length"))?;
    image
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
