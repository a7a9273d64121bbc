//! I/O helpers for grayscale images and JSON.
//!
//! - `load_grayscale_image`: read a PNG/JPEG/BMP into an owned 8-bit gray buffer.
//! - `save_grayscale_f32`: write an `ImageF32` in [0,1] to a grayscale file.
//! - `save_grayscale_u8` / `save_grayscale_as`: write an owned 8-bit gray
//!   buffer to disk, format from the extension or given explicitly.
//! - `encode_grayscale`: encode an owned 8-bit gray buffer to PNG/JPEG/BMP bytes.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{ImageF32, ImageU8, ImageView};
use crate::error::CldError;
use crate::types::EdgeMask;
use image::{DynamicImage, GrayImage, ImageFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// Owned 8-bit grayscale buffer with stride and borrowed view conversion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayImageU8 {
    width: usize,
    height: usize,
    stride: usize,
    data: Vec<u8>,
}

impl GrayImageU8 {
    /// Construct an owned grayscale buffer given raw bytes.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, CldError> {
        if data.len() != width * height {
            return Err(CldError::SizeMismatch {
                expected: width * height,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            stride: width,
            data,
        })
    }

    /// Quantize a float image in [0,1] to bytes, clamping out-of-range values.
    pub fn from_f32(image: &ImageF32) -> Self {
        let mut data = Vec::with_capacity(image.w * image.h);
        for row in image.rows() {
            data.extend(row.iter().map(|&px| unit_to_byte(px)));
        }
        Self {
            width: image.w,
            height: image.h,
            stride: image.w,
            data,
        }
    }

    /// Copy a binary edge mask.
    pub fn from_mask(mask: &EdgeMask) -> Self {
        Self {
            width: mask.w,
            height: mask.h,
            stride: mask.w,
            data: mask.data.clone(),
        }
    }

    /// Image width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw row-major bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer and return its bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Borrow as a read-only `ImageU8` view
    pub fn as_view(&self) -> ImageU8<'_> {
        ImageU8 {
            w: self.width,
            h: self.height,
            stride: self.stride,
            data: &self.data,
        }
    }

    fn to_gray_image(&self) -> Result<GrayImage, CldError> {
        GrayImage::from_raw(self.width as u32, self.height as u32, self.data.clone()).ok_or_else(
            || CldError::Image {
                message: "failed to create image buffer".to_string(),
            },
        )
    }
}

/// Encodings supported for the line drawing output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    Jpeg,
    Bmp,
}

impl OutputFormat {
    /// Pick a format from a file extension (`.png`, `.jpg`, `.jpeg`, `.bmp`).
    pub fn from_path(path: &Path) -> Result<Self, CldError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "bmp" => Ok(Self::Bmp),
            _ => Err(CldError::InvalidOption {
                name: "output",
                reason: format!("unsupported output file type {:?}", path.display().to_string()),
            }),
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Bmp => ImageFormat::Bmp,
        }
    }
}

#[inline]
fn unit_to_byte(px: f32) -> u8 {
    (px * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Load an image from disk and convert to 8-bit grayscale.
pub fn load_grayscale_image(path: &Path) -> Result<GrayImageU8, CldError> {
    if !path.exists() {
        return Err(CldError::Io {
            path: path.to_path_buf(),
            message: "file does not exist".to_string(),
        });
    }
    let img = image::open(path)
        .map_err(|e| CldError::Image {
            message: format!("failed to open {}: {e}", path.display()),
        })?
        .into_luma8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    GrayImageU8::new(width, height, img.into_raw())
}

/// Encode an 8-bit grayscale buffer in memory.
pub fn encode_grayscale(buffer: &GrayImageU8, format: OutputFormat) -> Result<Vec<u8>, CldError> {
    let image = buffer.to_gray_image()?;
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageLuma8(image)
        .write_to(&mut out, format.image_format())
        .map_err(|e| CldError::Image {
            message: format!("failed to encode {format:?}: {e}"),
        })?;
    Ok(out.into_inner())
}

/// Save a float image to a grayscale file, clamping values in [0, 255].
pub fn save_grayscale_f32(image: &ImageF32, path: &Path) -> Result<(), CldError> {
    save_grayscale_u8(&GrayImageU8::from_f32(image), path)
}

/// Save an 8-bit grayscale buffer; the format follows the file extension.
pub fn save_grayscale_u8(buffer: &GrayImageU8, path: &Path) -> Result<(), CldError> {
    save_grayscale_as(buffer, path, OutputFormat::from_path(path)?)
}

/// Save an 8-bit grayscale buffer with an explicit encoding.
pub fn save_grayscale_as(
    buffer: &GrayImageU8,
    path: &Path,
    format: OutputFormat,
) -> Result<(), CldError> {
    let bytes = encode_grayscale(buffer, format)?;
    ensure_parent_dir(path)?;
    fs::write(path, bytes).map_err(|e| CldError::io(path, e))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), CldError> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value).map_err(|e| CldError::Config {
        path: path.to_path_buf(),
        message: format!("failed to serialize JSON: {e}"),
    })?;
    fs::write(path, json).map_err(|e| CldError::io(path, e))
}

fn ensure_parent_dir(path: &Path) -> Result<(), CldError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| CldError::io(parent, e))?;
        }
    }
    Ok(())
}
