/// Still image capture
///
/// On the desktop the "camera UI" is the native image picker. The picked
/// image is cropped (when editing is allowed), bounded in size and
/// re-encoded as JPEG at the requested quality, then handed back either as
/// base64 or as a `file://` URI to a copy in the cache directory.

use base64::prelude::*;
use chrono::Utc;
use image::codecs::jpeg::JpegEncoder;
use image::{imageops::FilterType, DynamicImage};
use reqwest::Url;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::task;

use super::{CameraProvider, Capture, CaptureOptions, Permission};
use crate::config::CameraConfig;

/// Longest edge of an encoded capture, in pixels
const MAX_EDGE: u32 = 1280;

/// Extensions offered by the picker
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp", "gif", "tif", "tiff"];

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("cannot read or store the image: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot decode or encode the image: {0}")]
    Image(#[from] image::ImageError),
    #[error("image task failed: {0}")]
    Task(#[from] task::JoinError),
    #[error("no cache directory available")]
    NoCacheDir,
}

/// Camera stand-in backed by the native file picker
#[derive(Debug, Clone)]
pub struct PickerCamera {
    enabled: bool,
}

impl PickerCamera {
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            enabled: config.enabled,
        }
    }
}

impl CameraProvider for PickerCamera {
    async fn request_permission(&self) -> Permission {
        if self.enabled {
            Permission::Granted
        } else {
            Permission::Denied
        }
    }

    async fn launch(&self, options: CaptureOptions) -> Result<Capture, CaptureError> {
        let picked = rfd::AsyncFileDialog::new()
            .set_title("Choose a photo")
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file()
            .await;

        let path = match picked {
            Some(file) => file.path().to_path_buf(),
            None => return Ok(Capture::Cancelled),
        };

        // Decoding and encoding are CPU-bound
        let jpeg = task::spawn_blocking(move || encode_capture(&path, options)).await??;
        tracing::debug!(bytes = jpeg.len(), "encoded capture");

        if options.want_base64 {
            Ok(Capture::Base64(BASE64_STANDARD.encode(&jpeg)))
        } else {
            let dir = capture_cache_dir().ok_or(CaptureError::NoCacheDir)?;
            let stored = task::spawn_blocking(move || store_capture(&jpeg, &dir)).await??;
            Ok(Capture::Uri(stored))
        }
    }
}

/// Load an image file and turn it into capture-ready JPEG bytes
pub fn encode_capture(path: &Path, options: CaptureOptions) -> Result<Vec<u8>, CaptureError> {
    let img = image::open(path)?;
    Ok(encode_jpeg(img, options)?)
}

/// Crop, bound and re-encode an image as JPEG
pub fn encode_jpeg(mut img: DynamicImage, options: CaptureOptions) -> Result<Vec<u8>, image::ImageError> {
    if options.allow_editing {
        img = crop_to_four_three(&img);
    }

    if img.width() > MAX_EDGE || img.height() > MAX_EDGE {
        // resize keeps the aspect ratio and fits inside the box
        img = img.resize(MAX_EDGE, MAX_EDGE, FilterType::Lanczos3);
    }

    let mut jpeg = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, jpeg_quality(options.quality));
    encoder.encode_image(&img.to_rgb8())?;
    Ok(jpeg)
}

/// Map a (0, 1] quality factor to JPEG quality 1..=100
fn jpeg_quality(quality: f32) -> u8 {
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Centred crop to a 4:3 landscape frame
fn crop_to_four_three(img: &DynamicImage) -> DynamicImage {
    let (width, height) = (img.width(), img.height());

    if width as u64 * 3 > height as u64 * 4 {
        // Too wide: trim the sides
        let new_width = (height * 4 / 3).max(1);
        img.crop_imm((width - new_width) / 2, 0, new_width, height)
    } else {
        // Too tall: trim top and bottom
        let new_height = (width * 3 / 4).max(1);
        img.crop_imm(0, (height - new_height) / 2, width, new_height)
    }
}

/// Get the capture cache directory
/// Returns ~/.cache/place-reporter/captures on Linux
fn capture_cache_dir() -> Option<PathBuf> {
    let mut path = dirs::cache_dir().or_else(dirs::home_dir)?;
    path.push("place-reporter");
    path.push("captures");
    Some(path)
}

/// Write an encoded capture into `dir` and return its `file://` URI
fn store_capture(jpeg: &[u8], dir: &Path) -> Result<String, CaptureError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.jpg", Utc::now().format("%Y%m%d-%H%M%S%3f")));
    fs::write(&path, jpeg)?;

    let uri = Url::from_file_path(&path)
        .map(String::from)
        .unwrap_or_else(|_| path.display().to_string());
    tracing::debug!(%uri, "stored capture");
    Ok(uri)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};

    fn options(allow_editing: bool) -> CaptureOptions {
        CaptureOptions {
            allow_editing,
            quality: 0.5,
            want_base64: true,
        }
    }

    fn decode(jpeg: &[u8]) -> DynamicImage {
        image::load_from_memory_with_format(jpeg, ImageFormat::Jpeg).unwrap()
    }

    #[test]
    fn test_jpeg_quality() {
        assert_eq!(jpeg_quality(0.5), 50);
        assert_eq!(jpeg_quality(1.0), 100);
        assert_eq!(jpeg_quality(0.001), 1);
    }

    #[test]
    fn test_crop_wide_image() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(800, 400));
        let cropped = decode(&encode_jpeg(img, options(true)).unwrap());
        assert_eq!((cropped.width(), cropped.height()), (533, 400));
    }

    #[test]
    fn test_crop_tall_image() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(300, 900));
        let cropped = decode(&encode_jpeg(img, options(true)).unwrap());
        assert_eq!((cropped.width(), cropped.height()), (300, 225));
    }

    #[test]
    fn test_crop_keeps_one_pixel_edge() {
        let thin = DynamicImage::ImageRgb8(RgbImage::new(1, 50));
        let cropped = decode(&encode_jpeg(thin, options(true)).unwrap());
        assert_eq!((cropped.width(), cropped.height()), (1, 1));

        let flat = DynamicImage::ImageRgb8(RgbImage::new(50, 1));
        let cropped = decode(&encode_jpeg(flat, options(true)).unwrap());
        assert_eq!((cropped.width(), cropped.height()), (1, 1));

        let dot = DynamicImage::ImageRgb8(RgbImage::new(1, 1));
        let cropped = decode(&encode_jpeg(dot, options(true)).unwrap());
        assert_eq!((cropped.width(), cropped.height()), (1, 1));
    }

    #[test]
    fn test_no_crop_without_editing() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(300, 900));
        let kept = decode(&encode_jpeg(img, options(false)).unwrap());
        assert_eq!((kept.width(), kept.height()), (300, 900));
    }

    #[test]
    fn test_large_image_is_bounded() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(2000, 1500));
        let bounded = decode(&encode_jpeg(img, options(true)).unwrap());
        assert_eq!((bounded.width(), bounded.height()), (1280, 960));
    }

    #[test]
    fn test_encode_capture_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("pick.png");
        DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 48, image::Rgb([200, 30, 30])))
            .save(&source)
            .unwrap();

        let jpeg = encode_capture(&source, options(true)).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);

        let missing = encode_capture(&dir.path().join("missing.png"), options(true));
        assert!(missing.is_err());
    }

    #[test]
    fn test_store_capture_returns_file_uri() {
        let dir = tempfile::tempdir().unwrap();
        let uri = store_capture(&[0xFF, 0xD8, 0xFF, 0xD9], &dir.path().join("captures")).unwrap();
        assert!(uri.starts_with("file://"));

        let path = Url::parse(&uri).unwrap().to_file_path().unwrap();
        assert_eq!(fs::read(path).unwrap(), vec![0xFF, 0xD8, 0xFF, 0xD9]);
    }
}
