//! File-backed camera — "captures" an image already on disk.
//!
//! The source is decoded to make sure it is a real image. With
//! `persist` set, a JPEG copy is written at the requested quality and the
//! copy is returned; otherwise the handle points at the source file.

use super::{CameraCapture, CaptureOptions, FlashMode, PhotoRef};
use crate::error::CaptureError;
use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Default directory for persisted captures.
fn default_output_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("scan-glass")
        .join("captures")
}

pub struct FileCamera {
    source: PathBuf,
    output_dir: PathBuf,
}

impl FileCamera {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            output_dir: default_output_dir(),
        }
    }

    /// Write persisted captures here instead of the cache directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }
}

#[async_trait]
impl CameraCapture for FileCamera {
    fn is_ready(&self) -> bool {
        self.source.is_file()
    }

    async fn capture_photo(&self, options: &CaptureOptions) -> Result<PhotoRef, CaptureError> {
        if !self.source.is_file() {
            return Err(CaptureError::SourceMissing {
                path: self.source.display().to_string(),
            });
        }
        if options.flash == FlashMode::On {
            log::debug!("[CAPTURE] Flash requested — file camera has no flash");
        }

        let source = self.source.clone();
        let output_dir = self.output_dir.clone();
        let options = options.clone();
        let start = Instant::now();

        // Decoding and JPEG encoding are CPU-bound.
        let photo = tokio::task::spawn_blocking(move || capture_blocking(&source, &output_dir, &options))
            .await
            .map_err(|e| CaptureError::Device(format!("capture task failed: {}", e)))??;

        log::info!(
            "[CAPTURE] {} in {}ms",
            photo,
            start.elapsed().as_millis()
        );
        Ok(photo)
    }
}

fn capture_blocking(
    source: &Path,
    output_dir: &Path,
    options: &CaptureOptions,
) -> Result<PhotoRef, CaptureError> {
    let img = image::open(source).map_err(|e| CaptureError::Decode {
        path: source.display().to_string(),
        source: e,
    })?;
    log::debug!("[CAPTURE] Decoded {}x{} from {}", img.width(), img.height(), source.display());

    if !options.persist {
        return Ok(PhotoRef::from_path(source));
    }

    let target = output_dir.join(capture_file_name());
    write_jpeg(&img, &target, options.jpeg_quality())?;
    Ok(PhotoRef::from_path(&target))
}

fn capture_file_name() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("capture-{}.jpg", millis)
}

fn write_jpeg(img: &DynamicImage, target: &Path, quality: u8) -> Result<(), CaptureError> {
    let persist_err = |message: String| CaptureError::Persist {
        path: target.display().to_string(),
        message,
    };

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(|e| persist_err(e.to_string()))?;
    }
    let file = std::fs::File::create(target).map_err(|e| persist_err(e.to_string()))?;
    let mut writer = std::io::BufWriter::new(file);

    // JPEG has no alpha channel.
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut writer, quality))
        .map_err(|e| persist_err(e.to_string()))?;
    log::info!("[CAPTURE] Saved JPEG (quality {}) to {}", quality, target.display());
    Ok(())
}
