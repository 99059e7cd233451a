//! Camera capture domain — public API.
//!
//! The camera itself is an external service behind [`CameraCapture`].
//! This module owns the capture options, the opaque photo handle, and a
//! file-backed camera used by the command-line shell.

mod file_camera;

pub use file_camera::FileCamera;

use crate::error::CaptureError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

const FILE_SCHEME: &str = "file://";

/// Flash setting passed with every capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashMode {
    #[default]
    Off,
    On,
}

impl FlashMode {
    pub fn toggled(self) -> Self {
        match self {
            FlashMode::Off => FlashMode::On,
            FlashMode::On => FlashMode::Off,
        }
    }
}

/// Options for a single photo capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaptureOptions {
    /// Compression quality in `0.0..=1.0`.
    pub quality: f32,
    /// Keep the captured file after the session is done with it.
    pub persist: bool,
    pub flash: FlashMode,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            quality: 0.8,
            persist: false,
            flash: FlashMode::Off,
        }
    }
}

impl CaptureOptions {
    /// Quality as a JPEG encoder setting (1-100).
    pub fn jpeg_quality(&self) -> u8 {
        let q = (self.quality.clamp(0.0, 1.0) * 100.0).round() as u8;
        q.max(1)
    }
}

/// Opaque handle to a captured image, stored as a URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoRef(String);

impl PhotoRef {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn from_path(path: &Path) -> Self {
        Self(format!("{}{}", FILE_SCHEME, path.display()))
    }

    pub fn uri(&self) -> &str {
        &self.0
    }

    /// Filesystem path, with any `file://` prefix stripped.
    pub fn file_path(&self) -> PathBuf {
        PathBuf::from(self.0.strip_prefix(FILE_SCHEME).unwrap_or(&self.0))
    }

    /// URI form, adding `file://` when the handle is a bare path.
    pub fn file_uri(&self) -> String {
        if self.0.starts_with(FILE_SCHEME) {
            self.0.clone()
        } else {
            format!("{}{}", FILE_SCHEME, self.0)
        }
    }
}

impl fmt::Display for PhotoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Camera capture service boundary.
#[async_trait]
pub trait CameraCapture: Send + Sync {
    /// Whether the device can take a photo right now.
    fn is_ready(&self) -> bool;

    /// Take a photo. Only called after the service reported itself ready.
    async fn capture_photo(&self, options: &CaptureOptions) -> Result<PhotoRef, CaptureError>;
}
