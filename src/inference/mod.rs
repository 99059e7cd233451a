//! Inference domain — on-device OCR and object detection boundary.
//!
//! The engine is an owned resource: the session controller receives it at
//! construction and drives its model lifecycle (`load_model` /
//! `unload_model`). External code should only use the types exported here.

mod tesseract;

pub use tesseract::TesseractEngine;

use crate::capture::PhotoRef;
use crate::error::{InferenceError, ModelLoadError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw engine output, one entry per recognized line in reading order.
///
/// Bridged engines can report a null entry; those reach the classifier as
/// `None` and are rejected there.
pub type RecognizedLines = Vec<Option<String>>;

/// Model lifecycle settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelConfig {
    /// Directory holding the model data. `None` uses the engine's default.
    pub data_dir: Option<PathBuf>,
    pub num_threads: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            num_threads: 1,
        }
    }
}

/// Text recognition settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OcrConfig {
    pub language: String,
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Object detection parameters (YOLO-style models).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetectionParams {
    pub image_mean: f32,
    pub image_std: f32,
    pub threshold: f32,
    pub num_results_per_class: u32,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            image_mean: 0.0,
            image_std: 255.0,
            threshold: 0.4,
            num_results_per_class: 5,
        }
    }
}

/// Normalized bounding box (0.0-1.0 of image width/height).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// A single detected object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    pub label: String,
    pub confidence: f32,
    pub rect: BoundingBox,
}

/// Inference engine boundary.
#[async_trait]
pub trait InferenceEngine: Send + Sync {
    /// Load the model. Called once before inference readiness is signaled.
    async fn load_model(&self) -> Result<(), ModelLoadError>;

    /// Release the model.
    async fn unload_model(&self) {}

    /// Recognize text lines in a captured photo.
    async fn recognize_text(&self, photo: &PhotoRef) -> Result<RecognizedLines, InferenceError>;

    /// Detect objects in a captured photo. Not part of the scan chain.
    async fn detect_objects(
        &self,
        _photo: &PhotoRef,
        _params: &DetectionParams,
    ) -> Result<Vec<Detection>, InferenceError> {
        Err(InferenceError::Unsupported("object detection"))
    }
}
