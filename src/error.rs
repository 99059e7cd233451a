//! Error types for every boundary of the scan pipeline.
//!
//! Capture and inference failures never escape `trigger_capture` as `Err`:
//! the session controller folds them into a `ClassifiedResult` error or an
//! `Idle` notice. `SessionError` is reserved for rejected operations, where
//! nothing ran.

use crate::session::Phase;
use thiserror::Error;

/// Camera capture service failures.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("camera is not ready")]
    DeviceNotReady,

    #[error("capture source not found: {path}")]
    SourceMissing { path: String },

    #[error("failed to decode {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to save capture to {path}: {message}")]
    Persist { path: String, message: String },

    #[error("capture failed: {0}")]
    Device(String),
}

/// OCR / model execution failures.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("model is not loaded")]
    ModelNotLoaded,

    #[error("{0} is not supported by this engine")]
    Unsupported(&'static str),

    #[error("recognition timed out after {0}s")]
    Timeout(u64),

    #[error("recognition failed: {0}")]
    Engine(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures while loading the on-device model.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("inference engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("model data not found: {path}")]
    DataMissing { path: String },
}

/// Malformed line data reaching the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    #[error("recognized line {index} is missing")]
    InvalidInput { index: usize },
}

/// Operations rejected by the capture session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("not ready to capture (camera ready: {device_ready}, model ready: {inference_ready})")]
    NotReady {
        device_ready: bool,
        inference_ready: bool,
    },

    #[error("a capture is already in progress")]
    Busy,

    #[error("{operation} is not allowed while {phase}")]
    InvalidState {
        operation: &'static str,
        phase: Phase,
    },
}

/// Config file and environment override failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Top-level error for the command-line shell.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("scan failed: {0}")]
    Scan(String),

    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
}
