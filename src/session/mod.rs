//! Capture session domain — the per-screen state machine.
//!
//! `CaptureSession` is plain data plus transition methods. Only the
//! [`CaptureController`] mutates it; the UI observes published snapshots.

mod controller;

pub use controller::{CaptureController, CaptureOutcome, RetakeStatus, ScanHandoff};

use crate::capture::{FlashMode, PhotoRef};
use crate::classify::{ClassifiedResult, ScanFailure};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    #[default]
    Idle,
    Capturing,
    Previewing,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Idle => "idle",
            Phase::Capturing => "capturing",
            Phase::Previewing => "previewing",
        })
    }
}

/// External readiness signals. Both must be set before a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Readiness {
    pub device: bool,
    pub inference: bool,
}

impl Readiness {
    pub fn scan_ready(&self) -> bool {
        self.device && self.inference
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureSession {
    pub phase: Phase,
    /// Set only while previewing.
    pub photo_ref: Option<PhotoRef>,
    /// Set only while previewing.
    pub last_result: Option<ClassifiedResult>,
    pub readiness: Readiness,
    pub flash: FlashMode,
    /// Failure surfaced when a capture fell back to idle without a photo.
    pub notice: Option<ScanFailure>,
    /// Retake requested mid-capture, applied when the capture resolves.
    #[serde(skip)]
    pub(crate) retake_pending: bool,
}

impl CaptureSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn begin_capture(&mut self) {
        self.phase = Phase::Capturing;
        self.photo_ref = None;
        self.last_result = None;
        self.notice = None;
        self.retake_pending = false;
    }

    pub(crate) fn show_preview(&mut self, photo: PhotoRef, result: ClassifiedResult) {
        self.phase = Phase::Previewing;
        self.photo_ref = Some(photo);
        self.last_result = Some(result);
    }

    pub(crate) fn fall_back(&mut self, failure: ScanFailure) {
        self.phase = Phase::Idle;
        self.photo_ref = None;
        self.last_result = None;
        self.notice = Some(failure);
    }

    pub(crate) fn clear(&mut self) {
        self.phase = Phase::Idle;
        self.photo_ref = None;
        self.last_result = None;
        self.retake_pending = false;
    }
}
