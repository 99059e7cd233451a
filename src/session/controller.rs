//! Capture session controller — capture → OCR → classify → publish.
//!
//! Holds the session inside a `watch` channel: every transition is
//! published to subscribers. The state is only touched between awaits, so
//! the camera and engine never observe a half-applied transition.

use super::{CaptureSession, Phase};
use crate::capture::{CameraCapture, CaptureOptions, FlashMode, PhotoRef};
use crate::classify::{self, ClassifiedResult, ClassifierConfig, ScanFailure};
use crate::error::{ModelLoadError, SessionError};
use crate::inference::InferenceEngine;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// What happened to an accepted capture.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    /// A photo is on screen. The result carries an error indicator if
    /// recognition or classification failed.
    Previewing(ClassifiedResult),
    /// No photo was obtained; the session is back to idle.
    Failed(ScanFailure),
    /// A retake arrived mid-capture and the result was discarded.
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetakeStatus {
    Cleared,
    /// Applied once the in-flight capture resolves.
    Queued,
    NoOp,
}

/// Photo and result handed to whoever consumes a "use photo".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanHandoff {
    pub photo: PhotoRef,
    pub result: ClassifiedResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CaptureMode {
    /// Capture, recognize, classify.
    Scan,
    /// Capture only (shutter button).
    Photo,
}

enum ChainResult {
    Complete(PhotoRef, ClassifiedResult),
    Failed(Option<PhotoRef>, ScanFailure),
}

pub struct CaptureController {
    camera: Arc<dyn CameraCapture>,
    engine: Arc<dyn InferenceEngine>,
    options: CaptureOptions,
    classifier: ClassifierConfig,
    state: watch::Sender<CaptureSession>,
}

impl CaptureController {
    pub fn new(
        camera: Arc<dyn CameraCapture>,
        engine: Arc<dyn InferenceEngine>,
        options: CaptureOptions,
        classifier: ClassifierConfig,
    ) -> Self {
        let (state, _) = watch::channel(CaptureSession::new());
        Self {
            camera,
            engine,
            options,
            classifier,
            state,
        }
    }

    /// Current session state.
    pub fn snapshot(&self) -> CaptureSession {
        self.state.borrow().clone()
    }

    /// Receive a snapshot after every transition.
    pub fn subscribe(&self) -> watch::Receiver<CaptureSession> {
        self.state.subscribe()
    }

    /// Load the model and probe the camera. On `ModelLoadError` the
    /// inference flag stays false; photo-only capture keeps working.
    pub async fn initialize(&self) -> Result<(), ModelLoadError> {
        let start = Instant::now();
        let loaded = self.engine.load_model().await;
        match &loaded {
            Ok(()) => log::info!("[OCR] Model loaded in {}ms", start.elapsed().as_millis()),
            Err(e) => log::error!("[OCR] Failed to load model: {} — scanning disabled", e),
        }
        self.on_external_readiness(self.camera.is_ready(), loaded.is_ok());
        loaded
    }

    /// Unload the model. Scanning is unavailable until the next `initialize`.
    pub async fn shutdown(&self) {
        self.engine.unload_model().await;
        let device = self.state.borrow().readiness.device;
        self.on_external_readiness(device, false);
    }

    pub fn on_external_readiness(&self, device_ready: bool, inference_ready: bool) {
        self.state.send_if_modified(|s| {
            let changed = s.readiness.device != device_ready || s.readiness.inference != inference_ready;
            s.readiness.device = device_ready;
            s.readiness.inference = inference_ready;
            changed
        });
        log::debug!(
            "[SESSION] Readiness: camera={}, model={}",
            device_ready,
            inference_ready
        );
    }

    pub fn toggle_flash(&self) -> FlashMode {
        let mut flash = FlashMode::Off;
        self.state.send_modify(|s| {
            s.flash = s.flash.toggled();
            flash = s.flash;
        });
        flash
    }

    /// Scan: capture a photo, recognize its text and classify the lines.
    ///
    /// `Err` means the trigger was rejected and nothing ran. Failures inside
    /// the chain come back as an outcome, never as `Err`.
    pub async fn trigger_capture(&self) -> Result<CaptureOutcome, SessionError> {
        self.run(CaptureMode::Scan).await
    }

    /// Shutter only: capture a photo and preview it without recognition.
    /// Needs the camera but not the model.
    pub async fn trigger_photo(&self) -> Result<CaptureOutcome, SessionError> {
        self.run(CaptureMode::Photo).await
    }

    /// Discard the current photo and result and return to idle.
    pub fn retake(&self) -> RetakeStatus {
        let mut status = RetakeStatus::NoOp;
        self.state.send_if_modified(|s| match s.phase {
            Phase::Previewing => {
                s.clear();
                status = RetakeStatus::Cleared;
                true
            }
            Phase::Capturing => {
                s.retake_pending = true;
                status = RetakeStatus::Queued;
                false
            }
            Phase::Idle => false,
        });
        log::info!("[SESSION] Retake: {:?}", status);
        status
    }

    /// Hand the previewed photo and its result to the caller.
    pub fn use_photo(&self) -> Result<ScanHandoff, SessionError> {
        let session = self.state.borrow();
        match (&session.phase, &session.photo_ref, &session.last_result) {
            (Phase::Previewing, Some(photo), Some(result)) => {
                log::info!(
                    "[SESSION] Photo used: {} ({} lines)",
                    photo,
                    result.total()
                );
                Ok(ScanHandoff {
                    photo: photo.clone(),
                    result: result.clone(),
                })
            }
            (phase, _, _) => Err(SessionError::InvalidState {
                operation: "use_photo",
                phase: *phase,
            }),
        }
    }

    async fn run(&self, mode: CaptureMode) -> Result<CaptureOutcome, SessionError> {
        let guard = self.begin(mode)?;
        let start = Instant::now();
        let chain = self.run_chain(mode, guard.flash).await;
        let outcome = self.finish(chain);
        guard.disarm();
        log::info!(
            "[SESSION] {:?} capture finished in {}ms: {}",
            mode,
            start.elapsed().as_millis(),
            describe(&outcome)
        );
        Ok(outcome)
    }

    /// Check the trigger against the session and enter `Capturing`.
    /// The returned guard carries the flash mode to capture with.
    fn begin(&self, mode: CaptureMode) -> Result<CaptureGuard<'_>, SessionError> {
        let mut accepted: Result<FlashMode, SessionError> = Err(SessionError::Busy);
        self.state.send_if_modified(|s| {
            accepted = check_trigger(s, mode);
            if accepted.is_ok() {
                s.begin_capture();
                true
            } else {
                false
            }
        });
        if let Err(e) = &accepted {
            log::warn!("[SESSION] Capture rejected: {}", e);
        }
        accepted.map(|flash| CaptureGuard {
            state: &self.state,
            flash,
            armed: true,
        })
    }

    async fn run_chain(&self, mode: CaptureMode, flash: FlashMode) -> ChainResult {
        let options = CaptureOptions {
            flash,
            ..self.options.clone()
        };

        let capture_start = Instant::now();
        let photo = match self.camera.capture_photo(&options).await {
            Ok(photo) => photo,
            Err(e) => {
                log::error!("[CAPTURE] Failed to take picture: {}", e);
                return ChainResult::Failed(None, ScanFailure::capture(&e));
            }
        };
        log::info!(
            "[CAPTURE] Photo ready in {}ms: {}",
            capture_start.elapsed().as_millis(),
            photo
        );

        if mode == CaptureMode::Photo {
            return ChainResult::Complete(photo, ClassifiedResult::default());
        }

        let ocr_start = Instant::now();
        let lines = match self.engine.recognize_text(&photo).await {
            Ok(lines) => lines,
            Err(e) => {
                log::error!("[OCR] Text recognition failed: {}", e);
                return ChainResult::Failed(Some(photo), ScanFailure::inference(&e));
            }
        };
        log::info!(
            "[OCR] {} lines in {}ms",
            lines.len(),
            ocr_start.elapsed().as_millis()
        );

        match classify::classify_recognized(&lines, &self.classifier) {
            Ok(result) => {
                log::info!(
                    "[CLASSIFY] links={}, emails={}, phones={}, plain={}",
                    result.links.len(),
                    result.emails.len(),
                    result.phones.len(),
                    result.plain.len()
                );
                ChainResult::Complete(photo, result)
            }
            Err(e) => {
                log::warn!("[CLASSIFY] Rejected OCR output: {}", e);
                ChainResult::Failed(Some(photo), ScanFailure::invalid_input(&e))
            }
        }
    }

    /// Publish the chain's result, then apply a queued retake.
    fn finish(&self, chain: ChainResult) -> CaptureOutcome {
        let mut outcome = CaptureOutcome::Discarded;
        self.state.send_modify(|s| {
            let retake = s.retake_pending;
            outcome = match chain {
                ChainResult::Complete(photo, result) => {
                    s.show_preview(photo, result.clone());
                    CaptureOutcome::Previewing(result)
                }
                ChainResult::Failed(Some(photo), failure) => {
                    let result = ClassifiedResult::failed(failure);
                    s.show_preview(photo, result.clone());
                    CaptureOutcome::Previewing(result)
                }
                ChainResult::Failed(None, failure) => {
                    s.fall_back(failure.clone());
                    CaptureOutcome::Failed(failure)
                }
            };
            if retake {
                log::info!("[SESSION] Applying retake queued during capture");
                if s.phase == Phase::Previewing {
                    outcome = CaptureOutcome::Discarded;
                }
                s.clear();
            }
        });
        outcome
    }
}

/// Owns the `Capturing` phase for one accepted trigger. If the trigger
/// future is dropped before `finish`, the session returns to `Idle`.
struct CaptureGuard<'a> {
    state: &'a watch::Sender<CaptureSession>,
    flash: FlashMode,
    armed: bool,
}

impl CaptureGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for CaptureGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        self.state.send_if_modified(|s| {
            if s.phase != Phase::Capturing {
                return false;
            }
            s.clear();
            true
        });
        log::warn!("[SESSION] Capture abandoned before completion, session reset to idle");
    }
}

fn check_trigger(session: &CaptureSession, mode: CaptureMode) -> Result<FlashMode, SessionError> {
    match session.phase {
        Phase::Idle => {}
        Phase::Capturing => return Err(SessionError::Busy),
        Phase::Previewing => {
            return Err(SessionError::InvalidState {
                operation: "capture",
                phase: Phase::Previewing,
            })
        }
    }

    let ready = match mode {
        CaptureMode::Scan => session.readiness.scan_ready(),
        CaptureMode::Photo => session.readiness.device,
    };
    if !ready {
        return Err(SessionError::NotReady {
            device_ready: session.readiness.device,
            inference_ready: session.readiness.inference,
        });
    }
    Ok(session.flash)
}

fn describe(outcome: &CaptureOutcome) -> String {
    match outcome {
        CaptureOutcome::Previewing(result) => match &result.error {
            Some(failure) => format!("preview with error ({})", failure),
            None => format!("preview with {} lines", result.total()),
        },
        CaptureOutcome::Failed(failure) => format!("no photo ({})", failure),
        CaptureOutcome::Discarded => "discarded by retake".to_string(),
    }
}
