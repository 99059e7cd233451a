//! Shared test doubles for the capture session tests.

#![allow(dead_code)]

use async_trait::async_trait;
use scan_glass_lib::capture::{CameraCapture, CaptureOptions, FlashMode, PhotoRef};
use scan_glass_lib::classify::ClassifierConfig;
use scan_glass_lib::error::{CaptureError, InferenceError, ModelLoadError};
use scan_glass_lib::inference::{InferenceEngine, RecognizedLines};
use scan_glass_lib::CaptureController;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Ordered record of boundary calls, shared by camera and engine.
pub type EventLog = Arc<Mutex<Vec<&'static str>>>;

pub struct ScriptedCamera {
    ready: bool,
    fail: bool,
    gate: Option<Arc<Notify>>,
    /// Signaled when a capture starts.
    pub started: Arc<Notify>,
    pub captures: AtomicUsize,
    pub last_flash: Mutex<Option<FlashMode>>,
    log: EventLog,
}

impl ScriptedCamera {
    pub fn ready(log: &EventLog) -> Self {
        Self {
            ready: true,
            fail: false,
            gate: None,
            started: Arc::new(Notify::new()),
            captures: AtomicUsize::new(0),
            last_flash: Mutex::new(None),
            log: log.clone(),
        }
    }

    pub fn not_ready(log: &EventLog) -> Self {
        Self {
            ready: false,
            ..Self::ready(log)
        }
    }

    pub fn failing(log: &EventLog) -> Self {
        Self {
            fail: true,
            ..Self::ready(log)
        }
    }

    /// Hold every capture until `gate` is notified.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }
}

#[async_trait]
impl CameraCapture for ScriptedCamera {
    fn is_ready(&self) -> bool {
        self.ready
    }

    async fn capture_photo(&self, options: &CaptureOptions) -> Result<PhotoRef, CaptureError> {
        self.started.notify_one();
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let n = self.captures.fetch_add(1, Ordering::SeqCst) + 1;
        *self.last_flash.lock().unwrap() = Some(options.flash);
        self.log.lock().unwrap().push("capture");
        if self.fail {
            return Err(CaptureError::Device("shutter jammed".to_string()));
        }
        Ok(PhotoRef::new(format!("file:///tmp/sg-test/photo-{}.jpg", n)))
    }
}

pub struct ScriptedEngine {
    load_ok: bool,
    lines: Result<RecognizedLines, String>,
    pub loaded: AtomicBool,
    pub recognize_calls: AtomicUsize,
    log: EventLog,
}

impl ScriptedEngine {
    pub fn with_lines(log: &EventLog, lines: &[&str]) -> Self {
        Self::with_raw(log, lines.iter().map(|l| Some(l.to_string())).collect())
    }

    pub fn with_raw(log: &EventLog, lines: RecognizedLines) -> Self {
        Self {
            load_ok: true,
            lines: Ok(lines),
            loaded: AtomicBool::new(false),
            recognize_calls: AtomicUsize::new(0),
            log: log.clone(),
        }
    }

    pub fn failing(log: &EventLog, message: &str) -> Self {
        Self {
            lines: Err(message.to_string()),
            ..Self::with_raw(log, Vec::new())
        }
    }

    pub fn unloadable(log: &EventLog) -> Self {
        Self {
            load_ok: false,
            ..Self::with_raw(log, Vec::new())
        }
    }
}

#[async_trait]
impl InferenceEngine for ScriptedEngine {
    async fn load_model(&self) -> Result<(), ModelLoadError> {
        if !self.load_ok {
            return Err(ModelLoadError::DataMissing {
                path: "models/missing.traineddata".to_string(),
            });
        }
        self.loaded.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn unload_model(&self) {
        self.loaded.store(false, Ordering::SeqCst);
    }

    async fn recognize_text(&self, _photo: &PhotoRef) -> Result<RecognizedLines, InferenceError> {
        self.recognize_calls.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push("recognize");
        self.lines.clone().map_err(InferenceError::Engine)
    }
}

pub fn event_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn controller(camera: Arc<ScriptedCamera>, engine: Arc<ScriptedEngine>) -> CaptureController {
    CaptureController::new(
        camera,
        engine,
        CaptureOptions::default(),
        ClassifierConfig::default(),
    )
}
