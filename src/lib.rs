//! Scan-Glass — capture a photo, OCR it, sort the lines.
//!
//! Domains:
//!   - capture    — camera boundary, capture options, file-backed camera
//!   - inference  — OCR/detection boundary, tesseract engine
//!   - classify   — pure line classifier (email > URL > phone > plain)
//!   - session    — capture-session state machine and its controller
//!   - config     — defaults, config file, environment overrides
//!
//! `run` is the command-line shell: it wires a file camera and the
//! tesseract engine into a controller and scans one image.

pub mod capture;
pub mod classify;
pub mod config;
pub mod error;
pub mod inference;
pub mod session;

pub use classify::{classify, ClassifiedResult, LineCategory};
pub use error::Error;
pub use session::{CaptureController, CaptureOutcome, CaptureSession, Phase};

use capture::FileCamera;
use config::ScanConfig;
use inference::TesseractEngine;
use std::sync::Arc;

const USAGE: &str = "Usage:
  scan-glass <image> [--photo-only] [--flash] [--persist]

Options:
  --photo-only   Capture and preview without OCR
  --flash        Turn the flash on before capturing
  --persist      Keep a JPEG copy of the capture";

/// Command-line entry point: scan one image and print the handoff as JSON.
pub async fn run(args: Vec<String>) -> Result<(), Error> {
    load_env_files();
    if let Err(e) = env_logger::try_init() {
        eprintln!("[STARTUP] Keeping existing logger: {}", e);
    }

    let image = args
        .iter()
        .skip(1)
        .find(|a| !a.starts_with("--"))
        .ok_or_else(|| Error::Usage(USAGE.to_string()))?;
    let photo_only = args.iter().any(|a| a == "--photo-only");
    let flash = args.iter().any(|a| a == "--flash");

    let mut config = ScanConfig::resolve()?;
    if args.iter().any(|a| a == "--persist") {
        config.capture.persist = true;
    }
    log::info!("Scan-Glass starting up");

    let camera = Arc::new(FileCamera::new(image));
    let engine = Arc::new(TesseractEngine::new(config.model.clone(), config.ocr.clone()));
    let controller = CaptureController::new(camera, engine, config.capture.clone(), config.classifier);

    if let Err(e) = controller.initialize().await {
        log::warn!("[STARTUP] {} — only --photo-only captures are possible", e);
    }
    if flash {
        controller.toggle_flash();
    }

    let outcome = if photo_only {
        controller.trigger_photo().await?
    } else {
        controller.trigger_capture().await?
    };

    let printed = match outcome {
        CaptureOutcome::Previewing(_) => {
            let handoff = controller.use_photo()?;
            println!("{}", serde_json::to_string_pretty(&handoff)?);
            Ok(())
        }
        CaptureOutcome::Failed(failure) => Err(Error::Scan(failure.message)),
        CaptureOutcome::Discarded => Err(Error::Scan("capture was discarded".to_string())),
    };

    controller.shutdown().await;
    printed
}

/// Load `.env.local`, else `.env`, from the working directory.
fn load_env_files() {
    for env_file in [".env.local", ".env"] {
        let path = std::path::Path::new(env_file);
        if path.exists() {
            match dotenvy::from_path(path) {
                Ok(_) => eprintln!("[STARTUP] Loaded {}", path.display()),
                Err(e) => eprintln!("[STARTUP] Failed to load {}: {}", path.display(), e),
            }
            break;
        }
    }
}
