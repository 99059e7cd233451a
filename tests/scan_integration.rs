//! End-to-end scan with the file camera and the tesseract engine.
//!
//! Requires the `tesseract` binary on PATH; skips otherwise.

use scan_glass_lib::capture::{CaptureOptions, FileCamera};
use scan_glass_lib::classify::ClassifierConfig;
use scan_glass_lib::inference::{ModelConfig, OcrConfig, TesseractEngine};
use scan_glass_lib::{CaptureController, CaptureOutcome, Phase};
use std::path::PathBuf;
use std::sync::Arc;

fn tesseract_available() -> bool {
    which::which("tesseract").is_ok()
}

fn blank_page(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sg-scan-test-{}", name));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("page.png");
    image::RgbImage::from_pixel(320, 120, image::Rgb([255, 255, 255]))
        .save(&path)
        .unwrap();
    path
}

#[tokio::test]
async fn scan_blank_page_ends_in_preview() {
    if !tesseract_available() {
        eprintln!("SKIP: tesseract not installed");
        return;
    }

    let page = blank_page("blank");
    let controller = CaptureController::new(
        Arc::new(FileCamera::new(&page)),
        Arc::new(TesseractEngine::new(ModelConfig::default(), OcrConfig::default())),
        CaptureOptions::default(),
        ClassifierConfig::default(),
    );
    controller.initialize().await.expect("tesseract should load");

    let start = std::time::Instant::now();
    let outcome = controller.trigger_capture().await.unwrap();
    eprintln!("[TEST] Scan finished in {}ms: {:?}", start.elapsed().as_millis(), outcome);

    // Whether OCR succeeds on an empty page or not, the photo is shown.
    assert!(matches!(outcome, CaptureOutcome::Previewing(_)));
    let session = controller.snapshot();
    assert_eq!(session.phase, Phase::Previewing);
    assert_eq!(session.photo_ref.unwrap().file_path(), page);

    let _ = std::fs::remove_dir_all(page.parent().unwrap());
}

#[tokio::test]
async fn photo_only_works_without_tesseract() {
    let page = blank_page("photo-only");
    let engine = TesseractEngine::new(
        ModelConfig {
            data_dir: Some(std::env::temp_dir().join("sg-scan-test-no-tessdata")),
            num_threads: 1,
        },
        OcrConfig::default(),
    );
    let controller = CaptureController::new(
        Arc::new(FileCamera::new(&page)),
        Arc::new(engine),
        CaptureOptions::default(),
        ClassifierConfig::default(),
    );

    // No traineddata in that directory (or no binary at all): model load fails.
    assert!(controller.initialize().await.is_err());
    assert!(!controller.snapshot().readiness.inference);

    let outcome = controller.trigger_photo().await.unwrap();
    assert!(matches!(outcome, CaptureOutcome::Previewing(ref r) if r.is_empty() && !r.is_error()));
    let handoff = controller.use_photo().unwrap();
    assert_eq!(handoff.photo.file_path(), page);

    let _ = std::fs::remove_dir_all(page.parent().unwrap());
}
