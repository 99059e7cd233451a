//! OCR via the `tesseract` command-line program.
//!
//! `load_model` locates the binary on PATH (and the traineddata file when a
//! data directory is configured). Each recognition runs one child process
//! with stdout output; the model thread count is passed as
//! `OMP_THREAD_LIMIT`.

use super::{InferenceEngine, ModelConfig, OcrConfig, RecognizedLines};
use crate::capture::PhotoRef;
use crate::error::{InferenceError, ModelLoadError};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tokio::process::Command;

const BINARY: &str = "tesseract";

pub struct TesseractEngine {
    model: ModelConfig,
    ocr: OcrConfig,
    /// Resolved binary path; `Some` once the model is loaded.
    binary: Mutex<Option<PathBuf>>,
}

impl TesseractEngine {
    pub fn new(model: ModelConfig, ocr: OcrConfig) -> Self {
        Self {
            model,
            ocr,
            binary: Mutex::new(None),
        }
    }

    fn loaded_binary(&self) -> Option<PathBuf> {
        self.binary.lock().ok().and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl InferenceEngine for TesseractEngine {
    async fn load_model(&self) -> Result<(), ModelLoadError> {
        let binary = which::which(BINARY)
            .map_err(|e| ModelLoadError::EngineUnavailable(format!("{}: {}", BINARY, e)))?;

        if let Some(dir) = &self.model.data_dir {
            let data = dir.join(format!("{}.traineddata", self.ocr.language));
            if !data.is_file() {
                return Err(ModelLoadError::DataMissing {
                    path: data.display().to_string(),
                });
            }
        }

        log::info!(
            "[OCR] Using {} (language={}, threads={})",
            binary.display(),
            self.ocr.language,
            self.model.num_threads
        );
        if let Ok(mut guard) = self.binary.lock() {
            *guard = Some(binary);
        }
        Ok(())
    }

    async fn unload_model(&self) {
        if let Ok(mut guard) = self.binary.lock() {
            *guard = None;
        }
        log::info!("[OCR] Model unloaded");
    }

    async fn recognize_text(&self, photo: &PhotoRef) -> Result<RecognizedLines, InferenceError> {
        let binary = self.loaded_binary().ok_or(InferenceError::ModelNotLoaded)?;
        let image_path = photo.file_path();

        let mut cmd = Command::new(&binary);
        if let Some(dir) = &self.model.data_dir {
            cmd.arg("--tessdata-dir").arg(dir);
        }
        cmd.arg(&image_path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.ocr.language)
            .env("OMP_THREAD_LIMIT", self.model.num_threads.max(1).to_string())
            .kill_on_drop(true);

        let output = tokio::time::timeout(Duration::from_secs(self.ocr.timeout_secs), cmd.output())
            .await
            .map_err(|_| InferenceError::Timeout(self.ocr.timeout_secs))??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(InferenceError::Engine(format!(
                "{} exited with {}: {}",
                BINARY,
                output.status,
                stderr.trim()
            )));
        }

        Ok(parse_output(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Split tesseract stdout into lines, dropping blank lines and the trailing
/// form feed it emits after each page.
fn parse_output(stdout: &str) -> RecognizedLines {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| Some(line.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_output_drops_blanks_and_form_feed() {
        let stdout = "Jane Doe\n\njane@example.com \n  +1 555 123 4567\n\x0c";
        assert_eq!(
            parse_output(stdout),
            vec![
                Some("Jane Doe".to_string()),
                Some("jane@example.com".to_string()),
                Some("+1 555 123 4567".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn recognize_before_load_fails() {
        let engine = TesseractEngine::new(ModelConfig::default(), OcrConfig::default());
        let err = engine
            .recognize_text(&PhotoRef::new("/tmp/none.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, InferenceError::ModelNotLoaded));
    }

    #[tokio::test]
    async fn missing_traineddata_fails_load() {
        if which::which(BINARY).is_err() {
            eprintln!("SKIP: tesseract not installed");
            return;
        }
        let model = ModelConfig {
            data_dir: Some(std::env::temp_dir().join("sg-test-no-tessdata")),
            num_threads: 1,
        };
        let err = TesseractEngine::new(model, OcrConfig::default())
            .load_model()
            .await
            .unwrap_err();
        assert!(matches!(err, ModelLoadError::DataMissing { .. }));
    }

    #[tokio::test]
    async fn detection_is_unsupported() {
        let engine = TesseractEngine::new(ModelConfig::default(), OcrConfig::default());
        let err = engine
            .detect_objects(&PhotoRef::new("/tmp/none.png"), &Default::default())
            .await
            .unwrap_err();
        assert!(matches!(err, InferenceError::Unsupported(_)));
    }
}
