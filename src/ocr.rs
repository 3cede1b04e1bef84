//! Image to text through the Tesseract command-line engine.

use std::path::{Path, PathBuf};
use std::process::Command;

use image::ImageFormat;
use tracing::debug;

use crate::error::OcrError;

pub const DEFAULT_LANGUAGE: &str = "spa";

/// Anything that can turn an image on disk into raw text.
pub trait OcrEngine {
    fn image_to_text(&self, image_path: &Path) -> Result<String, OcrError>;
}

#[derive(Debug, Clone)]
pub struct TesseractCli {
    pub command: PathBuf,
    pub language: String,
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self {
            command: PathBuf::from("tesseract"),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl TesseractCli {
    /// Honours `TESSERACT_CMD` for installs outside `PATH`.
    pub fn from_env() -> Self {
        let mut engine = Self::default();
        if let Some(command) = std::env::var_os("TESSERACT_CMD").filter(|v| !v.is_empty()) {
            engine.command = PathBuf::from(command);
        }
        engine
    }

    /// Whether the configured binary answers `--version`.
    pub fn is_available(&self) -> bool {
        Command::new(&self.command)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

impl OcrEngine for TesseractCli {
    fn image_to_text(&self, image_path: &Path) -> Result<String, OcrError> {
        // Decode first so unreadable files fail before the engine runs, then
        // hand Tesseract a normalised PNG.
        let image = image::open(image_path).map_err(|e| OcrError::UnreadableImage {
            path: image_path.to_path_buf(),
            detail: e.to_string(),
        })?;
        if !self.is_available() {
            return Err(OcrError::EngineMissing {
                command: self.command.display().to_string(),
            });
        }
        let staged = tempfile::Builder::new()
            .prefix("enrollment-")
            .suffix(".png")
            .tempfile()
            .map_err(OcrError::Staging)?;
        image
            .save_with_format(staged.path(), ImageFormat::Png)
            .map_err(|e| OcrError::Staging(std::io::Error::other(e)))?;

        debug!(
            command = %self.command.display(),
            language = %self.language,
            "running tesseract"
        );
        let output = Command::new(&self.command)
            .arg(staged.path())
            .arg("stdout")
            .args(["-l", self.language.as_str()])
            .output()
            .map_err(|source| OcrError::Spawn {
                command: self.command.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(OcrError::EngineFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_engine_reads_spanish() {
        let engine = TesseractCli::default();
        assert_eq!(engine.language, "spa");
        assert_eq!(engine.command, PathBuf::from("tesseract"));
    }

    #[test]
    fn missing_image_is_unreadable() {
        let engine = TesseractCli::default();
        let err = engine
            .image_to_text(Path::new("/nonexistent/form.png"))
            .unwrap_err();
        assert!(matches!(err, OcrError::UnreadableImage { .. }));
    }

    #[test]
    fn non_image_bytes_are_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let err = TesseractCli::default().image_to_text(&path).unwrap_err();
        assert!(matches!(err, OcrError::UnreadableImage { .. }));
    }

    #[test]
    fn missing_binary_is_reported_after_decoding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form.png");
        image::RgbImage::new(4, 4).save(&path).unwrap();

        let engine = missing_engine(dir.path());
        assert!(!engine.is_available());
        let err = engine.image_to_text(&path).unwrap_err();
        assert!(matches!(err, OcrError::EngineMissing { .. }));
        assert!(err.to_string().contains("TESSERACT_CMD"));
    }

    fn missing_engine(dir: &Path) -> TesseractCli {
        TesseractCli {
            command: dir.join("no-such-tesseract"),
            ..TesseractCli::default()
        }
    }

    #[test]
    fn scanner_formats_decode() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["form.bmp", "form.tiff", "form.gif"] {
            let path = dir.path().join(name);
            image::RgbaImage::new(2, 2).save(&path).unwrap();

            // Reaching the engine check means the image itself decoded.
            let err = missing_engine(dir.path()).image_to_text(&path).unwrap_err();
            assert!(
                matches!(err, OcrError::EngineMissing { .. }),
                "{name}: {err}"
            );
        }
    }
}
