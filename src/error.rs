//! Error types for each script.
//!
//! None of these cross a process boundary as Rust values: the mailer and the
//! notifier fold them into a `false` return, the renderer and the extractor
//! print their `Display` text inside a `{"error": ...}` object.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing {0} environment variables")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid email address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("failed to read attachment '{path}': {source}")]
    Attachment {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid content type: {0}")]
    ContentType(String),

    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Transport(String),
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("{0}")]
    InvalidData(#[from] serde_json::Error),

    #[error("failed to load font: {0}")]
    Font(String),

    #[error("failed to serialise PDF: {0}")]
    Render(String),

    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("cannot open image '{path}': {detail}")]
    UnreadableImage { path: PathBuf, detail: String },

    #[error("failed to stage image for OCR: {0}")]
    Staging(#[source] std::io::Error),

    #[error("OCR engine '{command}' is not installed or not runnable; set TESSERACT_CMD")]
    EngineMissing { command: String },

    #[error("failed to run '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("tesseract exited with {status}: {stderr}")]
    EngineFailed { status: String, stderr: String },
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Telegram request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Telegram API rejected the message ({status}): {description}")]
    Api { status: u16, description: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_names_variables() {
        let e = ConfigError::Missing("SMTP_USER or SMTP_PASSWORD");
        assert_eq!(
            e.to_string(),
            "Missing SMTP_USER or SMTP_PASSWORD environment variables"
        );
    }

    #[test]
    fn api_error_display_carries_description() {
        let e = NotifyError::Api {
            status: 400,
            description: "Bad Request: chat not found".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("400"), "got: {msg}");
        assert!(msg.contains("chat not found"), "got: {msg}");
    }

    #[test]
    fn invalid_data_display_is_the_parser_message() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let expected = source.to_string();
        let e = ReportError::from(source);
        assert_eq!(e.to_string(), expected);
    }
}
