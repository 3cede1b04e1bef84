//! Automation scripts for the student-attendance backend: PDF reports,
//! enrollment-form OCR, email delivery and Telegram notifications.

pub mod config;
pub mod enrollment;
pub mod error;
pub mod mailer;
pub mod models;
pub mod notifier;
pub mod ocr;
pub mod pdf;
pub mod report;

pub use config::{SmtpConfig, TelegramConfig};
pub use enrollment::{extract_enrollment_data, parse_enrollment_text};
pub use mailer::EmailSender;
pub use models::{AttendanceReport, DailySummary, EnrollmentRecord, StudentRanking, SubjectEntry};
pub use notifier::AttendanceBot;
pub use ocr::{OcrEngine, TesseractCli};
pub use report::generate_attendance_report;
