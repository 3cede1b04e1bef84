//! Enrollment-form extraction.
//!
//! OCR text is fed through a fixed, ordered list of rules. Every rule is an
//! independent pass that only writes its own fields; nothing is validated
//! across fields and a rule that finds nothing leaves its fields empty.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::{EnrollmentRecord, SubjectEntry};
use crate::ocr::OcrEngine;

static REGISTRATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{9,}").unwrap());
static REGISTRATION_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{9,}-(.+)").unwrap());
static CAREER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+-\d+\s+(.+)").unwrap());
static SEMESTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+/\d+)").unwrap());
static SUBJECT_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]{3}\d{3}").unwrap());

/// One extraction pass over the OCR text.
pub struct ExtractionRule {
    pub name: &'static str,
    apply: fn(&str, &mut EnrollmentRecord),
}

impl ExtractionRule {
    pub fn apply(&self, text: &str, record: &mut EnrollmentRecord) {
        (self.apply)(text, record);
    }
}

/// Rules in the order they run.
pub const RULES: &[ExtractionRule] = &[
    ExtractionRule {
        name: "registration",
        apply: extract_registration,
    },
    ExtractionRule {
        name: "career",
        apply: extract_career,
    },
    ExtractionRule {
        name: "location",
        apply: extract_location,
    },
    ExtractionRule {
        name: "semester",
        apply: extract_semester,
    },
    ExtractionRule {
        name: "subjects",
        apply: extract_subjects,
    },
];

// Line rules visit every line, so a later qualifying line replaces an
// earlier value.

fn extract_registration(text: &str, record: &mut EnrollmentRecord) {
    for line in text.split('\n') {
        if !(line.contains("Registro") || line.contains("No.")) {
            continue;
        }
        let Some(number) = REGISTRATION.find(line) else {
            continue;
        };
        record.registration_number = number.as_str().to_string();
        if let Some(name) = REGISTRATION_NAME.captures(line) {
            record.student_name = name[1].trim().to_string();
        }
    }
}

fn extract_career(text: &str, record: &mut EnrollmentRecord) {
    for line in text.split('\n') {
        if !(line.contains("Carrera") || line.contains("INGENIERIA")) {
            continue;
        }
        if let Some(career) = CAREER.find(line) {
            // The code pair stays part of the career string.
            record.career = career.as_str().trim().to_string();
        }
    }
}

fn extract_location(text: &str, record: &mut EnrollmentRecord) {
    for line in text.split('\n') {
        if !line.contains("Lugar") {
            continue;
        }
        if let Some(place) = line.split(':').nth(1) {
            record.location = place.trim().to_string();
        }
    }
}

fn extract_semester(text: &str, record: &mut EnrollmentRecord) {
    for line in text.split('\n') {
        if !(line.contains("BOLETA") && line.contains('/')) {
            continue;
        }
        if let Some(semester) = SEMESTER.captures(line) {
            record.semester = semester[1].to_string();
        }
    }
}

fn extract_subjects(text: &str, record: &mut EnrollmentRecord) {
    record.subjects.extend(
        SUBJECT_CODE
            .find_iter(text)
            .map(|code| SubjectEntry::placeholder(code.as_str())),
    );
}

pub fn parse_enrollment_text(text: &str) -> EnrollmentRecord {
    let mut record = EnrollmentRecord::default();
    for rule in RULES {
        rule.apply(text, &mut record);
        debug!(rule = rule.name, "extraction rule applied");
    }
    record
}

/// Runs OCR over the form image and parses the result. Any engine failure
/// aborts the whole extraction.
pub fn extract_enrollment_data(
    engine: &dyn OcrEngine,
    image_path: &Path,
) -> Result<EnrollmentRecord, OcrError> {
    let text = engine.image_to_text(image_path)?;
    debug!(chars = text.len(), "ocr text received");
    let record = parse_enrollment_text(&text);
    info!(
        registration = %record.registration_number,
        subjects = record.subjects.len(),
        "enrollment form parsed"
    );
    Ok(record)
}
