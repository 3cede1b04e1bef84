use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Attendance analytics handed to the report renderer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceReport {
    #[serde(default = "zero")]
    pub total: Value,
    #[serde(default = "zero")]
    pub present: Value,
    #[serde(default = "zero")]
    pub absent: Value,
    #[serde(default = "zero")]
    pub late: Value,
    #[serde(default = "zero")]
    pub attendance_rate: Value,
    #[serde(default)]
    pub rankings: Option<Vec<StudentRanking>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRanking {
    pub name: Option<String>,
    pub registration_number: Option<String>,
    #[serde(default)]
    pub rate: f64,
}

impl Default for AttendanceReport {
    fn default() -> Self {
        Self {
            total: zero(),
            present: zero(),
            absent: zero(),
            late: zero(),
            attendance_rate: zero(),
            rankings: None,
        }
    }
}

fn zero() -> Value {
    Value::from(0)
}

/// Renders a loosely typed JSON field the way it arrived: strings without
/// quotes, numbers as written, `null` as the zero default.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => "0".to_string(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRecord {
    pub registration_number: String,
    pub student_name: String,
    pub career: String,
    pub semester: String,
    pub location: String,
    pub subjects: Vec<SubjectEntry>,
    pub schedule: Vec<ScheduleEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectEntry {
    pub code: String,
    pub name: String,
    pub classroom: String,
}

impl SubjectEntry {
    /// Name and classroom stay unresolved; only the code comes from the form.
    pub fn placeholder(code: &str) -> Self {
        Self {
            code: code.to_string(),
            name: format!("Materia {code}"),
            classroom: "TBD".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleEntry {
    pub day: String,
    pub time: String,
    pub subject: String,
    pub classroom: String,
}

/// Daily attendance totals pushed to the chat.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DailySummary {
    pub date: String,
    pub present: Value,
    pub absent: Value,
    pub late: Value,
    pub excused: Value,
    pub attendance_rate: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderOutcome {
    pub success: bool,
    pub path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeliveryOutcome {
    pub success: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorOutcome {
    pub error: String,
}

impl ErrorOutcome {
    pub fn new(error: impl ToString) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_fields_default_when_missing() {
        let report: AttendanceReport = serde_json::from_str("{}").unwrap();
        assert_eq!(display_value(&report.total), "0");
        assert_eq!(display_value(&report.late), "0");
        assert_eq!(display_value(&report.attendance_rate), "0");
        assert!(report.rankings.is_none());
    }

    #[test]
    fn loose_values_print_as_received() {
        assert_eq!(display_value(&serde_json::json!("87.5")), "87.5");
        assert_eq!(display_value(&serde_json::json!(87.5)), "87.5");
        assert_eq!(display_value(&serde_json::json!(40.0)), "40.0");
        assert_eq!(display_value(&serde_json::json!(12)), "12");
        assert_eq!(display_value(&Value::Null), "0");
    }

    #[test]
    fn ranking_uses_camel_case_keys() {
        let ranking: StudentRanking = serde_json::from_str(
            r#"{"name": "Avery Lee", "registrationNumber": "202400123", "rate": 91.25}"#,
        )
        .unwrap();
        assert_eq!(ranking.registration_number.as_deref(), Some("202400123"));
        assert_eq!(ranking.rate, 91.25);
    }

    #[test]
    fn enrollment_record_serializes_camel_case_with_empty_defaults() {
        let value = serde_json::to_value(EnrollmentRecord::default()).unwrap();
        assert_eq!(value["registrationNumber"], "");
        assert_eq!(value["studentName"], "");
        assert_eq!(value["subjects"], serde_json::json!([]));
        assert_eq!(value["schedule"], serde_json::json!([]));
    }

    #[test]
    fn placeholder_subject_keeps_code() {
        let entry = SubjectEntry::placeholder("MAT101");
        assert_eq!(entry.name, "Materia MAT101");
        assert_eq!(entry.classroom, "TBD");
    }
}
