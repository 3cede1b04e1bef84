use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{debug, info};

use crate::error::ReportError;
use crate::models::{display_value, AttendanceReport, RenderOutcome};
use crate::pdf::{self, Canvas, TableStyle, TextStyle};

pub const RANKING_LIMIT: usize = 10;

const BRAND_BLUE: u32 = 0x1e40af;
const BEIGE: u32 = 0xf5f5dc;

pub fn parse_report(data: &str) -> Result<AttendanceReport, ReportError> {
    Ok(serde_json::from_str(data)?)
}

pub fn summary_rows(report: &AttendanceReport) -> Vec<Vec<String>> {
    vec![
        vec!["Métrica".to_string(), "Valor".to_string()],
        vec!["Total de Registros".to_string(), display_value(&report.total)],
        vec!["Presentes".to_string(), display_value(&report.present)],
        vec!["Ausentes".to_string(), display_value(&report.absent)],
        vec!["Tardanzas".to_string(), display_value(&report.late)],
        vec![
            "Tasa de Asistencia".to_string(),
            format!("{}%", display_value(&report.attendance_rate)),
        ],
    ]
}

/// Header plus at most [`RANKING_LIMIT`] students, in input order.
/// `None` when there is nothing to rank.
pub fn ranking_rows(report: &AttendanceReport) -> Option<Vec<Vec<String>>> {
    let rankings = report.rankings.as_ref().filter(|r| !r.is_empty())?;

    let mut rows = vec![vec![
        "Rank".to_string(),
        "Nombre".to_string(),
        "Registro".to_string(),
        "Tasa de Asistencia".to_string(),
    ]];
    for (index, student) in rankings.iter().take(RANKING_LIMIT).enumerate() {
        rows.push(vec![
            (index + 1).to_string(),
            student.name.clone().unwrap_or_else(|| "N/A".to_string()),
            student
                .registration_number
                .clone()
                .unwrap_or_else(|| "N/A".to_string()),
            format!("{:.1}%", student.rate),
        ]);
    }
    Some(rows)
}

fn table_style(header_size: f32) -> TableStyle {
    TableStyle {
        header_fill: pdf::hex(BRAND_BLUE),
        header_text: pdf::whitesmoke(),
        header_size,
        body_fill: pdf::hex(BEIGE),
        body_size: 10.0,
        header_height: 9.0,
        row_height: 6.5,
        grid_thickness: 1.0,
    }
}

/// Lays out the whole report in memory and returns the PDF bytes.
pub fn render_report(
    report: &AttendanceReport,
    generated_at: DateTime<Local>,
) -> Result<Vec<u8>, ReportError> {
    let mut canvas = Canvas::letter("Reporte de Asistencia")?;

    canvas.paragraph(
        "Reporte de Asistencia",
        &TextStyle {
            color: pdf::hex(BRAND_BLUE),
            centred: true,
            ..TextStyle::heading(24.0)
        },
    );
    canvas.space(10.0);
    canvas.paragraph(
        &format!("Generado el: {}", generated_at.format("%d/%m/%Y %H:%M")),
        &TextStyle::body(10.0),
    );
    canvas.space(pdf::inch(0.5));

    canvas.paragraph("Resumen Estadístico", &TextStyle::heading(14.0));
    canvas.space(pdf::inch(0.2));
    canvas.table(
        &summary_rows(report),
        &[pdf::inch(3.0), pdf::inch(2.0)],
        &table_style(12.0),
    );
    canvas.space(pdf::inch(0.5));

    if let Some(rows) = ranking_rows(report) {
        debug!(students = rows.len() - 1, "rendering ranking table");
        canvas.paragraph("Top 10 Estudiantes", &TextStyle::heading(14.0));
        canvas.space(pdf::inch(0.2));
        canvas.table(
            &rows,
            &[
                pdf::inch(0.7),
                pdf::inch(2.5),
                pdf::inch(1.5),
                pdf::inch(1.5),
            ],
            &table_style(10.0),
        );
    }

    canvas.into_bytes()
}

/// Renders `report` and writes it to `output_path`. Nothing is written unless
/// the document rendered completely.
pub fn generate_attendance_report(
    report: &AttendanceReport,
    output_path: &Path,
) -> Result<PathBuf, ReportError> {
    let bytes = render_report(report, Local::now())?;
    std::fs::write(output_path, bytes).map_err(|source| ReportError::Write {
        path: output_path.to_path_buf(),
        source,
    })?;
    info!(path = %output_path.display(), "attendance report written");
    Ok(output_path.to_path_buf())
}

/// Entry point behind the `report` command: raw JSON in, outcome out.
pub fn run(data: &str, output_path: &Path) -> Result<RenderOutcome, ReportError> {
    let report = parse_report(data)?;
    let path = generate_attendance_report(&report, output_path)?;
    Ok(RenderOutcome {
        success: true,
        path: path.display().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StudentRanking;

    fn student(index: usize) -> StudentRanking {
        StudentRanking {
            name: Some(format!("Student {index}")),
            registration_number: Some(format!("2024{index:05}")),
            rate: 100.0 - index as f64,
        }
    }

    fn sample_report(students: usize) -> AttendanceReport {
        AttendanceReport {
            total: 120.into(),
            present: 100.into(),
            absent: 12.into(),
            late: 8.into(),
            attendance_rate: 83.3.into(),
            rankings: Some((0..students).map(student).collect()),
        }
    }

    #[test]
    fn summary_rows_show_counts_and_rate() {
        let rows = summary_rows(&sample_report(0));
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[1], vec!["Total de Registros", "120"]);
        assert_eq!(rows[4], vec!["Tardanzas", "8"]);
        assert_eq!(rows[5], vec!["Tasa de Asistencia", "83.3%"]);
    }

    #[test]
    fn rankings_truncate_to_ten_in_input_order() {
        let rows = ranking_rows(&sample_report(14)).unwrap();
        assert_eq!(rows.len(), 1 + RANKING_LIMIT);
        for (position, row) in rows.iter().skip(1).enumerate() {
            assert_eq!(row[0], (position + 1).to_string());
            assert_eq!(row[1], format!("Student {position}"));
        }
        assert!(!rows.iter().any(|row| row[1] == "Student 10"));
    }

    #[test]
    fn missing_ranking_fields_fall_back() {
        let report = AttendanceReport {
            rankings: Some(vec![StudentRanking::default()]),
            ..AttendanceReport::default()
        };
        let rows = ranking_rows(&report).unwrap();
        assert_eq!(rows[1], vec!["1", "N/A", "N/A", "0.0%"]);
    }

    #[test]
    fn empty_rankings_skip_the_table() {
        assert!(ranking_rows(&sample_report(0)).is_none());
        assert!(ranking_rows(&AttendanceReport::default()).is_none());
    }

    #[test]
    fn partial_json_defaults_to_zero() {
        let report = parse_report(r#"{"present": 4}"#).unwrap();
        let rows = summary_rows(&report);
        assert_eq!(rows[1][1], "0");
        assert_eq!(rows[2][1], "4");
        assert_eq!(rows[5][1], "0%");
    }

    #[test]
    fn string_and_float_counts_print_verbatim() {
        let report = parse_report(
            r#"{"total": 40.0, "present": "35", "absent": null, "late": 2, "attendanceRate": "87.5"}"#,
        )
        .unwrap();
        let rows = summary_rows(&report);
        assert_eq!(rows[1][1], "40.0");
        assert_eq!(rows[2][1], "35");
        assert_eq!(rows[3][1], "0");
        assert_eq!(rows[5][1], "87.5%");
    }

    #[test]
    fn run_writes_pdf_and_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("report.pdf");
        let data = r#"{"total": 3, "present": 2, "absent": 1, "late": 0, "attendanceRate": 66.7,
            "rankings": [{"name": "Ana", "registrationNumber": "123456789", "rate": 100}]}"#;

        let outcome = run(data, &out).unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.path, out.display().to_string());
        let bytes = std::fs::read(&out).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn malformed_json_never_creates_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("report.pdf");
        let err = run("{not json", &out).unwrap_err();
        assert!(matches!(err, ReportError::InvalidData(_)));
        assert!(!out.exists());
    }
}
