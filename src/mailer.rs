//! HTML mail with an optional PDF attachment over an authenticated STARTTLS
//! session.

use std::fmt::Display;
use std::path::Path;

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{error, info};

use crate::config::SmtpConfig;
use crate::error::MailError;

pub struct EmailSender<T = SmtpTransport> {
    from: String,
    transport: T,
}

impl EmailSender<SmtpTransport> {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let transport = SmtpTransport::starttls_relay(&config.host)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();
        Ok(Self::with_transport(&config.username, transport))
    }
}

impl<T> EmailSender<T>
where
    T: Transport,
    T::Error: Display,
{
    pub fn with_transport(from: &str, transport: T) -> Self {
        Self {
            from: from.to_string(),
            transport,
        }
    }

    /// Builds the message without sending it. The attachment is included only
    /// when `attachment` points at an existing file.
    pub fn build_message(
        &self,
        to: &str,
        subject: &str,
        html_body: &str,
        attachment: Option<&Path>,
    ) -> Result<Message, MailError> {
        let mut body = MultiPart::mixed().singlepart(SinglePart::html(html_body.to_string()));

        if let Some(path) = attachment.filter(|p| p.exists()) {
            let bytes = std::fs::read(path).map_err(|source| MailError::Attachment {
                path: path.to_path_buf(),
                source,
            })?;
            let filename = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let content_type = ContentType::parse("application/pdf")
                .map_err(|e| MailError::ContentType(e.to_string()))?;
            body = body.singlepart(Attachment::new(filename).body(bytes, content_type));
        }

        Ok(Message::builder()
            .from(parse_mailbox(&self.from)?)
            .to(parse_mailbox(to)?)
            .subject(subject)
            .multipart(body)?)
    }

    fn try_send(
        &self,
        to: &str,
        subject: &str,
        html_body: &str,
        attachment: Option<&Path>,
    ) -> Result<(), MailError> {
        let message = self.build_message(to, subject, html_body, attachment)?;
        self.transport
            .send(&message)
            .map_err(|e| MailError::Transport(e.to_string()))?;
        Ok(())
    }

    /// Sends one message. Any failure is logged and reported as `false`.
    pub fn send_email(
        &self,
        to: &str,
        subject: &str,
        html_body: &str,
        attachment: Option<&Path>,
    ) -> bool {
        match self.try_send(to, subject, html_body, attachment) {
            Ok(()) => {
                info!(to, subject, "email sent");
                true
            }
            Err(e) => {
                error!("Error sending email: {e}");
                false
            }
        }
    }

    pub fn send_attendance_report(&self, to: &str, student_name: &str, report_path: &Path) -> bool {
        let (subject, body) = attendance_report_email(student_name);
        self.send_email(to, &subject, &body, Some(report_path))
    }

    pub fn send_absence_alert(
        &self,
        to: &str,
        student_name: &str,
        subject_name: &str,
        date: &str,
    ) -> bool {
        let (subject, body) = absence_alert_email(student_name, subject_name, date);
        self.send_email(to, &subject, &body, None)
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .parse()
        .map_err(|e: lettre::address::AddressError| MailError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })
}

/// Subject line and HTML body for a report delivery.
pub fn attendance_report_email(student_name: &str) -> (String, String) {
    let subject = format!("Reporte de Asistencia - {student_name}");
    let body = format!(
        r#"
        <html>
        <body>
            <h2>Reporte de Asistencia</h2>
            <p>Estimado/a {student_name},</p>
            <p>Adjunto encontrarás tu reporte de asistencia actualizado.</p>
            <p>Si tienes alguna pregunta, no dudes en contactarnos.</p>
            <br>
            <p>Saludos cordiales,<br>
            Sistema de Control de Asistencia</p>
        </body>
        </html>
        "#
    );
    (subject, body)
}

/// Subject line and HTML body for an absence alert.
pub fn absence_alert_email(student_name: &str, subject_name: &str, date: &str) -> (String, String) {
    let subject = format!("Alerta de Ausencia - {student_name}");
    let body = format!(
        r#"
        <html>
        <body>
            <h2>Notificación de Ausencia</h2>
            <p>Estimado/a,</p>
            <p>Le informamos que el estudiante <strong>{student_name}</strong> ha sido marcado como ausente en la materia <strong>{subject_name}</strong> el día <strong>{date}</strong>.</p>
            <p>Si esta ausencia fue justificada, por favor contacte con la administración.</p>
            <br>
            <p>Saludos cordiales,<br>
            Sistema de Control de Asistencia</p>
        </body>
        </html>
        "#
    );
    (subject, body)
}
