//! Telegram notifications for absences and daily summaries.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::config::TelegramConfig;
use crate::error::NotifyError;
use crate::models::{display_value, DailySummary};

pub const TEST_MESSAGE: &str = "✅ Prueba de conexión exitosa!\n\nEl sistema de notificaciones de AttendanceHub está funcionando correctamente.";

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    description: Option<String>,
}

pub fn format_absence_notification(student_name: &str, subject: &str, date: &str) -> String {
    format!(
        "
🚨 *Notificación de Ausencia*

👤 Estudiante: {student_name}
📚 Materia: {subject}
📅 Fecha: {date}

El estudiante ha sido marcado como ausente.
        "
    )
}

pub fn format_daily_summary(summary: &DailySummary) -> String {
    format!(
        "
📊 *Resumen Diario de Asistencia*

📅 Fecha: {}

✅ Presentes: {}
❌ Ausentes: {}
⏰ Tardanzas: {}
📝 Justificados: {}

📈 Tasa de asistencia: {}%
        ",
        summary.date,
        display_value(&summary.present),
        display_value(&summary.absent),
        display_value(&summary.late),
        display_value(&summary.excused),
        display_value(&summary.attendance_rate)
    )
}

pub struct AttendanceBot {
    client: reqwest::Client,
    config: TelegramConfig,
}

impl AttendanceBot {
    pub fn new(config: TelegramConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn post(&self, text: &str) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(self.config.send_message_url())
            .json(&SendMessage {
                chat_id: &self.config.chat_id,
                text,
                parse_mode: "Markdown",
            })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let description = response
            .json::<ApiResponse>()
            .await
            .ok()
            .and_then(|body| body.description)
            .unwrap_or_else(|| "Failed to send message".to_string());
        Err(NotifyError::Api {
            status: status.as_u16(),
            description,
        })
    }

    /// Posts `text` to the configured chat; failures are logged and turned
    /// into `false`.
    pub async fn send_message(&self, text: &str) -> bool {
        match self.post(text).await {
            Ok(()) => {
                info!(chat_id = %self.config.chat_id, "telegram message sent");
                true
            }
            Err(e) => {
                error!("Error sending message: {e}");
                false
            }
        }
    }

    pub async fn send_absence_notification(
        &self,
        student_name: &str,
        subject: &str,
        date: &str,
    ) -> bool {
        let message = format_absence_notification(student_name, subject, date);
        self.send_message(&message).await
    }

    pub async fn send_daily_summary(&self, summary: &DailySummary) -> bool {
        let message = format_daily_summary(summary);
        self.send_message(&message).await
    }

    pub async fn send_test_message(&self) -> bool {
        self.send_message(TEST_MESSAGE).await
    }
}
