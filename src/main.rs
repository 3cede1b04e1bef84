use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use attendance_scripts::models::{DeliveryOutcome, ErrorOutcome};
use attendance_scripts::{
    enrollment, report, AttendanceBot, DailySummary, EmailSender, SmtpConfig, TelegramConfig,
    TesseractCli,
};

#[derive(Parser)]
#[command(name = "attendance-scripts")]
#[command(about = "Reports, OCR and notifications for the attendance system", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render attendance analytics JSON into a PDF report
    Report {
        /// Report data as a JSON object
        data: Option<String>,
        /// Where to write the PDF
        output: Option<PathBuf>,
    },
    /// Extract enrollment data from a scanned form
    Ocr {
        image: Option<PathBuf>,
    },
    /// Send templated emails through the configured SMTP relay
    Email {
        #[command(subcommand)]
        command: EmailCommand,
    },
    /// Post templated messages to the configured Telegram chat
    Telegram {
        #[command(subcommand)]
        command: TelegramCommand,
    },
}

#[derive(Subcommand)]
enum EmailCommand {
    /// Absence alert for one student and subject
    Absence {
        #[arg(long)]
        to: String,
        #[arg(long)]
        student: String,
        #[arg(long)]
        subject_name: String,
        /// Defaults to today (dd/mm/YYYY)
        #[arg(long)]
        date: Option<String>,
    },
    /// Deliver a rendered PDF report
    Report {
        #[arg(long)]
        to: String,
        #[arg(long)]
        student: String,
        #[arg(long)]
        report: PathBuf,
    },
}

#[derive(Subcommand)]
enum TelegramCommand {
    /// Absence notification
    Absence {
        #[arg(long)]
        student: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        date: String,
    },
    /// Daily summary from a JSON object
    Summary { data: String },
    /// Connection test message
    Test,
}

fn emit<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

fn fail(message: impl ToString) -> anyhow::Result<ExitCode> {
    emit(&ErrorOutcome::new(message))?;
    Ok(ExitCode::FAILURE)
}

fn delivered(success: bool) -> anyhow::Result<ExitCode> {
    emit(&DeliveryOutcome { success })?;
    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // stdout is reserved for the JSON result.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report { data, output } => {
            let (Some(data), Some(output)) = (data, output) else {
                return fail("Missing arguments");
            };
            match report::run(&data, &output) {
                Ok(outcome) => {
                    emit(&outcome)?;
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => fail(e),
            }
        }
        Commands::Ocr { image } => {
            let Some(image) = image else {
                return fail("No image path provided");
            };
            let engine = TesseractCli::from_env();
            match enrollment::extract_enrollment_data(&engine, &image) {
                Ok(record) => {
                    emit(&record)?;
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => fail(e),
            }
        }
        Commands::Email { command } => {
            let config = match SmtpConfig::from_env() {
                Ok(config) => config,
                Err(e) => return fail(e),
            };
            let sender = match EmailSender::new(&config) {
                Ok(sender) => sender,
                Err(e) => return fail(e),
            };
            let sent = match command {
                EmailCommand::Absence {
                    to,
                    student,
                    subject_name,
                    date,
                } => {
                    let date = date
                        .unwrap_or_else(|| chrono::Local::now().format("%d/%m/%Y").to_string());
                    sender.send_absence_alert(&to, &student, &subject_name, &date)
                }
                EmailCommand::Report {
                    to,
                    student,
                    report,
                } => sender.send_attendance_report(&to, &student, &report),
            };
            delivered(sent)
        }
        Commands::Telegram { command } => {
            let config = match TelegramConfig::from_env() {
                Ok(config) => config,
                Err(e) => return fail(e),
            };
            let bot = AttendanceBot::new(config);
            let sent = match command {
                TelegramCommand::Absence {
                    student,
                    subject,
                    date,
                } => bot.send_absence_notification(&student, &subject, &date).await,
                TelegramCommand::Summary { data } => {
                    let summary: DailySummary = match serde_json::from_str(&data) {
                        Ok(summary) => summary,
                        Err(e) => return fail(e),
                    };
                    bot.send_daily_summary(&summary).await
                }
                TelegramCommand::Test => bot.send_test_message().await,
            };
            delivered(sent)
        }
    }
}
