use crate::error::ConfigError;

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_TELEGRAM_API: &str = "https://api.telegram.org";

/// Relay settings for the mailer.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl SmtpConfig {
    /// Reads `SMTP_HOST`, `SMTP_PORT`, `SMTP_USER` and `SMTP_PASSWORD`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string());
        let port = match lookup("SMTP_PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "SMTP_PORT",
                value,
            })?,
            None => DEFAULT_SMTP_PORT,
        };

        let username = lookup("SMTP_USER").filter(|v| !v.is_empty());
        let password = lookup("SMTP_PASSWORD").filter(|v| !v.is_empty());
        match (username, password) {
            (Some(username), Some(password)) => Ok(Self {
                host,
                port,
                username,
                password,
            }),
            _ => Err(ConfigError::Missing("SMTP_USER or SMTP_PASSWORD")),
        }
    }
}

/// Bot credentials and target chat for the notifier.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    pub api_base: String,
}

impl TelegramConfig {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            api_base: DEFAULT_TELEGRAM_API.to_string(),
        }
    }

    /// Reads `TELEGRAM_BOT_TOKEN`, `TELEGRAM_CHAT_ID` and the optional
    /// `TELEGRAM_API_BASE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bot_token = lookup("TELEGRAM_BOT_TOKEN").filter(|v| !v.is_empty());
        let chat_id = lookup("TELEGRAM_CHAT_ID").filter(|v| !v.is_empty());
        let (Some(bot_token), Some(chat_id)) = (bot_token, chat_id) else {
            return Err(ConfigError::Missing("TELEGRAM_BOT_TOKEN or TELEGRAM_CHAT_ID"));
        };

        let mut config = Self::new(bot_token, chat_id);
        if let Some(base) = lookup("TELEGRAM_API_BASE").filter(|v| !v.is_empty()) {
            config.api_base = base.trim_end_matches('/').to_string();
        }
        Ok(config)
    }

    pub fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.bot_token)
    }
}
