#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub kiosk_env: String,
    pub api_bind: String,
    pub jwt_secret: String,
    pub slack_signing_secret: String,
    pub slack_bot_token: String,
    pub slack_reminder_channel: Option<String>,
    pub reminder_interval_secs: u64,
}

impl Settings {
    pub fn from_env() -> Result<Self, std::env::VarError> {
        let database_url =
            std::env::var("DATABASE_URL").or_else(|_| std::env::var("KIOSK_DATABASE_URL"))?;
        let kiosk_env = std::env::var("KIOSK_ENV").unwrap_or_else(|_| "development".to_string());
        let api_bind =
            std::env::var("KIOSK_API_BIND").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        // Missing secrets fail startup rather than surfacing as opaque 500s
        // on the first authenticated request.
        let jwt_secret = std::env::var("JWT_SECRET")?;
        let slack_signing_secret = std::env::var("SLACK_SIGNING_SECRET")?;
        let slack_bot_token = std::env::var("SLACK_BOT_TOKEN")?;
        let slack_reminder_channel = std::env::var("SLACK_REMINDER_CHANNEL").ok();
        let reminder_interval_secs = std::env::var("KIOSK_REMINDER_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3600);

        Ok(Self {
            database_url,
            kiosk_env,
            api_bind,
            jwt_secret,
            slack_signing_secret,
            slack_bot_token,
            slack_reminder_channel,
            reminder_interval_secs,
        })
    }

    pub fn is_production(&self) -> bool {
        self.kiosk_env == "production"
    }
}
