use std::path::PathBuf;
use std::time::Duration;
use clap::Parser;
use url::Url;
use crate::domain::PaymentPlan;
use crate::enrollment::CheckoutBranding;
use super::SystemError;

/// Enroll in a course from the terminal.
///
/// The terminal doubles as the checkout host: after the order is created,
/// paste the widget's success JSON, type `fail: <reason>`, or press enter
/// to dismiss.
#[derive(Debug, Clone, Parser)]
#[command(name = "enroll", version)]
pub struct AppConfig {
    /// Backend base URL, e.g. https://api.example.com/api
    #[arg(long, env = "ENROLL_API_URL")]
    pub api_url: Url,

    /// Where the signed-in session is kept between runs.
    #[arg(long, env = "ENROLL_SESSION_FILE", default_value = ".enroll/session.json")]
    pub session_file: PathBuf,

    #[arg(long, env = "ENROLL_HTTP_TIMEOUT_SECS", default_value_t = 30)]
    pub http_timeout_secs: u64,

    #[arg(long, env = "ENROLL_MERCHANT_NAME", default_value = "Course Academy")]
    pub merchant_name: String,

    #[arg(long, env = "ENROLL_THEME_COLOR", default_value = "#3399cc")]
    pub theme_color: String,

    /// Emit logs as JSON lines.
    #[arg(long, env = "ENROLL_LOG_JSON")]
    pub log_json: bool,

    /// Sign in with these credentials instead of the stored session.
    #[arg(long, requires = "password")]
    pub email: Option<String>,

    #[arg(long, env = "ENROLL_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[arg(long)]
    pub course_id: String,

    /// `full` or `installment`
    #[arg(long, default_value = "full")]
    pub plan: PaymentPlan,

    /// Profile fields, needed only when the profile is incomplete.
    #[arg(long)]
    pub full_name: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
}

impl AppConfig {
    /// Checks what clap cannot express.
    pub fn validate(&self) -> Result<(), SystemError> {
        if !matches!(self.api_url.scheme(), "http" | "https") {
            return Err(SystemError::Config(format!("api url must be http or https, got {}", self.api_url)));
        }
        if self.course_id.trim().is_empty() {
            return Err(SystemError::Config("course id is blank".to_string()));
        }
        if self.http_timeout_secs == 0 {
            return Err(SystemError::Config("http timeout must be at least one second".to_string()));
        }
        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn branding(&self) -> CheckoutBranding {
        CheckoutBranding {
            merchant_name: self.merchant_name.clone(),
            theme_color: self.theme_color.clone(),
        }
    }
}
