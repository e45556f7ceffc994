use std::{env, time::Duration};

use anyhow::Context;
use chrono::FixedOffset;

/// How staff status updates are checked against the order lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPolicy {
    /// Any status may be set; non-adjacent jumps are logged.
    Lenient,
    /// Only forward adjacency and cancellation from a non-terminal status.
    Strict,
}

impl std::str::FromStr for StatusPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(StatusPolicy::Lenient),
            "strict" => Ok(StatusPolicy::Strict),
            other => Err(anyhow::anyhow!("unknown STATUS_POLICY `{other}`")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub admin_username: String,
    pub admin_password: String,
    pub admin_name: String,
    /// Timezone the dashboard uses to decide what "today" means.
    pub store_offset: FixedOffset,
    pub status_policy: StatusPolicy,
    pub request_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET is not set")?;
        let admin_password = env::var("ADMIN_PASSWORD").context("ADMIN_PASSWORD is not set")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let admin_username = env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
        let admin_name = env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrador".to_string());

        let offset_minutes = env::var("STORE_UTC_OFFSET_MINUTES")
            .ok()
            .and_then(|m| m.parse::<i32>().ok())
            .unwrap_or(-180);
        let store_offset = FixedOffset::east_opt(offset_minutes * 60)
            .context("STORE_UTC_OFFSET_MINUTES is out of range")?;

        let status_policy = match env::var("STATUS_POLICY") {
            Ok(value) => value.parse()?,
            Err(_) => StatusPolicy::Lenient,
        };

        let request_timeout = env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(10));

        Ok(Self {
            host,
            port,
            jwt_secret,
            admin_username,
            admin_password,
            admin_name,
            store_offset,
            status_policy,
            request_timeout,
        })
    }
}
