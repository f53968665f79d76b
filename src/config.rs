//! Runtime configuration loaded from environment variables.

use std::time::Duration;

use uuid::Uuid;

const DEFAULT_REPLY_DELAY_MS: u64 = 600;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// HMAC secret for signing and verifying access tokens.
    pub jwt_secret: String,
    /// Artificial "thinking" pause before a chat reply is delivered.
    pub reply_delay: Duration,
}

impl AppConfig {
    /// Load configuration from the environment.
    ///
    /// | Env Var                   | Default                         |
    /// |---------------------------|---------------------------------|
    /// | `STUDYHUB_JWT_SECRET`     | random per-process secret       |
    /// | `STUDYHUB_REPLY_DELAY_MS` | `600`                           |
    ///
    /// Without an explicit secret, tokens stop verifying after a restart.
    pub fn from_env() -> Self {
        let jwt_secret = std::env::var("STUDYHUB_JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!(
                "STUDYHUB_JWT_SECRET not set; using a random secret, \
                 sessions will not survive a restart"
            );
            Uuid::new_v4().to_string()
        });

        let reply_delay = std::env::var("STUDYHUB_REPLY_DELAY_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(DEFAULT_REPLY_DELAY_MS));

        Self {
            jwt_secret,
            reply_delay,
        }
    }

    /// Fixed secret and no reply delay, for tests.
    pub fn for_tests() -> Self {
        Self {
            jwt_secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            reply_delay: Duration::ZERO,
        }
    }
}
