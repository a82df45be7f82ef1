use std::{env, fmt::Display, str::FromStr, time::Duration};

use tracing::{info, warn};

use crate::api::CsrfToken;

/// Runtime configuration, built once per page load.
#[derive(Debug, Clone)]
pub struct PosConfig {
    /// Base URL of the REST backend, e.g. `http://localhost:8080/api`.
    pub base_url: String,
    /// Endpoint of the live update socket, e.g. `ws://localhost:8080/ws`.
    pub socket_url: String,
    /// Anti-forgery pair supplied by the hosting page, when it has one.
    pub csrf: Option<CsrfToken>,
    /// Fixed delay between reconnection attempts.
    pub reconnect_delay: Duration,
    /// Failed connection attempts tolerated before giving up for the page
    /// lifetime.
    pub max_reconnect_attempts: u32,
    /// Interval of the payment-status poll.
    pub payment_poll_interval: Duration,
    /// Window within which refresh triggers are coalesced.
    pub refresh_debounce: Duration,
}

impl Default for PosConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            socket_url: "ws://localhost:8080/ws".to_string(),
            csrf: None,
            reconnect_delay: Duration::from_secs(3),
            max_reconnect_attempts: 5,
            payment_poll_interval: Duration::from_secs(10),
            refresh_debounce: Duration::from_millis(250),
        }
    }
}

impl PosConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: try_load("POS_BASE_URL", &defaults.base_url),
            socket_url: try_load("POS_SOCKET_URL", &defaults.socket_url),
            csrf: load_csrf(),
            reconnect_delay: Duration::from_secs(try_load("POS_RECONNECT_DELAY_SECS", "3")),
            max_reconnect_attempts: try_load("POS_MAX_RECONNECT_ATTEMPTS", "5"),
            payment_poll_interval: Duration::from_secs(try_load("POS_PAYMENT_POLL_SECS", "10")),
            refresh_debounce: Duration::from_millis(try_load("POS_REFRESH_DEBOUNCE_MS", "250")),
        }
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    let raw = match env::var(key) {
        Ok(value) => value,
        Err(_) => {
            info!("{key} not set, using default: {default}");
            default.to_string()
        }
    };

    match raw.parse() {
        Ok(value) => value,
        Err(e) => {
            warn!("Invalid {key} value ({e}), using default: {default}");
            default
                .parse()
                .unwrap_or_else(|e| panic!("default for {key} must parse: {e}"))
        }
    }
}

fn load_csrf() -> Option<CsrfToken> {
    let header = env::var("POS_CSRF_HEADER").ok()?;
    let token = env::var("POS_CSRF_TOKEN").ok()?;
    Some(CsrfToken { header, token })
}
