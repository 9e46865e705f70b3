use chrono::Utc;
use log::{error, info};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_AUCTION_DURATION: Duration = Duration::from_secs(24 * 60 * 60);
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// How long a new auction stays Active.
    pub auction_duration: Duration,
    pub sweep_interval: Duration,
    pub request_timeout: Duration,
    pub port: u16,
    pub data_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            auction_duration: DEFAULT_AUCTION_DURATION,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            port: DEFAULT_PORT,
            data_file: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from any key lookup. Bad values are logged and
    /// replaced by their default; nothing here fails.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let settings = Settings {
            auction_duration: duration_or_default(&lookup, "AUCTION_DURATION", DEFAULT_AUCTION_DURATION),
            sweep_interval: duration_or_default(&lookup, "AUCTION_SWEEP_INTERVAL", DEFAULT_SWEEP_INTERVAL),
            request_timeout: duration_or_default(&lookup, "AUCTION_REQUEST_TIMEOUT", DEFAULT_REQUEST_TIMEOUT),
            port: port_or_default(&lookup),
            data_file: lookup("AUCTION_DATA_FILE")
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
        };
        info!(
            "AUCTION_DURATION: {}, AUCTION_SWEEP_INTERVAL: {}",
            humantime::format_duration(settings.auction_duration),
            humantime::format_duration(settings.sweep_interval)
        );
        settings
    }

    pub fn auction_duration_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.auction_duration)
            .unwrap_or_else(|_| chrono::Duration::hours(24))
    }
}

fn duration_or_default<F>(lookup: &F, key: &str, default: Duration) -> Duration
where
    F: Fn(&str) -> Option<String>,
{
    let text = match lookup(key) {
        Some(text) if !text.trim().is_empty() => text,
        _ => return default,
    };
    match humantime::parse_duration(text.trim()) {
        Ok(duration) if duration.is_zero() => {
            error!("Invalid {} value {:?}: must be positive, using default {}", key, text, humantime::format_duration(default));
            default
        },
        Ok(duration) if !fits_calendar(duration) => {
            error!("Invalid {} value {:?}: out of range, using default {}", key, text, humantime::format_duration(default));
            default
        },
        Ok(duration) => duration,
        Err(err) => {
            error!("Invalid {} format {:?}: {}, using default {}", key, text, err, humantime::format_duration(default));
            default
        }
    }
}

/// Whether `duration` can still be added to the current time without leaving
/// the representable date range.
fn fits_calendar(duration: Duration) -> bool {
    chrono::Duration::from_std(duration)
        .ok()
        .and_then(|delta| Utc::now().checked_add_signed(delta))
        .is_some()
}

fn port_or_default<F>(lookup: &F) -> u16
where
    F: Fn(&str) -> Option<String>,
{
    match lookup("PORT") {
        Some(text) => text.trim().parse::<u16>().unwrap_or_else(|_| {
            error!("Invalid PORT value {:?}, using default {}", text, DEFAULT_PORT);
            DEFAULT_PORT
        }),
        None => DEFAULT_PORT,
    }
}
