// Real-time polling state
use chrono::{DateTime, Utc};

pub const DEFAULT_INTERVAL_SECS: u64 = 30;
/// One day; longer periods are rejected
pub const MAX_INTERVAL_SECS: u64 = 86_400;

pub fn is_valid_interval(secs: u64) -> bool {
    (1..=MAX_INTERVAL_SECS).contains(&secs)
}

#[derive(Debug, Clone, PartialEq)]
pub struct PollingState {
    pub enabled: bool,
    pub interval_secs: u64,
    pub last_update: Option<DateTime<Utc>>,
    pub next_update: Option<DateTime<Utc>>,
}

impl Default for PollingState {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: DEFAULT_INTERVAL_SECS,
            last_update: None,
            next_update: None,
        }
    }
}

impl PollingState {
    pub fn new(enabled: bool, interval_secs: u64) -> Self {
        Self {
            enabled,
            interval_secs,
            ..Default::default()
        }
    }

    /// Whole seconds until the next scheduled fetch, never negative
    pub fn seconds_until_next(&self, now: DateTime<Utc>) -> Option<u64> {
        self.next_update
            .map(|next| (next - now).num_seconds().max(0) as u64)
    }
}

/// Human label for an interval, as shown in the selector
pub fn interval_label(secs: u64) -> String {
    match secs {
        60 => "1 minuto".to_string(),
        s if s > 60 && s % 60 == 0 => format!("{} minutos", s / 60),
        s => format!("{} segundos", s),
    }
}
