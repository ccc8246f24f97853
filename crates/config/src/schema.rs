use batt_core::status::{Levels, DEFAULT_CRITICAL_LEVEL, DEFAULT_LOW_LEVEL};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Default poll interval in seconds.
pub const DEFAULT_UPDATE_INTERVAL: u64 = 5;

/// Root configuration structure parsed from `batticon.toml`.
///
/// Numeric fields are kept signed so out-of-range values survive parsing
/// and can be reported by [`TrayConfig::validate`] instead of failing the
/// whole file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrayConfig {
    /// Poll interval in seconds (> 0).
    pub update_interval: i64,
    /// Low battery level in percent (0 – 100).
    pub low_level: i64,
    /// Critical battery level in percent (0 – 100, ≤ `low_level`).
    pub critical_level: i64,
    /// Command to execute when the low level is reached.
    pub command_low_level: Option<String>,
    /// Command to execute when the critical level is reached.
    pub command_critical_level: Option<String>,
    /// Command to execute when the tray icon is activated.
    pub command_left_click: Option<String>,
    /// Verbose tracing.
    pub debug: bool,
    /// Don't show desktop notifications.
    pub hide_notification: bool,
    /// Battery name under `/sys/class/power_supply`, e.g. `"BAT1"`.
    /// `None` picks the first battery found.
    pub battery: Option<String>,
}

impl Default for TrayConfig {
    fn default() -> Self {
        Self {
            update_interval:        DEFAULT_UPDATE_INTERVAL as i64,
            low_level:              i64::from(DEFAULT_LOW_LEVEL),
            critical_level:         i64::from(DEFAULT_CRITICAL_LEVEL),
            command_low_level:      None,
            command_critical_level: None,
            command_left_click:     None,
            debug:                  false,
            hide_notification:      false,
            battery:                None,
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub update_interval:        Option<i64>,
    pub low_level:              Option<i64>,
    pub critical_level:         Option<i64>,
    pub command_low_level:      Option<String>,
    pub command_critical_level: Option<String>,
    pub command_left_click:     Option<String>,
    pub debug:                  bool,
    pub hide_notification:      bool,
    pub battery:                Option<String>,
}

/// A configuration value that was out of range and got reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigIssue {
    #[error("invalid update interval! It has been reset to default ({} seconds)", DEFAULT_UPDATE_INTERVAL)]
    InvalidUpdateInterval,

    #[error("invalid low level! It has been reset to default ({} percent)", DEFAULT_LOW_LEVEL)]
    InvalidLowLevel,

    #[error("invalid critical level! It has been reset to default ({} percent)", DEFAULT_CRITICAL_LEVEL)]
    InvalidCriticalLevel,

    #[error("critical level is higher than low level! They have been reset to default")]
    CriticalAboveLow,
}

/// Validated, ready-to-use settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub update_interval:        Duration,
    pub levels:                 Levels,
    pub command_low_level:      Option<String>,
    pub command_critical_level: Option<String>,
    pub command_left_click:     Option<String>,
    pub debug:                  bool,
    pub hide_notification:      bool,
    pub battery:                Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        TrayConfig::default().validate().0
    }
}

impl TrayConfig {
    /// Layer command-line overrides on top of the file values.
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(v) = overrides.update_interval {
            self.update_interval = v;
        }
        if let Some(v) = overrides.low_level {
            self.low_level = v;
        }
        if let Some(v) = overrides.critical_level {
            self.critical_level = v;
        }
        if let Some(v) = &overrides.command_low_level {
            self.command_low_level = Some(v.clone());
        }
        if let Some(v) = &overrides.command_critical_level {
            self.command_critical_level = Some(v.clone());
        }
        if let Some(v) = &overrides.command_left_click {
            self.command_left_click = Some(v.clone());
        }
        if let Some(v) = &overrides.battery {
            self.battery = Some(v.clone());
        }
        self.debug |= overrides.debug;
        self.hide_notification |= overrides.hide_notification;
    }

    /// Reset out-of-range values to their defaults.  Never fails; every
    /// reset is returned so the caller can warn about it.
    pub fn validate(self) -> (Settings, Vec<ConfigIssue>) {
        let mut issues = Vec::new();

        let interval = match u64::try_from(self.update_interval) {
            Ok(secs) if secs > 0 => secs,
            _ => {
                issues.push(ConfigIssue::InvalidUpdateInterval);
                DEFAULT_UPDATE_INTERVAL
            }
        };

        let mut low = percent(self.low_level).unwrap_or_else(|| {
            issues.push(ConfigIssue::InvalidLowLevel);
            DEFAULT_LOW_LEVEL
        });
        let mut critical = percent(self.critical_level).unwrap_or_else(|| {
            issues.push(ConfigIssue::InvalidCriticalLevel);
            DEFAULT_CRITICAL_LEVEL
        });

        if critical > low {
            issues.push(ConfigIssue::CriticalAboveLow);
            low = DEFAULT_LOW_LEVEL;
            critical = DEFAULT_CRITICAL_LEVEL;
        }

        let settings = Settings {
            update_interval:        Duration::from_secs(interval),
            levels:                 Levels { low, critical },
            command_low_level:      non_empty(self.command_low_level),
            command_critical_level: non_empty(self.command_critical_level),
            command_left_click:     non_empty(self.command_left_click),
            debug:                  self.debug,
            hide_notification:      self.hide_notification,
            battery:                non_empty(self.battery),
        };

        (settings, issues)
    }
}

fn percent(value: i64) -> Option<u8> {
    u8::try_from(value).ok().filter(|v| *v <= 100)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
