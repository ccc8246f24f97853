use serde::Serialize;

/// Default low battery level (percent).
pub const DEFAULT_LOW_LEVEL: u8 = 20;
/// Default critical battery level (percent).
pub const DEFAULT_CRITICAL_LEVEL: u8 = 5;

/// Raw supply state as reported by the hardware / kernel driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SupplyState {
    Charging,
    #[default]
    Discharging,
    NotCharging,
    Full,
    /// Anything the driver reports that we don't recognise.
    Unrecognized,
}

impl SupplyState {
    /// Parse the contents of a sysfs `status` attribute.
    pub fn from_sysfs(raw: &str) -> Self {
        match raw.trim() {
            "Charging" => Self::Charging,
            "Discharging" => Self::Discharging,
            "Not charging" => Self::NotCharging,
            "Full" => Self::Full,
            _ => Self::Unrecognized,
        }
    }
}

/// A single raw snapshot of battery hardware state, read fresh each poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Telemetry {
    /// Charge level (0–100).
    pub percentage: u8,
    /// `true` while the battery is charging or reported full.
    pub charging: bool,
    /// `false` when the battery slot is empty.
    pub present: bool,
    pub state: SupplyState,
    /// Remaining time reported directly by the driver, in minutes.
    pub remaining_minutes: Option<u32>,
}

impl Telemetry {
    /// Build a snapshot from the three primary flags.
    pub fn new(percentage: u8, charging: bool, present: bool) -> Self {
        Self {
            percentage: percentage.min(100),
            charging,
            present,
            state: if charging {
                SupplyState::Charging
            } else {
                SupplyState::Discharging
            },
            remaining_minutes: None,
        }
    }

    /// Snapshot for an empty battery slot.
    pub fn missing() -> Self {
        Self::new(0, false, false)
    }

    pub fn with_state(mut self, state: SupplyState) -> Self {
        self.state = state;
        self.charging = matches!(state, SupplyState::Charging | SupplyState::Full);
        self
    }

    pub fn with_remaining(mut self, minutes: Option<u32>) -> Self {
        self.remaining_minutes = minutes;
        self
    }
}

/// Configured warning levels.  `critical <= low` always holds once the
/// configuration has been validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Levels {
    pub low: u8,
    pub critical: u8,
}

impl Default for Levels {
    fn default() -> Self {
        Self {
            low: DEFAULT_LOW_LEVEL,
            critical: DEFAULT_CRITICAL_LEVEL,
        }
    }
}

/// Discrete battery status derived from [`Telemetry`] each poll.
/// Serializes to the same identifier as [`Status::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Missing,
    Unknown,
    Charged,
    Charging,
    Discharging,
    NotCharging,
    /// Discharging at or below the low level.
    Low,
    /// Discharging at or below the critical level.
    Critical,
}

impl Status {
    pub const ALL: [Status; 8] = [
        Status::Missing,
        Status::Unknown,
        Status::Charged,
        Status::Charging,
        Status::Discharging,
        Status::NotCharging,
        Status::Low,
        Status::Critical,
    ];

    /// `true` for every status that belongs to a discharge episode.
    pub fn is_discharging(self) -> bool {
        matches!(
            self,
            Status::Discharging | Status::NotCharging | Status::Low | Status::Critical
        )
    }

    /// Fold the informational `Low` / `Critical` sub-states back into
    /// `Discharging`.
    pub fn base(self) -> Status {
        match self {
            Status::Low | Status::Critical => Status::Discharging,
            other => other,
        }
    }

    /// Stable lowercase identifier, e.g. `"not-charging"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Missing => "missing",
            Status::Unknown => "unknown",
            Status::Charged => "charged",
            Status::Charging => "charging",
            Status::Discharging => "discharging",
            Status::NotCharging => "not-charging",
            Status::Low => "low",
            Status::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a telemetry snapshot to a [`Status`].
pub fn classify(telemetry: &Telemetry, levels: &Levels) -> Status {
    if !telemetry.present {
        return Status::Missing;
    }
    if telemetry.state == SupplyState::Unrecognized {
        return Status::Unknown;
    }
    // Charge-limited or worn batteries report Full below 100%.
    if telemetry.state == SupplyState::Full {
        return Status::Charged;
    }
    if telemetry.charging {
        return if telemetry.percentage == 100 {
            Status::Charged
        } else {
            Status::Charging
        };
    }
    if telemetry.state == SupplyState::NotCharging {
        return Status::NotCharging;
    }

    match telemetry.percentage {
        p if p <= levels.critical => Status::Critical,
        p if p <= levels.low => Status::Low,
        _ => Status::Discharging,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_is_total_and_pure() {
        let levels = Levels::default();
        for pct in 0..=100u8 {
            for charging in [false, true] {
                for present in [false, true] {
                    let t = Telemetry::new(pct, charging, present);
                    let first = classify(&t, &levels);
                    assert!(Status::ALL.contains(&first));
                    assert_eq!(first, classify(&t, &levels));
                }
            }
        }
    }

    #[test]
    fn absent_battery_is_missing() {
        let t = Telemetry::new(80, true, false);
        assert_eq!(classify(&t, &Levels::default()), Status::Missing);
    }

    #[test]
    fn charging_flag_at_full_is_charged() {
        let levels = Levels::default();
        assert_eq!(classify(&Telemetry::new(100, true, true), &levels), Status::Charged);
        assert_eq!(classify(&Telemetry::new(99, true, true), &levels), Status::Charging);
    }

    #[test]
    fn full_below_hundred_percent_is_charged() {
        let levels = Levels::default();
        for pct in [80, 97, 99, 100] {
            let t = Telemetry::new(pct, true, true).with_state(SupplyState::Full);
            assert_eq!(classify(&t, &levels), Status::Charged, "Full at {pct}%");
        }
    }

    #[test]
    fn discharging_layers_low_and_critical() {
        let levels = Levels { low: 20, critical: 5 };
        assert_eq!(classify(&Telemetry::new(21, false, true), &levels), Status::Discharging);
        assert_eq!(classify(&Telemetry::new(20, false, true), &levels), Status::Low);
        assert_eq!(classify(&Telemetry::new(6, false, true), &levels), Status::Low);
        assert_eq!(classify(&Telemetry::new(5, false, true), &levels), Status::Critical);
        assert_eq!(classify(&Telemetry::new(0, false, true), &levels), Status::Critical);
    }

    #[test]
    fn unrecognized_state_is_unknown() {
        let t = Telemetry::new(50, false, true).with_state(SupplyState::Unrecognized);
        assert_eq!(classify(&t, &Levels::default()), Status::Unknown);
    }

    #[test]
    fn not_charging_is_part_of_the_episode() {
        let t = Telemetry::new(3, false, true).with_state(SupplyState::NotCharging);
        let status = classify(&t, &Levels::default());
        assert_eq!(status, Status::NotCharging);
        assert!(status.is_discharging());
        assert!(!Status::Charging.is_discharging());
        assert_eq!(Status::Critical.base(), Status::Discharging);
    }

    #[test]
    fn parse_sysfs_status() {
        assert_eq!(SupplyState::from_sysfs("Not charging\n"), SupplyState::NotCharging);
        assert_eq!(SupplyState::from_sysfs("Full"), SupplyState::Full);
        assert_eq!(SupplyState::from_sysfs("Bogus"), SupplyState::Unrecognized);
        assert!(Telemetry::new(100, false, true).with_state(SupplyState::Full).charging);
    }
}
