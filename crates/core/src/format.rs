//! Human-readable strings for the tooltip and notifications.
//!
//! All per-status behaviour lives in a single table, [`STATUS_TABLE`],
//! indexed through [`entry`].

use crate::{
    port::{Timeout, Urgency},
    status::Status,
};

/// Formatting and notification behaviour for one [`Status`].
#[derive(Debug, Clone, Copy)]
pub struct StatusEntry {
    pub status:  Status,
    pub message: fn(u8) -> String,
    pub timeout: Timeout,
    pub urgency: Urgency,
}

pub static STATUS_TABLE: [StatusEntry; 8] = [
    StatusEntry {
        status:  Status::Missing,
        message: |_| "Battery is missing!".to_string(),
        timeout: Timeout::Never,
        urgency: Urgency::Normal,
    },
    StatusEntry {
        status:  Status::Unknown,
        message: |_| "Battery status is unknown!".to_string(),
        timeout: Timeout::Default,
        urgency: Urgency::Normal,
    },
    StatusEntry {
        status:  Status::Charged,
        message: |_| "Battery is charged!".to_string(),
        timeout: Timeout::Default,
        urgency: Urgency::Normal,
    },
    StatusEntry {
        status:  Status::Charging,
        message: |p| format!("Battery is charging ({p}%)"),
        timeout: Timeout::Default,
        urgency: Urgency::Normal,
    },
    StatusEntry {
        status:  Status::Discharging,
        message: |p| format!("Battery is discharging ({p}% remaining)"),
        timeout: Timeout::Default,
        urgency: Urgency::Normal,
    },
    StatusEntry {
        status:  Status::NotCharging,
        message: |p| format!("Battery is not charging ({p}% remaining)"),
        timeout: Timeout::Default,
        urgency: Urgency::Normal,
    },
    StatusEntry {
        status:  Status::Low,
        message: |p| format!("Battery level is low! ({p}% remaining)"),
        timeout: Timeout::Never,
        urgency: Urgency::Normal,
    },
    StatusEntry {
        status:  Status::Critical,
        message: |p| format!("Battery level is critical! ({p}% remaining)"),
        timeout: Timeout::Never,
        urgency: Urgency::Critical,
    },
];

/// Look up the table entry for `status`.
pub fn entry(status: Status) -> &'static StatusEntry {
    // Table order matches the declaration order of `Status`.
    &STATUS_TABLE[status as usize]
}

/// Percentage shown for `status`: unknown/missing batteries read 0%,
/// a charged one 100%.
pub fn display_percentage(status: Status, percentage: u8) -> u8 {
    match status {
        Status::Missing | Status::Unknown => 0,
        Status::Charged => 100,
        _ => percentage.min(100),
    }
}

/// Status line, e.g. `"Battery is charging (42%)"`.
pub fn battery_string(status: Status, percentage: u8) -> String {
    (entry(status).message)(percentage)
}

/// Split a minute count into whole hours and leftover minutes.
pub fn hours_minutes(minutes: u32) -> (u32, u32) {
    (minutes / 60, minutes % 60)
}

/// `"1 hour, 5 minutes remaining"`, `"12 minutes remaining"`, …
pub fn time_string(minutes: u32) -> String {
    let (hours, minutes) = hours_minutes(minutes);
    let minutes_str = plural(minutes, "minute");

    if hours > 0 {
        format!("{}, {minutes_str} remaining", plural(hours, "hour"))
    } else {
        format!("{minutes_str} remaining")
    }
}

fn plural(n: u32, unit: &str) -> String {
    if n == 1 {
        format!("{n} {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

/// Status line followed by the time line when an estimate exists.
pub fn tooltip(battery: &str, minutes: Option<u32>) -> String {
    match minutes {
        Some(m) => format!("{battery}\n{}", time_string(m)),
        None => battery.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_every_status_in_order() {
        for status in Status::ALL {
            assert_eq!(entry(status).status, status);
        }
    }

    #[test]
    fn critical_entry_is_urgent_and_sticky() {
        let e = entry(Status::Critical);
        assert_eq!(e.urgency, Urgency::Critical);
        assert_eq!(e.timeout, Timeout::Never);
        assert_eq!(entry(Status::Charging).timeout, Timeout::Default);
    }

    #[test]
    fn battery_strings() {
        assert_eq!(battery_string(Status::Charging, 42), "Battery is charging (42%)");
        assert_eq!(
            battery_string(Status::Low, 18),
            "Battery level is low! (18% remaining)"
        );
        assert_eq!(battery_string(Status::Missing, 0), "Battery is missing!");
    }

    #[test]
    fn time_strings() {
        assert_eq!(time_string(0), "0 minutes remaining");
        assert_eq!(time_string(1), "1 minute remaining");
        assert_eq!(time_string(45), "45 minutes remaining");
        assert_eq!(time_string(61), "1 hour, 1 minute remaining");
        assert_eq!(time_string(125), "2 hours, 5 minutes remaining");
    }

    #[test]
    fn tooltip_appends_time_line() {
        assert_eq!(tooltip("Battery is charged!", None), "Battery is charged!");
        assert_eq!(
            tooltip("Battery is discharging (50% remaining)", Some(90)),
            "Battery is discharging (50% remaining)\n1 hour, 30 minutes remaining"
        );
    }

    #[test]
    fn display_percentage_pins_edge_states() {
        assert_eq!(display_percentage(Status::Missing, 77), 0);
        assert_eq!(display_percentage(Status::Charged, 99), 100);
        assert_eq!(display_percentage(Status::Discharging, 77), 77);
    }
}
