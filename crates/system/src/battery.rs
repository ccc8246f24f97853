use batt_core::{BattError, Result, SupplyState, Telemetry, TelemetrySource};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Linux sysfs power-supply class directory.
pub const POWER_SUPPLY_ROOT: &str = "/sys/class/power_supply";

/// Reads battery state from the Linux sysfs power-supply interface.
///
/// The battery directory is looked up on every read so a battery that is
/// swapped or hot-plugged is picked up without a restart.
#[derive(Debug, Clone)]
pub struct SysfsBattery {
    root: PathBuf,
    /// Explicit battery name (e.g. `"BAT1"`); `None` = first battery found.
    name: Option<String>,
}

impl SysfsBattery {
    pub fn new(name: Option<String>) -> Self {
        Self::with_root(POWER_SUPPLY_ROOT, name)
    }

    /// Use a different power-supply root, e.g. a fake tree in tests.
    pub fn with_root(root: impl Into<PathBuf>, name: Option<String>) -> Self {
        Self {
            root: root.into(),
            name,
        }
    }

    /// Resolve the battery directory.  `Ok(None)` means there is no battery
    /// (desktop, VM, empty slot).
    fn locate(&self) -> Result<Option<PathBuf>> {
        if let Some(name) = &self.name {
            let dir = self.root.join(name);
            return Ok(dir.is_dir().then_some(dir));
        }

        let entries = std::fs::read_dir(&self.root).map_err(|e| {
            BattError::TelemetryUnavailable(format!("cannot list '{}': {e}", self.root.display()))
        })?;

        let mut candidates: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|dir| is_system_battery(dir))
            .collect();
        candidates.sort();

        Ok(candidates.into_iter().next())
    }
}

impl TelemetrySource for SysfsBattery {
    fn read(&self) -> Result<Telemetry> {
        let Some(dir) = self.locate()? else {
            return Ok(Telemetry::missing());
        };

        if read_value::<u8>(&dir, "present") == Some(0) {
            return Ok(Telemetry::missing());
        }

        let raw_status = std::fs::read_to_string(dir.join("status")).map_err(|e| {
            BattError::TelemetryUnavailable(format!("cannot read '{}/status': {e}", dir.display()))
        })?;
        let state = SupplyState::from_sysfs(&raw_status);

        let percentage = read_value::<u8>(&dir, "capacity")
            .or_else(|| capacity_from_ratio(&dir))
            .ok_or_else(|| {
                BattError::TelemetryUnavailable(format!("no capacity in '{}'", dir.display()))
            })?;

        let remaining = remaining_minutes(&dir, state);
        debug!(
            "sysfs {}: {percentage}% {:?}, reported remaining {remaining:?} min",
            dir.display(),
            state
        );

        Ok(Telemetry::new(percentage, false, true)
            .with_state(state)
            .with_remaining(remaining))
    }
}

/// `type == Battery`, excluding peripheral batteries (mice, headsets) which
/// the kernel marks with `scope == Device`.
fn is_system_battery(dir: &Path) -> bool {
    let kind = std::fs::read_to_string(dir.join("type")).unwrap_or_default();
    let scope = std::fs::read_to_string(dir.join("scope")).unwrap_or_default();
    kind.trim() == "Battery" && scope.trim() != "Device"
}

fn read_value<T: FromStr>(dir: &Path, attr: &str) -> Option<T> {
    std::fs::read_to_string(dir.join(attr))
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Fallback for drivers without `capacity`: energy or charge ratio.
fn capacity_from_ratio(dir: &Path) -> Option<u8> {
    let (now, full) = ["energy", "charge"].iter().find_map(|prefix| {
        let now = read_value::<f64>(dir, &format!("{prefix}_now"))?;
        let full = read_value::<f64>(dir, &format!("{prefix}_full"))?;
        Some((now, full))
    })?;
    if full <= 0.0 {
        return None;
    }
    Some((now / full * 100.0).round().clamp(0.0, 100.0) as u8)
}

/// Remaining time as reported by the driver, in minutes.
///
/// Prefers the `time_to_*_now` attributes (seconds), then derives it from
/// energy/power or charge/current.  `None` when the driver reports no rate,
/// in which case the tray falls back to its own estimator.
fn remaining_minutes(dir: &Path, state: SupplyState) -> Option<u32> {
    let direct = match state {
        SupplyState::Discharging => read_value::<u64>(dir, "time_to_empty_now"),
        SupplyState::Charging => read_value::<u64>(dir, "time_to_full_now"),
        _ => return None,
    };
    if let Some(secs) = direct.filter(|s| *s > 0) {
        return u32::try_from((secs + 30) / 60).ok();
    }

    let (now, full, rate) = [("energy", "power"), ("charge", "current")]
        .iter()
        .find_map(|(amount, flow)| {
            let rate = read_value::<f64>(dir, &format!("{flow}_now"))?.abs();
            let now = read_value::<f64>(dir, &format!("{amount}_now"))?;
            let full = read_value::<f64>(dir, &format!("{amount}_full"))?;
            (rate > 0.0).then_some((now, full, rate))
        })?;

    let hours = match state {
        SupplyState::Discharging => now / rate,
        _ => (full - now).max(0.0) / rate,
    };
    let minutes = (hours * 60.0).round();
    (minutes.is_finite() && minutes >= 0.0 && minutes <= f64::from(u32::MAX))
        .then_some(minutes as u32)
}
