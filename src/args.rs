//! Argument parsing via clap.

use batt_config::Overrides;
use clap::Parser;
use std::path::PathBuf;

/// A lightweight battery monitor with low/critical level commands.
///
/// Status is written to stdout as one JSON object per change; send
/// `SIGUSR1` to run the left click command.
#[derive(Parser, Debug)]
#[command(
    name = "batticon",
    version,
    about,
    allow_negative_numbers = true
)]
pub(crate) struct Args {
    /// Display debug information.
    #[arg(short = 'd', long)]
    pub(crate) debug: bool,

    /// Set update interval (in seconds).
    #[arg(short = 'u', long, value_name = "SECONDS")]
    pub(crate) update_interval: Option<i64>,

    /// Set low battery level (in percent).
    #[arg(short = 'l', long, value_name = "PERCENT")]
    pub(crate) low_level: Option<i64>,

    /// Set critical battery level (in percent).
    #[arg(short = 'r', long, value_name = "PERCENT")]
    pub(crate) critical_level: Option<i64>,

    /// Command to execute when low battery level is reached.
    #[arg(short = 'o', long, value_name = "COMMAND")]
    pub(crate) command_low_level: Option<String>,

    /// Command to execute when critical battery level is reached.
    #[arg(short = 'c', long, value_name = "COMMAND")]
    pub(crate) command_critical_level: Option<String>,

    /// Command to execute when left clicking on tray icon (SIGUSR1).
    #[arg(short = 'x', long, value_name = "COMMAND")]
    pub(crate) command_left_click: Option<String>,

    /// Hide the notification popups.
    #[arg(short = 'n', long)]
    pub(crate) hide_notification: bool,

    /// Config file to use instead of `$XDG_CONFIG_HOME/batticon/batticon.toml`.
    #[arg(long, value_name = "PATH")]
    pub(crate) config: Option<PathBuf>,

    /// Battery to monitor, e.g. `BAT1`.  Defaults to the first one found.
    #[arg(value_name = "BATTERY")]
    pub(crate) battery: Option<String>,
}

impl Args {
    pub(crate) fn overrides(&self) -> Overrides {
        Overrides {
            update_interval:        self.update_interval,
            low_level:              self.low_level,
            critical_level:         self.critical_level,
            command_low_level:      self.command_low_level.clone(),
            command_critical_level: self.command_critical_level.clone(),
            command_left_click:     self.command_left_click.clone(),
            debug:                  self.debug,
            hide_notification:      self.hide_notification,
            battery:                self.battery.clone(),
        }
    }
}
