//! Battery tray poll loop for `batticon`.
//!
//! Owns the Tokio runtime and wires together:
//! - the fixed-interval poll (telemetry → status → estimate → render)
//! - deferred low/critical command spawns
//! - config file watcher (live reload on change)
//! - `SIGUSR1` as the left-click action, `SIGINT`/`SIGTERM` for shutdown

pub mod context;
pub mod dispatch;

pub use context::{Ports, TrayContext};
pub use dispatch::{Scheduler, CRITICAL_COMMAND_DELAY, LOW_COMMAND_DELAY};

use batt_config::{ConfigWatcher, Overrides, Settings};
use batt_core::{Message, Notifier, Result};
use batt_desktop::{DbusNotifier, JsonRenderer, NoopNotifier, ProcessRunner};
use batt_system::SysfsBattery;
use std::path::PathBuf;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};
use tracing::info;

const APP_NAME: &str = "batticon";

/// Start the tray.  Returns only on `SIGINT` / `SIGTERM`.
///
/// Everything runs on a single-threaded runtime: the poll loop is the only
/// code that touches tray state.
pub fn run(config_path: PathBuf, overrides: Overrides) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(serve(config_path, overrides))
}

async fn serve(config_path: PathBuf, overrides: Overrides) -> Result<()> {
    let settings = batt_config::resolve(&config_path, &overrides);
    info!(
        "Polling every {}s, low level {}%, critical level {}%",
        settings.update_interval.as_secs(),
        settings.levels.low,
        settings.levels.critical
    );

    let (tx, mut rx) = mpsc::channel::<Message>(16);
    let ports = Ports {
        source:   Box::new(SysfsBattery::new(settings.battery.clone())),
        runner:   Box::new(ProcessRunner::new()),
        notifier: make_notifier(&settings),
        renderer: Box::new(JsonRenderer::stdout()),
    };
    let mut ctx = TrayContext::new(settings, ports, Scheduler::new(tx));

    let (watcher, mut config_rx) = ConfigWatcher::spawn(&config_path);
    let mut activate = signal(SignalKind::user_defined1())?;
    let mut terminate = signal(SignalKind::terminate())?;

    let mut ticker = time::interval(ctx.settings().update_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let message = tokio::select! {
            _ = ticker.tick() => Message::Tick,
            Some(msg) = rx.recv() => msg,
            Some(()) = config_rx.recv() => Message::ConfigReloaded,
            Some(()) = activate.recv() => Message::Activate,
            Some(()) = terminate.recv() => Message::Shutdown,
            _ = tokio::signal::ctrl_c() => Message::Shutdown,
        };

        match message {
            Message::Shutdown => {
                info!("Shutting down");
                return Ok(());
            }
            Message::ConfigReloaded => {
                let settings = batt_config::resolve(watcher.path(), &overrides);
                if settings.update_interval != ctx.settings().update_interval {
                    ticker = time::interval(settings.update_interval);
                    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                }
                reload(&mut ctx, settings);
                info!("Config reloaded from {}", watcher.path().display());
            }
            other => ctx.handle(other),
        }
    }
}

/// Apply reloaded settings, rebuilding collaborators whose inputs changed.
fn reload(ctx: &mut TrayContext, settings: Settings) {
    let old = ctx.settings().clone();
    if settings.battery != old.battery {
        ctx.set_source(Box::new(SysfsBattery::new(settings.battery.clone())));
    }
    if settings.hide_notification != old.hide_notification {
        ctx.set_notifier(make_notifier(&settings));
    }
    if settings.debug != old.debug {
        info!("Changing the debug flag takes effect after a restart");
    }
    ctx.set_settings(settings);
}

fn make_notifier(settings: &Settings) -> Box<dyn Notifier> {
    if settings.hide_notification {
        Box::new(NoopNotifier)
    } else {
        Box::new(DbusNotifier::spawn(APP_NAME))
    }
}
