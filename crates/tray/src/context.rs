use crate::dispatch::{delay_for, Scheduler};
use batt_config::Settings;
use batt_core::{
    classify, format, CommandRunner, Crossing, Direction, Estimator, Level, Message, Notice,
    NoticeKey, Notifier, Renderer, Status, TelemetrySource, ThresholdEvent, ThresholdTracker,
    Timeout, TrayView, Urgency,
};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// The collaborators a tray instance talks to.
#[derive(Debug)]
pub struct Ports {
    pub source:   Box<dyn TelemetrySource>,
    pub runner:   Box<dyn CommandRunner>,
    pub notifier: Box<dyn Notifier>,
    pub renderer: Box<dyn Renderer>,
}

/// Per-tray-icon state, touched only by the poll loop.
#[derive(Debug)]
pub struct TrayContext {
    settings:    Settings,
    ports:       Ports,
    scheduler:   Scheduler,
    last_status: Option<Status>,
    estimator:   Estimator,
    thresholds:  ThresholdTracker,
}

impl TrayContext {
    pub fn new(settings: Settings, ports: Ports, scheduler: Scheduler) -> Self {
        Self {
            settings,
            ports,
            scheduler,
            last_status: None,
            estimator:   Estimator::new(),
            thresholds:  ThresholdTracker::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Swap in reloaded settings.  Episode and estimator state are kept.
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn ports(&self) -> &Ports {
        &self.ports
    }

    pub fn set_source(&mut self, source: Box<dyn TelemetrySource>) {
        self.ports.source = source;
    }

    pub fn set_notifier(&mut self, notifier: Box<dyn Notifier>) {
        self.ports.notifier = notifier;
    }

    pub fn status(&self) -> Option<Status> {
        self.last_status
    }

    pub fn thresholds(&self) -> &ThresholdTracker {
        &self.thresholds
    }

    pub fn pending_commands(&self) -> usize {
        self.scheduler.pending()
    }

    /// Handle one poll-loop message.  `ConfigReloaded` and `Shutdown` are
    /// the loop's business and ignored here.
    pub fn handle(&mut self, message: Message) {
        match message {
            Message::Tick => self.poll_at(tokio::time::Instant::now().into_std()),
            Message::CommandDue(crossing) => self.fire(crossing),
            Message::Activate => self.activate(),
            Message::ConfigReloaded | Message::Shutdown => {}
        }
    }

    /// Read telemetry and update everything derived from it.
    pub fn poll_at(&mut self, now: Instant) {
        let levels = self.settings.levels;

        let (status, raw_pct, reported) = match self.ports.source.read() {
            Ok(t) => (classify(&t, &levels), t.percentage, t.remaining_minutes),
            Err(e) => {
                warn!("{e}");
                (Status::Unknown, 0, None)
            }
        };
        let percentage = format::display_percentage(status, raw_pct);
        let previous = self.last_status.replace(status);

        if status == Status::Charging && previous != Some(Status::Charging) {
            self.estimator.reset();
        }

        let events = self.thresholds.observe(status, percentage, &levels);
        let mut crossings = Vec::new();
        for event in events {
            match event {
                ThresholdEvent::EpisodeStarted(id) => {
                    debug!("Discharge episode {id} started");
                    self.estimator.reset();
                }
                ThresholdEvent::EpisodeEnded(id) => {
                    debug!("Discharge episode {id} ended");
                    self.scheduler.cancel_episode(id);
                }
                ThresholdEvent::Crossed(c) => crossings.push(c),
            }
        }

        let minutes = match status {
            Status::Charging => reported
                .or_else(|| self.estimator.observe(f64::from(percentage), now, Direction::Charging)),
            Status::Discharging | Status::Low | Status::Critical => reported
                .or_else(|| self.estimator.observe(f64::from(percentage), now, Direction::Discharging)),
            _ => None,
        };

        let battery = format::battery_string(status, percentage);
        let time = minutes.map(format::time_string);
        debug!("status {status}, {percentage}%, time {minutes:?}");

        // Crossing notices replace the status notice in the same slot.
        if crossings.is_empty() && previous.map(Status::base) != Some(status.base()) {
            let entry = format::entry(status);
            self.ports.notifier.notify(Notice {
                key:     NoticeKey::Status,
                summary: battery.clone(),
                body:    time.clone(),
                timeout: entry.timeout,
                urgency: entry.urgency,
            });
        }

        let view = TrayView {
            status,
            percentage,
            minutes,
            tooltip: format::tooltip(&battery, minutes),
        };
        if let Err(e) = self.ports.renderer.render(&view) {
            warn!("Cannot render status: {e}");
        }

        for crossing in crossings {
            self.on_crossing(crossing, percentage, time.clone());
        }
    }

    fn on_crossing(&mut self, crossing: Crossing, percentage: u8, time: Option<String>) {
        let status = match crossing.level {
            Level::Low => Status::Low,
            Level::Critical => Status::Critical,
        };
        let entry = format::entry(status);
        self.ports.notifier.notify(Notice {
            key:     NoticeKey::Status,
            summary: format::battery_string(status, percentage),
            body:    time,
            timeout: entry.timeout,
            urgency: entry.urgency,
        });

        match self.command_for(crossing.level) {
            Some(command) => {
                let delay = delay_for(crossing.level);
                warn!(
                    "Spawning {} battery level command in {} seconds: {command}",
                    crossing.level,
                    delay.as_secs()
                );
                self.scheduler.schedule(crossing, delay);
            }
            None => self.thresholds.mark_fired(crossing),
        }
    }

    /// The delay for `crossing` has elapsed: re-check, then spawn.
    fn fire(&mut self, crossing: Crossing) {
        let level = crossing.level;

        if self.thresholds.episode() != Some(crossing.episode) {
            info!("Skipping {level} battery level command, no longer discharging");
            return;
        }

        // A failed read doesn't block the command; only a confirmed change does.
        if let Ok(t) = self.ports.source.read() {
            if !classify(&t, &self.settings.levels).is_discharging() {
                info!("Skipping {level} battery level command, no longer discharging");
                self.thresholds.mark_fired(crossing);
                return;
            }
        }

        if let Some(command) = self.command_for(level).map(str::to_owned) {
            if let Err(e) = self.ports.runner.spawn(&command) {
                error!("Cannot spawn {level} battery level command: {e}");
                self.ports.notifier.notify(Notice {
                    key:     NoticeKey::SpawnFailure,
                    summary: format!("Cannot spawn {level} battery level command!"),
                    body:    Some(command),
                    timeout: Timeout::Never,
                    urgency: Urgency::Critical,
                });
            }
        }
        self.thresholds.mark_fired(crossing);
    }

    /// Left click on the tray icon.
    fn activate(&mut self) {
        let Some(command) = self.settings.command_left_click.clone() else {
            debug!("No left click command configured");
            return;
        };
        if let Err(e) = self.ports.runner.spawn(&command) {
            error!("Cannot spawn left click command: {e}");
            self.ports.notifier.notify(Notice {
                key:     NoticeKey::SpawnFailure,
                summary: "Cannot spawn left click command!".to_string(),
                body:    Some(command),
                timeout: Timeout::Default,
                urgency: Urgency::Critical,
            });
        }
    }

    fn command_for(&self, level: Level) -> Option<&str> {
        match level {
            Level::Low => self.settings.command_low_level.as_deref(),
            Level::Critical => self.settings.command_critical_level.as_deref(),
        }
    }
}
