use crate::{error::Result, status::{Status, Telemetry}};

/// Source of fresh battery telemetry.
///
/// Every collaborator the tray talks to sits behind one of the traits in
/// this module so the poll logic can be exercised without hardware, a
/// session bus or a real shell.
pub trait TelemetrySource: Send + Sync + std::fmt::Debug {
    /// Read the current battery state.  Called once per poll and once more
    /// right before a deferred command is spawned.
    fn read(&self) -> Result<Telemetry>;
}

/// Spawns shell commands without waiting for them to finish.
pub trait CommandRunner: Send + Sync + std::fmt::Debug {
    /// Returns once the command has been started (or failed to start).
    fn spawn(&self, command: &str) -> Result<()>;
}

/// How urgent a notification is, as defined by the freedesktop notification protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Normal,
    Critical,
}

/// Notification expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeout {
    /// Let the notification server decide.
    Default,
    /// Stay until dismissed.
    Never,
}

/// Identifies a notification slot.  Each slot is shown once and then
/// updated in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeKey {
    /// Battery status changes and threshold crossings.
    Status,
    /// A command failed to start.
    SpawnFailure,
}

/// A single notification to show or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub key:     NoticeKey,
    pub summary: String,
    pub body:    Option<String>,
    pub timeout: Timeout,
    pub urgency: Urgency,
}

/// Desktop notification sink.
pub trait Notifier: Send + Sync + std::fmt::Debug {
    fn notify(&self, notice: Notice);
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrayView {
    pub status:     Status,
    pub percentage: u8,
    /// Estimated or reported minutes remaining, if known.
    pub minutes:    Option<u32>,
    pub tooltip:    String,
}

/// Draws the tray icon / status text.  Icon lookup is up to the
/// implementation.
pub trait Renderer: Send + std::fmt::Debug {
    fn render(&mut self, view: &TrayView) -> Result<()>;
}
