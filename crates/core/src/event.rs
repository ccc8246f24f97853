use crate::threshold::Crossing;

/// All messages that can reach the tray's poll loop.
///
/// Sources:
/// - Poll interval          → `Tick`
/// - Deferred spawn timers  → `CommandDue`
/// - Config watcher task    → `ConfigReloaded`
/// - `SIGUSR1` handler      → `Activate`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Time to read fresh telemetry.
    Tick,
    /// The delay before a threshold command has elapsed; re-check and spawn.
    CommandDue(Crossing),
    /// Config file changed on disk — triggers a live reload.
    ConfigReloaded,
    /// The user activated the tray icon (left click).
    Activate,
    /// Graceful shutdown requested.
    Shutdown,
}
