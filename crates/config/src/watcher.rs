use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Watches a config file for changes and sends a notification on every write.
///
/// The parent directory is watched rather than the file itself, so a file
/// that is created after startup (or replaced by an editor) is still seen.
///
/// # Example
/// ```no_run
/// # async fn demo() {
/// let (_, mut rx) = batt_config::ConfigWatcher::spawn("/home/user/.config/batticon/batticon.toml");
/// while rx.recv().await.is_some() {
///     println!("config changed — reloading");
/// }
/// # }
/// ```
pub struct ConfigWatcher {
    path: PathBuf,
}

impl ConfigWatcher {
    /// Spawn a filesystem watcher for `path`.
    /// Returns the watcher handle and a receiver that fires on every detected change.
    pub fn spawn(path: impl AsRef<Path>) -> (Self, mpsc::Receiver<()>) {
        let (tx, rx) = mpsc::channel(1);
        let path = path.as_ref().to_path_buf();
        let watcher = Self { path: path.clone() };

        tokio::spawn(watch_loop(path, tx));

        (watcher, rx)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

async fn watch_loop(path: PathBuf, tx: mpsc::Sender<()>) {
    use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
    use std::time::Duration;

    let Some(dir) = path.parent().filter(|d| d.is_dir()).map(Path::to_path_buf) else {
        info!("Config directory for '{}' does not exist; live reload disabled", path.display());
        return;
    };

    let (sync_tx, mut sync_rx) = mpsc::channel::<notify::Result<Event>>(16);

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = sync_tx.blocking_send(res);
        },
        Config::default().with_poll_interval(Duration::from_secs(2)),
    ) {
        Ok(w) => w,
        Err(e) => {
            error!("Failed to create filesystem watcher: {e}");
            return;
        }
    };

    if let Err(e) = watcher.watch(&dir, RecursiveMode::NonRecursive) {
        error!("Failed to watch '{}': {e}", dir.display());
        return;
    }

    info!("Watching config file: {}", path.display());

    while let Some(event) = sync_rx.recv().await {
        match event {
            Ok(e) => {
                use notify::EventKind::*;
                let ours = e.paths.iter().any(|p| p.file_name() == path.file_name());
                if ours && matches!(e.kind, Modify(_) | Create(_)) {
                    // A full channel means a reload is already queued.
                    if let Err(mpsc::error::TrySendError::Closed(_)) = tx.try_send(()) {
                        break; // receiver dropped
                    }
                }
            }
            Err(e) => warn!("Watcher error: {e}"),
        }
    }
}
