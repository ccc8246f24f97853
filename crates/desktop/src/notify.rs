use batt_core::{Notice, NoticeKey, Notifier, Timeout, Urgency};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use zbus::zvariant::Value;

#[zbus::proxy(
    interface = "org.freedesktop.Notifications",
    default_service = "org.freedesktop.Notifications",
    default_path = "/org/freedesktop/Notifications",
    gen_blocking = false
)]
trait Notifications {
    #[allow(clippy::too_many_arguments)]
    fn notify(
        &self,
        app_name: &str,
        replaces_id: u32,
        app_icon: &str,
        summary: &str,
        body: &str,
        actions: &[&str],
        hints: HashMap<&str, Value<'_>>,
        expire_timeout: i32,
    ) -> zbus::Result<u32>;
}

/// Sends notifications to the session notification daemon.
///
/// `notify` never blocks: notices are queued to a background task that owns
/// the D-Bus connection.  Each [`NoticeKey`] maps to one on-screen
/// notification which later notices replace in place.
#[derive(Debug, Clone)]
pub struct DbusNotifier {
    tx: mpsc::Sender<Notice>,
}

impl DbusNotifier {
    /// Spawn the background sender.  Must be called inside a Tokio runtime.
    pub fn spawn(app_name: impl Into<String>) -> Self {
        let (tx, rx) = mpsc::channel(16);
        tokio::spawn(send_loop(app_name.into(), rx));
        Self { tx }
    }
}

impl Notifier for DbusNotifier {
    fn notify(&self, notice: Notice) {
        if let Err(e) = self.tx.try_send(notice) {
            warn!("Dropping notification: {e}");
        }
    }
}

async fn send_loop(app_name: String, mut rx: mpsc::Receiver<Notice>) {
    let mut proxy: Option<NotificationsProxy<'static>> = None;
    let mut ids: HashMap<NoticeKey, u32> = HashMap::new();

    while let Some(notice) = rx.recv().await {
        if proxy.is_none() {
            match connect().await {
                Ok(p) => proxy = Some(p),
                Err(e) => {
                    warn!("Notification daemon unavailable: {e}");
                    continue;
                }
            }
        }
        let Some(p) = &proxy else { continue };

        let replaces = ids.get(&notice.key).copied().unwrap_or(0);
        let mut hints = HashMap::new();
        hints.insert("urgency", Value::from(urgency_byte(notice.urgency)));

        let result = p
            .notify(
                &app_name,
                replaces,
                "",
                &notice.summary,
                notice.body.as_deref().unwrap_or(""),
                &[],
                hints,
                expire_timeout(notice.timeout),
            )
            .await;

        match result {
            Ok(id) => {
                debug!("Notification {:?} shown as #{id}", notice.key);
                ids.insert(notice.key, id);
            }
            Err(e) => {
                warn!("Cannot show notification: {e}");
                // Reconnect on the next notice.
                proxy = None;
            }
        }
    }
}

async fn connect() -> zbus::Result<NotificationsProxy<'static>> {
    let conn = zbus::Connection::session().await?;
    NotificationsProxy::new(&conn).await
}

fn urgency_byte(urgency: Urgency) -> u8 {
    match urgency {
        Urgency::Normal => 1,
        Urgency::Critical => 2,
    }
}

fn expire_timeout(timeout: Timeout) -> i32 {
    match timeout {
        Timeout::Default => -1,
        Timeout::Never => 0,
    }
}

/// Used when notifications are hidden.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, notice: Notice) {
        debug!("Notification suppressed: {}", notice.summary);
    }
}
