use batt_core::{Crossing, Level, Message};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Wait before spawning the low level command.
pub const LOW_COMMAND_DELAY: Duration = Duration::from_secs(5);
/// Wait before spawning the critical level command.
pub const CRITICAL_COMMAND_DELAY: Duration = Duration::from_secs(30);

pub fn delay_for(level: Level) -> Duration {
    match level {
        Level::Low => LOW_COMMAND_DELAY,
        Level::Critical => CRITICAL_COMMAND_DELAY,
    }
}

/// One-shot deferred tasks keyed by discharge episode.
///
/// A scheduled crossing comes back as [`Message::CommandDue`] on the poll
/// loop's channel once its delay has elapsed; the poll loop then re-checks
/// the battery and spawns the command.  Ending an episode aborts whatever
/// is still waiting for it.
#[derive(Debug)]
pub struct Scheduler {
    tx:      mpsc::Sender<Message>,
    pending: HashMap<u64, Vec<JoinHandle<()>>>,
}

impl Scheduler {
    pub fn new(tx: mpsc::Sender<Message>) -> Self {
        Self {
            tx,
            pending: HashMap::new(),
        }
    }

    /// Deliver `crossing` back to the poll loop after `delay`.
    pub fn schedule(&mut self, crossing: Crossing, delay: Duration) {
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Message::CommandDue(crossing)).await;
        });

        let handles = self.pending.entry(crossing.episode).or_default();
        handles.retain(|h| !h.is_finished());
        handles.push(handle);
    }

    /// Abort every task still waiting for `episode`.  Returns how many were
    /// aborted.
    pub fn cancel_episode(&mut self, episode: u64) -> usize {
        let Some(handles) = self.pending.remove(&episode) else {
            return 0;
        };
        let mut aborted = 0;
        for handle in handles.into_iter().filter(|h| !h.is_finished()) {
            handle.abort();
            aborted += 1;
        }
        if aborted > 0 {
            debug!("Cancelled {aborted} pending command(s) of episode {episode}");
        }
        aborted
    }

    /// Number of tasks that have not fired yet.
    pub fn pending(&self) -> usize {
        self.pending
            .values()
            .flatten()
            .filter(|h| !h.is_finished())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crossing(level: Level, episode: u64) -> Crossing {
        Crossing { level, episode }
    }

    #[tokio::test(start_paused = true)]
    async fn delivers_after_the_delay() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut s = Scheduler::new(tx);
        s.schedule(crossing(Level::Low, 0), LOW_COMMAND_DELAY);

        let started = tokio::time::Instant::now();
        let msg = rx.recv().await.unwrap();
        assert_eq!(msg, Message::CommandDue(crossing(Level::Low, 0)));
        assert!(started.elapsed() >= LOW_COMMAND_DELAY);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_episode_aborts_only_that_episode() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut s = Scheduler::new(tx);
        s.schedule(crossing(Level::Low, 0), LOW_COMMAND_DELAY);
        s.schedule(crossing(Level::Critical, 0), CRITICAL_COMMAND_DELAY);
        s.schedule(crossing(Level::Low, 1), LOW_COMMAND_DELAY);
        assert_eq!(s.pending(), 3);

        assert_eq!(s.cancel_episode(0), 2);
        assert_eq!(s.cancel_episode(0), 0);

        let msg = rx.recv().await.unwrap();
        assert_eq!(msg, Message::CommandDue(crossing(Level::Low, 1)));

        tokio::time::sleep(CRITICAL_COMMAND_DELAY * 2).await;
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn critical_waits_longer() {
        assert!(delay_for(Level::Critical) > delay_for(Level::Low));
        assert_eq!(delay_for(Level::Low), Duration::from_secs(5));
        assert_eq!(delay_for(Level::Critical), Duration::from_secs(30));
    }
}
