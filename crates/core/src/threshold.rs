use crate::status::{Levels, Status};

/// Which configured level was crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Low,
    Critical,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Low => "low",
            Level::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One-shot crossing flags for the current discharge episode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThresholdFlags {
    pub low_crossed: bool,
    pub critical_crossed: bool,
}

/// Per-episode dispatch state.  The critical track dominates the low one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdState {
    Normal,
    LowPending,
    LowFired,
    CriticalPending,
    CriticalFired,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Phase {
    #[default]
    Armed,
    Pending,
    Fired,
}

/// A threshold crossing within episode `episode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossing {
    pub level: Level,
    pub episode: u64,
}

/// What a single [`ThresholdTracker::observe`] call changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdEvent {
    EpisodeStarted(u64),
    EpisodeEnded(u64),
    Crossed(Crossing),
}

/// Tracks discharge episodes and fires each level at most once per episode.
#[derive(Debug, Clone, Default)]
pub struct ThresholdTracker {
    /// Id of the running episode, `None` outside of one.
    episode: Option<u64>,
    next_episode: u64,
    low: Phase,
    critical: Phase,
}

impl ThresholdTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current episode id, if the battery is discharging.
    pub fn episode(&self) -> Option<u64> {
        self.episode
    }

    pub fn flags(&self) -> ThresholdFlags {
        ThresholdFlags {
            low_crossed: self.low != Phase::Armed,
            critical_crossed: self.critical != Phase::Armed,
        }
    }

    pub fn state(&self) -> ThresholdState {
        match (self.critical, self.low) {
            (Phase::Pending, _) => ThresholdState::CriticalPending,
            (Phase::Fired, _) => ThresholdState::CriticalFired,
            (Phase::Armed, Phase::Pending) => ThresholdState::LowPending,
            (Phase::Armed, Phase::Fired) => ThresholdState::LowFired,
            (Phase::Armed, Phase::Armed) => ThresholdState::Normal,
        }
    }

    /// Feed one poll.  Events are returned in the order they happened.
    pub fn observe(&mut self, status: Status, percentage: u8, levels: &Levels) -> Vec<ThresholdEvent> {
        let mut events = Vec::new();

        if !status.is_discharging() {
            if let Some(ended) = self.episode.take() {
                events.push(ThresholdEvent::EpisodeEnded(ended));
            }
            self.low = Phase::Armed;
            self.critical = Phase::Armed;
            return events;
        }

        let episode = match self.episode {
            Some(id) => id,
            None => {
                let id = self.next_episode;
                self.next_episode += 1;
                self.episode = Some(id);
                self.low = Phase::Armed;
                self.critical = Phase::Armed;
                events.push(ThresholdEvent::EpisodeStarted(id));
                id
            }
        };

        if self.low == Phase::Armed && percentage <= levels.low {
            self.low = Phase::Pending;
            events.push(ThresholdEvent::Crossed(Crossing { level: Level::Low, episode }));
        }
        if self.critical == Phase::Armed && percentage <= levels.critical {
            self.critical = Phase::Pending;
            events.push(ThresholdEvent::Crossed(Crossing { level: Level::Critical, episode }));
        }

        events
    }

    /// Mark a pending crossing as dispatched.  Stale crossings from an
    /// earlier episode are ignored.
    pub fn mark_fired(&mut self, crossing: Crossing) {
        if self.episode != Some(crossing.episode) {
            return;
        }
        let phase = match crossing.level {
            Level::Low => &mut self.low,
            Level::Critical => &mut self.critical,
        };
        if *phase == Phase::Pending {
            *phase = Phase::Fired;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn levels() -> Levels {
        Levels { low: 20, critical: 5 }
    }

    fn crossings(events: &[ThresholdEvent]) -> Vec<Level> {
        events
            .iter()
            .filter_map(|e| match e {
                ThresholdEvent::Crossed(c) => Some(c.level),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn each_level_fires_once_per_episode() {
        let mut t = ThresholdTracker::new();
        let l = levels();

        let first = t.observe(Status::Discharging, 25, &l);
        assert_eq!(first, vec![ThresholdEvent::EpisodeStarted(0)]);
        assert_eq!(t.state(), ThresholdState::Normal);

        assert_eq!(crossings(&t.observe(Status::Low, 18, &l)), vec![Level::Low]);
        assert_eq!(t.state(), ThresholdState::LowPending);
        assert!(crossings(&t.observe(Status::Low, 17, &l)).is_empty());

        t.mark_fired(Crossing { level: Level::Low, episode: 0 });
        assert_eq!(t.state(), ThresholdState::LowFired);

        assert_eq!(crossings(&t.observe(Status::Critical, 4, &l)), vec![Level::Critical]);
        assert_eq!(t.state(), ThresholdState::CriticalPending);
        assert!(crossings(&t.observe(Status::Critical, 3, &l)).is_empty());

        t.mark_fired(Crossing { level: Level::Critical, episode: 0 });
        assert_eq!(t.state(), ThresholdState::CriticalFired);
        assert_eq!(
            t.flags(),
            ThresholdFlags { low_crossed: true, critical_crossed: true }
        );
    }

    #[test]
    fn jump_past_both_levels_fires_both() {
        let mut t = ThresholdTracker::new();
        let events = t.observe(Status::Critical, 3, &levels());
        assert_eq!(crossings(&events), vec![Level::Low, Level::Critical]);
    }

    #[test]
    fn charging_interruption_rearms() {
        let mut t = ThresholdTracker::new();
        let l = levels();
        assert_eq!(crossings(&t.observe(Status::Low, 15, &l)), vec![Level::Low]);

        let events = t.observe(Status::Charging, 16, &l);
        assert_eq!(events, vec![ThresholdEvent::EpisodeEnded(0)]);
        assert_eq!(t.state(), ThresholdState::Normal);
        assert_eq!(t.flags(), ThresholdFlags::default());

        let events = t.observe(Status::Low, 16, &l);
        assert_eq!(events[0], ThresholdEvent::EpisodeStarted(1));
        assert_eq!(crossings(&events), vec![Level::Low]);
    }

    #[test]
    fn stale_crossing_is_ignored() {
        let mut t = ThresholdTracker::new();
        let l = levels();
        t.observe(Status::Low, 15, &l);
        t.observe(Status::Charging, 15, &l);
        t.observe(Status::Low, 15, &l);

        t.mark_fired(Crossing { level: Level::Low, episode: 0 });
        assert_eq!(t.state(), ThresholdState::LowPending);
    }

    #[test]
    fn not_charging_counts_as_episode() {
        let mut t = ThresholdTracker::new();
        let events = t.observe(Status::NotCharging, 10, &levels());
        assert_eq!(t.episode(), Some(0));
        assert_eq!(crossings(&events), vec![Level::Low]);
    }
}
