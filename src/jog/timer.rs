use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Identifies one scheduling of a deck's timer. A firing whose token no
/// longer matches the table was cancelled or replaced and must be ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerToken(u64);

#[derive(Debug, Clone, Copy)]
struct Entry {
    token: TimerToken,
    due: Instant,
    period: Duration,
}

/// Periodic timers keyed by deck, polled from the main loop.
#[derive(Debug, Default)]
pub struct TimerTable {
    entries: BTreeMap<usize, Entry>,
    next_token: u64,
}

impl TimerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a periodic timer for `deck`, replacing any existing one.
    pub fn schedule(&mut self, deck: usize, now: Instant, period: Duration) -> TimerToken {
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        if self.entries.contains_key(&deck) {
            log::trace!("deck {deck}: replacing timer");
        }
        self.entries.insert(
            deck,
            Entry {
                token,
                due: now + period,
                period,
            },
        );
        token
    }

    pub fn cancel(&mut self, deck: usize) {
        if self.entries.remove(&deck).is_some() {
            log::trace!("deck {deck}: timer cancelled");
        }
    }

    pub fn is_active(&self, deck: usize) -> bool {
        self.entries.contains_key(&deck)
    }

    pub fn token(&self, deck: usize) -> Option<TimerToken> {
        self.entries.get(&deck).map(|entry| entry.token)
    }

    /// Firings due at `now`, oldest first. Each due timer fires once and is
    /// re-armed for its next period; missed periods are not replayed.
    pub fn due(&mut self, now: Instant) -> Vec<(usize, TimerToken)> {
        let mut fired: Vec<(Instant, usize, TimerToken)> = Vec::new();
        for (deck, entry) in self.entries.iter_mut() {
            if entry.due <= now {
                fired.push((entry.due, *deck, entry.token));
                entry.due = now + entry.period;
            }
        }
        fired.sort_by_key(|(due, deck, _)| (*due, *deck));
        fired
            .into_iter()
            .map(|(_, deck, token)| (deck, token))
            .collect()
    }
}
