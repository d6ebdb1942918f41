use std::time::{Duration, Instant};

use crate::host::{Host, ScratchParams};
use crate::settings::ScratchSettings;

use super::timer::{TimerTable, TimerToken};

/// Wheel readings below this are forward motion, the rest backward.
const WHEEL_MIDPOINT: u8 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn reversed(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }

    fn beatjump_key(self) -> &'static str {
        match self {
            Self::Forward => "beatjump_1_forward",
            Self::Backward => "beatjump_1_backward",
        }
    }
}

/// What the wheel currently does for a deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelMode {
    Idle,
    Scratching,
    /// Released but still spinning; scratch ends once it slows down.
    Coasting,
    Searching,
}

#[derive(Debug, Default, Clone)]
struct DeckScratch {
    touching: bool,
    searching: bool,
    direction: Option<Direction>,
    last_tick: u8,
    accumulator: u32,
    /// Wheel motion since the last inertia firing.
    inertia_ticks: u32,
}

/// Jog wheel handling for every deck: scratching with inertia after
/// release, shift+wheel beat jumps, searching and pitch bend.
#[derive(Debug)]
pub struct ScratchEngine {
    decks: Vec<DeckScratch>,
    timers: TimerTable,
    settings: ScratchSettings,
    shift: bool,
}

impl ScratchEngine {
    pub fn new(decks: usize, settings: &ScratchSettings) -> Self {
        Self {
            decks: vec![DeckScratch::default(); decks],
            timers: TimerTable::new(),
            settings: settings.clone(),
            shift: false,
        }
    }

    /// Shift changes which gesture the wheel performs. Pressing it also
    /// starts every deck's beat-jump count from zero.
    pub fn set_shift(&mut self, pressed: bool) {
        self.shift = pressed;
        if pressed {
            for state in &mut self.decks {
                state.accumulator = 0;
            }
        }
    }

    pub fn mode(&self, host: &dyn Host, deck: usize) -> WheelMode {
        let Some(state) = self.state(deck) else {
            return WheelMode::Idle;
        };
        if state.searching {
            WheelMode::Searching
        } else if host.is_scratching(deck) && state.touching {
            WheelMode::Scratching
        } else if host.is_scratching(deck) && self.timers.is_active(deck) {
            WheelMode::Coasting
        } else {
            WheelMode::Idle
        }
    }

    pub fn wheel_touch(&mut self, host: &mut dyn Host, deck: usize, touched: bool, now: Instant) {
        let shift = self.shift;
        let vinyl_mode = self.settings.vinyl_mode;
        let Some(state) = self.state_mut(deck) else {
            log::debug!("wheel touch on unknown deck {deck}");
            return;
        };

        if touched && !vinyl_mode && !shift && !state.searching {
            log::trace!("deck {deck}: touch ignored outside vinyl mode");
            return;
        }

        state.touching = touched;
        let searching = state.searching;
        if touched && !shift && !searching {
            self.enable(host, deck);
        } else if touched {
            self.disable(host, deck);
            if let Some(state) = self.state_mut(deck) {
                state.searching = true;
            }
            log::debug!("deck {deck}: searching");
        } else if searching || host.is_scratching(deck) {
            self.start_inertia(deck, now);
        }
    }

    pub fn wheel_turn(&mut self, host: &mut dyn Host, group: &str, deck: usize, value: u8) {
        let shift = self.shift;
        let settings = &self.settings;
        let (search_scale, jog_scale, beatjump_ticks) = (
            settings.search_scale,
            settings.jog_scale,
            settings.beatjump_ticks,
        );
        let timer_active = self.timers.is_active(deck);
        let Some(state) = self.state_mut(deck) else {
            log::debug!("wheel turn on unknown deck {deck}");
            return;
        };

        let mut direction = if value < WHEEL_MIDPOINT {
            Direction::Forward
        } else {
            Direction::Backward
        };
        // A fast spin wraps past the midpoint without the platter turning
        // around.
        if let Some(previous) = state.direction {
            if previous != direction && state.last_tick.abs_diff(value) < WHEEL_MIDPOINT {
                direction = direction.reversed();
            }
        }
        let delta = match direction {
            Direction::Forward => i32::from(value),
            Direction::Backward => i32::from(value) - 128,
        };
        let motion = delta.unsigned_abs();

        let reversed = state.direction.is_some_and(|previous| previous != direction);
        let touching = state.touching;
        state.last_tick = value;
        state.direction = Some(direction);
        if timer_active {
            state.inertia_ticks = state.inertia_ticks.saturating_add(motion);
        }

        if state.searching {
            let position = host.get(group, "playposition") + f64::from(delta) * search_scale;
            host.set(group, "playposition", position.clamp(0.0, 1.0));
            return;
        }

        if reversed {
            state.accumulator = 0;
        }
        state.accumulator = state.accumulator.saturating_add(motion);
        let accumulator = state.accumulator;

        if reversed && !touching && host.is_scratching(deck) {
            log::debug!("deck {deck}: wheel reversed after release");
            self.disable(host, deck);
        }

        if host.is_scratching(deck) {
            host.scratch_tick(deck, delta);
        } else if shift {
            if accumulator >= beatjump_ticks {
                if let Some(state) = self.state_mut(deck) {
                    state.accumulator -= beatjump_ticks;
                }
                log::debug!("deck {deck}: wheel beat jump {direction:?}");
                host.set(group, direction.beatjump_key(), 1.0);
            }
        } else {
            host.set(group, "jog", f64::from(delta) * jog_scale);
        }
    }

    /// Run due inertia timers.
    pub fn poll_timers(&mut self, host: &mut dyn Host, now: Instant) {
        for (deck, token) in self.timers.due(now) {
            self.fire(host, deck, token);
        }
    }

    /// Stop scratching on every deck and drop all timers.
    pub fn shutdown(&mut self, host: &mut dyn Host) {
        for deck in 1..=self.decks.len() {
            self.disable(host, deck);
        }
    }

    fn fire(&mut self, host: &mut dyn Host, deck: usize, token: TimerToken) {
        if self.timers.token(deck) != Some(token) {
            log::trace!("deck {deck}: stale inertia firing");
            return;
        }
        let (forward_stop, backward_stop) = (
            self.settings.forward_stop_ticks,
            self.settings.backward_stop_ticks,
        );
        let Some(state) = self.state_mut(deck) else {
            return;
        };

        let threshold = match state.direction {
            Some(Direction::Forward) => forward_stop,
            _ => backward_stop,
        };
        if state.inertia_ticks > threshold {
            state.inertia_ticks = 0;
            return;
        }

        log::debug!("deck {deck}: wheel stopped");
        self.disable(host, deck);
    }

    fn enable(&mut self, host: &mut dyn Host, deck: usize) {
        let params = ScratchParams {
            ticks_per_revolution: self.settings.ticks_per_revolution,
            rpm: self.settings.rpm,
            alpha: self.settings.alpha,
            beta: self.settings.beta,
            ramp: self.settings.ramp,
        };
        host.scratch_enable(deck, params);
        self.timers.cancel(deck);
    }

    fn disable(&mut self, host: &mut dyn Host, deck: usize) {
        if let Some(state) = self.state_mut(deck) {
            state.searching = false;
        }
        self.timers.cancel(deck);
        if host.is_scratching(deck) {
            host.scratch_disable(deck, false);
        }
    }

    fn start_inertia(&mut self, deck: usize, now: Instant) {
        let period = Duration::from_millis(self.settings.inertia_period_ms);
        self.timers.schedule(deck, now, period);
        if let Some(state) = self.state_mut(deck) {
            state.inertia_ticks = 0;
        }
    }

    fn state(&self, deck: usize) -> Option<&DeckScratch> {
        self.decks.get(deck.checked_sub(1)?)
    }

    fn state_mut(&mut self, deck: usize) -> Option<&mut DeckScratch> {
        self.decks.get_mut(deck.checked_sub(1)?)
    }
}
