//! Interfaces to the deck/mixer host.
//!
//! The pad layers and the jog engine never own deck state. They read and
//! write named controls through [`ControlStore`] and drive platter physics
//! through [`DeckPhysics`].

pub mod memory;

pub use memory::MemoryHost;

/// Handle returned by [`ControlStore::connect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u32);

/// A value delivered to a connection, either because the control changed
/// or because the connection was triggered.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueChange {
    pub connection: ConnectionId,
    pub group: String,
    pub key: String,
    pub value: f64,
}

/// Named control values, grouped per deck (`[Channel1]`, ...).
pub trait ControlStore {
    fn get(&self, group: &str, key: &str) -> f64;

    fn set(&mut self, group: &str, key: &str, value: f64);

    /// Watch a control. Changes are queued and handed out by [`take_changes`].
    ///
    /// [`take_changes`]: ControlStore::take_changes
    fn connect(&mut self, group: &str, key: &str) -> ConnectionId;

    /// Queue the connection's current value as if it had just changed.
    fn trigger(&mut self, connection: ConnectionId);

    fn disconnect(&mut self, connection: ConnectionId);

    /// Pending deliveries, oldest first.
    fn take_changes(&mut self) -> Vec<ValueChange>;

    fn set_bool(&mut self, group: &str, key: &str, on: bool) {
        self.set(group, key, if on { 1.0 } else { 0.0 });
    }

    fn get_bool(&self, group: &str, key: &str) -> bool {
        self.get(group, key) != 0.0
    }
}

/// Constants handed to the host's scratch filter when scratching starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScratchParams {
    pub ticks_per_revolution: u32,
    pub rpm: f64,
    pub alpha: f64,
    pub beta: f64,
    pub ramp: bool,
}

/// Platter physics owned by the host. Deck numbers start at 1.
pub trait DeckPhysics {
    fn scratch_enable(&mut self, deck: usize, params: ScratchParams);

    fn scratch_disable(&mut self, deck: usize, ramp: bool);

    fn scratch_tick(&mut self, deck: usize, delta: i32);

    fn is_scratching(&self, deck: usize) -> bool;

    fn brake(&mut self, deck: usize, factor: f64);

    fn soft_start(&mut self, deck: usize, factor: f64);
}

pub trait Host: ControlStore + DeckPhysics {}

impl<T: ControlStore + DeckPhysics> Host for T {}

/// Deck number for a `[ChannelN]` group, if it names one.
pub fn deck_from_group(group: &str) -> Option<usize> {
    group
        .strip_prefix("[Channel")?
        .strip_suffix(']')?
        .parse()
        .ok()
        .filter(|deck| *deck > 0)
}

#[cfg(test)]
mod tests {
    use super::deck_from_group;

    #[test]
    fn parses_channel_groups() {
        assert_eq!(deck_from_group("[Channel1]"), Some(1));
        assert_eq!(deck_from_group("[Channel4]"), Some(4));
        assert_eq!(deck_from_group("[Channel0]"), None);
        assert_eq!(deck_from_group("[Master]"), None);
        assert_eq!(deck_from_group("[Channel2"), None);
    }
}
