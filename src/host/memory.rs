use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use super::{ConnectionId, ControlStore, DeckPhysics, ScratchParams, ValueChange};

/// In-process host: a control value map with queued change delivery and a
/// bookkeeping-only platter model.
///
/// Mirrors the few host rules the pad layers rely on for feedback (hot cue
/// status, beat loop enable flags) so LEDs behave without a real mixer
/// attached.
#[derive(Debug, Default)]
pub struct MemoryHost {
    values: HashMap<(String, String), f64>,
    connections: BTreeMap<ConnectionId, (String, String)>,
    next_connection: u32,
    pending: VecDeque<ValueChange>,
    scratching: HashSet<usize>,
    write_count: u64,
    physics_count: u64,
    #[cfg(test)]
    physics: Vec<PhysicsCall>,
    #[cfg(test)]
    writes: Vec<(String, String, f64)>,
}

/// Record of a call into [`DeckPhysics`].
#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub enum PhysicsCall {
    ScratchEnable(usize, ScratchParams),
    ScratchDisable(usize),
    ScratchTick(usize, i32),
    Brake(usize),
    SoftStart(usize),
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set` calls so far.
    pub fn write_count(&self) -> u64 {
        self.write_count
    }

    /// Number of [`DeckPhysics`] calls that drive the deck, so far.
    pub fn physics_count(&self) -> u64 {
        self.physics_count
    }

    /// Every `set` call in order, including ones that did not change a value.
    #[cfg(test)]
    pub fn writes(&self) -> &[(String, String, f64)] {
        &self.writes
    }

    #[cfg(test)]
    pub fn physics(&self) -> &[PhysicsCall] {
        &self.physics
    }

    #[cfg(test)]
    pub fn clear_log(&mut self) {
        self.writes.clear();
        self.physics.clear();
    }

    fn store(&mut self, group: &str, key: &str, value: f64) {
        let slot = self
            .values
            .entry((group.to_string(), key.to_string()))
            .or_insert(0.0);
        if *slot == value {
            return;
        }
        *slot = value;

        for (id, (g, k)) in &self.connections {
            if g == group && k == key {
                self.pending.push_back(ValueChange {
                    connection: *id,
                    group: group.to_string(),
                    key: key.to_string(),
                    value,
                });
            }
        }
    }

    fn apply_rules(&mut self, group: &str, key: &str, value: f64) {
        if value == 0.0 {
            return;
        }

        if let Some((slot, action)) = split_indexed(key, "hotcue_") {
            let status = format!("hotcue_{slot}_status");
            match action {
                "activatecue" | "setloop" | "activateloop" | "cueloop" => {
                    if self.get(group, &status) == 0.0 {
                        self.store(group, &status, 1.0);
                    }
                }
                "clear" => self.store(group, &status, 0.0),
                _ => {}
            }
        } else if let Some((size, action)) = split_indexed(key, "beatloop_") {
            let enabled = format!("beatloop_{size}_enabled");
            match action {
                "activate" => {
                    let others: Vec<String> = self
                        .values
                        .iter()
                        .filter(|((g, k), v)| {
                            g == group && **v != 0.0 && k.ends_with("_enabled") && *k != enabled
                        })
                        .map(|((_, k), _)| k.clone())
                        .filter(|k| k.starts_with("beatloop_"))
                        .collect();
                    for other in others {
                        self.store(group, &other, 0.0);
                    }
                    self.store(group, &enabled, 1.0);
                }
                "toggle" => {
                    let on = self.get(group, &enabled) != 0.0;
                    self.store(group, &enabled, if on { 0.0 } else { 1.0 });
                }
                _ => {}
            }
        }
    }
}

/// Split `hotcue_3_clear` into `("3", "clear")` for the given prefix.
fn split_indexed<'a>(key: &'a str, prefix: &str) -> Option<(&'a str, &'a str)> {
    let rest = key.strip_prefix(prefix)?;
    let (index, action) = rest.split_once('_')?;
    index.parse::<f64>().ok()?;
    Some((index, action))
}

impl ControlStore for MemoryHost {
    fn get(&self, group: &str, key: &str) -> f64 {
        self.values
            .get(&(group.to_string(), key.to_string()))
            .copied()
            .unwrap_or(0.0)
    }

    fn set(&mut self, group: &str, key: &str, value: f64) {
        log::debug!("{group} {key} = {value}");
        self.write_count += 1;
        #[cfg(test)]
        self.writes
            .push((group.to_string(), key.to_string(), value));
        self.store(group, key, value);
        self.apply_rules(group, key, value);
    }

    fn connect(&mut self, group: &str, key: &str) -> ConnectionId {
        let id = ConnectionId(self.next_connection);
        self.next_connection += 1;
        self.connections
            .insert(id, (group.to_string(), key.to_string()));
        id
    }

    fn trigger(&mut self, connection: ConnectionId) {
        if let Some((group, key)) = self.connections.get(&connection).cloned() {
            let value = self.get(&group, &key);
            self.pending.push_back(ValueChange {
                connection,
                group,
                key,
                value,
            });
        }
    }

    fn disconnect(&mut self, connection: ConnectionId) {
        self.connections.remove(&connection);
        self.pending.retain(|change| change.connection != connection);
    }

    fn take_changes(&mut self) -> Vec<ValueChange> {
        self.pending.drain(..).collect()
    }
}

impl DeckPhysics for MemoryHost {
    fn scratch_enable(&mut self, deck: usize, params: ScratchParams) {
        log::info!("deck {deck}: scratch on");
        log::debug!("deck {deck}: {params:?}");
        self.scratching.insert(deck);
        self.physics_count += 1;
        #[cfg(test)]
        self.physics.push(PhysicsCall::ScratchEnable(deck, params));
    }

    fn scratch_disable(&mut self, deck: usize, _ramp: bool) {
        log::info!("deck {deck}: scratch off");
        self.scratching.remove(&deck);
        self.physics_count += 1;
        #[cfg(test)]
        self.physics.push(PhysicsCall::ScratchDisable(deck));
    }

    fn scratch_tick(&mut self, deck: usize, delta: i32) {
        log::trace!("deck {deck}: scratch tick {delta}");
        self.physics_count += 1;
        #[cfg(test)]
        self.physics.push(PhysicsCall::ScratchTick(deck, delta));
    }

    fn is_scratching(&self, deck: usize) -> bool {
        self.scratching.contains(&deck)
    }

    fn brake(&mut self, deck: usize, factor: f64) {
        log::info!("deck {deck}: brake ({factor})");
        self.store(&format!("[Channel{deck}]"), "play_latched", 0.0);
        self.physics_count += 1;
        #[cfg(test)]
        self.physics.push(PhysicsCall::Brake(deck));
    }

    fn soft_start(&mut self, deck: usize, factor: f64) {
        log::info!("deck {deck}: soft start ({factor})");
        self.store(&format!("[Channel{deck}]"), "play_latched", 1.0);
        self.physics_count += 1;
        #[cfg(test)]
        self.physics.push(PhysicsCall::SoftStart(deck));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connected_controls_queue_changes() {
        let mut host = MemoryHost::new();
        let id = host.connect("[Channel1]", "slip_enabled");

        host.set("[Channel1]", "slip_enabled", 1.0);
        host.set("[Channel1]", "slip_enabled", 1.0);
        host.set("[Channel2]", "slip_enabled", 1.0);

        let changes = host.take_changes();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].connection, id);
        assert_eq!(changes[0].value, 1.0);
        assert!(host.take_changes().is_empty());
    }

    #[test]
    fn trigger_delivers_current_value() {
        let mut host = MemoryHost::new();
        host.set("[Channel1]", "hotcue_1_status", 1.0);
        let id = host.connect("[Channel1]", "hotcue_1_status");

        host.trigger(id);
        let changes = host.take_changes();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].value, 1.0);
    }

    #[test]
    fn disconnect_drops_pending_deliveries() {
        let mut host = MemoryHost::new();
        let id = host.connect("[Channel1]", "reverse");
        host.set("[Channel1]", "reverse", 1.0);
        host.disconnect(id);
        assert!(host.take_changes().is_empty());
    }

    #[test]
    fn hot_cue_rules_track_status() {
        let mut host = MemoryHost::new();
        host.set("[Channel1]", "hotcue_11_activatecue", 1.0);
        assert_eq!(host.get("[Channel1]", "hotcue_11_status"), 1.0);
        host.set("[Channel1]", "hotcue_11_clear", 1.0);
        assert_eq!(host.get("[Channel1]", "hotcue_11_status"), 0.0);
    }

    #[test]
    fn beat_loop_rules_track_enabled() {
        let mut host = MemoryHost::new();
        host.set("[Channel1]", "beatloop_2_activate", 1.0);
        assert!(host.get_bool("[Channel1]", "beatloop_2_enabled"));

        host.set("[Channel1]", "beatloop_0.5_activate", 1.0);
        assert!(!host.get_bool("[Channel1]", "beatloop_2_enabled"));
        assert!(host.get_bool("[Channel1]", "beatloop_0.5_enabled"));

        host.set("[Channel1]", "beatloop_0.5_toggle", 1.0);
        assert!(!host.get_bool("[Channel1]", "beatloop_0.5_enabled"));
    }

    #[test]
    fn scratching_is_tracked_per_deck() {
        let mut host = MemoryHost::new();
        let params = ScratchParams {
            ticks_per_revolution: 1400,
            rpm: 33.3,
            alpha: 0.125,
            beta: 0.125 / 32.0,
            ramp: true,
        };
        host.scratch_enable(2, params);
        assert!(host.is_scratching(2));
        assert!(!host.is_scratching(1));
        host.scratch_disable(2, false);
        assert!(!host.is_scratching(2));
        assert_eq!(host.physics().len(), 2);
    }

    #[test]
    fn counters_track_every_call() {
        let mut host = MemoryHost::new();
        host.set("[Channel1]", "jog", 0.5);
        host.set("[Channel1]", "jog", 0.5);
        host.scratch_tick(1, 3);
        host.brake(1, 0.5);

        assert_eq!(host.write_count(), 2);
        assert_eq!(host.physics_count(), 2);
        host.clear_log();
        assert_eq!(host.write_count(), 2);
    }
}
