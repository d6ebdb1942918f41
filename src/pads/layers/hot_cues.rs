use super::{LayerBase, PadLayer};
use crate::host::{ConnectionId, Host, ValueChange};
use crate::pads::address::PadIndex;
use crate::pads::led::LedValue;

/// Eight hot cues starting after `offset`.
///
/// Pad *n* activates cue *n + offset*; with shift held it clears the cue.
/// LEDs follow each cue's status in the host, so cues set from elsewhere
/// show up here too.
#[derive(Debug)]
pub struct HotCuesLayer {
    base: LayerBase,
    offset: u8,
    connections: Vec<(PadIndex, ConnectionId)>,
}

impl HotCuesLayer {
    pub fn new(host: &mut dyn Host, group: &str, offset: u8) -> Self {
        let connections = PadIndex::all()
            .map(|pad| {
                let key = format!("hotcue_{}_status", pad.get() + offset);
                (pad, host.connect(group, &key))
            })
            .collect();

        Self {
            base: LayerBase::new(group),
            offset,
            connections,
        }
    }

    pub fn cue_for(&self, pad: PadIndex) -> u8 {
        pad.get() + self.offset
    }
}

impl PadLayer for HotCuesLayer {
    fn base_mut(&mut self) -> &mut LayerBase {
        &mut self.base
    }

    fn on_pad(&mut self, host: &mut dyn Host, pad: PadIndex, pressed: bool) {
        let operation = if self.base.shift { "clear" } else { "activatecue" };
        let key = format!("hotcue_{}_{}", self.cue_for(pad), operation);
        log::debug!(
            "{}: hot cue pad {} shift={} -> {}",
            self.base.group,
            pad.get(),
            self.base.shift,
            key
        );
        host.set_bool(&self.base.group, &key, pressed);
    }

    fn repaint(&mut self, host: &mut dyn Host) {
        for (_, connection) in &self.connections {
            host.trigger(*connection);
        }
    }

    fn close(&mut self, host: &mut dyn Host) {
        for (_, connection) in self.connections.drain(..) {
            host.disconnect(connection);
        }
    }

    fn on_value(&mut self, change: &ValueChange) {
        if let Some((pad, _)) = self
            .connections
            .iter()
            .find(|(_, id)| *id == change.connection)
        {
            self.base
                .output
                .set_led(*pad, LedValue::from_bool(change.value != 0.0));
        }
    }
}
