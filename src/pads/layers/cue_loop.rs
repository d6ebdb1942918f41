use super::{LayerBase, PadLayer};
use crate::host::{ConnectionId, Host, ValueChange};
use crate::pads::address::PadIndex;
use crate::pads::led::LedValue;

/// Cue loops live on the hot cue slots after this many regular cues.
pub const CUE_LOOP_OFFSET: u8 = 16;

const LOOP_PADS: u8 = 7;

/// Seven saved loops and a reloop pad.
///
/// An empty slot saves a loop at the play position, a set one jumps to it
/// and loops. Shift clears the slot. Pad 8 toggles the last loop.
#[derive(Debug)]
pub struct CueLoopLayer {
    base: LayerBase,
    offset: u8,
    connections: Vec<(PadIndex, ConnectionId)>,
}

impl CueLoopLayer {
    pub fn new(host: &mut dyn Host, group: &str, offset: u8) -> Self {
        let connections = PadIndex::all()
            .filter(|pad| pad.get() <= LOOP_PADS)
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
}

impl PadLayer for CueLoopLayer {
    fn base_mut(&mut self) -> &mut LayerBase {
        &mut self.base
    }

    fn on_pad(&mut self, host: &mut dyn Host, pad: PadIndex, pressed: bool) {
        if !pressed {
            return;
        }

        let group = self.base.group.clone();
        if pad.get() > LOOP_PADS {
            log::debug!("{group}: cue loop reloop");
            host.set(&group, "reloop_toggle", 1.0);
            return;
        }

        let slot = pad.get() + self.offset;
        let action = if self.base.shift {
            "clear"
        } else if host.get(&group, &format!("hotcue_{slot}_status")) > 0.0 {
            "gotoandloop"
        } else {
            "setloop"
        };
        let key = format!("hotcue_{slot}_{action}");
        log::debug!("{group}: cue loop pad {} -> {key}", pad.get());
        host.set(&group, &key, 1.0);
    }

    fn repaint(&mut self, host: &mut dyn Host) {
        for (_, connection) in &self.connections {
            host.trigger(*connection);
        }
        if let Some(reloop) = PadIndex::new(LOOP_PADS + 1) {
            self.base.output.set_led(reloop, LedValue::Half);
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
