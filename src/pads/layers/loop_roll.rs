use super::{LayerBase, PadLayer};
use crate::host::Host;
use crate::pads::address::PadIndex;
use crate::pads::led::LedValue;

const ROLL_BEATS: [f64; 8] = [1.0, 0.5, 0.25, 0.125, 0.0625, 0.03125, 2.0, 4.0];

/// Momentary loop rolls, held for as long as the pad is.
///
/// Shift disables new rolls. A roll started before shift went down still
/// ends when its pad is released.
#[derive(Debug)]
pub struct LoopRollLayer {
    base: LayerBase,
    held: [bool; 8],
}

impl LoopRollLayer {
    pub fn new(group: &str) -> Self {
        Self {
            base: LayerBase::new(group),
            held: [false; 8],
        }
    }
}

impl PadLayer for LoopRollLayer {
    fn base_mut(&mut self) -> &mut LayerBase {
        &mut self.base
    }

    fn on_pad(&mut self, host: &mut dyn Host, pad: PadIndex, pressed: bool) {
        let slot = usize::from(pad.get() - 1);
        if pressed && self.base.shift {
            return;
        }
        if !pressed && !self.held[slot] {
            return;
        }
        self.held[slot] = pressed;
        log::debug!("{}: loop roll pad {} {}", self.base.group, pad.get(), pressed);
        self.roll(host, pad, pressed);
    }

    fn release_held(&mut self, host: &mut dyn Host) {
        for pad in PadIndex::all() {
            let slot = usize::from(pad.get() - 1);
            if std::mem::take(&mut self.held[slot]) {
                log::debug!("{}: loop roll pad {} let go", self.base.group, pad.get());
                self.roll(host, pad, false);
            }
        }
    }
}

impl LoopRollLayer {
    fn roll(&self, host: &mut dyn Host, pad: PadIndex, on: bool) {
        let size = ROLL_BEATS[usize::from(pad.get() - 1)];
        let key = format!("beatlooproll_{size}_activate");
        self.base.output.set_led(pad, LedValue::from_bool(on));
        host.set_bool(&self.base.group, &key, on);
    }
}
