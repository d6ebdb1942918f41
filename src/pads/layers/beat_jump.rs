use super::{LayerBase, PadLayer};
use crate::host::Host;
use crate::pads::address::PadIndex;
use crate::pads::led::LedValue;

/// Beats and direction per pad: left column jumps back, right column forward.
const JUMPS: [(u32, &str); 8] = [
    (1, "backward"),
    (1, "forward"),
    (4, "backward"),
    (4, "forward"),
    (16, "backward"),
    (16, "forward"),
    (32, "backward"),
    (32, "forward"),
];

/// Fixed beat jumps, fired on press.
#[derive(Debug)]
pub struct BeatJumpLayer {
    base: LayerBase,
}

impl BeatJumpLayer {
    pub fn new(group: &str) -> Self {
        Self {
            base: LayerBase::new(group),
        }
    }
}

impl PadLayer for BeatJumpLayer {
    fn base_mut(&mut self) -> &mut LayerBase {
        &mut self.base
    }

    fn on_pad(&mut self, host: &mut dyn Host, pad: PadIndex, pressed: bool) {
        if !pressed {
            return;
        }
        let Some((beats, direction)) = JUMPS.get(usize::from(pad.get() - 1)) else {
            return;
        };
        let key = format!("beatjump_{beats}_{direction}");
        log::debug!("{}: beat jump pad {} -> {}", self.base.group, pad.get(), key);
        host.set(&self.base.group, &key, 1.0);
    }

    fn repaint(&mut self, _host: &mut dyn Host) {
        for pad in PadIndex::all() {
            let value = if pad.get() % 2 == 1 {
                LedValue::Half
            } else {
                LedValue::On
            };
            self.base.output.set_led(pad, value);
        }
    }
}
