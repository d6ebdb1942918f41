use super::{LayerBase, PadLayer};
use crate::host::Host;
use crate::pads::address::PadIndex;
use crate::pads::led::LedValue;

const LOOP_BEATS: [f64; 6] = [1.0, 2.0, 4.0, 8.0, 16.0, 32.0];
const SHIFTED_LOOP_BEATS: [f64; 6] = [1.0, 0.5, 0.25, 0.125, 0.0625, 0.03125];

/// Beat loops on pads 1-6 (fractions with shift), halve/double on 7/8.
#[derive(Debug)]
pub struct AutoLoopLayer {
    base: LayerBase,
}

impl AutoLoopLayer {
    pub fn new(group: &str) -> Self {
        Self {
            base: LayerBase::new(group),
        }
    }

    fn loop_size(&self, pad: PadIndex) -> Option<f64> {
        let table = if self.base.shift {
            &SHIFTED_LOOP_BEATS
        } else {
            &LOOP_BEATS
        };
        table.get(usize::from(pad.get() - 1)).copied()
    }
}

impl PadLayer for AutoLoopLayer {
    fn base_mut(&mut self) -> &mut LayerBase {
        &mut self.base
    }

    fn on_pad(&mut self, host: &mut dyn Host, pad: PadIndex, pressed: bool) {
        if !pressed {
            return;
        }

        let group = self.base.group.clone();
        let key = match (pad.get(), self.loop_size(pad)) {
            (_, Some(size)) => {
                let enabled = host.get_bool(&group, &format!("beatloop_{size}_enabled"));
                let action = if enabled { "toggle" } else { "activate" };
                format!("beatloop_{size}_{action}")
            }
            (7, None) if self.base.shift => "reloop_toggle".to_string(),
            (7, None) => "loop_halve".to_string(),
            (8, None) if self.base.shift => "reloop_toggle".to_string(),
            (8, None) => "loop_double".to_string(),
            _ => return,
        };
        log::debug!("{group}: auto loop pad {} -> {key}", pad.get());
        host.set(&group, &key, 1.0);
    }

    fn repaint(&mut self, _host: &mut dyn Host) {
        for pad in PadIndex::all() {
            let value = if pad.get() < 7 {
                LedValue::On
            } else {
                LedValue::Half
            };
            self.base.output.set_led(pad, value);
        }
    }
}
