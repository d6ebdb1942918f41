use super::{LayerBase, PadLayer};
use crate::host::{deck_from_group, Host};
use crate::pads::address::PadIndex;
use crate::pads::led::LedValue;

/// Assorted performance controls.
///
/// | pad | action                                  |
/// |-----|-----------------------------------------|
/// | 1   | activate loop on hot cue 1              |
/// | 2   | cue loop on hot cue 1                   |
/// | 3   | activate loop on hot cue 2              |
/// | 4   | cue loop on hot cue 2                   |
/// | 5   | move beat grid to play position (held) |
/// | 6   | slip mode toggle                        |
/// | 7   | reverse toggle, shift: reverse roll     |
/// | 8   | brake or soft start                     |
#[derive(Debug)]
pub struct SandboxLayer {
    base: LayerBase,
    deck: Option<usize>,
    brake_factor: f64,
    translating: bool,
    reverse_rolling: bool,
}

impl SandboxLayer {
    pub fn new(group: &str, brake_factor: f64) -> Self {
        let deck = deck_from_group(group);
        if deck.is_none() {
            log::warn!("{group} is not a deck, brake pad disabled");
        }
        Self {
            base: LayerBase::new(group),
            deck,
            brake_factor,
            translating: false,
            reverse_rolling: false,
        }
    }

    fn toggle(&self, host: &mut dyn Host, key: &str) -> bool {
        let on = !host.get_bool(&self.base.group, key);
        host.set_bool(&self.base.group, key, on);
        on
    }

    /// Shift picks the roll on press. Once rolling, the release ends the
    /// roll whatever shift is doing by then.
    fn reverse(&mut self, host: &mut dyn Host, pad: PadIndex, pressed: bool) {
        if (pressed && self.base.shift) || (!pressed && self.reverse_rolling) {
            self.reverse_rolling = pressed;
            self.base.output.set_led(pad, LedValue::from_bool(pressed));
            host.set_bool(&self.base.group, "reverseroll", pressed);
        } else if pressed {
            let on = self.toggle(host, "reverse");
            self.base.output.set_led(pad, LedValue::from_bool(on));
        }
    }

    fn brake(&self, host: &mut dyn Host) {
        let Some(deck) = self.deck else {
            return;
        };
        if host.get_bool(&self.base.group, "play_latched") {
            host.brake(deck, self.brake_factor);
        } else {
            host.soft_start(deck, self.brake_factor);
        }
    }
}

impl PadLayer for SandboxLayer {
    fn base_mut(&mut self) -> &mut LayerBase {
        &mut self.base
    }

    fn on_pad(&mut self, host: &mut dyn Host, pad: PadIndex, pressed: bool) {
        log::debug!("{}: sandbox pad {} {}", self.base.group, pad.get(), pressed);
        let group = self.base.group.clone();
        match pad.get() {
            1 if pressed => host.set(&group, "hotcue_1_activateloop", 1.0),
            2 if pressed => host.set(&group, "hotcue_1_cueloop", 1.0),
            3 if pressed => host.set(&group, "hotcue_2_activateloop", 1.0),
            4 if pressed => host.set(&group, "hotcue_2_cueloop", 1.0),
            5 => {
                self.translating = pressed;
                host.set_bool(&group, "beats_translate_curpos", pressed);
            }
            6 if pressed => {
                self.toggle(host, "slip_enabled");
            }
            7 => self.reverse(host, pad, pressed),
            8 if pressed => self.brake(host),
            _ => {}
        }
    }

    fn release_held(&mut self, host: &mut dyn Host) {
        if std::mem::take(&mut self.translating) {
            host.set_bool(&self.base.group, "beats_translate_curpos", false);
        }
        if self.reverse_rolling {
            if let Some(pad) = PadIndex::new(7) {
                self.reverse(host, pad, false);
            }
        }
    }
}
