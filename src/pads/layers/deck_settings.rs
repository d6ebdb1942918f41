use super::{LayerBase, PadLayer};
use crate::host::Host;
use crate::pads::address::PadIndex;
use crate::pads::led::LedValue;

const PITCH_RANGES: [f64; 4] = [0.08, 0.16, 0.50, 1.0];

/// Setting chosen by holding one of pads 1-3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    PitchRange,
    Orientation,
    Sync,
}

impl Mode {
    fn from_pad(pad: u8) -> Option<Self> {
        match pad {
            1 => Some(Self::PitchRange),
            2 => Some(Self::Orientation),
            3 => Some(Self::Sync),
            _ => None,
        }
    }

    fn pad(self) -> u8 {
        match self {
            Self::PitchRange => 1,
            Self::Orientation => 2,
            Self::Sync => 3,
        }
    }
}

/// Two-stage deck settings.
///
/// Hold pad 1 (pitch range), 2 (crossfader orientation) or 3 (sync) and
/// press one of pads 5-8 to pick value 1-4. With nothing held, pads 5-8 are
/// sync key, reset key, pitch down and pitch up.
#[derive(Debug)]
pub struct DeckSettingsLayer {
    base: LayerBase,
    mode: Option<Mode>,
}

impl DeckSettingsLayer {
    pub fn new(group: &str) -> Self {
        Self {
            base: LayerBase::new(group),
            mode: None,
        }
    }

    fn apply(&self, host: &mut dyn Host, value: u8) {
        let group = &self.base.group;
        match self.mode {
            Some(Mode::PitchRange) => {
                let range = PITCH_RANGES[usize::from(value - 1)];
                log::debug!("{group}: pitch range {range}");
                host.set(group, "rateRange", range);
            }
            Some(Mode::Orientation) => {
                if value < 4 {
                    log::debug!("{group}: crossfader orientation {}", value - 1);
                    host.set(group, "orientation", f64::from(value - 1));
                }
            }
            Some(Mode::Sync) => {
                log::debug!("{group}: sync setting {value} has no action");
            }
            None => {
                let key = match value {
                    1 => "sync_key",
                    2 => "reset_key",
                    3 => "pitch_down",
                    _ => "pitch_up",
                };
                log::debug!("{group}: key action {key}");
                host.set(group, key, 1.0);
            }
        }
    }

    fn paint_modes(&self) {
        for number in 1..=3 {
            if let Some(pad) = PadIndex::new(number) {
                let value = if self.mode.map(Mode::pad) == Some(number) {
                    LedValue::On
                } else {
                    LedValue::Half
                };
                self.base.output.set_led(pad, value);
            }
        }
    }
}

impl PadLayer for DeckSettingsLayer {
    fn base_mut(&mut self) -> &mut LayerBase {
        &mut self.base
    }

    fn on_pad(&mut self, host: &mut dyn Host, pad: PadIndex, pressed: bool) {
        match pad.get() {
            number @ 1..=3 => {
                self.mode = if pressed { Mode::from_pad(number) } else { None };
                log::debug!("{}: settings mode {:?}", self.base.group, self.mode);
                self.paint_modes();
            }
            // Reserved.
            4 => {}
            number if pressed => self.apply(host, number - 4),
            _ => {}
        }
    }

    fn repaint(&mut self, _host: &mut dyn Host) {
        self.paint_modes();
        for number in 4..=8 {
            if let Some(pad) = PadIndex::new(number) {
                let value = if number == 4 {
                    LedValue::Off
                } else {
                    LedValue::On
                };
                self.base.output.set_led(pad, value);
            }
        }
    }

    fn disconnect(&mut self) {
        self.mode = None;
        self.base.output = crate::pads::output::Output::Null;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;
    use crate::pads::layers::testing::{connect_and_capture, keys, pad, press};
    use crate::pads::output::testing::screen;

    #[test]
    fn held_mode_sets_pitch_range() {
        let mut host = MemoryHost::new();
        let mut layer = DeckSettingsLayer::new("[Channel1]");

        layer.on_pad(&mut host, pad(1), true);
        press(&mut layer, &mut host, 7);
        layer.on_pad(&mut host, pad(1), false);

        assert_eq!(
            host.writes(),
            &[("[Channel1]".to_string(), "rateRange".to_string(), 0.50)]
        );
    }

    #[test]
    fn held_mode_sets_orientation_for_first_three_values() {
        let mut host = MemoryHost::new();
        let mut layer = DeckSettingsLayer::new("[Channel1]");

        layer.on_pad(&mut host, pad(2), true);
        press(&mut layer, &mut host, 5);
        press(&mut layer, &mut host, 7);
        press(&mut layer, &mut host, 8);

        let values: Vec<f64> = host.writes().iter().map(|(_, _, v)| *v).collect();
        assert_eq!(keys(&host), vec!["orientation", "orientation"]);
        assert_eq!(values, vec![0.0, 2.0]);
    }

    #[test]
    fn sync_mode_is_a_placeholder() {
        let mut host = MemoryHost::new();
        let mut layer = DeckSettingsLayer::new("[Channel1]");

        layer.on_pad(&mut host, pad(3), true);
        press(&mut layer, &mut host, 6);
        assert!(keys(&host).is_empty());
    }

    #[test]
    fn releasing_mode_returns_to_key_actions() {
        let mut host = MemoryHost::new();
        let mut layer = DeckSettingsLayer::new("[Channel1]");

        layer.on_pad(&mut host, pad(1), true);
        layer.on_pad(&mut host, pad(1), false);
        for number in 5..=8 {
            press(&mut layer, &mut host, number);
        }
        press(&mut layer, &mut host, 4);

        assert_eq!(
            keys(&host),
            vec!["sync_key", "reset_key", "pitch_down", "pitch_up"]
        );
    }

    #[test]
    fn held_mode_pad_lights_up() {
        let mut host = MemoryHost::new();
        let mut layer = DeckSettingsLayer::new("[Channel1]");
        let (rx, mut pattern) = connect_and_capture(&mut layer, &mut host);
        assert_eq!(pattern[&1], 0x03);
        assert_eq!(pattern[&4], 0x00);
        assert_eq!(pattern[&5], 0x40);

        layer.on_pad(&mut host, pad(2), true);
        screen(&rx, &mut pattern);
        assert_eq!(pattern[&2], 0x40);
        assert_eq!(pattern[&1], 0x03);

        layer.on_pad(&mut host, pad(2), false);
        screen(&rx, &mut pattern);
        assert_eq!(pattern[&2], 0x03);
    }
}
