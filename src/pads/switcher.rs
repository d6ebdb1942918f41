use crate::host::{Host, ValueChange};

use super::address::PadIndex;
use super::layers::{
    AutoLoopLayer, BeatJumpLayer, CueLoopLayer, DeckSettingsLayer, HotCuesLayer, Layer,
    LayerBase, LoopRollLayer, PadLayer, SandboxLayer, CUE_LOOP_OFFSET,
};
use super::led::LedValue;

/// Hot cues on the first page use slots 1-8, the second page 9-16.
const HOT_CUE_BANK_A: u8 = 0;
const HOT_CUE_BANK_B: u8 = 8;

/// Shown while the layer select button is active. Pad *n* picks layer *n*:
///
/// ```text
/// [hot cues 9-16][loop roll ][cue loop  ][sandbox      ]
/// [hot cues 1-8 ][auto loop ][beat jump ][deck settings]
/// ```
#[derive(Debug)]
pub struct LayerSwitcher {
    base: LayerBase,
    layers: Vec<Layer>,
    current: PadIndex,
}

impl LayerSwitcher {
    pub fn new(host: &mut dyn Host, group: &str, brake_factor: f64) -> Self {
        let layers = vec![
            Layer::HotCues(HotCuesLayer::new(host, group, HOT_CUE_BANK_B)),
            Layer::LoopRoll(LoopRollLayer::new(group)),
            Layer::CueLoop(CueLoopLayer::new(host, group, CUE_LOOP_OFFSET)),
            Layer::Sandbox(SandboxLayer::new(group, brake_factor)),
            Layer::HotCues(HotCuesLayer::new(host, group, HOT_CUE_BANK_A)),
            Layer::AutoLoop(AutoLoopLayer::new(group)),
            Layer::BeatJump(BeatJumpLayer::new(group)),
            Layer::DeckSettings(DeckSettingsLayer::new(group)),
        ];

        Self {
            base: LayerBase::new(group),
            layers,
            current: PadIndex::FIRST,
        }
    }

    pub fn current(&self) -> PadIndex {
        self.current
    }

    pub fn current_layer(&mut self) -> &mut dyn PadLayer {
        let slot = usize::from(self.current.get() - 1);
        self.layers[slot].as_pad_layer()
    }

    pub fn current_name(&self) -> &'static str {
        self.layers[usize::from(self.current.get() - 1)].name()
    }
}

impl PadLayer for LayerSwitcher {
    fn base_mut(&mut self) -> &mut LayerBase {
        &mut self.base
    }

    fn on_pad(&mut self, host: &mut dyn Host, pad: PadIndex, pressed: bool) {
        if !pressed {
            return;
        }
        self.current = pad;
        log::info!("{}: layer {} ({})", self.base.group, pad.get(), self.current_name());
        self.repaint(host);
    }

    fn repaint(&mut self, _host: &mut dyn Host) {
        self.base.output.clear_all();
        self.base.output.set_led(self.current, LedValue::On);
    }

    fn close(&mut self, host: &mut dyn Host) {
        for layer in &mut self.layers {
            layer.as_pad_layer().close(host);
        }
    }

    /// Host deliveries reach every layer. Hidden ones draw into the null
    /// output, so only the visible layer shows them.
    fn on_value(&mut self, change: &ValueChange) {
        for layer in &mut self.layers {
            layer.as_pad_layer().on_value(change);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;
    use crate::pads::layers::testing::{connect_and_capture, keys, pad, press};
    use crate::pads::output::testing::screen;

    #[test]
    fn starts_on_second_hot_cue_bank() {
        let mut host = MemoryHost::new();
        let mut switcher = LayerSwitcher::new(&mut host, "[Channel1]", 0.5);
        assert_eq!(switcher.current().get(), 1);
        assert_eq!(switcher.current_name(), "hot cues");

        press(switcher.current_layer(), &mut host, 1);
        assert_eq!(keys(&host)[0], "hotcue_9_activatecue");
    }

    #[test]
    fn pad_selects_layer_and_lights_alone() {
        let mut host = MemoryHost::new();
        let mut switcher = LayerSwitcher::new(&mut host, "[Channel1]", 0.5);
        let (rx, mut pattern) = connect_and_capture(&mut switcher, &mut host);
        assert_eq!(pattern[&1], 0x40);
        assert!((2..=8).all(|n| pattern[&n] == 0x00));

        switcher.on_pad(&mut host, pad(7), true);
        screen(&rx, &mut pattern);
        assert_eq!(pattern[&7], 0x40);
        assert!((1..=6).chain(8..=8).all(|n| pattern[&n] == 0x00));

        switcher.on_pad(&mut host, pad(3), false);
        assert_eq!(switcher.current_name(), "beat jump");
    }

    #[test]
    fn layer_order_matches_pad_grid() {
        let mut host = MemoryHost::new();
        let mut switcher = LayerSwitcher::new(&mut host, "[Channel1]", 0.5);
        let names: Vec<&str> = PadIndex::all()
            .map(|p| {
                switcher.on_pad(&mut host, p, true);
                switcher.current_name()
            })
            .collect();
        assert_eq!(
            names,
            vec![
                "hot cues",
                "loop roll",
                "cue loop",
                "sandbox",
                "hot cues",
                "auto loop",
                "beat jump",
                "deck settings",
            ]
        );
    }
}
