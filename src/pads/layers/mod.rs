//! Pad layers: interchangeable meanings for one group's eight pads.
//!
//! Only the layer that currently owns the group's [`Output`] is visible;
//! every other layer keeps drawing into [`Output::Null`]. Cue and loop state
//! lives in the host, so swapping layers never loses anything.

mod auto_loop;
mod beat_jump;
mod cue_loop;
mod deck_settings;
mod hot_cues;
mod loop_roll;
mod sandbox;

pub use auto_loop::AutoLoopLayer;
pub use beat_jump::BeatJumpLayer;
pub use cue_loop::{CueLoopLayer, CUE_LOOP_OFFSET};
pub use deck_settings::DeckSettingsLayer;
pub use hot_cues::HotCuesLayer;
pub use loop_roll::LoopRollLayer;
pub use sandbox::SandboxLayer;

use crate::host::{Host, ValueChange};

use super::address::PadIndex;
use super::output::Output;

/// State every layer carries.
#[derive(Debug, Clone)]
pub struct LayerBase {
    pub group: String,
    pub output: Output,
    pub shift: bool,
}

impl LayerBase {
    pub fn new(group: &str) -> Self {
        Self {
            group: group.to_string(),
            output: Output::Null,
            shift: false,
        }
    }
}

/// Behaviour shared by all layers, including the layer switcher.
pub trait PadLayer {
    fn base_mut(&mut self) -> &mut LayerBase;

    fn on_pad(&mut self, host: &mut dyn Host, pad: PadIndex, pressed: bool);

    fn on_shift(&mut self, pressed: bool) {
        self.base_mut().shift = pressed;
    }

    /// Draw the layer's steady-state LEDs onto its output.
    fn repaint(&mut self, _host: &mut dyn Host) {}

    /// A value arrived for one of the layer's host connections.
    fn on_value(&mut self, _change: &ValueChange) {}

    /// Take over `output` and draw onto it immediately.
    fn connect(&mut self, host: &mut dyn Host, output: Output) {
        self.base_mut().output = output;
        self.repaint(host);
    }

    /// Give up the output. Nothing is redrawn.
    fn disconnect(&mut self) {
        self.base_mut().output = Output::Null;
    }

    /// End anything that only lasts while a pad is held. Called before the
    /// layer loses its pads, since their releases will go elsewhere.
    fn release_held(&mut self, _host: &mut dyn Host) {}

    /// Drop the layer's host connections for good.
    fn close(&mut self, _host: &mut dyn Host) {}
}

/// One concrete pad layer.
#[derive(Debug)]
pub enum Layer {
    HotCues(HotCuesLayer),
    BeatJump(BeatJumpLayer),
    AutoLoop(AutoLoopLayer),
    LoopRoll(LoopRollLayer),
    DeckSettings(DeckSettingsLayer),
    CueLoop(CueLoopLayer),
    Sandbox(SandboxLayer),
}

impl Layer {
    pub fn name(&self) -> &'static str {
        match self {
            Layer::HotCues(_) => "hot cues",
            Layer::BeatJump(_) => "beat jump",
            Layer::AutoLoop(_) => "auto loop",
            Layer::LoopRoll(_) => "loop roll",
            Layer::DeckSettings(_) => "deck settings",
            Layer::CueLoop(_) => "cue loop",
            Layer::Sandbox(_) => "sandbox",
        }
    }

    pub fn as_pad_layer(&mut self) -> &mut dyn PadLayer {
        match self {
            Layer::HotCues(layer) => layer,
            Layer::BeatJump(layer) => layer,
            Layer::AutoLoop(layer) => layer,
            Layer::LoopRoll(layer) => layer,
            Layer::DeckSettings(layer) => layer,
            Layer::CueLoop(layer) => layer,
            Layer::Sandbox(layer) => layer,
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::BTreeMap;
    use std::sync::mpsc::Receiver;

    use super::*;
    use crate::host::{ControlStore, MemoryHost};
    use crate::pads::output::{testing, ShortMessage};

    pub fn pad(number: u8) -> PadIndex {
        PadIndex::new(number).unwrap()
    }

    pub fn press(layer: &mut dyn PadLayer, host: &mut MemoryHost, number: u8) {
        layer.on_pad(host, pad(number), true);
        layer.on_pad(host, pad(number), false);
    }

    /// Route queued host deliveries back into the layer, like the router does.
    pub fn deliver(layer: &mut dyn PadLayer, host: &mut MemoryHost) {
        for change in host.take_changes() {
            layer.on_value(&change);
        }
    }

    /// Connect `layer` to a fresh device output and return the LED pattern it drew.
    pub fn connect_and_capture(
        layer: &mut dyn PadLayer,
        host: &mut MemoryHost,
    ) -> (Receiver<ShortMessage>, BTreeMap<u8, u8>) {
        let (output, rx) = testing::device_output();
        layer.connect(host, output);
        deliver(layer, host);
        let pattern = testing::pattern(&rx);
        (rx, pattern)
    }

    pub fn keys(host: &MemoryHost) -> Vec<String> {
        host.writes().iter().map(|(_, key, _)| key.clone()).collect()
    }
}
