use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Controller profile, loaded from YAML.
///
/// Every field has a default matching the Numark Mixtrack Platinum, so an
/// empty file (or no file at all) produces a working setup.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Settings {
    pub client_name: String,
    /// Substring of the controller's MIDI input port name. Empty picks the first port.
    pub input_port: String,
    /// Substring of the controller's MIDI output port name. Empty picks the first port.
    pub output_port: String,
    pub groups: Vec<GroupSettings>,
    pub pads: PadSettings,
    pub buttons: ButtonSettings,
    pub leds: LedSettings,
    pub layer_select: LayerSelectMode,
    pub scratch: ScratchSettings,
    pub sysex: SysexSettings,
    /// Strength passed to brake and soft-start from the sandbox layer.
    pub brake_factor: f64,
}

/// One logical group (deck) with its MIDI channels.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GroupSettings {
    /// Host group name, e.g. `[Channel1]`.
    pub name: String,
    /// Channel carrying the pad notes and pad LEDs.
    pub pad_channel: u8,
    /// Channel carrying the deck's own buttons (shift, wheel, layer select).
    pub deck_channel: u8,
}

/// The two contiguous 8-wide note ranges the pads send on.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PadSettings {
    pub unshifted_base: u8,
    pub shifted_base: u8,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ButtonSettings {
    pub shift: u8,
    pub layer_select: u8,
    pub wheel_touch: u8,
    /// Control change number of the wheel rotation.
    pub wheel_turn: u8,
}

/// Device bytes for each LED intensity. These differ between hardware
/// revisions, so they live in the profile.
#[derive(Deserialize, Debug, Clone, Copy)]
#[serde(default)]
pub struct LedSettings {
    pub on: u8,
    pub half: u8,
    pub off: u8,
}

/// System exclusive messages framing a session. An empty list sends nothing.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SysexSettings {
    /// Stops the demo animation. Sent before any LED is drawn.
    pub exit_demo: Vec<u8>,
    /// Sent last on exit.
    pub shutdown: Vec<u8>,
}

/// How the layer-select button enters and leaves layer-select mode.
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LayerSelectMode {
    /// Active while the button is held.
    #[default]
    Hold,
    /// Each press flips the mode, releases are ignored.
    Toggle,
}

/// Jog wheel tuning.
///
/// The inertia thresholds and filter constants were tuned against one audio
/// buffer size (2.9 ms, two decks). Larger buffers make the LED ring lag the
/// platter; adjust `ticks_per_revolution` first when that happens.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ScratchSettings {
    /// Touch-sensitive wheel. When off, touching the platter does not scratch.
    pub vinyl_mode: bool,
    pub ticks_per_revolution: u32,
    pub rpm: f64,
    pub alpha: f64,
    pub beta: f64,
    pub ramp: bool,
    pub inertia_period_ms: u64,
    /// Coasting stops once forward motion per period is at or below this.
    pub forward_stop_ticks: u32,
    /// Coasting stops once backward motion per period is at or below this.
    pub backward_stop_ticks: u32,
    /// Accumulated wheel motion per beat-jump while shift is held.
    pub beatjump_ticks: u32,
    pub search_scale: f64,
    pub jog_scale: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            client_name: "Mixtrack Layers".to_string(),
            input_port: "Mixtrack Platinum".to_string(),
            output_port: "Mixtrack Platinum".to_string(),
            groups: (0..4)
                .map(|i| GroupSettings {
                    name: format!("[Channel{}]", i + 1),
                    pad_channel: 0x04 + i,
                    deck_channel: i,
                })
                .collect(),
            pads: PadSettings::default(),
            buttons: ButtonSettings::default(),
            leds: LedSettings::default(),
            layer_select: LayerSelectMode::default(),
            scratch: ScratchSettings::default(),
            sysex: SysexSettings::default(),
            brake_factor: 0.5,
        }
    }
}

impl Default for PadSettings {
    fn default() -> Self {
        Self {
            unshifted_base: 0x14,
            shifted_base: 0x1C,
        }
    }
}

impl Default for ButtonSettings {
    fn default() -> Self {
        Self {
            shift: 0x20,
            layer_select: 0x07,
            wheel_touch: 0x06,
            wheel_turn: 0x06,
        }
    }
}

impl Default for LedSettings {
    fn default() -> Self {
        Self {
            on: 0x40,
            half: 0x03,
            off: 0x00,
        }
    }
}

impl Default for SysexSettings {
    fn default() -> Self {
        Self {
            exit_demo: vec![
                0xF0, 0x00, 0x01, 0x3F, 0x7F, 0x3A, 0x60, 0x00, 0x04, 0x04, 0x01, 0x00, 0x00, 0xF7,
            ],
            shutdown: vec![0xF0, 0x00, 0x20, 0x7F, 0x02, 0xF7],
        }
    }
}

impl Default for ScratchSettings {
    fn default() -> Self {
        let alpha = 1.0 / 8.0;
        Self {
            vinyl_mode: true,
            ticks_per_revolution: 1400,
            rpm: 33.0 + 1.0 / 3.0,
            alpha,
            beta: alpha / 32.0,
            ramp: true,
            inertia_period_ms: 20,
            forward_stop_ticks: 2,
            backward_stop_ticks: 1,
            beatjump_ticks: 61,
            search_scale: 0.0001,
            jog_scale: 0.1,
        }
    }
}

impl Settings {
    /// Read a profile from disk. Missing keys fall back to the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&text)?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(Error::InvalidSettings(msg));

        if self.client_name.is_empty() {
            return invalid("client_name must not be empty".to_string());
        }

        if self.groups.is_empty() {
            return invalid("at least one group is required".to_string());
        }

        let mut names = HashSet::new();
        for group in &self.groups {
            if !names.insert(group.name.as_str()) {
                return invalid(format!("duplicate group {}", group.name));
            }
            if group.pad_channel > 0x0F || group.deck_channel > 0x0F {
                return invalid(format!("group {} uses a channel above 15", group.name));
            }
        }

        if let Some(group) = self
            .groups
            .iter()
            .find(|g| self.groups.iter().any(|other| other.pad_channel == g.deck_channel))
        {
            return invalid(format!(
                "group {} deck channel {} is also a pad channel",
                group.name, group.deck_channel
            ));
        }

        for (label, base) in [
            ("unshifted_base", self.pads.unshifted_base),
            ("shifted_base", self.pads.shifted_base),
        ] {
            if base > 127 - 7 {
                return invalid(format!("pads.{label}={base} leaves no room for 8 pads"));
            }
        }

        let (lo, hi) = (self.pads.unshifted_base, self.pads.shifted_base);
        if lo.abs_diff(hi) < 8 {
            return invalid("unshifted and shifted pad ranges overlap".to_string());
        }

        let controls = [
            self.buttons.shift,
            self.buttons.layer_select,
            self.buttons.wheel_touch,
            self.buttons.wheel_turn,
            self.leds.on,
            self.leds.half,
            self.leds.off,
        ];
        if controls.iter().any(|x| *x >= 128) {
            return invalid("button and LED values should be 0 to 127".to_string());
        }

        for (label, bytes) in [
            ("exit_demo", &self.sysex.exit_demo),
            ("shutdown", &self.sysex.shutdown),
        ] {
            if !is_sysex(bytes) {
                return invalid(format!("sysex.{label} must be empty or F0 .. F7"));
            }
        }

        let scratch = &self.scratch;
        if scratch.inertia_period_ms == 0 {
            return invalid("scratch.inertia_period_ms must be positive".to_string());
        }
        if scratch.beatjump_ticks == 0 {
            return invalid("scratch.beatjump_ticks must be positive".to_string());
        }
        if scratch.ticks_per_revolution == 0 {
            return invalid("scratch.ticks_per_revolution must be positive".to_string());
        }
        let constants = [
            scratch.rpm,
            scratch.alpha,
            scratch.beta,
            scratch.search_scale,
            scratch.jog_scale,
            self.brake_factor,
        ];
        if constants.iter().any(|x| !x.is_finite()) {
            return invalid("scratch constants must be finite numbers".to_string());
        }

        Ok(())
    }
}

fn is_sysex(bytes: &[u8]) -> bool {
    match bytes {
        [] => true,
        [0xF0, body @ .., 0xF7] => body.iter().all(|byte| *byte < 0x80),
        _ => false,
    }
}
