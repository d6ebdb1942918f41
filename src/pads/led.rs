use crate::settings::LedSettings;

/// Pad LED intensity, independent of the device's brightness codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedValue {
    On,
    Half,
    Off,
}

impl LedValue {
    pub fn from_bool(on: bool) -> Self {
        if on {
            Self::On
        } else {
            Self::Off
        }
    }
}

/// Device bytes for each [`LedValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedPalette {
    pub on: u8,
    pub half: u8,
    pub off: u8,
}

impl LedPalette {
    pub fn velocity(&self, value: LedValue) -> u8 {
        match value {
            LedValue::On => self.on,
            LedValue::Half => self.half,
            LedValue::Off => self.off,
        }
    }
}

impl From<LedSettings> for LedPalette {
    fn from(settings: LedSettings) -> Self {
        Self {
            on: settings.on,
            half: settings.half,
            off: settings.off,
        }
    }
}

impl Default for LedPalette {
    fn default() -> Self {
        LedSettings::default().into()
    }
}
