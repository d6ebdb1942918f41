use std::rc::Rc;
use std::sync::mpsc::Sender;

use super::address::{PadIndex, PadMapper};
use super::led::{LedPalette, LedValue};

/// A three byte MIDI message bound for the controller.
pub type ShortMessage = [u8; 3];

const NOTE_ON: u8 = 0x90;

/// Where a layer draws its LEDs.
///
/// Layers that are not on screen hold [`Output::Null`] and draw nowhere.
#[derive(Debug, Clone, Default)]
pub enum Output {
    #[default]
    Null,
    Device(DeviceOutput),
}

impl Output {
    /// Output for `group`'s pads. Falls back to [`Output::Null`] when the
    /// mapper has no addresses for the group.
    pub fn device(
        group: &str,
        mapper: Rc<PadMapper>,
        palette: LedPalette,
        tx: Sender<ShortMessage>,
    ) -> Self {
        if !mapper.knows_group(group) {
            log::warn!("no pad addresses for {group}, its LEDs stay dark");
            return Self::Null;
        }

        Self::Device(DeviceOutput {
            group: group.to_string(),
            mapper,
            palette,
            tx,
        })
    }

    pub fn set_led(&self, pad: PadIndex, value: LedValue) {
        match self {
            Self::Null => log::trace!("null output: pad {} -> {:?}", pad.get(), value),
            Self::Device(device) => device.set_led(pad, value),
        }
    }

    pub fn clear_all(&self) {
        for pad in PadIndex::all() {
            self.set_led(pad, LedValue::Off);
        }
    }
}

/// Sends pad LED updates for one group as note-on messages.
#[derive(Debug, Clone)]
pub struct DeviceOutput {
    group: String,
    mapper: Rc<PadMapper>,
    palette: LedPalette,
    tx: Sender<ShortMessage>,
}

impl DeviceOutput {
    fn set_led(&self, pad: PadIndex, value: LedValue) {
        let Some(address) = self.mapper.address(&self.group, pad) else {
            return;
        };

        let status = NOTE_ON | (address.channel & 0x0F);
        let velocity = self.palette.velocity(value);
        for control in address.controls {
            if self.tx.send([status, control, velocity]).is_err() {
                log::warn!("{}: LED queue closed, dropping pad {}", self.group, pad.get());
                return;
            }
        }
    }
}
