use std::time::Instant;

use crate::host::deck_from_group;
use crate::pads::address::PadMapper;
use crate::settings::ButtonSettings;

/// Timestamp used for controller events.
pub type Timestamp = Instant;

const NOTE_OFF: u8 = 0x80;
const NOTE_ON: u8 = 0x90;
const CONTROL_CHANGE: u8 = 0xB0;

/// Classification for button state transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEventKind {
    Pressed,
    Released,
}

impl ButtonEventKind {
    pub fn is_pressed(self) -> bool {
        matches!(self, Self::Pressed)
    }
}

/// A decoded message from the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlEvent {
    Pad {
        channel: u8,
        control: u8,
        kind: ButtonEventKind,
    },
    Shift(ButtonEventKind),
    LayerSelect {
        group: String,
        kind: ButtonEventKind,
    },
    WheelTouch {
        deck: usize,
        kind: ButtonEventKind,
    },
    WheelTurn {
        group: String,
        deck: usize,
        value: u8,
    },
}

impl ControlEvent {
    /// Decode a raw short message. Anything the profile does not bind
    /// yields `None`.
    pub fn from_midi(message: &[u8], buttons: &ButtonSettings, mapper: &PadMapper) -> Option<Self> {
        let &[status, control, value, ..] = message else {
            return None;
        };
        let channel = status & 0x0F;

        match status & 0xF0 {
            kind @ (NOTE_ON | NOTE_OFF) => {
                let kind = if kind == NOTE_ON && value > 0 {
                    ButtonEventKind::Pressed
                } else {
                    ButtonEventKind::Released
                };

                if mapper.group_for_pad_channel(channel).is_some() {
                    return Some(Self::Pad {
                        channel,
                        control,
                        kind,
                    });
                }

                let group = mapper.group_for_deck_channel(channel)?;
                if control == buttons.shift {
                    Some(Self::Shift(kind))
                } else if control == buttons.layer_select {
                    Some(Self::LayerSelect {
                        group: group.to_string(),
                        kind,
                    })
                } else if control == buttons.wheel_touch {
                    Some(Self::WheelTouch {
                        deck: deck_from_group(group)?,
                        kind,
                    })
                } else {
                    None
                }
            }
            CONTROL_CHANGE if control == buttons.wheel_turn => {
                let group = mapper.group_for_deck_channel(channel)?;
                Some(Self::WheelTurn {
                    group: group.to_string(),
                    deck: deck_from_group(group)?,
                    value,
                })
            }
            _ => None,
        }
    }
}
