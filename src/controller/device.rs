use std::collections::BTreeSet;

use crate::settings::Settings;

const WHEEL_LED_VINYL: u8 = 0x7F;
const WHEEL_LED_PLAIN: u8 = 0x01;

/// Messages sent once the output port is open, before any pad LED.
///
/// Takes the Platinum out of its demo animation and lights each deck's
/// wheel button to show whether the platter is touch sensitive.
pub fn startup_messages(settings: &Settings) -> Vec<Vec<u8>> {
    let wheel_led = if settings.scratch.vinyl_mode {
        WHEEL_LED_VINYL
    } else {
        WHEEL_LED_PLAIN
    };

    let mut messages = Vec::new();
    if !settings.sysex.exit_demo.is_empty() {
        messages.push(settings.sysex.exit_demo.clone());
    }
    for channel in deck_channels(settings) {
        messages.push(vec![0x90 | channel, settings.buttons.layer_select, wheel_led]);
    }
    messages
}

/// Messages sent after the pads are blanked, just before the port closes.
pub fn shutdown_messages(settings: &Settings) -> Vec<Vec<u8>> {
    let mut messages: Vec<Vec<u8>> = deck_channels(settings)
        .map(|channel| vec![0x80 | channel, settings.buttons.layer_select, 0x00])
        .collect();
    if !settings.sysex.shutdown.is_empty() {
        messages.push(settings.sysex.shutdown.clone());
    }
    messages
}

fn deck_channels(settings: &Settings) -> impl Iterator<Item = u8> {
    settings
        .groups
        .iter()
        .map(|group| group.deck_channel)
        .collect::<BTreeSet<u8>>()
        .into_iter()
}
