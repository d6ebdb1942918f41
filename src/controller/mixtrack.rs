use std::sync::mpsc::Sender;

use crate::host::{deck_from_group, Host};
use crate::jog::scratch::ScratchEngine;
use crate::pads::output::ShortMessage;
use crate::pads::router::GroupedInputs;
use crate::settings::{ButtonSettings, Settings};

use super::event::{ControlEvent, Timestamp};

/// High-level interface for working with the Mixtrack Platinum.
///
/// Raw MIDI from the controller goes in through [`handle_midi`]; pad LED
/// updates come out of the sender handed to [`new`]. [`poll`] must be called
/// regularly so jog wheel inertia can run.
///
/// [`handle_midi`]: MixtrackController::handle_midi
/// [`new`]: MixtrackController::new
/// [`poll`]: MixtrackController::poll
#[derive(Debug)]
pub struct MixtrackController {
    buttons: ButtonSettings,
    pads: GroupedInputs,
    jog: ScratchEngine,
}

impl MixtrackController {
    pub fn new(host: &mut dyn Host, settings: &Settings, leds: Sender<ShortMessage>) -> Self {
        let mut pads = GroupedInputs::new(host, settings, leds);
        pads.init(host);

        let decks = settings
            .groups
            .iter()
            .filter_map(|group| deck_from_group(&group.name))
            .max()
            .unwrap_or(0);
        log::info!(
            "{} pad groups, jog wheels on {} decks",
            settings.groups.len(),
            decks
        );

        Self {
            buttons: settings.buttons.clone(),
            pads,
            jog: ScratchEngine::new(decks, &settings.scratch),
        }
    }

    pub fn handle_midi(&mut self, host: &mut dyn Host, message: &[u8], now: Timestamp) {
        let Some(event) = ControlEvent::from_midi(message, &self.buttons, self.pads.mapper()) else {
            log::trace!("unmapped message {message:02x?}");
            return;
        };
        log::debug!("{event:?}");
        self.handle_event(host, event, now);
    }

    pub fn handle_event(&mut self, host: &mut dyn Host, event: ControlEvent, now: Timestamp) {
        match event {
            ControlEvent::Pad {
                channel,
                control,
                kind,
            } => self
                .pads
                .route_pad(host, channel, control, kind.is_pressed()),
            ControlEvent::Shift(kind) => {
                self.jog.set_shift(kind.is_pressed());
                self.pads.route_shift(host, kind.is_pressed());
            }
            ControlEvent::LayerSelect { group, kind } => {
                self.pads
                    .route_mode_button(host, &group, kind.is_pressed());
            }
            ControlEvent::WheelTouch { deck, kind } => {
                self.jog.wheel_touch(host, deck, kind.is_pressed(), now);
                log::debug!("deck {deck}: wheel {:?}", self.jog.mode(host, deck));
                self.pads.deliver_changes(host);
            }
            ControlEvent::WheelTurn { group, deck, value } => {
                self.jog.wheel_turn(host, &group, deck, value);
                self.pads.deliver_changes(host);
            }
        }
    }

    /// Run due jog timers and hand out pending host deliveries.
    pub fn poll(&mut self, host: &mut dyn Host, now: Timestamp) {
        self.jog.poll_timers(host, now);
        self.pads.deliver_changes(host);
    }

    pub fn shutdown(&mut self, host: &mut dyn Host) {
        log::info!("shutting down controller");
        self.jog.shutdown(host);
        self.pads.shutdown(host);
    }
}
