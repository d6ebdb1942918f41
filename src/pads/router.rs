use std::rc::Rc;
use std::sync::mpsc::Sender;

use crate::host::Host;
use crate::settings::Settings;

use super::address::PadMapper;
use super::input::Input;
use super::led::LedPalette;
use super::output::{Output, ShortMessage};

/// One [`Input`] per configured group, plus the controller-wide shift state.
///
/// Every entry point finishes by handing queued host deliveries to the
/// inputs, so LEDs are up to date when a call returns.
#[derive(Debug)]
pub struct GroupedInputs {
    inputs: Vec<Input>,
    mapper: Rc<PadMapper>,
    shift: bool,
}

impl GroupedInputs {
    pub fn new(host: &mut dyn Host, settings: &Settings, tx: Sender<ShortMessage>) -> Self {
        let mapper = Rc::new(PadMapper::new(&settings.groups, &settings.pads));
        let palette = LedPalette::from(settings.leds);

        let inputs = settings
            .groups
            .iter()
            .map(|group| {
                let mut input =
                    Input::new(host, &group.name, settings.layer_select, settings.brake_factor);
                let output = Output::device(&group.name, mapper.clone(), palette, tx.clone());
                input.connect(host, output);
                input
            })
            .collect();

        let mut router = Self {
            inputs,
            mapper,
            shift: false,
        };
        router.deliver_changes(host);
        router
    }

    pub fn mapper(&self) -> &PadMapper {
        &self.mapper
    }

    /// Push the current shift state to every group.
    pub fn init(&mut self, host: &mut dyn Host) {
        for input in &mut self.inputs {
            input.on_shift(self.shift);
        }
        self.deliver_changes(host);
    }

    pub fn route_pad(&mut self, host: &mut dyn Host, channel: u8, control: u8, pressed: bool) {
        let Some(group) = self.mapper.group_for_pad_channel(channel) else {
            log::debug!("no group on pad channel {channel}");
            return;
        };
        let Some(pad) = self.mapper.pad_for_control(control, self.shift) else {
            log::debug!("{group}: control {control:#04x} is not a pad");
            return;
        };

        let group = group.to_string();
        if let Some(input) = self.input_mut(&group) {
            input.on_pad(host, pad.get(), pressed);
        }
        self.deliver_changes(host);
    }

    pub fn route_shift(&mut self, host: &mut dyn Host, pressed: bool) {
        log::debug!("shift {pressed}");
        self.shift = pressed;
        for input in &mut self.inputs {
            input.on_shift(pressed);
        }
        self.deliver_changes(host);
    }

    pub fn route_mode_button(&mut self, host: &mut dyn Host, group: &str, pressed: bool) {
        match self.input_mut(group) {
            Some(input) => {
                input.on_layer_select_button(host, pressed);
                log::trace!("{group}: selecting={}", input.is_selecting());
            }
            None => log::debug!("layer select for unknown group {group}"),
        }
        self.deliver_changes(host);
    }

    /// Hand queued host deliveries to the input owning the group.
    pub fn deliver_changes(&mut self, host: &mut dyn Host) {
        for change in host.take_changes() {
            if let Some(input) = self.input_mut(&change.group) {
                input.on_value(&change);
            }
        }
    }

    pub fn shutdown(&mut self, host: &mut dyn Host) {
        for input in &mut self.inputs {
            log::debug!("{}: clearing pads", input.group());
            input.shutdown(host);
        }
    }

    fn input_mut(&mut self, group: &str) -> Option<&mut Input> {
        self.inputs.iter_mut().find(|input| input.group() == group)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::mpsc::{self, Receiver};

    use super::*;
    use crate::host::{ControlStore, MemoryHost};

    fn router(host: &mut MemoryHost) -> (GroupedInputs, Receiver<ShortMessage>) {
        let (tx, rx) = mpsc::channel();
        let mut router = GroupedInputs::new(host, &Settings::default(), tx);
        router.init(host);
        (router, rx)
    }

    fn keys(host: &MemoryHost) -> Vec<(String, String)> {
        host.writes()
            .iter()
            .map(|(group, key, _)| (group.clone(), key.clone()))
            .collect()
    }

    #[test]
    fn startup_paints_every_group() {
        let mut host = MemoryHost::new();
        let (_router, rx) = router(&mut host);

        let channels: BTreeSet<u8> = rx.try_iter().map(|[status, _, _]| status & 0x0F).collect();
        assert_eq!(channels, BTreeSet::from([4, 5, 6, 7]));
    }

    #[test]
    fn pads_route_by_channel() {
        let mut host = MemoryHost::new();
        let (mut router, _rx) = router(&mut host);

        router.route_pad(&mut host, 0x05, 0x16, true);
        router.route_pad(&mut host, 0x07, 0x14, true);
        assert_eq!(
            keys(&host),
            vec![
                ("[Channel2]".to_string(), "hotcue_11_activatecue".to_string()),
                ("[Channel4]".to_string(), "hotcue_9_activatecue".to_string()),
            ]
        );
    }

    #[test]
    fn shift_is_global_and_selects_shifted_notes() {
        let mut host = MemoryHost::new();
        let (mut router, _rx) = router(&mut host);

        router.route_shift(&mut host, true);
        router.route_pad(&mut host, 0x04, 0x1E, true);
        router.route_pad(&mut host, 0x06, 0x1E, true);
        assert_eq!(
            keys(&host),
            vec![
                ("[Channel1]".to_string(), "hotcue_11_clear".to_string()),
                ("[Channel3]".to_string(), "hotcue_11_clear".to_string()),
            ]
        );
    }

    #[test]
    fn release_after_shift_reaches_same_pad() {
        let mut host = MemoryHost::new();
        let (mut router, _rx) = router(&mut host);

        router.route_shift(&mut host, true);
        router.route_pad(&mut host, 0x04, 0x1C, true);
        router.route_shift(&mut host, false);
        router.route_pad(&mut host, 0x04, 0x1C, false);
        assert_eq!(host.writes().len(), 2);
        assert_eq!(host.writes()[1].1, "hotcue_9_activatecue");
    }

    #[test]
    fn unknown_channels_and_controls_are_ignored() {
        let mut host = MemoryHost::new();
        let (mut router, _rx) = router(&mut host);

        router.route_pad(&mut host, 0x0A, 0x14, true);
        router.route_pad(&mut host, 0x04, 0x40, true);
        router.route_mode_button(&mut host, "[Sampler1]", true);
        assert!(host.writes().is_empty());
    }

    #[test]
    fn cue_set_elsewhere_lights_pad() {
        let mut host = MemoryHost::new();
        let (mut router, rx) = router(&mut host);
        rx.try_iter().for_each(drop);

        host.set("[Channel2]", "hotcue_12_activatecue", 1.0);
        router.deliver_changes(&mut host);
        let sent: Vec<ShortMessage> = rx.try_iter().collect();
        assert_eq!(sent, vec![[0x95, 0x17, 0x40], [0x95, 0x1F, 0x40]]);
    }

    #[test]
    fn mode_button_switches_one_group() {
        let mut host = MemoryHost::new();
        let (mut router, _rx) = router(&mut host);

        router.route_mode_button(&mut host, "[Channel1]", true);
        router.route_pad(&mut host, 0x04, 0x1A, true);
        router.route_mode_button(&mut host, "[Channel1]", false);

        router.route_pad(&mut host, 0x04, 0x14, true);
        router.route_pad(&mut host, 0x05, 0x14, true);
        assert_eq!(
            keys(&host),
            vec![
                ("[Channel1]".to_string(), "beatjump_1_backward".to_string()),
                ("[Channel2]".to_string(), "hotcue_9_activatecue".to_string()),
            ]
        );
    }

    #[test]
    fn shutdown_turns_everything_off() {
        let mut host = MemoryHost::new();
        let (mut router, rx) = router(&mut host);
        rx.try_iter().for_each(drop);

        router.shutdown(&mut host);
        let sent: Vec<ShortMessage> = rx.try_iter().collect();
        assert_eq!(sent.len(), 4 * 16);
        assert!(sent.iter().all(|[_, _, velocity]| *velocity == 0));
    }
}
