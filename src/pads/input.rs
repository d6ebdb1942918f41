use crate::host::{Host, ValueChange};
use crate::settings::LayerSelectMode;

use super::address::PadIndex;
use super::layers::PadLayer;
use super::output::Output;
use super::switcher::LayerSwitcher;

/// Pad handling for one group.
///
/// Normally pads go to the current layer. While layer-select mode is active
/// they go to the [`LayerSwitcher`], which owns the output until the mode
/// ends. Exactly one of the two is connected to `output` at any time.
#[derive(Debug)]
pub struct Input {
    group: String,
    output: Output,
    switcher: LayerSwitcher,
    shift: bool,
    selecting: bool,
    select_mode: LayerSelectMode,
}

impl Input {
    pub fn new(
        host: &mut dyn Host,
        group: &str,
        select_mode: LayerSelectMode,
        brake_factor: f64,
    ) -> Self {
        Self {
            group: group.to_string(),
            output: Output::Null,
            switcher: LayerSwitcher::new(host, group, brake_factor),
            shift: false,
            selecting: false,
            select_mode,
        }
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn is_selecting(&self) -> bool {
        self.selecting
    }

    pub fn connect(&mut self, host: &mut dyn Host, output: Output) {
        self.output = output;
        self.output.clear_all();
        if self.selecting {
            self.switcher.connect(host, self.output.clone());
        } else {
            self.attach_current(host);
        }
    }

    pub fn disconnect(&mut self) {
        if self.selecting {
            self.switcher.disconnect();
        } else {
            self.switcher.current_layer().disconnect();
        }
        self.output = Output::Null;
    }

    /// End held pads, blank the group's pads and let go of the output.
    pub fn shutdown(&mut self, host: &mut dyn Host) {
        self.switcher.current_layer().release_held(host);
        self.output.clear_all();
        self.disconnect();
        self.switcher.close(host);
    }

    pub fn on_layer_select_button(&mut self, host: &mut dyn Host, pressed: bool) {
        let selecting = match self.select_mode {
            LayerSelectMode::Hold => pressed,
            LayerSelectMode::Toggle if pressed => !self.selecting,
            LayerSelectMode::Toggle => return,
        };
        if selecting == self.selecting {
            return;
        }

        log::debug!(
            "{}: layer select {} (on layer {})",
            self.group,
            selecting,
            self.switcher.current().get()
        );
        self.selecting = selecting;
        self.output.clear_all();
        if selecting {
            let layer = self.switcher.current_layer();
            layer.release_held(host);
            layer.disconnect();
            self.switcher.connect(host, self.output.clone());
        } else {
            self.switcher.disconnect();
            self.attach_current(host);
        }
    }

    /// Shift always belongs to the current layer, even while selecting.
    pub fn on_shift(&mut self, pressed: bool) {
        self.shift = pressed;
        self.switcher.current_layer().on_shift(pressed);
    }

    pub fn on_pad(&mut self, host: &mut dyn Host, number: u8, pressed: bool) {
        let Some(pad) = PadIndex::new(number) else {
            log::debug!("{}: ignoring pad {number}", self.group);
            return;
        };

        log::debug!("{}: pad {} {}", self.group, number, pressed);
        if self.selecting {
            self.switcher.on_pad(host, pad, pressed);
        } else {
            self.switcher.current_layer().on_pad(host, pad, pressed);
        }
    }

    pub fn on_value(&mut self, change: &ValueChange) {
        self.switcher.on_value(change);
    }

    fn attach_current(&mut self, host: &mut dyn Host) {
        let shift = self.shift;
        let output = self.output.clone();
        let layer = self.switcher.current_layer();
        layer.on_shift(shift);
        layer.connect(host, output);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::mpsc::Receiver;

    use super::*;
    use crate::host::{ControlStore, MemoryHost};
    use crate::pads::output::testing::{device_output, pattern, screen};
    use crate::pads::output::ShortMessage;

    fn deliver(input: &mut Input, host: &mut MemoryHost) {
        for change in host.take_changes() {
            input.on_value(&change);
        }
    }

    fn connected(
        host: &mut MemoryHost,
        mode: LayerSelectMode,
    ) -> (Input, Receiver<ShortMessage>, BTreeMap<u8, u8>) {
        let mut input = Input::new(host, "[Channel1]", mode, 0.5);
        let (output, rx) = device_output();
        input.connect(host, output);
        deliver(&mut input, host);
        let state = pattern(&rx);
        (input, rx, state)
    }

    #[test]
    fn layer_select_round_trip_restores_pattern() {
        let mut host = MemoryHost::new();
        host.set("[Channel1]", "hotcue_10_status", 1.0);
        host.set("[Channel1]", "hotcue_13_status", 1.0);
        let (mut input, rx, before) = connected(&mut host, LayerSelectMode::Hold);
        assert_eq!(before[&2], 0x40);

        let mut state = before.clone();
        input.on_layer_select_button(&mut host, true);
        deliver(&mut input, &mut host);
        screen(&rx, &mut state);
        assert_eq!(state[&1], 0x40);
        assert_eq!(state[&2], 0x00);

        input.on_layer_select_button(&mut host, false);
        deliver(&mut input, &mut host);
        screen(&rx, &mut state);
        assert_eq!(state, before);
    }

    #[test]
    fn pads_go_to_switcher_while_selecting() {
        let mut host = MemoryHost::new();
        let (mut input, rx, mut state) = connected(&mut host, LayerSelectMode::Hold);

        input.on_layer_select_button(&mut host, true);
        input.on_pad(&mut host, 7, true);
        input.on_pad(&mut host, 7, false);
        assert!(host.writes().is_empty());

        input.on_layer_select_button(&mut host, false);
        deliver(&mut input, &mut host);
        screen(&rx, &mut state);
        // beat jump pattern
        assert_eq!(state[&1], 0x03);
        assert_eq!(state[&2], 0x40);

        input.on_pad(&mut host, 2, true);
        assert_eq!(host.writes()[0].1, "beatjump_1_forward");
    }

    #[test]
    fn toggle_mode_latches_on_press() {
        let mut host = MemoryHost::new();
        let (mut input, _rx, _) = connected(&mut host, LayerSelectMode::Toggle);

        input.on_layer_select_button(&mut host, true);
        input.on_layer_select_button(&mut host, false);
        assert!(input.is_selecting());

        input.on_layer_select_button(&mut host, true);
        assert!(!input.is_selecting());
    }

    #[test]
    fn repeated_press_is_a_no_op() {
        let mut host = MemoryHost::new();
        let (mut input, rx, _) = connected(&mut host, LayerSelectMode::Hold);

        input.on_layer_select_button(&mut host, false);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn shift_follows_into_newly_selected_layer() {
        let mut host = MemoryHost::new();
        let (mut input, _rx, _) = connected(&mut host, LayerSelectMode::Hold);

        input.on_layer_select_button(&mut host, true);
        input.on_pad(&mut host, 5, true);
        input.on_shift(true);
        input.on_layer_select_button(&mut host, false);

        input.on_pad(&mut host, 3, true);
        assert_eq!(host.writes()[0].1, "hotcue_3_clear");
    }

    #[test]
    fn out_of_range_pads_are_ignored() {
        let mut host = MemoryHost::new();
        let (mut input, rx, _) = connected(&mut host, LayerSelectMode::Hold);

        input.on_pad(&mut host, 0, true);
        input.on_pad(&mut host, 9, true);
        assert!(host.writes().is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn shutdown_blanks_pads() {
        let mut host = MemoryHost::new();
        host.set("[Channel1]", "hotcue_9_status", 1.0);
        let (mut input, rx, _) = connected(&mut host, LayerSelectMode::Hold);

        input.shutdown(&mut host);
        let state = pattern(&rx);
        assert!(state.values().all(|v| *v == 0x00));

        host.set("[Channel1]", "hotcue_9_clear", 1.0);
        deliver(&mut input, &mut host);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn entering_layer_select_ends_held_loop_roll() {
        let mut host = MemoryHost::new();
        let (mut input, rx, mut state) = connected(&mut host, LayerSelectMode::Hold);
        input.on_layer_select_button(&mut host, true);
        input.on_pad(&mut host, 2, true);
        input.on_layer_select_button(&mut host, false);

        input.on_pad(&mut host, 1, true);
        assert!(host.get_bool("[Channel1]", "beatlooproll_1_activate"));

        input.on_layer_select_button(&mut host, true);
        assert!(!host.get_bool("[Channel1]", "beatlooproll_1_activate"));
        input.on_pad(&mut host, 1, false);
        input.on_layer_select_button(&mut host, false);
        deliver(&mut input, &mut host);
        screen(&rx, &mut state);

        assert!(!host.get_bool("[Channel1]", "beatlooproll_1_activate"));
        assert_eq!(state[&1], 0x00);
        assert_eq!(input.switcher.current().get(), 2);
    }

    #[test]
    fn shutdown_drops_host_connections() {
        let mut host = MemoryHost::new();
        let (mut input, _rx, _) = connected(&mut host, LayerSelectMode::Hold);

        input.shutdown(&mut host);
        host.set("[Channel1]", "hotcue_9_status", 1.0);
        host.set("[Channel1]", "hotcue_17_status", 1.0);
        assert!(host.take_changes().is_empty());
    }
}
