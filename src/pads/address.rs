//! Pad numbering and the mapping between pads and MIDI addresses.
//!
//! Pads are numbered like this on every group:
//!
//! ```text
//! [1][2][3][4]
//! [5][6][7][8]
//! ```

use crate::settings::{GroupSettings, PadSettings};

pub const PAD_COUNT: u8 = 8;

/// A pad number in `1..=8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PadIndex(u8);

impl PadIndex {
    pub const FIRST: PadIndex = PadIndex(1);

    pub fn new(number: u8) -> Option<Self> {
        (1..=PAD_COUNT).contains(&number).then_some(Self(number))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = PadIndex> {
        (1..=PAD_COUNT).map(PadIndex)
    }
}

/// Where a pad's LED lives on the device. One pad can light several notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalAddress {
    pub channel: u8,
    pub controls: Vec<u8>,
}

/// Resolves pads to device addresses and incoming notes back to pads.
#[derive(Debug, Clone)]
pub struct PadMapper {
    groups: Vec<GroupSettings>,
    unshifted_base: u8,
    shifted_base: u8,
}

impl PadMapper {
    pub fn new(groups: &[GroupSettings], pads: &PadSettings) -> Self {
        Self {
            groups: groups.to_vec(),
            unshifted_base: pads.unshifted_base,
            shifted_base: pads.shifted_base,
        }
    }

    pub fn knows_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g.name == group)
    }

    /// The LED address of `pad` in `group`. Both the shifted and unshifted
    /// notes drive the same LED, so both are returned.
    pub fn address(&self, group: &str, pad: PadIndex) -> Option<PhysicalAddress> {
        let settings = self.groups.iter().find(|g| g.name == group)?;
        let offset = pad.get() - 1;
        Some(PhysicalAddress {
            channel: settings.pad_channel,
            controls: vec![self.unshifted_base + offset, self.shifted_base + offset],
        })
    }

    /// The group whose pads are on `channel`.
    pub fn group_for_pad_channel(&self, channel: u8) -> Option<&str> {
        self.groups
            .iter()
            .find(|g| g.pad_channel == channel)
            .map(|g| g.name.as_str())
    }

    /// The group whose deck buttons are on `channel`.
    pub fn group_for_deck_channel(&self, channel: u8) -> Option<&str> {
        self.groups
            .iter()
            .find(|g| g.deck_channel == channel)
            .map(|g| g.name.as_str())
    }

    /// The pad a note belongs to. The table matching the shift state is
    /// tried first; the ranges are disjoint, so falling back to the other
    /// one only catches presses that straddle a shift change.
    pub fn pad_for_control(&self, control: u8, shift: bool) -> Option<PadIndex> {
        let (first, second) = if shift {
            (self.shifted_base, self.unshifted_base)
        } else {
            (self.unshifted_base, self.shifted_base)
        };
        Self::in_range(control, first).or_else(|| Self::in_range(control, second))
    }

    fn in_range(control: u8, base: u8) -> Option<PadIndex> {
        control
            .checked_sub(base)
            .filter(|offset| *offset < PAD_COUNT)
            .and_then(|offset| PadIndex::new(offset + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    fn mapper() -> PadMapper {
        let settings = Settings::default();
        PadMapper::new(&settings.groups, &settings.pads)
    }

    #[test]
    fn pad_index_bounds() {
        assert!(PadIndex::new(0).is_none());
        assert!(PadIndex::new(9).is_none());
        assert_eq!(PadIndex::new(8).map(PadIndex::get), Some(8));
        assert_eq!(PadIndex::all().count(), 8);
    }

    #[test]
    fn pad_lights_both_banks() {
        let address = mapper()
            .address("[Channel2]", PadIndex::new(3).unwrap())
            .unwrap();
        assert_eq!(address.channel, 0x05);
        assert_eq!(address.controls, vec![0x16, 0x1E]);
    }

    #[test]
    fn unknown_group_has_no_address() {
        assert!(mapper()
            .address("[Sampler1]", PadIndex::new(1).unwrap())
            .is_none());
    }

    #[test]
    fn notes_resolve_to_pads() {
        let mapper = mapper();
        assert_eq!(mapper.pad_for_control(0x14, false).map(PadIndex::get), Some(1));
        assert_eq!(mapper.pad_for_control(0x1B, false).map(PadIndex::get), Some(8));
        assert_eq!(mapper.pad_for_control(0x1C, true).map(PadIndex::get), Some(1));
        assert_eq!(mapper.pad_for_control(0x23, true).map(PadIndex::get), Some(8));
        assert_eq!(mapper.pad_for_control(0x1D, false).map(PadIndex::get), Some(2));
        assert_eq!(mapper.pad_for_control(0x13, false), None);
        assert_eq!(mapper.pad_for_control(0x24, true), None);
    }

    #[test]
    fn channels_resolve_to_groups() {
        let mapper = mapper();
        assert_eq!(mapper.group_for_pad_channel(0x07), Some("[Channel4]"));
        assert_eq!(mapper.group_for_deck_channel(0x00), Some("[Channel1]"));
        assert_eq!(mapper.group_for_pad_channel(0x00), None);
    }
}
