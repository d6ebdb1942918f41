//! Layered pad input.
//!
//! Each group (deck) has eight pads whose meaning depends on the selected
//! layer. [`router::GroupedInputs`] maps incoming notes to a group's
//! [`input::Input`], which forwards them to the active layer or, while the
//! layer-select button is active, to the [`switcher::LayerSwitcher`].

pub mod address;
pub mod input;
pub mod layers;
pub mod led;
pub mod output;
pub mod router;
pub mod switcher;
