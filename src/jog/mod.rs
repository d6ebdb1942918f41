//! Jog wheel scratch, search and beat-jump handling.

pub mod scratch;
pub mod timer;
