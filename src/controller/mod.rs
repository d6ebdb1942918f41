mod device;
mod event;
mod mixtrack;

#[allow(unused_imports)]
pub use event::{ButtonEventKind, ControlEvent, Timestamp};
pub use device::{shutdown_messages, startup_messages};
pub use mixtrack::MixtrackController;
