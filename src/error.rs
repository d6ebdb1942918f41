use thiserror::Error;

/// Errors that can stop the driver during startup.
///
/// Nothing on the event path returns these: once the ports are open, a
/// missed LED update or ignored pad press is logged and dropped instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read profile: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse profile: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid profile: {0}")]
    InvalidSettings(String),

    #[error("failed to initialise MIDI: {0}")]
    MidiInit(String),

    #[error("no MIDI port matching \"{0}\" was found")]
    PortNotFound(String),

    #[error("failed to open MIDI connection: {0}")]
    Connection(String),
}

pub type Result<T> = std::result::Result<T, Error>;
