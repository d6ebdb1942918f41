use midir::{MidiIO, MidiInput, MidiInputConnection, MidiOutput, MidiOutputConnection};

use crate::error::{Error, Result};

/// Open connection from the controller. Incoming messages are handed to the
/// callback on midir's thread until the connection is closed or dropped.
pub struct ControllerInput {
    connection: MidiInputConnection<()>,
    port_name: String,
}

impl ControllerInput {
    pub fn open<F>(client_name: &str, port_hint: &str, mut callback: F) -> Result<Self>
    where
        F: FnMut(&[u8]) + Send + 'static,
    {
        let midi_in =
            MidiInput::new(client_name).map_err(|err| Error::MidiInit(err.to_string()))?;
        let (port, port_name) = find_port(&midi_in, port_hint)?;

        let connection = midi_in
            .connect(
                &port,
                &format!("{client_name}-in"),
                move |_stamp, message, _| callback(message),
                (),
            )
            .map_err(|err| Error::Connection(err.to_string()))?;

        Ok(Self {
            connection,
            port_name,
        })
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    pub fn close(self) {
        self.connection.close();
    }
}

/// Open connection to the controller, used for LED feedback.
pub struct ControllerOutput {
    connection: MidiOutputConnection,
    port_name: String,
}

impl ControllerOutput {
    pub fn open(client_name: &str, port_hint: &str) -> Result<Self> {
        let midi_out =
            MidiOutput::new(client_name).map_err(|err| Error::MidiInit(err.to_string()))?;
        let (port, port_name) = find_port(&midi_out, port_hint)?;

        let connection = midi_out
            .connect(&port, &format!("{client_name}-out"))
            .map_err(|err| Error::Connection(err.to_string()))?;

        Ok(Self {
            connection,
            port_name,
        })
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    /// Send one message. A failed send only costs an LED update, so it is
    /// logged and dropped.
    pub fn send(&mut self, message: &[u8]) {
        if let Err(err) = self.connection.send(message) {
            log::warn!("{}: failed to send {message:02x?}: {err}", self.port_name);
        }
    }

    pub fn close(self) {
        self.connection.close();
    }
}

/// The first port whose name contains `hint`, ignoring case. An empty hint
/// picks the first port.
fn find_port<T: MidiIO>(io: &T, hint: &str) -> Result<(T::Port, String)> {
    let ports = io.ports();
    let named = ports.iter().filter_map(|port| {
        let name = io.port_name(port).ok()?;
        Some((port, name))
    });

    for (port, name) in named {
        log::debug!("MIDI port: {name}");
        if matches_hint(&name, hint) {
            return Ok((port.clone(), name));
        }
    }
    Err(Error::PortNotFound(hint.to_string()))
}

fn matches_hint(port_name: &str, hint: &str) -> bool {
    let hint = hint.trim();
    hint.is_empty() || port_name.to_lowercase().contains(&hint.to_lowercase())
}
