mod controller;
mod error;
mod host;
mod jog;
mod midi_io;
mod pads;
mod settings;

use std::{
    io,
    path::PathBuf,
    sync::mpsc::{self, Receiver, TryRecvError},
    thread,
    time::{Duration, Instant},
};

use clap::Parser;

use controller::{MixtrackController, Timestamp};
use error::Result;
use host::MemoryHost;
use midi_io::{ControllerInput, ControllerOutput};
use pads::output::ShortMessage;
use settings::Settings;

const POLL_INTERVAL: Duration = Duration::from_millis(2);

#[derive(Parser, Debug)]
#[command(name = "mixtrack-layers")]
#[command(about = "Layered pads and jog wheel scratching for the Numark Mixtrack Platinum")]
#[command(version)]
struct Args {
    /// YAML profile. Defaults describe the Mixtrack Platinum.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Substring of the MIDI input port name (overrides the profile).
    #[arg(long)]
    input_port: Option<String>,

    /// Substring of the MIDI output port name (overrides the profile).
    #[arg(long)]
    output_port: Option<String>,

    /// Log every routed event.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug)]
enum ControlMessage {
    Midi {
        bytes: Vec<u8>,
        timestamp: Timestamp,
    },
    Quit,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let settings = load_settings(&args)?;

    let (tx, rx) = mpsc::channel::<ControlMessage>();
    let midi_tx = tx.clone();
    let input = ControllerInput::open(&settings.client_name, &settings.input_port, move |bytes| {
        let message = ControlMessage::Midi {
            bytes: bytes.to_vec(),
            timestamp: Instant::now(),
        };
        if midi_tx.send(message).is_err() {
            log::trace!("event loop gone, dropping MIDI input");
        }
    })?;
    let mut output = ControllerOutput::open(&settings.client_name, &settings.output_port)?;
    log::info!(
        "connected: in \"{}\", out \"{}\"",
        input.port_name(),
        output.port_name()
    );

    spawn_quit_listener(tx);

    for message in controller::startup_messages(&settings) {
        output.send(&message);
    }

    let (led_tx, led_rx) = mpsc::channel::<ShortMessage>();
    let mut host = MemoryHost::new();
    let mut controller = MixtrackController::new(&mut host, &settings, led_tx);
    flush_leds(&led_rx, &mut output);

    println!("Press Enter to quit");

    'event_loop: loop {
        // Drain controller events.
        loop {
            match rx.try_recv() {
                Ok(ControlMessage::Midi { bytes, timestamp }) => {
                    controller.handle_midi(&mut host, &bytes, timestamp);
                }
                Ok(ControlMessage::Quit) => break 'event_loop,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::warn!("controller input closed");
                    break 'event_loop;
                }
            }
        }

        controller.poll(&mut host, Instant::now());
        flush_leds(&led_rx, &mut output);

        thread::sleep(POLL_INTERVAL);
    }

    controller.shutdown(&mut host);
    flush_leds(&led_rx, &mut output);
    for message in controller::shutdown_messages(&settings) {
        output.send(&message);
    }
    log::info!(
        "session: {} control writes, {} deck physics calls",
        host.write_count(),
        host.physics_count()
    );
    input.close();
    output.close();
    Ok(())
}

fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => {
            log::info!("loading profile {}", path.display());
            Settings::load(path)?
        }
        None => Settings::default(),
    };

    if let Some(port) = &args.input_port {
        settings.input_port = port.clone();
    }
    if let Some(port) = &args.output_port {
        settings.output_port = port.clone();
    }

    settings.validate()?;
    Ok(settings)
}

fn flush_leds(rx: &Receiver<ShortMessage>, output: &mut ControllerOutput) {
    for message in rx.try_iter() {
        output.send(&message);
    }
}

/// Quit on a line from stdin. A closed stdin leaves the driver running.
fn spawn_quit_listener(tx: mpsc::Sender<ControlMessage>) {
    let spawned = thread::Builder::new()
        .name("mixtrack-layers-stdin".into())
        .spawn(move || {
            let mut line = String::new();
            while let Ok(read) = io::stdin().read_line(&mut line) {
                if read == 0 {
                    log::debug!("stdin closed, quit with an interrupt instead");
                    return;
                }
                if tx.send(ControlMessage::Quit).is_err() {
                    return;
                }
                line.clear();
            }
        });
    if let Err(err) = spawned {
        log::warn!("no quit listener: {err}");
    }
}
