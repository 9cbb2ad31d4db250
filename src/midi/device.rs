use log::{debug, info, warn};
use midir::{Ignore, MidiIO, MidiInput, MidiInputConnection, MidiOutput, MidiOutputConnection};
use tokio::sync::mpsc;

use error_stack::{report, IntoReport, Result, ResultExt};

use super::message::decode_note_on;
use crate::error::TrainerError;
use crate::game::Action;
use crate::theory::NamedNote;

const CLIENT_NAME: &str = "keytrainer";

/// Names of the available MIDI input and output ports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MidiPorts {
  pub inputs: Vec<String>,
  pub outputs: Vec<String>,
}

pub fn list_ports() -> Result<MidiPorts, TrainerError> {
  let input = MidiInput::new(CLIENT_NAME)
    .into_report()
    .change_context(TrainerError::MidiInitError)?;
  let output = MidiOutput::new(CLIENT_NAME)
    .into_report()
    .change_context(TrainerError::MidiInitError)?;

  Ok(MidiPorts {
    inputs: port_names(&input)?,
    outputs: port_names(&output)?,
  })
}

fn port_names<IO: MidiIO>(io: &IO) -> Result<Vec<String>, TrainerError> {
  io.ports()
    .iter()
    .map(|p| {
      io.port_name(p)
        .into_report()
        .change_context(TrainerError::MidiInitError)
    })
    .collect()
}

fn get_port_by_name<IO: MidiIO>(io: &IO, name: &str) -> Result<IO::Port, TrainerError> {
  for p in io.ports() {
    let port_name = io.port_name(&p).map_err(|e| {
      report!(TrainerError::MidiPortNotFound(name.to_string()))
        .attach_printable(format!("unable to get port name: {e}"))
    })?;
    if port_name == name {
      return Ok(p);
    }
  }
  Err(report!(TrainerError::MidiPortNotFound(name.to_string())))
}

/// Listens on the named input port and forwards every key press to `actions`.
///
/// The connection stays open until the returned [MidiInputConnection] is closed or dropped.
pub fn connect_input(
  port_name: &str,
  actions: mpsc::Sender<Action>,
) -> Result<MidiInputConnection<()>, TrainerError> {
  let mut input = MidiInput::new(CLIENT_NAME)
    .into_report()
    .change_context(TrainerError::MidiInitError)?;
  input.ignore(Ignore::All);
  let port = get_port_by_name(&input, port_name)?;

  let conn = input
    .connect(
      &port,
      port_name,
      move |_, msg, _| {
        if let Some((pitch, velocity)) = decode_note_on(msg) {
          debug!("midi note on: {} velocity {velocity}", NamedNote::new(pitch));
          if let Err(err) = actions.blocking_send(Action::KeyPressed(pitch)) {
            warn!("error forwarding midi input: {err}");
          }
        }
      },
      (),
    )
    .map_err(|e|
      // ConnectError<MidiInput> is not thread-safe, so we stringify instead of report()-ing directly
      report!(TrainerError::MidiConnectionError)
        .attach_printable(format!("midi input connection error: {e}")))?;

  info!("listening on midi input {port_name}");
  Ok(conn)
}

pub fn connect_output(port_name: &str) -> Result<MidiOutputConnection, TrainerError> {
  let output = MidiOutput::new(CLIENT_NAME)
    .into_report()
    .change_context(TrainerError::MidiInitError)?;
  let port = get_port_by_name(&output, port_name)?;

  let conn = output.connect(&port, port_name).map_err(|e| {
    report!(TrainerError::MidiConnectionError)
      .attach_printable(format!("midi output connection error: {e}"))
  })?;

  info!("playing on midi output {port_name}");
  Ok(conn)
}
