use error_stack::Context;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrainerError {
  InvalidPitch(i32),
  InvalidNoteName(String),
  InvalidRangeSpan(u32),
  UnknownMode(String),
  InvalidCommand(String),
  InputError,

  ConfigReadError,
  ConfigValueError(String),

  MidiInitError,
  MidiPortNotFound(String),
  MidiConnectionError,
  MidiSendError,

  PresentationError,
  AudioError,

  TrainerStopped,
}

impl Context for TrainerError {}

impl Display for TrainerError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    use TrainerError::*;
    match self {
      InvalidPitch(n) => write!(f, "invalid pitch {n}. Valid range is 0 ..= 127"),

      InvalidNoteName(s) => write!(f, "unable to parse note name: {s:?}"),

      InvalidRangeSpan(n) => write!(f, "invalid range span {n}. Valid range is 0 ..= 48"),

      UnknownMode(s) => write!(f, "unknown mode: {s}"),

      InvalidCommand(s) => write!(f, "invalid command: {s}"),

      InputError => write!(f, "failed to read terminal input"),

      ConfigReadError => write!(f, "failed to read configuration file"),

      ConfigValueError(key) => write!(f, "invalid configuration value for {key}"),

      MidiInitError => write!(f, "midi init error"),

      MidiPortNotFound(name) => write!(f, "unable to find midi port with name: {name}"),

      MidiConnectionError => write!(f, "failed to connect to midi port"),

      MidiSendError => write!(f, "failed to send midi message"),

      PresentationError => write!(f, "presentation adapter failed"),

      AudioError => write!(f, "audio service failed"),

      TrainerStopped => write!(f, "trainer event loop has stopped"),
    }
  }
}
