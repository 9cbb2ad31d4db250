use error_stack::{report, Result, ResultExt};

use crate::config::{parse_bool, parse_span, RangeSpan};
use crate::error::TrainerError;
use crate::game::{Action, Mode};
use crate::theory::{parse_pitch, Pitch};

pub const HELP: &str = "\
commands:
  <note>                 press a key, e.g. C4, f#3, Bb2 or 60
  mode <mode>            identify-major, identify-chromatic, black-keys,
                         ear-training, chords-major, chords-minor
  range <below> <above>  semitones around middle C (0 ..= 48)
  easy on|off            mark the keys to press
  replay                 hear the challenge again
  help                   show this message
  quit                   leave";

/// One line of terminal input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalCommand {
  Press(Pitch),
  Mode(Mode),
  Range(RangeSpan, RangeSpan),
  Easy(bool),
  Replay,
  Help,
  Quit,
}

impl TerminalCommand {
  /// The session action for this command, if it has one.
  pub fn action(&self) -> Option<Action> {
    match self {
      TerminalCommand::Press(pitch) => Some(Action::KeyPressed(*pitch)),
      TerminalCommand::Mode(mode) => Some(Action::SetMode(*mode)),
      TerminalCommand::Range(below, above) => Some(Action::SetRange {
        below: *below,
        above: *above,
      }),
      TerminalCommand::Easy(on) => Some(Action::SetEasyMode(*on)),
      TerminalCommand::Replay => Some(Action::Replay),
      TerminalCommand::Help | TerminalCommand::Quit => None,
    }
  }
}

pub fn parse_command(line: &str) -> Result<TerminalCommand, TrainerError> {
  let invalid = || TrainerError::InvalidCommand(line.trim().to_string());
  let words: Vec<&str> = line.split_whitespace().collect();

  let command = match words.as_slice() {
    ["mode", mode] => TerminalCommand::Mode(mode.parse::<Mode>().change_context_lazy(invalid)?),
    ["range", below, above] => TerminalCommand::Range(
      parse_span(below).change_context_lazy(invalid)?,
      parse_span(above).change_context_lazy(invalid)?,
    ),
    ["easy", on] => TerminalCommand::Easy(parse_bool(on).change_context_lazy(invalid)?),
    ["replay"] | ["r"] => TerminalCommand::Replay,
    ["help"] | ["?"] => TerminalCommand::Help,
    ["quit"] | ["exit"] | ["q"] => TerminalCommand::Quit,
    [note] => TerminalCommand::Press(parse_pitch(note).change_context_lazy(invalid)?),
    _ => return Err(report!(invalid())),
  };
  Ok(command)
}
