use std::fmt::Display;

use crate::config::RangeSpan;
use crate::theory::{NamedNote, Pitch};

use super::effects::TimerId;
use super::mode::Mode;

/// Actions are inputs into a [Session](super::session::Session).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
  /// Render the keyboard and deal the first challenge.
  Start,

  /// The player picked a different game.
  SetMode(Mode),

  /// The player moved one of the range controls.
  SetRange { below: RangeSpan, above: RangeSpan },

  /// The player toggled easy mode.
  SetEasyMode(bool),

  /// A key was pressed, on screen or on a MIDI keyboard.
  KeyPressed(Pitch),

  /// The player asked to hear the current challenge again.
  Replay,

  /// Something outside the game happened that the player should know about, e.g. a MIDI
  /// keyboard was connected.
  Notify(String),

  /// A timer started with [Effect::StartTimer](super::effects::Effect::StartTimer) has elapsed.
  TimerFired(TimerId),
}

impl Display for Action {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    use Action::*;
    match self {
      Start => write!(f, "Start"),
      SetMode(mode) => write!(f, "SetMode({mode})"),
      SetRange { below, above } => write!(f, "SetRange(-{}, +{})", below.get(), above.get()),
      SetEasyMode(on) => write!(f, "SetEasyMode({on})"),
      KeyPressed(pitch) => write!(f, "KeyPressed({})", NamedNote::new(*pitch)),
      Replay => write!(f, "Replay"),
      Notify(text) => write!(f, "Notify({text:?})"),
      TimerFired(id) => write!(f, "TimerFired({id})"),
    }
  }
}
