use std::fmt::Display;
use std::time::Duration;

use uuid::Uuid;

use crate::theory::{NamedNote, Pitch};

pub type TimerId = Uuid;

/// A visual state a key can be put in. A key can carry several at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyMark {
  /// The key is being pressed.
  Pressed,

  /// The key was part of the answer.
  Correct,

  /// The key was not part of the answer.
  Incorrect,

  /// Easy mode hint: this key is part of the answer.
  Target,
}

/// Effects are requests from the session to "do something" in the outside world.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
  /// Draw a keyboard with these keys.
  RenderKeys(Vec<NamedNote>),

  /// Remove every key mark.
  ClearMarks,

  Mark(Pitch, KeyMark),

  Unmark(Pitch, KeyMark),

  /// Show the question. `revealed` is set when a hidden name has just been found.
  SetPrompt { text: String, revealed: bool },

  SetFeedback(String),

  /// Draw these notes on a staff, as notation keys (e.g. `c#/4`).
  RenderNotation(Vec<String>),

  Play { pitches: Vec<Pitch>, duration: Duration },

  ShowStatus(String),

  /// Feed [Action::TimerFired](super::actions::Action::TimerFired) back into the session after `delay`.
  StartTimer { id: TimerId, delay: Duration },

  CancelTimer(TimerId),
}

impl Display for Effect {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    use Effect::*;
    match self {
      RenderKeys(keys) => write!(f, "RenderKeys({} keys)", keys.len()),
      ClearMarks => write!(f, "ClearMarks"),
      Mark(pitch, mark) => write!(f, "Mark({}, {mark:?})", NamedNote::new(*pitch)),
      Unmark(pitch, mark) => write!(f, "Unmark({}, {mark:?})", NamedNote::new(*pitch)),
      SetPrompt { text, revealed } => write!(f, "SetPrompt({text:?}, revealed: {revealed})"),
      SetFeedback(text) => write!(f, "SetFeedback({text:?})"),
      RenderNotation(keys) => write!(f, "RenderNotation({})", keys.join(", ")),
      Play { pitches, duration } => write!(f, "Play({} notes, {duration:?})", pitches.len()),
      ShowStatus(text) => write!(f, "ShowStatus({text:?})"),
      StartTimer { id, delay } => write!(f, "StartTimer({id}, {delay:?})"),
      CancelTimer(id) => write!(f, "CancelTimer({id})"),
    }
  }
}
