//! Adapters between the game session and the outside world.
//!
//! The session only emits [Effect](crate::game::Effect)s; the [driver](crate::driver) hands them to
//! a [Presentation] and an [AudioService]. Both may fail, and a failure never stops the game.

pub mod audio;
pub mod commands;
pub mod terminal;

use std::time::Duration;

use error_stack::Result;

use crate::error::TrainerError;
use crate::game::KeyMark;
use crate::theory::{NamedNote, Pitch};

pub use audio::{MidiAudio, SilentAudio};
pub use commands::{parse_command, TerminalCommand, HELP};
pub use terminal::TerminalPresenter;

/// Draws the keyboard, prompt, feedback and notation.
pub trait Presentation {
  fn render_keys(&mut self, keys: &[NamedNote]) -> Result<(), TrainerError>;

  fn clear_marks(&mut self) -> Result<(), TrainerError>;

  fn mark(&mut self, pitch: Pitch, mark: KeyMark) -> Result<(), TrainerError>;

  fn unmark(&mut self, pitch: Pitch, mark: KeyMark) -> Result<(), TrainerError>;

  fn set_prompt(&mut self, text: &str, revealed: bool) -> Result<(), TrainerError>;

  fn set_feedback(&mut self, text: &str) -> Result<(), TrainerError>;

  /// `keys` are notation keys like `c#/4`. An empty slice clears the staff.
  fn render_notation(&mut self, keys: &[String]) -> Result<(), TrainerError>;

  /// Connection status and other messages that aren't part of the game.
  fn show_status(&mut self, text: &str) -> Result<(), TrainerError>;
}

/// Plays pitches. Playback is fire-and-forget; callers never wait for it to finish.
pub trait AudioService {
  fn play(&mut self, pitches: &[Pitch], duration: Duration) -> Result<(), TrainerError>;
}
