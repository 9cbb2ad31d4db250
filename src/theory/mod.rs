//! Pitches, note names, and the pools of notes a game draws from.

pub mod note;
pub mod pool;

pub use note::{parse_pitch, pitch_from_int, NamedNote, NoteLetter, Pitch, MIDDLE_C};
pub use pool::{NotePools, PoolKind};
