//! Ear training and piano practice.
//!
//! The [game] module holds the rules as a plain state machine; [driver] runs it against a
//! [shell] presentation and audio service, with input from the terminal or a [midi] keyboard.

pub mod config;
pub mod driver;
pub mod error;
pub mod game;
pub mod midi;
pub mod shell;
pub mod theory;
