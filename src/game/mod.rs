//! Game logic: challenge selection, answer matching, and mode control.
//!
//! The [Session] is a plain state machine. Feed it [Action]s, perform the [Effect]s it returns.
//! Timing is expressed through [Effect::StartTimer] / [Effect::CancelTimer], so the session can be
//! driven by a real event loop or stepped by hand in tests.

pub mod actions;
pub mod challenge;
pub mod effects;
pub mod mode;
pub mod selector;
pub mod session;

pub use actions::Action;
pub use challenge::{ActiveChallenge, Challenge, Chord, Outcome, Phase};
pub use effects::{Effect, KeyMark, TimerId};
pub use mode::Mode;
pub use session::Session;
