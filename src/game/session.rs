//! The game session: mode control and answer matching.
//!
//! A [Session] owns everything that changes while a game is played: the mode, the note pools,
//! the active challenge, and the timers it has asked for. It never touches the outside world.
//! Each [Action] fed to [Session::handle] returns the [Effect]s the caller should perform.
//!
//! Challenge lifecycle:
//!
//! ```text
//!   Presented ──► PartiallyMatched* ──► Solved ──► (next challenge dealt after a delay)
//! ```
//!
//! Solving starts one advance timer; while it's pending, further correct presses don't start another.
//! Dealing a new challenge cancels every pending timer of the previous one.

use std::collections::HashMap;
use std::time::Duration;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use crate::config::{RangeSpan, TrainerConfig};
use crate::theory::{NamedNote, NotePools, Pitch, MIDDLE_C};

use super::actions::Action;
use super::challenge::{ActiveChallenge, Challenge, Outcome};
use super::effects::{Effect, KeyMark, TimerId};
use super::mode::Mode;
use super::selector::select_challenge;

/// Delay between dealing a challenge and playing it, so the display updates first.
pub const PLAYBACK_DELAY: Duration = Duration::from_millis(300);
pub const NOTE_DURATION: Duration = Duration::from_millis(1800);
pub const CHORD_DURATION: Duration = Duration::from_secs(2);
pub const CHORD_REPLAY_DURATION: Duration = Duration::from_millis(1500);
pub const PRESSED_KEY_DURATION: Duration = Duration::from_millis(1500);
pub const MARK_DURATION: Duration = Duration::from_millis(250);
pub const NOTE_ADVANCE_DELAY: Duration = Duration::from_millis(1200);
pub const CHORD_ADVANCE_DELAY: Duration = Duration::from_millis(1500);

pub const HIDDEN_PROMPT: &str = "?";
pub const SOLVED_FEEDBACK: &str = "✅";

/// What a pending timer will do when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Timer {
  PlayChallenge,
  Advance,
  ClearMark(Pitch, KeyMark),
}

pub struct Session<R: Rng = StdRng> {
  mode: Mode,
  easy_mode: bool,
  reference: u8,
  range_below: RangeSpan,
  range_above: RangeSpan,
  pools: NotePools,

  active: Option<ActiveChallenge>,
  previous_note: Option<Pitch>,
  prompt: String,

  pending_advance: Option<TimerId>,
  timers: HashMap<TimerId, Timer>,

  rng: R,
}

impl Session<StdRng> {
  pub fn from_entropy(config: &TrainerConfig) -> Self {
    Session::new(config, StdRng::from_entropy())
  }
}

impl<R: Rng> Session<R> {
  /// Creates a session around middle C. Nothing is dealt until [Action::Start].
  pub fn new(config: &TrainerConfig, rng: R) -> Self {
    let reference = MIDDLE_C;
    Session {
      mode: config.mode,
      easy_mode: config.easy_mode,
      reference,
      range_below: config.range_below,
      range_above: config.range_above,
      pools: NotePools::build(reference, config.range_below.get(), config.range_above.get()),
      active: None,
      previous_note: None,
      prompt: String::new(),
      pending_advance: None,
      timers: HashMap::new(),
      rng,
    }
  }

  pub fn mode(&self) -> Mode {
    self.mode
  }

  pub fn easy_mode(&self) -> bool {
    self.easy_mode
  }

  pub fn range(&self) -> (RangeSpan, RangeSpan) {
    (self.range_below, self.range_above)
  }

  pub fn pools(&self) -> &NotePools {
    &self.pools
  }

  pub fn active(&self) -> Option<&ActiveChallenge> {
    self.active.as_ref()
  }

  pub fn prompt(&self) -> &str {
    &self.prompt
  }

  pub fn is_awaiting_advance(&self) -> bool {
    self.pending_advance.is_some()
  }

  pub fn handle(&mut self, action: Action) -> Vec<Effect> {
    use Action::*;

    debug!("handling action {action}");
    let mut effects = vec![];
    match action {
      Start => {
        effects.push(Effect::RenderKeys(self.pools.chromatic().to_vec()));
        self.deal(&mut effects);
      }

      SetMode(mode) => {
        info!("switching mode to {mode}");
        self.mode = mode;
        self.deal(&mut effects);
      }

      SetRange { below, above } => {
        self.range_below = below;
        self.range_above = above;
        self.pools = NotePools::build(self.reference, below.get(), above.get());
        effects.push(Effect::RenderKeys(self.pools.chromatic().to_vec()));
        self.deal(&mut effects);
      }

      SetEasyMode(on) => {
        self.easy_mode = on;
        self.deal(&mut effects);
      }

      KeyPressed(pitch) => self.key_pressed(pitch, &mut effects),

      Replay => {
        if let Some(active) = &self.active {
          let duration = match active.challenge() {
            Challenge::Note(_) => NOTE_DURATION,
            Challenge::Chord(_) => CHORD_REPLAY_DURATION,
          };
          effects.push(Effect::Play {
            pitches: active.challenge().pitches(),
            duration,
          });
        }
      }

      Notify(text) => effects.push(Effect::ShowStatus(text)),

      TimerFired(id) => self.timer_fired(id, &mut effects),
    }
    effects
  }

  /// Replaces the active challenge with a fresh one, cancelling everything the old one had pending.
  fn deal(&mut self, effects: &mut Vec<Effect>) {
    for id in self.timers.drain().map(|(id, _)| id) {
      effects.push(Effect::CancelTimer(id));
    }
    self.pending_advance = None;

    effects.push(Effect::ClearMarks);
    effects.push(Effect::SetFeedback(String::new()));

    let previous = self.previous_note;
    let challenge = match select_challenge(self.mode, &self.pools, previous, &mut self.rng) {
      Some(c) => c,
      None => {
        self.active = None;
        self.prompt.clear();
        effects.push(Effect::SetPrompt {
          text: String::new(),
          revealed: false,
        });
        effects.push(Effect::RenderNotation(vec![]));
        return;
      }
    };

    debug!("dealt challenge: {challenge}");
    if let Challenge::Note(note) = &challenge {
      self.previous_note = Some(note.pitch());
    }

    self.prompt = if self.mode.hides_name() {
      HIDDEN_PROMPT.to_string()
    } else {
      challenge.to_string()
    };
    effects.push(Effect::SetPrompt {
      text: self.prompt.clone(),
      revealed: false,
    });

    if self.easy_mode && !self.mode.hides_name() {
      for pitch in challenge.pitches() {
        effects.push(Effect::Mark(pitch, KeyMark::Target));
      }
    }

    effects.push(Effect::RenderNotation(
      challenge.notes().iter().map(NamedNote::notation_key).collect(),
    ));
    self.start_timer(Timer::PlayChallenge, PLAYBACK_DELAY, effects);

    self.active = Some(ActiveChallenge::new(challenge));
  }

  fn key_pressed(&mut self, pitch: Pitch, effects: &mut Vec<Effect>) {
    effects.push(Effect::Play {
      pitches: vec![pitch],
      duration: PRESSED_KEY_DURATION,
    });
    self.flash(pitch, KeyMark::Pressed, effects);

    let active = match &mut self.active {
      Some(active) => active,
      None => return,
    };

    let outcome = active.press(pitch);
    debug!("key {} -> {outcome:?}", NamedNote::new(pitch));

    let (advance_delay, target_note) = match active.challenge() {
      Challenge::Note(note) => (NOTE_ADVANCE_DELAY, Some(*note)),
      Challenge::Chord(_) => (CHORD_ADVANCE_DELAY, None),
    };

    match outcome {
      Outcome::Missed => {
        self.flash(pitch, KeyMark::Incorrect, effects);
        if self.easy_mode {
          if let Some(note) = target_note {
            effects.push(Effect::Mark(note.pitch(), KeyMark::Target));
          }
        }
      }

      Outcome::Matched => self.flash(pitch, KeyMark::Correct, effects),

      Outcome::Solved | Outcome::AlreadySolved => {
        self.flash(pitch, KeyMark::Correct, effects);
        effects.push(Effect::SetFeedback(SOLVED_FEEDBACK.to_string()));

        if self.mode.hides_name() {
          if let Some(note) = target_note {
            self.prompt = note.to_string();
            effects.push(Effect::SetPrompt {
              text: self.prompt.clone(),
              revealed: true,
            });
          }
        }

        if self.pending_advance.is_none() {
          let id = self.start_timer(Timer::Advance, advance_delay, effects);
          self.pending_advance = Some(id);
        }
      }
    }
  }

  fn timer_fired(&mut self, id: TimerId, effects: &mut Vec<Effect>) {
    let timer = match self.timers.remove(&id) {
      Some(t) => t,
      None => {
        debug!("ignoring stale timer {id}");
        return;
      }
    };

    match timer {
      Timer::PlayChallenge => {
        if let Some(active) = &self.active {
          let duration = match active.challenge() {
            Challenge::Note(_) => NOTE_DURATION,
            Challenge::Chord(_) => CHORD_DURATION,
          };
          effects.push(Effect::Play {
            pitches: active.challenge().pitches(),
            duration,
          });
        }
      }

      Timer::Advance => {
        self.pending_advance = None;
        self.deal(effects);
      }

      Timer::ClearMark(pitch, mark) => effects.push(Effect::Unmark(pitch, mark)),
    }
  }

  /// Marks a key and starts a timer to unmark it again.
  fn flash(&mut self, pitch: Pitch, mark: KeyMark, effects: &mut Vec<Effect>) {
    effects.push(Effect::Mark(pitch, mark));
    self.start_timer(Timer::ClearMark(pitch, mark), MARK_DURATION, effects);
  }

  fn start_timer(&mut self, timer: Timer, delay: Duration, effects: &mut Vec<Effect>) -> TimerId {
    let id = Uuid::new_v4();
    self.timers.insert(id, timer);
    effects.push(Effect::StartTimer { id, delay });
    id
  }
}
