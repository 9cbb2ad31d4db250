use std::collections::BTreeSet;
use std::fmt::Display;

use crate::theory::{pitch_from_int, NamedNote, NotePools, Pitch};

use super::mode::{MAJOR_TRIAD, MINOR_TRIAD};

/// A chord the player has to play, tracking which of its pitches have been found so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chord {
  root: NamedNote,
  intervals: Vec<u8>,
  notes: Vec<NamedNote>,
  matched: BTreeSet<Pitch>,
}

impl Chord {
  /// Builds the chord on `root` by resolving each interval through the chromatic pool.
  ///
  /// Returns `None` if any chord tone falls outside the pool's range.
  pub fn build(root: NamedNote, intervals: &[u8], pools: &NotePools) -> Option<Chord> {
    let notes = intervals
      .iter()
      .map(|i| pitch_from_int(root.pitch().get() as i32 + *i as i32).and_then(|p| pools.find(p)))
      .collect::<Option<Vec<NamedNote>>>()?;

    Some(Chord {
      root,
      intervals: intervals.to_vec(),
      notes,
      matched: BTreeSet::new(),
    })
  }

  pub fn root(&self) -> NamedNote {
    self.root
  }

  pub fn notes(&self) -> &[NamedNote] {
    &self.notes
  }

  pub fn matched(&self) -> &BTreeSet<Pitch> {
    &self.matched
  }

  pub fn contains(&self, pitch: Pitch) -> bool {
    self.notes.iter().any(|n| n.pitch() == pitch)
  }

  pub fn is_complete(&self) -> bool {
    self.matched.len() == self.notes.len()
  }

  /// `C Major`, `A Minor`, or `F# Chord` for interval sets without a known label.
  pub fn name(&self) -> String {
    format!("{} {}", self.root.letter(), chord_label(&self.intervals))
  }
}

impl Display for Chord {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let notes: Vec<String> = self.notes.iter().map(|n| n.to_string()).collect();
    write!(f, "{} ({})", self.name(), notes.join(" - "))
  }
}

pub fn chord_label(intervals: &[u8]) -> &'static str {
  if intervals == MAJOR_TRIAD {
    "Major"
  } else if intervals == MINOR_TRIAD {
    "Minor"
  } else {
    "Chord"
  }
}

/// The question the player is currently answering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Challenge {
  Note(NamedNote),
  Chord(Chord),
}

impl Challenge {
  pub fn notes(&self) -> &[NamedNote] {
    match self {
      Challenge::Note(note) => std::slice::from_ref(note),
      Challenge::Chord(chord) => chord.notes(),
    }
  }

  pub fn pitches(&self) -> Vec<Pitch> {
    self.notes().iter().map(NamedNote::pitch).collect()
  }
}

impl Display for Challenge {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Challenge::Note(note) => write!(f, "{note}"),
      Challenge::Chord(chord) => write!(f, "{chord}"),
    }
  }
}

/// Where an [ActiveChallenge] is in its lifecycle. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  Presented,

  /// Some, but not all, chord tones have been found.
  PartiallyMatched,

  Solved,
}

/// The result of pressing a key against the active challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  /// The pitch belongs to the challenge, but the challenge isn't solved yet.
  Matched,

  /// This press solved the challenge.
  Solved,

  /// The pitch belongs to a challenge that was already solved.
  AlreadySolved,

  /// The pitch is not part of the challenge.
  Missed,
}


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveChallenge {
  challenge: Challenge,
  phase: Phase,
}

impl ActiveChallenge {
  pub fn new(challenge: Challenge) -> Self {
    ActiveChallenge {
      challenge,
      phase: Phase::Presented,
    }
  }

  pub fn challenge(&self) -> &Challenge {
    &self.challenge
  }

  pub fn phase(&self) -> Phase {
    self.phase
  }

  pub fn is_solved(&self) -> bool {
    self.phase == Phase::Solved
  }

  /// Matches a pressed pitch against the challenge and advances the phase.
  /// Misses never change the challenge.
  pub fn press(&mut self, pitch: Pitch) -> Outcome {
    use Phase::*;

    let solved = self.is_solved();
    match &mut self.challenge {
      Challenge::Note(note) if note.pitch() == pitch => {
        if solved {
          return Outcome::AlreadySolved;
        }
        self.phase = Solved;
        Outcome::Solved
      }

      Challenge::Note(_) => Outcome::Missed,

      Challenge::Chord(chord) if chord.contains(pitch) => {
        if solved {
          return Outcome::AlreadySolved;
        }
        chord.matched.insert(pitch);
        if chord.is_complete() {
          self.phase = Solved;
          Outcome::Solved
        } else {
          self.phase = PartiallyMatched;
          Outcome::Matched
        }
      }

      Challenge::Chord(_) => Outcome::Missed,
    }
  }
}
