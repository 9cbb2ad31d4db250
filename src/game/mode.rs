use std::fmt::Display;
use std::str::FromStr;

use error_stack::{report, Report};

use crate::error::TrainerError;
use crate::theory::PoolKind;

pub const MAJOR_TRIAD: [u8; 3] = [0, 4, 7];
pub const MINOR_TRIAD: [u8; 3] = [0, 3, 7];

/// The game being played. Determines which pool challenges are drawn from,
/// whether a challenge is a single note or a chord, and whether the note name is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
  /// Find white keys by name.
  #[default]
  IdentifyMajor,

  /// Find any key by name.
  IdentifyChromatic,

  /// Find black keys by name.
  BlackKeys,

  /// Find any key by ear. The name is hidden until the right key is pressed.
  EarTraining,

  /// Play a major triad rooted on a white key.
  ChordsMajor,

  /// Play a minor triad rooted on a white key.
  ChordsMinor,
}

/// What kind of challenge a [Mode] deals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeKind {
  Note,
  Chord(&'static [u8]),
}

impl Mode {
  pub const ALL: [Mode; 6] = [
    Mode::IdentifyMajor,
    Mode::IdentifyChromatic,
    Mode::BlackKeys,
    Mode::EarTraining,
    Mode::ChordsMajor,
    Mode::ChordsMinor,
  ];

  /// The pool challenges (or chord roots) are drawn from.
  pub fn pool_kind(&self) -> PoolKind {
    use Mode::*;
    match self {
      IdentifyMajor | ChordsMajor | ChordsMinor => PoolKind::Diatonic,
      IdentifyChromatic | EarTraining => PoolKind::Chromatic,
      BlackKeys => PoolKind::Accidental,
    }
  }

  pub fn challenge_kind(&self) -> ChallengeKind {
    match self {
      Mode::ChordsMajor => ChallengeKind::Chord(&MAJOR_TRIAD),
      Mode::ChordsMinor => ChallengeKind::Chord(&MINOR_TRIAD),
      _ => ChallengeKind::Note,
    }
  }

  /// True if the note name is withheld until the player finds it.
  pub fn hides_name(&self) -> bool {
    *self == Mode::EarTraining
  }

  pub fn id(&self) -> &'static str {
    use Mode::*;
    match self {
      IdentifyMajor => "identify-major",
      IdentifyChromatic => "identify-chromatic",
      BlackKeys => "black-keys",
      EarTraining => "ear-training",
      ChordsMajor => "chords-major",
      ChordsMinor => "chords-minor",
    }
  }
}

impl Display for Mode {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.id())
  }
}

impl FromStr for Mode {
  type Err = Report<TrainerError>;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let s = s.trim();
    Mode::ALL
      .into_iter()
      .find(|m| m.id() == s)
      .ok_or_else(|| report!(TrainerError::UnknownMode(s.to_string())))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_mode_identifies_white_keys() {
    let mode = Mode::default();
    assert_eq!(mode, Mode::IdentifyMajor);
    assert_eq!(mode.pool_kind(), PoolKind::Diatonic);
    assert_eq!(mode.challenge_kind(), ChallengeKind::Note);
  }

  #[test]
  fn mode_table() {
    use Mode::*;
    let expected = [
      (IdentifyMajor, PoolKind::Diatonic, ChallengeKind::Note, false),
      (IdentifyChromatic, PoolKind::Chromatic, ChallengeKind::Note, false),
      (BlackKeys, PoolKind::Accidental, ChallengeKind::Note, false),
      (EarTraining, PoolKind::Chromatic, ChallengeKind::Note, true),
      (ChordsMajor, PoolKind::Diatonic, ChallengeKind::Chord(&[0, 4, 7]), false),
      (ChordsMinor, PoolKind::Diatonic, ChallengeKind::Chord(&[0, 3, 7]), false),
    ];
    for (mode, pool, kind, hidden) in expected {
      assert_eq!(mode.pool_kind(), pool, "{mode}");
      assert_eq!(mode.challenge_kind(), kind, "{mode}");
      assert_eq!(mode.hides_name(), hidden, "{mode}");
    }
  }

  #[test]
  fn ids_parse_back() {
    for mode in Mode::ALL {
      assert_eq!(mode.id().parse::<Mode>().unwrap(), mode);
    }
    assert!("chords-diminished".parse::<Mode>().is_err());
  }
}
