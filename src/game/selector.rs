use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::theory::{NamedNote, NotePools, Pitch};

use super::challenge::{Challenge, Chord};
use super::mode::{ChallengeKind, Mode};

/// Returns the roots in `roots` whose chord built from `intervals` stays inside the pools' range.
pub fn valid_chord_roots(roots: &[NamedNote], intervals: &[u8], pools: &NotePools) -> Vec<NamedNote> {
  let (min, max) = match (pools.min_pitch(), pools.max_pitch()) {
    (Some(min), Some(max)) => (min.get() as i32, max.get() as i32),
    _ => return vec![],
  };
  let (lowest, highest) = match (intervals.iter().min(), intervals.iter().max()) {
    (Some(lo), Some(hi)) => (*lo as i32, *hi as i32),
    _ => return vec![],
  };

  roots
    .iter()
    .filter(|root| {
      let r = root.pitch().get() as i32;
      r + highest <= max && r + lowest >= min
    })
    .copied()
    .collect()
}

/// Picks a note uniformly from `pool`, never repeating `previous` when there's another choice.
pub fn select_note<R: Rng>(pool: &[NamedNote], previous: Option<Pitch>, rng: &mut R) -> Option<NamedNote> {
  let candidates: Vec<&NamedNote> = match previous {
    Some(prev) if pool.len() > 1 => pool.iter().filter(|n| n.pitch() != prev).collect(),
    _ => pool.iter().collect(),
  };
  candidates.choose(rng).map(|n| **n)
}

/// Picks a valid root uniformly and builds the chord on it.
pub fn select_chord<R: Rng>(intervals: &[u8], pools: &NotePools, roots: &[NamedNote], rng: &mut R) -> Option<Chord> {
  let valid = valid_chord_roots(roots, intervals, pools);
  let root = valid.choose(rng)?;
  Chord::build(*root, intervals, pools)
}

/// Deals the next challenge for `mode`, or `None` if the current range can't produce one.
pub fn select_challenge<R: Rng>(
  mode: Mode,
  pools: &NotePools,
  previous: Option<Pitch>,
  rng: &mut R,
) -> Option<Challenge> {
  let pool = pools.pool(mode.pool_kind());
  if pool.is_empty() {
    debug!("no notes in the {:?} pool for mode {mode}", mode.pool_kind());
    return None;
  }

  let challenge = match mode.challenge_kind() {
    ChallengeKind::Note => select_note(pool, previous, rng).map(Challenge::Note),
    ChallengeKind::Chord(intervals) => select_chord(intervals, pools, pool, rng).map(Challenge::Chord),
  };

  if challenge.is_none() {
    debug!("no challenge fits the current range for mode {mode}");
  }
  challenge
}

#[cfg(test)]
mod tests {
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  use super::*;
  use crate::game::mode::{MAJOR_TRIAD, MINOR_TRIAD};

  fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
  }

  fn root_pitches(roots: &[NamedNote]) -> Vec<u8> {
    roots.iter().map(|n| n.pitch().get()).collect()
  }

  #[test]
  fn chord_roots_must_fit_the_range() {
    let pools = NotePools::build(60, 12, 12);
    let roots = valid_chord_roots(pools.diatonic(), &MAJOR_TRIAD, &pools);
    let pitches = root_pitches(&roots);

    assert!(pitches.contains(&60));
    assert!(pitches.contains(&65));
    assert!(!pitches.contains(&69));
    assert_eq!(pitches.iter().max(), Some(&65));
    assert_eq!(pitches.iter().min(), Some(&48));
  }

  #[test]
  fn no_chord_fits_a_narrow_range() {
    let pools = NotePools::build(60, 0, 6);
    assert!(valid_chord_roots(pools.diatonic(), &MINOR_TRIAD, &pools).is_empty());
    assert_eq!(select_challenge(Mode::ChordsMinor, &pools, None, &mut rng()), None);
  }

  #[test]
  fn empty_pool_yields_no_challenge() {
    // E4 alone has no black keys
    let pools = NotePools::build(64, 0, 0);
    assert_eq!(select_challenge(Mode::BlackKeys, &pools, None, &mut rng()), None);
  }

  #[test]
  fn single_note_modes_never_repeat() {
    let pools = NotePools::build(60, 12, 12);
    let mut rng = rng();
    for mode in [Mode::IdentifyMajor, Mode::IdentifyChromatic, Mode::BlackKeys, Mode::EarTraining] {
      let mut previous = None;
      for _ in 0..200 {
        let challenge = select_challenge(mode, &pools, previous, &mut rng);
        let note = match challenge {
          Some(Challenge::Note(note)) => note,
          c => panic!("unexpected challenge for {mode}: {c:?}"),
        };
        assert_ne!(Some(note.pitch()), previous);
        assert!(pools.pool(mode.pool_kind()).contains(&note));
        previous = Some(note.pitch());
      }
    }
  }

  #[test]
  fn two_note_pool_alternates() {
    let pools = NotePools::build(60, 0, 1);
    let mut rng = rng();
    let mut previous = None;
    let mut seen = vec![];
    for _ in 0..6 {
      let note = select_note(pools.chromatic(), previous, &mut rng).unwrap();
      seen.push(note.pitch().get());
      previous = Some(note.pitch());
    }
    assert!(seen.windows(2).all(|w| w[0] != w[1]));
  }

  #[test]
  fn single_note_pool_repeats_itself() {
    let pools = NotePools::build(60, 0, 0);
    let c4 = pools.chromatic()[0];
    let note = select_note(pools.chromatic(), Some(c4.pitch()), &mut rng());
    assert_eq!(note, Some(c4));
  }

  #[test]
  fn chord_modes_build_triads_on_white_keys() {
    let pools = NotePools::build(60, 12, 12);
    let mut rng = rng();
    for _ in 0..50 {
      match select_challenge(Mode::ChordsMajor, &pools, None, &mut rng) {
        Some(Challenge::Chord(chord)) => {
          let root = chord.root().pitch().get();
          let pitches = root_pitches(chord.notes());
          assert_eq!(pitches, vec![root, root + 4, root + 7]);
          assert!(!chord.root().is_accidental());
          assert!(root + 7 <= 72);
        }
        c => panic!("unexpected challenge: {c:?}"),
      }
    }
  }

  #[test]
  fn seeded_selection_is_reproducible() {
    let pools = NotePools::build(60, 12, 12);
    let a = select_challenge(Mode::IdentifyChromatic, &pools, None, &mut StdRng::seed_from_u64(42));
    let b = select_challenge(Mode::IdentifyChromatic, &pools, None, &mut StdRng::seed_from_u64(42));
    assert_eq!(a, b);
  }
}
