use log::debug;

use super::note::{pitch_from_int, NamedNote, Pitch};

/// Selects one of the projections held by [NotePools].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolKind {
  /// Every note in the range.
  Chromatic,

  /// Notes without an accidental (the white keys).
  Diatonic,

  /// Notes with an accidental (the black keys).
  Accidental,
}

/// The playable notes for a configured range, in ascending pitch order.
///
/// `diatonic` and `accidental` are always disjoint projections of `chromatic`.
/// A range that lies entirely outside the MIDI note range produces empty pools.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePools {
  chromatic: Vec<NamedNote>,
  diatonic: Vec<NamedNote>,
  accidental: Vec<NamedNote>,
}

impl NotePools {
  /// Builds the pools for every pitch in `reference - below ..= reference + above`,
  /// clipped to the MIDI note range.
  pub fn build(reference: u8, below: u8, above: u8) -> NotePools {
    let start = reference as i32 - below as i32;
    let end = reference as i32 + above as i32;

    let chromatic: Vec<NamedNote> = (start..=end)
      .filter_map(pitch_from_int)
      .map(NamedNote::new)
      .collect();

    let (accidental, diatonic): (Vec<NamedNote>, Vec<NamedNote>) =
      chromatic.iter().copied().partition(|n| n.is_accidental());

    debug!(
      "built note pools for {start}..={end}: {} chromatic, {} diatonic, {} accidental",
      chromatic.len(),
      diatonic.len(),
      accidental.len()
    );

    NotePools {
      chromatic,
      diatonic,
      accidental,
    }
  }

  pub fn chromatic(&self) -> &[NamedNote] {
    &self.chromatic
  }

  pub fn diatonic(&self) -> &[NamedNote] {
    &self.diatonic
  }

  pub fn accidental(&self) -> &[NamedNote] {
    &self.accidental
  }

  pub fn pool(&self, kind: PoolKind) -> &[NamedNote] {
    match kind {
      PoolKind::Chromatic => self.chromatic(),
      PoolKind::Diatonic => self.diatonic(),
      PoolKind::Accidental => self.accidental(),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.chromatic.is_empty()
  }

  pub fn min_pitch(&self) -> Option<Pitch> {
    self.chromatic.first().map(NamedNote::pitch)
  }

  pub fn max_pitch(&self) -> Option<Pitch> {
    self.chromatic.last().map(NamedNote::pitch)
  }

  /// Looks up the note for `pitch`, if it's within the range.
  pub fn find(&self, pitch: Pitch) -> Option<NamedNote> {
    self
      .chromatic
      .binary_search_by_key(&pitch, NamedNote::pitch)
      .ok()
      .map(|i| self.chromatic[i])
  }
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeSet;

  use super::*;

  fn pitches(notes: &[NamedNote]) -> Vec<u8> {
    notes.iter().map(|n| n.pitch().get()).collect()
  }

  #[test]
  fn one_octave_around_middle_c() {
    let pools = NotePools::build(60, 0, 11);
    assert_eq!(pitches(pools.chromatic()), (60..=71).collect::<Vec<u8>>());
    assert_eq!(pitches(pools.diatonic()), vec![60, 62, 64, 65, 67, 69, 71]);
    assert_eq!(pitches(pools.accidental()), vec![61, 63, 66, 68, 70]);
    assert_eq!(pools.min_pitch().map(|p| p.get()), Some(60));
    assert_eq!(pools.max_pitch().map(|p| p.get()), Some(71));
  }

  #[test]
  fn projections_partition_the_chromatic_range() {
    for (below, above) in [(0, 0), (1, 0), (12, 12), (7, 30), (48, 48), (5, 1)] {
      let pools = NotePools::build(60, below, above);
      let chromatic: BTreeSet<u8> = pitches(pools.chromatic()).into_iter().collect();
      let diatonic: BTreeSet<u8> = pitches(pools.diatonic()).into_iter().collect();
      let accidental: BTreeSet<u8> = pitches(pools.accidental()).into_iter().collect();

      assert!(diatonic.is_disjoint(&accidental));
      let union: BTreeSet<u8> = diatonic.union(&accidental).copied().collect();
      assert_eq!(union, chromatic);
      assert_eq!(chromatic.len(), below as usize + above as usize + 1);
    }
  }

  #[test]
  fn building_is_idempotent() {
    assert_eq!(NotePools::build(60, 12, 7), NotePools::build(60, 12, 7));
  }

  #[test]
  fn single_note_range() {
    let pools = NotePools::build(60, 0, 0);
    assert_eq!(pitches(pools.chromatic()), vec![60]);
    assert_eq!(pitches(pools.diatonic()), vec![60]);
    assert!(pools.accidental().is_empty());
  }

  #[test]
  fn range_is_clipped_to_midi_bounds() {
    let pools = NotePools::build(120, 2, 20);
    assert_eq!(pools.min_pitch().map(|p| p.get()), Some(118));
    assert_eq!(pools.max_pitch().map(|p| p.get()), Some(127));

    let pools = NotePools::build(120, 0, 7);
    assert_eq!(pools.chromatic().len(), 8);

    let pools = NotePools::build(3, 10, 0);
    assert_eq!(pitches(pools.chromatic()), vec![0, 1, 2, 3]);
  }

  #[test]
  fn find_resolves_pitches_inside_the_range() {
    let pools = NotePools::build(60, 12, 12);
    let e4 = Pitch::new(64).unwrap();
    assert_eq!(pools.find(e4).map(|n| n.to_string()), Some("E₄".to_string()));
    assert_eq!(pools.find(Pitch::new(73).unwrap()), None);
    assert_eq!(pools.find(Pitch::new(47).unwrap()), None);
  }
}
