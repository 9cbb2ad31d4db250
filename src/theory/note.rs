use std::fmt::Display;
use std::str::FromStr;

use bounded_integer::bounded_integer;
use error_stack::{report, Report};

use crate::error::TrainerError;

bounded_integer! {
  /// A MIDI note number, in the range 0 ..= 127.
  ///
  /// Middle C is 60. When converting from untrusted input, use `Pitch::new`, which returns an `Option`,
  /// or [`pitch_from_int`] for signed arithmetic results.
  pub struct Pitch { 0..=127 }
}

/// The reference pitch that the playable range is built around (middle C).
pub const MIDDLE_C: u8 = 60;

/// Converts the result of signed pitch arithmetic into a [Pitch], if it's in range.
pub fn pitch_from_int(n: i32) -> Option<Pitch> {
  u8::try_from(n).ok().and_then(Pitch::new)
}

/// One of the 12 canonical pitch names of the chromatic scale, spelled with sharps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteLetter {
  C,
  Csh,
  D,
  Dsh,
  E,
  F,
  Fsh,
  G,
  Gsh,
  A,
  Ash,
  B,
}

impl NoteLetter {
  /// All letters in ascending order, starting from C.
  pub const ALL: [NoteLetter; 12] = {
    use NoteLetter::*;
    [C, Csh, D, Dsh, E, F, Fsh, G, Gsh, A, Ash, B]
  };

  pub fn of(pitch: Pitch) -> NoteLetter {
    NoteLetter::ALL[(pitch.get() % 12) as usize]
  }

  /// True for the five letters that are black keys on a piano.
  pub fn is_accidental(&self) -> bool {
    use NoteLetter::*;
    matches!(self, Csh | Dsh | Fsh | Gsh | Ash)
  }

  pub fn name(&self) -> &'static str {
    use NoteLetter::*;
    match self {
      C => "C",
      Csh => "C#",
      D => "D",
      Dsh => "D#",
      E => "E",
      F => "F",
      Fsh => "F#",
      G => "G",
      Gsh => "G#",
      A => "A",
      Ash => "A#",
      B => "B",
    }
  }
}

impl Display for NoteLetter {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.name())
  }
}

/// A [Pitch] together with its spelled name and octave.
///
/// The octave follows MIDI numbering, so pitch 60 is `C₄`:
///
/// ```rust
/// use keytrainer::theory::{NamedNote, Pitch};
///
/// let c = NamedNote::new(Pitch::new(60).unwrap());
/// assert_eq!(c.to_string(), "C₄");
/// assert_eq!(c.notation_key(), "c/4");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NamedNote {
  pitch: Pitch,
  letter: NoteLetter,
  octave: i8,
}

impl NamedNote {
  pub fn new(pitch: Pitch) -> NamedNote {
    NamedNote {
      pitch,
      letter: NoteLetter::of(pitch),
      octave: (pitch.get() / 12) as i8 - 1,
    }
  }

  pub fn pitch(&self) -> Pitch {
    self.pitch
  }

  pub fn letter(&self) -> NoteLetter {
    self.letter
  }

  pub fn is_accidental(&self) -> bool {
    self.letter.is_accidental()
  }

  /// Lowercase `letter/octave` key, the form staff notation renderers expect (e.g. `f#/3`).
  pub fn notation_key(&self) -> String {
    format!("{}/{}", self.letter.name().to_lowercase(), self.octave)
  }
}

impl Display for NamedNote {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}{}", self.letter, subscript(self.octave))
  }
}

fn subscript(n: i8) -> String {
  n.to_string()
    .chars()
    .map(|c| match c {
      '-' => '₋',
      d => char::from_u32('₀' as u32 + d.to_digit(10).unwrap_or(0)).unwrap_or(d),
    })
    .collect()
}

fn unsubscript(c: char) -> char {
  match c {
    '₋' => '-',
    '₀'..='₉' => char::from_u32('0' as u32 + (c as u32 - '₀' as u32)).unwrap_or(c),
    c => c,
  }
}

/// Parses a note name like `C4`, `f#3`, `Bb2`, `C₄` or a bare MIDI number like `60`.
pub fn parse_pitch(s: &str) -> Result<Pitch, Report<TrainerError>> {
  let s: String = s.trim().chars().map(unsubscript).collect();
  let invalid = || report!(TrainerError::InvalidNoteName(s.clone()));

  if let Ok(n) = s.parse::<i32>() {
    return pitch_from_int(n).ok_or_else(|| report!(TrainerError::InvalidPitch(n)));
  }

  let mut chars = s.chars().peekable();
  let base: i32 = match chars.next().map(|c| c.to_ascii_uppercase()) {
    Some('C') => 0,
    Some('D') => 2,
    Some('E') => 4,
    Some('F') => 5,
    Some('G') => 7,
    Some('A') => 9,
    Some('B') => 11,
    _ => return Err(invalid()),
  };

  let accidental: i32 = match chars.peek() {
    Some('#') | Some('♯') => 1,
    Some('b') | Some('♭') => -1,
    _ => 0,
  };
  if accidental != 0 {
    chars.next();
  }

  let octave: i32 = chars.collect::<String>().parse().map_err(|_| invalid())?;
  let n = (octave + 1) * 12 + base + accidental;
  pitch_from_int(n).ok_or_else(|| report!(TrainerError::InvalidPitch(n)))
}

impl FromStr for NamedNote {
  type Err = Report<TrainerError>;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    parse_pitch(s).map(NamedNote::new)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn p(n: u8) -> Pitch {
    Pitch::new(n).unwrap()
  }

  #[test]
  fn names_follow_midi_octaves() {
    assert_eq!(NamedNote::new(p(60)).to_string(), "C₄");
    assert_eq!(NamedNote::new(p(61)).to_string(), "C#₄");
    assert_eq!(NamedNote::new(p(59)).to_string(), "B₃");
    assert_eq!(NamedNote::new(p(0)).to_string(), "C₋₁");
    assert_eq!(NamedNote::new(p(127)).to_string(), "G₉");
  }

  #[test]
  fn accidentals_are_the_black_keys() {
    let black: Vec<u8> = (60..72)
      .filter(|n| NamedNote::new(p(*n)).is_accidental())
      .map(|n| n % 12)
      .collect();
    assert_eq!(black, vec![1, 3, 6, 8, 10]);
  }

  #[test]
  fn notation_keys() {
    assert_eq!(NamedNote::new(p(66)).notation_key(), "f#/4");
    assert_eq!(NamedNote::new(p(48)).notation_key(), "c/3");
  }

  #[test]
  fn parses_names_and_numbers() {
    assert_eq!(parse_pitch("C4").unwrap(), p(60));
    assert_eq!(parse_pitch("c#4").unwrap(), p(61));
    assert_eq!(parse_pitch("Bb3").unwrap(), p(58));
    assert_eq!(parse_pitch("Cb4").unwrap(), p(59));
    assert_eq!(parse_pitch("C-1").unwrap(), p(0));
    assert_eq!(parse_pitch("72").unwrap(), p(72));
    assert_eq!(parse_pitch(" G#₂ ").unwrap(), p(44));
  }

  #[test]
  fn display_names_parse_back() {
    let note = NamedNote::new(p(70));
    let parsed: NamedNote = note.to_string().parse().unwrap();
    assert_eq!(parsed, note);
  }

  #[test]
  fn pitch_covers_the_whole_midi_range() {
    assert_eq!(Pitch::new(0).map(|p| p.get()), Some(0));
    assert_eq!(Pitch::new(127).map(|p| p.get()), Some(127));
    assert_eq!(Pitch::new(128), None);
    assert_eq!(pitch_from_int(127), Pitch::new(127));
    assert_eq!(pitch_from_int(-1), None);
    assert_eq!(parse_pitch("G9").unwrap(), p(127));
  }

  #[test]
  fn rejects_bad_names() {
    assert!(parse_pitch("H4").is_err());
    assert!(parse_pitch("C").is_err());
    assert!(parse_pitch("128").is_err());
    assert!(parse_pitch("G9#").is_err());
    assert!(parse_pitch("").is_err());
  }
}
