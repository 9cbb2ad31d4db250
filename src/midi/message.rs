use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::theory::Pitch;

/// The high nibble of a MIDI channel message's status byte.
#[derive(Debug, FromPrimitive, PartialEq, Clone, Copy)]
pub enum MidiStatus {
  NoteOff = 0x8,
  NoteOn = 0x9,
  PolyAftertouch = 0xA,
  ControlChange = 0xB,
  ProgramChange = 0xC,
  ChannelPressure = 0xD,
  PitchBend = 0xE,
  System = 0xF,
}

pub fn status_of(msg: &[u8]) -> Option<MidiStatus> {
  let status_byte = *msg.first()?;
  FromPrimitive::from_u8(status_byte >> 4)
}

/// Decodes a note-on message with a positive velocity into its pitch and velocity, on any channel.
///
/// Note-on with velocity 0 means note-off, and is rejected along with every other message type.
pub fn decode_note_on(msg: &[u8]) -> Option<(Pitch, u8)> {
  match (status_of(msg)?, msg) {
    (MidiStatus::NoteOn, [_, note, velocity, ..]) if *velocity > 0 => {
      Pitch::new(*note).map(|p| (p, *velocity))
    }
    _ => None,
  }
}

pub fn note_on(pitch: Pitch, velocity: u8) -> [u8; 3] {
  [(MidiStatus::NoteOn as u8) << 4, pitch.get(), velocity.min(127)]
}

pub fn note_off(pitch: Pitch) -> [u8; 3] {
  [(MidiStatus::NoteOff as u8) << 4, pitch.get(), 0]
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn note_on_with_velocity_is_a_press() {
    assert_eq!(decode_note_on(&[0x90, 60, 100]), Some((Pitch::new(60).unwrap(), 100)));
    // any channel
    assert_eq!(decode_note_on(&[0x9f, 72, 1]), Some((Pitch::new(72).unwrap(), 1)));
    // top key of the MIDI range
    assert_eq!(decode_note_on(&[0x90, 127, 100]), Some((Pitch::new(127).unwrap(), 100)));
  }

  #[test]
  fn everything_else_is_ignored() {
    assert_eq!(decode_note_on(&[0x90, 60, 0]), None);
    assert_eq!(decode_note_on(&[0x80, 60, 64]), None);
    assert_eq!(decode_note_on(&[0xb0, 64, 127]), None);
    assert_eq!(decode_note_on(&[0xf8]), None);
    assert_eq!(decode_note_on(&[0x90, 60]), None);
    assert_eq!(decode_note_on(&[0x90, 200, 10]), None);
    assert_eq!(decode_note_on(&[]), None);
  }

  #[test]
  fn status_nibbles() {
    assert_eq!(status_of(&[0x85, 1, 2]), Some(MidiStatus::NoteOff));
    assert_eq!(status_of(&[0xe0, 0, 64]), Some(MidiStatus::PitchBend));
    assert_eq!(status_of(&[0x40]), None);
  }

  #[test]
  fn encodes_channel_one_notes() {
    let a4 = Pitch::new(69).unwrap();
    assert_eq!(note_on(a4, 96), [0x90, 69, 96]);
    assert_eq!(note_off(a4), [0x80, 69, 0]);
  }
}
