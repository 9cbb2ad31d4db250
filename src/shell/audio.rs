use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use error_stack::{report, Result};
use log::{debug, warn};
use midir::MidiOutputConnection;

use super::AudioService;
use crate::error::TrainerError;
use crate::midi::message::{note_off, note_on};
use crate::theory::{NamedNote, Pitch};

const VELOCITY: u8 = 96;

/// Counts strikes per pitch, so a note-off scheduled for an earlier strike can tell it has been
/// superseded and must not cut the newer note short.
#[derive(Debug, Default)]
struct HeldNotes {
  strikes: BTreeMap<Pitch, u64>,
}

impl HeldNotes {
  /// Records a note-on and returns the strike its note-off has to match.
  fn strike(&mut self, pitch: Pitch) -> u64 {
    let count = self.strikes.entry(pitch).or_insert(0);
    *count += 1;
    *count
  }

  /// True if `strike` is still the latest for `pitch`, i.e. its note-off should be sent.
  fn release(&mut self, pitch: Pitch, strike: u64) -> bool {
    if self.strikes.get(&pitch) == Some(&strike) {
      self.strikes.remove(&pitch);
      true
    } else {
      false
    }
  }
}

struct Output {
  conn: MidiOutputConnection,
  held: HeldNotes,
}

/// Plays notes on a MIDI output port, e.g. a software synthesizer.
///
/// Note-offs are sent from a spawned task after the requested duration, so `play` must be called
/// from within a tokio runtime.
pub struct MidiAudio {
  output: Arc<Mutex<Output>>,
}

impl MidiAudio {
  pub fn new(conn: MidiOutputConnection) -> Self {
    MidiAudio {
      output: Arc::new(Mutex::new(Output {
        conn,
        held: HeldNotes::default(),
      })),
    }
  }
}

fn lock(output: &Mutex<Output>) -> Result<MutexGuard<'_, Output>, TrainerError> {
  output
    .lock()
    .map_err(|_| report!(TrainerError::AudioError).attach_printable("midi output lock poisoned"))
}

fn send(conn: &mut MidiOutputConnection, msg: &[u8]) -> Result<(), TrainerError> {
  conn.send(msg).map_err(|e| {
    report!(TrainerError::MidiSendError).attach_printable(format!("midi send error: {e}"))
  })
}

impl AudioService for MidiAudio {
  fn play(&mut self, pitches: &[Pitch], duration: Duration) -> Result<(), TrainerError> {
    let mut strikes = vec![];
    {
      let mut output = lock(&self.output)?;
      for pitch in pitches {
        send(&mut output.conn, &note_on(*pitch, VELOCITY))?;
        let strike = output.held.strike(*pitch);
        strikes.push((*pitch, strike));
      }
    }

    let output = self.output.clone();
    tokio::spawn(async move {
      tokio::time::sleep(duration).await;
      let res = lock(&output).and_then(|mut output| {
        for (pitch, strike) in strikes {
          if output.held.release(pitch, strike) {
            send(&mut output.conn, &note_off(pitch))?;
          } else {
            debug!("{} was struck again, keeping it held", NamedNote::new(pitch));
          }
        }
        Ok(())
      });
      if let Err(err) = res {
        warn!("unable to release notes: {err:?}");
      }
    });
    Ok(())
  }
}

/// Logs what would be played. Used when no MIDI output is configured.
#[derive(Debug, Default)]
pub struct SilentAudio;

impl AudioService for SilentAudio {
  fn play(&mut self, pitches: &[Pitch], duration: Duration) -> Result<(), TrainerError> {
    let names: Vec<String> = pitches.iter().map(|p| NamedNote::new(*p).to_string()).collect();
    debug!("play {} for {duration:?}", names.join(" "));
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn p(n: u8) -> Pitch {
    Pitch::new(n).unwrap()
  }

  #[test]
  fn only_the_latest_strike_releases_a_note() {
    let mut held = HeldNotes::default();
    let first = held.strike(p(60));
    let second = held.strike(p(60));
    let e4 = held.strike(p(64));

    // the first note-off arrives while the second strike is still sounding
    assert!(!held.release(p(60), first));
    assert!(held.release(p(64), e4));
    assert!(held.release(p(60), second));
  }

  #[test]
  fn released_notes_start_over() {
    let mut held = HeldNotes::default();
    let strike = held.strike(p(67));
    assert!(held.release(p(67), strike));
    assert!(!held.release(p(67), strike));

    let again = held.strike(p(67));
    assert!(held.release(p(67), again));
  }
}
