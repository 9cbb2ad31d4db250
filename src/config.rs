//! Trainer settings, loaded from an optional INI file.
//!
//! ```ini
//! [range]
//! below = 12
//! above = 24
//!
//! [game]
//! mode = chords-minor
//! easy_mode = true
//!
//! [midi]
//! input = Digital Piano
//! output = FluidSynth
//! ```

use std::path::Path;

use bounded_integer::bounded_integer;
use error_stack::{report, Result, ResultExt};
use ini::{Ini, Properties};

use crate::error::TrainerError;
use crate::game::Mode;

bounded_integer! {
  /// How many semitones the playable range extends below or above middle C, in the range 0 ..= 48.
  pub struct RangeSpan { 0..=48 }
}

pub const DEFAULT_SPAN: u8 = 12;

pub fn parse_span(s: &str) -> Result<RangeSpan, TrainerError> {
  let n: u32 = s
    .trim()
    .parse()
    .map_err(|e| report!(TrainerError::ConfigValueError(s.to_string())).attach_printable(format!("{e}")))?;
  u8::try_from(n)
    .ok()
    .and_then(RangeSpan::new)
    .ok_or_else(|| report!(TrainerError::InvalidRangeSpan(n)))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainerConfig {
  pub mode: Mode,
  pub range_below: RangeSpan,
  pub range_above: RangeSpan,

  /// Mark the keys to press as soon as a challenge is dealt.
  pub easy_mode: bool,

  /// Name of the MIDI input port to listen to. Without one, only terminal input is used.
  pub midi_input: Option<String>,

  /// Name of the MIDI output port that challenges are played on.
  pub midi_output: Option<String>,
}

impl Default for TrainerConfig {
  fn default() -> Self {
    TrainerConfig {
      mode: Mode::default(),
      range_below: RangeSpan::new(DEFAULT_SPAN).unwrap_or_default(),
      range_above: RangeSpan::new(DEFAULT_SPAN).unwrap_or_default(),
      easy_mode: false,
      midi_input: None,
      midi_output: None,
    }
  }
}

impl TrainerConfig {
  pub fn load(path: &Path) -> Result<TrainerConfig, TrainerError> {
    let ini = Ini::load_from_file(path).map_err(|e| {
      report!(TrainerError::ConfigReadError)
        .attach_printable(format!("unable to read {}: {e}", path.display()))
    })?;
    TrainerConfig::from_ini(&ini)
  }

  pub fn from_ini_str(s: &str) -> Result<TrainerConfig, TrainerError> {
    let ini = Ini::load_from_str(s)
      .map_err(|e| report!(TrainerError::ConfigReadError).attach_printable(format!("{e}")))?;
    TrainerConfig::from_ini(&ini)
  }

  /// Reads settings from `ini`. Missing sections and keys keep their defaults.
  pub fn from_ini(ini: &Ini) -> Result<TrainerConfig, TrainerError> {
    let mut config = TrainerConfig::default();

    if let Some(range) = ini.section(Some("range")) {
      if let Some(below) = range.get("below") {
        config.range_below = parse_span(below).attach_printable("in [range] below")?;
      }
      if let Some(above) = range.get("above") {
        config.range_above = parse_span(above).attach_printable("in [range] above")?;
      }
    }

    if let Some(game) = ini.section(Some("game")) {
      if let Some(mode) = game.get("mode") {
        config.mode = mode.parse::<Mode>().attach_printable("in [game] mode")?;
      }
      if let Some(easy) = game.get("easy_mode") {
        config.easy_mode = parse_bool(easy).attach_printable("in [game] easy_mode")?;
      }
    }

    if let Some(midi) = ini.section(Some("midi")) {
      config.midi_input = non_empty(midi, "input");
      config.midi_output = non_empty(midi, "output");
    }

    Ok(config)
  }
}

pub fn parse_bool(s: &str) -> Result<bool, TrainerError> {
  match s.trim().to_ascii_lowercase().as_str() {
    "true" | "yes" | "on" | "1" => Ok(true),
    "false" | "no" | "off" | "0" => Ok(false),
    _ => Err(report!(TrainerError::ConfigValueError(s.to_string()))),
  }
}

fn non_empty(props: &Properties, key: &str) -> Option<String> {
  props
    .get(key)
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::to_string)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults() {
    let config = TrainerConfig::default();
    assert_eq!(config.mode, Mode::IdentifyMajor);
    assert_eq!(config.range_below.get(), 12);
    assert_eq!(config.range_above.get(), 12);
    assert!(!config.easy_mode);
    assert_eq!(config.midi_input, None);
  }

  #[test]
  fn reads_all_sections() {
    let config = TrainerConfig::from_ini_str(
      "[range]\nbelow = 5\nabove = 24\n\n[game]\nmode = ear-training\neasy_mode = yes\n\n[midi]\ninput = Digital Piano\noutput =\n",
    )
    .unwrap();

    assert_eq!(config.range_below.get(), 5);
    assert_eq!(config.range_above.get(), 24);
    assert_eq!(config.mode, Mode::EarTraining);
    assert!(config.easy_mode);
    assert_eq!(config.midi_input.as_deref(), Some("Digital Piano"));
    assert_eq!(config.midi_output, None);
  }

  #[test]
  fn missing_keys_keep_defaults() {
    let config = TrainerConfig::from_ini_str("[range]\nabove = 3\n").unwrap();
    assert_eq!(config.range_below.get(), 12);
    assert_eq!(config.range_above.get(), 3);
    assert_eq!(config.mode, Mode::IdentifyMajor);
  }

  #[test]
  fn rejects_out_of_range_spans() {
    let err = TrainerConfig::from_ini_str("[range]\nbelow = 49\n").unwrap_err();
    assert_eq!(err.current_context(), &TrainerError::InvalidRangeSpan(49));

    assert!(parse_span("-1").is_err());
    assert_eq!(parse_span(" 48 ").unwrap().get(), 48);
    assert_eq!(parse_span("0").unwrap().get(), 0);
    let config = TrainerConfig::from_ini_str("[range]\nbelow = 48\nabove = 48\n").unwrap();
    assert_eq!(config.range_above.get(), 48);
  }

  #[test]
  fn rejects_unknown_modes_and_flags() {
    assert!(TrainerConfig::from_ini_str("[game]\nmode = chords-augmented\n").is_err());
    assert!(TrainerConfig::from_ini_str("[game]\neasy_mode = maybe\n").is_err());
  }
}
