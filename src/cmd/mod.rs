mod play;
mod ports;

use clap::Subcommand;
use error_stack::Result;
use keytrainer::error::TrainerError;
use std::path::PathBuf;

use self::{play::run_play, ports::run_ports};

#[derive(Subcommand)]
pub enum CliCommand {
  /// Starts a practice session in the terminal, optionally with a MIDI keyboard and synthesizer
  Play(PlayArgs),

  /// Lists the MIDI input and output ports
  Ports,
}

#[derive(clap::Args)]
pub struct PlayArgs {
  /// INI file with [range], [game] and [midi] sections
  #[clap(long, value_parser)]
  config: Option<PathBuf>,

  /// identify-major, identify-chromatic, black-keys, ear-training, chords-major or chords-minor
  #[clap(long)]
  mode: Option<String>,

  /// Semitones below middle C (0 ..= 48)
  #[clap(long)]
  below: Option<u8>,

  /// Semitones above middle C (0 ..= 48)
  #[clap(long)]
  above: Option<u8>,

  /// Mark the keys to press
  #[clap(long)]
  easy: bool,

  /// MIDI input port to read key presses from
  #[clap(long)]
  midi_in: Option<String>,

  /// MIDI output port to play challenges on
  #[clap(long)]
  midi_out: Option<String>,
}

impl CliCommand {
  pub async fn run(&self) -> Result<(), TrainerError> {
    match self {
      Self::Play(args) => run_play(args).await,

      Self::Ports => run_ports(),
    }
  }
}
