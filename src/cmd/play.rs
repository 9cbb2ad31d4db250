use error_stack::{report, IntoReport, Result, ResultExt};
use log::{info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};

use keytrainer::config::{RangeSpan, TrainerConfig};
use keytrainer::driver::Trainer;
use keytrainer::error::TrainerError;
use keytrainer::game::{Action, Mode, Session};
use keytrainer::midi::{connect_input, connect_output};
use keytrainer::shell::{
  parse_command, AudioService, MidiAudio, Presentation, SilentAudio, TerminalCommand,
  TerminalPresenter, HELP,
};

use super::PlayArgs;

fn span_arg(n: u8) -> Result<RangeSpan, TrainerError> {
  RangeSpan::new(n).ok_or_else(|| report!(TrainerError::InvalidRangeSpan(n as u32)))
}

fn resolve_config(args: &PlayArgs) -> Result<TrainerConfig, TrainerError> {
  let mut config = match &args.config {
    Some(path) => TrainerConfig::load(path)?,
    None => TrainerConfig::default(),
  };

  if let Some(mode) = &args.mode {
    config.mode = mode.parse::<Mode>()?;
  }
  if let Some(below) = args.below {
    config.range_below = span_arg(below)?;
  }
  if let Some(above) = args.above {
    config.range_above = span_arg(above)?;
  }
  if args.easy {
    config.easy_mode = true;
  }
  if args.midi_in.is_some() {
    config.midi_input = args.midi_in.clone();
  }
  if args.midi_out.is_some() {
    config.midi_output = args.midi_out.clone();
  }
  Ok(config)
}

pub async fn run_play(args: &PlayArgs) -> Result<(), TrainerError> {
  let config = resolve_config(args)?;
  info!(
    "starting in {} mode, range -{} / +{}",
    config.mode,
    config.range_below.get(),
    config.range_above.get()
  );

  let mut presenter = TerminalPresenter::stdout();

  let audio: Box<dyn AudioService + Send> = match &config.midi_output {
    Some(name) => match connect_output(name) {
      Ok(conn) => Box::new(MidiAudio::new(conn)),
      Err(err) => {
        warn!("unable to open midi output: {err:?}");
        presenter.show_status(&format!("could not open midi output {name}, playing silently"))?;
        Box::new(SilentAudio)
      }
    },
    None => Box::new(SilentAudio),
  };

  let session = Session::from_entropy(&config);
  let (trainer, run) = Trainer::new(session, Box::new(presenter), audio);
  let handle = tokio::spawn(run);

  // the connection closes when dropped, so it lives until the end of the session
  let (_midi_in, status) = match &config.midi_input {
    Some(name) => match connect_input(name, trainer.actions()) {
      Ok(conn) => (Some(conn), format!("midi keyboard connected: {name}")),
      Err(err) => {
        warn!("unable to open midi input: {err:?}");
        (None, format!("could not open midi input {name}, type notes instead"))
      }
    },
    None => (None, "no midi keyboard, type notes like C4 or f#3".to_string()),
  };
  trainer.send(Action::Notify(status)).await?;

  trainer.send(Action::Start).await?;

  let mut lines = BufReader::new(tokio::io::stdin()).lines();
  while let Some(line) = lines
    .next_line()
    .await
    .into_report()
    .change_context(TrainerError::InputError)?
  {
    if line.trim().is_empty() {
      continue;
    }
    match parse_command(&line) {
      Ok(TerminalCommand::Quit) => break,
      Ok(TerminalCommand::Help) => println!("{HELP}"),
      Ok(command) => {
        if let Some(action) = command.action() {
          trainer.send(action).await?;
        }
      }
      Err(err) => {
        println!("{}", err.current_context());
        println!("{HELP}");
      }
    }
  }

  trainer.done().await?;
  handle
    .await
    .into_report()
    .change_context(TrainerError::TrainerStopped)
}
