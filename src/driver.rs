//! Runs a [Session] against real adapters and real time.
//!
//! [Trainer::new] returns a `(Trainer, Future)` pair. The future is the event loop and needs to be
//! spawned; the [Trainer] handle submits [Action]s to it and shuts it down with [Trainer::done].
//!
//! The loop is the only place the session is mutated. Input sources (MIDI callbacks, terminal
//! reader, timer tasks) all feed the same action channel.

use std::collections::HashMap;

use error_stack::{IntoReport, Result, ResultExt};
use futures::Future;
use log::{debug, warn};
use rand::Rng;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::error::TrainerError;
use crate::game::{Action, Effect, Session, TimerId};
use crate::shell::{AudioService, Presentation};

pub struct Trainer {
  action_tx: mpsc::Sender<Action>,
  done_tx: mpsc::Sender<()>,
}

impl Trainer {
  pub fn new<R>(
    session: Session<R>,
    presenter: Box<dyn Presentation + Send>,
    audio: Box<dyn AudioService + Send>,
  ) -> (Trainer, impl Future<Output = ()>)
  where
    R: Rng + Send + 'static,
  {
    let (action_tx, action_rx) = mpsc::channel(128);
    let (done_tx, done_rx) = mpsc::channel(1);

    let internal = TrainerInternal {
      session,
      presenter,
      audio,
      timers: HashMap::new(),
      timer_tx: action_tx.clone(),
    };
    let trainer = Trainer { action_tx, done_tx };
    (trainer, internal.run(action_rx, done_rx))
  }

  /// A sender for input sources that run outside the trainer, like MIDI callbacks.
  pub fn actions(&self) -> mpsc::Sender<Action> {
    self.action_tx.clone()
  }

  pub async fn send(&self, action: Action) -> Result<(), TrainerError> {
    self
      .action_tx
      .send(action)
      .await
      .into_report()
      .change_context(TrainerError::TrainerStopped)
  }

  pub async fn done(&self) -> Result<(), TrainerError> {
    self
      .done_tx
      .send(())
      .await
      .into_report()
      .change_context(TrainerError::TrainerStopped)
  }
}

struct TrainerInternal<R: Rng> {
  session: Session<R>,
  presenter: Box<dyn Presentation + Send>,
  audio: Box<dyn AudioService + Send>,
  timers: HashMap<TimerId, JoinHandle<()>>,
  timer_tx: mpsc::Sender<Action>,
}

impl<R: Rng> TrainerInternal<R> {
  async fn run(mut self, mut actions: mpsc::Receiver<Action>, mut done_signal: mpsc::Receiver<()>) {
    loop {
      let action = tokio::select! {
        _ = done_signal.recv() => {
          debug!("done signal received, exiting");
          break;
        }

        Some(action) = actions.recv() => action,
      };

      if let Action::TimerFired(id) = &action {
        self.timers.remove(id);
      }

      for effect in self.session.handle(action) {
        self.perform_effect(effect);
      }
    }

    for (_, handle) in self.timers.drain() {
      handle.abort();
    }
  }

  /// Performs an effect. Adapter failures are logged and otherwise ignored, so a broken display
  /// or synthesizer never stalls the game.
  fn perform_effect(&mut self, effect: Effect) {
    use Effect::*;

    debug!("performing effect {effect}");
    let res = match effect {
      RenderKeys(keys) => self.presenter.render_keys(&keys),
      ClearMarks => self.presenter.clear_marks(),
      Mark(pitch, mark) => self.presenter.mark(pitch, mark),
      Unmark(pitch, mark) => self.presenter.unmark(pitch, mark),
      SetPrompt { text, revealed } => self.presenter.set_prompt(&text, revealed),
      SetFeedback(text) => self.presenter.set_feedback(&text),
      RenderNotation(keys) => self.presenter.render_notation(&keys),
      ShowStatus(text) => self.presenter.show_status(&text),
      Play { pitches, duration } => self.audio.play(&pitches, duration),

      StartTimer { id, delay } => {
        let tx = self.timer_tx.clone();
        let handle = tokio::spawn(async move {
          sleep(delay).await;
          let _ = tx.send(Action::TimerFired(id)).await;
        });
        self.timers.insert(id, handle);
        Ok(())
      }

      CancelTimer(id) => {
        if let Some(handle) = self.timers.remove(&id) {
          handle.abort();
        }
        Ok(())
      }
    };

    if let Err(err) = res {
      warn!("error performing effect: {err:?}");
    }
  }
}
