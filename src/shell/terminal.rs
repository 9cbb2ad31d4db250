use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};

use error_stack::{IntoReport, Result, ResultExt};

use super::Presentation;
use crate::error::TrainerError;
use crate::game::KeyMark;
use crate::theory::{NamedNote, Pitch};

/// Renders the game as lines of text.
pub struct TerminalPresenter<W: Write> {
  out: W,
  keys: Vec<NamedNote>,
  marks: BTreeMap<Pitch, BTreeSet<KeyMark>>,
}

impl TerminalPresenter<io::Stdout> {
  pub fn stdout() -> Self {
    TerminalPresenter::new(io::stdout())
  }
}

impl<W: Write> TerminalPresenter<W> {
  pub fn new(out: W) -> Self {
    TerminalPresenter {
      out,
      keys: vec![],
      marks: BTreeMap::new(),
    }
  }

  pub fn into_inner(self) -> W {
    self.out
  }

  /// One character per key: `-` white, `#` black, or the symbol of the key's most prominent mark.
  pub fn keyboard_line(&self) -> String {
    self
      .keys
      .iter()
      .map(|k| match self.marks.get(&k.pitch()).and_then(top_mark) {
        Some(mark) => mark_symbol(mark),
        None if k.is_accidental() => '#',
        None => '-',
      })
      .collect()
  }

  fn line(&mut self, text: &str) -> Result<(), TrainerError> {
    writeln!(self.out, "{text}")
      .and_then(|_| self.out.flush())
      .into_report()
      .change_context(TrainerError::PresentationError)
  }
}

/// Press feedback shows over the easy mode hint, and a wrong press over everything.
fn top_mark(marks: &BTreeSet<KeyMark>) -> Option<KeyMark> {
  [KeyMark::Incorrect, KeyMark::Correct, KeyMark::Pressed, KeyMark::Target]
    .into_iter()
    .find(|m| marks.contains(m))
}

fn mark_symbol(mark: KeyMark) -> char {
  match mark {
    KeyMark::Pressed => '*',
    KeyMark::Correct => '+',
    KeyMark::Incorrect => 'x',
    KeyMark::Target => '^',
  }
}

impl<W: Write> Presentation for TerminalPresenter<W> {
  fn render_keys(&mut self, keys: &[NamedNote]) -> Result<(), TrainerError> {
    self.keys = keys.to_vec();
    self.marks.clear();
    let text = match (keys.first(), keys.last()) {
      (Some(lo), Some(hi)) => format!("keyboard {lo} .. {hi}  {}", self.keyboard_line()),
      _ => "keyboard is empty".to_string(),
    };
    self.line(&text)
  }

  fn clear_marks(&mut self) -> Result<(), TrainerError> {
    self.marks.clear();
    Ok(())
  }

  fn mark(&mut self, pitch: Pitch, mark: KeyMark) -> Result<(), TrainerError> {
    self.marks.entry(pitch).or_default().insert(mark);
    let note = NamedNote::new(pitch);
    match mark {
      // the press itself is echoed by the correct/incorrect mark that follows
      KeyMark::Pressed => Ok(()),
      KeyMark::Correct => self.line(&format!("  + {note}")),
      KeyMark::Incorrect => self.line(&format!("  x {note}")),
      KeyMark::Target => self.line(&format!("  ^ {note}  {}", self.keyboard_line())),
    }
  }

  fn unmark(&mut self, pitch: Pitch, mark: KeyMark) -> Result<(), TrainerError> {
    if let Some(marks) = self.marks.get_mut(&pitch) {
      marks.remove(&mark);
      if marks.is_empty() {
        self.marks.remove(&pitch);
      }
    }
    Ok(())
  }

  fn set_prompt(&mut self, text: &str, revealed: bool) -> Result<(), TrainerError> {
    if text.is_empty() {
      return Ok(());
    }
    if revealed {
      self.line(&format!("it was {text}"))
    } else {
      self.line(&format!("\nplay: {text}"))
    }
  }

  fn set_feedback(&mut self, text: &str) -> Result<(), TrainerError> {
    if text.is_empty() {
      return Ok(());
    }
    self.line(text)
  }

  fn render_notation(&mut self, keys: &[String]) -> Result<(), TrainerError> {
    if keys.is_empty() {
      return Ok(());
    }
    self.line(&format!("  staff: {}", keys.join(" ")))
  }

  fn show_status(&mut self, text: &str) -> Result<(), TrainerError> {
    self.line(&format!("[{text}]"))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::theory::NotePools;

  fn p(n: u8) -> Pitch {
    Pitch::new(n).unwrap()
  }

  fn output(presenter: TerminalPresenter<Vec<u8>>) -> String {
    String::from_utf8(presenter.into_inner()).unwrap()
  }

  #[test]
  fn keyboard_line_shows_black_keys_and_marks() {
    let pools = NotePools::build(60, 0, 11);
    let mut presenter = TerminalPresenter::new(vec![]);
    presenter.render_keys(pools.chromatic()).unwrap();
    assert_eq!(presenter.keyboard_line(), "-#-#--#-#-#-");

    presenter.mark(p(64), KeyMark::Target).unwrap();
    presenter.mark(p(61), KeyMark::Incorrect).unwrap();
    assert_eq!(presenter.keyboard_line(), "-x-#^-#-#-#-");

    presenter.unmark(p(61), KeyMark::Incorrect).unwrap();
    // a stale unmark for a different mark leaves the key alone
    presenter.unmark(p(64), KeyMark::Correct).unwrap();
    assert_eq!(presenter.keyboard_line(), "-#-#^-#-#-#-");

    presenter.clear_marks().unwrap();
    assert_eq!(presenter.keyboard_line(), "-#-#--#-#-#-");
  }

  #[test]
  fn target_hint_survives_a_press_on_the_same_key() {
    let pools = NotePools::build(60, 0, 4);
    let mut presenter = TerminalPresenter::new(vec![]);
    presenter.render_keys(pools.chromatic()).unwrap();

    presenter.mark(p(62), KeyMark::Target).unwrap();
    presenter.mark(p(62), KeyMark::Pressed).unwrap();
    presenter.mark(p(62), KeyMark::Correct).unwrap();
    assert_eq!(presenter.keyboard_line(), "-#+#-");

    presenter.unmark(p(62), KeyMark::Correct).unwrap();
    assert_eq!(presenter.keyboard_line(), "-#*#-");
    presenter.unmark(p(62), KeyMark::Pressed).unwrap();
    assert_eq!(presenter.keyboard_line(), "-#^#-");
  }

  #[test]
  fn prompts_and_feedback() {
    let mut presenter = TerminalPresenter::new(vec![]);
    presenter.set_prompt("?", false).unwrap();
    presenter.set_prompt("", false).unwrap();
    presenter.set_feedback("").unwrap();
    presenter.mark(p(62), KeyMark::Correct).unwrap();
    presenter.set_feedback("✅").unwrap();
    presenter.set_prompt("D₄", true).unwrap();
    presenter.render_notation(&["d/4".to_string()]).unwrap();

    assert_eq!(output(presenter), "\nplay: ?\n  + D₄\n✅\nit was D₄\n  staff: d/4\n");
  }
}
