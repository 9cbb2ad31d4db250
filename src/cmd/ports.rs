use error_stack::Result;
use keytrainer::{error::TrainerError, midi::list_ports};

pub fn run_ports() -> Result<(), TrainerError> {
  let ports = list_ports()?;

  println!("inputs:");
  for name in &ports.inputs {
    println!("  {name}");
  }
  println!("outputs:");
  for name in &ports.outputs {
    println!("  {name}");
  }
  Ok(())
}
