//! MIDI keyboard input and synthesizer output.

pub mod device;
pub mod message;

pub use device::{connect_input, connect_output, list_ports, MidiPorts};
pub use message::{decode_note_on, note_off, note_on, MidiStatus};
