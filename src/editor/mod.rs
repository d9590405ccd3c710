//! Editor state independent of any user interface.

pub mod buffers;

pub use buffers::{Buffer, BufferSet, Prompt, SaveChoice, UNTITLED};
