// Copyright (c) 2024 Mike Tsao

//! Turns lists of note names into MIDI documents and files.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{create_sequence, MidiDocument, SequenceError, SequenceWriter};
}

pub use sequence::*;

mod sequence;
