// Copyright (c) 2024 Mike Tsao

#![deny(missing_docs, unused_imports, unused_variables)]
#![allow(rustdoc::private_intra_doc_links)]

//! Note Sequencer writes short melodies, given as note names like "C4" or
//! "F#6", to standard MIDI files, and hands MIDI files to external renderers to
//! get WAV audio back.
//!
//! * Use [create_sequence()] to write a list of note names to the next free
//!   numbered file, e.g. `midis/midi3.mid`. Every note is a quarter note at
//!   velocity 64, one after another.
//! * Use [PitchTable](types::PitchTable) directly to look up pitch numbers,
//!   and [MidiDocument] to build a document in memory without touching disk.
#![cfg_attr(
    feature = "hound",
    doc = "* Implement [RendersMidi](render::RendersMidi) over your plugin host of
  choice, then use [render::render_to_wav()] or [render::render_batch()] to
  produce WAV files."
)]

/// A collection of imports that are useful to users of this crate. `use
/// note_sequencer::prelude::*;` for easier onboarding.
pub mod prelude {
    #[cfg(feature = "hound")]
    pub use super::render::prelude::*;
    pub use super::{composition::prelude::*, types::prelude::*, util::prelude::*};
}

pub use version::app_version;
pub use {
    composition::{create_sequence, MidiDocument, SequenceError, SequenceWriter},
    types::{build_pitch_table, PitchTable},
};

pub mod composition;
#[cfg(feature = "hound")]
pub mod render;
pub mod types;
pub mod util;

mod version;
