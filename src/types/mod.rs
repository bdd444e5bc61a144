// Copyright (c) 2024 Mike Tsao

//! Common data types used throughout the system.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        build_pitch_table, MidiChannel, NoteEvent, NoteEventKind, PitchClass, PitchTable,
        SampleRate, Seconds,
    };
}

pub use {
    midi::{u15, u28, u4, u7, MidiChannel, NoteEvent, NoteEventKind},
    pitch::{build_pitch_table, PitchClass, PitchTable},
    time::{SampleRate, Seconds},
};

mod midi;
mod pitch;
mod time;
