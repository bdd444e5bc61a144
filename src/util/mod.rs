// Copyright (c) 2024 Mike Tsao

//! System utilities.

/// Commonly used imports.
pub mod prelude {
    pub use super::{
        MidiSummary, RenderSettings, RenderSettingsBuilder, SequenceSettings,
        SequenceSettingsBuilder, Settings,
    };
}

pub use midi::{
    note_events, read_note_events, read_note_events_from_bytes, InspectError, MidiSummary,
    MidiUtils,
};
pub use output::{
    claim_numbered_file, discard_partial, next_available_path, numbered_path, partial_path,
};
pub use settings::{
    RenderSettings, RenderSettingsBuilder, SequenceSettings, SequenceSettingsBuilder, Settings,
};

mod midi;
mod output;
mod settings;
