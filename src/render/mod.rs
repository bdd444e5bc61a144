// Copyright (c) 2024 Mike Tsao

//! Hands MIDI files to an external renderer (a plugin host, a DAW, anything
//! that turns MIDI into audio) and saves what comes back as WAV.
//!
//! This crate doesn't host plugins. Implement [RendersMidi] on top of
//! whatever does, then call [render_to_wav()] or [render_batch()]. Both check
//! their inputs before rendering and refuse to save silent audio, which is
//! what an unlicensed or misconfigured instrument usually produces.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        render_batch, render_to_wav, AudioBuffer, BatchReport, RenderError, RendersMidi,
    };
}

pub use {
    audio::AudioBuffer,
    pipeline::{batch_output_path, render_batch, render_to_wav, BatchReport},
};

use crate::{util::InspectError, util::RenderSettings};
use std::path::{Path, PathBuf};
use thiserror::Error;

mod audio;
mod pipeline;

/// Something that can turn a MIDI file into audio. Implementations own
/// everything about instruments, presets, and plugin loading; the settings
/// say what the caller would like.
pub trait RendersMidi {
    /// Renders `settings.duration` worth of audio from the MIDI file at
    /// `midi`.
    fn render(&mut self, midi: &Path, settings: &RenderSettings) -> anyhow::Result<AudioBuffer>;
}

/// Ways that rendering can fail.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The MIDI file or the plugin isn't there.
    #[error("file not found: {0}")]
    MissingFile(PathBuf),
    #[allow(missing_docs)]
    #[error("MIDI file contains no note data: {0}")]
    NoNoteData(PathBuf),
    /// Usually a licensing or channel-mapping problem in the instrument.
    #[error("rendered audio is empty or silent")]
    SilentOutput,
    #[allow(missing_docs)]
    #[error("can't write {0}-bit WAV files")]
    UnsupportedBitDepth(u16),
    #[allow(missing_docs)]
    #[error("renderer failed: {0:#}")]
    Renderer(anyhow::Error),
    #[allow(missing_docs)]
    #[error(transparent)]
    Inspect(#[from] InspectError),
    #[allow(missing_docs)]
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[allow(missing_docs)]
    #[error("couldn't write WAV file: {0}")]
    Wav(#[from] hound::Error),
}
