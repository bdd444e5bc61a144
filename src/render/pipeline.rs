// Copyright (c) 2024 Mike Tsao

use super::{AudioBuffer, RenderError, RendersMidi};
use crate::util::{discard_partial, partial_path, MidiSummary, RenderSettings};
use std::path::{Path, PathBuf};

/// Renders one MIDI file and saves the result as a WAV file at `output`,
/// creating the output's directory if needed.
///
/// The steps run in a fixed order and stop at the first failure: the inputs
/// must exist, the MIDI file must contain notes, and the rendered audio must
/// not be silent. Nothing is written unless all of that holds.
///
/// The WAV is staged next to `output` and renamed over it only once it's
/// complete, so an existing file at `output` survives any failure.
pub fn render_to_wav(
    renderer: &mut dyn RendersMidi,
    midi: &Path,
    output: &Path,
    settings: &RenderSettings,
) -> Result<AudioBuffer, RenderError> {
    check_inputs(midi, settings)?;
    log::info!("1: input files verified");

    let summary = MidiSummary::from_path(midi)?;
    if !summary.has_note_data() {
        return Err(RenderError::NoNoteData(midi.to_path_buf()));
    }
    log::info!(
        "2: {} has {} note events on channel(s) {:?}",
        midi.display(),
        summary.note_event_count,
        summary.channels
    );

    let audio = renderer
        .render(midi, settings)
        .map_err(RenderError::Renderer)?;
    log::info!(
        "3: rendered {} frame(s) x {} channel(s)",
        audio.frame_count(),
        audio.channel_count()
    );

    if audio.is_silent() {
        return Err(RenderError::SilentOutput);
    }
    log::info!("4: peak level {:.3}", audio.peak());

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    log::info!("5: output directory ready");

    let staged = partial_path(output);
    audio.write_wav(&staged, settings.bits_per_sample)?;
    if output.exists() {
        log::debug!("replacing old {}", output.display());
    }
    if let Err(e) = std::fs::rename(&staged, output) {
        discard_partial(&staged);
        return Err(e.into());
    }
    log::info!("6: WAV file saved to {}", output.display());

    Ok(audio)
}

fn check_inputs(midi: &Path, settings: &RenderSettings) -> Result<(), RenderError> {
    AudioBuffer::check_bit_depth(settings.bits_per_sample)?;
    let required = std::iter::once(midi).chain(settings.plugin.as_deref());
    for path in required {
        if !path.exists() {
            return Err(RenderError::MissingFile(path.to_path_buf()));
        }
    }
    if let Some(preset) = settings.preset.as_deref().filter(|p| !p.exists()) {
        log::warn!(
            "preset {} not found; renderer will use its defaults",
            preset.display()
        );
    }
    Ok(())
}

/// What happened during [render_batch()].
#[derive(Debug, Default)]
pub struct BatchReport {
    /// WAV files that were written.
    pub rendered: Vec<PathBuf>,
    /// MIDI files that didn't make it, and why.
    pub failed: Vec<(PathBuf, RenderError)>,
}
impl BatchReport {
    #[allow(missing_docs)]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// The WAV path [render_batch()] uses for a MIDI file:
/// `<output_dir>/<stem><suffix>.wav`.
pub fn batch_output_path(midi: &Path, output_dir: &Path, suffix: &str) -> PathBuf {
    let stem = midi
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_dir.join(format!("{stem}{suffix}.wav"))
}

/// Renders each MIDI file to `<output_dir>/<stem><suffix>.wav`. An existing
/// WAV at that path is replaced when the new render succeeds and left alone
/// when it doesn't. A file that fails is logged and skipped, and the batch
/// moves on to the next one.
pub fn render_batch<P: AsRef<Path>>(
    renderer: &mut dyn RendersMidi,
    midis: &[P],
    output_dir: &Path,
    suffix: &str,
    settings: &RenderSettings,
) -> BatchReport {
    let mut report = BatchReport::default();
    for midi in midis {
        let midi = midi.as_ref();
        let output = batch_output_path(midi, output_dir, suffix);
        log::info!("processing {}", midi.display());

        match render_to_wav(renderer, midi, &output, settings) {
            Ok(_) => {
                log::info!("finished {}", output.display());
                report.rendered.push(output);
            }
            Err(e) => {
                log::warn!("skipping {}: {e}", midi.display());
                report.failed.push((midi.to_path_buf(), e));
            }
        }
    }
    log::info!(
        "batch done: {} rendered, {} failed",
        report.rendered.len(),
        report.failed.len()
    );
    report
}
