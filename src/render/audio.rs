// Copyright (c) 2024 Mike Tsao

use super::RenderError;
use crate::{types::SampleRate, util::discard_partial};
use std::{
    io::{Seek, Write},
    path::Path,
};

/// Planar audio as it comes back from a renderer: one `Vec` per channel, all
/// the same length, samples nominally in -1.0..=1.0.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AudioBuffer {
    channels: Vec<Vec<f32>>,
    sample_rate: SampleRate,
}
impl AudioBuffer {
    /// Wraps planar channel data. Returns `None` if the channels disagree on
    /// length.
    pub fn new_with(channels: Vec<Vec<f32>>, sample_rate: SampleRate) -> Option<Self> {
        if let Some(first) = channels.first() {
            if channels.iter().any(|c| c.len() != first.len()) {
                return None;
            }
        }
        Some(Self {
            channels,
            sample_rate,
        })
    }

    /// All-zero audio of the given shape.
    pub fn silence(channel_count: usize, frame_count: usize, sample_rate: SampleRate) -> Self {
        Self {
            channels: vec![vec![0.0; frame_count]; channel_count],
            sample_rate,
        }
    }

    #[allow(missing_docs)]
    pub fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    #[allow(missing_docs)]
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel.
    pub fn frame_count(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// True when there's nothing to hear: no samples at all, or every sample is
    /// exactly zero.
    pub fn is_silent(&self) -> bool {
        self.channels.iter().flatten().all(|s| *s == 0.0)
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f32 {
        self.channels
            .iter()
            .flatten()
            .fold(0.0f32, |peak, s| peak.max(s.abs()))
    }

    /// Samples frame by frame, channels interleaved.
    pub fn interleaved(&self) -> impl Iterator<Item = f32> + '_ {
        (0..self.frame_count())
            .flat_map(move |frame| self.channels.iter().map(move |channel| channel[frame]))
    }

    /// Writes the buffer as a WAV file. 16 and 24 bits produce integer PCM; 32
    /// produces IEEE float. If writing fails after the file was created, the
    /// file is removed.
    pub fn write_wav(&self, path: &Path, bits_per_sample: u16) -> Result<(), RenderError> {
        let spec = hound::WavSpec {
            channels: self.channel_count() as u16,
            sample_rate: self.sample_rate.into(),
            bits_per_sample,
            sample_format: Self::check_bit_depth(bits_per_sample)?,
        };
        let writer = hound::WavWriter::create(path, spec)?;
        if let Err(e) = self.write_samples(writer, spec) {
            discard_partial(path);
            return Err(e);
        }
        Ok(())
    }

    fn write_samples<W: Write + Seek>(
        &self,
        mut writer: hound::WavWriter<W>,
        spec: hound::WavSpec,
    ) -> Result<(), RenderError> {
        match spec.sample_format {
            hound::SampleFormat::Float => {
                for sample in self.interleaved() {
                    writer.write_sample(sample)?;
                }
            }
            hound::SampleFormat::Int => {
                let scale = ((1i64 << (spec.bits_per_sample - 1)) - 1) as f32;
                for sample in self.interleaved() {
                    writer.write_sample((sample.clamp(-1.0, 1.0) * scale).round() as i32)?;
                }
            }
        }
        writer.finalize()?;
        Ok(())
    }

    /// Maps a bit depth to the WAV sample format that goes with it.
    pub fn check_bit_depth(bits_per_sample: u16) -> Result<hound::SampleFormat, RenderError> {
        match bits_per_sample {
            16 | 24 => Ok(hound::SampleFormat::Int),
            32 => Ok(hound::SampleFormat::Float),
            _ => Err(RenderError::UnsupportedBitDepth(bits_per_sample)),
        }
    }
}
