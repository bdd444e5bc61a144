// Copyright (c) 2024 Mike Tsao

//! Structs that hold configuration information about various parts of the
//! system. Intended to be serialized.

use crate::types::{SampleRate, Seconds};
use anyhow::Context;
use derivative::Derivative;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

/// Describes how [create_sequence()](crate::composition::create_sequence())
/// names, times, and places the MIDI files it writes.
#[derive(Builder, Clone, Debug, Derivative, PartialEq, Serialize, Deserialize)]
#[derivative(Default)]
#[builder(default, setter(into), build_fn(validate = "Self::validate"))]
#[serde(default, rename_all = "kebab-case")]
pub struct SequenceSettings {
    /// Filename prefix. The numeric suffix goes right after it.
    #[derivative(Default(value = "\"midi\".into()"))]
    pub base_name: String,

    /// Filename suffix, including the dot.
    #[derivative(Default(value = "\".mid\".into()"))]
    pub extension: String,

    /// Length of every note, in ticks.
    #[derivative(Default(value = "SequenceSettings::DEFAULT_QUARTER_DURATION"))]
    pub quarter_duration: u32,

    /// Directory that receives the files. Created on demand.
    #[derivative(Default(value = "\"midis\".into()"))]
    pub output_dir: PathBuf,
}
impl SequenceSettings {
    /// Ticks in one quarter note, and the default note length.
    pub const DEFAULT_QUARTER_DURATION: u32 = 480;
}
impl SequenceSettingsBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.quarter_duration {
            Some(0) => Err("quarter duration must be at least one tick".to_string()),
            Some(d) if d > crate::types::NoteEvent::MAX_DELTA => {
                Err(format!("quarter duration {d} doesn't fit in a MIDI delta"))
            }
            _ => Ok(()),
        }
    }
}

/// Parameters handed to a MIDI renderer (see the `render` module), plus the
/// shape of the WAV file that comes out the other end.
#[derive(Builder, Clone, Debug, Derivative, PartialEq, Serialize, Deserialize)]
#[derivative(Default)]
#[builder(default, setter(into))]
#[serde(default, rename_all = "kebab-case")]
pub struct RenderSettings {
    #[allow(missing_docs)]
    pub sample_rate: SampleRate,

    /// Frames per processing block. Only the renderer cares about this.
    #[derivative(Default(value = "512"))]
    pub block_size: usize,

    /// How much audio to render.
    #[derivative(Default(value = "Seconds(120.0)"))]
    pub duration: Seconds,

    /// 16 or 24 for integer PCM, 32 for float.
    #[derivative(Default(value = "24"))]
    pub bits_per_sample: u16,

    /// Plugin binary the renderer should load, if it loads one.
    pub plugin: Option<PathBuf>,

    /// Preset for the plugin. Renderers fall back to their own defaults when
    /// this is missing.
    pub preset: Option<PathBuf>,
}

/// Everything that can be loaded from a settings file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Settings {
    #[allow(missing_docs)]
    pub sequence: SequenceSettings,
    #[allow(missing_docs)]
    pub render: RenderSettings,
}
impl Settings {
    /// Reads settings from a JSON file. Fields that are missing from the file
    /// keep their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("couldn't open settings file {}", path.display()))?;
        let settings = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("couldn't parse settings file {}", path.display()))?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let s = SequenceSettings::default();
        assert_eq!(s.base_name, "midi");
        assert_eq!(s.extension, ".mid");
        assert_eq!(s.quarter_duration, 480);
        assert_eq!(s.output_dir, PathBuf::from("midis"));

        let r = RenderSettings::default();
        assert_eq!(r.sample_rate, SampleRate::new(44100));
        assert_eq!(r.block_size, 512);
        assert_eq!(r.duration, Seconds(120.0));
        assert_eq!(r.bits_per_sample, 24);
        assert!(r.plugin.is_none());
    }

    #[test]
    fn builder_fills_in_defaults() {
        let s = SequenceSettingsBuilder::default()
            .base_name("scale")
            .build()
            .unwrap();
        assert_eq!(s.base_name, "scale");
        assert_eq!(s.extension, ".mid");
        assert_eq!(s.quarter_duration, 480);
    }

    #[test]
    fn builder_rejects_bad_durations() {
        assert!(SequenceSettingsBuilder::default()
            .quarter_duration(0u32)
            .build()
            .is_err());
        assert!(SequenceSettingsBuilder::default()
            .quarter_duration(0x1000_0000u32)
            .build()
            .is_err());
        assert!(SequenceSettingsBuilder::default()
            .quarter_duration(0x0FFF_FFFFu32)
            .build()
            .is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let settings: Settings = serde_json::from_str(
            r#"{ "sequence": { "base-name": "take", "quarter-duration": 960 },
                 "render": { "bits-per-sample": 16 } }"#,
        )
        .unwrap();
        assert_eq!(settings.sequence.base_name, "take");
        assert_eq!(settings.sequence.quarter_duration, 960);
        assert_eq!(settings.sequence.output_dir, PathBuf::from("midis"));
        assert_eq!(settings.render.bits_per_sample, 16);
        assert_eq!(settings.render.block_size, 512);
    }

    #[test]
    fn load_reports_missing_file() {
        assert!(Settings::load(Path::new("/nonexistent/settings.json")).is_err());
    }
}
