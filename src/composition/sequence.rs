// Copyright (c) 2024 Mike Tsao

use crate::{
    types::{u15, u28, NoteEvent, PitchTable},
    util::{claim_numbered_file, discard_partial, SequenceSettings},
};
use midly::{Format, Header, MetaMessage, Smf, Timing, TrackEvent, TrackEventKind};
use std::{
    io::{BufWriter, Write},
    path::PathBuf,
};
use thiserror::Error;

/// Ways that [create_sequence()] can fail. Nothing is left on disk when any of
/// these is returned, except possibly a freshly created output directory.
#[derive(Debug, Error)]
pub enum SequenceError {
    /// The note name isn't in the [PitchTable].
    #[error("Invalid note name: {0:?}")]
    InvalidNoteName(String),
    /// Note lengths must be between 1 and [NoteEvent::MAX_DELTA] ticks.
    #[error("Invalid quarter-note duration: {0} ticks")]
    InvalidDuration(u32),
    #[allow(missing_docs)]
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A single-track MIDI song: every note in order, one after another, each a
/// quarter note long.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MidiDocument {
    events: Vec<NoteEvent>,
}
impl MidiDocument {
    /// Every note gets this velocity, on and off.
    pub const VELOCITY: u8 = 64;
    /// Resolution written to the file header.
    pub const TICKS_PER_QUARTER: u16 = 480;

    /// Resolves each note name against `table` and lays out a pitch-on at
    /// delta zero followed by a pitch-off `quarter_duration` ticks later.
    /// Fails on the first name the table doesn't know.
    pub fn from_notes<S: AsRef<str>>(
        table: &PitchTable,
        notes: &[S],
        quarter_duration: u32,
    ) -> Result<Self, SequenceError> {
        if quarter_duration == 0 || quarter_duration > NoteEvent::MAX_DELTA {
            return Err(SequenceError::InvalidDuration(quarter_duration));
        }
        let mut events = Vec::with_capacity(notes.len() * 2);
        for name in notes {
            let name = name.as_ref();
            let key = table
                .pitch(name)
                .ok_or_else(|| SequenceError::InvalidNoteName(name.to_string()))?;
            events.push(NoteEvent::new_on(key, Self::VELOCITY, 0));
            events.push(NoteEvent::new_off(key, Self::VELOCITY, quarter_duration));
        }
        Ok(Self { events })
    }

    /// The note events, in playback order.
    pub fn events(&self) -> &[NoteEvent] {
        &self.events
    }

    /// How many notes (on/off pairs) the document holds.
    pub fn note_count(&self) -> usize {
        self.events.len() / 2
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Builds the midly representation. The track ends with the End-of-Track
    /// meta event the file format requires.
    pub fn to_smf(&self) -> Smf<'static> {
        let mut smf = Smf::new(Header::new(
            Format::SingleTrack,
            Timing::Metrical(u15::from(Self::TICKS_PER_QUARTER)),
        ));
        let mut track: Vec<TrackEvent<'static>> = self
            .events
            .iter()
            .map(NoteEvent::to_track_event)
            .collect();
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        });
        smf.tracks.push(track);
        smf
    }

    /// Serializes the document as a standard MIDI file.
    pub fn write_to<W: Write>(&self, writer: W) -> std::io::Result<()> {
        self.to_smf().write_std(writer)
    }

    /// The bytes of the standard MIDI file.
    pub fn to_bytes(&self) -> std::io::Result<Vec<u8>> {
        let mut bytes = Vec::default();
        self.write_to(&mut bytes)?;
        Ok(bytes)
    }
}

/// Writes [MidiDocument]s to auto-numbered files.
#[derive(Debug)]
pub struct SequenceWriter<'a> {
    table: &'a PitchTable,
    settings: SequenceSettings,
}
impl<'a> SequenceWriter<'a> {
    #[allow(missing_docs)]
    pub fn new_with(table: &'a PitchTable, settings: SequenceSettings) -> Self {
        Self { table, settings }
    }

    /// Turns `notes` into a MIDI file under the configured output directory and
    /// returns the path of the new file.
    ///
    /// Every note name is checked before anything touches the filesystem. The
    /// file gets the smallest free number, and no existing file is ever
    /// overwritten. If writing fails partway, the half-written file is
    /// removed.
    pub fn create_sequence<S: AsRef<str>>(&self, notes: &[S]) -> Result<PathBuf, SequenceError> {
        let document =
            MidiDocument::from_notes(self.table, notes, self.settings.quarter_duration)?;
        let path = self.write_document(&document)?;
        log::info!("MIDI file created: {}", path.display());
        Ok(path)
    }

    /// Writes an already-built document to the next free numbered path.
    pub fn write_document(&self, document: &MidiDocument) -> Result<PathBuf, SequenceError> {
        let bytes = document.to_bytes()?;
        std::fs::create_dir_all(&self.settings.output_dir)?;
        let (path, file) = claim_numbered_file(
            &self.settings.output_dir,
            &self.settings.base_name,
            &self.settings.extension,
        )?;
        if let Err(e) = Self::fill(file, &bytes) {
            discard_partial(&path);
            return Err(e.into());
        }
        Ok(path)
    }

    fn fill(file: std::fs::File, bytes: &[u8]) -> std::io::Result<()> {
        let mut writer = BufWriter::new(file);
        writer.write_all(bytes)?;
        writer.flush()?;
        writer.get_ref().sync_all()
    }
}

/// Writes `notes` as a MIDI file using the process-wide [PitchTable]. See
/// [SequenceWriter::create_sequence()].
pub fn create_sequence<S: AsRef<str>>(
    notes: &[S],
    settings: &SequenceSettings,
) -> Result<PathBuf, SequenceError> {
    SequenceWriter::new_with(PitchTable::global(), settings.clone()).create_sequence(notes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        types::{build_pitch_table, NoteEventKind},
        util::{read_note_events_from_bytes, SequenceSettingsBuilder},
    };
    use std::path::Path;

    fn settings_for(dir: &Path) -> SequenceSettings {
        SequenceSettingsBuilder::default()
            .output_dir(dir)
            .build()
            .unwrap()
    }

    #[test]
    fn events_alternate_in_input_order() {
        let table = build_pitch_table();
        let notes = ["C4", "D4", "E4", "C4", "G5", "A3", "F#6"];
        let document = MidiDocument::from_notes(&table, &notes, 480).unwrap();
        assert_eq!(document.events().len(), notes.len() * 2);
        assert_eq!(document.note_count(), notes.len());

        let expected_keys = [60, 62, 64, 60, 79, 57, 90];
        for (pair, key) in document.events().chunks(2).zip(expected_keys) {
            assert_eq!(pair[0], NoteEvent::new_on(key, 64, 0));
            assert_eq!(pair[1], NoteEvent::new_off(key, 64, 480));
        }
    }

    #[test]
    fn custom_duration_lands_on_the_off_event() {
        let table = build_pitch_table();
        let document = MidiDocument::from_notes(&table, &["A3"], 96).unwrap();
        assert_eq!(document.events()[0].delta, 0);
        assert_eq!(document.events()[1].delta, 96);
    }

    #[test]
    fn unknown_note_is_rejected() {
        let table = build_pitch_table();
        let result = MidiDocument::from_notes(&table, &["C4", "Q7", "D4"], 480);
        match result {
            Err(SequenceError::InvalidNoteName(name)) => assert_eq!(name, "Q7"),
            other => panic!("expected InvalidNoteName, got {other:?}"),
        }
    }

    #[test]
    fn out_of_range_durations_are_rejected() {
        let table = build_pitch_table();
        assert!(matches!(
            MidiDocument::from_notes(&table, &["C4"], 0),
            Err(SequenceError::InvalidDuration(0))
        ));
        assert!(matches!(
            MidiDocument::from_notes(&table, &["C4"], NoteEvent::MAX_DELTA + 1),
            Err(SequenceError::InvalidDuration(_))
        ));
    }

    #[test]
    fn bytes_parse_back_to_the_same_events() {
        let table = build_pitch_table();
        let document = MidiDocument::from_notes(&table, &["C0", "G9", "A#2"], 480).unwrap();
        let bytes = document.to_bytes().unwrap();
        let smf = Smf::parse(&bytes).unwrap();
        assert_eq!(smf.header.format, Format::SingleTrack);
        assert_eq!(smf.header.timing, Timing::Metrical(u15::new(480)));
        assert_eq!(smf.tracks.len(), 1);
        assert!(matches!(
            smf.tracks[0].last(),
            Some(TrackEvent {
                kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
                ..
            })
        ));
        assert_eq!(
            read_note_events_from_bytes(&bytes).unwrap(),
            document.events()
        );
    }

    #[test]
    fn empty_document_is_still_a_valid_file() {
        let document =
            MidiDocument::from_notes::<&str>(&build_pitch_table(), &[], 480).unwrap();
        assert!(document.is_empty());
        let bytes = document.to_bytes().unwrap();
        let smf = Smf::parse(&bytes).unwrap();
        assert_eq!(smf.tracks.len(), 1);
        assert_eq!(smf.tracks[0].len(), 1, "just the End-of-Track event");
    }

    #[test]
    fn writer_numbers_files_and_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let table = build_pitch_table();
        let writer = SequenceWriter::new_with(&table, settings_for(dir.path()));

        let first = writer.create_sequence(&["C4"]).unwrap();
        let second = writer.create_sequence(&["C4"]).unwrap();
        assert_eq!(first, dir.path().join("midi1.mid"));
        assert_eq!(second, dir.path().join("midi2.mid"));
        assert_eq!(
            std::fs::read(&first).unwrap(),
            std::fs::read(&second).unwrap()
        );
    }

    #[test]
    fn invalid_note_leaves_no_trace() {
        let dir = tempfile::tempdir().unwrap();
        let output_dir = dir.path().join("not-yet");
        let writer =
            SequenceWriter::new_with(PitchTable::global(), settings_for(&output_dir));
        assert!(matches!(
            writer.create_sequence(&["C4", "Cb4"]),
            Err(SequenceError::InvalidNoteName(_))
        ));
        assert!(!output_dir.exists());
    }

    #[test]
    fn output_directory_is_created_on_demand() {
        let dir = tempfile::tempdir().unwrap();
        let output_dir = dir.path().join("a").join("b");
        let path = create_sequence(&["E4"], &settings_for(&output_dir)).unwrap();
        assert_eq!(path, output_dir.join("midi1.mid"));
        let events = crate::util::read_note_events(&path).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, NoteEventKind::On);
        assert_eq!(events[0].key, 64);
    }

    #[test]
    fn output_directory_that_is_a_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();
        assert!(matches!(
            create_sequence(&["E4"], &settings_for(&blocker)),
            Err(SequenceError::Io(_))
        ));
    }
}
