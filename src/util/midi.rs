// Copyright (c) 2024 Mike Tsao

use crate::types::{u7, NoteEvent};
use midly::{Format, MidiMessage, Smf, Timing, TrackEventKind};
use std::{collections::BTreeSet, path::Path};
use thiserror::Error;

/// Provides MIDI-related utility functionality.
pub struct MidiUtils {}
impl MidiUtils {
    /// Convenience function to make a note-on [MidiMessage].
    pub fn new_note_on(note: u8, vel: u8) -> MidiMessage {
        MidiMessage::NoteOn {
            key: u7::from(note),
            vel: u7::from(vel),
        }
    }

    /// Convenience function to make a note-off [MidiMessage].
    pub fn new_note_off(note: u8, vel: u8) -> MidiMessage {
        MidiMessage::NoteOff {
            key: u7::from(note),
            vel: u7::from(vel),
        }
    }
}

/// Ways that reading a MIDI file can fail.
#[derive(Debug, Error)]
pub enum InspectError {
    #[allow(missing_docs)]
    #[error("couldn't read MIDI file: {0}")]
    Io(#[from] std::io::Error),
    #[allow(missing_docs)]
    #[error("couldn't parse MIDI file: {0}")]
    Parse(#[from] midly::Error),
}

/// Extracts every note event from every track, in file order.
///
/// Each returned delta is measured from the previous *note* event in the same
/// track: deltas of any intervening non-note events are folded in, so the
/// absolute timing survives.
pub fn note_events(smf: &Smf) -> Vec<NoteEvent> {
    let mut events = Vec::default();
    for track in smf.tracks.iter() {
        let mut pending_delta = 0u32;
        for event in track.iter() {
            pending_delta = pending_delta.saturating_add(event.delta.as_int());
            if let TrackEventKind::Midi { channel, message } = event.kind {
                if let Some(note_event) =
                    NoteEvent::from_midi_message(pending_delta, channel, &message)
                {
                    events.push(note_event);
                    pending_delta = 0;
                }
            }
        }
    }
    events
}

/// Parses an in-memory MIDI file and returns its note events.
pub fn read_note_events_from_bytes(bytes: &[u8]) -> Result<Vec<NoteEvent>, InspectError> {
    Ok(note_events(&Smf::parse(bytes)?))
}

/// Reads a MIDI file and returns its note events. See [note_events()].
pub fn read_note_events(path: &Path) -> Result<Vec<NoteEvent>, InspectError> {
    let bytes = std::fs::read(path)?;
    read_note_events_from_bytes(&bytes)
}

/// A few facts about a MIDI file, enough to decide whether it's worth
/// rendering.
#[derive(Clone, Debug, PartialEq)]
pub struct MidiSummary {
    #[allow(missing_docs)]
    pub format: Format,
    /// `None` for SMPTE-timed files.
    pub ticks_per_quarter: Option<u16>,
    #[allow(missing_docs)]
    pub track_count: usize,
    /// Note-on plus note-off events across all tracks.
    pub note_event_count: usize,
    /// Channels that carry at least one note event.
    pub channels: BTreeSet<u8>,
}
impl MidiSummary {
    #[allow(missing_docs)]
    pub fn from_smf(smf: &Smf) -> Self {
        let events = note_events(smf);
        Self {
            format: smf.header.format,
            ticks_per_quarter: match smf.header.timing {
                Timing::Metrical(ticks) => Some(ticks.as_int()),
                Timing::Timecode(..) => None,
            },
            track_count: smf.tracks.len(),
            note_event_count: events.len(),
            channels: events.iter().map(|e| e.channel.0).collect(),
        }
    }

    #[allow(missing_docs)]
    pub fn from_path(path: &Path) -> Result<Self, InspectError> {
        let bytes = std::fs::read(path)?;
        Ok(Self::from_smf(&Smf::parse(&bytes)?))
    }

    /// True if there's anything for an instrument to play.
    pub fn has_note_data(&self) -> bool {
        !self.channels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{u15, u28, u4, NoteEventKind};
    use midly::{num::u24, Header, MetaMessage, TrackEvent};

    fn midi(delta: u32, channel: u8, message: MidiMessage) -> TrackEvent<'static> {
        TrackEvent {
            delta: u28::from(delta),
            kind: TrackEventKind::Midi {
                channel: u4::from(channel),
                message,
            },
        }
    }

    fn meta(delta: u32, message: MetaMessage<'static>) -> TrackEvent<'static> {
        TrackEvent {
            delta: u28::from(delta),
            kind: TrackEventKind::Meta(message),
        }
    }

    #[test]
    fn meta_event_deltas_fold_into_the_next_note() {
        let mut smf = Smf::new(Header::new(
            Format::SingleTrack,
            Timing::Metrical(u15::new(96)),
        ));
        smf.tracks.push(vec![
            meta(5, MetaMessage::Tempo(u24::new(500_000))),
            midi(0, 0, MidiUtils::new_note_on(60, 100)),
            meta(10, MetaMessage::Text(b"hi")),
            midi(86, 0, MidiUtils::new_note_off(60, 0)),
            midi(0, 2, MidiMessage::ProgramChange { program: u7::new(3) }),
            midi(0, 2, MidiUtils::new_note_on(64, 0)),
            meta(0, MetaMessage::EndOfTrack),
        ]);

        let events = note_events(&smf);
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].delta, 5);
        assert_eq!(events[0].kind, NoteEventKind::On);
        assert_eq!(events[1].delta, 96);
        assert_eq!(events[1].kind, NoteEventKind::Off);
        assert_eq!(events[2].kind, NoteEventKind::Off, "zero-velocity note-on");

        let summary = MidiSummary::from_smf(&smf);
        assert_eq!(summary.ticks_per_quarter, Some(96));
        assert_eq!(summary.track_count, 1);
        assert_eq!(summary.note_event_count, 3);
        assert_eq!(
            summary.channels.into_iter().collect::<Vec<_>>(),
            vec![0, 2]
        );
    }

    #[test]
    fn empty_track_has_no_note_data() {
        let mut smf = Smf::new(Header::new(
            Format::SingleTrack,
            Timing::Metrical(u15::new(480)),
        ));
        smf.tracks.push(vec![meta(0, MetaMessage::EndOfTrack)]);
        let summary = MidiSummary::from_smf(&smf);
        assert!(!summary.has_note_data());
        assert_eq!(summary.note_event_count, 0);
    }

    #[test]
    fn garbage_is_a_parse_error() {
        assert!(matches!(
            read_note_events_from_bytes(b"definitely not MIDI"),
            Err(InspectError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            read_note_events(Path::new("/nonexistent/file.mid")),
            Err(InspectError::Io(_))
        ));
    }
}
