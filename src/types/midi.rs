// Copyright (c) 2024 Mike Tsao

use crate::util::MidiUtils;
use midly::{MidiMessage, TrackEvent, TrackEventKind};
use serde::{Deserialize, Serialize};
use synonym::Synonym;

pub use midly::num::{u15, u28, u4, u7};

/// Newtype for MIDI channel.
#[derive(Synonym, Serialize, Deserialize)]
pub struct MidiChannel(pub u8);
#[allow(missing_docs)]
impl MidiChannel {
    pub const MAX_VALUE: u8 = 15; // inclusive

    pub const fn new(value: u8) -> Self {
        Self(value)
    }
}
impl From<u4> for MidiChannel {
    fn from(value: u4) -> Self {
        Self(value.as_int())
    }
}
impl From<MidiChannel> for u4 {
    fn from(value: MidiChannel) -> Self {
        u4::from(value.0.min(MidiChannel::MAX_VALUE))
    }
}

/// Whether a [NoteEvent] starts or ends a note.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoteEventKind {
    On,
    Off,
}

/// One pitch-on or pitch-off event in a track, timed relative to the event
/// before it.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NoteEvent {
    #[allow(missing_docs)]
    pub kind: NoteEventKind,
    /// MIDI pitch number, 0..=127.
    pub key: u8,
    #[allow(missing_docs)]
    pub vel: u8,
    /// Ticks since the previous event in the same track.
    pub delta: u32,
    #[allow(missing_docs)]
    pub channel: MidiChannel,
}
impl NoteEvent {
    /// The largest delta a standard MIDI file can encode.
    pub const MAX_DELTA: u32 = 0x0FFF_FFFF;

    #[allow(missing_docs)]
    pub fn new_on(key: u8, vel: u8, delta: u32) -> Self {
        Self {
            kind: NoteEventKind::On,
            key,
            vel,
            delta,
            channel: MidiChannel::default(),
        }
    }

    #[allow(missing_docs)]
    pub fn new_off(key: u8, vel: u8, delta: u32) -> Self {
        Self {
            kind: NoteEventKind::Off,
            key,
            vel,
            delta,
            channel: MidiChannel::default(),
        }
    }

    #[allow(missing_docs)]
    pub fn is_on(&self) -> bool {
        self.kind == NoteEventKind::On
    }

    /// Interprets a channel message as a note event. A Note-On with velocity
    /// zero counts as a note-off, as it does on the wire.
    pub fn from_midi_message(delta: u32, channel: u4, message: &MidiMessage) -> Option<Self> {
        let (kind, key, vel) = match *message {
            MidiMessage::NoteOn { key, vel } if vel.as_int() == 0 => (NoteEventKind::Off, key, vel),
            MidiMessage::NoteOn { key, vel } => (NoteEventKind::On, key, vel),
            MidiMessage::NoteOff { key, vel } => (NoteEventKind::Off, key, vel),
            _ => return None,
        };
        Some(Self {
            kind,
            key: key.as_int(),
            vel: vel.as_int(),
            delta,
            channel: MidiChannel::from(channel),
        })
    }

    /// Converts to a midly [TrackEvent] ready for serialization.
    pub fn to_track_event(&self) -> TrackEvent<'static> {
        TrackEvent {
            delta: u28::from(self.delta),
            kind: TrackEventKind::Midi {
                channel: u4::from(self.channel),
                message: match self.kind {
                    NoteEventKind::On => MidiUtils::new_note_on(self.key, self.vel),
                    NoteEventKind::Off => MidiUtils::new_note_off(self.key, self.vel),
                },
            },
        }
    }
}
