// Copyright (c) 2024 Mike Tsao

//! Maps human-readable note names such as "C#4" to MIDI pitch numbers.
//!
//! This crate uses the C4=60 convention, so the lowest nameable note is C0
//! (pitch 12) and the highest is G9 (pitch 127). Octave -1 has no names.

use core::fmt::Display;
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use strum::IntoEnumIterator;
use strum_macros::{EnumCount, EnumIter, FromRepr, IntoStaticStr};

/// The twelve pitch classes in chromatic order, starting at C. Accidentals are
/// always spelled as sharps.
#[allow(missing_docs)]
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, EnumCount, EnumIter, FromRepr, IntoStaticStr,
)]
pub enum PitchClass {
    #[strum(serialize = "C")]
    C = 0,
    #[strum(serialize = "C#")]
    Cs,
    #[strum(serialize = "D")]
    D,
    #[strum(serialize = "D#")]
    Ds,
    #[strum(serialize = "E")]
    E,
    #[strum(serialize = "F")]
    F,
    #[strum(serialize = "F#")]
    Fs,
    #[strum(serialize = "G")]
    G,
    #[strum(serialize = "G#")]
    Gs,
    #[strum(serialize = "A")]
    A,
    #[strum(serialize = "A#")]
    As,
    #[strum(serialize = "B")]
    B,
}
impl PitchClass {
    /// The spelling used in note names, e.g. "F#".
    pub fn name(self) -> &'static str {
        self.into()
    }
}
impl Display for PitchClass {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// An immutable lookup from note name to MIDI pitch number.
///
/// Build one with [build_pitch_table()] (or [PitchTable::default()]) and hand
/// it to whatever needs it, or borrow the process-wide copy from
/// [PitchTable::global()]. Entries are stored in ascending pitch order.
#[derive(Clone, Debug)]
pub struct PitchTable {
    entries: Vec<(String, u8)>,
    by_name: FxHashMap<String, u8>,
}
impl Default for PitchTable {
    fn default() -> Self {
        build_pitch_table()
    }
}
#[allow(missing_docs)]
impl PitchTable {
    pub const FIRST_OCTAVE: u8 = 0;
    pub const LAST_OCTAVE: u8 = 9;
    /// Pitch number of C0.
    pub const LOWEST_PITCH: u8 = 12;
    /// The MIDI pitch ceiling.
    pub const HIGHEST_PITCH: u8 = 127;
    pub const SEMITONES_PER_OCTAVE: u8 = 12;

    /// Returns the table shared by the whole process. It's built on first use
    /// and never changes afterward.
    pub fn global() -> &'static PitchTable {
        static PITCH_TABLE: Lazy<PitchTable> = Lazy::new(build_pitch_table);
        &PITCH_TABLE
    }

    /// Looks up the pitch number for a note name like "A3". Names are
    /// case-sensitive and only sharps are recognized.
    pub fn pitch(&self, name: &str) -> Option<u8> {
        self.by_name.get(name).copied()
    }

    /// The inverse of [PitchTable::pitch()].
    pub fn name(&self, pitch: u8) -> Option<&str> {
        pitch
            .checked_sub(Self::LOWEST_PITCH)
            .and_then(|index| self.entries.get(index as usize))
            .map(|(name, _)| name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates (name, pitch) pairs from lowest to highest pitch.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u8)> {
        self.entries.iter().map(|(name, pitch)| (name.as_str(), *pitch))
    }
}

/// Enumerates every (pitch class, octave) pair from C0 upward, stopping at the
/// MIDI ceiling. The result is the same on every call: 116 entries, C0=12
/// through G9=127.
pub fn build_pitch_table() -> PitchTable {
    let mut entries = Vec::default();
    'octaves: for octave in PitchTable::FIRST_OCTAVE..=PitchTable::LAST_OCTAVE {
        for (index, pitch_class) in PitchClass::iter().enumerate() {
            let pitch = PitchTable::LOWEST_PITCH as usize
                + index
                + PitchTable::SEMITONES_PER_OCTAVE as usize * octave as usize;
            if pitch > PitchTable::HIGHEST_PITCH as usize {
                break 'octaves;
            }
            entries.push((format!("{pitch_class}{octave}"), pitch as u8));
        }
    }
    let by_name = entries.iter().cloned().collect();
    PitchTable { entries, by_name }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::EnumCount;

    #[test]
    fn well_known_pitches() {
        let table = build_pitch_table();
        assert_eq!(table.pitch("C4"), Some(60));
        assert_eq!(table.pitch("A3"), Some(57));
        assert_eq!(table.pitch("C0"), Some(12), "C0 is the lowest name");
        assert_eq!(table.pitch("A4"), Some(69));
        assert_eq!(table.pitch("F#6"), Some(90));
        assert_eq!(table.pitch("G9"), Some(127), "G9 is the highest name");
    }

    #[test]
    fn table_is_truncated_at_the_midi_ceiling() {
        let table = build_pitch_table();
        assert_eq!(table.len(), 116);
        assert!(table.iter().all(|(_, pitch)| pitch <= 127));
        assert!(table.pitch("G#9").is_none());
        assert!(table.pitch("B9").is_none());
    }

    #[test]
    fn unknown_spellings_are_absent() {
        let table = PitchTable::global();
        for name in ["Db4", "c4", "C-1", "C10", "H2", "", "C", "4", " C4"] {
            assert!(!table.contains(name), "{name} shouldn't be in the table");
        }
    }

    #[test]
    fn entries_ascend_one_semitone_at_a_time() {
        let table = build_pitch_table();
        let pitches: Vec<u8> = table.iter().map(|(_, p)| p).collect();
        assert_eq!(pitches.first(), Some(&PitchTable::LOWEST_PITCH));
        assert!(pitches.windows(2).all(|w| w[1] == w[0] + 1));
        for (name, pitch) in table.iter() {
            assert_eq!(table.name(pitch), Some(name));
            assert_eq!(table.pitch(name), Some(pitch));
        }
        assert!(table.name(11).is_none());
        assert!(table.name(0).is_none());
    }

    #[test]
    fn global_table_matches_fresh_build() {
        let fresh = build_pitch_table();
        let global = PitchTable::global();
        assert_eq!(fresh.len(), global.len());
        assert!(fresh.iter().eq(global.iter()));
        assert!(core::ptr::eq(global, PitchTable::global()));
    }

    #[test]
    fn pitch_class_names() {
        assert_eq!(PitchClass::COUNT, 12);
        assert_eq!(PitchClass::Cs.name(), "C#");
        assert_eq!(PitchClass::B.to_string(), "B");
        assert_eq!(PitchClass::from_repr(9), Some(PitchClass::A));
    }
}
