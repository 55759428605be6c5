//! Note names to frequencies.
//!
//! Tokens look like `C4`, `d#5`, `Bb-1`: a letter from A to G (any case), an
//! optional `#` or `b`, then an integer octave. Pitch follows twelve-tone
//! equal temperament with A4 = 440 Hz and MIDI numbering (A4 = 69, C4 = 60).

use std::fmt;
use std::str::FromStr;

use log::trace;

use crate::error::{Result, SynthError};

pub const A4_FREQUENCY: f64 = 440.0;
pub const A4_MIDI: i64 = 69;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteName {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl NoteName {
    fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'C' => Some(NoteName::C),
            'D' => Some(NoteName::D),
            'E' => Some(NoteName::E),
            'F' => Some(NoteName::F),
            'G' => Some(NoteName::G),
            'A' => Some(NoteName::A),
            'B' => Some(NoteName::B),
            _ => None,
        }
    }

    /// Semitones above C within one octave.
    pub fn semitone(&self) -> i64 {
        match self {
            NoteName::C => 0,
            NoteName::D => 2,
            NoteName::E => 4,
            NoteName::F => 5,
            NoteName::G => 7,
            NoteName::A => 9,
            NoteName::B => 11,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Accidental {
    #[default]
    Natural,
    Sharp,
    Flat,
}

impl Accidental {
    pub fn offset(&self) -> i64 {
        match self {
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::Flat => -1,
        }
    }
}

/// A parsed note. Only tokens whose pitch is a finite, positive frequency parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteToken {
    pub name: NoteName,
    pub accidental: Accidental,
    pub octave: i32,
}

impl NoteToken {
    pub fn midi_number(&self) -> i64 {
        self.name.semitone() + self.accidental.offset() + 12 * (self.octave as i64 + 1)
    }

    pub fn frequency(&self) -> f64 {
        midi_to_frequency(self.midi_number())
    }
}

pub fn midi_to_frequency(midi: i64) -> f64 {
    A4_FREQUENCY * ((midi - A4_MIDI) as f64 / 12.0).exp2()
}

impl FromStr for NoteToken {
    type Err = SynthError;

    fn from_str(token: &str) -> Result<Self> {
        let invalid = || SynthError::ParseError(format!("Invalid note '{}'", token));

        let mut chars = token.chars();
        let name = chars.next().and_then(NoteName::from_char).ok_or_else(invalid)?;

        let rest = chars.as_str();
        let (accidental, octave_str) = if let Some(r) = rest.strip_prefix('#') {
            (Accidental::Sharp, r)
        } else if let Some(r) = rest.strip_prefix('b') {
            (Accidental::Flat, r)
        } else {
            (Accidental::Natural, rest)
        };

        // i32::from_str would also take a leading '+'
        let digits = octave_str.strip_prefix('-').unwrap_or(octave_str);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let octave = octave_str.parse::<i32>().map_err(|_| invalid())?;

        let note = NoteToken { name, accidental, octave };
        let freq = note.frequency();
        if !freq.is_finite() || freq <= 0.0 {
            return Err(SynthError::ParseError(format!("Note '{}' is outside the representable range", token)));
        }
        Ok(note)
    }
}

impl fmt::Display for NoteToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let accidental = match self.accidental {
            Accidental::Natural => "",
            Accidental::Sharp => "#",
            Accidental::Flat => "b",
        };
        write!(f, "{:?}{}{}", self.name, accidental, self.octave)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParsePolicy {
    /// Drop malformed tokens without a trace in the output.
    #[default]
    Lenient,
    /// Fail on the first malformed token.
    Strict,
}

/// Outcome of a lenient resolve, keeping track of what was thrown away.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Resolution {
    pub frequencies: Vec<f64>,
    pub dropped: Vec<(usize, String)>, // (input index, token)
}

/// Splits a melody line on whitespace.
pub fn split_melody(melody: &str) -> Vec<&str> {
    melody.split_whitespace().collect()
}

/// Frequencies of every token that parses, in input order. Malformed tokens are skipped.
pub fn resolve<S: AsRef<str>>(tokens: &[S]) -> Vec<f64> {
    resolve_report(tokens).frequencies
}

pub fn resolve_report<S: AsRef<str>>(tokens: &[S]) -> Resolution {
    let mut resolution = Resolution::default();
    for (idx, token) in tokens.iter().enumerate() {
        let token = token.as_ref();
        match token.parse::<NoteToken>() {
            Ok(note) => resolution.frequencies.push(note.frequency()),
            Err(_) => {
                trace!("skipping token {} '{}'", idx, token);
                resolution.dropped.push((idx, token.to_string()));
            }
        }
    }
    resolution
}

pub fn resolve_with_policy<S: AsRef<str>>(tokens: &[S], policy: ParsePolicy) -> Result<Vec<f64>> {
    match policy {
        ParsePolicy::Lenient => Ok(resolve(tokens)),
        ParsePolicy::Strict => tokens
            .iter()
            .enumerate()
            .map(|(idx, token)| {
                let token = token.as_ref();
                token
                    .parse::<NoteToken>()
                    .map(|note| note.frequency())
                    .map_err(|_| SynthError::ParseError(format!("token {} '{}' is not a note", idx, token)))
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn freq(token: &str) -> f64 {
        token.parse::<NoteToken>().unwrap().frequency()
    }

    #[test]
    fn a4_is_concert_pitch() {
        assert!((freq("A4") - 440.0).abs() < 1e-6);
        assert!((freq("A5") - 2.0 * freq("A4")).abs() < 1e-6);
        assert!((freq("A3") - 220.0).abs() < 1e-6);
    }

    #[test]
    fn midi_numbers() {
        assert_eq!("C4".parse::<NoteToken>().unwrap().midi_number(), 60);
        assert_eq!("A4".parse::<NoteToken>().unwrap().midi_number(), 69);
        assert_eq!("C-1".parse::<NoteToken>().unwrap().midi_number(), 0);
        assert_eq!("G9".parse::<NoteToken>().unwrap().midi_number(), 127);
        assert_eq!("Cb4".parse::<NoteToken>().unwrap().midi_number(), 59);
        assert_eq!("B#3".parse::<NoteToken>().unwrap().midi_number(), 60);
    }

    #[test]
    fn enharmonics_match() {
        assert_eq!(freq("C#4"), freq("Db4"));
        assert_eq!(freq("A#3"), freq("Bb3"));
        assert!((freq("C4") - 261.625_565).abs() < 1e-5);
    }

    #[test]
    fn case_insensitive_letters() {
        assert_eq!(freq("c4"), freq("C4"));
        assert_eq!(freq("bb5"), freq("Bb5"));
        assert_eq!(
            "bb5".parse::<NoteToken>().unwrap(),
            NoteToken { name: NoteName::B, accidental: Accidental::Flat, octave: 5 }
        );
    }

    #[test]
    fn rejects_malformed() {
        for token in ["H4", "C", "4C", "", "C#", "C##4", "C+4", "C4.5", "C 4", "Cb", "X9", "-4"] {
            assert!(token.parse::<NoteToken>().is_err(), "{token:?} should not parse");
        }
    }

    #[test]
    fn extreme_octaves() {
        let low = freq("C-5");
        let high = freq("C20");
        assert!(low > 0.0 && low < 1.0);
        assert!(high > 10_000_000.0);
        // 2^(huge) overflows to infinity
        assert!("A1100".parse::<NoteToken>().is_err());
        assert!("A-99999".parse::<NoteToken>().is_err());
        assert!("A99999999999".parse::<NoteToken>().is_err());
    }

    #[test]
    fn display_roundtrips() {
        for token in ["C4", "D#5", "Bb-1", "G0"] {
            assert_eq!(token.parse::<NoteToken>().unwrap().to_string(), token);
        }
    }

    #[test]
    fn resolve_skips_garbage() {
        let tokens = ["C4", "H4", "E4", "C", "4C", "", "G4"];
        let freqs = resolve(&tokens);
        assert_eq!(freqs.len(), 3);
        assert_eq!(freqs, vec![freq("C4"), freq("E4"), freq("G4")]);
        assert_eq!(resolve(&["C4", "E4", "G4"]), freqs);
    }

    #[test]
    fn resolve_empty() {
        let tokens: [&str; 0] = [];
        assert!(resolve(&tokens).is_empty());
    }

    #[test]
    fn report_lists_dropped_tokens() {
        let report = resolve_report(&["C4", "X9", "E4", ""]);
        assert_eq!(report.frequencies.len(), 2);
        assert_eq!(report.dropped, vec![(1, "X9".to_string()), (3, String::new())]);
    }

    #[test]
    fn strict_policy_fails_on_first_bad_token() {
        let ok = resolve_with_policy(&["C4", "E4"], ParsePolicy::Strict).unwrap();
        assert_eq!(ok.len(), 2);

        let err = resolve_with_policy(&["C4", "X9", "Q1"], ParsePolicy::Strict).unwrap_err();
        match err {
            SynthError::ParseError(msg) => assert!(msg.contains("token 1") && msg.contains("X9")),
            other => panic!("unexpected error {other:?}"),
        }

        let lenient = resolve_with_policy(&["C4", "X9"], ParsePolicy::Lenient).unwrap();
        assert_eq!(lenient.len(), 1);
    }

    #[test]
    fn split_on_any_whitespace() {
        assert_eq!(split_melody("  C4 D4\tE4\n\nF4 "), vec!["C4", "D4", "E4", "F4"]);
        assert!(split_melody("   ").is_empty());
    }
}
