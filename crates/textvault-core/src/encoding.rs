//! Character encoding detection and codecs
//!
//! Detection is a best-effort statistical guess. A detector returns an
//! [`EncodingGuess`] carrying a confidence score; the score is reported
//! but only a missing guess changes what the pipeline does.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Confidence ceiling for single-byte Latin guesses. Any byte sequence
/// is valid in these encodings, so a guess is never strong evidence.
const SINGLE_BYTE_CEILING: f32 = 0.73;

/// Byte values left undefined by windows-1252.
const UNDEFINED_1252: [u8; 5] = [0x81, 0x8D, 0x8F, 0x90, 0x9D];

/// Encodings the pipeline can decode and re-encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextEncoding {
    #[serde(rename = "ascii")]
    Ascii,
    #[serde(rename = "utf-8")]
    Utf8,
    #[serde(rename = "ISO-8859-1")]
    Latin1,
    #[serde(rename = "windows-1252")]
    Windows1252,
}

impl TextEncoding {
    /// Canonical label, as written to manifests.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ascii => "ascii",
            Self::Utf8 => "utf-8",
            Self::Latin1 => "ISO-8859-1",
            Self::Windows1252 => "windows-1252",
        }
    }

    /// Parse a label, accepting the common aliases.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "ascii" | "us-ascii" => Some(Self::Ascii),
            "utf-8" | "utf8" => Some(Self::Utf8),
            "iso-8859-1" | "iso8859-1" | "latin-1" | "latin1" => Some(Self::Latin1),
            "windows-1252" | "cp1252" => Some(Self::Windows1252),
            _ => None,
        }
    }

    /// Decode bytes strictly. `None` means the bytes are not valid in this encoding.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Option<Cow<'a, str>> {
        match self {
            Self::Ascii => bytes
                .is_ascii()
                .then(|| encoding_rs::mem::decode_latin1(bytes)),
            Self::Utf8 => encoding_rs::UTF_8.decode_without_bom_handling_and_without_replacement(bytes),
            Self::Latin1 => Some(encoding_rs::mem::decode_latin1(bytes)),
            Self::Windows1252 => {
                if bytes.iter().any(|b| UNDEFINED_1252.contains(b)) {
                    return None;
                }
                encoding_rs::WINDOWS_1252.decode_without_bom_handling_and_without_replacement(bytes)
            }
        }
    }

    /// Encode text strictly. `None` means some character has no representation.
    pub fn encode<'a>(&self, text: &'a str) -> Option<Cow<'a, [u8]>> {
        match self {
            Self::Ascii => text.is_ascii().then(|| Cow::Borrowed(text.as_bytes())),
            Self::Utf8 => Some(Cow::Borrowed(text.as_bytes())),
            Self::Latin1 => encoding_rs::mem::is_str_latin1(text)
                .then(|| encoding_rs::mem::encode_latin1_lossy(text)),
            Self::Windows1252 => {
                let (bytes, _, had_errors) = encoding_rs::WINDOWS_1252.encode(text);
                (!had_errors).then_some(bytes)
            }
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A detector's best guess for a byte buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodingGuess {
    pub encoding: TextEncoding,
    /// Heuristic score in `0.0..=1.0`; not a correctness guarantee.
    pub confidence: f32,
}

impl EncodingGuess {
    pub fn new(encoding: TextEncoding, confidence: f32) -> Self {
        Self {
            encoding,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

/// Guesses the character encoding of raw bytes.
///
/// Implementations can be swapped into the pipeline without touching it.
pub trait EncodingDetector: Send + Sync {
    /// Returns `None` when nothing usable can be said about the bytes.
    fn guess(&self, bytes: &[u8]) -> Option<EncodingGuess>;
}

/// Statistical detector distinguishing ASCII, UTF-8 and the 8-bit Latin encodings.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicDetector;

impl EncodingDetector for HeuristicDetector {
    fn guess(&self, bytes: &[u8]) -> Option<EncodingGuess> {
        if bytes.is_empty() {
            return Some(EncodingGuess::new(TextEncoding::Ascii, 1.0));
        }

        // NUL or dense control bytes: binary, not text
        if bytes.contains(&0) {
            return None;
        }
        let controls = bytes.iter().filter(|b| is_stray_control(**b)).count();
        if controls * 10 > bytes.len() {
            return None;
        }

        if bytes.is_ascii() {
            return Some(EncodingGuess::new(TextEncoding::Ascii, 1.0));
        }

        if let Ok(text) = std::str::from_utf8(bytes) {
            let multibyte = text.chars().filter(|c| !c.is_ascii()).count();
            return Some(EncodingGuess::new(
                TextEncoding::Utf8,
                utf8_confidence(multibyte),
            ));
        }

        guess_single_byte(bytes)
    }
}

fn guess_single_byte(bytes: &[u8]) -> Option<EncodingGuess> {
    let high: Vec<u8> = bytes.iter().copied().filter(|b| *b >= 0x80).collect();
    if high.iter().any(|b| UNDEFINED_1252.contains(b)) {
        return None;
    }

    let c1 = high.iter().filter(|b| (0x80..=0x9F).contains(*b)).count();
    let letters = high.iter().filter(|b| is_latin1_letter(**b)).count();
    let encoding = if c1 > 0 {
        TextEncoding::Windows1252
    } else {
        TextEncoding::Latin1
    };
    let letter_ratio = letters as f32 / high.len().max(1) as f32;

    Some(EncodingGuess::new(
        encoding,
        SINGLE_BYTE_CEILING * (0.5 + 0.5 * letter_ratio),
    ))
}

/// Each valid multi-byte sequence halves the chance the match is a coincidence.
fn utf8_confidence(multibyte: usize) -> f32 {
    let exponent = multibyte.min(6) as i32;
    1.0 - 0.99 * 0.5f32.powi(exponent)
}

fn is_stray_control(b: u8) -> bool {
    b < 0x20 && !matches!(b, b'\t' | b'\n' | b'\r' | 0x0C)
}

fn is_latin1_letter(b: u8) -> bool {
    matches!(b, 0xAA | 0xB5 | 0xBA) || (b >= 0xC0 && b != 0xD7 && b != 0xF7)
}
