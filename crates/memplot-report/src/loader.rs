//! Best-effort text loading for benchmark result files.
//!
//! Result files come from whatever toolchain produced them: plain UTF-8 on
//! Linux, BOM-prefixed UTF-8 or UTF-16 when redirected on Windows, Latin-1
//! from older setups. Unless an encoding is forced, decoding attempts an
//! ordered chain and falls back to lossy replacement as a last resort.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ReportError, Result};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Encoding {
    Utf8,
    Utf8Sig,
    Utf16,
    Latin1,
}

/// Decode attempts, in order, when no encoding is forced.
const FALLBACK_CHAIN: [Encoding; 4] = [
    Encoding::Utf8,
    Encoding::Utf8Sig,
    Encoding::Utf16,
    Encoding::Latin1,
];

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Utf8Sig => "utf-8-sig",
            Encoding::Utf16 => "utf-16",
            Encoding::Latin1 => "latin-1",
        };
        f.write_str(name)
    }
}

impl FromStr for Encoding {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Encoding::Utf8),
            "utf-8-sig" | "utf8-sig" => Ok(Encoding::Utf8Sig),
            "utf-16" | "utf16" => Ok(Encoding::Utf16),
            "latin-1" | "latin1" | "iso-8859-1" => Ok(Encoding::Latin1),
            other => Err(ReportError::invalid_argument(format!(
                "unknown encoding: {other}"
            ))),
        }
    }
}

/// Read `path` and split it into lines (no trailing newline characters).
///
/// A forced encoding that cannot decode the file is an error; the automatic
/// chain never fails because Latin-1 accepts every byte and the final resort
/// is lossy UTF-8.
pub fn read_text_lines(path: &Path, encoding: Option<Encoding>) -> Result<Vec<String>> {
    let bytes = fs::read(path).map_err(|source| ReportError::read(path, source))?;

    let text = match encoding {
        Some(enc) => {
            decode(&bytes, enc).ok_or_else(|| ReportError::decode(path, enc.to_string()))?
        }
        None => decode_with_fallback(&bytes),
    };

    Ok(text.lines().map(str::to_owned).collect())
}

fn decode_with_fallback(bytes: &[u8]) -> String {
    for enc in FALLBACK_CHAIN {
        if let Some(text) = decode(bytes, enc) {
            debug!(encoding = %enc, "decoded input");
            return text;
        }
    }
    debug!("all decode attempts failed, using lossy utf-8");
    String::from_utf8_lossy(bytes).into_owned()
}

fn decode(bytes: &[u8], encoding: Encoding) -> Option<String> {
    match encoding {
        Encoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_owned),
        Encoding::Utf8Sig => {
            let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
            std::str::from_utf8(bytes).ok().map(str::to_owned)
        }
        Encoding::Utf16 => decode_utf16(bytes),
        Encoding::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
    }
}

fn decode_utf16(bytes: &[u8]) -> Option<String> {
    // BOM selects the byte order; without one, assume little-endian.
    let (bytes, big_endian) = match bytes {
        [0xFF, 0xFE, rest @ ..] => (rest, false),
        [0xFE, 0xFF, rest @ ..] => (rest, true),
        rest => (rest, false),
    };

    if bytes.len() % 2 != 0 {
        return None;
    }

    let units = bytes
        .chunks_exact(2)
        .map(|pair| {
            if big_endian {
                u16::from_be_bytes([pair[0], pair[1]])
            } else {
                u16::from_le_bytes([pair[0], pair[1]])
            }
        })
        .collect::<Vec<_>>();

    String::from_utf16(&units).ok()
}

#[cfg(test)]
mod tests {
    use super::{Encoding, decode, decode_with_fallback};

    const SAMPLE: &str = "stride , sum, time (msec), rate (MB/s)\n4, 100.0, 12.5, 800.0";

    fn utf16le_with_bom(text: &str) -> Vec<u8> {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        bytes
    }

    #[test]
    fn fallback_decodes_plain_utf8() {
        assert_eq!(decode_with_fallback(SAMPLE.as_bytes()), SAMPLE);
    }

    #[test]
    fn fallback_decodes_utf16_with_bom() {
        assert_eq!(decode_with_fallback(&utf16le_with_bom(SAMPLE)), SAMPLE);
    }

    #[test]
    fn utf8_sig_strips_bom() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(SAMPLE.as_bytes());
        assert_eq!(decode(&bytes, Encoding::Utf8Sig).as_deref(), Some(SAMPLE));
    }

    #[test]
    fn latin1_accepts_every_byte() {
        let bytes = [0x68u8, 0xE9, 0x6C, 0x6C, 0x6F];
        assert_eq!(decode(&bytes, Encoding::Latin1).as_deref(), Some("héllo"));
    }

    #[test]
    fn forced_utf16_rejects_odd_length() {
        assert_eq!(decode(&[0xFF, 0xFE, 0x68], Encoding::Utf16), None);
    }

    #[test]
    fn encoding_names_parse() {
        for (name, expected) in [
            ("utf-8", Encoding::Utf8),
            ("UTF8", Encoding::Utf8),
            ("utf-8-sig", Encoding::Utf8Sig),
            ("utf-16", Encoding::Utf16),
            ("iso-8859-1", Encoding::Latin1),
        ] {
            assert_eq!(name.parse::<Encoding>().expect("known name"), expected);
        }
        assert!("koi8-r".parse::<Encoding>().is_err());
    }
}
