//! QR Code model 2 encoder, GS1 QR included.
//!
//! ```
//! use symbology::qr::{self, EcLevel, QrOptions};
//!
//! let options = QrOptions { level: EcLevel::Quartile, ..Default::default() };
//! let symbol = qr::encode(b"HELLO WORLD", &options).unwrap();
//! assert_eq!((symbol.version, symbol.mask), (1, 0));
//! assert_eq!(symbol.matrix.width(), 21);
//! ```

pub mod bitstream;
pub mod frame;
pub mod mask;
pub mod segment;
pub mod version;

use log::debug;

use crate::error::{EncodeError, Result};
use crate::gs1;
use crate::matrix::{BitMatrix, Render};

use bitstream::{data_codewords, encode_segments, interleave};
use frame::{place_codewords, Frame, DARK};
use segment::{segment, total_bits};

pub use version::{EcLevel, MAX_VERSION, MIN_VERSION};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct QrOptions {
    /// 1..=40, the smallest fitting version when None (or 0)
    pub version: Option<u8>,
    pub level: EcLevel,
    /// 0..=7, chosen by penalty score when None
    pub mask: Option<u8>,
    /// Raise the error correction level while the data still fits
    pub boost: bool,
    /// GS1 element string, bracketed AIs are normalised first
    pub gs1: bool,
}

/// Encoded QR Code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrSymbol {
    pub version: u8,
    /// Level actually used, higher than requested after a boost
    pub level: EcLevel,
    pub mask: u8,
    /// Data and error correction codewords in placement order
    pub codewords: Vec<u8>,
    pub matrix: BitMatrix,
}

impl QrSymbol {
    #[inline]
    pub fn size(&self) -> usize {
        version::size(self.version)
    }

    pub fn render(&self) -> Render<'_> {
        self.matrix.render()
    }
}

/// Bits needed by `data` in `version`, None when a segment count overflows.
fn bits_needed(data: &[u8], version: u8, gs1: bool) -> Option<usize> {
    total_bits(&segment(data, version, gs1), version, gs1)
}

fn select_version(data: &[u8], options: &QrOptions) -> Result<u8> {
    let fits = |v: u8| bits_needed(data, v, options.gs1)
        .is_some_and(|bits| bits <= version::data_codewords(v, options.level) * 8);

    match options.version {
        Some(v @ MIN_VERSION..=MAX_VERSION) => {
            if fits(v) {
                Ok(v)
            } else {
                Err(EncodeError::CapacityExceeded(format!("Too much data for version {v}-{:?}", options.level)))
            }
        },
        None | Some(0) => (MIN_VERSION..=MAX_VERSION).find(|&v| fits(v)).ok_or_else(||
            EncodeError::CapacityExceeded(format!(
                "{} bytes do not fit a version {MAX_VERSION}-{:?} QR Code", data.len(), options.level))),
        Some(v) => Err(EncodeError::InvalidConfiguration(format!("QR version {v} is not in 1..=40"))),
    }
}

/// Strongest level at or above `level` that still holds `bits`.
fn boost_level(level: EcLevel, version: u8, bits: usize) -> EcLevel {
    EcLevel::ALL.into_iter()
        .filter(|&l| l > level && bits <= version::data_codewords(version, l) * 8)
        .last()
        .unwrap_or(level)
}

/// Encodes `data` as a QR Code.
pub fn encode(data: &[u8], options: &QrOptions) -> Result<QrSymbol> {
    if let Some(mask) = options.mask.filter(|&m| m > 7) {
        return Err(EncodeError::InvalidConfiguration(format!("QR mask {mask} is not in 0..=7")));
    }
    let normalized;
    let data = if options.gs1 {
        normalized = gs1::normalize(data)?;
        &normalized[..]
    } else {
        data
    };

    let version = select_version(data, options)?;
    let segments = segment(data, version, options.gs1);
    let stream = encode_segments(&segments, version, options.gs1);
    let level = if options.boost { boost_level(options.level, version, stream.len()) } else { options.level };

    let data_codewords = data_codewords(stream, version::data_codewords(version, level));
    let codewords = interleave(&data_codewords, version, level)?;

    let frame = Frame::get(version);
    let size = frame.size();
    let placed = place_codewords(frame, &codewords);
    let (mask, modules) = match options.mask {
        Some(m) => {
            let mut modules = placed;
            mask::apply(&mut modules, size, level, m);
            (m, modules)
        },
        None => mask::best_mask(&placed, size, level),
    };
    debug!("qr: version {version}-{level:?}, {} segments, mask {mask}", segments.len());

    let bits = modules.iter().map(|&m| m & DARK != 0).collect();
    let matrix = BitMatrix::from_bits(size, size, bits)
        .ok_or_else(|| EncodeError::InvalidConfiguration(format!("QR matrix of {size} modules")))?;

    Ok(QrSymbol { version, level, mask, codewords, matrix })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rows(symbol: &QrSymbol) -> Vec<String> {
        (0..symbol.size()).map(|y| symbol.matrix.row_string(y)).collect()
    }

    #[test]
    fn test_numeric_1l() {
        let symbol = encode(b"12345", &QrOptions::default()).unwrap();
        assert_eq!((symbol.version, symbol.level, symbol.mask), (1, EcLevel::Low, 7));
        assert_eq!(symbol.codewords[19..], [155, 143, 41, 27, 243, 156, 145]);
        assert_eq!(rows(&symbol), vec![
            "111111100101101111111",
            "100000101101001000001",
            "101110101100101011101",
            "101110100101001011101",
            "101110101000101011101",
            "100000101001101000001",
            "111111101010101111111",
            "000000001111100000000",
            "110100110110001110110",
            "000110001110001000001",
            "010111110100110001110",
            "010100001111000000100",
            "001101101100101010011",
            "000000001101000111000",
            "111111101010010101110",
            "100000100011110111000",
            "101110100111001110111",
            "101110101101000001111",
            "101110100000100010001",
            "100000101100011010110",
            "111111101111100011100",
        ]);
    }

    #[test]
    fn test_hello_world_1q() {
        let options = QrOptions { level: EcLevel::Quartile, ..Default::default() };
        let symbol = encode(b"HELLO WORLD", &options).unwrap();
        assert_eq!((symbol.version, symbol.mask), (1, 0));
        assert_eq!(rows(&symbol), vec![
            "111111101100001111111",
            "100000101001001000001",
            "101110101001101011101",
            "101110101000001011101",
            "101110101010001011101",
            "100000100010001000001",
            "111111101010101111111",
            "000000001000000000000",
            "011010110000101011111",
            "010000001111000010001",
            "001101110110001011000",
            "011011010011010101110",
            "100010101011101110101",
            "000000001101001000101",
            "111111101010000101100",
            "100000100101101101000",
            "101110101010001111111",
            "101110100101010100010",
            "101110101001011101001",
            "100000101011110001011",
            "111111100001011100001",
        ]);
    }

    #[test]
    fn test_forced_mask() {
        let options = QrOptions { mask: Some(2), ..Default::default() };
        let symbol = encode(b"12345", &options).unwrap();
        assert_eq!(symbol.mask, 2);
        assert_eq!(symbol.matrix.row_string(8), "111110111001010101010");
        assert_eq!(symbol.matrix.row_string(20), "111111101000100100100");

        let options = QrOptions { mask: Some(8), ..Default::default() };
        assert!(matches!(encode(b"12345", &options), Err(EncodeError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_boost() {
        let options = QrOptions { boost: true, ..Default::default() };
        let symbol = encode(b"HELLO WORLD", &options).unwrap();
        assert_eq!((symbol.version, symbol.level, symbol.mask), (1, EcLevel::Quartile, 0));
        // Same symbol as asking for Q directly
        let direct = encode(b"HELLO WORLD", &QrOptions { level: EcLevel::Quartile, ..Default::default() }).unwrap();
        assert_eq!(symbol.matrix, direct.matrix);
    }

    #[test]
    fn test_gs1() {
        let options = QrOptions { gs1: true, ..Default::default() };
        let symbol = encode(b"(01)09501101530003", &options).unwrap();
        assert_eq!(symbol.version, 1);
        assert_eq!(symbol.codewords[..19], [
            81, 4, 0, 174, 216, 110, 38, 64, 3, 0, 236, 17, 236, 17, 236, 17, 236, 17, 236,
        ]);
    }

    #[test]
    fn test_version_selection() {
        let symbol = encode(&[b'A'; 200], &QrOptions { level: EcLevel::Medium, ..Default::default() }).unwrap();
        assert_eq!((symbol.version, symbol.mask), (8, 2));
        assert_eq!(symbol.codewords.len(), 242);
        assert_eq!(symbol.size(), 49);
    }

    #[test]
    fn test_explicit_version() {
        let options = QrOptions { version: Some(3), ..Default::default() };
        assert_eq!(encode(b"12345", &options).unwrap().size(), 29);

        let options = QrOptions { version: Some(1), level: EcLevel::High, ..Default::default() };
        assert_eq!(
            encode(&[b'a'; 20], &options),
            Err(EncodeError::CapacityExceeded("Too much data for version 1-High".into())),
        );

        let options = QrOptions { version: Some(41), ..Default::default() };
        assert!(matches!(encode(b"1", &options), Err(EncodeError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_too_long() {
        let data = vec![b'x'; 2954];
        assert!(matches!(encode(&data, &QrOptions::default()), Err(EncodeError::CapacityExceeded(_))));
        let data = vec![b'x'; 2953];
        assert_eq!(encode(&data, &QrOptions::default()).unwrap().version, 40);
    }
}
