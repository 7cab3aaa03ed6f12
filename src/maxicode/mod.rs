//! MaxiCode (ISO/IEC 16023) encoder, modes 2 to 6.
//!
//! The symbol is returned as the 33 x 30 module grid. Odd rows sit half a
//! module to the right once drawn as hexagons, and the bullseye in the
//! middle is left to the renderer.
//!
//! ```
//! use symbology::maxicode::{self, MaxiCodeOptions};
//!
//! let symbol = maxicode::encode(b"Hello", &MaxiCodeOptions::default()).unwrap();
//! assert_eq!(symbol.mode, 4);
//! assert_eq!(symbol.codewords[..7], [4, 8, 63, 5, 12, 12, 15]);
//! ```

pub mod codewords;
pub mod primary;
pub mod tables;

use log::debug;

use crate::ecc::ReedSolomon;
use crate::error::{EncodeError, Result};
use crate::matrix::{BitMatrix, Render};

pub use codewords::CodeSet;
pub use primary::StructuredCarrier;

use tables::{COLUMNS, GRID, ORIENTATION, ROWS};

/// Codewords in every symbol, error correction included.
pub const CODEWORDS: usize = 144;
const PRIMARY_DATA: usize = 10;
const PRIMARY_ECC: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MaxiCodeOptions {
    /// 2 to 6. When None, 2 or 3 if a carrier message is set, 4 otherwise
    pub mode: Option<u8>,
    /// Primary message of modes 2 and 3
    pub carrier: Option<StructuredCarrier>,
}

/// Encoded MaxiCode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaxiCodeSymbol {
    pub mode: u8,
    /// All 144 codewords: primary data and its ECC, then the secondary
    /// message with its interleaved ECC
    pub codewords: Vec<u8>,
    pub matrix: BitMatrix,
}

impl MaxiCodeSymbol {
    pub fn render(&self) -> Render<'_> {
        self.matrix.render()
    }
}

/// Secondary (data, ecc) lengths; mode 5 trades data for correction.
const fn secondary(mode: u8) -> (usize, usize) {
    if mode == 5 { (68, 56) } else { (84, 40) }
}

/// Fills in the error correction of a complete 144 codeword symbol: ten
/// codewords after the primary message, and for the secondary message one
/// block over the even positions and one over the odd positions, their
/// parity interleaved the same way after the data.
pub fn error_correction(codewords: &mut [u8], mode: u8) -> Result<()> {
    debug_assert_eq!(codewords.len(), CODEWORDS);
    let primary = ReedSolomon::maxicode(PRIMARY_ECC)?.encode(&codewords[..PRIMARY_DATA]);
    codewords[PRIMARY_DATA..PRIMARY_DATA + PRIMARY_ECC].copy_from_slice(&primary);

    let start = PRIMARY_DATA + PRIMARY_ECC;
    let (data_len, ecc_len) = secondary(mode);
    let rs = ReedSolomon::maxicode(ecc_len / 2)?;
    for half in 0..2 {
        let block: Vec<u8> = codewords[start + half..start + data_len].iter().step_by(2).copied().collect();
        let parity = rs.encode(&block);
        for (j, p) in parity.into_iter().enumerate() {
            codewords[start + data_len + 2 * j + half] = p;
        }
    }
    Ok(())
}

/// Lays the codewords on the module grid and adds the orientation marks.
pub fn place(codewords: &[u8]) -> BitMatrix {
    let mut matrix = BitMatrix::new(COLUMNS, ROWS);
    for (y, row) in GRID.iter().enumerate() {
        for (x, &n) in row.iter().enumerate() {
            if n == 0 {
                continue;
            }
            let n = n as usize - 1;
            if codewords[n / 6] & (0x20 >> (n % 6)) != 0 {
                matrix.set(x, y, true);
            }
        }
    }
    for &(y, x) in &ORIENTATION {
        matrix.set(x, y, true);
    }
    matrix
}

fn resolve_mode(options: &MaxiCodeOptions) -> Result<u8> {
    let mode = match (options.mode, &options.carrier) {
        (Some(mode), _) => mode,
        (None, Some(carrier)) => carrier.mode(),
        (None, None) => 4,
    };
    match (mode, &options.carrier) {
        (2 | 3, None) => Err(EncodeError::InvalidConfiguration(format!(
            "MaxiCode mode {mode} needs a structured carrier message"))),
        (4..=6, Some(_)) => Err(EncodeError::InvalidConfiguration(format!(
            "MaxiCode mode {mode} has no structured carrier message"))),
        (2..=6, _) => Ok(mode),
        _ => Err(EncodeError::InvalidConfiguration("Invalid MaxiCode mode".into())),
    }
}

/// Encodes `data` as a MaxiCode.
pub fn encode(data: &[u8], options: &MaxiCodeOptions) -> Result<MaxiCodeSymbol> {
    let mode = resolve_mode(options)?;
    let (data_len, _) = secondary(mode);
    let encoded = codewords::encode(data);
    let mut codewords = vec![0; CODEWORDS];
    let secondary = PRIMARY_DATA + PRIMARY_ECC;

    match &options.carrier {
        Some(carrier) => {
            if encoded.codewords.len() > data_len {
                return Err(EncodeError::CapacityExceeded(format!(
                    "{} codewords, mode {mode} holds {data_len} after the carrier message", encoded.codewords.len())));
            }
            codewords[..PRIMARY_DATA].copy_from_slice(&carrier.codewords(mode)?);
            codewords[secondary..secondary + data_len].copy_from_slice(&encoded.into_padded(data_len));
        },
        None => {
            // Nine message codewords share the primary block with the mode
            let capacity = PRIMARY_DATA - 1 + data_len;
            if encoded.codewords.len() > capacity {
                return Err(EncodeError::CapacityExceeded(format!(
                    "{} codewords, mode {mode} holds {capacity}", encoded.codewords.len())));
            }
            let padded = encoded.into_padded(capacity);
            codewords[0] = mode;
            codewords[1..PRIMARY_DATA].copy_from_slice(&padded[..PRIMARY_DATA - 1]);
            codewords[secondary..secondary + data_len].copy_from_slice(&padded[PRIMARY_DATA - 1..]);
        },
    }
    debug!("maxicode: mode {mode}, {} bytes", data.len());

    error_correction(&mut codewords, mode)?;
    let matrix = place(&codewords);
    Ok(MaxiCodeSymbol { mode, codewords, matrix })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_mode_4() {
        let symbol = encode(b"Hello", &MaxiCodeOptions::default()).unwrap();
        assert_eq!(symbol.mode, 4);
        assert_eq!(symbol.codewords[..20], [4, 8, 63, 5, 12, 12, 15, 33, 33, 33, 39, 23, 47, 44, 62, 10, 55, 62, 15, 19]);
        assert!(symbol.codewords[20..104].iter().all(|&c| c == 33));
        assert_eq!(symbol.codewords[104..], [
            60, 60, 40, 40, 9, 9, 43, 43, 14, 14, 50, 50, 12, 12, 53, 53, 57, 57, 58, 58,
            36, 36, 28, 28, 10, 10, 53, 53, 37, 37, 30, 30, 14, 14, 5, 5, 31, 31, 40, 40,
        ]);

        assert_eq!((symbol.matrix.width(), symbol.matrix.height()), (30, 33));
        assert_eq!(symbol.matrix.row_string(0), "010101010101010101010101010111");
        assert_eq!(symbol.matrix.row_string(1), "000000000000000000000000000000");
        assert_eq!(symbol.matrix.row_string(9), "010101010111110000000001010100");
        assert_eq!(symbol.matrix.row_string(15), "010101110000000000001001010110");
        assert_eq!(symbol.matrix.row_string(32), "010100000000010110101010010100");
    }

    #[test]
    fn test_mode_2() {
        let options = MaxiCodeOptions {
            mode: None,
            carrier: Some(StructuredCarrier::parse("152382802840001").unwrap()),
        };
        let symbol = encode(b"MaxiCode (19 chars)", &options).unwrap();
        assert_eq!(symbol.mode, 2);
        assert_eq!(symbol.codewords[..44], [
            34, 20, 45, 20, 17, 18, 2, 18, 7, 0, 61, 53, 12, 1, 38, 55, 55, 6, 31, 40,
            13, 63, 1, 24, 9, 59, 3, 15, 4, 5, 47, 63, 40, 49, 57, 32, 63, 3, 8, 1, 18, 19, 59, 41,
        ]);
        assert_eq!(symbol.codewords[104..], [
            44, 38, 44, 11, 45, 45, 51, 18, 33, 15, 56, 1, 17, 36, 26, 39, 34, 59, 53, 12,
            37, 48, 51, 7, 6, 24, 48, 18, 53, 23, 16, 21, 7, 30, 56, 54, 6, 2, 13, 38,
        ]);
        assert_eq!(symbol.matrix.row_string(0), "001100100011000000000111011111");
        assert_eq!(symbol.matrix.row_string(16), "000000001000000000001000000001");
        assert_eq!(symbol.matrix.row_string(32), "100010001111010000011011001001");
    }

    #[test]
    fn test_mode_5() {
        let options = MaxiCodeOptions { mode: Some(5), carrier: None };
        let symbol = encode(b"ABCDEFGHIJ", &options).unwrap();
        assert_eq!(symbol.codewords[..20], [5, 1, 2, 3, 4, 5, 6, 7, 8, 9, 21, 3, 43, 45, 54, 49, 63, 4, 45, 7]);
        assert_eq!(symbol.codewords[20..30], [10, 33, 33, 33, 33, 33, 33, 33, 33, 33]);
        assert_eq!(symbol.codewords[88..], [
            54, 5, 6, 39, 23, 9, 59, 62, 40, 6, 35, 31, 55, 53, 45, 56, 21, 6, 57, 39,
            21, 36, 58, 3, 3, 63, 25, 18, 52, 9, 34, 28, 8, 53, 42, 59, 15, 37, 4, 38,
            28, 40, 9, 28, 56, 31, 58, 41, 53, 20, 36, 24, 27, 44, 10, 34,
        ]);
    }

    #[test]
    fn test_capacity() {
        assert!(encode(&[b'a'; 92], &MaxiCodeOptions::default()).is_ok());
        assert!(matches!(encode(&[b'a'; 93], &MaxiCodeOptions::default()), Err(EncodeError::CapacityExceeded(_))));
        let options = MaxiCodeOptions { mode: Some(5), carrier: None };
        assert!(matches!(encode(&[b'a'; 80], &options), Err(EncodeError::CapacityExceeded(_))));
    }

    #[test]
    fn test_invalid_modes() {
        for mode in [0, 1, 7] {
            let options = MaxiCodeOptions { mode: Some(mode), carrier: None };
            assert_eq!(
                encode(b"x", &options),
                Err(EncodeError::InvalidConfiguration("Invalid MaxiCode mode".into())),
            );
        }
        let options = MaxiCodeOptions { mode: Some(2), carrier: None };
        assert!(matches!(encode(b"x", &options), Err(EncodeError::InvalidConfiguration(_))));
        let options = MaxiCodeOptions { mode: Some(4), carrier: Some(StructuredCarrier::new("1", 1, 1)) };
        assert!(matches!(encode(b"x", &options), Err(EncodeError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_every_module_used_once() {
        let mut seen = [false; CODEWORDS * 6];
        for &n in GRID.iter().flatten().filter(|&&n| n != 0) {
            assert!(!seen[n as usize - 1]);
            seen[n as usize - 1] = true;
        }
        assert!(seen.iter().all(|&s| s));
        assert!(ORIENTATION.iter().all(|&(y, x)| GRID[y][x] == 0));
    }
}
