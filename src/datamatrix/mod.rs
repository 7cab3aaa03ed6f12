//! Data Matrix ECC200 encoder.
//!
//! ```
//! use symbology::datamatrix::{self, DataMatrixOptions};
//!
//! let symbol = datamatrix::encode(b"123456", &DataMatrixOptions::default()).unwrap();
//! assert_eq!((symbol.size.rows, symbol.size.cols), (10, 10));
//! assert_eq!(symbol.data_codewords(), [142, 164, 186]);
//! ```

pub mod codewords;
pub mod optimizer;
pub mod placement;
pub mod size;

use log::debug;

use crate::ecc::ReedSolomon;
use crate::error::{EncodeError, Result};
use crate::gs1;
use crate::matrix::{BitMatrix, Render};

use codewords::Encoder;
use optimizer::Mode;

pub use size::{SymbolShape, SymbolSize, SYMBOL_SIZES};

/// Longest message accepted, whatever the encodation.
pub const MAX_BYTES: usize = 3116;

/// Encodation scheme requested for the whole message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Encodation {
    /// Switch schemes wherever it saves codewords
    #[default]
    Auto,
    Ascii,
    C40,
    Text,
    X12,
    Edifact,
    Base256,
}

impl Encodation {
    const fn mode(self) -> Option<Mode> {
        match self {
            Encodation::Auto => None,
            Encodation::Ascii => Some(Mode::Ascii),
            Encodation::C40 => Some(Mode::C40),
            Encodation::Text => Some(Mode::Text),
            Encodation::X12 => Some(Mode::X12),
            Encodation::Edifact => Some(Mode::Edifact),
            Encodation::Base256 => Some(Mode::Base256),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DataMatrixOptions {
    /// Shapes considered by the automatic size selection
    pub shape: SymbolShape,
    /// Explicit (rows, columns), automatic when None
    pub size: Option<(u8, u8)>,
    pub encodation: Encodation,
    /// GS1 element string, bracketed AIs are normalised first
    pub gs1: bool,
    /// Place the parity of the two short 144x144 blocks first, as read by
    /// older decoders
    pub legacy_144: bool,
}

/// Encoded Data Matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataMatrixSymbol {
    pub size: SymbolSize,
    /// Data codewords, padding included, followed by the interleaved ECC
    pub codewords: Vec<u8>,
    pub matrix: BitMatrix,
}

impl DataMatrixSymbol {
    #[inline]
    pub fn data_codewords(&self) -> &[u8] {
        &self.codewords[..self.size.data as usize]
    }

    #[inline]
    pub fn ecc_codewords(&self) -> &[u8] {
        &self.codewords[self.size.data as usize..]
    }

    pub fn render(&self) -> Render<'_> {
        self.matrix.render()
    }
}

/// Appends the error correction of `data` (exactly `size.data` codewords).
/// Codeword `i` belongs to block `i % blocks`, parity is interleaved the
/// same way.
pub fn error_correction(data: &[u8], size: &SymbolSize, legacy_144: bool) -> Result<Vec<u8>> {
    debug_assert_eq!(data.len(), size.data as usize);
    let blocks = size.blocks as usize;
    let per_block = size.ecc_per_block();
    let rs = ReedSolomon::data_matrix(per_block)?;

    let mut codewords = Vec::with_capacity(size.total_codewords());
    codewords.extend_from_slice(data);
    codewords.resize(size.total_codewords(), 0);

    let mut block = Vec::with_capacity(data.len() / blocks + 1);
    let mut parity = vec![0u8; per_block];
    for b in 0..blocks {
        block.clear();
        block.extend(data.iter().skip(b).step_by(blocks));
        rs.encode_into(&block, &mut parity);

        // 144x144 is the only size with blocks of unequal length
        let slot = if legacy_144 && size.rows == 144 { (b + 2) % blocks } else { b };
        for (k, &p) in parity.iter().enumerate() {
            codewords[data.len() + k * blocks + slot] = p;
        }
    }
    Ok(codewords)
}

fn select_size(encoded: &codewords::Encoded, options: &DataMatrixOptions) -> Result<SymbolSize> {
    let len = encoded.codewords.len();
    match options.size {
        Some((rows, cols)) => {
            let size = SymbolSize::find(rows, cols).ok_or_else(|| EncodeError::InvalidConfiguration(
                format!("{rows}x{cols} is not a Data Matrix size")))?;
            if encoded.fits(size.data as usize) {
                Ok(size)
            } else {
                Err(EncodeError::CapacityExceeded(format!("Too much data for {rows}x{cols} barcode")))
            }
        },
        None => SYMBOL_SIZES.iter().copied()
            .filter(|s| s.matches(options.shape))
            .find(|s| encoded.fits(s.data as usize))
            .ok_or_else(|| EncodeError::CapacityExceeded(format!(
                "{len} codewords, at most {} fit a {:?} Data Matrix",
                SymbolSize::max_capacity(options.shape), options.shape))),
    }
}

/// Encodes `data` as a Data Matrix.
pub fn encode(data: &[u8], options: &DataMatrixOptions) -> Result<DataMatrixSymbol> {
    let normalized;
    let data = if options.gs1 {
        normalized = gs1::normalize(data)?;
        &normalized[..]
    } else {
        data
    };
    if data.len() > MAX_BYTES {
        return Err(EncodeError::CapacityExceeded(format!("{} bytes, Data Matrix holds at most {MAX_BYTES}", data.len())));
    }

    let forced = options.encodation.mode();
    if let Some(mode) = forced {
        codewords::validate(data, mode)?;
    }
    let plan = optimizer::plan(data, options.gs1, forced)?;
    let encoded = Encoder::new(data, options.gs1).encode(&plan);

    let size = select_size(&encoded, options)?;
    debug!("data matrix: {} codewords, {}x{} symbol holding {}", encoded.codewords.len(), size.rows, size.cols, size.data);

    let data_codewords = encoded.into_data(size.data as usize);
    let codewords = error_correction(&data_codewords, &size, options.legacy_144)?;
    let matrix = placement::place(&size, &codewords);

    Ok(DataMatrixSymbol { size, codewords, matrix })
}
