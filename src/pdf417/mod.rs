//! PDF417, truncated PDF417 and MicroPDF417 encoders.
//!
//! ```
//! use symbology::pdf417::{self, Pdf417Options};
//!
//! let symbol = pdf417::encode(b"HELLO", &Pdf417Options::default()).unwrap();
//! assert_eq!(symbol.codewords[..4], [4, 214, 341, 449]);
//! for row in symbol.row_strings() {
//!     assert!(row.starts_with("11111111010101000"));
//! }
//! ```

pub mod builder;
pub mod compaction;
pub mod generators;
pub mod high_level;
pub mod tables;

use log::debug;

use crate::ecc::pdf417::ecc_count;
use crate::error::{EncodeError, Result};
use crate::matrix::{BitMatrix, Render};

use builder::{PDF417, MAX_CODEWORDS, MAX_COLS, MAX_ROWS, MIN_COLS, MIN_ROWS};
use compaction::{Chunk, ChunkMode};
use generators::row::Row;
use generators::{MicroPDF417Row, PDF417Row, TruncatedPDF417Row};
use high_level::PDF417Encoder;
use tables::{Variant, M_PDF417_VARIANTS_COUNT};

pub use compaction::Compaction;

/// Largest number of data codewords of a MicroPDF417.
pub const MAX_MICRO_DATA: usize = 126;

/// Options shared by PDF417 and MicroPDF417. MicroPDF417 ignores `level`
/// and `truncated`, its error correction is fixed by the variant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Pdf417Options {
    pub compaction: Compaction,
    /// ECC level 0..=8, automatic when None
    pub level: Option<u8>,
    /// Data columns, automatic when None
    pub cols: Option<u8>,
    /// Rows, automatic when None
    pub rows: Option<u8>,
    /// Drop the right row indicator and stop pattern
    pub truncated: bool,
    /// ECI designator emitted before the data
    pub eci: Option<u32>,
}

/// Encoded PDF417 or MicroPDF417.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pdf417Symbol {
    /// Sealed codewords, data then ECC, row after row
    pub codewords: Vec<u16>,
    pub rows: u8,
    pub cols: u8,
    /// ECC level, None for MicroPDF417
    pub level: Option<u8>,
    /// Variant index of a MicroPDF417
    pub variant: Option<u8>,
    pub truncated: bool,
    /// One module row per symbol row
    pub matrix: BitMatrix,
}

impl Pdf417Symbol {
    #[inline]
    pub fn is_micro(&self) -> bool {
        self.variant.is_some()
    }

    /// Rows as strings of `'1'` (bar) and `'0'` (space) narrow modules.
    pub fn row_strings(&self) -> Vec<String> {
        (0..self.matrix.height()).map(|y| self.matrix.row_string(y)).collect()
    }

    /// Render helper with the usual module aspect of the family (rows three
    /// modules high, two for MicroPDF417).
    pub fn render(&self) -> Render<'_> {
        let scale = if self.is_micro() {
            MicroPDF417Row::DEFAULT_SCALE
        } else {
            PDF417Row::DEFAULT_SCALE
        };
        self.matrix.render().set_scale(scale)
    }
}

/// Recommended ECC level for a number of data codewords.
pub const fn auto_level(data_codewords: usize) -> u8 {
    match data_codewords {
        0..=40 => 2,
        41..=160 => 3,
        161..=320 => 4,
        321..=863 => 5,
        _ => 6,
    }
}

fn append_chunks(mut encoder: PDF417Encoder, data: &[u8], chunks: &[Chunk]) -> Result<PDF417Encoder> {
    for chunk in chunks {
        let bytes = &data[chunk.range.clone()];
        encoder = match chunk.mode {
            ChunkMode::Text => encoder.append_text(bytes)?,
            ChunkMode::Numeric => encoder.append_numeric(bytes)?,
            ChunkMode::Byte => encoder.append_bytes(bytes),
        };
    }
    Ok(encoder)
}

fn high_level(data: &[u8], options: &Pdf417Options, micro: bool) -> Result<PDF417Encoder> {
    let chunks = compaction::plan(data, options.compaction)?;
    let mut encoder = PDF417Encoder::new(micro);
    if let Some(eci) = options.eci {
        encoder = encoder.append_eci(eci)?;
    }
    append_chunks(encoder, data, &chunks)
}

/// Picks rows and columns for `total` codewords. Without hints the column
/// count giving a width to height ratio closest to 3 wins.
pub fn layout(total: usize, rows: Option<u8>, cols: Option<u8>) -> Result<(u8, u8)> {
    if let Some(r) = rows {
        if !(MIN_ROWS..=MAX_ROWS).contains(&r) {
            return Err(EncodeError::InvalidConfiguration(format!("{r} rows, PDF417 has 3 to 90 rows")));
        }
    }
    if let Some(c) = cols {
        if !(MIN_COLS..=MAX_COLS).contains(&c) {
            return Err(EncodeError::InvalidConfiguration(format!("{c} columns, PDF417 has 1 to 30 columns")));
        }
    }
    if total > MAX_CODEWORDS {
        return Err(EncodeError::CapacityExceeded(format!("{total} codewords, PDF417 holds at most {MAX_CODEWORDS}")));
    }

    let fits = |r: usize, c: usize| r * c >= total && r * c <= MAX_CODEWORDS;
    let rows_for = |c: usize| total.div_ceil(c).max(MIN_ROWS as usize);

    let found = match (rows, cols) {
        (Some(r), Some(c)) => fits(r as usize, c as usize).then_some((r, c)),
        (None, Some(c)) => {
            let r = rows_for(c as usize);
            (r <= MAX_ROWS as usize && fits(r, c as usize)).then_some((r as u8, c))
        },
        (Some(r), None) => {
            let c = total.div_ceil(r as usize).max(MIN_COLS as usize);
            (c <= MAX_COLS as usize && fits(r as usize, c)).then_some((r, c as u8))
        },
        (None, None) => (MIN_COLS..=MAX_COLS)
            .filter_map(|c| {
                let r = rows_for(c as usize);
                (r <= MAX_ROWS as usize && fits(r, c as usize)).then_some((r as u8, c))
            })
            .min_by(|&(ra, ca), &(rb, cb)| {
                let ratio = |r: u8, c: u8| (17.0 * c as f64 + 69.0) / (3.0 * r as f64);
                let (da, db) = ((ratio(ra, ca) - 3.0).abs(), (ratio(rb, cb) - 3.0).abs());
                da.total_cmp(&db)
            }),
    };

    found.ok_or_else(|| EncodeError::CapacityExceeded(format!(
        "{total} codewords do not fit {} rows and {} columns",
        rows.map_or("any".into(), |r| r.to_string()),
        cols.map_or("any".into(), |c| c.to_string()))))
}

/// Encodes `data` as a PDF417 (or truncated PDF417).
pub fn encode(data: &[u8], options: &Pdf417Options) -> Result<Pdf417Symbol> {
    if let Some(level) = options.level {
        if level > 8 {
            return Err(EncodeError::InvalidConfiguration(format!("ECC level {level} is not in 0..=8")));
        }
    }

    let encoder = high_level(data, options, false)?;
    let count = encoder.count();

    let (level, (rows, cols)) = match options.level {
        Some(level) => (level, layout(count + ecc_count(level), options.rows, options.cols)?),
        None => {
            let mut level = auto_level(count);
            // large messages lower the recommended level until they fit
            while level > 0 && count + ecc_count(level) > MAX_CODEWORDS {
                level -= 1;
            }
            match (options.rows, options.cols) {
                (Some(r), Some(c)) => {
                    let capacity = r as usize * c as usize;
                    let level = encoder.fit_ecc(capacity).map(|fit| fit.min(level))
                        .ok_or_else(|| EncodeError::CapacityExceeded(format!("{count} data codewords do not fit {r}x{c}")))?;
                    (level, layout(count + ecc_count(level), Some(r), Some(c))?)
                },
                (rows, cols) => (level, layout(count + ecc_count(level), rows, cols)?),
            }
        },
    };

    debug!("pdf417: {count} data codewords, level {level}, {rows} rows x {cols} columns");

    let codewords = encoder.seal(rows as usize * cols as usize, level)?;
    let matrix = if options.truncated {
        PDF417::<TruncatedPDF417Row>::new(&codewords, rows, cols, level)?.to_matrix()
    } else {
        PDF417::<PDF417Row>::new(&codewords, rows, cols, level)?.to_matrix()
    };

    Ok(Pdf417Symbol { codewords, rows, cols, level: Some(level), variant: None, truncated: options.truncated, matrix })
}

fn micro_variant(count: usize, rows: Option<u8>, cols: Option<u8>) -> Result<Variant> {
    if let Some(c) = cols {
        if !(1..=4).contains(&c) {
            return Err(EncodeError::InvalidConfiguration(format!("{c} columns, MicroPDF417 has 1 to 4 columns")));
        }
    }

    let variant = match (rows, cols) {
        (Some(r), Some(c)) => {
            let v = Variant::with_dimensions(c, r).ok_or_else(|| EncodeError::InvalidConfiguration(
                format!("no MicroPDF417 with {c} columns and {r} rows")))?;
            (v.capacity() - v.ecc_count() >= count).then_some(v)
        },
        (Some(r), None) => (0..M_PDF417_VARIANTS_COUNT as u8)
            .filter_map(Variant::new)
            .filter(|v| v.rows() == r && v.capacity() - v.ecc_count() >= count)
            .min_by_key(|v| v.cols()),
        (None, cols) => Variant::with_capacity(count, cols),
    };

    variant.ok_or_else(|| EncodeError::CapacityExceeded(format!("{count} data codewords do not fit the requested MicroPDF417")))
}

/// Encodes `data` as a MicroPDF417.
pub fn encode_micro(data: &[u8], options: &Pdf417Options) -> Result<Pdf417Symbol> {
    let encoder = high_level(data, options, true)?;
    let count = encoder.count();
    if count > MAX_MICRO_DATA {
        return Err(EncodeError::CapacityExceeded(format!("too long, {count} data codewords for at most {MAX_MICRO_DATA}")));
    }

    let variant = micro_variant(count, options.rows, options.cols)?;
    debug!("micropdf417: {count} data codewords, variant {} ({}x{})", variant.variant(), variant.cols(), variant.rows());

    let codewords = encoder.seal_micro(variant)?;
    let matrix = PDF417::<MicroPDF417Row>::from_variant(&codewords, variant)?.to_matrix();

    Ok(Pdf417Symbol {
        codewords,
        rows: variant.rows(),
        cols: variant.cols(),
        level: None,
        variant: Some(variant.variant()),
        truncated: false,
        matrix,
    })
}
