use core::marker::PhantomData;

use crate::error::{EncodeError, Result};
use crate::matrix::BitMatrix;
use crate::pdf417::generators::row::{Row, FixedSize, FreeSize};
use crate::pdf417::tables::Variant;

/// Minimum number of rows in a PDF417 barcode.
pub const MIN_ROWS: u8 = 3;
/// Maximum number of rows in a PDF417 barcode.
pub const MAX_ROWS: u8 = 90;
/// Minimum number of data columns in a PDF417 barcode.
pub const MIN_COLS: u8 = 1;
/// Maximum number of data columns in a PDF417 barcode.
pub const MAX_COLS: u8 = 30;
/// Maximum number of codewords (data and ECC) in a PDF417 barcode.
pub const MAX_CODEWORDS: usize = 928;

/// Sealed codewords laid out in rows of `R`.
#[derive(Debug, Clone)]
pub struct PDF417<'a, R: Row<'a> + 'a> {
    storage: &'a [u16],
    dimensions: (u8, u8),
    level: u8,
    _phantom: PhantomData<R>,
}

impl<'a, R: Row<'a> + 'a> PDF417<'a, R> {
    /// Get the number of rows of the PDF417.
    #[inline]
    pub const fn rows(&self) -> u8 {
        self.dimensions.0
    }

    /// Get the number of data columns of the PDF417.
    #[inline]
    pub const fn cols(&self) -> u8 {
        self.dimensions.1
    }

    /// ECC level, or the variant index of a MicroPDF417.
    #[inline]
    pub const fn level(&self) -> u8 {
        self.level
    }

    /// Width of a row in modules.
    #[inline]
    pub fn width(&self) -> usize {
        R::width(self.cols())
    }

    pub fn iter(&self) -> impl Iterator<Item = R> + 'a {
        let infos = R::prepare(self.dimensions, self.level);
        let storage = self.storage;
        storage.chunks_exact(self.cols() as usize)
            .enumerate()
            .map(move |(row, codewords)| R::init(codewords, row as u8, infos))
    }

    pub fn bits(&self) -> impl Iterator<Item = bool> + 'a {
        self.iter()
            .flatten() // rows -> patterns
            .flatten() // pattern -> modules
    }

    /// Lays the rows down in a matrix, one module row per symbol row.
    pub fn to_matrix(&self) -> BitMatrix {
        let mut matrix = BitMatrix::new(self.width(), self.rows() as usize);
        for (y, row) in self.iter().enumerate() {
            for (x, on) in row.flatten().enumerate() {
                if on {
                    matrix.set(x, y, true);
                }
            }
        }
        matrix
    }
}

impl<'a, R: Row<'a> + 'a + FixedSize> PDF417<'a, R> {
    /// Creates a MicroPDF417 layout for the codewords sealed for `v`.
    pub fn from_variant(storage: &'a [u16], v: Variant) -> Result<Self> {
        let dimensions = (v.rows(), v.cols());
        if storage.len() != v.capacity() {
            return Err(EncodeError::InvalidConfiguration(format!(
                "{} codewords do not match a {}x{} MicroPDF417", storage.len(), v.cols(), v.rows())));
        }

        Ok(Self { storage, dimensions, level: v.variant(), _phantom: PhantomData })
    }
}

impl<'a, R: Row<'a> + 'a + FreeSize> PDF417<'a, R> {
    /// Creates a new PDF417 with the sealed codewords (data and ECC), the
    /// level of error correction and the layout configuration (rows and
    /// cols). The codewords must fill exactly rows \* cols slots, use
    /// [PDF417Encoder](crate::pdf417::high_level::PDF417Encoder) to fill
    /// them accordingly.
    pub fn new(storage: &'a [u16], rows: u8, cols: u8, level: u8) -> Result<Self> {
        if !(MIN_ROWS..=MAX_ROWS).contains(&rows) {
            return Err(EncodeError::InvalidConfiguration(format!("{rows} rows, the number of rows must be between 3 and 90")));
        }
        if !(MIN_COLS..=MAX_COLS).contains(&cols) {
            return Err(EncodeError::InvalidConfiguration(format!("{cols} columns, the number of columns must be between 1 and 30")));
        }
        if level > 8 {
            return Err(EncodeError::InvalidConfiguration(format!("ECC level {level} must be between 0 and 8")));
        }
        if storage.len() != rows as usize * cols as usize {
            return Err(EncodeError::InvalidConfiguration(format!(
                "{} codewords will not fit in {rows}x{cols}", storage.len())));
        }

        Ok(Self { storage, dimensions: (rows, cols), level, _phantom: PhantomData })
    }
}

#[cfg(test)]
mod tests {
    use super::PDF417;
    use crate::pdf417::generators::{MicroPDF417Row, PDF417Row, TruncatedPDF417Row};
    use crate::pdf417::tables::Variant;

    #[test]
    fn test_invalid_layouts() {
        let codewords = [0u16; 6];
        assert!(PDF417::<PDF417Row>::new(&codewords, 2, 3, 0).is_err());
        assert!(PDF417::<PDF417Row>::new(&codewords, 3, 2, 9).is_err());
        assert!(PDF417::<PDF417Row>::new(&codewords, 3, 3, 0).is_err());
        assert!(PDF417::<PDF417Row>::new(&codewords, 6, 1, 0).is_ok());
    }

    #[test]
    fn test_matrix_dimensions() {
        let codewords = [900u16; 6];
        let pdf = PDF417::<PDF417Row>::new(&codewords, 3, 2, 0).unwrap();
        let m = pdf.to_matrix();
        assert_eq!((m.width(), m.height()), (103, 3));
        assert_eq!(pdf.bits().count(), 103 * 3);

        let pdf = PDF417::<TruncatedPDF417Row>::new(&codewords, 3, 2, 0).unwrap();
        assert_eq!(pdf.to_matrix().width(), 69);
    }

    #[test]
    fn test_micro_layout() {
        let v = Variant::with_dimensions(2, 8).unwrap();
        let codewords = vec![900u16; v.capacity()];
        let pdf = PDF417::<MicroPDF417Row>::from_variant(&codewords, v).unwrap();
        let m = pdf.to_matrix();
        assert_eq!((m.width(), m.height()), (55, 8));
        // every row ends with the stop bar
        assert!((0..8).all(|y| m.get(54, y)));
        assert!(PDF417::<MicroPDF417Row>::from_variant(&codewords[1..], v).is_err());
    }
}
