//! ECC200 symbol geometry.

/// Which kind of symbols the automatic size selection may pick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SymbolShape {
    #[default]
    Square,
    Rectangle,
    /// Smallest symbol of either shape, squares win ties
    Any,
}

/// Geometry of one ECC200 symbol size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolSize {
    /// Module rows, finder and clock tracks included
    pub rows: u8,
    /// Module columns, finder and clock tracks included
    pub cols: u8,
    /// Height of a single data region
    pub region_rows: u8,
    /// Width of a single data region
    pub region_cols: u8,
    /// Data codewords
    pub data: u16,
    /// Error correction codewords over all blocks
    pub ecc: u16,
    /// Number of interleaved Reed-Solomon blocks
    pub blocks: u8,
}

const fn size(rows: u8, cols: u8, region_rows: u8, region_cols: u8, data: u16, ecc: u16, blocks: u8) -> SymbolSize {
    SymbolSize { rows, cols, region_rows, region_cols, data, ecc, blocks }
}

/// All sizes ordered by data capacity, a square before a rectangle of the
/// same capacity.
pub const SYMBOL_SIZES: [SymbolSize; 30] = [
    size(10, 10, 8, 8, 3, 5, 1),
    size(12, 12, 10, 10, 5, 7, 1),
    size(8, 18, 6, 16, 5, 7, 1),
    size(14, 14, 12, 12, 8, 10, 1),
    size(8, 32, 6, 14, 10, 11, 1),
    size(16, 16, 14, 14, 12, 12, 1),
    size(12, 26, 10, 24, 16, 14, 1),
    size(18, 18, 16, 16, 18, 14, 1),
    size(20, 20, 18, 18, 22, 18, 1),
    size(12, 36, 10, 16, 22, 18, 1),
    size(22, 22, 20, 20, 30, 20, 1),
    size(16, 36, 14, 16, 32, 24, 1),
    size(24, 24, 22, 22, 36, 24, 1),
    size(26, 26, 24, 24, 44, 28, 1),
    size(16, 48, 14, 22, 49, 28, 1),
    size(32, 32, 14, 14, 62, 36, 1),
    size(36, 36, 16, 16, 86, 42, 1),
    size(40, 40, 18, 18, 114, 48, 1),
    size(44, 44, 20, 20, 144, 56, 1),
    size(48, 48, 22, 22, 174, 68, 1),
    size(52, 52, 24, 24, 204, 84, 2),
    size(64, 64, 14, 14, 280, 112, 2),
    size(72, 72, 16, 16, 368, 144, 4),
    size(80, 80, 18, 18, 456, 192, 4),
    size(88, 88, 20, 20, 576, 224, 4),
    size(96, 96, 22, 22, 696, 272, 4),
    size(104, 104, 24, 24, 816, 336, 6),
    size(120, 120, 18, 18, 1050, 408, 6),
    size(132, 132, 20, 20, 1304, 496, 8),
    size(144, 144, 22, 22, 1558, 620, 10),
];

impl SymbolSize {
    /// Looks up the size with the given module dimensions.
    pub fn find(rows: u8, cols: u8) -> Option<Self> {
        SYMBOL_SIZES.iter().copied().find(|s| s.rows == rows && s.cols == cols)
    }

    /// Smallest size of the requested shape holding `data` codewords.
    pub fn smallest(data: usize, shape: SymbolShape) -> Option<Self> {
        SYMBOL_SIZES.iter().copied()
            .filter(|s| s.matches(shape))
            .find(|s| s.data as usize >= data)
    }

    /// Largest data capacity among the sizes of `shape`.
    pub fn max_capacity(shape: SymbolShape) -> usize {
        SYMBOL_SIZES.iter()
            .filter(|s| s.matches(shape))
            .map(|s| s.data as usize)
            .max()
            .unwrap_or(0)
    }

    #[inline]
    pub const fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    pub const fn matches(&self, shape: SymbolShape) -> bool {
        match shape {
            SymbolShape::Square => self.is_square(),
            SymbolShape::Rectangle => !self.is_square(),
            SymbolShape::Any => true,
        }
    }

    /// Number of data regions as (vertical, horizontal).
    pub const fn regions(&self) -> (usize, usize) {
        (
            self.rows as usize / (self.region_rows as usize + 2),
            self.cols as usize / (self.region_cols as usize + 2),
        )
    }

    /// Height of the placement area, all regions joined.
    pub const fn mapping_rows(&self) -> usize {
        self.regions().0 * self.region_rows as usize
    }

    /// Width of the placement area, all regions joined.
    pub const fn mapping_cols(&self) -> usize {
        self.regions().1 * self.region_cols as usize
    }

    /// Parity codewords of each interleaved block.
    pub const fn ecc_per_block(&self) -> usize {
        self.ecc as usize / self.blocks as usize
    }

    #[inline]
    pub const fn total_codewords(&self) -> usize {
        self.data as usize + self.ecc as usize
    }
}

#[cfg(test)]
mod tests {
    use super::{SymbolShape, SymbolSize, SYMBOL_SIZES};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_placement_area_matches_codewords() {
        for s in SYMBOL_SIZES {
            let modules = s.mapping_rows() * s.mapping_cols();
            // Only the 2x2 bottom right corner may stay unused
            assert!(modules / 8 == s.total_codewords(), "{}x{}", s.rows, s.cols);
            assert!(modules % 8 == 0 || modules % 8 == 4, "{}x{}", s.rows, s.cols);
            assert_eq!(s.ecc as usize % s.blocks as usize, 0);
        }
    }

    #[test]
    fn test_regions() {
        assert_eq!(SymbolSize::find(10, 10).unwrap().regions(), (1, 1));
        assert_eq!(SymbolSize::find(32, 32).unwrap().regions(), (2, 2));
        assert_eq!(SymbolSize::find(8, 32).unwrap().regions(), (1, 2));
        assert_eq!(SymbolSize::find(144, 144).unwrap().regions(), (6, 6));
        assert_eq!(SymbolSize::find(144, 144).unwrap().mapping_rows(), 132);
        assert!(SymbolSize::find(11, 11).is_none());
    }

    #[test]
    fn test_smallest() {
        let s = SymbolSize::smallest(5, SymbolShape::Any).unwrap();
        assert_eq!((s.rows, s.cols), (12, 12));
        let s = SymbolSize::smallest(5, SymbolShape::Rectangle).unwrap();
        assert_eq!((s.rows, s.cols), (8, 18));
        let s = SymbolSize::smallest(40, SymbolShape::Rectangle).unwrap();
        assert_eq!((s.rows, s.cols), (16, 48));
        assert!(SymbolSize::smallest(50, SymbolShape::Rectangle).is_none());
        assert!(SymbolSize::smallest(1559, SymbolShape::Square).is_none());
        assert_eq!(SymbolSize::max_capacity(SymbolShape::Square), 1558);
    }
}
