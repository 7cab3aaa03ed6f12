//! Per version capacity and block structure.

/// Error correction level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EcLevel {
    /// About 7% of the codewords can be restored
    #[default]
    Low,
    /// About 15%
    Medium,
    /// About 25%
    Quartile,
    /// About 30%
    High,
}

impl EcLevel {
    pub const ALL: [EcLevel; 4] = [EcLevel::Low, EcLevel::Medium, EcLevel::Quartile, EcLevel::High];

    #[inline]
    const fn ordinal(self) -> usize {
        self as usize
    }

    /// Two bit value used in the format information.
    pub const fn format_bits(self) -> u16 {
        match self {
            EcLevel::Low => 1,
            EcLevel::Medium => 0,
            EcLevel::Quartile => 3,
            EcLevel::High => 2,
        }
    }
}

pub const MIN_VERSION: u8 = 1;
pub const MAX_VERSION: u8 = 40;

#[rustfmt::skip]
const ECC_CODEWORDS_PER_BLOCK: [[u8; 41]; 4] = [
    // Version: (0 is unused)
    //0, 1,  2,  3,  4,  5,  6,  7,  8,  9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31, 32, 33, 34, 35, 36, 37, 38, 39, 40
    [0,  7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28, 30, 30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30],
    [0, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28],
    [0, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30, 30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30],
    [0, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30],
];

#[rustfmt::skip]
const NUM_ERROR_CORRECTION_BLOCKS: [[u8; 41]; 4] = [
    [0, 1, 1, 1, 1, 1, 2, 2, 2, 2,  4,  4,  4,  4,  4,  6,  6,  6,  6,  7,  8,  8,  9,  9, 10, 12, 12, 12, 13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25],
    [0, 1, 1, 1, 2, 2, 4, 4, 4, 5,  5,  5,  8,  9,  9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21, 23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49],
    [0, 1, 1, 2, 2, 4, 4, 6, 6, 8,  8,  8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27, 29, 34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68],
    [0, 1, 1, 2, 4, 4, 4, 5, 6, 8,  8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32, 35, 37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81],
];

/// Side of the symbol in modules.
#[inline]
pub const fn size(version: u8) -> usize {
    version as usize * 4 + 17
}

/// Modules left for data and error correction once every function pattern
/// is drawn, remainder bits included.
pub const fn raw_data_modules(version: u8) -> usize {
    let v = version as usize;
    let mut result = (16 * v + 128) * v + 64;
    if v >= 2 {
        let align = v / 7 + 2;
        result -= (25 * align - 10) * align - 55;
        if v >= 7 {
            result -= 36;
        }
    }
    result
}

pub const fn ecc_per_block(version: u8, level: EcLevel) -> usize {
    ECC_CODEWORDS_PER_BLOCK[level.ordinal()][version as usize] as usize
}

pub const fn num_blocks(version: u8, level: EcLevel) -> usize {
    NUM_ERROR_CORRECTION_BLOCKS[level.ordinal()][version as usize] as usize
}

/// Data codewords of a version and level.
pub const fn data_codewords(version: u8, level: EcLevel) -> usize {
    raw_data_modules(version) / 8 - ecc_per_block(version, level) * num_blocks(version, level)
}

/// Centre coordinates of the alignment patterns on either axis.
pub fn alignment_positions(version: u8) -> Vec<usize> {
    if version == 1 {
        return Vec::new();
    }
    let v = version as usize;
    let count = v / 7 + 2;
    let step = (v * 8 + count * 3 + 5) / (count * 4 - 4) * 2;
    let mut result: Vec<usize> = (0..count - 1).map(|i| size(version) - 7 - i * step).collect();
    result.push(6);
    result.reverse();
    result
}

/// 15 bit format information: level and mask protected by a BCH(15,5)
/// code and XOR masked.
pub const fn format_information(level: EcLevel, mask: u8) -> u16 {
    let data = level.format_bits() << 3 | mask as u16;
    let mut rem = data;
    let mut i = 0;
    while i < 10 {
        rem = (rem << 1) ^ ((rem >> 9) * 0x537);
        i += 1;
    }
    (data << 10 | rem) ^ 0x5412
}

/// 18 bit version information drawn from version 7 on, BCH(18,6).
pub const fn version_information(version: u8) -> u32 {
    let data = version as u32;
    let mut rem = data;
    let mut i = 0;
    while i < 12 {
        rem = (rem << 1) ^ ((rem >> 11) * 0x1f25);
        i += 1;
    }
    data << 12 | rem
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_capacities() {
        assert_eq!(data_codewords(1, EcLevel::Low), 19);
        assert_eq!(data_codewords(1, EcLevel::High), 9);
        assert_eq!(data_codewords(10, EcLevel::Medium), 216);
        assert_eq!(data_codewords(40, EcLevel::Low), 2956);
        assert_eq!(data_codewords(40, EcLevel::High), 1276);
        assert_eq!(raw_data_modules(1), 208);
        assert_eq!(raw_data_modules(7), 1568);
    }

    #[test]
    fn test_alignment_positions() {
        assert!(alignment_positions(1).is_empty());
        assert_eq!(alignment_positions(2), vec![6, 18]);
        assert_eq!(alignment_positions(7), vec![6, 22, 38]);
        assert_eq!(alignment_positions(32), vec![6, 34, 60, 86, 112, 138]);
        assert_eq!(alignment_positions(40), vec![6, 30, 58, 86, 114, 142, 170]);
    }

    #[test]
    fn test_format_information() {
        assert_eq!(format_information(EcLevel::Low, 0), 0b111011111000100);
        assert_eq!(format_information(EcLevel::Medium, 0), 0b101010000010010);
        assert_eq!(format_information(EcLevel::High, 7), 0b000100000111011);
    }

    #[test]
    fn test_version_information() {
        assert_eq!(version_information(7), 0x07c94);
        assert_eq!(version_information(40), 0x28c69);
    }
}
