//! Splitting a message into numeric, alphanumeric and byte segments.
//!
//! Segment boundaries come from a dynamic programme over the bit cost of
//! every character in every mode (in sixths of a bit, alphanumeric costs
//! 5.5 bits and numeric 3.33), where starting a new segment costs its mode
//! indicator and character count.

use log::trace;

use crate::gs1::GS;

pub const ALPHANUMERIC_CHARSET: &[u8; 45] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentMode {
    Numeric,
    Alphanumeric,
    Byte,
}

impl SegmentMode {
    /// Order used by the optimiser, byte first so it wins ties.
    const ALL: [SegmentMode; 3] = [SegmentMode::Byte, SegmentMode::Alphanumeric, SegmentMode::Numeric];

    pub const fn indicator(self) -> u32 {
        match self {
            SegmentMode::Numeric => 0b0001,
            SegmentMode::Alphanumeric => 0b0010,
            SegmentMode::Byte => 0b0100,
        }
    }

    /// Width of the character count field.
    pub const fn count_bits(self, version: u8) -> usize {
        let range = match version {
            0..=9 => 0,
            10..=26 => 1,
            _ => 2,
        };
        match self {
            SegmentMode::Numeric => [10, 12, 14][range],
            SegmentMode::Alphanumeric => [9, 11, 13][range],
            SegmentMode::Byte => [8, 16, 16][range],
        }
    }

    /// Cost of one character in sixths of a bit.
    const fn char_cost(self) -> usize {
        match self {
            SegmentMode::Numeric => 20,
            SegmentMode::Alphanumeric => 33,
            SegmentMode::Byte => 48,
        }
    }

    fn accepts(self, c: u8, gs1: bool) -> bool {
        match self {
            SegmentMode::Numeric => c.is_ascii_digit(),
            // A separator is written as '%', so a literal '%' needs bytes
            SegmentMode::Alphanumeric if gs1 => c == GS || (c != b'%' && ALPHANUMERIC_CHARSET.contains(&c)),
            SegmentMode::Alphanumeric => ALPHANUMERIC_CHARSET.contains(&c),
            SegmentMode::Byte => true,
        }
    }
}

/// Value of `c` in the alphanumeric charset.
pub fn alphanumeric_value(c: u8, gs1: bool) -> Option<u16> {
    let c = if gs1 && c == GS { b'%' } else { c };
    ALPHANUMERIC_CHARSET.iter().position(|&a| a == c).map(|p| p as u16)
}

/// A run of characters sharing one mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub mode: SegmentMode,
    pub data: &'a [u8],
}

impl Segment<'_> {
    /// Number of payload bits, header excluded.
    pub fn payload_bits(&self) -> usize {
        let n = self.data.len();
        match self.mode {
            SegmentMode::Numeric => n / 3 * 10 + [0, 4, 7][n % 3],
            SegmentMode::Alphanumeric => n / 2 * 11 + (n % 2) * 6,
            SegmentMode::Byte => n * 8,
        }
    }
}

/// Total bits of `segments` for `version`, or None when a count does not
/// fit its field.
pub fn total_bits(segments: &[Segment], version: u8, gs1: bool) -> Option<usize> {
    let mut total = if gs1 { 4 } else { 0 };
    for seg in segments {
        let count_bits = seg.mode.count_bits(version);
        if seg.data.len() >= 1 << count_bits {
            return None;
        }
        total += 4 + count_bits + seg.payload_bits();
    }
    Some(total)
}

/// Cheapest segmentation of `data` for the count field widths of `version`.
pub fn segment(data: &[u8], version: u8, gs1: bool) -> Vec<Segment<'_>> {
    if data.is_empty() {
        return Vec::new();
    }
    let modes = SegmentMode::ALL;
    let head: Vec<usize> = modes.iter().map(|m| (4 + m.count_bits(version)) * 6).collect();

    let mut costs = [head[0], head[1], head[2]];
    // For every character and mode, the mode of the previous character
    let mut previous: Vec<[Option<SegmentMode>; 3]> = Vec::with_capacity(data.len());
    for &c in data {
        let mut current = [usize::MAX; 3];
        let mut from = [None; 3];
        for (j, mode) in modes.iter().enumerate() {
            if mode.accepts(c, gs1) && costs[j] != usize::MAX {
                current[j] = costs[j] + mode.char_cost();
                from[j] = Some(*mode);
            }
        }
        // Ending the segment here and opening another one
        let ended = current;
        for j in 0..3 {
            for k in 0..3 {
                if from[k].is_none() || ended[k] == usize::MAX {
                    continue;
                }
                let cost = ended[k].div_ceil(6) * 6 + head[j];
                if current[j] == usize::MAX || cost < current[j] {
                    current[j] = cost;
                    from[j] = Some(modes[k]);
                }
            }
        }
        previous.push(from);
        costs = current;
    }

    let mut best = 0;
    for j in 1..3 {
        if costs[j] < costs[best] {
            best = j;
        }
    }

    let mut char_modes = vec![SegmentMode::Byte; data.len()];
    let mut mode = modes[best];
    for i in (0..data.len()).rev() {
        let j = modes.iter().position(|&m| m == mode).unwrap_or(0);
        mode = previous[i][j].unwrap_or(SegmentMode::Byte);
        char_modes[i] = mode;
    }

    let mut segments: Vec<Segment> = Vec::new();
    let mut start = 0;
    for i in 1..=data.len() {
        if i == data.len() || char_modes[i] != char_modes[start] {
            segments.push(Segment { mode: char_modes[start], data: &data[start..i] });
            start = i;
        }
    }

    trace!("qr segments for version {version}: {:?}", segments.iter().map(|s| (s.mode, s.data.len())).collect::<Vec<_>>());
    segments
}

#[cfg(test)]
mod tests {
    use super::{alphanumeric_value, segment, total_bits, SegmentMode::*};
    use pretty_assertions::assert_eq;

    fn modes(data: &[u8], gs1: bool) -> Vec<(super::SegmentMode, usize)> {
        segment(data, 1, gs1).iter().map(|s| (s.mode, s.data.len())).collect()
    }

    #[test]
    fn test_single_modes() {
        assert_eq!(modes(b"12345", false), vec![(Numeric, 5)]);
        assert_eq!(modes(b"HELLO WORLD", false), vec![(Alphanumeric, 11)]);
        assert_eq!(modes(b"hello", false), vec![(Byte, 5)]);
    }

    #[test]
    fn test_mixed() {
        assert_eq!(modes(b"abc0123456789012", false), vec![(Byte, 3), (Numeric, 13)]);
        assert_eq!(modes(b"a1", false), vec![(Byte, 2)]);
    }

    #[test]
    fn test_gs1_separator() {
        assert_eq!(alphanumeric_value(0x1d, true), Some(38));
        assert_eq!(alphanumeric_value(0x1d, false), None);
        assert_eq!(modes(b"10ABC\x1d21X", true), vec![(Alphanumeric, 9)]);
        assert_eq!(modes(b"10%", true), vec![(Byte, 3)]);
    }

    #[test]
    fn test_total_bits() {
        let segs = segment(b"12345", 1, false);
        assert_eq!(total_bits(&segs, 1, false), Some(4 + 10 + 17));
        assert_eq!(total_bits(&segs, 1, true), Some(4 + 4 + 10 + 17));

        let long = vec![b'a'; 256];
        let segs = segment(&long, 1, false);
        assert_eq!(total_bits(&segs, 1, false), None);
        assert_eq!(total_bits(&segs, 10, false), Some(4 + 16 + 256 * 8));
    }
}
