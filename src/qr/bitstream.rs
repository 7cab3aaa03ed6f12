//! Bit stream assembly: segment headers and payloads, terminator, padding
//! and the interleaved error correction blocks.

use super::segment::{alphanumeric_value, Segment, SegmentMode};
use super::version::{ecc_per_block, num_blocks, raw_data_modules, EcLevel};
use crate::ecc::ReedSolomon;
use crate::error::Result;

/// FNC1 in first position, marks a GS1 message.
const FNC1_FIRST: u32 = 0b0101;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitBuffer {
    bits: Vec<bool>,
}

impl BitBuffer {
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Appends the `len` low bits of `value`, most significant first.
    pub fn append_bits(&mut self, value: u32, len: usize) {
        debug_assert!(len <= 31 && value >> len == 0);
        self.bits.extend((0..len).rev().map(|i| (value >> i) & 1 != 0));
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Packs the bits into bytes, the last one zero filled.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bits.chunks(8)
            .map(|chunk| chunk.iter().enumerate().fold(0u8, |acc, (i, &b)| acc | (b as u8) << (7 - i)))
            .collect()
    }
}

/// Writes the segments (and the GS1 indicator) for `version`.
pub fn encode_segments(segments: &[Segment], version: u8, gs1: bool) -> BitBuffer {
    let mut bb = BitBuffer::default();
    if gs1 {
        bb.append_bits(FNC1_FIRST, 4);
    }
    for seg in segments {
        bb.append_bits(seg.mode.indicator(), 4);
        bb.append_bits(seg.data.len() as u32, seg.mode.count_bits(version));
        match seg.mode {
            SegmentMode::Numeric => {
                for group in seg.data.chunks(3) {
                    let value = group.iter().fold(0, |acc, &d| acc * 10 + (d - b'0') as u32);
                    bb.append_bits(value, group.len() * 3 + 1);
                }
            },
            SegmentMode::Alphanumeric => {
                for pair in seg.data.chunks(2) {
                    let values: Vec<u32> = pair.iter()
                        .map(|&c| alphanumeric_value(c, gs1).unwrap_or(0) as u32)
                        .collect();
                    match values[..] {
                        [a, b] => bb.append_bits(a * 45 + b, 11),
                        [a] => bb.append_bits(a, 6),
                        _ => {},
                    }
                }
            },
            SegmentMode::Byte => {
                for &b in seg.data {
                    bb.append_bits(b as u32, 8);
                }
            },
        }
    }
    bb
}

/// Terminates and pads `bb` to exactly `capacity` data codewords.
pub fn data_codewords(mut bb: BitBuffer, capacity: usize) -> Vec<u8> {
    let capacity_bits = capacity * 8;
    debug_assert!(bb.len() <= capacity_bits);
    bb.append_bits(0, (capacity_bits - bb.len()).min(4));
    bb.append_bits(0, (8 - bb.len() % 8) % 8);

    let mut codewords = bb.to_bytes();
    for pad in [0xec, 0x11].into_iter().cycle() {
        if codewords.len() >= capacity {
            break;
        }
        codewords.push(pad);
    }
    codewords
}

/// Splits the data codewords into blocks, computes their error correction
/// and interleaves everything into the final sequence.
pub fn interleave(data: &[u8], version: u8, level: EcLevel) -> Result<Vec<u8>> {
    let blocks = num_blocks(version, level);
    let ecc_len = ecc_per_block(version, level);
    let raw_codewords = raw_data_modules(version) / 8;
    let short_blocks = blocks - raw_codewords % blocks;
    let short_len = raw_codewords / blocks - ecc_len;
    let rs = ReedSolomon::qr(ecc_len)?;

    let mut split = Vec::with_capacity(blocks);
    let mut rest = data;
    for i in 0..blocks {
        let len = short_len + usize::from(i >= short_blocks);
        let (block, tail) = rest.split_at(len);
        split.push((block, rs.encode(block)));
        rest = tail;
    }
    debug_assert!(rest.is_empty());

    let mut result = Vec::with_capacity(raw_codewords);
    for i in 0..=short_len {
        result.extend(split.iter().filter_map(|(block, _)| block.get(i)));
    }
    for i in 0..ecc_len {
        result.extend(split.iter().map(|(_, ecc)| ecc[i]));
    }
    debug_assert_eq!(result.len(), raw_codewords);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qr::segment::segment;
    use pretty_assertions::assert_eq;

    fn bit_string(bb: &BitBuffer) -> String {
        bb.bits().iter().map(|&b| if b { '1' } else { '0' }).collect()
    }

    #[test]
    fn test_numeric_stream() {
        let segs = segment(b"12345", 1, false);
        let bb = encode_segments(&segs, 1, false);
        assert_eq!(bit_string(&bb), "0001".to_owned() + "0000000101" + "0001111011" + "0101101");
        assert_eq!(data_codewords(bb, 19), vec![
            16, 20, 123, 90, 0, 236, 17, 236, 17, 236, 17, 236, 17, 236, 17, 236, 17, 236, 17,
        ]);
    }

    #[test]
    fn test_alphanumeric_stream() {
        let segs = segment(b"HELLO WORLD", 1, false);
        let bb = encode_segments(&segs, 1, false);
        let data = data_codewords(bb, 13);
        assert_eq!(data, vec![32, 91, 11, 120, 209, 114, 220, 77, 67, 64, 236, 17, 236]);

        let all = interleave(&data, 1, EcLevel::Quartile).unwrap();
        assert_eq!(all[13..], [168, 72, 22, 82, 217, 54, 156, 0, 46, 15, 180, 122, 16]);
    }

    #[test]
    fn test_gs1_indicator() {
        let segs = segment(b"01", 1, true);
        let bb = encode_segments(&segs, 1, true);
        assert_eq!(bit_string(&bb), "0101".to_owned() + "0001" + "0000000010" + "0000001");
    }

    #[test]
    fn test_interleave_uneven_blocks() {
        // 5-Q has two blocks of 15 and two of 16 data codewords
        let data: Vec<u8> = (0..62).collect();
        let all = interleave(&data, 5, EcLevel::Quartile).unwrap();
        assert_eq!(all.len(), 134);
        assert_eq!(all[..8], [0, 15, 30, 46, 1, 16, 31, 47]);
        // The last data column only exists in the long blocks
        assert_eq!(all[60..62], [45, 61]);
    }
}
