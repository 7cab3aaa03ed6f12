//! Function patterns of a version, built once and shared.

use std::sync::OnceLock;

use super::version::{alignment_positions, size, version_information, MAX_VERSION};

/// Module colour bit.
pub const DARK: u8 = 1;
/// Function pattern bit, never touched by data or masks.
pub const RESERVED: u8 = 2;

/// A symbol with every function pattern drawn. Format areas are reserved
/// (light); version information is final.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    size: usize,
    modules: Vec<u8>,
}

#[allow(clippy::declare_interior_mutable_const)]
const UNINIT: OnceLock<Frame> = OnceLock::new();
static FRAMES: [OnceLock<Frame>; MAX_VERSION as usize] = [UNINIT; MAX_VERSION as usize];

impl Frame {
    /// Cached frame of `version` (1..=40).
    pub fn get(version: u8) -> &'static Frame {
        debug_assert!((1..=MAX_VERSION).contains(&version));
        FRAMES[version as usize - 1].get_or_init(|| Frame::build(version))
    }

    fn build(version: u8) -> Self {
        let size = size(version);
        let mut frame = Self { size, modules: vec![0; size * size] };

        for i in 0..size {
            frame.set_function(6, i, i % 2 == 0);
            frame.set_function(i, 6, i % 2 == 0);
        }

        for (cx, cy) in [(3, 3), (size - 4, 3), (3, size - 4)] {
            frame.finder(cx, cy);
        }

        let positions = alignment_positions(version);
        let last = positions.len().saturating_sub(1);
        for (i, &x) in positions.iter().enumerate() {
            for (j, &y) in positions.iter().enumerate() {
                // Corners taken by the finder patterns
                if (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0) {
                    continue;
                }
                frame.alignment(x, y);
            }
        }

        frame.reserve_format();
        if version >= 7 {
            frame.version_information(version);
        }
        frame
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn modules(&self) -> &[u8] {
        &self.modules
    }

    #[inline]
    pub fn is_reserved(&self, x: usize, y: usize) -> bool {
        self.modules[y * self.size + x] & RESERVED != 0
    }

    fn set_function(&mut self, x: usize, y: usize, dark: bool) {
        self.modules[y * self.size + x] = RESERVED | if dark { DARK } else { 0 };
    }

    /// Finder centred on (cx, cy) with its light separator.
    fn finder(&mut self, cx: usize, cy: usize) {
        for dy in -4isize..=4 {
            for dx in -4isize..=4 {
                let (x, y) = (cx as isize + dx, cy as isize + dy);
                if (0..self.size as isize).contains(&x) && (0..self.size as isize).contains(&y) {
                    let dist = dx.abs().max(dy.abs());
                    self.set_function(x as usize, y as usize, dist != 2 && dist != 4);
                }
            }
        }
    }

    fn alignment(&mut self, cx: usize, cy: usize) {
        for dy in -2isize..=2 {
            for dx in -2isize..=2 {
                let dist = dx.abs().max(dy.abs());
                self.set_function((cx as isize + dx) as usize, (cy as isize + dy) as usize, dist != 1);
            }
        }
    }

    /// Reserves both format copies and sets the dark module.
    fn reserve_format(&mut self) {
        for_each_format_module(self.size, |x, y, _| self.set_function(x, y, false));
        self.set_function(8, self.size - 8, true);
    }

    fn version_information(&mut self, version: u8) {
        let bits = version_information(version);
        for i in 0..18 {
            let dark = (bits >> i) & 1 != 0;
            let (a, b) = (self.size - 11 + i % 3, i / 3);
            self.set_function(a, b, dark);
            self.set_function(b, a, dark);
        }
    }
}

/// Calls `f(x, y, bit)` for every module of the two format information
/// copies, `bit` being the index into the 15 bit word.
pub fn for_each_format_module(size: usize, mut f: impl FnMut(usize, usize, usize)) {
    // Around the top left finder
    for i in 0..6 {
        f(8, i, i);
    }
    f(8, 7, 6);
    f(8, 8, 7);
    f(7, 8, 8);
    for i in 9..15 {
        f(14 - i, 8, i);
    }
    // Split between the other two finders
    for i in 0..8 {
        f(size - 1 - i, 8, i);
    }
    for i in 8..15 {
        f(8, size - 15 + i, i);
    }
}

/// Writes `codewords` into the non reserved modules of a copy of `frame`,
/// in two module wide columns zigzagging from the bottom right. Remainder
/// modules stay light.
pub fn place_codewords(frame: &Frame, codewords: &[u8]) -> Vec<u8> {
    let size = frame.size;
    let mut modules = frame.modules.clone();
    let total = codewords.len() * 8;
    let mut i = 0;

    let mut right = size as isize - 1;
    while right >= 1 {
        // Skip the vertical timing track
        if right == 6 {
            right = 5;
        }
        let upward = (right + 1) & 2 == 0;
        for vert in 0..size {
            let y = if upward { size - 1 - vert } else { vert };
            for j in 0..2 {
                let x = right as usize - j;
                if modules[y * size + x] & RESERVED == 0 && i < total {
                    let bit = (codewords[i >> 3] >> (7 - (i & 7))) & 1;
                    modules[y * size + x] = bit;
                    i += 1;
                }
            }
        }
        right -= 2;
    }
    debug_assert_eq!(i, total);
    modules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qr::version::raw_data_modules;
    use pretty_assertions::assert_eq;

    fn free_modules(frame: &Frame) -> usize {
        frame.modules().iter().filter(|&&m| m & RESERVED == 0).count()
    }

    #[test]
    fn test_free_modules_match_capacity() {
        for version in [1, 2, 6, 7, 14, 32, 40] {
            assert_eq!(free_modules(Frame::get(version)), raw_data_modules(version), "version {version}");
        }
    }

    #[test]
    fn test_frame_is_cached() {
        assert!(core::ptr::eq(Frame::get(3), Frame::get(3)));
    }

    #[test]
    fn test_finder_and_timing() {
        let frame = Frame::get(1);
        let row = |y: usize| -> String {
            (0..21).map(|x| if frame.modules()[y * 21 + x] & DARK != 0 { '1' } else { '0' }).collect()
        };
        assert_eq!(row(0), "111111100000001111111");
        assert_eq!(row(6), "111111101010101111111");
        assert_eq!(row(7), "000000000000000000000");
        assert!(frame.is_reserved(8, 13));
        assert_eq!(frame.modules()[13 * 21 + 8], RESERVED | DARK);
    }

    #[test]
    fn test_version_information_drawn() {
        let frame = Frame::get(7);
        let size = frame.size();
        // Bit 0 of 0x07c94 is 0, bit 2 is 1
        assert_eq!(frame.modules()[size - 11] & DARK, 0);
        assert_eq!(frame.modules()[size - 9] & DARK, DARK);
        assert_eq!(frame.modules()[(size - 9) * size] & DARK, DARK);
    }
}
