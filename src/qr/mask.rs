//! Data masking and mask selection.

use log::trace;

use super::frame::{for_each_format_module, DARK, RESERVED};
use super::version::{format_information, EcLevel};

/// Whether mask `mask` flips the module at column `x`, row `y`.
pub const fn flips(mask: u8, x: usize, y: usize) -> bool {
    match mask {
        0 => (x + y) % 2 == 0,
        1 => y % 2 == 0,
        2 => x % 3 == 0,
        3 => (x + y) % 3 == 0,
        4 => (x / 3 + y / 2) % 2 == 0,
        5 => x * y % 2 + x * y % 3 == 0,
        6 => (x * y % 2 + x * y % 3) % 2 == 0,
        _ => ((x + y) % 2 + x * y % 3) % 2 == 0,
    }
}

/// Applies `mask` to the data modules and writes the matching format
/// information.
pub fn apply(modules: &mut [u8], size: usize, level: EcLevel, mask: u8) {
    for y in 0..size {
        for x in 0..size {
            let m = &mut modules[y * size + x];
            if *m & RESERVED == 0 && flips(mask, x, y) {
                *m ^= DARK;
            }
        }
    }

    let format = format_information(level, mask);
    for_each_format_module(size, |x, y, bit| {
        let dark = (format >> bit) & 1 != 0;
        modules[y * size + x] = RESERVED | if dark { DARK } else { 0 };
    });
}

const N1: u32 = 3;
const N2: u32 = 3;
const N3: u32 = 40;
const N4: u32 = 10;

const FINDER_LIKE: [[bool; 11]; 2] = [
    [true, false, true, true, true, false, true, false, false, false, false],
    [false, false, false, false, true, false, true, true, true, false, true],
];

/// Penalty of one row or column: runs of five or more and finder like
/// 1:1:3:1:1 patterns next to four light modules (the quiet zone counts
/// as light).
fn line_penalty(line: &[bool]) -> u32 {
    let mut penalty = 0;
    let mut run = 1;
    for i in 1..=line.len() {
        if i < line.len() && line[i] == line[i - 1] {
            run += 1;
        } else {
            if run >= 5 {
                penalty += N1 + (run - 5);
            }
            run = 1;
        }
    }

    let quiet = [false; 4];
    let padded: Vec<bool> = quiet.iter().chain(line).chain(&quiet).copied().collect();
    let finders = padded.windows(11).filter(|w| FINDER_LIKE.iter().any(|p| p == w)).count() as u32;
    penalty + finders * N3
}

/// Total penalty score of a finished symbol.
pub fn penalty(modules: &[u8], size: usize) -> u32 {
    let dark = |x: usize, y: usize| modules[y * size + x] & DARK != 0;
    let mut total = 0;

    let mut line = Vec::with_capacity(size);
    for y in 0..size {
        line.clear();
        line.extend((0..size).map(|x| dark(x, y)));
        total += line_penalty(&line);
    }
    for x in 0..size {
        line.clear();
        line.extend((0..size).map(|y| dark(x, y)));
        total += line_penalty(&line);
    }

    for y in 0..size - 1 {
        for x in 0..size - 1 {
            let c = dark(x, y);
            if c == dark(x + 1, y) && c == dark(x, y + 1) && c == dark(x + 1, y + 1) {
                total += N2;
            }
        }
    }

    let dark_count = modules.iter().filter(|&&m| m & DARK != 0).count();
    let all = size * size;
    let deviation = (dark_count * 100).abs_diff(all * 50);
    total + N4 * (deviation / (all * 5)) as u32
}

/// Applies every mask to a copy of `modules` and keeps the one with the
/// lowest penalty, the lowest mask number on ties.
pub fn best_mask(modules: &[u8], size: usize, level: EcLevel) -> (u8, Vec<u8>) {
    let mut best: Option<(u32, u8, Vec<u8>)> = None;
    for mask in 0..8 {
        let mut candidate = modules.to_vec();
        apply(&mut candidate, size, level, mask);
        let score = penalty(&candidate, size);
        trace!("qr mask {mask}: penalty {score}");
        if best.as_ref().map_or(true, |(b, _, _)| score < *b) {
            best = Some((score, mask, candidate));
        }
    }
    match best {
        Some((_, mask, candidate)) => (mask, candidate),
        None => (0, modules.to_vec()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_mask_patterns() {
        assert!(flips(0, 0, 0));
        assert!(!flips(0, 1, 0));
        assert!(flips(1, 5, 2));
        assert!(flips(2, 3, 1));
        assert!(flips(4, 2, 1));
        assert!(!flips(4, 3, 0));
        assert!(flips(5, 0, 7));
        assert!(!flips(7, 1, 0));
    }

    #[test]
    fn test_runs() {
        assert_eq!(line_penalty(&[true; 5]), 3);
        assert_eq!(line_penalty(&[false, true, true, true, true, true, true, true, false]), 5);
        assert_eq!(line_penalty(&[true, false, true, false]), 0);
    }

    #[test]
    fn test_finder_like_pattern() {
        let line = [true, false, true, true, true, false, true];
        // Quiet zone on both sides: counted once per side
        assert_eq!(line_penalty(&line), 80);
        let line = [true, true, false, true, true, true, false, true, true];
        assert_eq!(line_penalty(&line), 0);
    }

    #[test]
    fn test_balance() {
        // Half dark checkerboard: no runs, no blocks, no imbalance
        let size = 4;
        let modules: Vec<u8> = (0..16).map(|i| ((i % 4 + i / 4) % 2) as u8).collect();
        assert_eq!(penalty(&modules, size), 0);
        // All dark 4x4: imbalance 50% and runs are shorter than five
        let modules = vec![DARK; 16];
        assert_eq!(penalty(&modules, size), 9 * 3 + 100);
    }
}
