//! Message text to 6 bit codewords through code sets A to E.
//!
//! Sets A and B hold ASCII, C and D the accented Latin-1 letters and E the
//! control characters. The encoder starts in set A and moves between sets
//! with shifts (one to three characters), latches or lock-ins (two shifts
//! in a row), whichever the following run of characters makes cheapest.
//! Nine digits in a row collapse into a numeric shift and a 30 bit value.

use log::trace;

use super::tables::CHARACTERS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CodeSet {
    A,
    B,
    C,
    D,
    E,
}

impl CodeSet {
    /// Shift into C, D or E from any other set, twice for a lock-in.
    const fn shift(self) -> u8 {
        match self {
            CodeSet::C => 60,
            CodeSet::D => 61,
            _ => 62,
        }
    }
}

/// Numeric shift, followed by five codewords holding nine digits.
pub const NUMERIC_SHIFT: u8 = 31;
/// Padding in sets A and B.
pub const PAD: u8 = 33;
/// Latch A from C, D or E.
const LATCH_A: u8 = 58;
/// Latch B from A, C, D or E; latch A from B.
const LATCH: u8 = 63;
/// Shift B from A; shift A from B.
const SHIFT: u8 = 59;
const TWO_SHIFT_A: u8 = 56;
const THREE_SHIFT_A: u8 = 57;
/// Space in C, D and E.
const SPACE_CDE: u8 = 59;

/// Character present in more than one set.
#[inline]
const fn is_shared(c: u8) -> bool {
    matches!(c, b'\r' | 0x1c..=0x1e | b' ' | b',' | b'.' | b'/' | b':')
}

#[inline]
fn unique_set(c: u8) -> Option<CodeSet> {
    (!is_shared(c)).then_some(CHARACTERS[c as usize].0)
}

/// Picks a set for every character, shared characters following their
/// neighbours so no switch is spent on them.
fn assign(data: &[u8]) -> Vec<(CodeSet, u8)> {
    use CodeSet::*;

    let mut chars = Vec::with_capacity(data.len());
    let mut prev = A;
    for (i, &c) in data.iter().enumerate() {
        let next = data.get(i + 1).and_then(|&n| unique_set(n));
        let (set, value) = if !is_shared(c) {
            CHARACTERS[c as usize]
        } else {
            match c {
                b'\r' if prev == E || next == Some(E) => (E, 13),
                b'\r' => (A, 0),
                0x1c..=0x1e if prev == E => (E, c + 4),
                0x1c..=0x1e => (prev, c),
                b' ' => match (prev, next) {
                    (A, _) => (A, 32),
                    (B, _) => (B, 47),
                    (_, Some(A)) => (A, 32),
                    (_, Some(B)) => (B, 47),
                    _ => (prev, SPACE_CDE),
                },
                b',' | b'.' | b'/' | b':' if prev == B => (B, match c {
                    b',' => 48,
                    b'.' => 49,
                    b'/' => 50,
                    _ => 51,
                }),
                _ => (A, c),
            }
        };
        chars.push((set, value));
        prev = set;
    }
    chars
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Char(CodeSet, u8),
    /// Nine digits
    Digits(u32),
}

fn units(data: &[u8]) -> Vec<Unit> {
    let chars = assign(data);
    let mut units = Vec::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        let digits = data.get(i..i + 9).filter(|run| run.iter().all(u8::is_ascii_digit));
        match digits {
            Some(run) => {
                let value = run.iter().fold(0, |acc, &d| acc * 10 + (d - b'0') as u32);
                units.push(Unit::Digits(value));
                i += 9;
            },
            None => {
                let (set, value) = chars[i];
                units.push(Unit::Char(set, value));
                i += 1;
            },
        }
    }
    units
}

/// Codewords of a message and the set the encoder ends in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub codewords: Vec<u8>,
    pub set: CodeSet,
}

impl Encoded {
    /// Pads to `capacity` codewords, latching back to set A first when the
    /// message ends in C, D or E.
    pub fn into_padded(mut self, capacity: usize) -> Vec<u8> {
        debug_assert!(self.codewords.len() <= capacity);
        if self.codewords.len() < capacity && !matches!(self.set, CodeSet::A | CodeSet::B) {
            self.codewords.push(LATCH_A);
        }
        self.codewords.resize(capacity, PAD);
        self.codewords
    }
}

/// Encodes `data` starting in code set A.
pub fn encode(data: &[u8]) -> Encoded {
    let units = units(data);
    let run = |from: usize, set: CodeSet| units[from..].iter()
        .take_while(|u| matches!(u, Unit::Char(s, _) if *s == set))
        .count();

    let mut codewords = Vec::with_capacity(data.len() + data.len() / 4);
    let mut current = CodeSet::A;
    let mut i = 0;
    while i < units.len() {
        let (set, value) = match units[i] {
            Unit::Digits(value) => {
                codewords.push(NUMERIC_SHIFT);
                codewords.extend((0..5).rev().map(|k| ((value >> (6 * k)) & 0x3f) as u8));
                i += 1;
                continue;
            },
            Unit::Char(set, value) => (set, value),
        };

        if set != current {
            let n = run(i, set);
            match (set, current) {
                (CodeSet::A, CodeSet::B) if n < 4 => {
                    // Up to three characters borrowed from A
                    let shift = [SHIFT, TWO_SHIFT_A, THREE_SHIFT_A][n - 1];
                    codewords.push(shift);
                    codewords.extend(units[i..i + n].iter().filter_map(|u| match *u {
                        Unit::Char(_, v) => Some(v),
                        Unit::Digits(_) => None,
                    }));
                    i += n;
                    continue;
                },
                (CodeSet::A, CodeSet::B) => {
                    codewords.push(LATCH);
                    current = CodeSet::A;
                },
                (CodeSet::A, _) => {
                    codewords.push(LATCH_A);
                    current = CodeSet::A;
                },
                (CodeSet::B, CodeSet::A) if n < 2 => codewords.push(SHIFT),
                (CodeSet::B, _) => {
                    codewords.push(LATCH);
                    current = CodeSet::B;
                },
                (_, _) if n >= 4 => {
                    codewords.extend([set.shift(); 2]);
                    current = set;
                },
                (_, _) => codewords.push(set.shift()),
            }
        }
        codewords.push(value);
        i += 1;
    }

    trace!("maxicode: {} bytes into {} codewords, ending in set {current:?}", data.len(), codewords.len());
    Encoded { codewords, set: current }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cws(data: &[u8]) -> Vec<u8> {
        encode(data).codewords
    }

    #[test]
    fn test_latch_and_shift_b() {
        assert_eq!(cws(b"Hello"), vec![8, 63, 5, 12, 12, 15]);
        assert_eq!(cws(b"a1"), vec![59, 1, 49]);
        assert_eq!(cws(b"aBCDE"), vec![59, 1, 2, 3, 4, 5]);
        assert_eq!(encode(b"Hello").set, CodeSet::B);
    }

    #[test]
    fn test_shift_a_from_b() {
        // 'M' latch B "axi", then one, two or four A characters
        assert_eq!(cws(b"Maxi Code"), vec![13, 63, 1, 24, 9, 47, 59, 3, 15, 4, 5]);
        assert_eq!(cws(b"abCD"), vec![63, 1, 2, 56, 3, 4]);
        assert_eq!(cws(b"abCDEF"), vec![63, 1, 2, 63, 3, 4, 5, 6]);
    }

    #[test]
    fn test_numeric_shift() {
        assert_eq!(cws(b"123456789"), vec![31, 7, 22, 60, 52, 21]);
        assert_eq!(cws(b"x123456789"), vec![59, 24, 31, 7, 22, 60, 52, 21]);
        assert_eq!(cws(b"12345678"), vec![49, 50, 51, 52, 53, 54, 55, 56]);
        assert_eq!(cws(&[b'1'; 200]).len(), 22 * 6 + 2);
    }

    #[test]
    fn test_shared_characters() {
        assert_eq!(cws(b"A\rB"), vec![1, 0, 2]);
        assert_eq!(cws(b"A\x1dB"), vec![1, 29, 2]);
        assert_eq!(cws(b"ab,cd"), vec![63, 1, 2, 48, 3, 4]);
        assert_eq!(cws(b"Ab c"), vec![1, 63, 2, 47, 3]);
        assert_eq!(cws(b"HELLO, WORLD!"), vec![8, 5, 12, 12, 15, 44, 32, 23, 15, 18, 12, 4, 59, 53]);
    }

    #[test]
    fn test_extended_sets() {
        assert_eq!(cws(b"\xe9t\xe9"), vec![61, 9, 59, 20, 61, 9]);
        assert_eq!(cws(b"\xe9 \xe9"), vec![61, 9, 61, 59, 61, 9]);
        assert_eq!(cws(b"\x01\x02"), vec![62, 1, 62, 2]);

        let locked = encode(b"\xe9\xe9\xe9\xe9");
        assert_eq!(locked.codewords, vec![61, 61, 9, 9, 9, 9]);
        assert_eq!(locked.set, CodeSet::D);
        assert_eq!(locked.into_padded(10), vec![61, 61, 9, 9, 9, 9, 58, 33, 33, 33]);
    }

    #[test]
    fn test_padding() {
        assert_eq!(encode(b"AB").into_padded(5), vec![1, 2, 33, 33, 33]);
        assert_eq!(encode(b"\xe9\xe9\xe9\xe9").into_padded(6), vec![61, 61, 9, 9, 9, 9]);
    }
}
