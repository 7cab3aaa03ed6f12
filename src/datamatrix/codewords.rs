//! Turns a planned message into data codewords.

use super::optimizer::Mode;
use crate::error::{EncodeError, Result};
use crate::gs1::GS;

pub const FNC1: u8 = 232;
pub const UPPER_SHIFT: u8 = 235;
pub const UNLATCH: u8 = 254;
pub const PAD: u8 = 129;

const EDIFACT_UNLATCH: u8 = 31;

/// Values of `c` in the C40 (or Text) character sets, prefixed by the
/// shift value when needed.
pub fn c40_values(c: u8, text: bool, gs1: bool, out: &mut Vec<u8>) {
    if c > 127 {
        out.extend_from_slice(&[1, 30]);
        return c40_values(c - 128, text, gs1, out);
    }
    let (upper, lower) = if text { (b'a', b'A') } else { (b'A', b'a') };
    match c {
        GS if gs1 => out.extend_from_slice(&[1, 27]),
        b' ' => out.push(3),
        b'0'..=b'9' => out.push(c - b'0' + 4),
        _ if (upper..=upper + 25).contains(&c) => out.push(c - upper + 14),
        0..=31 => out.extend_from_slice(&[0, c]),
        b'!'..=b'/' => out.extend_from_slice(&[1, c - b'!']),
        b':'..=b'@' => out.extend_from_slice(&[1, c - b':' + 15]),
        b'['..=b'_' => out.extend_from_slice(&[1, c - b'[' + 22]),
        _ if (lower..=lower + 25).contains(&c) => out.extend_from_slice(&[2, c - lower + 1]),
        // `{` to DEL follow the lowercase letters, '`' is 0
        _ => out.extend_from_slice(&[2, c - b'`']),
    }
}

/// Number of C40 (or Text) values `c` takes.
pub fn c40_len(c: u8, text: bool, gs1: bool) -> u32 {
    if c > 127 {
        return 2 + c40_len(c - 128, text, gs1);
    }
    let basic = c == b' ' || c.is_ascii_digit()
        || if text { c.is_ascii_lowercase() } else { c.is_ascii_uppercase() };
    if basic { 1 } else { 2 }
}

pub fn x12_value(c: u8) -> Option<u8> {
    match c {
        b'\r' => Some(0),
        b'*' => Some(1),
        b'>' => Some(2),
        b' ' => Some(3),
        b'0'..=b'9' => Some(c - b'0' + 4),
        b'A'..=b'Z' => Some(c - b'A' + 14),
        _ => None,
    }
}

#[inline]
pub fn is_edifact(c: u8) -> bool {
    (32..=94).contains(&c)
}

/// Checks that a forced mode can represent every byte of `data`.
pub fn validate(data: &[u8], mode: Mode) -> Result<()> {
    let ok: fn(u8) -> bool = match mode {
        Mode::X12 => |c| x12_value(c).is_some(),
        Mode::Edifact => is_edifact,
        _ => return Ok(()),
    };
    match data.iter().find(|&&c| !ok(c)) {
        None => Ok(()),
        Some(c) if mode == Mode::Edifact && c.is_ascii_lowercase() => Err(EncodeError::InvalidCharacter(
            "Cannot encode lowercase ASCII characters with Edifact".into())),
        Some(c) => Err(EncodeError::InvalidCharacter(format!("Cannot encode character {c:#04x} with {mode:?}"))),
    }
}

/// 255-state randomising of Base256 bytes, `pos` is the 1-based position
/// of the codeword in the symbol.
fn randomize_255(value: u8, pos: usize) -> u8 {
    let pseudo = (149 * pos) % 255 + 1;
    let v = value as usize + pseudo;
    (if v > 255 { v - 256 } else { v }) as u8
}

/// 253-state randomising of the pad codewords following the first one.
fn randomize_253(pos: usize) -> u8 {
    let pseudo = (149 * pos) % 253 + 1;
    let v = PAD as usize + pseudo;
    (if v > 254 { v - 254 } else { v }) as u8
}

/// Data codewords of a message before padding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Encoded {
    pub codewords: Vec<u8>,
    /// The last codeword is an unlatch that may be left out when the
    /// codewords fill the symbol without it.
    pub trailing_unlatch: bool,
    /// Set when the message ends in Edifact: the characters after the last
    /// full group, not yet part of `codewords`.
    pub edifact_rest: Option<Vec<u8>>,
    /// Start of the unlatch group of every Edifact run followed by more
    /// data. Readers leave Edifact on their own when two codewords or less
    /// remain there, so the symbol needs three.
    pub edifact_unlatches: Vec<usize>,
}

impl Encoded {
    /// Whether the message fits `capacity` data codewords.
    pub fn fits(&self, capacity: usize) -> bool {
        self.layout(capacity).is_some()
    }

    /// Returns exactly `capacity` codewords, dropping a trailing unlatch
    /// or appending pad codewords. Callers check [Encoded::fits] first.
    pub fn into_data(self, capacity: usize) -> Vec<u8> {
        let mut codewords = self.layout(capacity).unwrap_or(self.codewords);
        debug_assert!(codewords.len() <= capacity);
        if codewords.len() < capacity {
            codewords.push(PAD);
        }
        while codewords.len() < capacity {
            let pos = codewords.len() + 1;
            codewords.push(randomize_253(pos));
        }
        codewords
    }

    /// The unpadded codewords for a symbol of `capacity` data codewords.
    fn layout(&self, capacity: usize) -> Option<Vec<u8>> {
        if self.edifact_unlatches.iter().any(|&at| capacity < at + 3) {
            return None;
        }
        let len = self.codewords.len();
        if len > capacity {
            return (self.trailing_unlatch && len == capacity + 1).then(|| self.codewords[..capacity].to_vec());
        }

        let mut codewords = self.codewords.clone();
        if let Some(rest) = &self.edifact_rest {
            if capacity - len <= 2 {
                // Read as ASCII without an unlatch
                let mut ascii = Encoder::new(rest, false);
                ascii.encode_ascii(rest.len());
                if ascii.codewords.len() > capacity - len {
                    return None;
                }
                codewords.extend(ascii.codewords);
            } else {
                let values = rest.iter().map(|&c| c & 0x3f).chain(core::iter::once(EDIFACT_UNLATCH));
                pack_edifact(values, &mut codewords);
            }
        }
        Some(codewords)
    }
}

/// Packs 6-bit values into codewords, the last one completed with zero
/// bits.
fn pack_edifact(values: impl Iterator<Item = u8>, out: &mut Vec<u8>) {
    let (mut acc, mut bits) = (0u32, 0u32);
    for v in values {
        acc = (acc << 6) | v as u32;
        bits += 6;
        while bits >= 8 {
            bits -= 8;
            out.push((acc >> bits) as u8);
        }
        acc &= (1 << bits) - 1;
    }
    if bits > 0 {
        out.push((acc << (8 - bits)) as u8);
    }
}

/// Encoder state threaded through the per mode producers.
pub struct Encoder<'a> {
    data: &'a [u8],
    gs1: bool,
    mode: Mode,
    data_index: usize,
    codewords: Vec<u8>,
    edifact_rest: Option<Vec<u8>>,
    edifact_unlatches: Vec<usize>,
}

impl<'a> Encoder<'a> {
    pub fn new(data: &'a [u8], gs1: bool) -> Self {
        let mut codewords = Vec::with_capacity(data.len() + 2);
        if gs1 {
            codewords.push(FNC1);
        }
        Self {
            data,
            gs1,
            mode: Mode::Ascii,
            data_index: 0,
            codewords,
            edifact_rest: None,
            edifact_unlatches: Vec::new(),
        }
    }

    /// Produces the codewords for `plan` (one mode per byte, as returned by
    /// the optimizer).
    pub fn encode(mut self, plan: &[Mode]) -> Encoded {
        let n = self.data.len();
        let mut trailing_unlatch = false;
        while self.data_index < n {
            let mode = plan[self.data_index];
            let end = plan[self.data_index..n].iter()
                .position(|&m| m != mode)
                .map_or(n, |p| self.data_index + p);

            if mode != self.mode {
                if let Some(latch) = mode.latch() {
                    self.codewords.push(latch);
                }
                self.mode = mode;
            }

            trailing_unlatch = match mode {
                Mode::Ascii => self.encode_ascii(end),
                Mode::C40 | Mode::Text | Mode::X12 => self.encode_triplets(end),
                Mode::Edifact => self.encode_edifact(end),
                Mode::Base256 => self.encode_base256(end),
            };
        }
        Encoded {
            codewords: self.codewords,
            trailing_unlatch,
            edifact_rest: self.edifact_rest,
            edifact_unlatches: self.edifact_unlatches,
        }
    }

    fn encode_ascii(&mut self, end: usize) -> bool {
        while self.data_index < end {
            let c = self.data[self.data_index];
            let next = self.data.get(self.data_index + 1).filter(|_| self.data_index + 1 < end);
            match next {
                Some(&d) if c.is_ascii_digit() && d.is_ascii_digit() => {
                    self.codewords.push(130 + (c - b'0') * 10 + (d - b'0'));
                    self.data_index += 2;
                    continue;
                }
                _ => {}
            }
            if self.gs1 && c == GS {
                self.codewords.push(FNC1);
            } else if c > 127 {
                self.codewords.extend_from_slice(&[UPPER_SHIFT, c - 127]);
            } else {
                self.codewords.push(c + 1);
            }
            self.data_index += 1;
        }
        false
    }

    /// C40, Text and X12 pack three values into two codewords, the run
    /// ends with an unlatch back to ASCII.
    fn encode_triplets(&mut self, end: usize) -> bool {
        let mut values = Vec::with_capacity((end - self.data_index) * 2 + 1);
        for &c in &self.data[self.data_index..end] {
            match self.mode {
                Mode::X12 => values.extend(x12_value(c)),
                mode => c40_values(c, mode == Mode::Text, self.gs1, &mut values),
            }
        }
        // Only the end of the message leaves two values, padded with a shift 1
        if values.len() % 3 == 2 {
            values.push(0);
        }
        debug_assert_eq!(values.len() % 3, 0);

        for t in values.chunks_exact(3) {
            let v = t[0] as u16 * 1600 + t[1] as u16 * 40 + t[2] as u16 + 1;
            self.codewords.extend_from_slice(&[(v >> 8) as u8, v as u8]);
        }
        self.codewords.push(UNLATCH);
        self.data_index = end;
        self.mode = Mode::Ascii;
        true
    }

    /// Four 6-bit values per three codewords. A run followed by more data
    /// is closed by the unlatch value and zero bits up to the codeword
    /// boundary. At the end of the message the characters after the last
    /// full group are kept aside, their encoding depends on the room left
    /// in the symbol.
    fn encode_edifact(&mut self, end: usize) -> bool {
        let run = &self.data[self.data_index..end];
        let (groups, rest) = run.split_at(run.len() - run.len() % 4);
        pack_edifact(groups.iter().map(|&c| c & 0x3f), &mut self.codewords);

        if end == self.data.len() {
            self.edifact_rest = Some(rest.to_vec());
        } else {
            self.edifact_unlatches.push(self.codewords.len());
            let values = rest.iter().map(|&c| c & 0x3f).chain(core::iter::once(EDIFACT_UNLATCH));
            pack_edifact(values, &mut self.codewords);
        }

        self.data_index = end;
        self.mode = Mode::Ascii;
        false
    }

    fn encode_base256(&mut self, end: usize) -> bool {
        let len = end - self.data_index;
        let header = if len <= 249 {
            [len as u8, 0]
        } else {
            [(len / 250 + 249) as u8, (len % 250) as u8]
        };
        let header = &header[..if len <= 249 { 1 } else { 2 }];

        for &b in header.iter().chain(&self.data[self.data_index..end]) {
            let pos = self.codewords.len() + 1;
            self.codewords.push(randomize_255(b, pos));
        }
        self.data_index = end;
        // The length prefix ends the run, nothing to unlatch
        self.mode = Mode::Ascii;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::{c40_len, c40_values, validate, Encoded, Encoder};
    use crate::datamatrix::optimizer::{plan, Mode};
    use crate::error::EncodeError;
    use pretty_assertions::assert_eq;

    fn encode(data: &[u8], gs1: bool) -> Encoded {
        let plan = plan(data, gs1, None).unwrap();
        Encoder::new(data, gs1).encode(&plan)
    }

    #[test]
    fn test_c40_values() {
        let mut out = Vec::new();
        for &c in b"A a*\x05~" {
            c40_values(c, false, false, &mut out);
        }
        assert_eq!(out, vec![14, 3, 2, 1, 1, 9, 0, 5, 2, 30]);

        out.clear();
        for &c in b"aA\xc1" {
            c40_values(c, true, false, &mut out);
        }
        assert_eq!(out, vec![14, 2, 1, 1, 30, 2, 1]);
        assert_eq!(c40_len(0xc1, true, false), 4);
        assert_eq!(c40_len(0xc1, false, false), 3);
    }

    #[test]
    fn test_ascii_digit_pairs() {
        assert_eq!(encode(b"123456", false).codewords, vec![142, 164, 186]);
        assert_eq!(encode(b"12a", false).codewords, vec![142, 98]);
    }

    #[test]
    fn test_ascii_upper_shift() {
        let data = [b'a', 0xe9, b'b'];
        let plan = vec![Mode::Ascii; 4];
        assert_eq!(Encoder::new(&data, false).encode(&plan).codewords, vec![98, 235, 106, 99]);
    }

    #[test]
    fn test_c40_run() {
        let out = encode(b"ABCDEFGHIJKLMNOP", false);
        assert_eq!(out.codewords, vec![66, 230, 96, 82, 115, 141, 134, 200, 154, 3, 173, 62, 254]);
        assert!(out.trailing_unlatch);
    }

    #[test]
    fn test_x12_run() {
        let out = encode(b"*>ABC012*>ABC012*>", false);
        assert_eq!(out.codewords, vec![238, 6, 159, 96, 69, 32, 50, 14, 192, 100, 166, 37, 171, 254]);
    }

    #[test]
    fn test_edifact_run() {
        let data = b"ABCDEx";
        let plan = [Mode::Edifact, Mode::Edifact, Mode::Edifact, Mode::Edifact, Mode::Edifact, Mode::Ascii, Mode::Ascii];
        let out = Encoder::new(data, false).encode(&plan);
        // A B C D in three codewords, then E and the unlatch, then x
        assert_eq!(out.codewords, vec![240, 4, 32, 196, 21, 240, 121]);
        assert_eq!(out.edifact_unlatches, vec![4]);
        assert_eq!(out.edifact_rest, None);
    }

    #[test]
    fn test_edifact_unlatch_needs_room() {
        let plan = [Mode::Edifact, Mode::Edifact, Mode::Edifact, Mode::Edifact, Mode::Ascii, Mode::Ascii];
        let out = Encoder::new(b"ABCDx", false).encode(&plan);
        assert_eq!(out.codewords, vec![240, 4, 32, 196, 124, 121]);
        // two codewords after the last group would be read as ASCII
        assert!(!out.fits(6));
        assert!(out.fits(8));
        assert_eq!(out.into_data(8), vec![240, 4, 32, 196, 124, 121, 129, 56]);
    }

    #[test]
    fn test_edifact_end_of_message() {
        let out = Encoder::new(b"ABCD", false).encode(&[Mode::Edifact; 5]);
        assert_eq!(out.codewords, vec![240, 4, 32, 196]);
        assert_eq!(out.edifact_rest, Some(vec![]));
        assert!(!out.fits(3));
        // one codeword left: no unlatch, ASCII padding
        assert_eq!(out.clone().into_data(5), vec![240, 4, 32, 196, 129]);
        // three or more left: explicit unlatch
        assert_eq!(out.into_data(8)[..6], [240, 4, 32, 196, 124, 129]);

        let out = Encoder::new(b"ABCDE", false).encode(&[Mode::Edifact; 6]);
        assert_eq!(out.edifact_rest, Some(vec![b'E']));
        // E as ASCII when the symbol ends right after it
        assert_eq!(out.clone().into_data(5), vec![240, 4, 32, 196, 70]);
        assert_eq!(out.into_data(8), vec![240, 4, 32, 196, 21, 240, 129, 56]);

        let out = Encoder::new(b"A", false).encode(&[Mode::Edifact; 2]);
        assert_eq!(out.into_data(3), vec![240, 66, 129]);

        // three characters never fit two ASCII codewords
        let out = Encoder::new(b"ABC", false).encode(&[Mode::Edifact; 4]);
        assert!(!out.fits(3));
        assert!(out.fits(5));
    }

    #[test]
    fn test_base256_run() {
        let data = [0x80u8, 0x81, 0x82, 0x83, 0x84];
        let out = encode(&data, false);
        assert_eq!(out.codewords, vec![231, 49, 65, 216, 110, 5, 156]);
    }

    #[test]
    fn test_gs1_separators() {
        let out = encode(b"10AB\x1d21X", true);
        assert_eq!(out.codewords, vec![232, 140, 66, 67, 232, 151, 89]);
    }

    #[test]
    fn test_padding() {
        let out = Encoded { codewords: vec![142, 164], ..Default::default() };
        assert_eq!(out.into_data(5), vec![142, 164, 129, 220, 115]);

        let out = Encoded { codewords: vec![230, 1, 2, 254], trailing_unlatch: true, ..Default::default() };
        assert!(out.fits(3));
        assert!(!out.fits(2));
        assert_eq!(out.into_data(3), vec![230, 1, 2]);
    }

    #[test]
    fn test_validate() {
        assert_eq!(validate(b"abc", Mode::Edifact), Err(EncodeError::InvalidCharacter(
            "Cannot encode lowercase ASCII characters with Edifact".into())));
        assert!(validate(b"AB\n", Mode::Edifact).is_err());
        assert!(validate(b"ab", Mode::X12).is_err());
        assert!(validate(b"AB *>\r", Mode::X12).is_ok());
        assert!(validate(b"ab\x80", Mode::C40).is_ok());
    }
}
