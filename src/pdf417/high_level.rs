//! User data to high level encoding conversion functions

use crate::ecc::pdf417 as ecc;
use crate::error::{EncodeError, Result};
use crate::pdf417::tables::Variant;

use awint_core::{InlAwi, Bits};
type U160 = InlAwi<160, { Bits::unstable_raw_digits(160) }>;

/// Codeword used to latch to text mode
pub const M_LATCH_TEXT: u16 = 900;
/// Codeword used to latch to byte mode (if length is multiple of 6 use
/// M_LATCH_BYTE_M6).
pub const M_LATCH_BYTE: u16 = 901;
/// Codeword used to latch to numeric mode
pub const M_LATCH_NUMERIC: u16 = 902;

// 903 to 912: reserved for future use

/// Codeword used to switch to byte mode for next codedword (usable only if
/// the current mode is text).
pub const M_SHIFT_BYTE: u16 = 913;

// 914 to 920: reserved for future use
// 921: reader initialization
// 922 to 923: Macro PDF417

/// Codeword used to latch to byte mode when the segment length is a
/// multiple of 6.
pub const M_LATCH_BYTE_M6: u16 = 924;
/// Codeword used to specifiy a ECI (user) custom ID
pub const ECI_CUSTOM_ID: u16 = 925;
/// Codeword used to specifiy a ECI code
pub const ECI_GENERAL_ID: u16 = 926;
/// Codeword used to specifiy a ECI code page
pub const ECI_CODE_PAGE: u16 = 927;
// 928: Block start for PDF macro

/// Codeword used as padding at the end of the data section
pub const CW_PADDING: u16 = M_LATCH_TEXT;

/// Digits packed in a single numeric compaction group (15 codewords).
const NUMERIC_GROUP: usize = 44;
/// Digit runs inside text shorter than this stay in the mixed sub-mode.
const NUMERIC_RUN_MIN: usize = 14;

const MIXED_CHAR_SET: [u8; 15] = [
    b'&', b'\r', b'\t', b',', b':', b'#', b'-', b'.', b'$', b'/', b'+', b'%', b'*', b'=', b'^'
];
const PUNC_CHAR_SET: [u8; 29] = [
    b';', b'<', b'>', b'@', b'[', b'\\', b']', b'_', b'`', b'~', b'!', b'\r', b'\t',
    b',', b':', b'\n', b'-', b'.', b'$', b'/', b'"', b'|', b'*', b'(', b')', b'?',
    b'{', b'}', b'\''
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Upper,
    Lower,
    Mixed,
    Punc,
    Numeric,
    Byte,
}

macro_rules! push {
    ($cws:ident, $rh:ident, $($cw:expr),+; $post:ident = $new:expr) => {{
        push!($cws, $rh, $($cw),+);
        $post = $new;
    }};
    ($cws:ident, $rh:ident, $head:expr, $($cw:expr),+) => {
        push!($cws, $rh, $head);
        push!($cws, $rh, $($cw),+);
    };
    ($cws:ident, $rh:ident, $cw:expr) => {{
        let cw = $cw as u16;
        if $rh {
            if let Some(last) = $cws.last_mut() {
                *last = *last * 30 + cw;
            }
            $rh = false;
        } else {
            $cws.push(cw);
            $rh = true;
        }
    }};
}

macro_rules! push_sp {
    ($cws:ident, $rh:ident, $($cw:expr),+; $post:ident = $new:expr) => {{
        push_sp!($cws, $rh, $($cw),+);
        $post = $new;
    }};
    ($cws:ident, $rh:ident, $($cw:expr),+) => {{
        if $rh {
            if let Some(last) = $cws.last_mut() {
                *last = *last * 30 + 29;
            }
            $rh = false;
        }
        $($cws.push($cw as u16);)+
    }};
}

/// Use a PDF417Encoder to encode your data segements to a list of codewords
/// ready to be rendered.
#[derive(Debug, Clone)]
pub struct PDF417Encoder {
    codewords: Vec<u16>,
    micro: bool,
    last_mode: Mode,
}

impl PDF417Encoder {
    /// Create an empty PDF417Encoder. Set `micro` to true to encode according
    /// to the MicroPDF417 specification.
    /// **Note**: You can not mistmatch specifications, if you encode your
    /// data according to the classic PDF417, you can not use it to generate
    /// a MicroPDF417 and vice-versa.
    pub fn new(micro: bool) -> Self {
        if micro {
            // Default mode is byte compactation
            Self { codewords: Vec::new(), micro, last_mode: Mode::Byte }
        } else {
            // Reserve the first codeword (used for length).
            Self { codewords: vec![0], micro, last_mode: Mode::Upper }
        }
    }

    /// Returns the number of codewords already used
    #[inline]
    pub fn count(&self) -> usize {
        self.codewords.len()
    }

    #[inline]
    pub fn is_micro(&self) -> bool {
        self.micro
    }

    /// Codewords appended so far, the length descriptor of a regular PDF417
    /// is only filled by [PDF417Encoder::seal].
    #[inline]
    pub fn codewords(&self) -> &[u16] {
        &self.codewords
    }

    /// Appends a numeric segment containing a 64-bit unsigned integer `n`. For
    /// larger numbers please use the [PDF417Encoder::append_numeric] method
    /// which can handle any number of digits.
    pub fn append_num(mut self, n: u64) -> Self {
        self.codewords.push(M_LATCH_NUMERIC);
        self.last_mode = Mode::Numeric;

        // A leading 1 is prepended to the digits before the base 900
        // conversion, the number of digits matters.
        let digits = n.checked_ilog10().map_or(1, |d| d + 1);
        let mut value = 10u128.pow(digits) + n as u128;
        let nb = digits as usize / 3 + 1;

        let start = self.codewords.len();
        self.codewords.resize(start + nb, 0);
        for slot in self.codewords[start..].iter_mut().rev() {
            *slot = (value % 900) as u16;
            value /= 900;
        }
        self
    }

    /// Appends a numeric segment made of ASCII digits. Fails on anything
    /// else than `0..=9`.
    pub fn append_numeric(mut self, digits: &[u8]) -> Result<Self> {
        self.codewords.push(M_LATCH_NUMERIC);
        self.last_mode = Mode::Numeric;
        for group in digits.chunks(NUMERIC_GROUP) {
            push_numeric_group(&mut self.codewords, group)?;
        }
        Ok(self)
    }

    /// Appends a bytes segment.
    pub fn append_bytes(mut self, bytes: &[u8]) -> Self {
        let out = &mut self.codewords;
        let mut k = 0;

        if bytes.len() > 1 {
            // even if we are in byte mode, it is safer to always emit a LATCH_BYTE
            out.push(if bytes.len() % 6 == 0 { M_LATCH_BYTE_M6 } else { M_LATCH_BYTE });
            self.last_mode = Mode::Byte;

            while bytes.len() - k >= 6 {
                // pack six bytes
                let mut s: u64 = 0;
                for n in 0..6 {
                    s = (s << 8) + bytes[k + n] as u64;
                }
                // append five codewords
                let mut group = [0u16; 5];
                for n in 0..5 {
                    let (q, r) = (s / 900, s % 900);
                    group[4 - n] = r as u16;
                    s = q;
                }
                out.extend_from_slice(&group);
                k += 6;
            }
        } else if !bytes.is_empty() {
            if self.last_mode.is_text() {
                out.push(M_SHIFT_BYTE);
            } else {
                out.push(M_LATCH_BYTE);
                self.last_mode = Mode::Byte;
            }
        }

        // remaining
        out.extend(bytes[k..].iter().map(|&b| b as u16));
        self
    }

    /// Appends a text segment using the PDF417 sub-mode tables only, digits
    /// are encoded in the mixed sub-mode whatever their count. Bytes outside
    /// of the text tables are emitted one by one after a byte shift.
    pub fn append_text(self, text: &[u8]) -> Result<Self> {
        self.text(text, false)
    }

    /// Appends an ASCII (text) segment. Runs of 14 digits or more switch to
    /// numeric compaction. *Warning*: This function uses the PDF417 table
    /// based encoding to optimize the size of the text and therefore support
    /// only a small set of displayable characters. If you want to encode an
    /// UTF-8 string, use [PDF417Encoder::append_utf8] instead (uses more
    /// space).
    pub fn append_ascii(self, s: &str) -> Result<Self> {
        debug_assert!(s.is_ascii(), "use append_utf8 for UTF-8 strings");
        self.text(s.as_bytes(), true)
    }

    fn text(mut self, s: &[u8], numeric_runs: bool) -> Result<Self> {
        let out = &mut self.codewords;

        let mut mode = self.last_mode;
        let mut k = 0;
        let mut right = false; // false = high half | true = low half

        if !mode.is_text() {
            out.push(M_LATCH_TEXT);
            mode = Mode::Upper;
        }

        while k < s.len() {
            let c = s[k];
            match c {
                c if c.is_ascii_uppercase() => {
                    match mode {
                        Mode::Upper => (),
                        Mode::Lower => if k + 1 < s.len() && s[k + 1].is_ascii_lowercase() {
                            push!(out, right, 27);
                        } else {
                            push!(out, right, 29, 29; mode = Mode::Upper);
                        },
                        Mode::Mixed => push!(out, right, 28; mode = Mode::Upper),
                        Mode::Punc => push!(out, right, 29; mode = Mode::Upper),
                        Mode::Numeric | Mode::Byte => unreachable!("Unknown mode {mode:?}"),
                    }
                    push!(out, right, c - b'A'; k = k + 1);
                },
                c if c.is_ascii_lowercase() => {
                    match mode {
                        Mode::Upper | Mode::Mixed => push!(out, right, 27; mode = Mode::Lower),
                        Mode::Lower => (),
                        Mode::Punc => push!(out, right, 29, 27; mode = Mode::Lower),
                        Mode::Numeric | Mode::Byte => unreachable!("Unknown mode {mode:?}"),
                    }
                    push!(out, right, c - b'a'; k = k + 1);
                },
                c if c.is_ascii_digit() => {
                    let mut end = k + 1;
                    while end < s.len() && s[end].is_ascii_digit() {
                        end += 1;
                    }

                    if !numeric_runs || end - k < NUMERIC_RUN_MIN {
                        match mode {
                            Mode::Upper | Mode::Lower => push!(out, right, 28; mode = Mode::Mixed),
                            Mode::Mixed => (),
                            Mode::Punc => push!(out, right, 29, 28; mode = Mode::Mixed),
                            Mode::Numeric | Mode::Byte => unreachable!("Unknown mode {mode:?}"),
                        }
                        while k < end {
                            push!(out, right, s[k] - b'0'; k = k + 1);
                        }
                    } else {
                        if mode != Mode::Numeric {
                            push_sp!(out, right, M_LATCH_NUMERIC; mode = Mode::Numeric);
                        }
                        for group in s[k..end].chunks(NUMERIC_GROUP) {
                            push_numeric_group(out, group)?;
                        }
                        k = end;
                    }

                    if mode == Mode::Numeric && k < s.len() {
                        push_sp!(out, right, M_LATCH_TEXT; mode = Mode::Upper);
                    }
                },
                b' ' => {
                    if mode == Mode::Punc { push!(out, right, 29; mode = Mode::Upper) };
                    push!(out, right, 26; k = k + 1);
                },
                c => {
                    if let Some(p) = MIXED_CHAR_SET.iter().position(|&r| r == c) {
                        match mode {
                            Mode::Upper | Mode::Lower => push!(out, right, 28; mode = Mode::Mixed),
                            Mode::Mixed => (),
                            // no switch if the char is also present in the punc table
                            Mode::Punc if (1..=4).contains(&p) || (6..=9).contains(&p) => (),
                            Mode::Punc => push!(out, right, 29, 28; mode = Mode::Mixed),
                            Mode::Numeric | Mode::Byte => unreachable!("Unknown mode {mode:?}"),
                        }
                        push!(out, right, p + 10);
                    } else if let Some(p) = PUNC_CHAR_SET.iter().position(|&r| r == c) {
                        if mode != Mode::Punc {
                            let mut end = k + 1;
                            while end < s.len() && end - k < 3 && PUNC_CHAR_SET.contains(&s[end]) {
                                end += 1;
                            }
                            if end - k >= 3 { // latch
                                if mode != Mode::Mixed { push!(out, right, 28); }
                                push!(out, right, 25; mode = Mode::Punc);
                            } else { // shift
                                push!(out, right, 29);
                            }
                        }
                        push!(out, right, p);
                    } else {
                        // the padding 29 latches back to upper from punctuation
                        if right && mode == Mode::Punc {
                            mode = Mode::Upper;
                        }
                        // TODO: shift runs of consecutive bytes with a single latch
                        push_sp!(out, right, M_SHIFT_BYTE, c);
                    }
                    k += 1;
                },
            };
        }

        if right {
            if let Some(last) = out.last_mut() {
                *last = *last * 30 + 29;
            }
            // the padding 29 is a latch when read in punctuation
            if mode == Mode::Punc {
                mode = Mode::Upper;
            }
        }
        self.last_mode = mode;

        Ok(self)
    }

    /// Appends an ECI designator. Values below 900 select a code page,
    /// larger ones use the general and custom ranges.
    pub fn append_eci(mut self, eci: u32) -> Result<Self> {
        match eci {
            0..=899 => self.codewords.extend([ECI_CODE_PAGE, eci as u16]),
            900..=810_899 => self.codewords.extend([ECI_GENERAL_ID, (eci / 900 - 1) as u16, (eci % 900) as u16]),
            810_900..=811_799 => self.codewords.extend([ECI_CUSTOM_ID, (eci - 810_900) as u16]),
            _ => return Err(EncodeError::InvalidConfiguration(format!("ECI {eci} is out of range"))),
        }
        // a text segment following an ECI restarts in the upper sub-mode
        if self.last_mode.is_text() {
            self.last_mode = Mode::Upper;
        }
        Ok(self)
    }

    /// Appends a special segement crafted to store an __UTF-8__ string `s`.
    /// __Note that the conversion is space inefficient, if the string is
    /// composed of ASCII characters, please consider using
    /// [PDF417Encoder::append_ascii] instead.__ Internally, we use a ECI
    /// identifier (\\000026) to switch to the UTF-8 code page then append a
    /// byte segment to store the string's bytes.
    pub fn append_utf8(mut self, s: &str) -> Self {
        self.codewords.extend([ECI_CODE_PAGE, 26]); // UTF-8 is \000026
        self.append_bytes(s.as_bytes())
    }

    /// Append a single codeword.
    pub fn append_codeword(mut self, codeword: u16) -> Self {
        self.codewords.push(codeword);
        self
    }

    /// Append a slice of codewords.
    pub fn append_raw(mut self, codewords: &[u16]) -> Self {
        self.codewords.extend_from_slice(codewords);
        self
    }

    /// Seals the data segments of a regular PDF417 into `capacity`
    /// codewords (rows × columns). The length descriptor, the padding and
    /// the ECC codewords of `level` are generated by this function.
    pub fn seal(mut self, capacity: usize, level: u8) -> Result<Vec<u16>> {
        if self.micro {
            return Err(EncodeError::InvalidConfiguration("a MicroPDF417 message must be sealed with seal_micro".into()));
        }
        if level > 8 {
            return Err(EncodeError::InvalidConfiguration(format!("ECC level {level} is not in 0..=8")));
        }
        let k = ecc::ecc_count(level);
        let total = capacity.saturating_sub(k);
        if self.codewords.len() > total {
            return Err(EncodeError::CapacityExceeded(format!(
                "{} data codewords do not fit {capacity} codewords with ECC level {level}", self.codewords.len())));
        }

        self.codewords.resize(total, CW_PADDING);
        self.codewords[0] = total as u16;
        self.codewords.resize(capacity, 0);
        ecc::generate_ecc(&mut self.codewords, k);

        Ok(self.codewords)
    }

    /// Seals the data segments of a MicroPDF417 into the codewords of
    /// `variant`, padding included.
    pub fn seal_micro(mut self, variant: Variant) -> Result<Vec<u16>> {
        if !self.micro {
            return Err(EncodeError::InvalidConfiguration("a PDF417 message must be sealed with seal".into()));
        }
        let (capacity, k) = (variant.capacity(), variant.ecc_count());
        if self.codewords.len() > capacity - k {
            return Err(EncodeError::CapacityExceeded(format!(
                "{} data codewords do not fit a {}x{} MicroPDF417", self.codewords.len(), variant.cols(), variant.rows())));
        }

        self.codewords.resize(capacity - k, CW_PADDING);
        self.codewords.resize(capacity, 0);
        ecc::generate_ecc(&mut self.codewords, k);

        Ok(self.codewords)
    }

    /// Highest ECC level whose codewords still fit in `capacity` along with
    /// the data. If there is not enough space for the minimum amount of ECC
    /// codewords, None is returned.
    pub fn fit_ecc(&self, capacity: usize) -> Option<u8> {
        let remaining = capacity.checked_sub(self.codewords.len())?;
        (0..=8u8).rev().find(|&level| ecc::ecc_count(level) <= remaining)
    }

    /// Smallest MicroPDF417 variant holding the data, optionally with a
    /// fixed number of columns.
    pub fn fit_variant(&self, cols: Option<u8>) -> Option<Variant> {
        Variant::with_capacity(self.codewords.len(), cols)
    }
}

impl Mode {
    #[inline]
    fn is_text(self) -> bool {
        matches!(self, Mode::Upper | Mode::Lower | Mode::Mixed | Mode::Punc)
    }
}

/// Converts up to 44 digits to base 900 after prepending a 1, as required
/// by numeric compaction.
fn push_numeric_group(out: &mut Vec<u16>, digits: &[u8]) -> Result<()> {
    let invalid = || EncodeError::InvalidCharacter("numeric compaction only accepts digits".into());
    if digits.is_empty() || digits.len() > NUMERIC_GROUP || !digits.iter().all(u8::is_ascii_digit) {
        return Err(invalid());
    }

    let mut b = U160::zero();
    {
        let mut p0 = U160::zero();
        let mut p1 = U160::zero();
        b.bytes_radix_(None, digits, 10, &mut p0, &mut p1).map_err(|_| invalid())?;

        // Append a leading 1 to the number to do the base 900
        // conversion. We need to calculate and add 10^(digits).
        // Power of 10 (see https://stackoverflow.com/a/44103598)
        p1.uone_();
        p1.shl_(digits.len()).ok_or_else(invalid)?;
        for _ in 0..digits.len() {
            p0.copy_(&p1).ok_or_else(invalid)?;
            p0.shl_(2).ok_or_else(invalid)?;
            p1.add_(&p0).ok_or_else(invalid)?;
        }
        b.add_(&p1).ok_or_else(invalid)?;
    }

    let nb = digits.len() / 3 + 1;
    let start = out.len();
    out.resize(start + nb, 0);
    for slot in out[start..].iter_mut().rev() {
        if b.is_zero() {
            break;
        }
        *slot = b.digit_udivide_inplace_(900).ok_or_else(invalid)? as u16;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::PDF417Encoder;
    use crate::error::EncodeError;
    use crate::pdf417::tables::Variant;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode_ascii_simple() {
        let ec = PDF417Encoder::new(false).append_ascii("Test").unwrap();
        assert_eq!(ec.codewords(), &[0, 19 * 30 + 27, 4 * 30 + 18, 19 * 30 + 29]);
    }

    #[test]
    fn test_encode_hello() {
        let ec = PDF417Encoder::new(false).append_text(b"HELLO").unwrap();
        assert_eq!(ec.codewords(), &[0, 7 * 30 + 4, 11 * 30 + 11, 14 * 30 + 29]);
    }

    #[test]
    fn test_generate_ascii_switch_modes() {
        let ec = PDF417Encoder::new(false).append_ascii("abc1D234\x1B").unwrap();
        assert_eq!(ec.codewords(), &[0, 27 * 30 + 0, 1 * 30 + 2, 28 * 30 + 1, 28 * 30 + 3, 28 * 30 + 2, 3 * 30 + 4, 913, 0x1B]);
    }

    #[test]
    fn test_generate_ascii_numeric() {
        let ec = PDF417Encoder::new(false).append_ascii("12345678987654321 num").unwrap();
        assert_eq!(ec.codewords(), &[0, 902, 190, 232, 499, 20, 504, 721, 900, 26 * 30 + 27, 13 * 30 + 20, 12 * 30 + 29]);
    }

    #[test]
    fn test_generate_ascii_numeric_big() {
        let ec = PDF417Encoder::new(false)
            //             [                        p1                 ][ p2 ]
            .append_ascii("123456789876543211234567898765432112345678987654321").unwrap();
        assert_eq!(ec.codewords(), &[0, 902, 491, 81, 137, 725, 651, 455, 511, 858, 135, 138, 488, 568, 447, 553, 198, /* p2 */ 21, 715, 821]);
    }

    #[test]
    fn test_append_numeric_matches_ascii() {
        let digits = "123456789876543211234567898765432112345678987654321";
        let a = PDF417Encoder::new(false).append_ascii(digits).unwrap();
        let b = PDF417Encoder::new(false).append_numeric(digits.as_bytes()).unwrap();
        assert_eq!(a.codewords(), b.codewords());
    }

    #[test]
    fn test_append_numeric_rejects_letters() {
        let err = PDF417Encoder::new(false).append_numeric(b"12x").unwrap_err();
        assert!(matches!(err, EncodeError::InvalidCharacter(_)));
    }

    #[test]
    fn test_encode_num() {
        let ec = PDF417Encoder::new(false).append_num(12345678987654321);
        assert_eq!(ec.codewords(), &[0, 902, 190, 232, 499, 20, 504, 721]);
    }

    #[test]
    fn test_encode_num_zero_and_max() {
        let ec = PDF417Encoder::new(false).append_num(0);
        assert_eq!(ec.codewords(), &[0, 902, 10]);
        let a = PDF417Encoder::new(false).append_num(u64::MAX);
        let b = PDF417Encoder::new(false).append_numeric(u64::MAX.to_string().as_bytes()).unwrap();
        assert_eq!(a.codewords(), b.codewords());
    }

    #[test]
    fn test_generate_ascii_with_digits() {
        let ec = PDF417Encoder::new(false).append_ascii("encoded 0123456789 as digits").unwrap();
        assert_eq!(ec.codewords(), &[0, 27 * 30 + 4, 13 * 30 + 2, 14 * 30 + 3, 4 * 30 + 3, 26 * 30 + 28, 0 * 30 + 1, 2 * 30 + 3, 4 * 30 + 5, 6 * 30 + 7, 8 * 30 + 9,
            26 * 30 + 27, 0 * 30 + 18, 26 * 30 + 3, 8 * 30 + 6, 8 * 30 + 19, 18 * 30 + 29]);
    }

    #[test]
    fn test_generate_ascii_punc_mixed() {
        let ec = PDF417Encoder::new(false).append_ascii("This! Is a `quote (100%)`.").unwrap();
        assert_eq!(ec.codewords(), &[0, 19 * 30 + 27, 7 * 30 + 8, 18 * 30 + 29, 10 * 30 + 26, 27 * 30 + 8, 18 * 30 + 26, 0 * 30 + 26, 29 * 30 + 8, 16 * 30 + 20, 14 * 30 + 19, 4 * 30 + 26, 29 * 30 + 23, 28 * 30 + 1, 0 * 30 + 0, 21 * 30 + 25, 24 * 30 + 8, 17 * 30 + 29]);
    }

    #[test]
    fn test_encode_bytes_multiple() {
        let ec = PDF417Encoder::new(false).append_bytes(b"alcool");
        assert_eq!(ec.codewords(), &[0, 924, 163, 238, 432, 766, 244]);
    }

    #[test]
    fn test_encode_bytes_not_multiple() {
        let ec = PDF417Encoder::new(false).append_bytes(b"encode bin");
        assert_eq!(ec.codewords(), &[0, 901, 169, 883, 224, 680, 517, 32, 98, 105, 110]);
    }

    #[test]
    fn test_single_byte_shift_in_text() {
        let ec = PDF417Encoder::new(false).append_text(b"AB").unwrap().append_bytes(&[0xe9]);
        assert_eq!(ec.codewords(), &[0, 1, 913, 0xe9]);
        let ec = PDF417Encoder::new(false).append_num(7).append_bytes(&[0xe9]);
        assert_eq!(ec.codewords(), &[0, 902, 17, 901, 0xe9]);
    }

    /// Reads back text compaction codewords following a regular PDF417
    /// (length descriptor first), sub-mode switches and byte shifts
    /// included.
    fn read_text(codewords: &[u16]) -> Vec<u8> {
        const MIXED: &[u8] = b"0123456789&\r\t,:#-.$/+%*=^";

        #[derive(Debug, Clone, Copy)]
        enum Sub { Alpha, Lower, Mixed, Punct, AlphaShift, PunctShift }

        let mut out = Vec::new();
        let (mut sub, mut prior) = (Sub::Alpha, Sub::Alpha);
        let mut cws = codewords[1..].iter().copied();
        while let Some(cw) = cws.next() {
            match cw {
                900 => {
                    sub = Sub::Alpha;
                    continue;
                },
                913 => {
                    if let Sub::AlphaShift | Sub::PunctShift = sub {
                        sub = prior;
                    }
                    out.push(cws.next().unwrap() as u8);
                    continue;
                },
                _ => assert!(cw < 900, "unexpected codeword {cw}"),
            }
            for v in [cw / 30, cw % 30] {
                let v = v as u8;
                match (sub, v) {
                    (Sub::Alpha | Sub::Lower | Sub::Mixed, 26) => out.push(b' '),
                    (Sub::Alpha, 0..=25) => out.push(b'A' + v),
                    (Sub::Lower, 0..=25) => out.push(b'a' + v),
                    (Sub::Mixed, 0..=24) => out.push(MIXED[v as usize]),
                    (Sub::Punct, 0..=28) => out.push(super::PUNC_CHAR_SET[v as usize]),
                    (Sub::Alpha | Sub::Mixed, 27) => sub = Sub::Lower,
                    (Sub::Alpha | Sub::Lower, 28) => sub = Sub::Mixed,
                    (Sub::Mixed, 25) => sub = Sub::Punct,
                    (Sub::Mixed, 28) | (Sub::Punct, 29) => sub = Sub::Alpha,
                    (Sub::Lower, 27) => (prior, sub) = (sub, Sub::AlphaShift),
                    (Sub::Alpha | Sub::Lower | Sub::Mixed, 29) => (prior, sub) = (sub, Sub::PunctShift),
                    (Sub::AlphaShift, 0..=25) => {
                        sub = prior;
                        out.push(b'A' + v);
                    },
                    (Sub::PunctShift, 0..=28) => {
                        sub = prior;
                        out.push(super::PUNC_CHAR_SET[v as usize]);
                    },
                    (Sub::PunctShift, 29) => sub = Sub::Alpha,
                    _ => panic!("unexpected value {v} in {sub:?}"),
                }
            }
        }
        out
    }

    #[test]
    fn test_punc_padding_latches_upper() {
        // the padding 29 of the punctuation run is read as a latch to upper
        let ec = PDF417Encoder::new(false)
            .append_text(b"ab;<>@").unwrap()
            .append_bytes(b"\x80")
            .append_text(b"cdefgh").unwrap();
        assert_eq!(ec.codewords(), &[
            0, 27 * 30 + 0, 1 * 30 + 28, 25 * 30 + 0, 1 * 30 + 2, 3 * 30 + 29,
            913, 0x80,
            27 * 30 + 2, 3 * 30 + 4, 5 * 30 + 6, 7 * 30 + 29,
        ]);

        let ec = PDF417Encoder::new(false).append_text(b"ab;<>@\x80cd").unwrap();
        assert_eq!(&ec.codewords()[5..], &[3 * 30 + 29, 913, 0x80, 27 * 30 + 2, 3 * 30 + 29]);

        // without padding the punctuation sub-mode carries over
        let ec = PDF417Encoder::new(false)
            .append_text(b"a;<>@").unwrap()
            .append_bytes(b"\x80")
            .append_text(b";").unwrap();
        assert_eq!(ec.codewords(), &[0, 27 * 30 + 0, 28 * 30 + 25, 0 * 30 + 1, 2 * 30 + 3, 913, 0x80, 0 * 30 + 29]);
    }

    #[test]
    fn test_text_reads_back() {
        let texts: [&[u8]; 7] = [
            b"ab;<>@\x80cd",
            b"x@y!\x81z",
            b"[a]\x82{b}",
            b"@@@X",
            b"Mixed 1,2;3 and; <PUNC>\xe9 End",
            b"lower UPPER lower\xffZ",
            b"This! Is a `quote (100%)`.",
        ];
        for text in texts {
            let ec = PDF417Encoder::new(false).append_text(text).unwrap();
            assert_eq!(read_text(ec.codewords()), text);
        }

        let segments: [&[u8]; 5] = [b"ab;<>@", b"\x80", b"cdefgh", b"\x81", b"{}"];
        let mut ec = PDF417Encoder::new(false);
        for (k, segment) in segments.iter().enumerate() {
            ec = if k % 2 == 0 { ec.append_text(segment).unwrap() } else { ec.append_bytes(segment) };
        }
        assert_eq!(read_text(ec.codewords()), segments.concat());
    }

    #[test]
    fn test_multiple_segments() {
        let ec = PDF417Encoder::new(false)
            .append_ascii("Test").unwrap()
            .append_num(42)
            .append_bytes(b"encode bin");
        assert_eq!(ec.codewords(), &[
            0,
            19 * 30 + 27, 4 * 30 + 18, 19 * 30 + 29,
            902, 142,
            901, 169, 883, 224, 680, 517, 32, 98, 105, 110
        ]);
    }

    #[test]
    fn test_eci_designators() {
        let ec = PDF417Encoder::new(false)
            .append_eci(3).unwrap()
            .append_eci(1000).unwrap()
            .append_eci(811_000).unwrap();
        assert_eq!(ec.codewords(), &[0, 927, 3, 926, 0, 100, 925, 100]);
        assert!(PDF417Encoder::new(false).append_eci(811_800).is_err());
        assert_eq!(PDF417Encoder::new(false).append_utf8("é").codewords(), &[0, 927, 26, 901, 0xc3, 0xa9]);
    }

    #[test]
    fn test_seal_normal() {
        let codewords = PDF417Encoder::new(false)
            .append_ascii("Test").unwrap()
            .append_num(42)
            .append_num(42)
            .append_bytes(b"encode bin")
            .seal(20, 0)
            .unwrap();

        assert_eq!(codewords, vec![
            18,
            19 * 30 + 27, 4 * 30 + 18, 19 * 30 + 29,
            902, 142, 902, 142,
            901, 169, 883, 224, 680, 517, 32, 98, 105, 110,
            // ecc
            67, 111
        ]);
    }

    #[test]
    fn test_seal_pads_with_text_latch() {
        let codewords = PDF417Encoder::new(false).append_text(b"HELLO").unwrap().seal(12, 1).unwrap();
        assert_eq!(&codewords[..8], &[8, 214, 341, 449, 900, 900, 900, 900]);
    }

    #[test]
    fn test_seal_too_small() {
        let err = PDF417Encoder::new(false).append_text(b"HELLO").unwrap().seal(5, 0).unwrap_err();
        assert!(matches!(err, EncodeError::CapacityExceeded(_)));
    }

    #[test]
    fn test_seal_micro() {
        let encoder = PDF417Encoder::new(true).append_ascii("Test").unwrap();
        let variant = encoder.fit_variant(None).unwrap();
        assert_eq!((variant.cols(), variant.rows()), (1, 11));

        let codewords = encoder.seal_micro(variant).unwrap();
        assert_eq!(codewords, vec![
            900,
            19 * 30 + 27, 4 * 30 + 18, 19 * 30 + 29,
            // ecc
            120, 904, 384, 762, 920, 778, 47
        ]);
    }

    #[test]
    fn test_seal_mismatch() {
        assert!(PDF417Encoder::new(true).seal(10, 0).is_err());
        let variant = Variant::new(0).unwrap();
        assert!(PDF417Encoder::new(false).seal_micro(variant).is_err());
    }

    #[test]
    fn test_fit_ecc() {
        let encoder = PDF417Encoder::new(false).append_text(b"HELLO").unwrap();
        assert_eq!(encoder.fit_ecc(4), None);
        assert_eq!(encoder.fit_ecc(6), Some(0));
        assert_eq!(encoder.fit_ecc(20), Some(3));
        assert_eq!(encoder.fit_ecc(1000), Some(8));
    }
}
