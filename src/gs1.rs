//! GS1 Application Identifier input, `(01)09501101530003(10)AB-123`, turned
//! into an element string where variable length elements are terminated by
//! a group separator.

use crate::error::{EncodeError, Result};

/// ASCII group separator, stands for FNC1 between elements.
pub const GS: u8 = 0x1d;

/// Total element length (AI digits included) of the predefined fixed
/// length AIs, keyed by the first two AI digits.
const FIXED_LENGTHS: [(&[u8; 2], usize); 22] = [
    (b"00", 20), (b"01", 16), (b"02", 16), (b"03", 16), (b"04", 18),
    (b"11", 8), (b"12", 8), (b"13", 8), (b"14", 8), (b"15", 8), (b"16", 8),
    (b"17", 8), (b"18", 8), (b"19", 8), (b"20", 4),
    (b"31", 10), (b"32", 10), (b"33", 10), (b"34", 10), (b"35", 10), (b"36", 10),
    (b"41", 16),
];

/// Element length of a fixed length AI, None for variable length ones.
pub fn fixed_length(ai: &[u8]) -> Option<usize> {
    let prefix = ai.get(..2)?;
    FIXED_LENGTHS.iter()
        .find(|(p, _)| p.as_slice() == prefix)
        .map(|&(_, len)| len)
}

/// Strips the brackets around the AIs and inserts [GS] after every variable
/// length element that is not the last one. Input that does not start with
/// a bracket is taken as an element string already and returned as is.
pub fn normalize(input: &[u8]) -> Result<Vec<u8>> {
    if input.first() != Some(&b'(') {
        return Ok(input.to_vec());
    }

    let mut out = Vec::with_capacity(input.len());
    let mut rest = input;
    while let Some(tail) = rest.strip_prefix(b"(") {
        let close = tail.iter().position(|&c| c == b')')
            .ok_or_else(|| EncodeError::InvalidGs1("unbalanced brackets".into()))?;
        let ai = &tail[..close];
        if ai.is_empty() {
            return Err(EncodeError::InvalidGs1("empty application identifier".into()));
        }
        if !ai.iter().all(u8::is_ascii_digit) || ai.len() > 4 {
            return Err(EncodeError::InvalidGs1(format!(
                "invalid application identifier \"{}\"", String::from_utf8_lossy(ai))));
        }

        let tail = &tail[close + 1..];
        let end = tail.iter().position(|&c| c == b'(').unwrap_or(tail.len());
        let data = &tail[..end];
        if data.is_empty() {
            return Err(EncodeError::InvalidGs1(format!("AI ({}) has no data", String::from_utf8_lossy(ai))));
        }
        if data.contains(&b')') {
            return Err(EncodeError::InvalidGs1("unbalanced brackets".into()));
        }

        let fixed = fixed_length(ai);
        if let Some(len) = fixed {
            if ai.len() + data.len() != len {
                return Err(EncodeError::InvalidGs1(format!(
                    "AI ({}) takes {} characters of data", String::from_utf8_lossy(ai), len - ai.len())));
            }
        }

        out.extend_from_slice(ai);
        out.extend_from_slice(data);
        rest = &tail[end..];
        if fixed.is_none() && !rest.is_empty() {
            out.push(GS);
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{fixed_length, normalize};
    use crate::error::EncodeError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_mixed_elements() {
        let out = normalize(b"(01)09501101530003(17)140704(10)AB-123").unwrap();
        assert_eq!(out, b"01095011015300031714070410AB-123".to_vec());
    }

    #[test]
    fn test_separator_after_variable_element() {
        let out = normalize(b"(10)ABC(21)XYZ").unwrap();
        assert_eq!(out, b"10ABC\x1d21XYZ".to_vec());
    }

    #[test]
    fn test_four_digit_ai() {
        let out = normalize(b"(3103)000189(10)1").unwrap();
        assert_eq!(out, b"3103000189101".to_vec());
        assert_eq!(fixed_length(b"3103"), Some(10));
        assert_eq!(fixed_length(b"10"), None);
        assert_eq!(fixed_length(b"23"), None);
    }

    #[test]
    fn test_plain_input_is_kept() {
        assert_eq!(normalize(b"0109501101530003").unwrap(), b"0109501101530003".to_vec());
    }

    #[test]
    fn test_errors() {
        for input in [&b"(01"[..], b"()123", b"(A1)12", b"(10)", b"(10)AB)C", b"(01)123"] {
            assert!(matches!(normalize(input), Err(EncodeError::InvalidGs1(_))), "{input:?}");
        }
    }
}
