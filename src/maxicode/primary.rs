//! Structured carrier message of modes 2 and 3: postcode, country code and
//! class of service packed into the ten primary codewords.

use crate::error::{EncodeError, Result};

use super::codewords::CodeSet;
use super::tables::CHARACTERS;

/// Longest numeric postcode (mode 2).
pub const MAX_NUMERIC_POSTCODE: usize = 9;
/// Alphanumeric postcodes (mode 3) keep their first six characters.
pub const ALPHANUMERIC_POSTCODE: usize = 6;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StructuredCarrier {
    pub postcode: String,
    /// ISO 3166 numeric country code
    pub country: u16,
    /// Class of service
    pub service: u16,
}

impl StructuredCarrier {
    pub fn new(postcode: impl Into<String>, country: u16, service: u16) -> Self {
        Self { postcode: postcode.into(), country, service }
    }

    /// Splits `"<postcode><country><service>"`, the last six characters
    /// being the two 3 digit codes.
    pub fn parse(primary: &str) -> Result<Self> {
        let split = primary.len().checked_sub(6)
            .filter(|&split| split > 0 && primary.is_char_boundary(split))
            .ok_or_else(|| EncodeError::InvalidConfiguration(format!(
                "primary message \"{primary}\" needs a postcode, a country code and a service class")))?;
        let (postcode, codes) = primary.split_at(split);
        let digits = |field: Option<&str>| field
            .filter(|f| f.bytes().all(|c| c.is_ascii_digit()))
            .and_then(|f| f.parse::<u16>().ok())
            .ok_or_else(|| EncodeError::InvalidCharacter(format!(
                "country code and service class \"{codes}\" must be digits")));
        let country = digits(codes.get(..3))?;
        let service = digits(codes.get(3..))?;
        Ok(Self::new(postcode, country, service))
    }

    fn is_numeric(&self) -> bool {
        !self.postcode.is_empty()
            && self.postcode.len() <= MAX_NUMERIC_POSTCODE
            && self.postcode.bytes().all(|c| c.is_ascii_digit())
    }

    /// Mode 2 for numeric postcodes of up to nine digits, 3 otherwise.
    pub fn mode(&self) -> u8 {
        if self.is_numeric() { 2 } else { 3 }
    }

    /// The ten primary codewords for `mode` (2 or 3), least significant
    /// bits first.
    pub fn codewords(&self, mode: u8) -> Result<[u8; 10]> {
        for (name, value) in [("country code", self.country), ("service class", self.service)] {
            if value > 999 {
                return Err(EncodeError::InvalidConfiguration(format!("{name} {value} has more than 3 digits")));
            }
        }

        let postcode = match mode {
            2 => {
                if !self.is_numeric() {
                    return Err(EncodeError::InvalidCharacter(format!(
                        "mode 2 postcode \"{}\" must be 1 to 9 digits", self.postcode)));
                }
                let value = self.postcode.bytes().fold(0u64, |acc, d| acc * 10 + (d - b'0') as u64);
                value | (self.postcode.len() as u64) << 30
            },
            3 => self.alphanumeric()?,
            _ => return Err(EncodeError::InvalidConfiguration("Invalid MaxiCode mode".into())),
        };

        let bits = mode as u64
            | postcode << 4
            | (self.country as u64) << 40
            | (self.service as u64) << 50;
        let mut codewords = [0; 10];
        for (k, cw) in codewords.iter_mut().enumerate() {
            *cw = ((bits >> (6 * k)) & 0x3f) as u8;
        }
        Ok(codewords)
    }

    /// Six code set A values, space padded, first character most significant.
    fn alphanumeric(&self) -> Result<u64> {
        let mut value = 0;
        let padded = self.postcode.bytes().chain(core::iter::repeat(b' '));
        for c in padded.take(ALPHANUMERIC_POSTCODE) {
            let (set, v) = CHARACTERS[c.to_ascii_uppercase() as usize];
            if set != CodeSet::A {
                return Err(EncodeError::InvalidCharacter(format!(
                    "postcode character {:?} is not in code set A", c as char)));
            }
            value = value << 6 | v as u64;
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_numeric_postcode() {
        let carrier = StructuredCarrier::new("152382802", 840, 1);
        assert_eq!(carrier.mode(), 2);
        assert_eq!(carrier.codewords(2).unwrap(), [34, 20, 45, 20, 17, 18, 2, 18, 7, 0]);
    }

    #[test]
    fn test_alphanumeric_postcode() {
        let carrier = StructuredCarrier::new("B1050", 56, 999);
        assert_eq!(carrier.mode(), 3);
        assert_eq!(carrier.codewords(3).unwrap(), [3, 8, 28, 13, 28, 44, 0, 14, 28, 62]);
        assert_eq!(StructuredCarrier::new("b1050", 56, 999).codewords(3).unwrap(), carrier.codewords(3).unwrap());
        // Only the first six characters count
        assert_eq!(
            StructuredCarrier::new("B1050 XYZ", 56, 999).codewords(3).unwrap(),
            StructuredCarrier::new("B1050 ", 56, 999).codewords(3).unwrap(),
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!(StructuredCarrier::parse("152382802840001").unwrap(), StructuredCarrier::new("152382802", 840, 1));
        assert_eq!(StructuredCarrier::parse("B1050056999").unwrap().mode(), 3);
        assert!(matches!(StructuredCarrier::parse("840001"), Err(EncodeError::InvalidConfiguration(_))));
        assert!(matches!(StructuredCarrier::parse("1234584000A"), Err(EncodeError::InvalidCharacter(_))));
        assert!(matches!(StructuredCarrier::parse("12345+84001"), Err(EncodeError::InvalidCharacter(_))));
        // a multibyte character across the two codes
        assert!(matches!(StructuredCarrier::parse("123458é001"), Err(EncodeError::InvalidCharacter(_))));
    }

    #[test]
    fn test_invalid_fields() {
        assert!(matches!(StructuredCarrier::new("1234", 1000, 1).codewords(2), Err(EncodeError::InvalidConfiguration(_))));
        assert!(matches!(StructuredCarrier::new("AB12", 840, 1).codewords(2), Err(EncodeError::InvalidCharacter(_))));
        assert!(matches!(StructuredCarrier::new("ab~", 840, 1).codewords(3), Err(EncodeError::InvalidCharacter(_))));
        assert!(matches!(StructuredCarrier::new("1234567890", 840, 1).codewords(2), Err(EncodeError::InvalidCharacter(_))));
        assert_eq!(StructuredCarrier::new("1234567890", 840, 1).mode(), 3);
    }
}
