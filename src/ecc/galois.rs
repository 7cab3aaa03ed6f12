//! Reed-Solomon encoder over GF(2^m), m <= 8.
//!
//! The field is described by its generator polynomial `gfpoly`, the first
//! consecutive root `fcr` and the primitive element `prim` used to step
//! between roots. Symbols are kept in `u8`, tables in index (log) form.

use crate::error::{EncodeError, Result};

#[derive(Debug, Clone)]
pub struct ReedSolomon {
    symsize: u8,
    nn: usize,
    alpha_to: Vec<u8>,
    index_of: Vec<u16>,
    genpoly: Vec<u16>,
    nroots: usize,
    pad: usize,
}

impl ReedSolomon {
    /// Data Matrix ECC200: GF(256), x^8+x^5+x^3+x^2+1, roots a^1..a^n.
    pub fn data_matrix(nroots: usize) -> Result<Self> {
        Self::new(8, 0x12d, 1, 1, nroots, 0)
    }

    /// QR Code: GF(256), x^8+x^4+x^3+x^2+1, roots a^0..a^(n-1).
    pub fn qr(nroots: usize) -> Result<Self> {
        Self::new(8, 0x11d, 0, 1, nroots, 0)
    }

    /// MaxiCode: GF(64), x^6+x+1, roots a^1..a^n.
    pub fn maxicode(nroots: usize) -> Result<Self> {
        Self::new(6, 0x43, 1, 1, nroots, 0)
    }

    /// Builds the log/antilog tables and the generator polynomial. `pad` is
    /// the number of leading symbols of a shortened code, it only bounds the
    /// message length accepted by [ReedSolomon::encode].
    pub fn new(symsize: u8, gfpoly: u32, fcr: usize, prim: usize, nroots: usize, pad: usize) -> Result<Self> {
        if symsize == 0 || symsize > 8 {
            return Err(EncodeError::InvalidField(format!("symbol size {symsize} is not in 1..=8")));
        }
        let nn = (1usize << symsize) - 1;
        if fcr > nn {
            return Err(EncodeError::InvalidField(format!("first root {fcr} is outside the field")));
        }
        if prim == 0 || prim > nn {
            return Err(EncodeError::InvalidField(format!("primitive element {prim} is outside the field")));
        }
        if nroots > nn {
            return Err(EncodeError::InvalidField(format!("{nroots} roots do not fit GF(2^{symsize})")));
        }
        if pad > nn - nroots {
            return Err(EncodeError::InvalidField(format!("padding {pad} is too large")));
        }

        let mut alpha_to = vec![0u8; nn + 1];
        let mut index_of = vec![0u16; nn + 1];
        index_of[0] = nn as u16; // log(0) = -inf
        alpha_to[nn] = 0;

        let mut sr: u32 = 1;
        for i in 0..nn {
            index_of[sr as usize] = i as u16;
            alpha_to[i] = sr as u8;
            sr <<= 1;
            if sr & (1 << symsize) != 0 {
                sr ^= gfpoly;
            }
            sr &= nn as u32;
        }
        if sr != 1 {
            return Err(EncodeError::InvalidField(format!("polynomial {gfpoly:#x} is not primitive")));
        }

        let modnn = |x: usize| x % nn;

        let mut genpoly = vec![0u16; nroots + 1];
        genpoly[0] = 1;
        let mut root = fcr * prim;
        for i in 0..nroots {
            genpoly[i + 1] = 1;
            // multiply genpoly by (x + a^root)
            for j in (1..=i).rev() {
                genpoly[j] = if genpoly[j] != 0 {
                    genpoly[j - 1] ^ alpha_to[modnn(index_of[genpoly[j] as usize] as usize + root)] as u16
                } else {
                    genpoly[j - 1]
                };
            }
            genpoly[0] = alpha_to[modnn(index_of[genpoly[0] as usize] as usize + root)] as u16;
            root += prim;
        }
        // keep the generator in index form for encoding
        for g in genpoly.iter_mut() {
            *g = index_of[*g as usize];
        }

        Ok(Self { symsize, nn, alpha_to, index_of, genpoly, nroots, pad })
    }

    #[inline]
    pub fn symsize(&self) -> u8 {
        self.symsize
    }

    #[inline]
    pub fn nroots(&self) -> usize {
        self.nroots
    }

    /// Maximum message length for this (possibly shortened) code.
    #[inline]
    pub fn max_data(&self) -> usize {
        self.nn - self.nroots - self.pad
    }

    /// Computes the parity symbols of `data`, highest order coefficient
    /// first, ready to be appended to the message.
    pub fn encode(&self, data: &[u8]) -> Vec<u8> {
        let mut parity = vec![0u8; self.nroots];
        self.encode_into(data, &mut parity);
        parity
    }

    /// Same as [ReedSolomon::encode] but writes into `parity`, which must
    /// be exactly `nroots` long.
    pub fn encode_into(&self, data: &[u8], parity: &mut [u8]) {
        debug_assert_eq!(parity.len(), self.nroots, "parity buffer must hold nroots symbols");
        debug_assert!(data.len() <= self.max_data(), "message is longer than the code");
        parity.fill(0);
        if self.nroots == 0 {
            return;
        }

        let nn = self.nn;
        let a0 = nn as u16;
        let last = self.nroots - 1;
        for &d in data {
            let feedback = self.index_of[(d ^ parity[0]) as usize];
            if feedback != a0 {
                for j in 1..self.nroots {
                    let g = self.genpoly[self.nroots - j] as usize;
                    parity[j] ^= self.alpha_to[(feedback as usize + g) % nn];
                }
            }
            parity.copy_within(1.., 0);
            parity[last] = if feedback != a0 {
                self.alpha_to[(feedback as usize + self.genpoly[0] as usize) % nn]
            } else {
                0
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ReedSolomon;
    use crate::error::EncodeError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_data_matrix_123456() {
        let rs = ReedSolomon::data_matrix(5).unwrap();
        assert_eq!(rs.encode(&[142, 164, 186]), vec![114, 25, 5, 88, 102]);
    }

    #[test]
    fn test_data_matrix_parity_is_stable() {
        let rs = ReedSolomon::data_matrix(5).unwrap();
        let first = rs.encode(&[1, 2, 3]);
        assert_eq!(first, vec![53, 46, 95, 0, 75]);
        assert_eq!(rs.encode(&[1, 2, 3]), first);
    }

    #[test]
    fn test_qr_hello_world_1m() {
        let rs = ReedSolomon::qr(10).unwrap();
        let data = [32, 91, 11, 120, 209, 114, 220, 77, 67, 64, 236, 17, 236, 17, 236, 17];
        assert_eq!(rs.encode(&data), vec![196, 35, 39, 119, 235, 215, 231, 226, 93, 23]);
    }

    #[test]
    fn test_zero_message_has_zero_parity() {
        let rs = ReedSolomon::maxicode(10).unwrap();
        assert_eq!(rs.encode(&[0; 10]), vec![0; 10]);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(ReedSolomon::new(9, 0x211, 1, 1, 4, 0), Err(EncodeError::InvalidField(_))));
        assert!(matches!(ReedSolomon::new(0, 0x3, 1, 1, 4, 0), Err(EncodeError::InvalidField(_))));
        assert!(matches!(ReedSolomon::new(8, 0x12d, 300, 1, 4, 0), Err(EncodeError::InvalidField(_))));
        assert!(matches!(ReedSolomon::new(8, 0x12d, 1, 0, 4, 0), Err(EncodeError::InvalidField(_))));
        assert!(matches!(ReedSolomon::new(4, 0x13, 1, 1, 16, 0), Err(EncodeError::InvalidField(_))));
    }

    #[test]
    fn test_non_primitive_polynomial() {
        // x^8 + 1 cycles back to 1 long before 255 steps
        assert!(matches!(ReedSolomon::new(8, 0x101, 1, 1, 4, 0), Err(EncodeError::InvalidField(_))));
    }
}
