//! Error correction for PDF417 and MicroPDF417: polynomial division modulo
//! the prime 929 with the generator (x - 3)(x - 3^2)...(x - 3^k).

/// Number of error correction codewords for a PDF417 security level.
pub const fn ecc_count(level: u8) -> usize {
    assert!(level < 9, "ECC level must be between 0 and 8 inclusive");
    1 << (level as usize + 1)
}

/// Coefficients of the generator polynomial of degree `k`, lowest degree
/// first, without the leading 1.
pub fn generator(k: usize) -> Vec<u16> {
    let mut g = vec![0u32; k + 1];
    g[0] = 1;
    let mut root = 1u32;
    for i in 0..k {
        root = root * 3 % 929;
        // g *= (x - root)
        for j in (1..=i + 1).rev() {
            g[j] = (g[j - 1] + 929 * 929 - root * g[j]) % 929;
        }
        g[0] = (929 - root * g[0] % 929) % 929;
    }
    g.truncate(k);
    g.into_iter().map(|c| c as u16).collect()
}

/// Fills the last `k` codewords of `codewords` with the error correction
/// codewords computed over all the preceding ones.
pub fn generate_ecc(codewords: &mut [u16], k: usize) {
    let factors = generator(k);
    debug_assert!(codewords.len() >= k);
    let (data, ecc) = codewords.split_at_mut(codewords.len() - k);
    ecc.fill(0);

    for cw in data {
        let t = (*cw + ecc[0]) % 929;

        for i in (0..k).rev() {
            let factor = ((t as usize * factors[i] as usize) % 929) as u16;
            let d = if i > 0 { ecc[k - i] } else { 0 };
            ecc[k - 1 - i] = (d + 929 - factor) % 929;
        }
    }

    for e in ecc {
        if *e != 0 {
            *e = 929 - *e;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ecc_count, generate_ecc, generator};
    use pretty_assertions::assert_eq;

    const INPUT_DATA: [u16; 16] = [16, 902, 1, 278, 827, 900, 295, 902, 2, 326, 823, 544, 900, 149, 900, 900];

    fn ecc_of(level: u8) -> Vec<u16> {
        let k = ecc_count(level);
        let mut data = vec![0u16; INPUT_DATA.len() + k];
        data[..INPUT_DATA.len()].copy_from_slice(&INPUT_DATA);
        generate_ecc(&mut data, k);
        data[INPUT_DATA.len()..].to_vec()
    }

    #[test]
    fn test_generator_level_0() {
        // x^2 - 12x + 27
        assert_eq!(generator(2), vec![27, 917]);
    }

    #[test]
    fn test_ecc_l0() {
        assert_eq!(ecc_of(0), vec![156, 765]);
    }

    #[test]
    fn test_ecc_l1() {
        assert_eq!(ecc_of(1), vec![168, 875, 63, 355]);
    }

    #[test]
    fn test_ecc_l2() {
        assert_eq!(ecc_of(2), vec![628, 715, 393, 299, 863, 601, 169, 708]);
    }

    #[test]
    fn test_ecc_l3() {
        assert_eq!(ecc_of(3), vec![232, 176, 793, 616, 476, 406, 855, 445, 84, 518, 522, 721, 607, 2, 42, 578]);
    }

    #[test]
    fn test_ecc_l4() {
        assert_eq!(ecc_of(4), vec![281, 156, 276, 668, 44, 252, 877, 30, 549, 856, 773, 639, 420, 330, 693, 329, 283, 723, 480, 482, 102, 925, 535, 892, 374, 472, 837, 331, 343, 608, 390, 364]);
    }

    #[test]
    fn test_micro_ecc_seven_codewords() {
        let mut codewords = vec![900, 19 * 30 + 27, 4 * 30 + 18, 19 * 30 + 29, 902, 142, 142, 901, 169, 883, 224, 680, 517, 32, 98, 105, 110];
        codewords.resize(codewords.len() + 7, 0);
        generate_ecc(&mut codewords, 7);
        assert_eq!(codewords[17..], [383, 745, 811, 163, 659, 400, 129]);
    }
}
