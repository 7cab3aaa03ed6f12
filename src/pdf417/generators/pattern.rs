use core::iter;

/// A run of at most 24 modules (bars and spaces), drawn from the most
/// significant bit down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern {
    bits: u32,
    len: u8,
}

impl Pattern {
    pub const fn new(bits: u32, len: u8) -> Self {
        debug_assert!(len <= 24, "a pattern holds 24 modules at most");
        Self { bits, len }
    }

    /// Number of modules.
    #[inline]
    pub const fn len(&self) -> u8 {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn bits(&self) -> u32 {
        self.bits
    }
}

impl IntoIterator for Pattern {
    type Item = bool;
    type IntoIter = Modules;

    fn into_iter(self) -> Modules {
        Modules { bits: self.bits, remaining: self.len as u32 }
    }
}

/// Modules of a [Pattern], `true` for a bar.
#[derive(Debug, Clone)]
pub struct Modules {
    bits: u32,
    remaining: u32,
}

impl Iterator for Modules {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        self.remaining = self.remaining.checked_sub(1)?;
        Some((self.bits >> self.remaining) & 1 != 0)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining as usize, Some(self.remaining as usize))
    }
}

impl DoubleEndedIterator for Modules {
    fn next_back(&mut self) -> Option<bool> {
        self.remaining = self.remaining.checked_sub(1)?;
        let bar = self.bits & 1 != 0;
        self.bits >>= 1;
        Some(bar)
    }
}

impl ExactSizeIterator for Modules {}
impl iter::FusedIterator for Modules {}
