//! Splits a message into text, numeric and byte compaction chunks.
//!
//! The automatic plan first classifies every byte, groups equal classes
//! into runs, then folds short runs into their neighbours when switching
//! modes would cost more than it saves. The thresholds are fixed rules and
//! not a search for the shortest codeword sequence.

use core::ops::Range;

use log::trace;

use crate::error::{EncodeError, Result};

/// Compaction requested for a PDF417 or MicroPDF417 message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Compaction {
    /// Mix text, numeric and byte compaction as the data requires
    #[default]
    Auto,
    /// Text compaction only (printable ASCII, tab, CR and LF)
    Text,
    /// Numeric compaction only (digits)
    Numeric,
    /// Byte compaction for the whole message
    Byte,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkMode {
    Numeric,
    Text,
    Byte,
}

/// A run of input bytes encoded with a single compaction mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub mode: ChunkMode,
    pub range: Range<usize>,
}

impl Chunk {
    #[inline]
    pub fn len(&self) -> usize {
        self.range.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

#[inline]
pub fn is_text(c: u8) -> bool {
    matches!(c, b' '..=b'~' | b'\t' | b'\r' | b'\n')
}

fn classify(c: u8) -> ChunkMode {
    if c.is_ascii_digit() {
        ChunkMode::Numeric
    } else if is_text(c) {
        ChunkMode::Text
    } else {
        ChunkMode::Byte
    }
}

/// Computes the chunks of `data` for the requested compaction.
pub fn plan(data: &[u8], compaction: Compaction) -> Result<Vec<Chunk>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }

    let forced = match compaction {
        Compaction::Auto => None,
        Compaction::Text => Some(ChunkMode::Text),
        Compaction::Numeric => Some(ChunkMode::Numeric),
        Compaction::Byte => Some(ChunkMode::Byte),
    };

    if let Some(mode) = forced {
        let allowed = |c: u8| match mode {
            ChunkMode::Numeric => c.is_ascii_digit(),
            ChunkMode::Text => is_text(c),
            ChunkMode::Byte => true,
        };
        if let Some(pos) = data.iter().position(|&c| !allowed(c)) {
            return Err(EncodeError::InvalidCharacter(format!(
                "byte {:#04x} at {pos} can not be encoded with {mode:?} compaction", data[pos])));
        }
        return Ok(vec![Chunk { mode, range: 0..data.len() }]);
    }

    let mut chunks = runs(data);
    reclassify(&mut chunks, ChunkMode::Numeric);
    merge(&mut chunks);
    reclassify(&mut chunks, ChunkMode::Text);
    merge(&mut chunks);

    trace!("pdf417 compaction plan: {:?}", chunks.iter().map(|c| (c.mode, c.len())).collect::<Vec<_>>());
    Ok(chunks)
}

fn runs(data: &[u8]) -> Vec<Chunk> {
    let mut chunks: Vec<Chunk> = Vec::new();
    for (i, &c) in data.iter().enumerate() {
        let mode = classify(c);
        match chunks.last_mut() {
            Some(last) if last.mode == mode => last.range.end = i + 1,
            _ => chunks.push(Chunk { mode, range: i..i + 1 }),
        }
    }
    chunks
}

fn reclassify(chunks: &mut [Chunk], mode: ChunkMode) {
    let modes: Vec<ChunkMode> = chunks.iter().map(|c| c.mode).collect();
    for (i, chunk) in chunks.iter_mut().enumerate() {
        if chunk.mode != mode {
            continue;
        }
        let prev = i.checked_sub(1).map(|p| modes[p]);
        let next = modes.get(i + 1).copied();
        let count = |m: ChunkMode| [prev, next].iter().filter(|&&n| n == Some(m)).count();
        let len = chunk.len();

        chunk.mode = match mode {
            ChunkMode::Numeric => match (count(ChunkMode::Text), count(ChunkMode::Byte)) {
                (2, _) if len < 8 => ChunkMode::Text,
                (1, _) if len < 7 => ChunkMode::Text,
                (_, 2) if len < 5 => ChunkMode::Byte,
                (_, 1) if len < 4 => ChunkMode::Byte,
                _ => ChunkMode::Numeric,
            },
            ChunkMode::Text => match count(ChunkMode::Byte) {
                2 if len < 5 => ChunkMode::Byte,
                1 if len < 3 => ChunkMode::Byte,
                _ => ChunkMode::Text,
            },
            ChunkMode::Byte => ChunkMode::Byte,
        };
    }
}

fn merge(chunks: &mut Vec<Chunk>) {
    let mut merged: Vec<Chunk> = Vec::with_capacity(chunks.len());
    for chunk in chunks.drain(..) {
        match merged.last_mut() {
            Some(last) if last.mode == chunk.mode => last.range.end = chunk.range.end,
            _ => merged.push(chunk),
        }
    }
    *chunks = merged;
}

#[cfg(test)]
mod tests {
    use super::{plan, Chunk, ChunkMode::*, Compaction};
    use crate::error::EncodeError;
    use pretty_assertions::assert_eq;

    fn modes(data: &[u8]) -> Vec<(super::ChunkMode, usize)> {
        plan(data, Compaction::Auto).unwrap().iter().map(|c| (c.mode, c.len())).collect()
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(modes(b"HELLO"), vec![(Text, 5)]);
    }

    #[test]
    fn test_short_number_stays_in_text() {
        assert_eq!(modes(b"Room 1234 is free"), vec![(Text, 17)]);
    }

    #[test]
    fn test_long_number_between_text() {
        assert_eq!(modes(b"id 12345678 ok"), vec![(Text, 3), (Numeric, 8), (Text, 3)]);
    }

    #[test]
    fn test_number_at_the_edge() {
        assert_eq!(modes(b"ab123456"), vec![(Text, 8)]);
        assert_eq!(modes(b"ab1234567"), vec![(Text, 2), (Numeric, 7)]);
    }

    #[test]
    fn test_short_runs_between_bytes() {
        assert_eq!(modes(b"\x80\x8112\x82"), vec![(Byte, 5)]);
        assert_eq!(modes(b"\x80ab\x81"), vec![(Byte, 4)]);
        assert_eq!(modes(b"\x80abcde\x81"), vec![(Byte, 1), (Text, 5), (Byte, 1)]);
    }

    #[test]
    fn test_forced_numeric_rejects_letters() {
        assert!(matches!(plan(b"12a4", Compaction::Numeric), Err(EncodeError::InvalidCharacter(_))));
        assert_eq!(plan(b"1234", Compaction::Numeric).unwrap(), vec![Chunk { mode: Numeric, range: 0..4 }]);
    }

    #[test]
    fn test_forced_text_rejects_binary() {
        assert!(matches!(plan(b"ab\x00", Compaction::Text), Err(EncodeError::InvalidCharacter(_))));
    }

    #[test]
    fn test_forced_byte_accepts_anything() {
        assert_eq!(plan(b"a1\xff", Compaction::Byte).unwrap(), vec![Chunk { mode: Byte, range: 0..3 }]);
    }
}
