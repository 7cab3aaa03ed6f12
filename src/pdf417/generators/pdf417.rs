use core::iter;

use crate::pdf417::tables::CODEWORDS;
use crate::pdf417::generators::row::{Row, FreeSize, START_PAT, END_PAT};
use crate::pdf417::generators::pattern::Pattern;

macro_rules! cw {
    ($tb:expr, $val:expr) => {
        Pattern::new((1 << 16) | CODEWORDS[$tb as usize][$val as usize] as u32, 17)
    }
}

#[derive(Clone)]
enum RowPattern {
    Start,
    Left,
    Data,
    Right,
    End,
    None,
}

/// One row of a PDF417: start pattern, left row indicator, data codewords,
/// right row indicator and stop pattern. A truncated row ends after the
/// data with a single bar.
#[derive(Clone)]
pub struct PDF417Row<'a, const TRUNCATED: bool> {
    codewords: &'a [u16],
    next_pat: RowPattern,
    table: u8,
    /// (left, right)
    markers: (u16, u16)
}

impl<'a, const TRUNCATED: bool> FreeSize for PDF417Row<'a, TRUNCATED> {}

impl<'a, const TRUNCATED: bool> Row<'a> for PDF417Row<'a, TRUNCATED> {
    type Info = (u8, u8, u8);
    const DEFAULT_SCALE: (u16, u16) = (1, 3);

    fn init(codewords: &'a [u16], row: u8, infos: Self::Info) -> Self {
        let (rows_val, cols_val, level_val) = infos;
        let table = row % 3;
        let row_id = (row / 3) as u16 * 30;

        let (left, right) = match table {
            0 => (rows_val, cols_val),
            1 => (level_val, rows_val),
            _ => (cols_val, level_val),
        };
        Self {
            codewords,
            table,
            markers: (left as u16 + row_id, right as u16 + row_id),
            next_pat: RowPattern::Start
        }
    }

    fn prepare((rows, cols): (u8, u8), level: u8) -> Self::Info {
        let rows_val = (rows - 1) / 3;
        let cols_val = cols - 1;
        let level_val = level * 3 + (rows - 1) % 3;
        (rows_val, cols_val, level_val)
    }

    fn width(cols: u8) -> usize {
        let data = 17 * cols as usize;
        if TRUNCATED {
            17 + 17 + data + 1
        } else {
            17 + 17 + data + 17 + 18
        }
    }
}

impl<'a, const TRUNCATED: bool> iter::Iterator for PDF417Row<'a, TRUNCATED> {
    type Item = Pattern;

    fn next(&mut self) -> Option<Self::Item> {
        let (item, next) = match self.next_pat {
            RowPattern::Start => (START_PAT, RowPattern::Left),
            RowPattern::Left => (cw!(self.table, self.markers.0), RowPattern::Data),
            RowPattern::Data => {
                let (&cw, rest) = self.codewords.split_first()?;
                self.codewords = rest;

                let next = match (rest.is_empty(), TRUNCATED) {
                    (false, _) => RowPattern::Data,
                    (true, false) => RowPattern::Right,
                    (true, true) => RowPattern::End,
                };

                (cw!(self.table, cw), next)
            },
            RowPattern::Right => (cw!(self.table, self.markers.1), RowPattern::End),
            RowPattern::End if TRUNCATED => (Pattern::new(1, 1), RowPattern::None),
            RowPattern::End => (END_PAT, RowPattern::None),
            RowPattern::None => return None,
        };

        self.next_pat = next;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let right = if TRUNCATED { 0 } else { 1 };
        let count = self.codewords.len() + match self.next_pat {
            RowPattern::Start => 3 + right,
            RowPattern::Left  => 2 + right,
            RowPattern::Data  => 1 + right,
            RowPattern::Right => 2,
            RowPattern::End   => 1,
            RowPattern::None  => 0,
        };
        (count, Some(count))
    }
}

impl<'a, const TRUNCATED: bool> ExactSizeIterator for PDF417Row<'a, TRUNCATED> {}
impl<'a, const TRUNCATED: bool> iter::FusedIterator for PDF417Row<'a, TRUNCATED> {}

#[cfg(test)]
mod tests {
    use super::super::{PDF417Row, TruncatedPDF417Row};
    use super::super::row::Row;
    use crate::pdf417::tables::CODEWORDS;

    fn bits<'a, R: Row<'a>>(row: R) -> String {
        row.flatten().map(|on| if on { '1' } else { '0' }).collect()
    }

    fn pattern(table: usize, cw: u16) -> String {
        format!("{:017b}", (1 << 16) | CODEWORDS[table][cw as usize] as u32)
    }

    #[test]
    fn test_row_layout() {
        let infos = PDF417Row::prepare((6, 2), 1);
        assert_eq!(infos, (1, 1, 5));

        let row = PDF417Row::init(&[10, 20], 0, infos);
        assert_eq!(row.len(), 6);
        let s = bits(row);
        assert_eq!(s.len(), PDF417Row::width(2));
        assert_eq!(&s[..17], "11111111010101000");
        assert_eq!(&s[17..34], pattern(0, 1));
        assert_eq!(&s[34..51], pattern(0, 10));
        assert_eq!(&s[51..68], pattern(0, 20));
        assert_eq!(&s[68..85], pattern(0, 1));
        assert_eq!(&s[85..], "111111101000101001");
    }

    #[test]
    fn test_row_indicators_per_cluster() {
        let infos = PDF417Row::prepare((6, 2), 1);
        // row 4 is in cluster 1 of the second group of three rows
        let s = bits(PDF417Row::init(&[0, 0], 4, infos));
        assert_eq!(&s[17..34], pattern(1, 30 + 5));
        assert_eq!(&s[68..85], pattern(1, 30 + 1));
        let s = bits(PDF417Row::init(&[0, 0], 2, infos));
        assert_eq!(&s[17..34], pattern(2, 1));
        assert_eq!(&s[68..85], pattern(2, 5));
    }

    #[test]
    fn test_truncated_row() {
        let infos = TruncatedPDF417Row::prepare((3, 1), 0);
        let row = TruncatedPDF417Row::init(&[42], 1, infos);
        assert_eq!(row.len(), 4);
        let s = bits(row);
        assert_eq!(s.len(), TruncatedPDF417Row::width(1));
        assert_eq!(&s[34..51], pattern(1, 42));
        assert!(s.ends_with('1'));
    }
}
