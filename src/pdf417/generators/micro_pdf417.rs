use core::iter;

use crate::pdf417::tables::{CODEWORDS, M_PDF417_VARIANTS, MicroVariant, RAP_CENTER, RAP_SIDE};
use crate::pdf417::generators::{row::{Row, FixedSize}, pattern::Pattern};

macro_rules! cw {
    ($tb:expr, $val:expr) => {
        Pattern::new((1 << 16) | CODEWORDS[$tb as usize][$val as usize] as u32, 17)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slot {
    Left,
    Data,
    Center,
    Right,
}

/// Row layouts for 1 to 4 data columns.
const LAYOUTS: [&[Slot]; 4] = {
    use Slot::*;
    [
        &[Left, Data, Right],
        &[Left, Data, Data, Right],
        &[Left, Data, Center, Data, Data, Right],
        &[Left, Data, Data, Center, Data, Data, Right],
    ]
};

/// One MicroPDF417 row: row address patterns around the data codewords and
/// a closing single bar after the right pattern.
#[derive(Clone)]
pub struct MicroPDF417Row<'a> {
    codewords: &'a [u16],
    layout: &'static [Slot],

    left: u8,
    center: u8,
    right: u8,
    table: u8,
}

impl<'a> FixedSize for MicroPDF417Row<'a> {}

impl<'a> Row<'a> for MicroPDF417Row<'a> {
    type Info = MicroVariant;
    const DEFAULT_SCALE: (u16, u16) = (1, 2);

    fn init(codewords: &'a [u16], row: u8, infos: Self::Info) -> Self {
        let (left, center, right) = infos.rap;
        let layout = LAYOUTS[(infos.cols.clamp(1, 4) - 1) as usize];
        // RAPs are numbered 1 to 52, keep them zero based
        let advance = |rap: u8| ((rap.max(1) - 1) as usize + row as usize) % 52;
        Self {
            codewords,
            layout,
            left: advance(left) as u8,
            center: advance(center) as u8,
            right: advance(right) as u8,
            table: (infos.cluster + row) % 3,
        }
    }

    /// `variant` is the index of the variant in the variant table.
    fn prepare(_dimensions: (u8, u8), variant: u8) -> Self::Info {
        M_PDF417_VARIANTS[variant as usize]
    }

    fn width(cols: u8) -> usize {
        LAYOUTS[(cols.clamp(1, 4) - 1) as usize].iter()
            .map(|slot| match slot {
                Slot::Left | Slot::Center => 10,
                Slot::Data => 17,
                Slot::Right => 11,
            })
            .sum()
    }
}

impl<'a> iter::Iterator for MicroPDF417Row<'a> {
    type Item = Pattern;

    fn next(&mut self) -> Option<Self::Item> {
        let (&slot, rest) = self.layout.split_first()?;
        self.layout = rest;

        Some(match slot {
            Slot::Left => Pattern::new(RAP_SIDE[self.left as usize] as u32, 10),
            Slot::Center => Pattern::new(RAP_CENTER[self.center as usize] as u32, 10),
            // right pattern followed by the stop bar
            Slot::Right => Pattern::new(((RAP_SIDE[self.right as usize] as u32) << 1) | 1, 11),
            Slot::Data => {
                let (&cw, rest) = self.codewords.split_first()?;
                self.codewords = rest;
                cw!(self.table, cw)
            },
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.layout.len();
        (count, Some(count))
    }
}

impl<'a> ExactSizeIterator for MicroPDF417Row<'a> {}
impl<'a> iter::FusedIterator for MicroPDF417Row<'a> {}
