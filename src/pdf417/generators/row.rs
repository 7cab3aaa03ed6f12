use core::iter;
use crate::pdf417::generators::pattern::Pattern;

pub const START_PAT: Pattern = Pattern::new(0b11111111010101000, 17);
pub const   END_PAT: Pattern = Pattern::new(0b111111101000101001, 18);

/// Marks rows whose layout depends on the number of columns and rows only
/// (PDF417 and truncated PDF417).
pub trait FreeSize {}
/// Marks rows whose layout is fixed by a symbol variant (MicroPDF417).
pub trait FixedSize {}

/// Iterator over the patterns of one symbol row.
pub trait Row<'a>: iter::Iterator<Item = Pattern> + Clone {
    type Info: Copy + 'static; // info must be cheap to copy
    /// Suggested (x, y) scale to render a module with the right aspect.
    const DEFAULT_SCALE: (u16, u16);

    fn init(codewords: &'a [u16], row: u8, infos: Self::Info) -> Self;
    fn prepare(dimensions: (u8, u8), level: u8) -> Self::Info;
    /// Row width in modules for `cols` data columns.
    fn width(cols: u8) -> usize;
}
