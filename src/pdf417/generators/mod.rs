//! Row generators: each symbol row as a sequence of module patterns.

pub mod micro_pdf417;
pub mod pattern;
pub mod pdf417;
pub mod row;

pub use micro_pdf417::MicroPDF417Row;

/// Full width PDF417 row.
pub type PDF417Row<'a> = pdf417::PDF417Row<'a, false>;
/// Row without the right indicator, its stop pattern is a single bar.
pub type TruncatedPDF417Row<'a> = pdf417::PDF417Row<'a, true>;
