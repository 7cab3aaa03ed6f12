//! Module matrix shared by every symbology and the render helper handed to
//! renderers.

use core::iter;

/// Row-major grid of modules, `true` is a dark module (bar).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BitMatrix {
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

impl BitMatrix {
    /// Creates a light matrix of `width` × `height` modules.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, bits: vec![false; width * height] }
    }

    /// Builds a matrix from row-major modules. Returns None when the number
    /// of modules does not match the dimensions.
    pub fn from_bits(width: usize, height: usize, bits: Vec<bool>) -> Option<Self> {
        (bits.len() == width * height).then_some(Self { width, height, bits })
    }

    #[inline]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub const fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        debug_assert!(x < self.width && y < self.height);
        self.bits[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        debug_assert!(x < self.width && y < self.height);
        self.bits[y * self.width + x] = on;
    }

    /// All the modules, row after row.
    #[inline]
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + Clone {
        self.bits.chunks_exact(self.width.max(1))
    }

    /// Row `y` as a string of `'1'` (dark) and `'0'` (light), one character
    /// per module.
    pub fn row_string(&self, y: usize) -> String {
        let start = y * self.width;
        self.bits[start..start + self.width]
            .iter()
            .map(|&on| if on { '1' } else { '0' })
            .collect()
    }

    /// Number of dark modules.
    pub fn count_dark(&self) -> usize {
        self.bits.iter().filter(|&&on| on).count()
    }

    /// Render helper with a scale of one pixel per module.
    pub const fn render(&self) -> Render<'_> {
        Render { matrix: self, scale: (1, 1), inverted: false }
    }
}

/// Scaled (and optionally inverted) view of a [BitMatrix] used to fill
/// pixel buffers.
#[derive(Debug, Clone)]
pub struct Render<'a> {
    matrix: &'a BitMatrix,
    scale: (u16, u16),
    inverted: bool,
}

impl<'a> Render<'a> {
    pub fn width(&self) -> usize {
        self.matrix.width * self.scale.0 as usize
    }

    pub fn height(&self) -> usize {
        self.matrix.height * self.scale.1 as usize
    }

    /// Returns the scale as (Scale X axis, Scale Y axis).
    pub const fn scale(&self) -> (u16, u16) {
        self.scale
    }

    /// Sets the scale on both axis.
    pub const fn set_scale(mut self, scale: (u16, u16)) -> Self {
        self.scale = scale;
        self
    }

    /// Returns if the matrix is set to be rendered with inverted colors.
    pub const fn inverted(&self) -> bool {
        self.inverted
    }

    /// Marks whether the matrix should be rendered with pixel values inverted.
    pub const fn set_inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    pub fn bits(&self) -> impl Iterator<Item = bool> + 'a {
        let (sx, sy) = (self.scale.0 as usize, self.scale.1 as usize);
        let invert = self.inverted;
        self.matrix.rows()
            .flat_map(move |row| iter::repeat(row).take(sy))
            .flatten()
            .flat_map(move |&bit| iter::repeat(bit ^ invert).take(sx))
    }

    pub fn fill<P: Clone>(&self, target: &mut [P], on: &P, off: &P) {
        for (pixel, bit) in target.iter_mut().zip(self.bits()) {
            *pixel = if bit { on.clone() } else { off.clone() };
        }
    }

    pub fn fill_bits(&self, target: &mut [bool]) {
        self.fill(target, &true, &false);
    }

    /// Packs the pixels MSB first, eight per byte, rows are not byte
    /// aligned.
    pub fn fill_bitmap(&self, target: &mut [u8]) {
        for (i, bit) in self.bits().enumerate() {
            let Some(byte) = target.get_mut(i / 8) else { break };
            let mask = 0x80 >> (i % 8);
            if bit {
                *byte |= mask;
            } else {
                *byte &= !mask;
            }
        }
    }
}

#[cfg(feature = "embedded-graphics")]
mod graphics {
    use super::{BitMatrix, Render};
    use embedded_graphics::{pixelcolor::BinaryColor, prelude::*, Pixel};

    impl OriginDimensions for Render<'_> {
        fn size(&self) -> Size {
            Size::new(self.width() as u32, self.height() as u32)
        }
    }

    impl Drawable for Render<'_> {
        type Color = BinaryColor;
        type Output = ();

        fn draw<D>(&self, target: &mut D) -> Result<Self::Output, D::Error>
        where
            D: DrawTarget<Color = Self::Color>,
        {
            let width = self.width().max(1);
            target.draw_iter(self.bits().enumerate().map(|(i, on)| {
                let point = Point::new((i % width) as i32, (i / width) as i32);
                Pixel(point, if on { BinaryColor::On } else { BinaryColor::Off })
            }))
        }
    }

    impl Drawable for BitMatrix {
        type Color = BinaryColor;
        type Output = ();

        fn draw<D>(&self, target: &mut D) -> Result<Self::Output, D::Error>
        where
            D: DrawTarget<Color = Self::Color>,
        {
            self.render().draw(target)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BitMatrix;
    use pretty_assertions::assert_eq;

    fn sample() -> BitMatrix {
        let mut m = BitMatrix::new(3, 2);
        m.set(0, 0, true);
        m.set(2, 1, true);
        m
    }

    #[test]
    fn test_row_strings() {
        let m = sample();
        assert_eq!(m.row_string(0), "100");
        assert_eq!(m.row_string(1), "001");
        assert_eq!(m.rows().count(), 2);
        assert_eq!(m.count_dark(), 2);
    }

    #[test]
    fn test_from_bits_checks_dimensions() {
        assert!(BitMatrix::from_bits(2, 2, vec![false; 3]).is_none());
        let m = BitMatrix::from_bits(2, 1, vec![true, false]).unwrap();
        assert!(m.get(0, 0));
    }

    #[test]
    fn test_scaled_bits() {
        let m = sample();
        let r = m.render().set_scale((2, 2));
        assert_eq!((r.width(), r.height()), (6, 4));
        let bits: Vec<bool> = r.bits().collect();
        assert_eq!(&bits[..6], &[true, true, false, false, false, false]);
        assert_eq!(&bits[6..12], &bits[..6]);
        assert_eq!(&bits[18..], &[false, false, false, false, true, true]);
    }

    #[test]
    fn test_fill_inverted() {
        let m = sample();
        let mut pixels = [0u8; 6];
        m.render().set_inverted(true).fill(&mut pixels, &b'#', &b' ');
        assert_eq!(&pixels, b" #### ");
    }

    #[test]
    fn test_fill_bitmap() {
        let mut m = BitMatrix::new(9, 1);
        m.set(0, 0, true);
        m.set(8, 0, true);
        let mut bitmap = [0u8; 2];
        m.render().fill_bitmap(&mut bitmap);
        assert_eq!(bitmap, [0x80, 0x80]);
    }
}
