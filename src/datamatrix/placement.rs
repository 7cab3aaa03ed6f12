//! ECC200 module placement.
//!
//! Codewords are laid out in the joined data area as 8-module "utah"
//! shapes along diagonals, with four corner shapes where the diagonals
//! wrap. The data area is then split into regions and every region gets
//! its solid L finder and dotted clock tracks.

use super::size::SymbolSize;
use crate::matrix::BitMatrix;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Module {
    Empty,
    /// Bit of a codeword, bit 0 is the most significant one
    Bit { codeword: u16, bit: u8 },
    Fixed(bool),
}

struct Mapping {
    rows: isize,
    cols: isize,
    modules: Vec<Module>,
}

impl Mapping {
    fn new(rows: usize, cols: usize) -> Self {
        Self { rows: rows as isize, cols: cols as isize, modules: vec![Module::Empty; rows * cols] }
    }

    fn get(&self, row: isize, col: isize) -> Module {
        self.modules[(row * self.cols + col) as usize]
    }

    fn is_empty(&self, row: isize, col: isize) -> bool {
        (0..self.rows).contains(&row) && (0..self.cols).contains(&col) && self.get(row, col) == Module::Empty
    }

    fn module(&mut self, mut row: isize, mut col: isize, codeword: u16, bit: u8) {
        if row < 0 {
            row += self.rows;
            col += 4 - ((self.rows + 4) % 8);
        }
        if col < 0 {
            col += self.cols;
            row += 4 - ((self.cols + 4) % 8);
        }
        debug_assert_eq!(self.get(row, col), Module::Empty);
        self.modules[(row * self.cols + col) as usize] = Module::Bit { codeword, bit };
    }

    fn utah(&mut self, row: isize, col: isize, codeword: u16) {
        let shape = [
            (row - 2, col - 2), (row - 2, col - 1),
            (row - 1, col - 2), (row - 1, col - 1), (row - 1, col),
            (row, col - 2), (row, col - 1), (row, col),
        ];
        self.shape(&shape, codeword);
    }

    fn shape(&mut self, shape: &[(isize, isize); 8], codeword: u16) {
        for (bit, &(row, col)) in shape.iter().enumerate() {
            self.module(row, col, codeword, bit as u8);
        }
    }

    fn corner(&mut self, corner: u8, codeword: u16) {
        let (r, c) = (self.rows, self.cols);
        let shape = match corner {
            1 => [(r - 1, 0), (r - 1, 1), (r - 1, 2), (0, c - 2), (0, c - 1), (1, c - 1), (2, c - 1), (3, c - 1)],
            2 => [(r - 3, 0), (r - 2, 0), (r - 1, 0), (0, c - 4), (0, c - 3), (0, c - 2), (0, c - 1), (1, c - 1)],
            3 => [(r - 3, 0), (r - 2, 0), (r - 1, 0), (0, c - 2), (0, c - 1), (1, c - 1), (2, c - 1), (3, c - 1)],
            _ => [(r - 1, 0), (r - 1, c - 1), (0, c - 3), (0, c - 2), (0, c - 1), (1, c - 3), (1, c - 2), (1, c - 1)],
        };
        self.shape(&shape, codeword);
    }

    /// Assigns every module to a codeword bit, returns the number of
    /// codewords placed.
    fn fill(&mut self) -> u16 {
        let (rows, cols) = (self.rows, self.cols);
        let mut codeword = 0;
        let (mut row, mut col) = (4, 0);
        loop {
            let corner = if row == rows && col == 0 {
                Some(1)
            } else if row == rows - 2 && col == 0 && cols % 4 != 0 {
                Some(2)
            } else if row == rows - 2 && col == 0 && cols % 8 == 4 {
                Some(3)
            } else if row == rows + 4 && col == 2 && cols % 8 == 0 {
                Some(4)
            } else {
                None
            };
            if let Some(corner) = corner {
                self.corner(corner, codeword);
                codeword += 1;
            }

            // Up and to the right
            loop {
                if self.is_empty(row, col) {
                    self.utah(row, col, codeword);
                    codeword += 1;
                }
                row -= 2;
                col += 2;
                if row < 0 || col >= cols {
                    break;
                }
            }
            row += 1;
            col += 3;

            // Down and to the left
            loop {
                if self.is_empty(row, col) {
                    self.utah(row, col, codeword);
                    codeword += 1;
                }
                row += 2;
                col -= 2;
                if row >= rows || col < 0 {
                    break;
                }
            }
            row += 3;
            col += 1;

            if row >= rows && col >= cols {
                break;
            }
        }

        // Sizes where the area is not a multiple of 8 leave the bottom
        // right 2x2 square, filled with a fixed pattern
        if self.get(rows - 1, cols - 1) == Module::Empty {
            for (r, c, on) in [(1, 1, true), (2, 2, true), (1, 2, false), (2, 1, false)] {
                self.modules[((rows - r) * cols + cols - c) as usize] = Module::Fixed(on);
            }
        }
        codeword
    }
}

/// Places `codewords` (data followed by error correction) into a matrix
/// of `size`.
pub fn place(size: &SymbolSize, codewords: &[u8]) -> BitMatrix {
    let mut mapping = Mapping::new(size.mapping_rows(), size.mapping_cols());
    let placed = mapping.fill();
    debug_assert_eq!(placed as usize, codewords.len());

    let (region_rows, region_cols) = (size.region_rows as usize, size.region_cols as usize);
    let mut matrix = BitMatrix::new(size.cols as usize, size.rows as usize);
    for y in 0..size.rows as usize {
        for x in 0..size.cols as usize {
            let (ly, lx) = (y % (region_rows + 2), x % (region_cols + 2));
            let on = if lx == 0 || ly == region_rows + 1 {
                true
            } else if ly == 0 {
                lx % 2 == 0
            } else if lx == region_cols + 1 {
                ly % 2 == 1
            } else {
                let row = y / (region_rows + 2) * region_rows + ly - 1;
                let col = x / (region_cols + 2) * region_cols + lx - 1;
                match mapping.get(row as isize, col as isize) {
                    Module::Bit { codeword, bit } => codewords.get(codeword as usize)
                        .map_or(false, |&cw| cw & (0x80 >> bit) != 0),
                    Module::Fixed(on) => on,
                    Module::Empty => false,
                }
            };
            matrix.set(x, y, on);
        }
    }
    matrix
}

#[cfg(test)]
mod tests {
    use super::{place, Mapping, Module};
    use crate::datamatrix::size::{SymbolSize, SYMBOL_SIZES};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_every_module_used_once() {
        for size in SYMBOL_SIZES {
            let mut mapping = Mapping::new(size.mapping_rows(), size.mapping_cols());
            assert_eq!(mapping.fill() as usize, size.total_codewords());
            assert!(!mapping.modules.contains(&Module::Empty));
            let bits = mapping.modules.iter().filter(|m| matches!(m, Module::Bit { .. })).count();
            assert_eq!(bits, size.total_codewords() * 8);
        }
    }

    #[test]
    fn test_first_codeword_position() {
        let mut mapping = Mapping::new(8, 8);
        mapping.fill();
        // The first utah sits with its last bit at row 4, column 0
        assert_eq!(mapping.get(4, 0), Module::Bit { codeword: 0, bit: 7 });
        assert_eq!(mapping.get(3, 0), Module::Bit { codeword: 0, bit: 4 });
        // Bits 0 and 2 wrap around to the right edge
        assert_eq!(mapping.get(2, 6), Module::Bit { codeword: 0, bit: 0 });
    }

    #[test]
    fn test_finder_and_clock() {
        let size = SymbolSize::find(10, 10).unwrap();
        let m = place(&size, &[0; 8]);
        assert_eq!(m.row_string(0), "1010101010");
        assert_eq!(m.row_string(9), "1111111111");
        let right: String = (0..10).map(|y| if m.get(9, y) { '1' } else { '0' }).collect();
        assert_eq!(right, "0101010101");
        assert_eq!(m.row_string(5), "1000000001");
    }

    #[test]
    fn test_regions_of_rectangle() {
        let size = SymbolSize::find(8, 32).unwrap();
        let m = place(&size, &[0; 21]);
        // Two regions side by side, the second finder starts at column 16
        assert!(m.get(16, 3));
        assert!(!m.get(15, 2));
        assert!(m.get(15, 3));
    }

    #[test]
    fn test_fixed_corner_pattern() {
        let size = SymbolSize::find(12, 12).unwrap();
        let m = place(&size, &[0; 12]);
        // Bottom right of the 10x10 data area
        assert!(m.get(10, 10));
        assert!(m.get(9, 9));
        assert!(!m.get(9, 10));
        assert!(!m.get(10, 9));
    }
}
