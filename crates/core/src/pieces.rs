//! Pieces module - Tetromino shape matrices and clockwise rotation
//!
//! Each piece is a small boolean matrix (at most 4x4) anchored at its top-left
//! corner. Rotation produces a new matrix; the base shapes are constants and
//! are never mutated.

use crate::types::PieceKind;

/// Largest side of any tetromino matrix
pub const MAX_SHAPE_SIDE: usize = 4;

/// Occupancy matrix of a piece in one orientation.
///
/// Only the top-left `rows x cols` region of `bits` is meaningful; the rest is
/// always `false` so that equality compares shapes bit-for-bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeMatrix {
    rows: u8,
    cols: u8,
    bits: [[bool; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE],
}

impl ShapeMatrix {
    /// Build a matrix from `0`/`1` rows, e.g. `[[0, 1, 0], [1, 1, 1]]`.
    ///
    /// Panics (at compile time in const context) when larger than 4x4.
    pub const fn from_rows<const R: usize, const C: usize>(rows: [[u8; C]; R]) -> Self {
        assert!(R >= 1 && R <= MAX_SHAPE_SIDE && C >= 1 && C <= MAX_SHAPE_SIDE);
        let mut bits = [[false; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE];
        let mut r = 0;
        while r < R {
            let mut c = 0;
            while c < C {
                bits[r][c] = rows[r][c] != 0;
                c += 1;
            }
            r += 1;
        }
        Self {
            rows: R as u8,
            cols: C as u8,
            bits,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows as usize
    }

    pub fn cols(&self) -> usize {
        self.cols as usize
    }

    /// Width in grid columns
    pub fn width(&self) -> usize {
        self.cols()
    }

    /// Height in grid rows
    pub fn height(&self) -> usize {
        self.rows()
    }

    /// Whether sub-cell `(col, row)` is occupied. Out-of-range is empty.
    pub fn get(&self, col: usize, row: usize) -> bool {
        col < self.cols() && row < self.rows() && self.bits[row][col]
    }

    /// Iterate occupied sub-cells as `(col, row)` offsets from the anchor.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (0..self.rows()).flat_map(move |r| {
            (0..self.cols())
                .filter(move |&c| self.bits[r][c])
                .map(move |c| (c as i32, r as i32))
        })
    }

    /// Number of occupied sub-cells
    pub fn cell_count(&self) -> usize {
        self.cells().count()
    }

    /// Rotate 90 degrees clockwise: reverse the rows, then transpose.
    ///
    /// `out[i][j] = self[rows - 1 - j][i]`; the result is `cols x rows`.
    pub fn rotated_cw(&self) -> Self {
        let rows = self.rows();
        let cols = self.cols();
        let mut bits = [[false; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE];
        for (i, out_row) in bits.iter_mut().enumerate().take(cols) {
            for (j, out) in out_row.iter_mut().enumerate().take(rows) {
                *out = self.bits[rows - 1 - j][i];
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            bits,
        }
    }
}

const SHAPE_I: ShapeMatrix = ShapeMatrix::from_rows([[1, 1, 1, 1]]);
const SHAPE_O: ShapeMatrix = ShapeMatrix::from_rows([[1, 1], [1, 1]]);
const SHAPE_T: ShapeMatrix = ShapeMatrix::from_rows([[0, 1, 0], [1, 1, 1]]);
const SHAPE_L: ShapeMatrix = ShapeMatrix::from_rows([[1, 0, 0], [1, 1, 1]]);
const SHAPE_J: ShapeMatrix = ShapeMatrix::from_rows([[0, 0, 1], [1, 1, 1]]);
const SHAPE_S: ShapeMatrix = ShapeMatrix::from_rows([[1, 1, 0], [0, 1, 1]]);
const SHAPE_Z: ShapeMatrix = ShapeMatrix::from_rows([[0, 1, 1], [1, 1, 0]]);

/// Get the unrotated (spawn) shape for a piece kind
pub fn base_shape(kind: PieceKind) -> ShapeMatrix {
    match kind {
        PieceKind::I => SHAPE_I,
        PieceKind::O => SHAPE_O,
        PieceKind::T => SHAPE_T,
        PieceKind::L => SHAPE_L,
        PieceKind::J => SHAPE_J,
        PieceKind::S => SHAPE_S,
        PieceKind::Z => SHAPE_Z,
    }
}
