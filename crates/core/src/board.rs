//! Board module - manages the game grid
//!
//! The board is a `width x height` grid where each cell can be empty or filled with a piece kind.
//! Uses a flat vector in row-major order; dimensions are fixed for the life of the board.
//! Coordinates: (x, y) where x grows left to right and y grows top to bottom
//! (see [`ROW_ZERO_IS_TOP`](crate::types::ROW_ZERO_IS_TOP)).

use crate::error::{EngineError, Result};
use crate::types::{Cell, PieceKind};

/// The game board - flat row-major storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    width: u16,
    height: u16,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board
    pub fn new(width: u16, height: u16) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        })
    }

    /// Build a board from text rows, top row first.
    ///
    /// `.` is empty and a piece letter (`I`, `O`, `T`, `L`, `J`, `S`, `Z`, any
    /// case) is a filled cell. All rows must have the same length.
    pub fn from_rows(rows: &[&str]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        let mut board = Self::new(width as u16, height as u16)?;

        for (y, row) in rows.iter().enumerate() {
            let row_width = row.chars().count();
            if row_width != width {
                return Err(EngineError::BoardSizeMismatch {
                    width: width as u16,
                    height: height as u16,
                    actual_width: row_width as u16,
                    actual_height: height as u16,
                });
            }
            for (x, ch) in row.chars().enumerate() {
                let cell = match ch {
                    '.' => None,
                    _ => Some(PieceKind::from_char(ch).ok_or(EngineError::InvalidCell {
                        ch,
                        row: y,
                        col: x,
                    })?),
                };
                board.cells[y * width + x] = cell;
            }
        }

        Ok(board)
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || x >= self.width as i32 || y < 0 || y >= self.height as i32 {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    /// Get width of the board
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Get height of the board
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Check if position is out of bounds
    pub fn is_out_of_bounds(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_none()
    }

    /// Borrow one row of cells
    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        if y >= self.height as usize {
            return None;
        }
        let width = self.width as usize;
        let start = y * width;
        Some(&self.cells[start..start + width])
    }

    /// Iterate rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width as usize)
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y)
            .map(|row| row.iter().all(|cell| cell.is_some()))
            .unwrap_or(false)
    }

    /// Count rows that are completely filled
    pub fn full_row_count(&self) -> usize {
        (0..self.height as usize)
            .filter(|&y| self.is_row_full(y))
            .count()
    }

    /// Clear all full rows and return how many were removed.
    ///
    /// Remaining rows keep their relative order and settle toward the floor;
    /// the vacated rows at the top are emptied. Uses a two-pointer pass with no
    /// allocation and handles any number of full rows up to the board height.
    pub fn clear_full_rows(&mut self) -> usize {
        let width = self.width as usize;
        let mut cleared = 0;
        let mut write_y = self.height as usize;

        // Scan from bottom to top
        for read_y in (0..self.height as usize).rev() {
            if self.is_row_full(read_y) {
                cleared += 1;
            } else {
                // This row is not full, move it down to the write position
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * width;
                    let dst_start = write_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, dst_start);
                }
            }
        }

        // Clear the remaining rows at the top
        self.cells[..write_y * width].fill(None);

        cleared
    }

    /// Number of filled cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Render as text rows using the same alphabet as [`Board::from_rows`].
    pub fn to_rows(&self) -> Vec<String> {
        self.rows()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.map(|kind| kind.as_char()).unwrap_or('.'))
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_index_calculation() {
        let board = Board::new(10, 20).unwrap();
        assert_eq!(board.index(0, 0), Some(0));
        assert_eq!(board.index(9, 0), Some(9));
        assert_eq!(board.index(0, 1), Some(10));
        assert_eq!(board.index(9, 19), Some(199));
        assert_eq!(board.index(-1, 0), None);
        assert_eq!(board.index(10, 0), None);
        assert_eq!(board.index(0, 20), None);
    }

    #[test]
    fn test_board_rejects_zero_dimensions() {
        assert_eq!(
            Board::new(0, 20),
            Err(EngineError::InvalidDimensions {
                width: 0,
                height: 20
            })
        );
        assert!(Board::new(10, 0).is_err());
        assert!(Board::new(1, 1).is_ok());
    }

    #[test]
    fn test_board_flat_array() {
        let mut board = Board::new(10, 20).unwrap();

        board.set(0, 0, Some(PieceKind::I));
        board.set(5, 10, Some(PieceKind::T));

        assert_eq!(board.get(0, 0), Some(Some(PieceKind::I)));
        assert_eq!(board.get(5, 10), Some(Some(PieceKind::T)));

        assert_eq!(board.cells[0], Some(PieceKind::I));
        assert_eq!(board.cells[10 * 10 + 5], Some(PieceKind::T));
    }

    #[test]
    fn test_board_text_roundtrip() {
        let rows = ["..T.", "IIII", "O..Z"];
        let board = Board::from_rows(&rows).unwrap();
        assert_eq!((board.width(), board.height()), (4, 3));
        assert_eq!(board.to_rows(), rows);
    }

    #[test]
    fn test_board_from_rows_rejects_unknown_cell() {
        assert_eq!(
            Board::from_rows(&["..", ".#"]),
            Err(EngineError::InvalidCell {
                ch: '#',
                row: 1,
                col: 1
            })
        );
    }

    #[test]
    fn test_clear_full_rows_keeps_order_of_survivors() {
        let mut board = Board::from_rows(&[
            "T...", //
            "IIII", //
            ".O..", //
            "ZZZZ", //
            "..L.",
        ])
        .unwrap();

        assert_eq!(board.clear_full_rows(), 2);
        assert_eq!(
            board.to_rows(),
            ["....", "....", "T...", ".O..", "..L."]
        );
    }

    #[test]
    fn test_clear_every_row() {
        let mut board = Board::from_rows(&["SS", "JJ", "LL"]).unwrap();
        assert_eq!(board.clear_full_rows(), 3);
        assert_eq!(board.occupied_count(), 0);
    }
}
