use crate::engine::ActivePiece;
use crate::types::{Cell, PieceKind};

/// Read-only view of an engine for renderers and observers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSnapshot {
    pub width: u16,
    pub height: u16,
    /// Row-major grid, row 0 at the top
    pub cells: Vec<Cell>,
    pub active: Option<ActivePiece>,
    pub ghost_y: Option<i32>,
    pub next: PieceKind,
    pub score: u64,
    pub lines: u64,
    pub pieces_locked: u64,
    pub game_over: bool,
}

impl EngineSnapshot {
    /// Locked cell at `(x, y)`; `None` outside the grid.
    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        self.cells
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }
}

impl Default for EngineSnapshot {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            cells: Vec::new(),
            active: None,
            ghost_y: None,
            next: PieceKind::I,
            score: 0,
            lines: 0,
            pieces_locked: 0,
            game_over: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::engine::BoardEngine;
    use crate::rng::Randomizer;

    #[test]
    fn test_snapshot_into_reuses_buffer() {
        let config = EngineConfig::default()
            .with_size(6, 8)
            .with_randomizer(Randomizer::Cycle(vec![PieceKind::O]));
        let mut engine = BoardEngine::new(config).unwrap();
        engine.hard_drop();

        let mut snap = EngineSnapshot::default();
        engine.snapshot_into(&mut snap);
        let ptr = snap.cells.as_ptr();
        assert_eq!(snap.cells.len(), 48);
        assert_eq!(snap.cell(2, 7), Some(Some(PieceKind::O)));
        assert_eq!(snap.cell(6, 0), None);
        assert_eq!(snap.pieces_locked, 1);

        engine.snapshot_into(&mut snap);
        assert_eq!(snap.cells.as_ptr(), ptr);
        assert_eq!(snap, engine.snapshot());
    }

    #[test]
    fn test_snapshot_reports_ghost_and_next() {
        let config = EngineConfig::default()
            .with_randomizer(Randomizer::Cycle(vec![PieceKind::O, PieceKind::S]));
        let engine = BoardEngine::new(config).unwrap();
        let snap = engine.snapshot();

        assert_eq!(snap.next, PieceKind::S);
        assert_eq!(snap.ghost_y, Some(18));
        assert!(!snap.game_over);
    }
}
