//! Board engine - owns the grid, the falling piece and the score
//!
//! This module ties together the board, piece shapes, the randomizer and scoring.
//! Every operation is synchronous and total: illegal moves and rotations are
//! rejected by reverting, and game over is a terminal flag after which all
//! mutating calls are no-ops until [`BoardEngine::new_game`].
//!
//! Lifecycle of a piece: spawned at the top, moved/rotated, locked into the
//! grid (which clears full rows and scores), then the next piece spawns. A spawn
//! that immediately collides ends the game.

use std::time::Duration;

use tracing::{debug, info};

use crate::board::Board;
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::pieces::{base_shape, ShapeMatrix};
use crate::rng::PieceRandomizer;
use crate::scoring::{line_clear_score, milestone_crossed, Milestone};
use crate::snapshot::EngineSnapshot;
use crate::types::{GameAction, PieceKind};

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    pub kind: PieceKind,
    /// Current orientation
    pub shape: ShapeMatrix,
    /// Column of the shape's top-left corner
    pub x: i32,
    /// Row of the shape's top-left corner
    pub y: i32,
}

impl ActivePiece {
    /// Unrotated piece centered horizontally with its top at `top_row`
    pub fn spawn(kind: PieceKind, board_width: u16, top_row: i32) -> Self {
        let shape = base_shape(kind);
        Self {
            kind,
            shape,
            x: (board_width / 2) as i32 - (shape.width() / 2) as i32,
            y: top_row,
        }
    }

    /// Absolute grid coordinates of every occupied cell
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .cells()
            .map(move |(dx, dy)| (self.x + dx, self.y + dy))
    }

    fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// Outcome of one lock, kept until an observer takes it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockEvent {
    pub kind: PieceKind,
    pub lines_cleared: usize,
    pub score_delta: u64,
    pub milestone: Option<Milestone>,
    /// The game ended as a consequence of this lock
    pub game_over: bool,
}

/// The board engine
#[derive(Debug, Clone)]
pub struct BoardEngine {
    config: EngineConfig,
    board: Board,
    active: Option<ActivePiece>,
    next: PieceKind,
    randomizer: PieceRandomizer,
    score: u64,
    lines: u64,
    pieces_locked: u64,
    game_over: bool,
    drop_timer: Duration,
    soft_dropping: bool,
    last_event: Option<LockEvent>,
}

impl BoardEngine {
    /// Create an engine with an empty grid and spawn the first piece
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let board = Board::new(config.width, config.height)?;
        Self::with_board(config, board)
    }

    /// Create an engine on a prepared grid and spawn the first piece.
    ///
    /// The board must match the configured dimensions.
    pub fn with_board(config: EngineConfig, board: Board) -> Result<Self> {
        config.validate()?;
        if board.width() != config.width || board.height() != config.height {
            return Err(EngineError::BoardSizeMismatch {
                width: config.width,
                height: config.height,
                actual_width: board.width(),
                actual_height: board.height(),
            });
        }

        let mut randomizer = PieceRandomizer::new(config.randomizer.clone(), config.seed)?;
        let next = randomizer.peek();

        let mut engine = Self {
            config,
            board,
            active: None,
            next,
            randomizer,
            score: 0,
            lines: 0,
            pieces_locked: 0,
            game_over: false,
            drop_timer: Duration::ZERO,
            soft_dropping: false,
            last_event: None,
        };
        engine.spawn_piece();
        Ok(engine)
    }

    /// Reset grid, score and flags, then spawn a fresh piece.
    ///
    /// The randomizer keeps its state, so successive games differ.
    pub fn new_game(&mut self) {
        self.board.clear();
        self.active = None;
        self.score = 0;
        self.lines = 0;
        self.pieces_locked = 0;
        self.game_over = false;
        self.drop_timer = Duration::ZERO;
        self.soft_dropping = false;
        self.last_event = None;
        info!("new game");
        self.spawn_piece();
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> Option<ActivePiece> {
        self.active
    }

    /// Kind that the next spawn will use
    pub fn next_kind(&self) -> PieceKind {
        self.next
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn lines(&self) -> u64 {
        self.lines
    }

    pub fn pieces_locked(&self) -> u64 {
        self.pieces_locked
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn soft_dropping(&self) -> bool {
        self.soft_dropping
    }

    /// Top row available to pieces (negative when a spawn buffer is configured)
    fn top_row(&self) -> i32 {
        -(self.config.spawn_buffer_rows as i32)
    }

    /// Spawn the previewed piece and peek at the one after it.
    ///
    /// Overwrites the active piece. If the new piece collides immediately the
    /// game is over and the grid is left untouched. Returns whether the spawn
    /// succeeded.
    pub fn spawn_piece(&mut self) -> bool {
        if self.game_over {
            return false;
        }

        let kind = self.randomizer.draw();
        self.next = self.randomizer.peek();

        let piece = ActivePiece::spawn(kind, self.board.width(), self.top_row());
        self.active = Some(piece);
        self.drop_timer = Duration::ZERO;

        if self.collides(&piece) {
            self.game_over = true;
            info!(
                score = self.score,
                lines = self.lines,
                ?kind,
                "game over: spawn blocked"
            );
            return false;
        }

        debug!(?kind, x = piece.x, y = piece.y, "spawned piece");
        true
    }

    /// Whether `piece` leaves the playfield or overlaps a filled cell.
    ///
    /// Rows in the spawn buffer (above row 0) are free; rows above the buffer,
    /// below the floor, and columns outside the grid all collide.
    fn collides(&self, piece: &ActivePiece) -> bool {
        let width = self.board.width() as i32;
        let height = self.board.height() as i32;
        let top = self.top_row();

        piece.cells().any(|(x, y)| {
            x < 0 || x >= width || y >= height || y < top || self.board.is_occupied(x, y)
        })
    }

    /// Check the active piece against the grid. False when there is no piece.
    pub fn check_collision(&self) -> bool {
        self.active
            .as_ref()
            .map(|piece| self.collides(piece))
            .unwrap_or(false)
    }

    /// Translate the active piece; a colliding move is rejected, not clamped.
    pub fn move_piece(&mut self, dx: i32, dy: i32) -> bool {
        if self.game_over {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let moved = active.translated(dx, dy);
        if self.collides(&moved) {
            return false;
        }
        self.active = Some(moved);
        true
    }

    /// Rotate the active piece clockwise in place. No wall kicks.
    pub fn rotate(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let rotated = ActivePiece {
            shape: active.shape.rotated_cw(),
            ..active
        };
        if self.collides(&rotated) {
            return false;
        }
        self.active = Some(rotated);
        true
    }

    /// One step down; rejected (not locked) when blocked
    pub fn soft_drop(&mut self) -> bool {
        self.move_piece(0, 1)
    }

    /// Drop to the lowest free position and lock. Returns rows descended.
    pub fn hard_drop(&mut self) -> u32 {
        if self.game_over || self.active.is_none() {
            return 0;
        }

        let mut distance = 0;
        while self.move_piece(0, 1) {
            distance += 1;
        }
        self.lock();
        distance
    }

    /// Write the active piece into the grid, clear lines and spawn the next piece.
    ///
    /// Cells above the visible ceiling are discarded. A piece that lands
    /// entirely above the ceiling ends the game.
    pub fn lock(&mut self) {
        if self.game_over {
            return;
        }
        let Some(active) = self.active.take() else {
            return;
        };

        let mut visible = 0;
        for (x, y) in active.cells() {
            if self.board.set(x, y, Some(active.kind)) {
                visible += 1;
            }
        }
        self.pieces_locked += 1;

        let (lines_cleared, score_delta, milestone) = self.clear_and_score();
        debug!(
            kind = ?active.kind,
            x = active.x,
            y = active.y,
            lines_cleared,
            "locked piece"
        );

        if visible == 0 {
            self.game_over = true;
            info!(score = self.score, lines = self.lines, "game over: locked above ceiling");
        } else {
            self.spawn_piece();
        }

        self.last_event = Some(LockEvent {
            kind: active.kind,
            lines_cleared,
            score_delta,
            milestone,
            game_over: self.game_over,
        });
    }

    /// Remove every full row and add its score. Returns the number of rows removed.
    pub fn clear_lines(&mut self) -> usize {
        self.clear_and_score().0
    }

    fn clear_and_score(&mut self) -> (usize, u64, Option<Milestone>) {
        let cleared = self.board.clear_full_rows();
        if cleared == 0 {
            return (0, 0, None);
        }

        let scale = self.config.score_scale;
        let before = self.score;
        let delta = line_clear_score(cleared, scale);
        self.score = self.score.saturating_add(delta);
        self.lines += cleared as u64;

        let milestone = milestone_crossed(before, self.score, scale);
        info!(cleared, delta, score = self.score, "cleared lines");
        if let Some(m) = milestone {
            info!(milestone = ?m, score = self.score, "score milestone reached");
        }

        (cleared, delta, milestone)
    }

    /// Toggle the faster gravity used while the drop key is held
    pub fn set_soft_dropping(&mut self, soft_dropping: bool) {
        self.soft_dropping = soft_dropping;
    }

    /// Advance gravity by `dt`.
    ///
    /// Once the accumulated time exceeds the drop interval the piece steps down
    /// one row; if that step is blocked the piece locks instead. At most one
    /// step happens per call. Returns whether the piece moved or locked.
    pub fn tick(&mut self, dt: Duration) -> bool {
        if self.game_over || self.active.is_none() {
            return false;
        }

        self.drop_timer += dt;
        if self.drop_timer <= self.config.effective_drop_interval(self.soft_dropping) {
            return false;
        }

        self.drop_timer = Duration::ZERO;
        if !self.move_piece(0, 1) {
            self.lock();
        }
        true
    }

    /// Apply a discrete input action
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.move_piece(-1, 0),
            GameAction::MoveRight => self.move_piece(1, 0),
            GameAction::SoftDrop => self.soft_drop(),
            GameAction::Rotate => self.rotate(),
            GameAction::HardDrop => {
                if self.game_over || self.active.is_none() {
                    return false;
                }
                self.hard_drop();
                true
            }
            GameAction::Restart => {
                self.new_game();
                true
            }
        }
    }

    /// Row the active piece would lock at after a hard drop
    pub fn ghost_y(&self) -> Option<i32> {
        let active = self.active?;
        if self.collides(&active) {
            return None;
        }

        let mut ghost = active;
        loop {
            let below = ghost.translated(0, 1);
            if self.collides(&below) {
                break;
            }
            ghost = below;
        }
        Some(ghost.y)
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    /// Copy the observable state into `out`, reusing its allocation.
    pub fn snapshot_into(&self, out: &mut EngineSnapshot) {
        out.width = self.board.width();
        out.height = self.board.height();
        out.cells.clear();
        out.cells.extend_from_slice(self.board.cells());
        out.active = self.active;
        out.ghost_y = self.ghost_y();
        out.next = self.next;
        out.score = self.score;
        out.lines = self.lines;
        out.pieces_locked = self.pieces_locked;
        out.game_over = self.game_over;
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        let mut s = EngineSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::Randomizer;

    fn engine_with(kinds: &[PieceKind]) -> BoardEngine {
        let config = EngineConfig::default().with_randomizer(Randomizer::Cycle(kinds.to_vec()));
        BoardEngine::new(config).unwrap()
    }

    #[test]
    fn test_new_engine_spawns_first_piece() {
        let engine = engine_with(&[PieceKind::T, PieceKind::I]);
        let active = engine.active().unwrap();

        assert_eq!(active.kind, PieceKind::T);
        assert_eq!(active.shape, base_shape(PieceKind::T));
        // floor(10/2) - floor(3/2)
        assert_eq!((active.x, active.y), (4, 0));
        assert_eq!(engine.next_kind(), PieceKind::I);
        assert!(!engine.game_over());
        assert_eq!(engine.score(), 0);
    }

    #[test]
    fn test_spawn_column_depends_on_shape_width() {
        let engine = engine_with(&[PieceKind::I]);
        assert_eq!(engine.active().unwrap().x, 3);
        let engine = engine_with(&[PieceKind::O]);
        assert_eq!(engine.active().unwrap().x, 4);
    }

    #[test]
    fn test_move_rejected_at_wall() {
        let mut engine = engine_with(&[PieceKind::O]);
        let mut moved = 0;
        for _ in 0..10 {
            if engine.move_piece(-1, 0) {
                moved += 1;
            }
        }
        assert_eq!(moved, 4);
        assert_eq!(engine.active().unwrap().x, 0);
        assert!(!engine.check_collision());
    }

    #[test]
    fn test_move_up_past_ceiling_is_rejected_without_buffer() {
        let mut engine = engine_with(&[PieceKind::T]);
        assert!(!engine.move_piece(0, -1));
        assert_eq!(engine.active().unwrap().y, 0);
    }

    #[test]
    fn test_rotation_reverts_on_collision() {
        // I piece lying on the floor cannot stand up.
        let mut engine = engine_with(&[PieceKind::I]);
        while engine.move_piece(0, 1) {}
        let before = engine.active().unwrap();
        assert!(!engine.rotate());
        assert_eq!(engine.active().unwrap(), before);
    }

    #[test]
    fn test_tick_steps_only_after_interval_exceeded() {
        let mut engine = engine_with(&[PieceKind::T]);
        assert!(!engine.tick(Duration::from_millis(500)));
        assert_eq!(engine.active().unwrap().y, 0);
        assert!(engine.tick(Duration::from_millis(1)));
        assert_eq!(engine.active().unwrap().y, 1);
    }

    #[test]
    fn test_restart_spawns_previewed_piece() {
        let mut engine = engine_with(&[PieceKind::T, PieceKind::S, PieceKind::Z]);
        assert_eq!(engine.next_kind(), PieceKind::S);

        engine.new_game();
        assert_eq!(engine.active().unwrap().kind, PieceKind::S);
        assert_eq!(engine.next_kind(), PieceKind::Z);
    }

    #[test]
    fn test_blocked_tick_locks_piece() {
        let mut engine = engine_with(&[PieceKind::O, PieceKind::T]);
        while engine.move_piece(0, 1) {}
        assert!(engine.tick(Duration::from_secs(1)));

        assert_eq!(engine.pieces_locked(), 1);
        assert_eq!(engine.board().get(4, 19), Some(Some(PieceKind::O)));
        assert_eq!(engine.active().unwrap().kind, PieceKind::T);
        let event = engine.take_last_event().unwrap();
        assert_eq!(event.kind, PieceKind::O);
        assert_eq!(event.lines_cleared, 0);
        assert!(engine.take_last_event().is_none());
    }

    #[test]
    fn test_soft_dropping_shortens_interval() {
        let mut engine = engine_with(&[PieceKind::T]);
        engine.set_soft_dropping(true);
        assert!(engine.tick(Duration::from_millis(40)));
        assert_eq!(engine.active().unwrap().y, 1);
    }

    #[test]
    fn test_hard_drop_returns_distance() {
        let mut engine = engine_with(&[PieceKind::O]);
        assert_eq!(engine.hard_drop(), 18);
        assert_eq!(engine.board().get(4, 18), Some(Some(PieceKind::O)));
        assert_eq!(engine.board().get(5, 19), Some(Some(PieceKind::O)));
    }

    #[test]
    fn test_ghost_matches_hard_drop() {
        let mut engine = engine_with(&[PieceKind::L, PieceKind::O]);
        let ghost = engine.ghost_y().unwrap();
        let x = engine.active().unwrap().x;
        engine.hard_drop();
        // L base shape has its top-left cell filled
        assert_eq!(engine.board().get(x, ghost), Some(Some(PieceKind::L)));
    }

    #[test]
    fn test_game_over_blocks_everything() {
        let board = Board::from_rows(&[
            "...OO.....",
            "...OO.....",
            "..........",
        ])
        .unwrap();
        let config = EngineConfig::default()
            .with_size(10, 3)
            .with_randomizer(Randomizer::Cycle(vec![PieceKind::T]));
        let mut engine = BoardEngine::with_board(config, board.clone()).unwrap();

        assert!(engine.game_over());
        assert_eq!(engine.board(), &board);
        assert!(!engine.move_piece(1, 0));
        assert!(!engine.rotate());
        assert_eq!(engine.hard_drop(), 0);
        assert!(!engine.tick(Duration::from_secs(5)));
        assert!(!engine.spawn_piece());
        assert_eq!(engine.board(), &board);

        assert!(engine.apply_action(GameAction::Restart));
        assert!(!engine.game_over());
        assert_eq!(engine.board().occupied_count(), 0);
    }

    #[test]
    fn test_with_board_rejects_size_mismatch() {
        let board = Board::new(4, 4).unwrap();
        let err = BoardEngine::with_board(EngineConfig::default(), board).unwrap_err();
        assert_eq!(
            err,
            EngineError::BoardSizeMismatch {
                width: 10,
                height: 20,
                actual_width: 4,
                actual_height: 4
            }
        );
    }

    #[test]
    fn test_spawn_buffer_allows_off_grid_spawn() {
        let config = EngineConfig::default()
            .with_spawn_buffer_rows(2)
            .with_randomizer(Randomizer::Cycle(vec![PieceKind::O]));
        let mut engine = BoardEngine::new(config).unwrap();
        let active = engine.active().unwrap();
        assert_eq!(active.y, -2);
        assert!(!engine.check_collision());
        // The buffer top is a hard ceiling.
        assert!(!engine.move_piece(0, -1));
        assert!(engine.move_piece(0, 1));
    }

    #[test]
    fn test_lock_above_ceiling_ends_game() {
        let config = EngineConfig::default()
            .with_spawn_buffer_rows(2)
            .with_randomizer(Randomizer::Cycle(vec![PieceKind::O]));
        let mut engine = BoardEngine::new(config).unwrap();
        engine.lock();

        assert!(engine.game_over());
        assert_eq!(engine.board().occupied_count(), 0);
        assert!(engine.take_last_event().unwrap().game_over);
    }

    #[test]
    fn test_partial_lock_above_ceiling_drops_hidden_cells() {
        let config = EngineConfig::default()
            .with_spawn_buffer_rows(1)
            .with_randomizer(Randomizer::Cycle(vec![PieceKind::O]));
        let mut engine = BoardEngine::new(config).unwrap();
        // Out of the way of the next spawn.
        assert!(engine.move_piece(-4, 0));
        engine.lock();

        assert!(!engine.game_over());
        assert_eq!(engine.board().occupied_count(), 2);
        assert!(engine.board().is_occupied(0, 0));
        assert!(engine.board().is_occupied(1, 0));
    }
}
