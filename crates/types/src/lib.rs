//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (board engine, input mapping, terminal rendering).

/// Default board dimensions
pub const DEFAULT_BOARD_WIDTH: u16 = 10;
pub const DEFAULT_BOARD_HEIGHT: u16 = 20;

/// Vertical convention of the grid.
///
/// Row 0 is the top row and row indices grow downward. New pieces spawn at the
/// top, the floor is row `height - 1`, and rows vacated by a line clear are
/// inserted at the top.
pub const ROW_ZERO_IS_TOP: bool = true;

/// Game timing constants (in milliseconds)
pub const TICK_MS: u32 = 16;
pub const DEFAULT_DROP_INTERVAL_MS: u32 = 500;
pub const DEFAULT_SOFT_DROP_FACTOR: u32 = 15;

/// Held-key auto-repeat timing (milliseconds)
pub const DEFAULT_DAS_MS: u32 = 200;
pub const DEFAULT_ARR_MS: u32 = 100;

/// Line clear scoring, indexed by lines cleared in one lock (0..=3).
/// Four or more lines score `LINE_SCORE_MULTI * (lines - 3)`.
pub const LINE_SCORES: [u64; 4] = [0, 100, 300, 500];
pub const LINE_SCORE_MULTI: u64 = 800;

/// Score thresholds (before scaling) that trigger a reward.
pub const MILESTONE_THRESHOLDS: [u64; 3] = [1_000, 5_000, 10_000];

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Tetromino piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    L,
    J,
    S,
    Z,
}

impl PieceKind {
    /// All kinds in table order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::L,
        PieceKind::J,
        PieceKind::S,
        PieceKind::Z,
    ];

    /// Parse piece kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "l" => Some(PieceKind::L),
            "j" => Some(PieceKind::J),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Parse from a single board character (`I`, `o`, ...).
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'i' => Some(PieceKind::I),
            'o' => Some(PieceKind::O),
            't' => Some(PieceKind::T),
            'l' => Some(PieceKind::L),
            'j' => Some(PieceKind::J),
            's' => Some(PieceKind::S),
            'z' => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::L => "l",
            PieceKind::J => "j",
            PieceKind::S => "s",
            PieceKind::Z => "z",
        }
    }

    /// Uppercase board character (`I`, `O`, ...)
    pub fn as_char(&self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::L => 'L',
            PieceKind::J => 'J',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
        }
    }

    /// Display color of the piece and of the cells it leaves behind.
    pub fn color(&self) -> Rgb {
        match self {
            PieceKind::I => Rgb::new(0, 255, 255),
            PieceKind::O => Rgb::new(255, 255, 0),
            PieceKind::T => Rgb::new(255, 0, 255),
            PieceKind::L => Rgb::new(255, 165, 0),
            PieceKind::J => Rgb::new(0, 0, 255),
            PieceKind::S => Rgb::new(0, 255, 0),
            PieceKind::Z => Rgb::new(255, 0, 0),
        }
    }
}

/// Game actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    Rotate,
    Restart,
}

impl GameAction {
    /// Parse action from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "softdrop" => Some(GameAction::SoftDrop),
            "harddrop" => Some(GameAction::HardDrop),
            "rotate" => Some(GameAction::Rotate),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::HardDrop => "hardDrop",
            GameAction::Rotate => "rotate",
            GameAction::Restart => "restart",
        }
    }
}

/// Cell on the board (None = empty, Some = filled with piece kind)
pub type Cell = Option<PieceKind>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_kind_parsing_round_trips_through_as_str() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_str(kind.as_str()), Some(kind));
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(PieceKind::from_str("x"), None);
        assert_eq!(PieceKind::from_char('.'), None);
    }

    #[test]
    fn action_parsing_is_case_insensitive() {
        assert_eq!(GameAction::from_str("HardDrop"), Some(GameAction::HardDrop));
        assert_eq!(GameAction::from_str("rotate"), Some(GameAction::Rotate));
        assert_eq!(GameAction::from_str("hold"), None);
    }

    #[test]
    fn piece_colors_are_distinct() {
        for (i, a) in PieceKind::ALL.iter().enumerate() {
            for b in &PieceKind::ALL[i + 1..] {
                assert_ne!(a.color(), b.color());
            }
        }
    }
}
