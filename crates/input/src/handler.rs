//! Held-key handling for terminal environments.
//!
//! Left/Right use delayed auto-shift: the first press moves once, and after
//! `das_delay` ms of holding, moves repeat every `arr_rate` ms. Down is tracked
//! as a held flag only; the game loop forwards it to the engine's soft-drop
//! gravity instead of emitting repeated steps.
//!
//! Terminals that never send key-release events are handled with a timeout.

use std::time::{Duration, Instant};

use arrayvec::ArrayVec;
use crossterm::event::KeyCode;

use crate::types::{GameAction, DEFAULT_ARR_MS, DEFAULT_DAS_MS};

/// Direction for horizontal movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalDirection {
    Left,
    Right,
    None,
}

impl HorizontalDirection {
    fn action(self) -> Option<GameAction> {
        match self {
            HorizontalDirection::Left => Some(GameAction::MoveLeft),
            HorizontalDirection::Right => Some(GameAction::MoveRight),
            HorizontalDirection::None => None,
        }
    }
}

const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 150;

/// Tracks which movement keys are held and when they repeat.
#[derive(Debug, Clone)]
pub struct InputHandler {
    horizontal: HorizontalDirection,
    soft_drop_held: bool,
    last_key_time: Instant,
    das_timer: u32,
    arr_accumulator: u32,
    das_delay: u32,
    arr_rate: u32,
    key_release_timeout_ms: u32,
}

fn is_left(code: KeyCode) -> bool {
    matches!(
        code,
        KeyCode::Left | KeyCode::Char('a' | 'A' | 'h' | 'H')
    )
}

fn is_right(code: KeyCode) -> bool {
    matches!(
        code,
        KeyCode::Right | KeyCode::Char('d' | 'D' | 'l' | 'L')
    )
}

fn is_down(code: KeyCode) -> bool {
    matches!(
        code,
        KeyCode::Down | KeyCode::Char('s' | 'S' | 'j' | 'J')
    )
}

impl InputHandler {
    pub fn new() -> Self {
        Self::with_config(DEFAULT_DAS_MS, DEFAULT_ARR_MS)
    }

    pub fn with_config(das_delay: u32, arr_rate: u32) -> Self {
        Self {
            horizontal: HorizontalDirection::None,
            soft_drop_held: false,
            last_key_time: Instant::now(),
            das_timer: 0,
            arr_accumulator: 0,
            das_delay,
            arr_rate: arr_rate.max(1),
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    /// Whether the soft drop key is currently held.
    pub fn soft_drop_held(&self) -> bool {
        self.soft_drop_held
    }

    pub fn horizontal(&self) -> HorizontalDirection {
        self.horizontal
    }

    fn start_horizontal(&mut self, dir: HorizontalDirection) -> Option<GameAction> {
        self.last_key_time = Instant::now();
        if self.horizontal == dir {
            return None;
        }
        self.horizontal = dir;
        self.das_timer = 0;
        self.arr_accumulator = 0;
        dir.action()
    }

    fn stop_horizontal(&mut self) {
        self.horizontal = HorizontalDirection::None;
        self.das_timer = 0;
        self.arr_accumulator = 0;
    }

    /// Register a key press. Returns the immediate action of a fresh press.
    pub fn handle_key_press(&mut self, code: KeyCode) -> Option<GameAction> {
        if is_left(code) {
            self.start_horizontal(HorizontalDirection::Left)
        } else if is_right(code) {
            self.start_horizontal(HorizontalDirection::Right)
        } else if is_down(code) {
            self.last_key_time = Instant::now();
            if self.soft_drop_held {
                None
            } else {
                self.soft_drop_held = true;
                Some(GameAction::SoftDrop)
            }
        } else {
            None
        }
    }

    pub fn handle_key_release(&mut self, code: KeyCode) {
        if (is_left(code) && self.horizontal == HorizontalDirection::Left)
            || (is_right(code) && self.horizontal == HorizontalDirection::Right)
        {
            self.stop_horizontal();
        } else if is_down(code) {
            self.soft_drop_held = false;
        }
    }

    /// Advance held-key timers and collect the auto-repeat moves that fell due.
    pub fn update(&mut self, elapsed_ms: u32) -> ArrayVec<GameAction, 32> {
        let mut actions = ArrayVec::<GameAction, 32>::new();

        let timeout = Duration::from_millis(self.key_release_timeout_ms as u64);
        if self.last_key_time.elapsed() > timeout {
            if self.horizontal != HorizontalDirection::None {
                self.stop_horizontal();
            }
            self.soft_drop_held = false;
        }

        let Some(action) = self.horizontal.action() else {
            self.das_timer = 0;
            self.arr_accumulator = 0;
            return actions;
        };

        let prev_das = self.das_timer;
        self.das_timer = self.das_timer.saturating_add(elapsed_ms);
        if self.das_timer < self.das_delay {
            return actions;
        }

        let excess = if prev_das < self.das_delay {
            self.das_timer - self.das_delay
        } else {
            elapsed_ms
        };
        self.arr_accumulator += excess;
        while self.arr_accumulator >= self.arr_rate {
            let _ = actions.try_push(action);
            self.arr_accumulator -= self.arr_rate;
        }

        actions
    }

    pub fn reset(&mut self) {
        self.stop_horizontal();
        self.soft_drop_held = false;
        self.last_key_time = Instant::now();
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_repeats_after_delay() {
        let mut ih = InputHandler::with_config(200, 100).with_key_release_timeout_ms(10_000);

        assert_eq!(ih.handle_key_press(KeyCode::Left), Some(GameAction::MoveLeft));
        assert_eq!(ih.handle_key_press(KeyCode::Left), None);

        assert!(ih.update(199).is_empty());
        assert!(ih.update(1).is_empty());
        assert_eq!(ih.update(100).as_slice(), &[GameAction::MoveLeft]);
        assert_eq!(
            ih.update(200).as_slice(),
            &[GameAction::MoveLeft, GameAction::MoveLeft]
        );
    }

    #[test]
    fn test_switching_direction_restarts_delay() {
        let mut ih = InputHandler::with_config(200, 100).with_key_release_timeout_ms(10_000);

        ih.handle_key_press(KeyCode::Left);
        ih.update(250);
        assert_eq!(ih.handle_key_press(KeyCode::Right), Some(GameAction::MoveRight));
        assert!(ih.update(150).is_empty());
    }

    #[test]
    fn test_release_stops_repeats() {
        let mut ih = InputHandler::with_config(200, 100).with_key_release_timeout_ms(10_000);

        ih.handle_key_press(KeyCode::Char('d'));
        ih.handle_key_release(KeyCode::Right);
        assert_eq!(ih.horizontal(), HorizontalDirection::None);
        assert!(ih.update(1_000).is_empty());
    }

    #[test]
    fn test_soft_drop_is_tracked_not_repeated() {
        let mut ih = InputHandler::new().with_key_release_timeout_ms(10_000);

        assert_eq!(ih.handle_key_press(KeyCode::Down), Some(GameAction::SoftDrop));
        assert!(ih.soft_drop_held());
        assert!(ih.update(1_000).is_empty());
        assert_eq!(ih.handle_key_press(KeyCode::Down), None);

        ih.handle_key_release(KeyCode::Down);
        assert!(!ih.soft_drop_held());
    }

    #[test]
    fn test_auto_release_without_release_events() {
        let mut ih = InputHandler::with_config(100, 25).with_key_release_timeout_ms(50);

        ih.handle_key_press(KeyCode::Left);
        ih.handle_key_press(KeyCode::Down);
        ih.last_key_time = Instant::now() - Duration::from_millis(51);

        assert!(ih.update(0).is_empty());
        assert_eq!(ih.horizontal(), HorizontalDirection::None);
        assert!(!ih.soft_drop_held());
    }

    #[test]
    fn test_non_movement_key_does_not_extend_timeout() {
        let mut ih = InputHandler::with_config(100, 25).with_key_release_timeout_ms(50);

        ih.handle_key_press(KeyCode::Left);
        ih.last_key_time = Instant::now() - Duration::from_millis(51);
        assert_eq!(ih.handle_key_press(KeyCode::Up), None);

        ih.update(0);
        assert_eq!(ih.horizontal(), HorizontalDirection::None);
    }

    #[test]
    fn test_reset_clears_held_state() {
        let mut ih = InputHandler::with_config(100, 25).with_key_release_timeout_ms(10_000);

        ih.handle_key_press(KeyCode::Right);
        ih.handle_key_press(KeyCode::Down);
        assert!(!ih.update(200).is_empty());

        ih.reset();
        assert!(ih.update(200).is_empty());
        assert!(!ih.soft_drop_held());
    }
}
