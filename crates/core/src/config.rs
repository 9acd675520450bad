//! Engine configuration
//!
//! All tuning lives here and is fixed for the life of an engine. Use the
//! `with_*` builders on top of [`EngineConfig::default`] and let
//! [`BoardEngine::new`](crate::BoardEngine::new) validate the result.

use std::time::Duration;

use crate::error::{EngineError, Result};
use crate::rng::Randomizer;
use crate::types::{
    DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH, DEFAULT_DROP_INTERVAL_MS, DEFAULT_SOFT_DROP_FACTOR,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Grid columns
    pub width: u16,
    /// Grid rows
    pub height: u16,
    /// Time between gravity steps
    pub drop_interval: Duration,
    /// While soft dropping, gravity runs this many times faster
    pub soft_drop_factor: u32,
    /// Multiplier applied to every line clear score
    pub score_scale: u32,
    /// Hidden rows above row 0 where a piece may spawn and move without colliding.
    ///
    /// Cells locked into these rows are discarded.
    pub spawn_buffer_rows: u16,
    pub randomizer: Randomizer,
    /// `None` seeds from the operating system
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_BOARD_WIDTH,
            height: DEFAULT_BOARD_HEIGHT,
            drop_interval: Duration::from_millis(DEFAULT_DROP_INTERVAL_MS as u64),
            soft_drop_factor: DEFAULT_SOFT_DROP_FACTOR,
            score_scale: 1,
            spawn_buffer_rows: 0,
            randomizer: Randomizer::Uniform,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn with_size(mut self, width: u16, height: u16) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_drop_interval(mut self, drop_interval: Duration) -> Self {
        self.drop_interval = drop_interval;
        self
    }

    pub fn with_soft_drop_factor(mut self, factor: u32) -> Self {
        self.soft_drop_factor = factor;
        self
    }

    pub fn with_score_scale(mut self, scale: u32) -> Self {
        self.score_scale = scale;
        self
    }

    pub fn with_spawn_buffer_rows(mut self, rows: u16) -> Self {
        self.spawn_buffer_rows = rows;
        self
    }

    pub fn with_randomizer(mut self, randomizer: Randomizer) -> Self {
        self.randomizer = randomizer;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every precondition; dimensions are fixed once an engine exists.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(EngineError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.drop_interval.is_zero() {
            return Err(EngineError::ZeroDropInterval);
        }
        if self.score_scale == 0 {
            return Err(EngineError::ZeroScoreScale);
        }
        if self.soft_drop_factor == 0 {
            return Err(EngineError::ZeroSoftDropFactor);
        }
        self.randomizer.validate()
    }

    /// Gravity interval, shortened while soft dropping
    pub fn effective_drop_interval(&self, soft_dropping: bool) -> Duration {
        if soft_dropping {
            self.drop_interval / self.soft_drop_factor.max(1)
        } else {
            self.drop_interval
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = EngineConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!((config.width, config.height), (10, 20));
        assert_eq!(config.drop_interval, Duration::from_millis(500));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = EngineConfig::default();
        assert_eq!(
            base.clone().with_size(0, 5).validate(),
            Err(EngineError::InvalidDimensions {
                width: 0,
                height: 5
            })
        );
        assert_eq!(
            base.clone()
                .with_drop_interval(Duration::ZERO)
                .validate(),
            Err(EngineError::ZeroDropInterval)
        );
        assert_eq!(
            base.clone().with_score_scale(0).validate(),
            Err(EngineError::ZeroScoreScale)
        );
        assert_eq!(
            base.clone().with_soft_drop_factor(0).validate(),
            Err(EngineError::ZeroSoftDropFactor)
        );
        assert_eq!(
            base.with_randomizer(Randomizer::Cycle(vec![])).validate(),
            Err(EngineError::EmptyCycle)
        );
    }

    #[test]
    fn test_soft_drop_interval() {
        let config = EngineConfig::default();
        assert_eq!(config.effective_drop_interval(false), Duration::from_millis(500));
        assert_eq!(
            config.effective_drop_interval(true),
            Duration::from_millis(500) / 15
        );
    }
}
