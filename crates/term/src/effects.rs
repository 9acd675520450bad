//! Reward effects: the milestone banner and the fireworks particle burst.
//!
//! Both are driven by elapsed time passed in from the game loop, never by the
//! wall clock, so they advance in lockstep with the engine.

use std::f32::consts::TAU;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::{LockEvent, Milestone};
use crate::fb::{CellStyle, FrameBuffer, Rgb};

/// How long a banner or a fireworks show stays up.
pub const EFFECT_DURATION: Duration = Duration::from_secs(5);

const PALETTE: [Rgb; 8] = [
    Rgb::new(255, 0, 0),
    Rgb::new(0, 255, 0),
    Rgb::new(0, 0, 255),
    Rgb::new(255, 255, 0),
    Rgb::new(255, 0, 255),
    Rgb::new(0, 255, 255),
    Rgb::new(255, 165, 0),
    Rgb::new(255, 192, 203),
];

const BURSTS_PER_TRIGGER: usize = 20;
const EXTRA_BURST_CHANCE: f64 = 0.1;
const SPEED_DECAY: f32 = 0.98;
const BIG_CLEAR_LINES: usize = 3;
const BIG_CLEAR_FIREWORKS_CHANCE: f64 = 0.3;

/// One spark of a burst, in terminal cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub color: Rgb,
    /// Cells per frame at 60 frames per second
    pub speed: f32,
    pub angle: f32,
    pub life: f32,
    pub age: f32,
}

impl Particle {
    fn random(x: f32, y: f32, rng: &mut impl Rng) -> Self {
        Self {
            x,
            y,
            color: PALETTE[rng.random_range(0..PALETTE.len())],
            speed: rng.random_range(0.1..0.4),
            angle: rng.random_range(0.0..TAU),
            life: rng.random_range(0.5..1.5),
            age: 0.0,
        }
    }

    /// Advance by `dt` seconds. Returns false once the particle has burnt out.
    pub fn update(&mut self, dt: f32) -> bool {
        self.x += self.angle.cos() * self.speed * dt * 60.0;
        self.y += self.angle.sin() * self.speed * dt * 60.0;
        self.speed *= SPEED_DECAY;
        self.age += dt;
        self.age < self.life
    }

    /// Remaining brightness in `0.0..=1.0`.
    pub fn fade(&self) -> f32 {
        (1.0 - self.age / self.life).clamp(0.0, 1.0)
    }
}

/// Particle bursts over the whole viewport.
#[derive(Debug, Clone)]
pub struct Fireworks {
    width: u16,
    height: u16,
    particles: Vec<Particle>,
    remaining: Duration,
    rng: StdRng,
}

impl Fireworks {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            width: 0,
            height: 0,
            particles: Vec::new(),
            remaining: Duration::ZERO,
            rng,
        }
    }

    /// Area new bursts are placed in; call when the terminal size changes.
    pub fn set_area(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    pub fn is_active(&self) -> bool {
        !self.remaining.is_zero()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Add one burst of 50 to 100 particles at a random point.
    pub fn add_burst(&mut self) {
        let x = self.rng.random_range(0.0..self.width.max(1) as f32);
        let y = self.rng.random_range(0.0..self.height.max(1) as f32);
        let count = self.rng.random_range(50..=100);
        for _ in 0..count {
            let p = Particle::random(x, y, &mut self.rng);
            self.particles.push(p);
        }
    }

    /// Start a five second show.
    pub fn trigger(&mut self) {
        self.remaining = EFFECT_DURATION;
        for _ in 0..BURSTS_PER_TRIGGER {
            self.add_burst();
        }
    }

    pub fn stop(&mut self) {
        self.remaining = Duration::ZERO;
        self.particles.clear();
    }

    pub fn update(&mut self, dt: Duration) {
        if self.is_active() {
            self.remaining = self.remaining.saturating_sub(dt);
            if self.remaining.is_zero() {
                self.particles.clear();
            } else if self.rng.random_bool(EXTRA_BURST_CHANCE) {
                self.add_burst();
            }
        }

        let secs = dt.as_secs_f32();
        self.particles.retain_mut(|p| p.update(secs));
    }

    /// Draw live particles over whatever is already in `fb`.
    pub fn render_into(&self, fb: &mut FrameBuffer) {
        for p in &self.particles {
            if p.x < 0.0 || p.y < 0.0 {
                continue;
            }
            let (x, y) = (p.x as u16, p.y as u16);
            let bg = fb.get(x, y).map(|c| c.style.bg).unwrap_or_default();
            let style = CellStyle::new(p.color, bg);
            if p.fade() > 0.5 {
                fb.put_char(x, y, '*', style.bold());
            } else {
                fb.put_char(x, y, '.', style.dim());
            }
        }
    }
}

/// Milestone message that flashes through the palette.
#[derive(Debug, Clone, Default)]
pub struct RewardBanner {
    current: Option<(Milestone, Duration)>,
}

impl RewardBanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, milestone: Milestone) {
        self.current = Some((milestone, Duration::ZERO));
    }

    pub fn update(&mut self, dt: Duration) {
        if let Some((_, elapsed)) = &mut self.current {
            *elapsed += dt;
            if *elapsed >= EFFECT_DURATION {
                self.current = None;
            }
        }
    }

    pub fn milestone(&self) -> Option<Milestone> {
        self.current.map(|(m, _)| m)
    }

    /// Text and color of the banner, if one is showing.
    pub fn current(&self) -> Option<(&'static str, Rgb)> {
        self.current.map(|(m, elapsed)| {
            let idx = (elapsed.as_millis() / 100) as usize % PALETTE.len();
            (m.message(), PALETTE[idx])
        })
    }

    /// Draw centered on row `y`.
    pub fn render_into(&self, fb: &mut FrameBuffer, y: u16) {
        let Some((text, color)) = self.current() else {
            return;
        };
        let text_w = text.chars().count() as u16;
        let x = fb.width().saturating_sub(text_w) / 2;
        let style = CellStyle::new(color, Rgb::new(0, 0, 0)).bold();
        fb.put_str(x, y, text, style);
    }
}

/// Reacts to lock events with banners and fireworks.
#[derive(Debug, Clone)]
pub struct Rewards {
    pub banner: RewardBanner,
    pub fireworks: Fireworks,
    rng: StdRng,
}

impl Rewards {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
            None => StdRng::from_os_rng(),
        };
        Self {
            banner: RewardBanner::new(),
            fireworks: Fireworks::new(seed),
            rng,
        }
    }

    /// A milestone shows its banner; `Legendary` also fires fireworks, and a
    /// clear of three or more lines fires them with a 30% chance.
    pub fn on_lock(&mut self, event: &LockEvent) {
        if let Some(milestone) = event.milestone {
            self.banner.show(milestone);
            if milestone == Milestone::Legendary {
                self.fireworks.trigger();
                return;
            }
        }
        if event.lines_cleared >= BIG_CLEAR_LINES && self.rng.random_bool(BIG_CLEAR_FIREWORKS_CHANCE)
        {
            self.fireworks.trigger();
        }
    }

    pub fn update(&mut self, dt: Duration) {
        self.banner.update(dt);
        self.fireworks.update(dt);
    }

    /// Clear every running effect, e.g. on restart.
    pub fn reset(&mut self) {
        self.banner = RewardBanner::new();
        self.fireworks.stop();
    }

    pub fn set_area(&mut self, width: u16, height: u16) {
        self.fireworks.set_area(width, height);
    }

    pub fn render_into(&self, fb: &mut FrameBuffer, banner_y: u16) {
        self.fireworks.render_into(fb);
        self.banner.render_into(fb, banner_y);
    }
}
