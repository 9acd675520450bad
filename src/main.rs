//! Terminal runner (default binary).
//!
//! Owns one board engine and drives it at a fixed tick: render, poll input
//! until the next tick, apply actions, advance gravity, react to lock events.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::event::{self, Event, KeyEventKind};
use tracing::{info, Level};

use tetris_board::core::{BoardEngine, EngineConfig, EngineSnapshot, LockEvent, Randomizer};
use tetris_board::input::{handle_key_event, is_held_action, should_quit, InputHandler};
use tetris_board::term::{FrameBuffer, GameView, Rewards, TerminalRenderer, Viewport};
use tetris_board::types::{
    GameAction, DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH, DEFAULT_DROP_INTERVAL_MS, TICK_MS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RandomizerArg {
    /// Every kind equally likely on each draw
    Uniform,
    /// One of each kind per shuffled bag of seven
    Bag,
}

/// tetris-board - falling-block puzzle in the terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Board columns
    #[arg(long, default_value_t = DEFAULT_BOARD_WIDTH)]
    width: u16,

    /// Board rows
    #[arg(long, default_value_t = DEFAULT_BOARD_HEIGHT)]
    height: u16,

    /// Gravity interval in milliseconds
    #[arg(long, default_value_t = DEFAULT_DROP_INTERVAL_MS as u64)]
    drop_interval_ms: u64,

    /// Multiplier for every line clear score and milestone
    #[arg(long, default_value_t = 1)]
    score_scale: u32,

    /// Hidden rows above the board where pieces spawn
    #[arg(long, default_value_t = 0)]
    spawn_buffer: u16,

    /// Seed for piece selection and effects
    #[arg(short, long)]
    seed: Option<u64>,

    /// Piece selection rule
    #[arg(long, value_enum, default_value_t = RandomizerArg::Uniform)]
    randomizer: RandomizerArg,

    /// Write logs to this file (the terminal is in use by the game)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log debug events (spawns, locks)
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn engine_config(&self) -> EngineConfig {
        let randomizer = match self.randomizer {
            RandomizerArg::Uniform => Randomizer::Uniform,
            RandomizerArg::Bag => Randomizer::SevenBag,
        };
        let config = EngineConfig::default()
            .with_size(self.width, self.height)
            .with_drop_interval(Duration::from_millis(self.drop_interval_ms))
            .with_score_scale(self.score_scale)
            .with_spawn_buffer_rows(self.spawn_buffer)
            .with_randomizer(randomizer);
        match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }
}

fn init_logging(args: &Args) -> Result<()> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let config = args.engine_config();
    let engine = BoardEngine::new(config.clone()).context("invalid board configuration")?;
    info!(
        width = config.width,
        height = config.height,
        seed = ?config.seed,
        "starting game"
    );

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, engine, args.seed);

    // Always try to restore terminal state.
    let _ = term.exit();

    if let Ok(score) = &result {
        println!("Final score: {score}");
    }
    result.map(|_| ())
}

/// Apply one action and pass the lock it caused, if any, to `on_lock`.
///
/// The engine keeps only the latest lock, so it has to be taken before the
/// next action can lock again.
fn apply_observed(
    engine: &mut BoardEngine,
    action: GameAction,
    mut on_lock: impl FnMut(&LockEvent),
) -> bool {
    let applied = engine.apply_action(action);
    if let Some(lock) = engine.take_last_event() {
        on_lock(&lock);
    }
    applied
}

/// Game loop. Returns the score of the last game.
fn run(term: &mut TerminalRenderer, mut engine: BoardEngine, seed: Option<u64>) -> Result<u64> {
    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = EngineSnapshot::default();
    let mut input = InputHandler::new();
    let mut rewards = Rewards::new(seed);

    let tick_duration = Duration::from_millis(TICK_MS as u64);
    let mut last_tick = Instant::now();

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        engine.snapshot_into(&mut snap);
        view.render_into(&snap, Viewport::new(w, h), &mut fb);
        rewards.set_area(w, h);
        let banner_y = view.layout(&snap, Viewport::new(w, h)).start_y.saturating_sub(1);
        rewards.render_into(&mut fb, banner_y);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => match key.kind {
                    KeyEventKind::Press => {
                        if should_quit(key) {
                            info!(score = engine.score(), "quit");
                            return Ok(engine.score());
                        }

                        if let Some(action) = input.handle_key_press(key.code) {
                            apply_observed(&mut engine, action, |lock| rewards.on_lock(lock));
                        }

                        if let Some(action) = handle_key_event(key) {
                            if !is_held_action(action) {
                                if action == GameAction::Restart {
                                    input.reset();
                                    rewards.reset();
                                }
                                apply_observed(&mut engine, action, |lock| {
                                    rewards.on_lock(lock)
                                });
                            }
                        }
                    }
                    // DAS/ARR handles repeats internally.
                    KeyEventKind::Repeat => {}
                    KeyEventKind::Release => input.handle_key_release(key.code),
                },
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        let elapsed = last_tick.elapsed();
        if elapsed >= tick_duration {
            last_tick = Instant::now();

            for action in input.update(elapsed.as_millis() as u32) {
                apply_observed(&mut engine, action, |lock| rewards.on_lock(lock));
            }
            engine.set_soft_dropping(input.soft_drop_held());
            engine.tick(elapsed);

            if let Some(lock) = engine.take_last_event() {
                rewards.on_lock(&lock);
            }
            rewards.update(elapsed);
        }
    }
}
