//! Terminal battle runner (default binary).
//!
//! This is the primary gameplay entrypoint.
//! It uses crossterm for input and a custom framebuffer-based renderer,
//! and drives the battle controller with a fixed simulation tick.

use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};

use cascade_quest::core::{BattleConfig, BattleController, BattleSnapshot, Player, Potion};
use cascade_quest::input::{handle_mouse_event, should_quit, InputHandler};
use cascade_quest::term::{BattleView, FrameBuffer, TerminalRenderer, Viewport};
use cascade_quest::types::{BattlePhase, PotionKind, Rarity, SpecialKind, SPAWN_DELAY};

/// Potions carried into every battle
const STARTER_BELT: [Potion; 3] = [
    Potion::new(PotionKind::Health, Rarity::Common),
    Potion::new(PotionKind::FreezeTime, Rarity::Common),
    Potion::new(PotionKind::Explosive, Rarity::Uncommon),
];

#[derive(Debug, Parser)]
#[command(
    name = "cascade-quest",
    version,
    about = "Falling-pair cascade puzzle coupled to a real-time battle, in the terminal."
)]
struct Args {
    /// Seed for the piece bag, encounter and particles.
    #[arg(long, default_value = "1", value_name = "N")]
    seed: u32,

    /// Dungeon floor; every fifth floor is a boss floor.
    #[arg(long, default_value = "1", value_name = "N")]
    floor: u32,

    /// Start fighting immediately instead of after the 3 s countdown.
    #[arg(long)]
    no_countdown: bool,

    /// Disable the hard-drop key.
    #[arg(long)]
    no_hard_drop: bool,

    /// Spawn rate for a special cell kind, e.g. `bomb=0.1`. Repeatable.
    #[arg(long = "special-rate", value_name = "KIND=RATE", value_parser = parse_special_rate)]
    special_rates: Vec<(SpecialKind, f32)>,

    /// Simulation tick in milliseconds.
    #[arg(long, default_value = "16", value_name = "MS")]
    tick_ms: u64,

    /// Log filter (error, warn, info, debug, trace). Overrides RUST_LOG.
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<log::LevelFilter>,
}

fn parse_special_rate(s: &str) -> Result<(SpecialKind, f32), String> {
    let (kind, rate) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KIND=RATE, got `{s}`"))?;
    let kind = SpecialKind::from_str(kind.trim()).ok_or_else(|| format!("unknown special `{kind}`"))?;
    let rate: f32 = rate
        .trim()
        .parse()
        .map_err(|e| format!("bad rate `{rate}`: {e}"))?;
    Ok((kind, rate))
}

fn init_logging(level: Option<log::LevelFilter>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_level);

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &args);

    // Always try to restore terminal state.
    let _ = term.exit();
    let outcome = result?;
    match outcome {
        BattlePhase::Victory => println!("Victory on floor {}.", args.floor),
        BattlePhase::Defeat => println!("Defeated on floor {}.", args.floor),
        _ => println!("Battle abandoned."),
    }
    Ok(())
}

fn run(term: &mut TerminalRenderer, args: &Args) -> Result<BattlePhase> {
    let mut player = Player::default();
    for &(kind, rate) in args.special_rates.iter() {
        player.grant_special(kind, rate);
    }
    for potion in STARTER_BELT {
        player.belt_mut().add(potion);
    }

    let config = BattleConfig {
        seed: args.seed,
        floor: args.floor,
        countdown: !args.no_countdown,
        enable_hard_drop: !args.no_hard_drop,
        spawn_delay: SPAWN_DELAY,
    };
    let mut battle = BattleController::new(config, player);

    let view = BattleView::default();
    let mut input_handler = InputHandler::new();
    let mut snapshot = BattleSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);

    let tick_ms = args.tick_ms.max(1);
    let tick_duration = Duration::from_millis(tick_ms);
    let dt = tick_ms as f32 / 1000.0;
    let mut last_tick = Instant::now();

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let viewport = Viewport::new(w, h);
        battle.snapshot_into(&mut snapshot);
        view.render_into(&snapshot, viewport, &mut fb);
        term.present(&mut fb, snapshot.phase)?;
        log::trace!("frame: {} bytes", term.last_frame_bytes());

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Press && should_quit(key) {
                        return Ok(battle.phase());
                    }
                    if let Some(input) = input_handler.handle_key_event(key) {
                        battle.apply_input(input);
                    }
                }
                Event::Mouse(mouse) => {
                    if let Some(input) = handle_mouse_event(mouse, view.arena_origin(viewport)) {
                        battle.apply_input(input);
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();

            if let Some(input) = input_handler.update() {
                battle.apply_input(input);
            }
            battle.update(dt);

            if let Some(phase) = battle.take_phase_change() {
                log::info!("phase changed to {}", phase.as_str());
            }
        }
    }
}
