//! Tryhard command-line entry point.
//!
//! The binary has no window of its own. It runs the game core headless and
//! offers level tooling:
//!
//! - `simulate` – play a level for a number of frames with scripted input
//! - `validate` – check that level files parse and every tile has an image
//! - `autotile` – autotile a level file in place or into `--output`
//! - `info` – tile counts per kind and spawner markers
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --config ./config.ini simulate --level 1 --frames 600 --right
//! ```

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::{error, info, warn};

use tryhard::assets::{HeadlessAssets, validate_level};
use tryhard::game::Game;
use tryhard::resources::gameconfig::GameConfig;
use tryhard::resources::input::HeldActions;
use tryhard::resources::tilegrid::{TileGrid, TileKind};

/// Tryhard platformer core and level tools
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a level headless and report how it went.
    Simulate {
        #[arg(long, default_value_t = 1)]
        level: u32,
        #[arg(long, default_value_t = 600)]
        frames: u32,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Hold left the whole run.
        #[arg(long)]
        left: bool,
        /// Hold right the whole run.
        #[arg(long)]
        right: bool,
        /// Press jump every N frames.
        #[arg(long, value_name = "N")]
        jump_every: Option<u32>,
        /// Press dash every N frames.
        #[arg(long, value_name = "N")]
        dash_every: Option<u32>,
    },
    /// Check level files; defaults to every level in the maps directory.
    Validate { levels: Vec<PathBuf> },
    /// Autotile a level file.
    Autotile {
        level: PathBuf,
        /// Write here instead of overwriting the input.
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Print tile statistics for a level file.
    Info { level: PathBuf },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GameConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        warn!("Using default configuration: {}", e);
    }

    let result = match cli.command {
        Command::Simulate {
            level,
            frames,
            seed,
            left,
            right,
            jump_every,
            dash_every,
        } => simulate(
            config,
            level,
            frames,
            seed,
            Script {
                left,
                right,
                jump_every,
                dash_every,
            },
        ),
        Command::Validate { levels } => validate(&config, levels),
        Command::Autotile { level, output } => autotile(&level, output.as_deref()),
        Command::Info { level } => print_info(&level),
    };

    if let Err(e) = result {
        error!("{e}");
        std::process::exit(1);
    }
}

struct Script {
    left: bool,
    right: bool,
    jump_every: Option<u32>,
    dash_every: Option<u32>,
}

impl Script {
    /// Held keys on `frame`. Periodic presses are held for one frame.
    fn held(&self, frame: u32) -> HeldActions {
        let due = |every: Option<u32>| every.is_some_and(|n| n > 0 && frame % n == 0);
        HeldActions {
            left: self.left,
            right: self.right,
            jump: due(self.jump_every),
            dash: due(self.dash_every),
            pause: false,
        }
    }
}

fn simulate(
    config: GameConfig,
    level: u32,
    frames: u32,
    seed: u64,
    script: Script,
) -> Result<(), Box<dyn Error>> {
    let assets = HeadlessAssets::new();
    let mut game = Game::new(config, &assets, seed)?;
    game.load_level(level)?;

    for frame in 0..frames {
        game.frame(script.held(frame))?;
        game.drain_audio();
        if game.should_quit() {
            break;
        }
    }

    let enemies = game.enemy_count();
    let state = game.level_state();
    info!(
        "After {} frames: level {}, deaths {}, enemies left {}",
        frames, state.level, state.death_counter, enemies
    );
    if let Some(player) = game.player() {
        info!("Player at {:?} in state {:?}", player.body.pos, player.state);
    }
    Ok(())
}

fn validate(config: &GameConfig, mut levels: Vec<PathBuf>) -> Result<(), Box<dyn Error>> {
    if levels.is_empty() {
        for entry in fs::read_dir(&config.maps_dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                levels.push(path);
            }
        }
        levels.sort();
    }

    let assets = HeadlessAssets::new();
    let mut failures = 0;
    for path in &levels {
        match TileGrid::load(path).map_err(Box::<dyn Error>::from).and_then(|grid| {
            validate_level(&grid, &assets)?;
            Ok(grid)
        }) {
            Ok(grid) => info!("{}: ok, {} tiles", path.display(), grid.len()),
            Err(e) => {
                error!("{}: {}", path.display(), e);
                failures += 1;
            }
        }
    }
    info!("{} of {} levels valid", levels.len() - failures, levels.len());
    if failures > 0 {
        return Err(format!("{failures} invalid level files").into());
    }
    Ok(())
}

fn autotile(level: &Path, output: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let mut grid = TileGrid::load(level)?;
    let changed = grid.autotile();
    let target = output.unwrap_or(level);
    grid.save(target)?;
    info!("Autotiled {} tiles, wrote {}", changed, target.display());
    Ok(())
}

fn print_info(level: &Path) -> Result<(), Box<dyn Error>> {
    let mut grid = TileGrid::load(level)?;
    info!(
        "{}: tile size {}, {} on-grid, {} off-grid",
        level.display(),
        grid.tile_size(),
        grid.tiles().count(),
        grid.offgrid().len()
    );
    for (kind, count) in grid.count_by_kind() {
        info!("  {:<12} {}", kind.to_string(), count);
    }
    let markers = grid.extract(&[(TileKind::Spawner, 0), (TileKind::Spawner, 1)], true);
    let enemies = markers.iter().filter(|m| m.variant == 1).count();
    info!(
        "  player start: {}, enemies: {}",
        if markers.iter().any(|m| m.variant == 0) {
            "yes"
        } else {
            "no"
        },
        enemies
    );
    Ok(())
}
