use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use levelgen::mapgen::{Gate, GateState};
use levelgen::{
    BallotDraw, BoundaryPos, Direction, GRID_RADIUS, GridCoord, Level, LevelConfig,
    LevelGenerator, check_progression, load_level, save_level,
};
use log::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a level and print its layout
    Generate {
        /// TOML file with level settings; flags below override it
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        floors: Option<usize>,
        #[arg(short, long)]
        seed: Option<u64>,
        /// Chance that each discovered collectable type is added to a gate
        #[arg(short, long)]
        probability: Option<f64>,
        /// Draw ballot indices from [0, len - 1) instead of the whole ballot
        #[arg(long)]
        legacy_ballot: bool,
        /// Write the level as a checksummed JSON file
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Load a saved level, verify its digest and print its layout
    Inspect {
        #[arg(short, long)]
        level: PathBuf,
    },
}

fn load_config(path: &Path) -> Result<LevelConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Failed to parse config: {}", path.display()))
}

fn gate_label(gate: &Gate) -> String {
    match &gate.state {
        GateState::Unassigned => "unassigned".to_string(),
        GateState::Assigned(requirement) => format!("needs {requirement}"),
        GateState::Opened(requirement) => format!("opened (paid {requirement})"),
    }
}

/// Draws the grid top row first: themed cells, `|`/`---` for walls, `+` for gates.
fn render(level: &Level) -> String {
    let edge = |coord: GridCoord, direction: Direction, gate: &str, wall: &str, none: &str| {
        let here = level.floor_at(coord).is_some();
        let there = level.floor_at(coord.step(direction)).is_some();
        if level.gate_at(BoundaryPos::between(coord, direction)).is_some() {
            gate.to_string()
        } else if here || there {
            wall.to_string()
        } else {
            none.to_string()
        }
    };

    let mut out = String::new();
    for y in (-GRID_RADIUS..=GRID_RADIUS).rev() {
        let mut border = String::new();
        let mut cells = String::new();
        for x in -GRID_RADIUS..=GRID_RADIUS {
            let coord = GridCoord::new(x, y);
            border.push(' ');
            border.push_str(&edge(coord, Direction::Up, " + ", "---", "   "));
            cells.push_str(&edge(coord, Direction::Left, "+", "|", " "));
            let glyph = level.floor_at(coord).map_or(' ', |floor| floor.theme.glyph());
            let marker = if coord.is_origin() { '*' } else { ' ' };
            cells.push(marker);
            cells.push(glyph);
            cells.push(' ');
        }
        let last = GridCoord::new(GRID_RADIUS, y);
        cells.push_str(&edge(last, Direction::Right, "+", "|", " "));
        out.push_str(border.trim_end());
        out.push('\n');
        out.push_str(cells.trim_end());
        out.push('\n');
    }
    let mut bottom = String::new();
    for x in -GRID_RADIUS..=GRID_RADIUS {
        bottom.push(' ');
        let coord = GridCoord::new(x, -GRID_RADIUS);
        bottom.push_str(&edge(coord, Direction::Down, " + ", "---", "   "));
    }
    out.push_str(bottom.trim_end());
    out.push('\n');
    out
}

fn report(level: &Level) {
    println!(
        "{} floors, seed {}, p={} ({:?} ballot)",
        level.floors.len(),
        level.config.seed,
        level.config.requirement_probability,
        level.config.ballot_draw
    );
    print!("{}", render(level));
    for (step, gate_id) in level.assignment_order.iter().enumerate() {
        if let Some(gate) = level.gate(*gate_id) {
            let (a, b) = gate.boundary.cells();
            let (x, y) = gate.placement.world_position();
            println!(
                "{:>3}. gate {:?} -> {:?} at ({x:.1}, {y:.1}): {}",
                step + 1,
                a,
                b,
                gate_label(gate)
            );
        }
    }
    let progression = check_progression(level);
    println!("Completable: {}", progression.completable);
    println!("Collectables needed: {}", progression.items_collected);
    println!("Fingerprint: {:016x}", level.fingerprint());
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Command::Generate { config, floors, seed, probability, legacy_ballot, out } => {
            let mut settings = match &config {
                Some(path) => load_config(path)?,
                None => LevelConfig::default(),
            };
            if let Some(floors) = floors {
                settings.floor_count = floors;
            }
            if let Some(seed) = seed {
                settings.seed = seed;
            }
            if let Some(probability) = probability {
                settings.requirement_probability = probability;
            }
            if legacy_ballot {
                settings.ballot_draw = BallotDraw::ExcludeLast;
            }

            let level = LevelGenerator::new(settings)
                .generate()
                .with_context(|| "Level generation failed")?;
            report(&level);

            if let Some(path) = out {
                save_level(&path, &level)
                    .with_context(|| format!("Failed to write level: {}", path.display()))?;
                info!("wrote level to {}", path.display());
            }
        }
        Command::Inspect { level } => {
            let loaded = load_level(&level)
                .with_context(|| format!("Failed to load level: {}", level.display()))?;
            report(&loaded);
        }
    }

    Ok(())
}
