use std::collections::{BTreeSet, VecDeque};

use anyhow::{Context, Result};
use clap::Parser;
use levelgen::mapgen::GateState;
use levelgen::{
    BallotDraw, Direction, GRID_CELLS, Level, LevelConfig, LevelGenerator, check_progression,
};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use serde::Serialize;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 1000)]
    iterations: u32,
}

#[derive(Serialize, Default)]
struct Summary {
    levels: u32,
    floors: u64,
    gates: u64,
    free_gates: u64,
    items_collected: u64,
}

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn random_config(rng: &mut ChaCha8Rng) -> LevelConfig {
    let floors = 1 + rng.next_u64() as usize % GRID_CELLS;
    let probability = choose(rng, &[0.0, 0.25, 0.5, 0.75, 1.0]);
    let draw = choose(rng, &[BallotDraw::Uniform, BallotDraw::ExcludeLast]);
    LevelConfig::new(floors, rng.next_u64())
        .with_requirement_probability(probability)
        .with_ballot_draw(draw)
}

fn connected_floors(level: &Level) -> usize {
    let Some(start) = level.floor(level.origin()).map(|floor| floor.coord) else {
        return 0;
    };
    let mut open = VecDeque::from([start]);
    let mut seen = BTreeSet::from([start]);
    while let Some(coord) = open.pop_front() {
        for direction in Direction::CARDINALS {
            let next = coord.step(direction);
            if level.floor_at(next).is_some() && seen.insert(next) {
                open.push_back(next);
            }
        }
    }
    seen.len()
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("Starting level fuzz on seed {} for {} levels...", args.seed, args.iterations);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut summary = Summary::default();

    for _ in 0..args.iterations {
        let config = random_config(&mut rng);
        let case = serde_json::to_string(&config).context("Failed to encode fuzz case")?;
        let level = LevelGenerator::new(config.clone())
            .generate()
            .with_context(|| format!("Generation failed for {case}"))?;

        // Assert invariants
        assert_eq!(level.floors.len(), config.floor_count, "Invariant failed: floor count {case}");
        assert_eq!(
            connected_floors(&level),
            config.floor_count,
            "Invariant failed: disconnected floors {case}"
        );
        assert_eq!(
            level.assignment_order.len(),
            level.gates.len(),
            "Invariant failed: unassigned gate {case}"
        );
        let progression = check_progression(&level);
        assert!(progression.completable, "Invariant failed: level cannot be finished {case}");
        let again = LevelGenerator::new(config).generate()?;
        assert_eq!(
            again.fingerprint(),
            level.fingerprint(),
            "Invariant failed: nondeterminism {case}"
        );

        summary.levels += 1;
        summary.floors += level.floors.len() as u64;
        summary.gates += level.gates.len() as u64;
        summary.free_gates += level
            .gates
            .iter()
            .filter(|gate| matches!(&gate.state, GateState::Assigned(req) if req.is_empty()))
            .count() as u64;
        summary.items_collected += u64::from(progression.items_collected);
    }

    println!("{}", serde_json::to_string_pretty(&summary)?);
    println!("Fuzzing completed successfully.");
    Ok(())
}
