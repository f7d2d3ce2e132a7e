//! JSON level snapshots guarded by a SHA-256 digest.
//!
//! The file holds a format version, the hex SHA-256 of the level's canonical
//! bytes, and the level itself. Loading rebuilds the canonical bytes from the
//! parsed level and rejects the file when the digest no longer matches. A
//! level whose digest checks out must still describe a level the generator
//! could have produced before it is handed back.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::mapgen::Level;
use crate::types::GridCoord;

pub const LEVEL_FORMAT_VERSION: u16 = 1;

#[derive(Serialize, Deserialize, Debug)]
struct LevelFile {
    format_version: u16,
    sha256_hex: String,
    level: Level,
}

/// Compute `hex(SHA-256(canonical_bytes))`.
pub fn level_digest(level: &Level) -> String {
    let mut hasher = Sha256::new();
    hasher.update(level.canonical_bytes());
    let result = hasher.finalize();
    format!("{result:064x}")
}

#[derive(Error, Debug)]
pub enum LevelFileError {
    #[error("level file I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid level file: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("unsupported level format version {found} (expected {LEVEL_FORMAT_VERSION})")]
    UnsupportedVersion { found: u16 },

    #[error("level digest mismatch: stored {stored}, computed {computed}")]
    DigestMismatch { stored: String, computed: String },

    #[error("structurally invalid level: {0}")]
    InvalidLevel(String),
}

/// Writes `level` as pretty JSON with its format version and digest.
///
/// Missing parent directories are created.
pub fn save_level(path: &Path, level: &Level) -> Result<(), LevelFileError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = LevelFile {
        format_version: LEVEL_FORMAT_VERSION,
        sha256_hex: level_digest(level),
        level: level.clone(),
    };
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &file)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Reads a level written by [`save_level`].
///
/// The file is rejected when its version is unknown, its digest does not match
/// the parsed level, or the level breaks a generation invariant (see
/// [`check_structure`]).
pub fn load_level(path: &Path) -> Result<Level, LevelFileError> {
    let content = fs::read_to_string(path)?;
    let file: LevelFile = serde_json::from_str(&content)?;

    if file.format_version != LEVEL_FORMAT_VERSION {
        return Err(LevelFileError::UnsupportedVersion { found: file.format_version });
    }

    let computed = level_digest(&file.level);
    if computed != file.sha256_hex {
        return Err(LevelFileError::DigestMismatch { stored: file.sha256_hex, computed });
    }

    check_structure(&file.level).map_err(LevelFileError::InvalidLevel)?;
    Ok(file.level)
}

/// Checks the invariants every generated level holds: a valid config, one floor
/// per requested count, the origin first, distinct in-bounds cells, and every
/// gate, spawn and assignment entry pointing at something that exists.
pub fn check_structure(level: &Level) -> Result<(), String> {
    level.config.validate().map_err(|err| err.to_string())?;

    let expected = level.config.floor_count;
    if level.floors.len() != expected || level.placement_order.len() != expected {
        return Err(format!(
            "expected {expected} floors, found {} floors and {} placements",
            level.floors.len(),
            level.placement_order.len()
        ));
    }

    let mut placed = BTreeSet::new();
    let mut cells = BTreeSet::new();
    for &id in &level.placement_order {
        let floor = level.floor(id).ok_or_else(|| format!("placement {id:?} has no floor"))?;
        if floor.id != id {
            return Err(format!("floor stored under {id:?} claims id {:?}", floor.id));
        }
        if !floor.coord.in_bounds() {
            return Err(format!("floor at {:?} is outside the grid", floor.coord));
        }
        if !placed.insert(id) || !cells.insert(floor.coord) {
            return Err(format!("floor {id:?} at {:?} appears twice", floor.coord));
        }
    }
    if level.floors_in_order().next().map(|floor| floor.coord) != Some(GridCoord::ORIGIN) {
        return Err("first placed floor is not at the origin".to_string());
    }

    for (index, gate) in level.gates.iter().enumerate() {
        if let Some(missing) = gate.floors.iter().find(|id| level.floor(**id).is_none()) {
            return Err(format!("gate {index} joins unknown floor {missing:?}"));
        }
    }
    if let Some(gate) = level.assignment_order.iter().find(|gate| level.gate(**gate).is_none()) {
        return Err(format!("assignment order names unknown gate {}", gate.0));
    }
    let stray = level.collectables.iter().find(|spawn| level.floor(spawn.floor).is_none());
    if let Some(spawn) = stray {
        return Err(format!("collectable placed on unknown floor {:?}", spawn.floor));
    }
    Ok(())
}
