//! Plays a finished level the way a player would to confirm it can be completed.
//!
//! The player starts on the origin, can farm any collectable type whose floor
//! they have reached (collectables respawn), and opens a gate once they can pay
//! for it. The level is completable when every floor is reached and every gate
//! is opened.

use std::collections::BTreeSet;

use log::debug;

use crate::inventory::Inventory;
use crate::types::{CollectableType, FloorId};

use super::model::{GateId, Level};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressionReport {
    pub reachable_floors: BTreeSet<FloorId>,
    pub available_types: BTreeSet<CollectableType>,
    pub opened_gates: Vec<GateId>,
    /// Total collectables picked up to pay every gate that was opened.
    pub items_collected: u32,
    pub completable: bool,
}

pub fn check_progression(level: &Level) -> ProgressionReport {
    let mut gates = level.gates.clone();
    let origin = level.origin();
    let mut reachable = BTreeSet::from([origin]);
    let mut available = BTreeSet::new();
    if let Some(floor) = level.floor(origin) {
        available.insert(floor.collectable());
    }
    let mut wallet = Inventory::new();
    let mut opened = Vec::new();
    let mut items_collected = 0;

    loop {
        let next = gates.iter().enumerate().find(|(_, gate)| {
            !gate.is_open()
                && gate.floors.iter().any(|floor| reachable.contains(floor))
                && gate.requirement().is_some_and(|requirement| {
                    requirement.types_required().iter().all(|kind| available.contains(kind))
                })
        });
        let Some((index, _)) = next else {
            break;
        };

        let gate = &mut gates[index];
        if let Some(requirement) = gate.requirement() {
            for (kind, count) in requirement.iter() {
                for _ in wallet.count(kind)..count {
                    wallet.add_item(kind);
                    items_collected += 1;
                }
            }
        }
        if gate.open(&mut wallet).is_err() {
            break;
        }
        opened.push(GateId(index));

        for floor in gate.floors {
            if reachable.insert(floor)
                && let Some(floor) = level.floor(floor)
            {
                available.insert(floor.collectable());
            }
        }
    }

    let completable = reachable.len() == level.floors.len() && opened.len() == level.gates.len();
    debug!(
        "progression reached {}/{} floors, opened {}/{} gates",
        reachable.len(),
        level.floors.len(),
        opened.len(),
        level.gates.len()
    );
    ProgressionReport {
        reachable_floors: reachable,
        available_types: available,
        opened_gates: opened,
        items_collected,
        completable,
    }
}
