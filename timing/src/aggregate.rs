//! Turns one raw snapshot into the two ranked views: best lap per driver
//! overall, and best lap per driver within each category.
//!
//! Minima are tracked as nanosecond values and only formatted at the very
//! end; a driver's time in one category never influences their entry in
//! another.

use std::collections::{BTreeMap, HashMap, hash_map::Entry};

use serde::Serialize;

use crate::{categories::CategoryResolver, lap::LapTime, models::RawSnapshot};

/// One ranking row, lap already formatted for the wire.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct StandingEntry {
    pub name: String,
    pub bestlap: String,
}

/// Aggregation output. Serializes to the `{general, categorias}` body the
/// frontend consumes. Rebuilt whole on every request.
#[derive(Serialize, Debug, Default, PartialEq, Eq)]
pub struct Leaderboard {
    pub general: Vec<StandingEntry>,
    pub categorias: BTreeMap<String, Vec<StandingEntry>>,
}

/// Computes both rankings from a snapshot and a category view.
///
/// Drivers showing up in both the connected and disconnected lists merge
/// into one row holding their minimum valid lap. Drivers without a single
/// strictly-positive lap are omitted from every ranking.
pub fn aggregate<R: CategoryResolver>(snapshot: &RawSnapshot, resolver: &R) -> Leaderboard {
    let mut global: HashMap<String, LapTime> = HashMap::new();
    let mut grouped: HashMap<String, HashMap<String, LapTime>> = HashMap::new();

    for driver in snapshot.drivers() {
        let name = driver.name();

        for (model_code, timing) in &driver.cars {
            let lap = timing.best_lap;

            if !lap.is_valid() {
                continue;
            }

            track_best(&mut global, name, lap);

            let category = resolver.resolve(model_code);
            track_best(grouped.entry(category).or_default(), name, lap);
        }
    }

    Leaderboard {
        general: ranked(global),
        categorias: grouped
            .into_iter()
            .map(|(category, bests)| (category, ranked(bests)))
            .collect(),
    }
}

fn track_best(bests: &mut HashMap<String, LapTime>, name: &str, lap: LapTime) {
    match bests.entry(name.to_string()) {
        Entry::Vacant(entry) => {
            entry.insert(lap);
        }
        Entry::Occupied(mut entry) => {
            if lap < *entry.get() {
                entry.insert(lap);
            }
        }
    }
}

/// Ascending by numeric duration, driver name breaks ties.
fn ranked(bests: HashMap<String, LapTime>) -> Vec<StandingEntry> {
    let mut rows: Vec<(String, LapTime)> = bests.into_iter().collect();
    rows.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

    rows.into_iter()
        .map(|(name, lap)| StandingEntry {
            name,
            bestlap: lap.format(),
        })
        .collect()
}
