//! # Timing
//!
//! Core leaderboard logic for an Assetto Corsa live-timing snapshot.
//!
//! ## Overall Data Structures
//!
//! In-memory structures:
//! - Raw snapshot (connected + disconnected driver lists, each driver holding
//!   a map of car model code to best lap): decoded straight from the server's
//!   `leaderboard.json`. Decoding is lenient, a broken driver entry degrades
//!   to sentinel/empty values instead of failing the batch.
//!
//! - Category map (model code -> category label): loaded once per request
//!   from the external store so every aggregation sees one consistent view.
//!   A model code without an assignment is its own category.
//!
//! - Leaderboard (general ranking + per-category rankings): rebuilt from
//!   scratch on every call, nothing is cached between requests.
//!
//! ## Notes
//! - Lap times are compared as nanosecond integers, never as formatted
//!   strings. `"10:00.000"` sorts before `"2:00.000"` lexicographically,
//!   which is exactly the bug this module exists to avoid.
//!
//! - Drivers without a single strictly-positive lap are left out of every
//!   ranking. A `--` row has no defensible position in a sorted list.

pub mod aggregate;
pub mod categories;
pub mod lap;
pub mod models;

pub use aggregate::{Leaderboard, StandingEntry, aggregate};
pub use categories::{CategoryMap, CategoryResolver};
pub use lap::LapTime;
pub use models::RawSnapshot;
