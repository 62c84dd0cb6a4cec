//! # Redis
//!
//! Holds the externally edited vehicle -> category assignments.
//!
//! ## Implementation
//!
//! - One hash for assignments: field = car model code, value = category
//!   label. A hash field holds exactly one value, so a vehicle has at most
//!   one category and "first assigned category" is deterministic.
//! - One hash for display colors: field = category label, value = `#rrggbb`.
//! - `HGETALL` per aggregation gives each request one consistent view of
//!   the assignments; Redis serializes the admin writes against it.
use std::{collections::HashMap, time::Duration};

use redis::{
    AsyncCommands, Client, RedisError,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use timing::CategoryMap;
use tracing::info;

const VEHICLE_CATEGORIES_KEY: &str = "categories:vehicles";
const CATEGORY_COLORS_KEY: &str = "categories:colors";

const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("GT/Track-Day", "#3273dc"),
    ("Hypercar", "#ff3860"),
    ("Rally", "#23d160"),
    ("Concept", "#ffdd57"),
    ("Formula", "#9b59b6"),
    ("Drift", "#e67e22"),
];

pub async fn init_redis(redis_url: &str) -> ConnectionManager {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_millis(100));

    let client = Client::open(redis_url).unwrap();
    let connection_manager = client
        .get_connection_manager_with_config(config)
        .await
        .unwrap();

    connection_manager
}

/// Default category colors, written only when absent so admin edits
/// survive restarts.
pub async fn seed_categories(connection: &mut ConnectionManager) -> Result<(), RedisError> {
    for (name, color) in DEFAULT_CATEGORIES {
        let created: bool = connection.hset_nx(CATEGORY_COLORS_KEY, name, color).await?;

        if created {
            info!("Seeded category {name}");
        }
    }

    Ok(())
}

pub async fn load_category_map(connection: &mut ConnectionManager) -> Result<CategoryMap, RedisError> {
    let assignments: HashMap<String, String> =
        connection.hgetall(VEHICLE_CATEGORIES_KEY).await?;

    Ok(CategoryMap::new(assignments))
}

pub async fn list_assignments(
    connection: &mut ConnectionManager,
) -> Result<(HashMap<String, String>, HashMap<String, String>), RedisError> {
    let vehicles: HashMap<String, String> = connection.hgetall(VEHICLE_CATEGORIES_KEY).await?;
    let colors: HashMap<String, String> = connection.hgetall(CATEGORY_COLORS_KEY).await?;

    Ok((vehicles, colors))
}

pub async fn assign_category(
    connection: &mut ConnectionManager,
    vehicle: &str,
    category: &str,
) -> Result<(), RedisError> {
    let _: () = connection
        .hset(VEHICLE_CATEGORIES_KEY, vehicle, category)
        .await?;

    Ok(())
}

pub async fn set_category_color(
    connection: &mut ConnectionManager,
    category: &str,
    color: &str,
) -> Result<(), RedisError> {
    let _: () = connection.hset(CATEGORY_COLORS_KEY, category, color).await?;

    Ok(())
}

/// Returns whether the vehicle had an assignment to remove.
pub async fn unassign_vehicle(
    connection: &mut ConnectionManager,
    vehicle: &str,
) -> Result<bool, RedisError> {
    let removed: usize = connection.hdel(VEHICLE_CATEGORIES_KEY, vehicle).await?;

    Ok(removed > 0)
}
