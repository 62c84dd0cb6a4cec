use std::{collections::HashMap, sync::Arc};

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use timing::{CategoryMap, Leaderboard, aggregate};
use tracing::{info, warn};

use crate::{
    database::{
        assign_category, list_assignments, load_category_map, set_category_color,
        unassign_vehicle,
    },
    error::AppError,
    fetch::{fetch_snapshot, transform_url},
    notify::notify_update,
    state::AppState,
};

#[derive(Deserialize)]
pub struct LeaderboardRequest {
    url: String,
}

/// Fetches the raw snapshot from the caller-supplied server URL and
/// recomputes both rankings from scratch.
pub async fn leaderboard_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LeaderboardRequest>,
) -> Result<Json<Leaderboard>, AppError> {
    let api_url = transform_url(&payload.url);
    let snapshot = fetch_snapshot(&state.http_client, &api_url).await?;

    let mut connection = state.redis_connection.clone();
    let categories = match load_category_map(&mut connection).await {
        Ok(categories) => categories,
        Err(e) => {
            warn!("Category store unavailable, falling back to identity categories: {e}");
            CategoryMap::empty()
        }
    };

    let board = aggregate(&snapshot, &categories);

    info!(
        "Processed {} drivers in {} categories",
        board.general.len(),
        board.categorias.len()
    );

    Ok(Json(board))
}

#[derive(Serialize)]
pub struct CategoriesResponse {
    vehicles: HashMap<String, String>,
    colors: HashMap<String, String>,
}

pub async fn categories_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CategoriesResponse>, AppError> {
    let mut connection = state.redis_connection.clone();
    let (vehicles, colors) = list_assignments(&mut connection).await?;

    Ok(Json(CategoriesResponse { vehicles, colors }))
}

#[derive(Deserialize)]
pub struct AssignmentRequest {
    vehicle: String,
    category: String,
    color: Option<String>,
}

pub async fn assign_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AssignmentRequest>,
) -> Result<StatusCode, AppError> {
    let vehicle = payload.vehicle.trim();
    let category = payload.category.trim();

    if vehicle.is_empty() || category.is_empty() {
        return Err(AppError::MalformedPayload);
    }

    let mut connection = state.redis_connection.clone();
    assign_category(&mut connection, vehicle, category).await?;

    if let Some(color) = payload.color.as_deref() {
        set_category_color(&mut connection, category, color).await?;
    }

    notify_update(&state.updates);

    Ok(StatusCode::NO_CONTENT)
}

pub async fn unassign_handler(
    State(state): State<Arc<AppState>>,
    Path(vehicle): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut connection = state.redis_connection.clone();

    if !unassign_vehicle(&mut connection, &vehicle).await? {
        return Ok(StatusCode::NOT_FOUND);
    }

    notify_update(&state.updates);

    Ok(StatusCode::NO_CONTENT)
}
