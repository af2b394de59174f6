//! Song catalog API handlers.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use songbook_core::{Song, SongPage, VersePage};

use super::error::ApiError;
use super::validation::{self, CreateSongBody, UpdateSongBody};
use crate::metrics::SONGS_CREATED_TOTAL;
use crate::state::AppState;

/// List songs, optionally filtered, one page at a time
pub async fn list_songs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<SongPage>, ApiError> {
    let pagination = state.pagination();
    let request = validation::page_request(
        &params,
        pagination.default_songs_limit,
        pagination.max_limit,
    )?;
    let filter = validation::song_filter(&params)?;

    let page = state.songs().list(&filter, request)?;
    Ok(Json(page))
}

/// Create a song; details are looked up in the background
pub async fn create_song(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateSongBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Song>), ApiError> {
    let Json(body) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    body.validate()?;

    let song = state.songs().create(&body.group, &body.song)?;
    SONGS_CREATED_TOTAL.inc();

    Ok((StatusCode::CREATED, Json(song)))
}

/// Get a song by ID
pub async fn get_song(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Song>, ApiError> {
    let id = validation::parse_id(&id)?;
    Ok(Json(state.songs().get(id)?))
}

/// Update the supplied fields of a song
pub async fn update_song(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<UpdateSongBody>, JsonRejection>,
) -> Result<Json<Song>, ApiError> {
    let id = validation::parse_id(&id)?;
    let Json(body) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let changes = body.into_changes()?;

    Ok(Json(state.songs().update(id, changes)?))
}

/// Delete a song
pub async fn delete_song(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = validation::parse_id(&id)?;
    state.songs().delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get one page of a song's verses
pub async fn get_verses(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<VersePage>, ApiError> {
    let id = validation::parse_id(&id)?;
    let pagination = state.pagination();
    let request = validation::page_request(
        &params,
        pagination.default_verse_limit,
        pagination.max_limit,
    )?;

    Ok(Json(state.songs().verses(id, request)?))
}
