// src/routes/settings.rs

use axum::{extract::{Path, State}, http::StatusCode, Json};
use chrono::NaiveTime;
use serde::Deserialize;
use sqlx::{query, query_as};
use uuid::Uuid;

use crate::coverage::ShiftDefaults;
use crate::{AppState, models::{Deleted, ShiftDefault}};
use super::{bad_request, db_error, internal_error, ApiError};

const COLUMNS: &str = "id, shift_type, start_time, end_time, color, created_at, updated_at";
const SHIFT_TYPES: [&str; 4] = ["week_day", "week_night", "weekend_day", "weekend_night"];

#[derive(Deserialize)]
pub struct CreateShiftDefaultBody {
    pub shift_type: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub color: String,
}

#[derive(Deserialize)]
pub struct PatchShiftDefaultBody {
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub color: Option<String>,
}

pub async fn list_shift_defaults(
    State(state): State<AppState>,
) -> Result<Json<Vec<ShiftDefault>>, ApiError> {
    let rows = query_as::<_, ShiftDefault>(&format!(
        "SELECT {COLUMNS} FROM public.shift_defaults ORDER BY shift_type"
    ))
    .fetch_all(&state.pool).await.map_err(internal_error)?;
    Ok(Json(rows))
}

pub async fn create_shift_default(
    State(state): State<AppState>,
    Json(b): Json<CreateShiftDefaultBody>,
) -> Result<(StatusCode, Json<ShiftDefault>), ApiError> {
    if !SHIFT_TYPES.contains(&b.shift_type.as_str()) {
        return Err(bad_request(format!("shift_type must be one of {}", SHIFT_TYPES.join(", "))));
    }
    let row = query_as::<_, ShiftDefault>(&format!(
        r#"
        INSERT INTO public.shift_defaults(shift_type, start_time, end_time, color)
        VALUES ($1,$2,$3,$4)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(b.shift_type).bind(b.start_time).bind(b.end_time).bind(b.color)
    .fetch_one(&state.pool).await.map_err(internal_error)?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn patch_shift_default(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(b): Json<PatchShiftDefaultBody>,
) -> Result<Json<ShiftDefault>, ApiError> {
    let row = query_as::<_, ShiftDefault>(&format!(
        r#"
        UPDATE public.shift_defaults SET
          start_time = COALESCE($2, start_time),
          end_time = COALESCE($3, end_time),
          color = COALESCE($4, color),
          updated_at = now()
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id).bind(b.start_time).bind(b.end_time).bind(b.color)
    .fetch_one(&state.pool).await.map_err(db_error("shift default"))?;
    Ok(Json(row))
}

pub async fn delete_shift_default(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Deleted>, ApiError> {
    let res = query(r#"DELETE FROM public.shift_defaults WHERE id = $1"#)
        .bind(id)
        .execute(&state.pool).await.map_err(internal_error)?;
    Ok(Json(Deleted { deleted: res.rows_affected() > 0 }))
}

/// Weekday day/night defaults used to classify porters.
pub async fn load_weekday_defaults(state: &AppState) -> Result<ShiftDefaults, ApiError> {
    let rows = query_as::<_, ShiftDefault>(&format!(
        "SELECT {COLUMNS} FROM public.shift_defaults WHERE shift_type IN ('week_day', 'week_night')"
    ))
    .fetch_all(&state.pool).await.map_err(internal_error)?;
    Ok(weekday_defaults(&rows))
}

fn weekday_defaults(rows: &[ShiftDefault]) -> ShiftDefaults {
    let find = |kind: &str| rows.iter().find(|r| r.shift_type == kind).map(ShiftDefault::window);
    ShiftDefaults { day: find("week_day"), night: find("week_night") }
}
