// src/routes/staff.rs

use axum::{extract::{Path, Query, State}, http::StatusCode, Json};
use chrono::NaiveTime;
use serde::Deserialize;
use sqlx::{query, query_as};
use uuid::Uuid;

use crate::coverage::classify_shift;
use crate::{AppState, models::{Deleted, PorterShiftType, Staff}};
use super::{bad_request, db_error, internal_error, page, settings::load_weekday_defaults, ApiError};

const COLUMNS: &str = "id, first_name, last_name, role, email, availability_pattern, \
                       contracted_hours_start, contracted_hours_end, created_at, updated_at";

#[derive(Deserialize)]
pub struct ListQ {
    pub role: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
pub struct CreateStaffBody {
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub email: Option<String>,
    pub availability_pattern: Option<String>,
    pub contracted_hours_start: Option<NaiveTime>,
    pub contracted_hours_end: Option<NaiveTime>,
}

#[derive(Deserialize)]
pub struct PatchStaffBody {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
    pub email: Option<String>,
    pub availability_pattern: Option<String>,
    pub contracted_hours_start: Option<NaiveTime>,
    pub contracted_hours_end: Option<NaiveTime>,
}

pub async fn list_staff(
    State(state): State<AppState>,
    Query(q): Query<ListQ>,
) -> Result<Json<Vec<Staff>>, ApiError> {
    let (limit, offset) = page(q.limit, q.offset);
    let rows = query_as::<_, Staff>(&format!(
        r#"SELECT {COLUMNS} FROM public.staff
           WHERE ($1::text IS NULL OR role = $1)
           ORDER BY last_name, first_name
           LIMIT $2 OFFSET $3"#
    ))
    .bind(q.role).bind(limit).bind(offset)
    .fetch_all(&state.pool).await.map_err(internal_error)?;
    Ok(Json(rows))
}

async fn fetch_staff(state: &AppState, id: Uuid) -> Result<Staff, ApiError> {
    query_as::<_, Staff>(&format!("SELECT {COLUMNS} FROM public.staff WHERE id = $1"))
        .bind(id)
        .fetch_one(&state.pool).await.map_err(db_error("staff member"))
}

pub async fn get_staff(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Staff>, ApiError> {
    Ok(Json(fetch_staff(&state, id).await?))
}

pub async fn create_staff(
    State(state): State<AppState>,
    Json(b): Json<CreateStaffBody>,
) -> Result<(StatusCode, Json<Staff>), ApiError> {
    if [&b.first_name, &b.last_name, &b.role].iter().any(|s| s.trim().is_empty()) {
        return Err(bad_request("first_name, last_name and role are required"));
    }
    let row = query_as::<_, Staff>(&format!(
        r#"
        INSERT INTO public.staff(first_name, last_name, role, email, availability_pattern,
                                 contracted_hours_start, contracted_hours_end)
        VALUES ($1,$2,$3,$4,$5,$6,$7)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(b.first_name).bind(b.last_name).bind(b.role).bind(b.email).bind(b.availability_pattern)
    .bind(b.contracted_hours_start).bind(b.contracted_hours_end)
    .fetch_one(&state.pool).await.map_err(internal_error)?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn patch_staff(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(b): Json<PatchStaffBody>,
) -> Result<Json<Staff>, ApiError> {
    let row = query_as::<_, Staff>(&format!(
        r#"
        UPDATE public.staff SET
          first_name = COALESCE($2, first_name),
          last_name = COALESCE($3, last_name),
          role = COALESCE($4, role),
          email = COALESCE($5, email),
          availability_pattern = COALESCE($6, availability_pattern),
          contracted_hours_start = COALESCE($7, contracted_hours_start),
          contracted_hours_end = COALESCE($8, contracted_hours_end),
          updated_at = now()
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id).bind(b.first_name).bind(b.last_name).bind(b.role).bind(b.email)
    .bind(b.availability_pattern).bind(b.contracted_hours_start).bind(b.contracted_hours_end)
    .fetch_one(&state.pool).await.map_err(db_error("staff member"))?;
    Ok(Json(row))
}

pub async fn delete_staff(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Deleted>, ApiError> {
    let res = query(r#"DELETE FROM public.staff WHERE id = $1"#)
        .bind(id)
        .execute(&state.pool).await.map_err(internal_error)?;
    Ok(Json(Deleted { deleted: res.rows_affected() > 0 }))
}

// GET /api/v1/staff/:id/shift-type
pub async fn get_shift_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PorterShiftType>, ApiError> {
    let porter = fetch_staff(&state, id).await?;
    let defaults = load_weekday_defaults(&state).await?;
    Ok(Json(PorterShiftType {
        porter_id: porter.id,
        shift_type: classify_shift(porter.contracted_hours(), &defaults),
    }))
}
