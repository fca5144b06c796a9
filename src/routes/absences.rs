// src/routes/absences.rs

use axum::{extract::{Path, Query, State}, http::StatusCode, Json};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::{query, query_as, query_scalar};
use tracing::info;
use uuid::Uuid;

use crate::{AppState, models::{Deleted, PorterAbsence}};
use super::{bad_request, db_error, internal_error, page, ApiError};

const COLUMNS: &str = "id, porter_id, absence_type, start_date, end_date, notes, created_at, updated_at";

#[derive(Deserialize)]
pub struct ListQ {
    pub porter_id: Option<Uuid>,
    pub absence_type: Option<String>,
    /// Keep absences ending on or after this date.
    pub start_date: Option<NaiveDate>,
    /// Keep absences starting on or before this date.
    pub end_date: Option<NaiveDate>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
pub struct CreateAbsenceBody {
    pub porter_id: Uuid,
    pub absence_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct PatchAbsenceBody {
    pub porter_id: Option<Uuid>,
    pub absence_type: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

fn check_range(start: NaiveDate, end: NaiveDate) -> Result<(), ApiError> {
    if start > end {
        return Err(bad_request("start_date must be before or equal to end_date"));
    }
    Ok(())
}

async fn ensure_porter(state: &AppState, porter_id: Uuid) -> Result<(), ApiError> {
    let exists: bool = query_scalar(r#"SELECT EXISTS(SELECT 1 FROM public.staff WHERE id = $1)"#)
        .bind(porter_id)
        .fetch_one(&state.pool).await.map_err(internal_error)?;
    if !exists {
        return Err(bad_request("porter not found"));
    }
    Ok(())
}

async fn fetch_filtered(state: &AppState, porter_id: Option<Uuid>, q: ListQ) -> Result<Vec<PorterAbsence>, ApiError> {
    let (limit, offset) = page(q.limit, q.offset);
    let sql = format!(
        r#"SELECT {COLUMNS} FROM public.porter_absences
           WHERE ($1::uuid IS NULL OR porter_id = $1)
             AND ($2::text IS NULL OR absence_type = $2)
             AND ($3::date IS NULL OR end_date >= $3)
             AND ($4::date IS NULL OR start_date <= $4)
           ORDER BY start_date DESC, created_at DESC
           LIMIT $5 OFFSET $6"#
    );
    let rows = query_as::<_, PorterAbsence>(&sql)
        .bind(porter_id.or(q.porter_id))
        .bind(q.absence_type)
        .bind(q.start_date)
        .bind(q.end_date)
        .bind(limit)
        .bind(offset)
        .fetch_all(&state.pool).await.map_err(internal_error)?;
    Ok(rows)
}

// GET /api/v1/absences
pub async fn list_absences(
    State(state): State<AppState>,
    Query(q): Query<ListQ>,
) -> Result<Json<Vec<PorterAbsence>>, ApiError> {
    Ok(Json(fetch_filtered(&state, None, q).await?))
}

// GET /api/v1/staff/:id/absences
pub async fn list_porter_absences(
    State(state): State<AppState>,
    Path(porter_id): Path<Uuid>,
    Query(q): Query<ListQ>,
) -> Result<Json<Vec<PorterAbsence>>, ApiError> {
    Ok(Json(fetch_filtered(&state, Some(porter_id), q).await?))
}

pub async fn get_absence(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PorterAbsence>, ApiError> {
    let row = query_as::<_, PorterAbsence>(&format!("SELECT {COLUMNS} FROM public.porter_absences WHERE id = $1"))
        .bind(id)
        .fetch_one(&state.pool).await.map_err(db_error("porter absence"))?;
    Ok(Json(row))
}

pub async fn create_absence(
    State(state): State<AppState>,
    Json(b): Json<CreateAbsenceBody>,
) -> Result<(StatusCode, Json<PorterAbsence>), ApiError> {
    if b.absence_type.trim().is_empty() {
        return Err(bad_request("absence_type is required"));
    }
    check_range(b.start_date, b.end_date)?;
    ensure_porter(&state, b.porter_id).await?;

    let row = query_as::<_, PorterAbsence>(&format!(
        r#"
        INSERT INTO public.porter_absences(porter_id, absence_type, start_date, end_date, notes)
        VALUES ($1,$2,$3,$4,$5)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(b.porter_id).bind(b.absence_type).bind(b.start_date).bind(b.end_date).bind(b.notes)
    .fetch_one(&state.pool).await.map_err(internal_error)?;

    info!(absence_id = %row.id, porter_id = %row.porter_id, "porter absence recorded");
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn patch_absence(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(b): Json<PatchAbsenceBody>,
) -> Result<Json<PorterAbsence>, ApiError> {
    if let (Some(start), Some(end)) = (b.start_date, b.end_date) {
        check_range(start, end)?;
    }
    if let Some(porter_id) = b.porter_id {
        ensure_porter(&state, porter_id).await?;
    }

    // The WHERE guard catches a one-sided change that inverts the stored range.
    let row = query_as::<_, PorterAbsence>(&format!(
        r#"
        UPDATE public.porter_absences SET
          porter_id = COALESCE($2, porter_id),
          absence_type = COALESCE($3, absence_type),
          start_date = COALESCE($4, start_date),
          end_date = COALESCE($5, end_date),
          notes = COALESCE($6, notes),
          updated_at = now()
        WHERE id = $1
          AND COALESCE($4, start_date) <= COALESCE($5, end_date)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id).bind(b.porter_id).bind(b.absence_type).bind(b.start_date).bind(b.end_date).bind(b.notes)
    .fetch_optional(&state.pool).await.map_err(internal_error)?;

    match row {
        Some(row) => Ok(Json(row)),
        None => {
            let exists: bool = query_scalar(r#"SELECT EXISTS(SELECT 1 FROM public.porter_absences WHERE id = $1)"#)
                .bind(id)
                .fetch_one(&state.pool).await.map_err(internal_error)?;
            if exists {
                Err(bad_request("start_date must be before or equal to end_date"))
            } else {
                Err((StatusCode::NOT_FOUND, "porter absence not found".into()))
            }
        }
    }
}

pub async fn delete_absence(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Deleted>, ApiError> {
    let res = query(r#"DELETE FROM public.porter_absences WHERE id = $1"#)
        .bind(id)
        .execute(&state.pool).await.map_err(internal_error)?;
    Ok(Json(Deleted { deleted: res.rows_affected() > 0 }))
}
