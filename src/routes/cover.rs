// src/routes/cover.rs
//
// Area cover and service cover share these handlers; `CoverKind` picks the
// tables. Mounted twice, under /area-cover and /service-cover.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use sqlx::{query, query_as};
use tracing::info;
use uuid::Uuid;

use crate::coverage::{AbsenceCalendar, CoverageAnalyzer, CoverageReport, PorterAbsence as Leave};
use crate::db::CoverKind;
use crate::models::{CoverAssignment, CoverPorterAssignment, Deleted, PorterAbsence, StoredCover};
use crate::AppState;
use super::{bad_request, db_error, internal_error, report_date, ApiError};

#[derive(Deserialize)]
pub struct ListQ {
    pub shift_type: Option<String>,
}

#[derive(Deserialize)]
pub struct CoverageQ {
    pub date: Option<NaiveDate>,
}

#[derive(Deserialize)]
pub struct CreateCoverBody {
    #[serde(alias = "department_id", alias = "service_id")]
    pub target_id: Uuid,
    pub shift_type: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default = "default_color")] pub color: String,
    #[serde(default = "default_minimum")] pub minimum_porters: i32,
}
fn default_color() -> String { "#4285F4".into() }
fn default_minimum() -> i32 { 1 }

#[derive(Deserialize)]
pub struct PatchCoverBody {
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub color: Option<String>,
    /// Also resets every per-weekday minimum.
    pub minimum_porters: Option<i32>,
}

#[derive(Deserialize)]
pub struct PorterAssignmentBody {
    pub porter_id: Uuid,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Deserialize)]
pub struct PatchPorterAssignmentBody {
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

pub fn router(kind: CoverKind) -> Router<AppState> {
    Router::new()
        .route(
            "/assignments",
            get(move |s: State<AppState>, q: Query<ListQ>| list_assignments(kind, s, q))
                .post(move |s: State<AppState>, b: Json<CreateCoverBody>| create_assignment(kind, s, b)),
        )
        .route(
            "/assignments/:id",
            get(move |s: State<AppState>, p: Path<Uuid>| get_assignment(kind, s, p))
                .patch(move |s: State<AppState>, p: Path<Uuid>, b: Json<PatchCoverBody>| {
                    patch_assignment(kind, s, p, b)
                })
                .put(move |s: State<AppState>, p: Path<Uuid>, b: Json<PatchCoverBody>| {
                    patch_assignment(kind, s, p, b)
                })
                .delete(move |s: State<AppState>, p: Path<Uuid>| delete_assignment(kind, s, p)),
        )
        .route(
            "/assignments/:id/porter-assignments",
            get(move |s: State<AppState>, p: Path<Uuid>| list_porter_assignments(kind, s, p))
                .post(move |s: State<AppState>, p: Path<Uuid>, b: Json<PorterAssignmentBody>| {
                    create_porter_assignment(kind, s, p, b)
                }),
        )
        .route(
            "/assignments/:id/coverage",
            get(move |s: State<AppState>, p: Path<Uuid>, q: Query<CoverageQ>| coverage(kind, s, p, q)),
        )
        .route(
            "/porter-assignments/:id",
            patch(move |s: State<AppState>, p: Path<Uuid>, b: Json<PatchPorterAssignmentBody>| {
                patch_porter_assignment(kind, s, p, b)
            })
            .put(move |s: State<AppState>, p: Path<Uuid>, b: Json<PatchPorterAssignmentBody>| {
                patch_porter_assignment(kind, s, p, b)
            })
            .delete(move |s: State<AppState>, p: Path<Uuid>| delete_porter_assignment(kind, s, p)),
        )
}

async fn fetch_assignment(kind: CoverKind, state: &AppState, id: Uuid) -> Result<CoverAssignment, ApiError> {
    query_as::<_, CoverAssignment>(&format!(
        "SELECT {} FROM {} WHERE id = $1",
        kind.assignment_columns(),
        kind.assignments_table()
    ))
    .bind(id)
    .fetch_one(&state.pool).await.map_err(db_error("cover assignment"))
}

async fn fetch_porters(kind: CoverKind, state: &AppState, id: Uuid) -> Result<Vec<CoverPorterAssignment>, ApiError> {
    query_as::<_, CoverPorterAssignment>(&format!(
        "SELECT {} FROM {} WHERE {} = $1 ORDER BY start_time",
        kind.porter_columns(),
        kind.porter_table(),
        kind.parent_column()
    ))
    .bind(id)
    .fetch_all(&state.pool).await.map_err(internal_error)
}

pub async fn list_assignments(
    kind: CoverKind,
    State(state): State<AppState>,
    Query(q): Query<ListQ>,
) -> Result<Json<Vec<CoverAssignment>>, ApiError> {
    let rows = query_as::<_, CoverAssignment>(&format!(
        "SELECT {} FROM {} WHERE ($1::text IS NULL OR shift_type = $1) ORDER BY shift_type, start_time",
        kind.assignment_columns(),
        kind.assignments_table()
    ))
    .bind(q.shift_type)
    .fetch_all(&state.pool).await.map_err(internal_error)?;
    Ok(Json(rows))
}

pub async fn get_assignment(
    kind: CoverKind,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CoverAssignment>, ApiError> {
    Ok(Json(fetch_assignment(kind, &state, id).await?))
}

pub async fn create_assignment(
    kind: CoverKind,
    State(state): State<AppState>,
    Json(b): Json<CreateCoverBody>,
) -> Result<(StatusCode, Json<CoverAssignment>), ApiError> {
    if b.shift_type.trim().is_empty() {
        return Err(bad_request("shift_type is required"));
    }
    if b.minimum_porters < 0 {
        return Err(bad_request("minimum_porters must not be negative"));
    }

    let row = query_as::<_, CoverAssignment>(&format!(
        r#"
        INSERT INTO {table}({target}, shift_type, start_time, end_time, color, minimum_porters,
            minimum_porters_mon, minimum_porters_tue, minimum_porters_wed, minimum_porters_thu,
            minimum_porters_fri, minimum_porters_sat, minimum_porters_sun)
        VALUES ($1,$2,$3,$4,$5,$6,$6,$6,$6,$6,$6,$6,$6)
        RETURNING {columns}
        "#,
        table = kind.assignments_table(),
        target = kind.target_column(),
        columns = kind.assignment_columns(),
    ))
    .bind(b.target_id).bind(b.shift_type).bind(b.start_time).bind(b.end_time).bind(b.color).bind(b.minimum_porters)
    .fetch_one(&state.pool).await.map_err(internal_error)?;

    info!(cover = kind.label(), id = %row.id, "cover assignment created");
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn patch_assignment(
    kind: CoverKind,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(b): Json<PatchCoverBody>,
) -> Result<Json<CoverAssignment>, ApiError> {
    if b.minimum_porters.is_some_and(|n| n < 0) {
        return Err(bad_request("minimum_porters must not be negative"));
    }

    let row = query_as::<_, CoverAssignment>(&format!(
        r#"
        UPDATE {table} SET
          start_time = COALESCE($2, start_time),
          end_time = COALESCE($3, end_time),
          color = COALESCE($4, color),
          minimum_porters = COALESCE($5, minimum_porters),
          minimum_porters_mon = COALESCE($5, minimum_porters_mon),
          minimum_porters_tue = COALESCE($5, minimum_porters_tue),
          minimum_porters_wed = COALESCE($5, minimum_porters_wed),
          minimum_porters_thu = COALESCE($5, minimum_porters_thu),
          minimum_porters_fri = COALESCE($5, minimum_porters_fri),
          minimum_porters_sat = COALESCE($5, minimum_porters_sat),
          minimum_porters_sun = COALESCE($5, minimum_porters_sun),
          updated_at = now()
        WHERE id = $1
        RETURNING {columns}
        "#,
        table = kind.assignments_table(),
        columns = kind.assignment_columns(),
    ))
    .bind(id).bind(b.start_time).bind(b.end_time).bind(b.color).bind(b.minimum_porters)
    .fetch_one(&state.pool).await.map_err(db_error("cover assignment"))?;
    Ok(Json(row))
}

pub async fn delete_assignment(
    kind: CoverKind,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Deleted>, ApiError> {
    let res = query(&format!("DELETE FROM {} WHERE id = $1", kind.assignments_table()))
        .bind(id)
        .execute(&state.pool).await.map_err(internal_error)?;
    Ok(Json(Deleted { deleted: res.rows_affected() > 0 }))
}

pub async fn list_porter_assignments(
    kind: CoverKind,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<CoverPorterAssignment>>, ApiError> {
    Ok(Json(fetch_porters(kind, &state, id).await?))
}

pub async fn create_porter_assignment(
    kind: CoverKind,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(b): Json<PorterAssignmentBody>,
) -> Result<(StatusCode, Json<CoverPorterAssignment>), ApiError> {
    // 404 if the parent cover assignment is gone
    fetch_assignment(kind, &state, id).await?;

    let row = query_as::<_, CoverPorterAssignment>(&format!(
        r#"
        INSERT INTO {table}({parent}, porter_id, start_time, end_time)
        VALUES ($1,$2,$3,$4)
        RETURNING {columns}
        "#,
        table = kind.porter_table(),
        parent = kind.parent_column(),
        columns = kind.porter_columns(),
    ))
    .bind(id).bind(b.porter_id).bind(b.start_time).bind(b.end_time)
    .fetch_one(&state.pool).await.map_err(internal_error)?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn patch_porter_assignment(
    kind: CoverKind,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(b): Json<PatchPorterAssignmentBody>,
) -> Result<Json<CoverPorterAssignment>, ApiError> {
    let row = query_as::<_, CoverPorterAssignment>(&format!(
        r#"
        UPDATE {table} SET
          start_time = COALESCE($2, start_time),
          end_time = COALESCE($3, end_time),
          updated_at = now()
        WHERE id = $1
        RETURNING {columns}
        "#,
        table = kind.porter_table(),
        columns = kind.porter_columns(),
    ))
    .bind(id).bind(b.start_time).bind(b.end_time)
    .fetch_one(&state.pool).await.map_err(db_error("porter assignment"))?;
    Ok(Json(row))
}

pub async fn delete_porter_assignment(
    kind: CoverKind,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Deleted>, ApiError> {
    let res = query(&format!("DELETE FROM {} WHERE id = $1", kind.porter_table()))
        .bind(id)
        .execute(&state.pool).await.map_err(internal_error)?;
    Ok(Json(Deleted { deleted: res.rows_affected() > 0 }))
}

// GET /api/v1/{area,service}-cover/assignments/:id/coverage?date=YYYY-MM-DD
// Without `date`, the server's local calendar day is analyzed.
pub async fn coverage(
    kind: CoverKind,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(q): Query<CoverageQ>,
) -> Result<Json<CoverageReport>, ApiError> {
    let date = report_date(q.date);
    let assignment = fetch_assignment(kind, &state, id).await?;
    let porters = fetch_porters(kind, &state, id).await?;

    let porter_ids: Vec<Uuid> = porters.iter().map(|p| p.porter_id).collect();
    let absences = query_as::<_, PorterAbsence>(
        r#"SELECT id, porter_id, absence_type, start_date, end_date, notes, created_at, updated_at
           FROM public.porter_absences
           WHERE porter_id = ANY($1) AND start_date <= $2 AND end_date >= $2"#,
    )
    .bind(&porter_ids).bind(date)
    .fetch_all(&state.pool).await.map_err(internal_error)?;

    let calendar = AbsenceCalendar::new(absences.iter().map(Leave::from).collect());
    let analyzer = CoverageAnalyzer::new(calendar).with_detection(state.gap_detection);
    let source = StoredCover { kind: kind.label(), assignment: &assignment, porters: &porters };
    Ok(Json(analyzer.analyze_source(&source, date)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_body_accepts_department_and_service_ids() {
        let id = Uuid::new_v4();
        for key in ["target_id", "department_id", "service_id"] {
            let body: CreateCoverBody = serde_json::from_value(serde_json::json!({
                (key): id,
                "shift_type": "week_day",
                "start_time": "08:00:00",
                "end_time": "16:00:00"
            }))
            .unwrap();
            assert_eq!(body.target_id, id, "{key}");
            assert_eq!(body.minimum_porters, 1);
            assert_eq!(body.color, "#4285F4");
        }
    }
}
