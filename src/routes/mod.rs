use axum::http::StatusCode;
use chrono::{Local, NaiveDate};
use tracing::error;

pub mod absences;
pub mod analyze;
pub mod cover;
pub mod health;
pub mod settings;
pub mod staff;

pub type ApiError = (StatusCode, String);

// Common error mappers
pub fn internal_error<E: std::fmt::Display>(e: E) -> ApiError {
    error!(error = %e, "request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, format!("internal error: {e}"))
}

pub fn bad_request(msg: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, msg.into())
}

/// `RowNotFound` becomes a 404 naming `what`; anything else is a 500.
pub fn db_error(what: &'static str) -> impl Fn(sqlx::Error) -> ApiError {
    move |e| match e {
        sqlx::Error::RowNotFound => (StatusCode::NOT_FOUND, format!("{what} not found")),
        other => internal_error(other),
    }
}

pub(crate) fn page(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    (limit.unwrap_or(100).clamp(1, 500), offset.unwrap_or(0).max(0))
}

/// The requested day, or today in the server's local time zone.
pub(crate) fn report_date(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_rows_map_to_404() {
        let (status, msg) = db_error("porter absence")(sqlx::Error::RowNotFound);
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(msg, "porter absence not found");

        let (status, _) = db_error("staff")(sqlx::Error::PoolTimedOut);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn paging_is_clamped() {
        assert_eq!(page(None, None), (100, 0));
        assert_eq!(page(Some(10_000), Some(-5)), (500, 0));
        assert_eq!(page(Some(0), Some(20)), (1, 20));
    }

    #[test]
    fn report_date_defaults_to_local_today() {
        let given = NaiveDate::from_ymd_opt(2026, 3, 29).unwrap();
        assert_eq!(report_date(Some(given)), given);

        let before = Local::now().date_naive();
        let today = report_date(None);
        let after = Local::now().date_naive();
        assert!(today == before || today == after);
    }
}
