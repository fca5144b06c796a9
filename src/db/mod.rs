// src/db/mod.rs

use sqlx::{postgres::PgPoolOptions, Pool, Postgres};
use tracing::info;

use crate::config::Config;

pub async fn connect(config: &Config) -> anyhow::Result<Pool<Postgres>> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    info!(max_connections = config.max_connections, "connected to PostgreSQL");
    Ok(pool)
}

/// The two cover resources share one shape: a required window per department
/// (area cover) or per support service (service cover), each with its own
/// porter assignment table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverKind {
    Area,
    Service,
}

impl CoverKind {
    pub fn label(self) -> &'static str {
        match self {
            CoverKind::Area => "area cover",
            CoverKind::Service => "service cover",
        }
    }

    pub fn assignments_table(self) -> &'static str {
        match self {
            CoverKind::Area => "public.default_area_cover_assignments",
            CoverKind::Service => "public.default_service_cover_assignments",
        }
    }

    /// Column naming the department or support service being covered.
    pub fn target_column(self) -> &'static str {
        match self {
            CoverKind::Area => "department_id",
            CoverKind::Service => "service_id",
        }
    }

    pub fn porter_table(self) -> &'static str {
        match self {
            CoverKind::Area => "public.default_area_cover_porter_assignments",
            CoverKind::Service => "public.default_service_cover_porter_assignments",
        }
    }

    /// Foreign key from a porter assignment to its cover assignment.
    pub fn parent_column(self) -> &'static str {
        match self {
            CoverKind::Area => "default_area_cover_assignment_id",
            CoverKind::Service => "default_service_cover_assignment_id",
        }
    }

    /// Column list for `CoverAssignment` rows.
    pub fn assignment_columns(self) -> String {
        format!(
            "id, {} AS target_id, shift_type, start_time, end_time, color, minimum_porters, \
             minimum_porters_mon, minimum_porters_tue, minimum_porters_wed, minimum_porters_thu, \
             minimum_porters_fri, minimum_porters_sat, minimum_porters_sun, created_at, updated_at",
            self.target_column()
        )
    }

    /// Column list for `CoverPorterAssignment` rows.
    pub fn porter_columns(self) -> String {
        format!(
            "id, {} AS cover_assignment_id, porter_id, start_time, end_time, created_at, updated_at",
            self.parent_column()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cover_kinds_alias_their_own_columns() {
        assert!(CoverKind::Area.assignment_columns().contains("department_id AS target_id"));
        assert!(CoverKind::Service.assignment_columns().contains("service_id AS target_id"));
        assert!(CoverKind::Service
            .porter_columns()
            .starts_with("id, default_service_cover_assignment_id AS cover_assignment_id"));
        assert_ne!(CoverKind::Area.porter_table(), CoverKind::Service.porter_table());
    }
}
