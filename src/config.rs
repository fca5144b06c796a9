// src/config.rs

use std::env;

use anyhow::{anyhow, Context};

use crate::coverage::GapDetection;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub max_connections: u32,
    pub gap_detection: GapDetection,
}

impl Config {
    /// Reads the process environment (after `.env` has been loaded).
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow!("DATABASE_URL must be set (env or .env file)"))?;

        let port = match lookup("PORT") {
            Some(p) => p.parse::<u16>().with_context(|| format!("PORT is not a port number: {p}"))?,
            None => 8080,
        };

        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(n) => n.parse::<u32>().with_context(|| format!("DB_MAX_CONNECTIONS is not a number: {n}"))?,
            None => 10,
        };

        let gap_detection = match lookup("COVERAGE_GAP_DETECTION") {
            Some(mode) => mode.parse::<GapDetection>().context("COVERAGE_GAP_DETECTION")?,
            None => GapDetection::default(),
        };

        Ok(Self { database_url, port, max_connections, gap_detection })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let cfg = Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/porters")])).unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.max_connections, 10);
        assert_eq!(cfg.gap_detection, GapDetection::SweepLine);
    }

    #[test]
    fn overrides_are_parsed() {
        let cfg = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/porters"),
            ("PORT", "9090"),
            ("DB_MAX_CONNECTIONS", "4"),
            ("COVERAGE_GAP_DETECTION", "adjacent"),
        ]))
        .unwrap();
        assert_eq!(cfg.port, 9090);
        assert_eq!(cfg.max_connections, 4);
        assert_eq!(cfg.gap_detection, GapDetection::AdjacentPairs);
    }

    #[test]
    fn missing_database_url_and_bad_values_are_errors() {
        assert!(Config::from_lookup(lookup(&[])).is_err());
        assert!(Config::from_lookup(lookup(&[("DATABASE_URL", "x"), ("PORT", "eighty")])).is_err());
        assert!(Config::from_lookup(lookup(&[("DATABASE_URL", "x"), ("COVERAGE_GAP_DETECTION", "merge")])).is_err());
    }
}
