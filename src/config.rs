use std::{env, path::PathBuf};
use tracing::warn;

use crate::counter::parse_start_date;

const DEFAULT_PORT: u16 = 8011;
const DEFAULT_PERSON_NAME: &str = "John Doe";
const DEFAULT_HEALTHY_START_DATE: &str = "2024-01-01";
const DEFAULT_DOCTOR_START_DATE: &str = "2024-01-15";
const DEFAULT_ASSETS_DIR: &str = "public";

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub person_name: String,
    pub healthy_start_date: String,
    pub doctor_start_date: String,
    pub is_healthy: bool,
    pub trust_proxy: bool,
    pub assets_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(value) => value.trim().parse::<u16>().unwrap_or_else(|err| {
                warn!("invalid PORT {value:?} ({err}), using {DEFAULT_PORT}");
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let config = Self {
            port,
            person_name: lookup("PERSON_NAME").unwrap_or_else(|| DEFAULT_PERSON_NAME.to_string()),
            healthy_start_date: lookup("HEALTHY_START_DATE")
                .unwrap_or_else(|| DEFAULT_HEALTHY_START_DATE.to_string()),
            doctor_start_date: lookup("DOCTOR_START_DATE")
                .unwrap_or_else(|| DEFAULT_DOCTOR_START_DATE.to_string()),
            // Only an explicit "false" marks the person as not healthy.
            is_healthy: !lookup("IS_HEALTHY")
                .is_some_and(|value| value.trim().eq_ignore_ascii_case("false")),
            trust_proxy: lookup("TRUST_PROXY").is_some_and(|value| value.trim() == "true"),
            assets_dir: lookup("ASSETS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSETS_DIR)),
        };

        for (name, value) in config.start_dates() {
            if parse_start_date(value).is_none() {
                warn!("start date {name} = {value:?} is not a valid YYYY-MM-DD date, counter will show 0");
            }
        }

        config
    }

    /// Counter keys paired with their configured start dates.
    pub fn start_dates(&self) -> [(&'static str, &str); 2] {
        [
            ("healthy", self.healthy_start_date.as_str()),
            ("doctor", self.doctor_start_date.as_str()),
        ]
    }

    pub fn health_status(&self) -> &'static str {
        if self.is_healthy { "healthy" } else { "unhealthy" }
    }
}
