use crate::config::Config;
use crate::counter::days_between;
use crate::language::UiState;
use crate::template::{escape_html, escape_js, render, Values};
use chrono::{DateTime, Datelike, TimeZone};

fn config_values<Tz: TimeZone>(config: &Config, now: &DateTime<Tz>) -> Values {
    let mut values = Values::new();
    values.insert("PERSON_NAME", config.person_name.clone());
    values.insert("HEALTHY_START_DATE", config.healthy_start_date.clone());
    values.insert("DOCTOR_START_DATE", config.doctor_start_date.clone());
    values.insert("CURRENT_YEAR", now.year().to_string());
    values.insert("HEALTH_STATUS", config.health_status().to_string());
    values
}

/// Fills the page template. Counters are pre-computed so the numbers are
/// visible before the script takes over.
pub fn render_index<Tz: TimeZone>(
    template: &str,
    config: &Config,
    ui: UiState,
    now: &DateTime<Tz>,
) -> String {
    let mut values: Values = config_values(config, now)
        .into_iter()
        .map(|(key, value)| (key, escape_html(&value)))
        .collect();
    values.insert(
        "HEALTHY_DAYS",
        days_between(&config.healthy_start_date, now).to_string(),
    );
    values.insert(
        "DOCTOR_DAYS",
        days_between(&config.doctor_start_date, now).to_string(),
    );
    values.insert("LANG", ui.language.code().to_string());
    values.insert("PAGE_TITLE", ui.language.title().to_string());
    render(template, &values)
}

pub fn render_script<Tz: TimeZone>(template: &str, config: &Config, now: &DateTime<Tz>) -> String {
    let values: Values = config_values(config, now)
        .into_iter()
        .map(|(key, value)| (key, escape_js(&value)))
        .collect();
    render(template, &values)
}

pub const SCRIPT_FAILURE_JS: &str = r#"console.error("Failed to load script");"#;

pub const NOT_FOUND_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8" />
  <title>Page Not Found</title>
  <style>
    body { font-family: Arial, sans-serif; text-align: center; padding: 50px; }
    h1 { color: #e74c3c; }
  </style>
</head>
<body>
  <h1>404 - Page Not Found</h1>
  <p>The page you're looking for doesn't exist.</p>
  <a href="/">Return to Dashboard</a>
</body>
</html>
"#;
