use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub person_name: String,
    pub uptime: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterPoint {
    pub key: &'static str,
    pub start_date: String,
    pub days: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountersResponse {
    pub date: String,
    pub is_healthy: bool,
    pub counters: Vec<CounterPoint>,
    pub next_midnight_in_seconds: i64,
}
