use crate::assets::{cache_control, content_type, find_avatar, resolve, CACHE_ONE_HOUR, NO_CACHE};
use crate::config::Config;
use crate::counter::{days_between, until_next_midnight};
use crate::errors::AppError;
use crate::language::UiState;
use crate::models::{CounterPoint, CountersResponse, HealthResponse};
use crate::state::AppState;
use crate::ui::{render_index, render_script, NOT_FOUND_HTML, SCRIPT_FAILURE_JS};
use axum::{
    extract::{ConnectInfo, State},
    http::{
        header::{ACCEPT_LANGUAGE, CACHE_CONTROL, CONTENT_TYPE},
        HeaderMap, Method, StatusCode, Uri,
    },
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::{Local, SecondsFormat, Utc};
use std::net::SocketAddr;
use tokio::fs;
use tracing::{debug, error, info};

const INDEX_FILE: &str = "index.html";
const SCRIPT_FILE: &str = "script.js";
const JAVASCRIPT: &str = "application/javascript";

pub async fn index(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let path = state.config.assets_dir.join(INDEX_FILE);
    let template = fs::read_to_string(&path)
        .await
        .map_err(|err| AppError::internal(&format!("error serving dashboard {}", path.display()), err))?;

    let preferences = headers
        .get(ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let html = render_index(
        &template,
        &state.config,
        UiState::detected(preferences),
        &Local::now(),
    );

    let (client, protocol) = client_origin(
        &state.config,
        connect_info.map(|ConnectInfo(addr)| addr),
        &headers,
    );
    info!("dashboard served to {client} via {protocol}");

    Ok(([(CACHE_CONTROL, NO_CACHE)], Html(html)).into_response())
}

pub async fn script(State(state): State<AppState>) -> Response {
    let path = state.config.assets_dir.join(SCRIPT_FILE);
    match fs::read_to_string(&path).await {
        Ok(template) => {
            let js = render_script(&template, &state.config, &Local::now());
            ([(CONTENT_TYPE, JAVASCRIPT)], js).into_response()
        }
        Err(err) => {
            error!("error serving script {}: {err}", path.display());
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(CONTENT_TYPE, JAVASCRIPT)],
                SCRIPT_FAILURE_JS,
            )
                .into_response()
        }
    }
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        person_name: state.config.person_name.clone(),
        uptime: state.started_at.elapsed().as_secs_f64(),
    })
}

pub async fn counters(State(state): State<AppState>) -> Json<CountersResponse> {
    let now = Local::now();
    let counters = state
        .config
        .start_dates()
        .into_iter()
        .map(|(key, start_date)| CounterPoint {
            key,
            start_date: start_date.to_string(),
            days: days_between(start_date, &now),
        })
        .collect();

    Json(CountersResponse {
        date: now.date_naive().to_string(),
        is_healthy: state.config.is_healthy,
        counters,
        next_midnight_in_seconds: until_next_midnight(&now).num_seconds(),
    })
}

pub async fn avatar(State(state): State<AppState>) -> Result<Response, AppError> {
    let Some(path) = find_avatar(&state.config.assets_dir).await else {
        return Err(AppError::not_found("Avatar not found"));
    };

    let bytes = fs::read(&path)
        .await
        .map_err(|err| AppError::internal("error serving avatar", err))?;

    Ok((
        [(CONTENT_TYPE, content_type(&path)), (CACHE_CONTROL, CACHE_ONE_HOUR)],
        bytes,
    )
        .into_response())
}

/// Serves files from the assets directory, or the 404 page.
pub async fn static_file(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return not_found();
    }

    let Some(path) = resolve(&state.config.assets_dir, uri.path()) else {
        return not_found();
    };

    match fs::metadata(&path).await {
        Ok(meta) if meta.is_file() => {}
        _ => {
            debug!("no static file for {}", uri.path());
            return not_found();
        }
    }

    match fs::read(&path).await {
        Ok(bytes) => (
            [(CONTENT_TYPE, content_type(&path)), (CACHE_CONTROL, cache_control(&path))],
            bytes,
        )
            .into_response(),
        Err(err) => AppError::internal(&format!("error serving {}", path.display()), err).into_response(),
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Html(NOT_FOUND_HTML)).into_response()
}

/// Client address and scheme, honouring `X-Forwarded-*` only behind a trusted proxy.
fn client_origin(config: &Config, peer: Option<SocketAddr>, headers: &HeaderMap) -> (String, String) {
    let forwarded = |name: &str| {
        if !config.trust_proxy {
            return None;
        }
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };

    let client = forwarded("x-forwarded-for")
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string());
    let protocol = forwarded("x-forwarded-proto").unwrap_or_else(|| "http".to_string());
    (client, protocol)
}
