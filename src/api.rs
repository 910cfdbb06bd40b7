use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::state::{
    LegacyPredictRequest, LegacyPrediction, Player, Team, WhatIfPrediction, WhatIfRequest,
};

const PLAYER_SEARCH_PATH: &str = "/players/search/aggregate";
const TEAM_SEARCH_PATH: &str = "/team/search";
const WHATIF_PATH: &str = "/prediction/whatif";
const LEGACY_PREDICT_PATH: &str = "/prediction/predict";

const MSG_NOT_FOUND: &str = "Player or team not found. Please check your selections.";
const MSG_BAD_INPUT: &str = "Invalid input data. Please check your minutes and selections.";
const MSG_SERVER: &str = "Server error. Please try again later.";
const MSG_GENERIC: &str = "Failed to generate prediction. Please try again.";
const MSG_NETWORK: &str = "Network error. Please check your connection and try again.";

/// A response that arrived with a non-success status.
#[derive(Debug, Clone)]
pub struct HttpStatusError {
    pub status: StatusCode,
    pub body: String,
}

impl fmt::Display for HttpStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = self.body.trim();
        if body.is_empty() {
            write!(f, "http {}", self.status)
        } else {
            write!(f, "http {}: {}", self.status, truncate(body, 200))
        }
    }
}

impl std::error::Error for HttpStatusError {}

pub fn search_players(
    client: &Client,
    base_url: &str,
    query: &str,
    timeout: Duration,
) -> Result<Vec<Player>> {
    let req = client
        .get(endpoint(base_url, PLAYER_SEARCH_PATH))
        .query(&[("q", query)])
        .timeout(timeout);
    let body = send_for_body(req).context("player search failed")?;
    parse_players_json(&body)
}

pub fn search_teams(client: &Client, base_url: &str, query: &str) -> Result<Vec<Team>> {
    let req = client
        .get(endpoint(base_url, TEAM_SEARCH_PATH))
        .query(&[("q", query)]);
    let body = send_for_body(req).context("team search failed")?;
    parse_teams_json(&body)
}

pub fn predict_whatif(
    client: &Client,
    base_url: &str,
    request: &WhatIfRequest,
) -> Result<WhatIfPrediction> {
    let req = client.post(endpoint(base_url, WHATIF_PATH)).json(request);
    let body = send_for_body(req).context("what-if prediction failed")?;
    parse_whatif_json(&body)
}

pub fn predict_legacy(
    client: &Client,
    base_url: &str,
    request: &LegacyPredictRequest,
) -> Result<LegacyPrediction> {
    let req = client
        .post(endpoint(base_url, LEGACY_PREDICT_PATH))
        .json(request);
    let body = send_for_body(req).context("impact prediction failed")?;
    parse_legacy_json(&body)
}

/// Any HTTP answer from the root counts as reachable, whatever its status.
pub fn probe(client: &Client, base_url: &str) -> Result<StatusCode> {
    let resp = client
        .get(endpoint(base_url, "/"))
        .send()
        .context("service unreachable")?;
    Ok(resp.status())
}

pub fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

fn send_for_body(req: RequestBuilder) -> Result<String> {
    let resp: Response = req
        .header(ACCEPT, "application/json")
        .header(CACHE_CONTROL, "no-store")
        .send()
        .context("request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(HttpStatusError { status, body }.into());
    }
    Ok(body)
}

pub fn parse_players_json(raw: &str) -> Result<Vec<Player>> {
    parse_list(raw).context("invalid player search json")
}

pub fn parse_teams_json(raw: &str) -> Result<Vec<Team>> {
    parse_list(raw).context("invalid team search json")
}

pub fn parse_whatif_json(raw: &str) -> Result<WhatIfPrediction> {
    serde_json::from_str(raw.trim()).context("invalid what-if prediction json")
}

pub fn parse_legacy_json(raw: &str) -> Result<LegacyPrediction> {
    serde_json::from_str(raw.trim()).context("invalid impact prediction json")
}

/// Search bodies are a bare array, or `{"data": [...]}` behind the proxy route.
fn parse_list<T: DeserializeOwned>(raw: &str) -> Result<Vec<T>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let root: Value = serde_json::from_str(trimmed)?;
    let items = match root {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Null) | None => return Ok(Vec::new()),
            Some(data) => data,
        },
        Value::Null => return Ok(Vec::new()),
        other => anyhow::bail!("expected a list, got {}", truncate(&other.to_string(), 60)),
    };
    Ok(serde_json::from_value(items)?)
}

/// The message shown in the prediction panel for a failed request.
pub fn prediction_error_message(err: &anyhow::Error) -> String {
    let status = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<HttpStatusError>())
        .map(|e| e.status);
    match status {
        Some(StatusCode::NOT_FOUND) => MSG_NOT_FOUND.to_string(),
        Some(StatusCode::BAD_REQUEST) => MSG_BAD_INPUT.to_string(),
        Some(s) if s.is_server_error() => MSG_SERVER.to_string(),
        Some(_) => MSG_GENERIC.to_string(),
        None => MSG_NETWORK.to_string(),
    }
}

/// True when the failure carries an HTTP status, i.e. the server answered.
pub fn reached_server(err: &anyhow::Error) -> bool {
    err.chain()
        .any(|cause| cause.downcast_ref::<HttpStatusError>().is_some())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push('…');
    out
}
