use std::collections::VecDeque;
use std::time::{Duration, Instant};

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::config::{AppConfig, PredictionEndpoint};
use crate::minutes::{MinutesForm, OutgoingAllocation};
use crate::season::next_season;

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    #[serde(default, deserialize_with = "u64_or_default")]
    pub id: u64,
    #[serde(default, deserialize_with = "string_or_default")]
    pub name: String,
    #[serde(default, deserialize_with = "string_or_default")]
    pub nation: String,
    #[serde(default, deserialize_with = "string_or_default")]
    pub primary_pos: String,
    #[serde(default, deserialize_with = "string_or_default")]
    pub teams: String,
    #[serde(default, deserialize_with = "string_or_default")]
    pub first_season: String,
    #[serde(default, deserialize_with = "string_or_default")]
    pub last_season: String,
    #[serde(default, deserialize_with = "u64_or_default")]
    pub seasons_count: u64,
    #[serde(default, deserialize_with = "u64_or_default")]
    pub total_matches: u64,
    #[serde(default, deserialize_with = "u64_or_default")]
    pub total_goals: u64,
    #[serde(default, deserialize_with = "u64_or_default")]
    pub total_assists: u64,
    #[serde(default, deserialize_with = "u64_or_default")]
    pub total_clean_sheets: u64,
    #[serde(default, deserialize_with = "float_or_none")]
    pub avg_save_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    #[serde(default, deserialize_with = "u64_or_default")]
    pub id: u64,
    #[serde(default, deserialize_with = "string_or_default")]
    pub name: String,
    #[serde(default, deserialize_with = "string_or_default")]
    pub country: String,
    #[serde(default, deserialize_with = "string_or_default")]
    pub league: String,
    #[serde(default, deserialize_with = "string_or_default")]
    pub latest_season: String,
    #[serde(default, deserialize_with = "bool_or_default")]
    pub active_2024_2025: bool,
    #[serde(default, deserialize_with = "u32_or_none")]
    pub wins_2425: Option<u32>,
    #[serde(default, deserialize_with = "u32_or_none")]
    pub points_2425: Option<u32>,
    #[serde(default, deserialize_with = "u32_or_none")]
    pub position_2425: Option<u32>,
    #[serde(default, deserialize_with = "u32_or_none")]
    pub losses_2425: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhatIfRequest {
    pub team_name: String,
    pub incoming_player_name: String,
    pub target_season: String,
    pub projected_minutes_in: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outgoing_minutes: Option<OutgoingAllocation>,
    pub cross_league_scale: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhatIfPrediction {
    pub points_base: f64,
    pub points_with: f64,
    pub delta: f64,
    #[serde(default, deserialize_with = "string_or_default")]
    pub season_target: String,
    #[serde(default, deserialize_with = "string_or_default")]
    pub season_features_from: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyPredictRequest {
    pub player_id: u64,
    pub team_id: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyPrediction {
    #[serde(default, deserialize_with = "string_or_default")]
    pub player_name: String,
    #[serde(default, deserialize_with = "string_or_default")]
    pub team_name: String,
    #[serde(default, deserialize_with = "string_or_default")]
    pub league: String,
    pub impact_score: f64,
    #[serde(default, deserialize_with = "string_or_default")]
    pub impact_level: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub prediction_details: LegacyPredictionDetails,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyPredictionDetails {
    #[serde(default, deserialize_with = "float_or_none")]
    pub player_goals_per_match: Option<f64>,
    #[serde(default, deserialize_with = "float_or_none")]
    pub player_assists_per_match: Option<f64>,
    #[serde(default, deserialize_with = "u32_or_none")]
    pub team_position: Option<u32>,
    #[serde(default, deserialize_with = "u32_or_none")]
    pub team_points: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PredictionView {
    WhatIf(WhatIfPrediction),
    Legacy(LegacyPrediction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Unknown,
    Online,
    Offline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    PlayerSearch,
    TeamSearch,
    Incoming,
    DraftName,
    DraftMinutes,
    OutgoingList,
}

const FOCUS_ORDER: [Focus; 6] = [
    Focus::PlayerSearch,
    Focus::TeamSearch,
    Focus::Incoming,
    Focus::DraftName,
    Focus::DraftMinutes,
    Focus::OutgoingList,
];

impl Focus {
    fn in_customize(self) -> bool {
        !matches!(self, Focus::PlayerSearch | Focus::TeamSearch)
    }
}

/// One search box with its dropdown and the item picked from it.
#[derive(Debug, Clone)]
pub struct SearchPanel<T> {
    pub query: String,
    pub results: Vec<T>,
    pub loading: bool,
    pub show_results: bool,
    pub highlighted: usize,
    pub selected: Option<T>,
    /// Sequence number of the newest search; older responses are stale.
    pub seq: u64,
    /// Set while an edit waits out the debounce window.
    pub edited_at: Option<Instant>,
}

impl<T: Clone> SearchPanel<T> {
    fn new() -> Self {
        Self {
            query: String::new(),
            results: Vec::new(),
            loading: false,
            show_results: false,
            highlighted: 0,
            selected: None,
            seq: 0,
            edited_at: None,
        }
    }

    fn set_query(&mut self, query: String, min_chars: usize, now: Instant) {
        self.query = query;
        self.show_results = true;
        self.seq += 1;
        if self.query.trim().chars().count() < min_chars {
            self.results.clear();
            self.show_results = false;
            self.loading = false;
            self.edited_at = None;
        } else {
            self.edited_at = Some(now);
        }
    }

    fn take_due(&mut self, now: Instant, debounce: Duration) -> Option<(u64, String)> {
        let edited_at = self.edited_at?;
        if now.saturating_duration_since(edited_at) < debounce {
            return None;
        }
        self.edited_at = None;
        self.loading = true;
        Some((self.seq, self.query.trim().to_string()))
    }

    fn accept_results(&mut self, seq: u64, results: Vec<T>) -> bool {
        if seq != self.seq {
            return false;
        }
        self.results = results;
        self.loading = false;
        self.highlighted = 0;
        true
    }

    fn pick(&mut self, name: impl FnOnce(&T) -> String) -> Option<T> {
        let item = self.results.get(self.highlighted)?.clone();
        self.query = name(&item);
        self.selected = Some(item.clone());
        self.show_results = false;
        self.loading = false;
        self.edited_at = None;
        self.seq += 1;
        Some(item)
    }

    pub fn dropdown_visible(&self) -> bool {
        self.show_results && (self.loading || !self.results.is_empty() || !self.query.trim().is_empty())
    }

    fn highlight_next(&mut self) {
        if self.results.is_empty() {
            self.highlighted = 0;
            return;
        }
        self.highlighted = (self.highlighted + 1).min(self.results.len() - 1);
    }

    fn highlight_prev(&mut self) {
        self.highlighted = self.highlighted.saturating_sub(1);
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub player: SearchPanel<Player>,
    pub team: SearchPanel<Team>,
    pub player_min_chars: usize,
    pub team_min_chars: usize,
    pub debounce: Duration,
    pub endpoint: PredictionEndpoint,
    pub cross_league_scale: f64,
    pub focus: Focus,
    pub customize_expanded: bool,
    pub minutes: MinutesForm,
    pub outgoing_selected: usize,
    pub prediction: Option<PredictionView>,
    pub predicting: bool,
    pub prediction_error: Option<String>,
    pub connection: ConnectionStatus,
    pub base_url: String,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::with_config(&AppConfig::default())
    }

    pub fn with_config(cfg: &AppConfig) -> Self {
        Self {
            player: SearchPanel::new(),
            team: SearchPanel::new(),
            player_min_chars: cfg.player_min_chars,
            team_min_chars: cfg.team_min_chars,
            debounce: cfg.debounce,
            endpoint: cfg.endpoint,
            cross_league_scale: cfg.cross_league_scale,
            focus: Focus::PlayerSearch,
            customize_expanded: false,
            minutes: MinutesForm::new(),
            outgoing_selected: 0,
            prediction: None,
            predicting: false,
            prediction_error: None,
            connection: ConnectionStatus::Unknown,
            base_url: cfg.base_url.clone(),
            logs: VecDeque::with_capacity(MAX_LOGS),
            help_overlay: false,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        let stamp = Local::now().format("%H:%M:%S");
        self.logs.push_back(format!("{stamp} {}", msg.into()));
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn set_player_query(&mut self, query: impl Into<String>, now: Instant) {
        let min = self.player_min_chars;
        self.player.set_query(query.into(), min, now);
    }

    pub fn set_team_query(&mut self, query: impl Into<String>, now: Instant) {
        let min = self.team_min_chars;
        self.team.set_query(query.into(), min, now);
    }

    /// Searches whose debounce window has passed, ready to send.
    pub fn take_due_searches(&mut self, now: Instant) -> Vec<ProviderCommand> {
        let mut out = Vec::new();
        if let Some((seq, query)) = self.player.take_due(now, self.debounce) {
            out.push(ProviderCommand::SearchPlayers { seq, query });
        }
        if let Some((seq, query)) = self.team.take_due(now, self.debounce) {
            out.push(ProviderCommand::SearchTeams { seq, query });
        }
        out
    }

    pub fn select_highlighted_player(&mut self) -> Option<Player> {
        let player = self.player.pick(|p| p.name.clone())?;
        self.push_log(format!("[INFO] Player selected: {}", player.name));
        Some(player)
    }

    pub fn select_highlighted_team(&mut self) -> Option<Team> {
        let team = self.team.pick(|t| t.name.clone())?;
        self.team.results.clear();
        self.push_log(format!("[INFO] Team selected: {}", team.name));
        Some(team)
    }

    pub fn clear_player(&mut self) {
        self.player.selected = None;
        self.collapse_if_incomplete();
    }

    pub fn clear_team(&mut self) {
        self.team.selected = None;
        self.collapse_if_incomplete();
    }

    pub fn hide_dropdowns(&mut self) -> bool {
        let was_open = self.player.dropdown_visible() || self.team.dropdown_visible();
        self.player.show_results = false;
        self.team.show_results = false;
        was_open
    }

    pub fn customize_available(&self) -> bool {
        self.player.selected.is_some() && self.team.selected.is_some()
    }

    pub fn toggle_customize(&mut self) {
        if !self.customize_available() {
            self.push_log("[INFO] Select a player and a team to customize minutes");
            return;
        }
        self.customize_expanded = !self.customize_expanded;
        if !self.customize_expanded && self.focus.in_customize() {
            self.focus = Focus::PlayerSearch;
        }
    }

    fn collapse_if_incomplete(&mut self) {
        if !self.customize_available() {
            self.customize_expanded = false;
            if self.focus.in_customize() {
                self.focus = Focus::PlayerSearch;
            }
        }
    }

    fn focus_order(&self) -> Vec<Focus> {
        FOCUS_ORDER
            .iter()
            .copied()
            .filter(|f| !f.in_customize() || self.customize_expanded)
            .collect()
    }

    pub fn focus_next(&mut self) {
        let order = self.focus_order();
        let idx = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = order[(idx + 1) % order.len()];
    }

    pub fn focus_prev(&mut self) {
        let order = self.focus_order();
        let idx = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = order[(idx + order.len() - 1) % order.len()];
    }

    pub fn move_down(&mut self) {
        match self.focus {
            Focus::PlayerSearch => self.player.highlight_next(),
            Focus::TeamSearch => self.team.highlight_next(),
            Focus::OutgoingList => {
                let len = self.minutes.outgoing.len();
                if len > 0 {
                    self.outgoing_selected = (self.outgoing_selected + 1).min(len - 1);
                }
            }
            _ => {}
        }
    }

    pub fn move_up(&mut self) {
        match self.focus {
            Focus::PlayerSearch => self.player.highlight_prev(),
            Focus::TeamSearch => self.team.highlight_prev(),
            Focus::OutgoingList => {
                self.outgoing_selected = self.outgoing_selected.saturating_sub(1);
            }
            _ => {}
        }
    }

    pub fn add_outgoing_draft(&mut self) {
        if !self.minutes.can_add_draft() {
            return;
        }
        match self.minutes.add_draft() {
            Ok(()) => {
                let total = self.minutes.outgoing.total();
                self.push_log(format!("[INFO] Outgoing minutes total: {total}"));
            }
            Err(err) => self.push_log(format!("[WARN] {err}")),
        }
    }

    /// Replaces the outgoing rows with a pasted `Name:Min, ...` or JSON list.
    pub fn paste_outgoing(&mut self, text: &str) {
        match self.minutes.paste(text) {
            Ok(()) => {
                self.outgoing_selected = 0;
                self.prediction_error = None;
                let total = self.minutes.outgoing.total();
                let rows = self.minutes.outgoing.to_text();
                self.push_log(format!("[INFO] Loaded outgoing list ({total} minutes): {rows}"));
            }
            Err(err) => {
                self.push_log(format!("[WARN] Pasted list refused: {err}"));
                self.prediction_error = Some(err.to_string());
            }
        }
    }

    pub fn remove_selected_outgoing(&mut self) {
        self.minutes.rejected_paste = None;
        if let Some(entry) = self.minutes.outgoing.remove(self.outgoing_selected) {
            self.push_log(format!("[INFO] Removed {} from outgoing minutes", entry.player_name));
        }
        let len = self.minutes.outgoing.len();
        if self.outgoing_selected >= len {
            self.outgoing_selected = len.saturating_sub(1);
        }
    }

    /// Validates the form and builds the request to send, if any.
    pub fn prepare_submission(&mut self) -> Option<ProviderCommand> {
        if self.predicting {
            return None;
        }
        let (Some(player), Some(team)) = (self.player.selected.clone(), self.team.selected.clone())
        else {
            self.push_log("[INFO] Select a player and a team first");
            return None;
        };

        let cmd = match self.endpoint {
            PredictionEndpoint::WhatIf => match self.minutes.build() {
                Ok(valid) => ProviderCommand::PredictWhatIf(WhatIfRequest {
                    team_name: team.name.clone(),
                    incoming_player_name: player.name.clone(),
                    target_season: next_season(&team.latest_season),
                    projected_minutes_in: valid.projected_minutes_in,
                    outgoing_minutes: valid.outgoing,
                    cross_league_scale: self.cross_league_scale,
                }),
                Err(err) => {
                    self.prediction_error = Some(err.to_string());
                    self.predicting = false;
                    return None;
                }
            },
            PredictionEndpoint::Legacy => ProviderCommand::PredictLegacy(LegacyPredictRequest {
                player_id: player.id,
                team_id: team.id,
            }),
        };

        self.predicting = true;
        self.prediction = None;
        self.prediction_error = None;
        self.push_log(format!(
            "[INFO] Predicting {} -> {}",
            player.name, team.name
        ));
        Some(cmd)
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    PlayerResults { seq: u64, players: Vec<Player> },
    TeamResults { seq: u64, teams: Vec<Team> },
    Prediction(PredictionView),
    PredictionFailed(String),
    Connection(ConnectionStatus),
    Log(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProviderCommand {
    SearchPlayers { seq: u64, query: String },
    SearchTeams { seq: u64, query: String },
    PredictWhatIf(WhatIfRequest),
    PredictLegacy(LegacyPredictRequest),
    Probe,
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::PlayerResults { seq, players } => {
            if !state.player.accept_results(seq, players) {
                state.push_log("[INFO] Dropped stale player results");
            }
        }
        Delta::TeamResults { seq, teams } => {
            if !state.team.accept_results(seq, teams) {
                state.push_log("[INFO] Dropped stale team results");
            }
        }
        Delta::Prediction(view) => {
            state.predicting = false;
            state.prediction_error = None;
            let line = match &view {
                PredictionView::WhatIf(p) => format!("[INFO] Prediction delta {:+.1}", p.delta),
                PredictionView::Legacy(p) => {
                    format!("[INFO] Impact {:.1} ({})", p.impact_score, p.impact_level)
                }
            };
            state.prediction = Some(view);
            state.push_log(line);
        }
        Delta::PredictionFailed(message) => {
            state.predicting = false;
            state.prediction = None;
            state.push_log(format!("[ERR] {message}"));
            state.prediction_error = Some(message);
        }
        Delta::Connection(status) => {
            if status != state.connection {
                match status {
                    ConnectionStatus::Online => state.push_log("[INFO] Connected to player database"),
                    ConnectionStatus::Offline => state.push_log("[WARN] Prediction server offline"),
                    ConnectionStatus::Unknown => {}
                }
            }
            state.connection = status;
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}

fn string_or_default<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let rendered = match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    };
    Ok(rendered)
}

fn bool_or_default<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        serde_json::Value::String(s) => matches!(s.trim(), "true" | "t" | "1" | "yes"),
        _ => false,
    })
}

fn float_or_none<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Number(n) => Ok(n.as_f64()),
        serde_json::Value::String(s) => Ok(s.trim().parse::<f64>().ok()),
        _ => Ok(None),
    }
}

fn u64_or_default<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(float_or_none(deserializer)?
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v.round() as u64)
        .unwrap_or_default())
}

fn u32_or_none<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(float_or_none(deserializer)?
        .filter(|v| v.is_finite() && *v >= 0.0 && *v <= f64::from(u32::MAX))
        .map(|v| v.round() as u32))
}
