use std::env;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionEndpoint {
    /// `POST /prediction/whatif` with projected and outgoing minutes.
    WhatIf,
    /// `POST /prediction/predict` with player and team ids only.
    Legacy,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub debounce: Duration,
    pub player_min_chars: usize,
    pub team_min_chars: usize,
    pub search_timeout: Duration,
    pub request_timeout: Duration,
    pub fetch_parallelism: usize,
    pub cross_league_scale: f64,
    pub endpoint: PredictionEndpoint,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            debounce: Duration::from_millis(300),
            player_min_chars: 1,
            team_min_chars: 1,
            search_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            fetch_parallelism: 4,
            cross_league_scale: 1.0,
            endpoint: PredictionEndpoint::WhatIf,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let base_url = env::var("API_BASE_URL")
            .ok()
            .or_else(|| env::var("NEXT_PUBLIC_API_BASE_URL").ok())
            .map(|s| normalize_base_url(&s))
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.base_url);

        let debounce_ms = env_parse::<u64>("SEARCH_DEBOUNCE_MS")
            .unwrap_or(300)
            .clamp(0, 5000);
        let player_min_chars = env_parse::<usize>("PLAYER_SEARCH_MIN_CHARS")
            .unwrap_or(defaults.player_min_chars)
            .clamp(1, 10);
        let team_min_chars = env_parse::<usize>("TEAM_SEARCH_MIN_CHARS")
            .unwrap_or(defaults.team_min_chars)
            .clamp(1, 10);
        let search_timeout = env_parse::<u64>("SEARCH_TIMEOUT_SECS")
            .unwrap_or(5)
            .clamp(1, 60);
        let request_timeout = env_parse::<u64>("REQUEST_TIMEOUT_SECS")
            .unwrap_or(10)
            .clamp(1, 120);
        let fetch_parallelism = env_parse::<usize>("FETCH_PARALLELISM")
            .unwrap_or(defaults.fetch_parallelism)
            .clamp(1, 16);
        let cross_league_scale = env_parse::<f64>("CROSS_LEAGUE_SCALE")
            .filter(|v| v.is_finite())
            .unwrap_or(defaults.cross_league_scale)
            .clamp(0.1, 5.0);
        let endpoint = env::var("PREDICTION_ENDPOINT")
            .ok()
            .and_then(|s| parse_endpoint(&s))
            .unwrap_or(defaults.endpoint);

        Self {
            base_url,
            debounce: Duration::from_millis(debounce_ms),
            player_min_chars,
            team_min_chars,
            search_timeout: Duration::from_secs(search_timeout),
            request_timeout: Duration::from_secs(request_timeout),
            fetch_parallelism,
            cross_league_scale,
            endpoint,
        }
    }
}

/// Loads `.env.local` then `.env`; variables already set win.
pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

pub fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

pub fn parse_endpoint(raw: &str) -> Option<PredictionEndpoint> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "whatif" | "what-if" | "what_if" => Some(PredictionEndpoint::WhatIf),
        "legacy" | "predict" => Some(PredictionEndpoint::Legacy),
        _ => None,
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|val| val.trim().parse::<T>().ok())
}
