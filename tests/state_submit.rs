use std::collections::BTreeMap;

use transfer_terminal::config::{AppConfig, PredictionEndpoint};
use transfer_terminal::state::{
    AppState, ConnectionStatus, Delta, LegacyPredictRequest, Player, PredictionView,
    ProviderCommand, Team, WhatIfPrediction, WhatIfRequest, apply_delta,
};

fn selected_state(endpoint: PredictionEndpoint, latest_season: &str) -> AppState {
    let cfg = AppConfig {
        endpoint,
        cross_league_scale: 0.8,
        ..AppConfig::default()
    };
    let mut state = AppState::with_config(&cfg);
    let player: Player = serde_json::from_value(serde_json::json!({
        "id": 4182,
        "name": "Bukayo Saka"
    }))
    .unwrap();
    let team: Team = serde_json::from_value(serde_json::json!({
        "id": 12,
        "name": "Arsenal",
        "latest_season": latest_season
    }))
    .unwrap();
    state.player.selected = Some(player);
    state.team.selected = Some(team);
    state
}

#[test]
fn submission_without_selections_sends_nothing() {
    let mut state = AppState::new();
    state.minutes.incoming = "0".to_string();
    assert!(state.prepare_submission().is_none());
    assert!(!state.predicting);
    assert!(state.logs.iter().any(|l| l.contains("Select a player and a team first")));
}

#[test]
fn balanced_minutes_build_a_whatif_request() {
    let mut state = selected_state(PredictionEndpoint::WhatIf, "2023-2024");
    state.minutes.incoming = "900".to_string();
    state.minutes.outgoing.add("Rice", "300").unwrap();
    state.minutes.outgoing.add("Odegaard", "600").unwrap();

    let cmd = state.prepare_submission().expect("request should be built");
    let mut outgoing = BTreeMap::new();
    outgoing.insert("Odegaard".to_string(), 600);
    outgoing.insert("Rice".to_string(), 300);
    assert_eq!(
        cmd,
        ProviderCommand::PredictWhatIf(WhatIfRequest {
            team_name: "Arsenal".to_string(),
            incoming_player_name: "Bukayo Saka".to_string(),
            target_season: "2024-2025".to_string(),
            projected_minutes_in: 900,
            outgoing_minutes: Some(outgoing),
            cross_league_scale: 0.8,
        })
    );
    assert!(state.predicting);
    assert!(state.prediction_error.is_none());
}

#[test]
fn missing_latest_season_targets_default_season() {
    let mut state = selected_state(PredictionEndpoint::WhatIf, "");
    state.minutes.incoming = "0".to_string();
    let Some(ProviderCommand::PredictWhatIf(request)) = state.prepare_submission() else {
        panic!("expected a what-if request");
    };
    assert_eq!(request.target_season, "2025-2026");
    assert_eq!(request.outgoing_minutes, None);
}

#[test]
fn request_body_omits_absent_outgoing_minutes() {
    let request = WhatIfRequest {
        team_name: "Arsenal".to_string(),
        incoming_player_name: "Bukayo Saka".to_string(),
        target_season: "2025-2026".to_string(),
        projected_minutes_in: 0,
        outgoing_minutes: None,
        cross_league_scale: 1.0,
    };
    let body = serde_json::to_value(&request).unwrap();
    assert!(body.get("outgoing_minutes").is_none());
    assert_eq!(body["projected_minutes_in"], 0);
    assert_eq!(body["cross_league_scale"], 1.0);
}

#[test]
fn unbalanced_minutes_block_submission() {
    let mut state = selected_state(PredictionEndpoint::WhatIf, "2024-2025");
    state.minutes.incoming = "900".to_string();
    state.minutes.outgoing.add("Rice", "300").unwrap();

    assert!(state.prepare_submission().is_none());
    assert!(!state.predicting);
    assert_eq!(
        state.prediction_error.as_deref(),
        Some("Total outgoing minutes do not match player minutes. Please check your selections.")
    );
}

#[test]
fn legacy_endpoint_sends_ids_only() {
    let mut state = selected_state(PredictionEndpoint::Legacy, "2024-2025");
    let cmd = state.prepare_submission().expect("legacy needs no minutes");
    assert_eq!(
        cmd,
        ProviderCommand::PredictLegacy(LegacyPredictRequest {
            player_id: 4182,
            team_id: 12
        })
    );
}

#[test]
fn second_submit_is_ignored_while_predicting() {
    let mut state = selected_state(PredictionEndpoint::Legacy, "2024-2025");
    assert!(state.prepare_submission().is_some());
    assert!(state.prepare_submission().is_none());
}

#[test]
fn prediction_deltas_update_state() {
    let mut state = selected_state(PredictionEndpoint::Legacy, "2024-2025");
    state.prepare_submission();

    apply_delta(
        &mut state,
        Delta::PredictionFailed("Server error. Please try again later.".to_string()),
    );
    assert!(!state.predicting);
    assert_eq!(
        state.prediction_error.as_deref(),
        Some("Server error. Please try again later.")
    );

    state.prepare_submission();
    assert!(state.prediction_error.is_none());
    let prediction = WhatIfPrediction {
        points_base: 71.84,
        points_with: 74.12,
        delta: 2.28,
        season_target: "2025-2026".to_string(),
        season_features_from: "2024-2025".to_string(),
    };
    apply_delta(&mut state, Delta::Prediction(PredictionView::WhatIf(prediction.clone())));
    assert!(!state.predicting);
    assert_eq!(state.prediction, Some(PredictionView::WhatIf(prediction)));
    assert!(state.logs.iter().any(|l| l.contains("Prediction delta +2.3")));
}

#[test]
fn connection_changes_are_logged_once() {
    let mut state = AppState::new();
    assert_eq!(state.connection, ConnectionStatus::Unknown);

    apply_delta(&mut state, Delta::Connection(ConnectionStatus::Offline));
    apply_delta(&mut state, Delta::Connection(ConnectionStatus::Offline));
    assert_eq!(state.connection, ConnectionStatus::Offline);
    let offline_logs = state
        .logs
        .iter()
        .filter(|l| l.contains("Prediction server offline"))
        .count();
    assert_eq!(offline_logs, 1);

    apply_delta(&mut state, Delta::Connection(ConnectionStatus::Online));
    assert!(state.logs.iter().any(|l| l.contains("Connected to player database")));
}

#[test]
fn pasted_list_with_bad_rows_blocks_submission() {
    let mut state = selected_state(PredictionEndpoint::WhatIf, "2024-2025");
    state.minutes.incoming = "90".to_string();
    state.paste_outgoing("Rice:abc, :200, Saka:90");

    assert!(state.minutes.outgoing.is_empty());
    assert!(state.prepare_submission().is_none());
    assert!(!state.predicting);
    assert_eq!(
        state.prediction_error.as_deref(),
        Some("Outgoing minutes for Rice must be a whole number, got \"abc\".")
    );
}

#[test]
fn pasted_json_with_negative_minutes_blocks_submission() {
    let mut state = selected_state(PredictionEndpoint::WhatIf, "2024-2025");
    state.minutes.incoming = "0".to_string();
    state.paste_outgoing(r#"[{"playerName":"Rice","minutes":-5}]"#);

    assert!(state.minutes.outgoing.is_empty());
    assert!(state.prepare_submission().is_none());
    assert!(
        state
            .prediction_error
            .as_deref()
            .is_some_and(|msg| msg.contains("between 0 and 4000"))
    );
}

#[test]
fn clean_paste_submits_its_rows() {
    let mut state = selected_state(PredictionEndpoint::WhatIf, "2024-2025");
    state.minutes.incoming = "900".to_string();
    state.paste_outgoing("Rice:300, Odegaard:600");
    assert_eq!(state.minutes.outgoing.len(), 2);
    assert!(state.logs.iter().any(|l| l.contains("Rice:300, Odegaard:600")));

    let Some(ProviderCommand::PredictWhatIf(request)) = state.prepare_submission() else {
        panic!("expected a what-if request");
    };
    let outgoing = request.outgoing_minutes.expect("allocation sent");
    assert_eq!(outgoing["Rice"], 300);
    assert_eq!(outgoing["Odegaard"], 600);
}
