use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;

use transfer_terminal::api;
use transfer_terminal::config::AppConfig;
use transfer_terminal::provider::run_command;
use transfer_terminal::state::{
    ConnectionStatus, Delta, LegacyPredictRequest, ProviderCommand, WhatIfRequest,
};

struct Captured {
    request_line: String,
    body: String,
}

/// Serves a single response on an ephemeral port and hands back what it received.
fn serve_once(status: &str, body: &str) -> (String, mpsc::Receiver<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let base = format!("http://{}", listener.local_addr().unwrap());
    let status = status.to_string();
    let body = body.to_string();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();

        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap_or(0);
                }
            }
        }
        let mut payload = vec![0u8; content_length];
        reader.read_exact(&mut payload).unwrap();

        let mut stream = stream;
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).unwrap();
        let _ = tx.send(Captured {
            request_line: request_line.trim_end().to_string(),
            body: String::from_utf8_lossy(&payload).into_owned(),
        });
    });

    (base, rx)
}

fn client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("client builds")
}

fn request() -> WhatIfRequest {
    WhatIfRequest {
        team_name: "Arsenal".to_string(),
        incoming_player_name: "Bukayo Saka".to_string(),
        target_season: "2025-2026".to_string(),
        projected_minutes_in: 0,
        outgoing_minutes: None,
        cross_league_scale: 1.0,
    }
}

#[test]
fn player_search_encodes_query() {
    let (base, rx) = serve_once("200 OK", r#"[{"id": 4182, "name": "Bukayo Saka"}]"#);
    let players =
        api::search_players(&client(), &base, "saka & co", Duration::from_secs(5)).unwrap();
    assert_eq!(players.len(), 1);

    let captured = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert!(captured.request_line.starts_with("GET /players/search/aggregate?q=saka"));
    assert!(!captured.request_line.contains("saka & co"));
}

#[test]
fn whatif_posts_json_body() {
    let (base, rx) = serve_once(
        "200 OK",
        r#"{"points_base": 60.0, "points_with": 61.5, "delta": 1.5,
            "season_target": "2025-2026", "season_features_from": "2024-2025"}"#,
    );
    let prediction = api::predict_whatif(&client(), &base, &request()).unwrap();
    assert_eq!(prediction.delta, 1.5);

    let captured = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert!(captured.request_line.starts_with("POST /prediction/whatif"));
    let sent: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(sent["team_name"], "Arsenal");
    assert_eq!(sent["incoming_player_name"], "Bukayo Saka");
    assert!(sent.get("outgoing_minutes").is_none());
}

#[test]
fn failed_status_maps_to_user_message() {
    let (base, _rx) = serve_once("404 Not Found", r#"{"detail": "Team not found"}"#);
    let err = api::predict_whatif(&client(), &base, &request()).unwrap_err();
    assert!(api::reached_server(&err));
    assert_eq!(
        api::prediction_error_message(&err),
        "Player or team not found. Please check your selections."
    );

    let (base, _rx) = serve_once("500 Internal Server Error", "boom");
    let err = api::predict_legacy(
        &client(),
        &base,
        &LegacyPredictRequest {
            player_id: 1,
            team_id: 2,
        },
    )
    .unwrap_err();
    assert_eq!(
        api::prediction_error_message(&err),
        "Server error. Please try again later."
    );
}

#[test]
fn provider_reports_offline_when_nothing_listens() {
    let cfg = AppConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        ..AppConfig::default()
    };
    let (tx, rx) = mpsc::channel();
    run_command(&client(), &cfg, ProviderCommand::PredictWhatIf(request()), &tx);
    drop(tx);

    let deltas: Vec<Delta> = rx.iter().collect();
    assert!(deltas
        .iter()
        .any(|d| matches!(d, Delta::Connection(ConnectionStatus::Offline))));
    assert!(deltas.iter().any(|d| matches!(
        d,
        Delta::PredictionFailed(msg) if msg.starts_with("Network error")
    )));
}

#[test]
fn provider_search_failure_still_clears_loading() {
    let (base, _rx) = serve_once("503 Service Unavailable", "");
    let cfg = AppConfig {
        base_url: base,
        ..AppConfig::default()
    };
    let (tx, rx) = mpsc::channel();
    run_command(
        &client(),
        &cfg,
        ProviderCommand::SearchTeams {
            seq: 7,
            query: "ars".to_string(),
        },
        &tx,
    );
    drop(tx);

    let deltas: Vec<Delta> = rx.iter().collect();
    assert!(deltas
        .iter()
        .any(|d| matches!(d, Delta::Connection(ConnectionStatus::Online))));
    assert!(deltas
        .iter()
        .any(|d| matches!(d, Delta::TeamResults { seq: 7, teams } if teams.is_empty())));
}
