use std::time::{Duration, Instant};

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use transfer_terminal::api::parse_players_json;
use transfer_terminal::minutes::{parse_outgoing, validate_text};
use transfer_terminal::state::{AppState, Delta, ProviderCommand, apply_delta};

fn players_json(count: usize) -> String {
    let rows: Vec<String> = (0..count)
        .map(|i| {
            format!(
                r#"{{"id": {i}, "name": "Player {i}", "nation": "ENG", "primary_pos": "MF",
                    "teams": "Arsenal, Chelsea", "first_season": "2018-2019",
                    "last_season": "2024-2025", "seasons_count": "7", "total_matches": 180,
                    "total_goals": {goals}, "total_assists": 31, "total_clean_sheets": null,
                    "avg_save_pct": null}}"#,
                goals = i % 40
            )
        })
        .collect();
    format!("[{}]", rows.join(","))
}

fn outgoing_text(count: usize) -> String {
    (0..count)
        .map(|i| format!("Player {i}:{}", 10 + i % 50))
        .collect::<Vec<_>>()
        .join(", ")
}

fn bench_player_search_parse(c: &mut Criterion) {
    let raw = players_json(50);
    c.bench_function("player_search_parse_50", |b| {
        b.iter(|| {
            let players = parse_players_json(black_box(&raw)).unwrap();
            black_box(players.len());
        })
    });
}

fn bench_outgoing_parse(c: &mut Criterion) {
    let pairs = outgoing_text(20);
    let structured = serde_json::to_string(
        &(0..20)
            .map(|i| serde_json::json!({ "playerName": format!("Player {i}"), "minutes": 45 }))
            .collect::<Vec<_>>(),
    )
    .unwrap();

    c.bench_function("outgoing_parse_pairs_20", |b| {
        b.iter(|| black_box(parse_outgoing(black_box(&pairs)).unwrap()))
    });
    c.bench_function("outgoing_parse_json_20", |b| {
        b.iter(|| black_box(parse_outgoing(black_box(&structured)).unwrap()))
    });
    c.bench_function("validate_text_20", |b| {
        b.iter(|| black_box(validate_text(black_box("900"), black_box(&structured)).is_ok()))
    });
}

fn bench_search_results_delta(c: &mut Criterion) {
    let players = parse_players_json(&players_json(50)).unwrap();
    c.bench_function("apply_player_results_50", |b| {
        b.iter(|| {
            let mut state = AppState::new();
            let t0 = Instant::now();
            state.set_player_query("pla", t0);
            let due = state.take_due_searches(t0 + Duration::from_secs(1));
            let seq = match due.first() {
                Some(ProviderCommand::SearchPlayers { seq, .. }) => *seq,
                _ => 0,
            };
            apply_delta(
                &mut state,
                Delta::PlayerResults {
                    seq,
                    players: players.clone(),
                },
            );
            black_box(state.player.results.len());
        })
    });
}

criterion_group!(
    perf,
    bench_player_search_parse,
    bench_outgoing_parse,
    bench_search_results_delta
);
criterion_main!(perf);
