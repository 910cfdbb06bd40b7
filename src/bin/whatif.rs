use anyhow::{Context, Result, bail};

use transfer_terminal::api;
use transfer_terminal::config::{AppConfig, PredictionEndpoint, load_dotenv};
use transfer_terminal::display::{
    country_tag, format_delta, format_points, format_position, or_na, player_subtitle,
    player_summary_line, team_season_label, team_subtitle,
};
use transfer_terminal::http_client::init_http_client;
use transfer_terminal::minutes::validate_text;
use transfer_terminal::season::next_season;
use transfer_terminal::state::{LegacyPredictRequest, Player, Team, WhatIfRequest};

struct Args {
    player: Option<String>,
    team: Option<String>,
    minutes: Option<String>,
    outgoing: String,
    pick_player: usize,
    pick_team: usize,
    legacy: bool,
    search_only: bool,
}

fn main() -> Result<()> {
    load_dotenv();
    let mut cfg = AppConfig::from_env();
    let args = parse_args(std::env::args().skip(1).collect())?;
    if args.legacy {
        cfg.endpoint = PredictionEndpoint::Legacy;
    }
    let client = init_http_client(cfg.request_timeout)?;

    let players = match args.player.as_deref() {
        Some(q) => api::search_players(client, &cfg.base_url, q, cfg.search_timeout)?,
        None => Vec::new(),
    };
    let teams = match args.team.as_deref() {
        Some(q) => api::search_teams(client, &cfg.base_url, q)?,
        None => Vec::new(),
    };

    if args.search_only {
        print_players(&players);
        print_teams(&teams);
        return Ok(());
    }

    let player = pick(&players, args.pick_player, "player")?;
    let team = pick(&teams, args.pick_team, "team")?;
    println!("Player: {} ({})", player.name, player_subtitle(player));
    println!("Team:   {} ({})", team.name, team_subtitle(team));

    match cfg.endpoint {
        PredictionEndpoint::WhatIf => {
            let minutes = args
                .minutes
                .as_deref()
                .context("--minutes is required for a what-if prediction")?;
            let valid = validate_text(minutes, &args.outgoing)?;
            let request = WhatIfRequest {
                team_name: team.name.clone(),
                incoming_player_name: player.name.clone(),
                target_season: next_season(&team.latest_season),
                projected_minutes_in: valid.projected_minutes_in,
                outgoing_minutes: valid.outgoing,
                cross_league_scale: cfg.cross_league_scale,
            };
            let prediction = api::predict_whatif(client, &cfg.base_url, &request)
                .map_err(with_user_message)?;
            println!();
            println!("Predicted Team Points Impact");
            println!("  Baseline Points   {:>7}", format_points(prediction.points_base));
            println!("  With Transfer     {:>7}", format_points(prediction.points_with));
            println!("  Delta (± points)  {:>7}", format_delta(prediction.delta));
            println!(
                "  Season: {} (features from {})",
                prediction.season_target, prediction.season_features_from
            );
        }
        PredictionEndpoint::Legacy => {
            let request = LegacyPredictRequest {
                player_id: player.id,
                team_id: team.id,
            };
            let prediction = api::predict_legacy(client, &cfg.base_url, &request)
                .map_err(with_user_message)?;
            println!();
            println!(
                "Impact {:.1}/10 ({}), confidence {:.0}%",
                prediction.impact_score,
                prediction.impact_level,
                prediction.confidence * 100.0
            );
        }
    }
    Ok(())
}

fn with_user_message(err: anyhow::Error) -> anyhow::Error {
    let message = api::prediction_error_message(&err);
    err.context(message)
}

fn pick<'a, T>(items: &'a [T], one_based: usize, what: &str) -> Result<&'a T> {
    if items.is_empty() {
        bail!("no {what} matched the search");
    }
    items
        .get(one_based.saturating_sub(1))
        .with_context(|| format!("only {} {what} results, asked for #{one_based}", items.len()))
}

fn print_players(players: &[Player]) {
    if players.is_empty() {
        println!("No players found");
        return;
    }
    println!("Players:");
    for (idx, p) in players.iter().enumerate() {
        println!("{:>3}. {} [{}]", idx + 1, p.name, p.nation);
        println!("     {}", player_subtitle(p));
        println!("     {}", player_summary_line(p));
    }
}

fn print_teams(teams: &[Team]) {
    if teams.is_empty() {
        println!("No teams found");
        return;
    }
    println!("Teams:");
    for (idx, t) in teams.iter().enumerate() {
        println!("{:>3}. {} [{}]", idx + 1, t.name, country_tag(&t.country));
        println!("     {} | {}", team_subtitle(t), team_season_label(t));
        println!(
            "     Pos {}  Pts {}  W {}  L {}",
            format_position(t.position_2425),
            or_na(t.points_2425),
            or_na(t.wins_2425),
            or_na(t.losses_2425)
        );
    }
}

fn parse_args(args: Vec<String>) -> Result<Args> {
    let mut out = Args {
        player: None,
        team: None,
        minutes: None,
        outgoing: String::new(),
        pick_player: 1,
        pick_team: 1,
        legacy: false,
        search_only: false,
    };

    let mut idx = 0;
    while idx < args.len() {
        let arg = args[idx].as_str();
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag, Some(value.to_string())),
            _ => (arg, None),
        };
        let mut value = || -> Result<String> {
            if let Some(v) = inline.clone() {
                return Ok(v);
            }
            idx += 1;
            args.get(idx)
                .cloned()
                .with_context(|| format!("{flag} needs a value"))
        };
        match flag {
            "--player" => out.player = Some(value()?),
            "--team" => out.team = Some(value()?),
            "--minutes" => out.minutes = Some(value()?),
            "--outgoing" => out.outgoing = value()?,
            "--pick-player" => out.pick_player = parse_pick(&value()?)?,
            "--pick-team" => out.pick_team = parse_pick(&value()?)?,
            "--legacy" => out.legacy = true,
            "--search-only" => out.search_only = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => bail!("unknown argument: {other}"),
        }
        idx += 1;
    }

    if out.player.is_none() && out.team.is_none() {
        print_usage();
        bail!("pass --player and/or --team");
    }
    if !out.search_only && (out.player.is_none() || out.team.is_none()) {
        bail!("a prediction needs both --player and --team");
    }
    Ok(out)
}

fn parse_pick(raw: &str) -> Result<usize> {
    let n = raw
        .trim()
        .parse::<usize>()
        .with_context(|| format!("invalid result number: {raw}"))?;
    if n == 0 {
        bail!("result numbers start at 1");
    }
    Ok(n)
}

fn print_usage() {
    eprintln!(
        "usage: whatif --player <name> --team <name> --minutes <n> [--outgoing \"Name:Min, Name2:Min\"]\n\
         \x20             [--pick-player N] [--pick-team N] [--legacy] [--search-only]"
    );
}
