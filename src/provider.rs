use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use anyhow::Result;
use reqwest::blocking::Client;

use crate::api;
use crate::config::AppConfig;
use crate::http_client::init_http_client;
use crate::state::{ConnectionStatus, Delta, PredictionView, ProviderCommand};

/// Runs HTTP jobs off the UI thread until the command channel closes.
pub fn spawn_provider(cfg: AppConfig, tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        let client = match init_http_client(cfg.request_timeout) {
            Ok(client) => client,
            Err(err) => {
                let _ = tx.send(Delta::Log(format!("[ERR] {err:#}")));
                return;
            }
        };
        let pool = build_fetch_pool(cfg.fetch_parallelism);

        while let Ok(cmd) = cmd_rx.recv() {
            let tx = tx.clone();
            let cfg = cfg.clone();
            let job = move || run_command(client, &cfg, cmd, &tx);
            if let Some(pool) = pool.as_ref() {
                pool.spawn(job);
            } else {
                thread::spawn(job);
            }
        }
    });
}

/// Executes one command and reports through `tx`.
pub fn run_command(client: &Client, cfg: &AppConfig, cmd: ProviderCommand, tx: &Sender<Delta>) {
    match cmd {
        ProviderCommand::SearchPlayers { seq, query } => {
            let res = api::search_players(client, &cfg.base_url, &query, cfg.search_timeout);
            report_connection(&res, tx);
            let players = res.unwrap_or_else(|err| {
                let _ = tx.send(Delta::Log(format!("[WARN] Player search failed: {err:#}")));
                Vec::new()
            });
            let _ = tx.send(Delta::PlayerResults { seq, players });
        }
        ProviderCommand::SearchTeams { seq, query } => {
            let res = api::search_teams(client, &cfg.base_url, &query);
            report_connection(&res, tx);
            let teams = res.unwrap_or_else(|err| {
                let _ = tx.send(Delta::Log(format!("[WARN] Team search failed: {err:#}")));
                Vec::new()
            });
            let _ = tx.send(Delta::TeamResults { seq, teams });
        }
        ProviderCommand::PredictWhatIf(request) => {
            let res = api::predict_whatif(client, &cfg.base_url, &request);
            report_connection(&res, tx);
            send_prediction(res.map(PredictionView::WhatIf), tx);
        }
        ProviderCommand::PredictLegacy(request) => {
            let res = api::predict_legacy(client, &cfg.base_url, &request);
            report_connection(&res, tx);
            send_prediction(res.map(PredictionView::Legacy), tx);
        }
        ProviderCommand::Probe => {
            let status = match api::probe(client, &cfg.base_url) {
                Ok(_) => ConnectionStatus::Online,
                Err(err) => {
                    let _ = tx.send(Delta::Log(format!("[WARN] {err:#}")));
                    ConnectionStatus::Offline
                }
            };
            let _ = tx.send(Delta::Connection(status));
        }
    }
}

fn send_prediction(res: Result<PredictionView>, tx: &Sender<Delta>) {
    match res {
        Ok(view) => {
            let _ = tx.send(Delta::Prediction(view));
        }
        Err(err) => {
            let _ = tx.send(Delta::Log(format!("[WARN] Prediction failed: {err:#}")));
            let _ = tx.send(Delta::PredictionFailed(api::prediction_error_message(&err)));
        }
    }
}

fn report_connection<T>(res: &Result<T>, tx: &Sender<Delta>) {
    let status = match res {
        Ok(_) => ConnectionStatus::Online,
        Err(err) if api::reached_server(err) => ConnectionStatus::Online,
        Err(err) if is_decode_failure(err) => ConnectionStatus::Online,
        Err(_) => ConnectionStatus::Offline,
    };
    let _ = tx.send(Delta::Connection(status));
}

fn is_decode_failure(err: &anyhow::Error) -> bool {
    err.chain()
        .any(|cause| cause.downcast_ref::<serde_json::Error>().is_some())
}

fn build_fetch_pool(threads: usize) -> Option<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("fetch-{i}"))
        .build()
        .ok()
}
