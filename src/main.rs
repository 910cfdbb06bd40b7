use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use transfer_terminal::config::{AppConfig, PredictionEndpoint, load_dotenv};
use transfer_terminal::display::{
    connection_label, country_tag, format_delta, format_points, format_position,
    format_save_pct, or_na, player_season_range, player_subtitle, player_summary_line,
    team_season_label, team_subtitle,
};
use transfer_terminal::provider::spawn_provider;
use transfer_terminal::state::{
    AppState, ConnectionStatus, Delta, Focus, PredictionView, ProviderCommand, apply_delta,
};

const DROPDOWN_ROWS: usize = 6;

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
}

impl App {
    fn new(state: AppState, cmd_tx: Option<mpsc::Sender<ProviderCommand>>) -> Self {
        Self {
            state,
            should_quit: false,
            cmd_tx,
        }
    }

    fn send(&mut self, cmd: ProviderCommand) {
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log("[INFO] Network worker unavailable");
            return;
        };
        if tx.send(cmd).is_err() {
            self.state.push_log("[WARN] Network worker stopped");
            self.state.predicting = false;
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if self.state.help_overlay {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(1)) {
                self.state.help_overlay = false;
            }
            return;
        }

        match key.code {
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('e') if ctrl => self.state.toggle_customize(),
            KeyCode::Char('p') if ctrl => self.submit(),
            KeyCode::Char('r') if ctrl => {
                self.state.push_log("[INFO] Retrying connection");
                self.send(ProviderCommand::Probe);
            }
            KeyCode::F(1) => self.state.help_overlay = true,
            KeyCode::Esc => {
                if !self.state.hide_dropdowns() {
                    self.should_quit = true;
                }
            }
            KeyCode::Tab => self.state.focus_next(),
            KeyCode::BackTab => self.state.focus_prev(),
            KeyCode::Down => self.state.move_down(),
            KeyCode::Up => self.state.move_up(),
            KeyCode::Enter => self.on_enter(),
            KeyCode::Delete => self.on_delete(),
            KeyCode::Backspace => self.edit_focused(|text| {
                text.pop();
            }),
            KeyCode::Char(c) if !ctrl => self.on_char(c),
            _ => {}
        }
    }

    fn on_char(&mut self, c: char) {
        let numeric = matches!(self.state.focus, Focus::Incoming | Focus::DraftMinutes);
        if numeric && !c.is_ascii_digit() {
            return;
        }
        self.edit_focused(|text| text.push(c));
    }

    fn edit_focused(&mut self, edit: impl FnOnce(&mut String)) {
        let now = Instant::now();
        match self.state.focus {
            Focus::PlayerSearch => {
                let mut query = self.state.player.query.clone();
                edit(&mut query);
                self.state.set_player_query(query, now);
            }
            Focus::TeamSearch => {
                let mut query = self.state.team.query.clone();
                edit(&mut query);
                self.state.set_team_query(query, now);
            }
            Focus::Incoming => edit(&mut self.state.minutes.incoming),
            Focus::DraftName => edit(&mut self.state.minutes.draft_name),
            Focus::DraftMinutes => edit(&mut self.state.minutes.draft_minutes),
            Focus::OutgoingList => {}
        }
    }

    fn on_enter(&mut self) {
        match self.state.focus {
            Focus::PlayerSearch => {
                self.state.select_highlighted_player();
            }
            Focus::TeamSearch => {
                self.state.select_highlighted_team();
            }
            Focus::Incoming => self.state.focus_next(),
            Focus::DraftName => {
                let draft = self.state.minutes.draft_name.trim().to_string();
                if draft.contains(':') || draft.starts_with('[') {
                    self.state.paste_outgoing(&draft);
                    if self.state.minutes.rejected_paste.is_none() {
                        self.state.minutes.draft_name.clear();
                    }
                } else {
                    self.state.focus_next();
                }
            }
            Focus::DraftMinutes => {
                self.state.add_outgoing_draft();
                if self.state.minutes.draft_name.is_empty() {
                    self.state.focus_prev();
                }
            }
            Focus::OutgoingList => {}
        }
    }

    fn on_delete(&mut self) {
        match self.state.focus {
            Focus::PlayerSearch => self.state.clear_player(),
            Focus::TeamSearch => self.state.clear_team(),
            Focus::OutgoingList => self.state.remove_selected_outgoing(),
            _ => {}
        }
    }

    fn submit(&mut self) {
        if let Some(cmd) = self.state.prepare_submission() {
            self.send(cmd);
        }
    }

    fn dispatch_due_searches(&mut self) {
        for cmd in self.state.take_due_searches(Instant::now()) {
            self.send(cmd);
        }
    }
}

fn main() -> anyhow::Result<()> {
    load_dotenv();
    let cfg = AppConfig::from_env();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    spawn_provider(cfg.clone(), tx, cmd_rx);

    let mut app = App::new(AppState::with_config(&cfg), Some(cmd_tx));
    app.state
        .push_log(format!("[INFO] Prediction service: {}", cfg.base_url));
    app.send(ProviderCommand::Probe);
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        app.dispatch_due_searches();

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let state = &app.state;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(11), Constraint::Min(1)])
        .split(chunks[1]);

    let selectors = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(body[0]);

    let lower = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(body[1]);

    render_player_panel(frame, selectors[0], state);
    render_team_panel(frame, selectors[1], state);
    render_customize(frame, lower[0], state);
    render_prediction(frame, lower[1], state);

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(state)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    // Dropdowns float over the panels below them.
    render_player_dropdown(frame, selectors[0], state);
    render_team_dropdown(frame, selectors[1], state);

    if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let mode = match state.endpoint {
        PredictionEndpoint::WhatIf => "WHAT-IF",
        PredictionEndpoint::Legacy => "IMPACT",
    };
    let line1 = format!(
        "  TRANSFER TERMINAL | {mode} | {} | {}",
        state.base_url,
        connection_label(state.connection)
    );
    let line2 = "  Discover the predicted impact of your team's dream signing.".to_string();
    format!("{line1}\n{line2}")
}

fn footer_text(state: &AppState) -> String {
    match state.focus {
        Focus::PlayerSearch | Focus::TeamSearch => {
            "Tab Focus | type Search | ↑/↓ Move | Enter Select | Del Clear | ^E Customize | ^P Impact | ^R Retry | F1 Help | Esc Close/Quit".to_string()
        }
        Focus::OutgoingList => {
            "Tab Focus | ↑/↓ Move | Del Remove | ^E Customize | ^P Impact | F1 Help | Esc Quit".to_string()
        }
        _ => {
            "Tab Focus | type Edit | Enter Next/Add | ^E Customize | ^P Impact | F1 Help | Esc Quit".to_string()
        }
    }
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

fn input_line(label: &str, value: &str, placeholder: &str, focused: bool) -> Line<'static> {
    let cursor = if focused { "_" } else { "" };
    let (text, style) = if value.is_empty() && !focused {
        (placeholder.to_string(), Style::default().fg(Color::DarkGray))
    } else {
        (format!("{value}{cursor}"), Style::default().fg(Color::White))
    };
    Line::from(vec![
        Span::styled(format!("{label} "), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(text, style),
    ])
}

fn stat_row(cells: &[(&str, String)]) -> Line<'static> {
    let mut spans = Vec::new();
    for (label, value) in cells {
        spans.push(Span::styled(
            format!("{value:>6} "),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!("{label}  "),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

fn render_player_panel(frame: &mut Frame, area: Rect, state: &AppState) {
    let focused = state.focus == Focus::PlayerSearch;
    let mut lines = vec![
        input_line("Search:", &state.player.query, "Search player...", focused),
        Line::from(""),
    ];

    match &state.player.selected {
        Some(p) => {
            lines.push(Line::from(vec![
                Span::styled(
                    p.name.clone(),
                    Style::default().add_modifier(Modifier::BOLD | Modifier::ITALIC),
                ),
                Span::raw("  "),
                Span::styled(
                    format!(" {} ", p.primary_pos),
                    Style::default().fg(Color::White).bg(Color::Green),
                ),
                Span::raw(format!("  {}", p.nation)),
            ]));
            lines.push(Line::styled(
                player_season_range(p),
                Style::default().fg(Color::DarkGray),
            ));
            lines.push(Line::styled(p.teams.clone(), Style::default().fg(Color::DarkGray)));
            lines.push(stat_row(&[
                ("Goals", p.total_goals.to_string()),
                ("Assists", p.total_assists.to_string()),
                ("Matches", p.total_matches.to_string()),
                ("Seasons", p.seasons_count.to_string()),
            ]));
            lines.push(stat_row(&[
                ("Clean sheets", p.total_clean_sheets.to_string()),
                ("Save %", format_save_pct(p.avg_save_pct)),
            ]));
        }
        None => lines.push(Line::styled(
            "Search for a player to transfer.",
            Style::default().fg(Color::DarkGray),
        )),
    }

    let panel = Paragraph::new(lines).block(
        Block::default()
            .title("1. Select a player")
            .borders(Borders::ALL)
            .border_style(focus_style(focused)),
    );
    frame.render_widget(panel, area);
}

fn render_team_panel(frame: &mut Frame, area: Rect, state: &AppState) {
    let focused = state.focus == Focus::TeamSearch;
    let mut lines = vec![
        input_line("Search:", &state.team.query, "Search team...", focused),
        Line::from(""),
    ];

    match &state.team.selected {
        Some(t) => {
            lines.push(Line::from(vec![
                Span::styled(
                    t.name.clone(),
                    Style::default().add_modifier(Modifier::BOLD | Modifier::ITALIC),
                ),
                Span::raw("  "),
                Span::styled(
                    format!(" {} ", t.league),
                    Style::default().fg(Color::White).bg(Color::Green),
                ),
            ]));
            lines.push(Line::styled(
                format!("{} [{}] • {}", t.country, country_tag(&t.country), t.league),
                Style::default().fg(Color::DarkGray),
            ));
            lines.push(Line::styled(
                team_season_label(t),
                Style::default().fg(Color::DarkGray),
            ));
            lines.push(stat_row(&[
                ("Position", format_position(t.position_2425)),
                ("Points", or_na(t.points_2425)),
            ]));
            lines.push(stat_row(&[
                ("Wins", or_na(t.wins_2425)),
                ("Losses", or_na(t.losses_2425)),
            ]));
        }
        None => lines.push(Line::styled(
            "Search for a team to transfer player to.",
            Style::default().fg(Color::DarkGray),
        )),
    }

    let panel = Paragraph::new(lines).block(
        Block::default()
            .title("2. Select a team")
            .borders(Borders::ALL)
            .border_style(focus_style(focused)),
    );
    frame.render_widget(panel, area);
}

fn dropdown_area(anchor: Rect, rows: usize) -> Rect {
    let height = (rows as u16).saturating_mul(2).saturating_add(2);
    Rect {
        x: anchor.x + 1,
        y: anchor.y + 2,
        width: anchor.width.saturating_sub(2),
        height: height.min(anchor.height.saturating_mul(2)),
    }
}

fn dropdown_lines<T>(
    items: &[T],
    highlighted: usize,
    loading: bool,
    empty_label: &str,
    render: impl Fn(&T) -> (String, String),
) -> Vec<Line<'static>> {
    if loading {
        return vec![Line::styled("Searching...", Style::default().fg(Color::DarkGray))];
    }
    if items.is_empty() {
        return vec![Line::styled(
            empty_label.to_string(),
            Style::default().fg(Color::DarkGray),
        )];
    }
    let (start, end) = visible_range(highlighted, items.len(), DROPDOWN_ROWS);
    let mut lines = Vec::new();
    for (idx, item) in items.iter().enumerate().take(end).skip(start) {
        let (title, detail) = render(item);
        let style = if idx == highlighted {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        let prefix = if idx == highlighted { "> " } else { "  " };
        lines.push(Line::styled(format!("{prefix}{title}"), style.add_modifier(Modifier::BOLD)));
        lines.push(Line::styled(format!("    {detail}"), style.fg(Color::Gray)));
    }
    lines
}

fn render_player_dropdown(frame: &mut Frame, panel: Rect, state: &AppState) {
    if state.focus != Focus::PlayerSearch || !state.player.dropdown_visible() {
        return;
    }
    let lines = dropdown_lines(
        &state.player.results,
        state.player.highlighted,
        state.player.loading,
        "No players found",
        |p| {
            (
                format!("{}  [{}]", p.name, p.nation),
                format!("{} | {}", player_subtitle(p), player_summary_line(p)),
            )
        },
    );
    render_dropdown(frame, panel, lines, state.player.results.len());
}

fn render_team_dropdown(frame: &mut Frame, panel: Rect, state: &AppState) {
    if state.focus != Focus::TeamSearch || !state.team.dropdown_visible() {
        return;
    }
    let lines = dropdown_lines(
        &state.team.results,
        state.team.highlighted,
        state.team.loading,
        "No teams found",
        |t| {
            (
                format!("{}  [{}]", t.name, country_tag(&t.country)),
                format!("{} | {}", team_subtitle(t), team_season_label(t)),
            )
        },
    );
    render_dropdown(frame, panel, lines, state.team.results.len());
}

fn render_dropdown(frame: &mut Frame, panel: Rect, lines: Vec<Line<'static>>, total: usize) {
    let rows = total.clamp(1, DROPDOWN_ROWS);
    let area = dropdown_area(panel, rows).intersection(frame.size());
    if area.height < 3 || area.width < 4 {
        return;
    }
    frame.render_widget(Clear, area);
    let title = if total > 0 {
        format!("Results ({total})")
    } else {
        "Results".to_string()
    };
    let list = Paragraph::new(lines).block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(list, area);
}

fn render_customize(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Customize").borders(Borders::ALL);
    if !state.customize_available() {
        let hint = Paragraph::new("Select a player and a team to customize minutes.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(hint, area);
        return;
    }
    if !state.customize_expanded {
        let hint = Paragraph::new("+ Customize (Ctrl-E)")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(hint, area);
        return;
    }

    let form = &state.minutes;
    let team_name = state
        .team
        .selected
        .as_ref()
        .map(|t| t.name.as_str())
        .unwrap_or_default();
    let mut lines = vec![
        Line::styled("3. Incoming mins.", Style::default().add_modifier(Modifier::BOLD)),
        input_line(
            "  Minutes:",
            &form.incoming,
            "Enter minutes...",
            state.focus == Focus::Incoming,
        ),
        Line::from(""),
        Line::from(vec![
            Span::styled("4. Outgoing mins. ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled("(optional)", Style::default().add_modifier(Modifier::ITALIC)),
        ]),
        Line::styled(
            format!("  Select players from {team_name} to replace with incoming minutes."),
            Style::default().fg(Color::DarkGray),
        ),
        input_line(
            "  Player:",
            &form.draft_name,
            "Player name (or Name:Min, ...)",
            state.focus == Focus::DraftName,
        ),
        input_line(
            "  Minutes:",
            &form.draft_minutes,
            "Minutes",
            state.focus == Focus::DraftMinutes,
        ),
    ];

    if !form.outgoing.is_empty() {
        let list_focused = state.focus == Focus::OutgoingList;
        lines.push(Line::styled(
            format!("  Selected players  Total: {} minutes", form.outgoing.total()),
            focus_style(list_focused).add_modifier(Modifier::BOLD),
        ));
        for (idx, entry) in form.outgoing.entries.iter().enumerate() {
            let selected = list_focused && idx == state.outgoing_selected;
            let style = if selected {
                Style::default().fg(Color::White).bg(Color::DarkGray)
            } else {
                Style::default()
            };
            lines.push(Line::styled(
                format!("  [{:>4}m] {}", entry.minutes, entry.player_name),
                style,
            ));
        }
    }

    let in_form = !matches!(state.focus, Focus::PlayerSearch | Focus::TeamSearch);
    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(block.border_style(focus_style(in_form)));
    frame.render_widget(panel, area);
}

fn render_prediction(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Impact").borders(Borders::ALL);
    let mut lines = vec![Line::styled(
        "See your predicted transfer impact ... maybe it will happen?",
        Style::default().add_modifier(Modifier::ITALIC).fg(Color::DarkGray),
    )];
    lines.push(Line::from(""));

    if state.predicting {
        lines.push(Line::styled("Predicting...", Style::default().fg(Color::Yellow)));
    } else if let Some(err) = &state.prediction_error {
        lines.push(Line::styled(err.clone(), Style::default().fg(Color::Red)));
    } else {
        match &state.prediction {
            Some(PredictionView::WhatIf(p)) => {
                let delta_color = if p.delta >= 0.0 { Color::Green } else { Color::Red };
                lines.push(Line::styled(
                    "Predicted Team Points Impact",
                    Style::default().add_modifier(Modifier::BOLD),
                ));
                let value = |text: String, color: Color| {
                    Span::styled(
                        format!("{text:>8}"),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    )
                };
                lines.push(Line::from(vec![
                    value(format_points(p.points_base), Color::Cyan),
                    Span::raw("  Baseline Points"),
                ]));
                lines.push(Line::from(vec![
                    value(format_points(p.points_with), Color::Cyan),
                    Span::raw("  With Transfer"),
                ]));
                lines.push(Line::from(vec![
                    value(format_delta(p.delta), delta_color),
                    Span::raw("  Delta (± points)"),
                ]));
                lines.push(Line::styled(
                    format!(
                        "Season: {} (features from {})",
                        p.season_target, p.season_features_from
                    ),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            Some(PredictionView::Legacy(p)) => {
                lines.push(Line::styled(
                    format!("{} -> {} ({})", p.player_name, p.team_name, p.league),
                    Style::default().add_modifier(Modifier::BOLD),
                ));
                lines.push(Line::from(format!(
                    "Impact {:.1}/10  {}  confidence {:.0}%",
                    p.impact_score,
                    p.impact_level,
                    p.confidence * 100.0
                )));
                let d = &p.prediction_details;
                lines.push(Line::styled(
                    format!(
                        "G/match {}  A/match {}  Pos {}  Pts {}",
                        d.player_goals_per_match
                            .map(|v| format!("{v:.2}"))
                            .unwrap_or_else(|| "N/A".to_string()),
                        d.player_assists_per_match
                            .map(|v| format!("{v:.2}"))
                            .unwrap_or_else(|| "N/A".to_string()),
                        format_position(d.team_position),
                        or_na(d.team_points),
                    ),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            None => lines.push(Line::styled(
                "Press Ctrl-P for Impact",
                Style::default().fg(Color::DarkGray),
            )),
        }
    }

    if state.connection == ConnectionStatus::Offline {
        lines.push(Line::from(""));
        lines.push(Line::styled(
            "Server offline - Ctrl-R to retry connection",
            Style::default().fg(Color::Red),
        ));
    }

    let panel = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
    frame.render_widget(panel, area);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    let start = state.logs.len().saturating_sub(3);
    state
        .logs
        .iter()
        .skip(start)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Transfer Terminal - Help",
        "",
        "Global:",
        "  Tab / Shift-Tab   Move focus",
        "  Ctrl-E            Toggle customize panel",
        "  Ctrl-P            Predict impact",
        "  Ctrl-R            Retry connection",
        "  F1                Toggle help",
        "  Esc               Close results / quit",
        "  Ctrl-C            Quit",
        "",
        "Search:",
        "  type              Search (debounced)",
        "  ↑/↓ + Enter       Pick a result",
        "  Del               Clear the selection",
        "",
        "Outgoing minutes:",
        "  Player + Minutes, Enter   Add a row",
        "  Name:Min, Name2:Min       Paste a whole list in Player",
        "  Del (on list)             Remove a row",
        "",
        "Outgoing minutes must add up to the incoming minutes.",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
