use crate::state::{ConnectionStatus, Player, Team};

pub fn ordinal_suffix(n: u32) -> &'static str {
    let j = n % 10;
    let k = n % 100;
    if j == 1 && k != 11 {
        "st"
    } else if j == 2 && k != 12 {
        "nd"
    } else if j == 3 && k != 13 {
        "rd"
    } else {
        "th"
    }
}

pub fn format_position(position: Option<u32>) -> String {
    match position {
        Some(p) => format!("{p}{}", ordinal_suffix(p)),
        None => "N/A".to_string(),
    }
}

pub fn or_na(value: Option<u32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "N/A".to_string())
}

/// Short code standing in for the country flag.
pub fn country_tag(country: &str) -> &'static str {
    match country.trim().to_ascii_uppercase().as_str() {
        "ENGLAND" => "ENG",
        "SPAIN" => "ESP",
        "GERMANY" => "GER",
        "ITALY" => "ITA",
        "FRANCE" => "FRA",
        _ => "INT",
    }
}

pub fn team_season_label(team: &Team) -> String {
    let mut label = if team.active_2024_2025 {
        "Current Season".to_string()
    } else {
        format!("Last: {}", team.latest_season)
    };
    if let Some(position) = team.position_2425 {
        label.push_str(&format!(" • {}", format_position(Some(position))));
    }
    label
}

pub fn team_subtitle(team: &Team) -> String {
    format!("{} • {}", team.league, team.country)
}

pub fn player_subtitle(player: &Player) -> String {
    format!("{} • {}", player.teams, player.primary_pos)
}

pub fn player_summary_line(player: &Player) -> String {
    format!(
        "{}G {}A • {} matches • {} seasons",
        player.total_goals, player.total_assists, player.total_matches, player.seasons_count
    )
}

pub fn player_season_range(player: &Player) -> String {
    format!("{} - {}", player.first_season, player.last_season)
}

pub fn format_save_pct(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.1}%"),
        _ => "N/A".to_string(),
    }
}

pub fn format_points(value: f64) -> String {
    format!("{value:.1}")
}

/// Points change, one decimal; negatives keep their minus, gains are unsigned.
pub fn format_delta(value: f64) -> String {
    format!("{value:.1}")
}

pub fn connection_label(status: ConnectionStatus) -> &'static str {
    match status {
        ConnectionStatus::Unknown => "Checking connection...",
        ConnectionStatus::Online => "Connected to player database",
        ConnectionStatus::Offline => "Prediction server offline",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinal_suffixes_cover_teens() {
        let cases = [
            (1, "st"),
            (2, "nd"),
            (3, "rd"),
            (4, "th"),
            (11, "th"),
            (12, "th"),
            (13, "th"),
            (21, "st"),
            (22, "nd"),
            (23, "rd"),
            (111, "th"),
            (101, "st"),
        ];
        for (n, suffix) in cases {
            assert_eq!(ordinal_suffix(n), suffix, "n={n}");
        }
    }

    #[test]
    fn missing_standings_render_as_na() {
        assert_eq!(format_position(None), "N/A");
        assert_eq!(format_position(Some(3)), "3rd");
        assert_eq!(or_na(None), "N/A");
        assert_eq!(or_na(Some(0)), "0");
    }

    #[test]
    fn country_tags_fall_back_to_int() {
        assert_eq!(country_tag("England"), "ENG");
        assert_eq!(country_tag(" spain "), "ESP");
        assert_eq!(country_tag("Portugal"), "INT");
    }

    #[test]
    fn points_use_one_decimal() {
        assert_eq!(format_points(61.26), "61.3");
        assert_eq!(format_delta(2.04), "2.0");
        assert_eq!(format_delta(-0.55), "-0.6");
        assert_eq!(format_save_pct(Some(71.234)), "71.2%");
        assert_eq!(format_save_pct(None), "N/A");
    }
}
