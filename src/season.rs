pub const DEFAULT_LATEST_SEASON: &str = "2024-2025";
pub const DEFAULT_TARGET_SEASON: &str = "2025-2026";

/// Season label that follows `latest` ("2024-2025" -> "2025-2026").
///
/// A blank label is read as [`DEFAULT_LATEST_SEASON`]. Anything that does not
/// start with two dash-separated years yields [`DEFAULT_TARGET_SEASON`].
pub fn next_season(latest: &str) -> String {
    let latest = latest.trim();
    let latest = if latest.is_empty() {
        DEFAULT_LATEST_SEASON
    } else {
        latest
    };

    let mut parts = latest.split('-').map(str::trim);
    let start = parts.next().and_then(|s| s.parse::<i32>().ok());
    let end = parts.next().and_then(|s| s.parse::<i32>().ok());
    match (start, end) {
        (Some(_), Some(end)) => match end.checked_add(1) {
            Some(next) => format!("{end}-{next}"),
            None => DEFAULT_TARGET_SEASON.to_string(),
        },
        _ => DEFAULT_TARGET_SEASON.to_string(),
    }
}
