use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Upper bound for any minutes value, roughly a full league season.
pub const MAX_MINUTES: u32 = 4000;

/// Player name -> minutes handed over to the incoming player.
pub type OutgoingAllocation = BTreeMap<String, u32>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingEntry {
    #[serde(rename = "playerName")]
    pub player_name: String,
    pub minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MinutesError {
    #[error("Enter projected minutes for the incoming player.")]
    IncomingMissing,
    #[error("Incoming minutes must be a whole number, got \"{0}\".")]
    IncomingNotNumber(String),
    #[error("Incoming minutes must be between 0 and 4000, got {0}.")]
    IncomingOutOfRange(i64),
    #[error("Outgoing entry \"{0}\" has no player name.")]
    MissingName(String),
    #[error("Enter minutes for {0}.")]
    MinutesMissing(String),
    #[error("Outgoing minutes for {name} must be a whole number, got \"{raw}\".")]
    MinutesNotNumber { name: String, raw: String },
    #[error("Outgoing minutes for {name} must be between 0 and 4000, got {minutes}.")]
    MinutesOutOfRange { name: String, minutes: i64 },
    #[error("Outgoing minutes must be a list or Name:Minutes pairs.")]
    UnrecognizedFormat,
    #[error("Total outgoing minutes do not match player minutes. Please check your selections.")]
    Unbalanced { incoming: u32, outgoing: u64 },
}

/// Minutes that passed validation and can go into a prediction request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedMinutes {
    pub projected_minutes_in: u32,
    pub outgoing: Option<OutgoingAllocation>,
}

pub fn parse_incoming_minutes(text: &str) -> Result<u32, MinutesError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(MinutesError::IncomingMissing);
    }
    let value = trimmed
        .parse::<i64>()
        .map_err(|_| MinutesError::IncomingNotNumber(trimmed.to_string()))?;
    in_range(value).ok_or(MinutesError::IncomingOutOfRange(value))
}

/// Parses an outgoing allocation typed or pasted as text.
///
/// Accepts a JSON array of `{"playerName": .., "minutes": ..}` objects or
/// `"Name:Minutes, Name2:Minutes"`. Blank text and lists that end up empty
/// yield `None`. Repeated names add up.
pub fn parse_outgoing(text: &str) -> Result<Option<OutgoingAllocation>, MinutesError> {
    Ok(collect_allocation(parse_outgoing_entries(text)?))
}

/// Same rules as [`parse_outgoing`], keeping the rows in input order.
pub fn parse_outgoing_entries(text: &str) -> Result<Vec<OutgoingEntry>, MinutesError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Array(items)) => parse_structured(&items),
        Ok(_) => Err(MinutesError::UnrecognizedFormat),
        Err(_) if trimmed.contains(':') => parse_pairs(trimmed),
        Err(_) => Err(MinutesError::UnrecognizedFormat),
    }
}

/// Fails unless the allocation (0 when absent) sums to `incoming`.
pub fn validate_balance(
    incoming: u32,
    allocation: Option<&OutgoingAllocation>,
) -> Result<(), MinutesError> {
    let outgoing = allocation_total(allocation);
    if outgoing != u64::from(incoming) {
        return Err(MinutesError::Unbalanced { incoming, outgoing });
    }
    Ok(())
}

pub fn allocation_total(allocation: Option<&OutgoingAllocation>) -> u64 {
    allocation
        .map(|a| a.values().map(|m| u64::from(*m)).sum())
        .unwrap_or(0)
}

/// Validates free-text incoming and outgoing fields together.
pub fn validate_text(incoming: &str, outgoing: &str) -> Result<ValidatedMinutes, MinutesError> {
    let projected_minutes_in = parse_incoming_minutes(incoming)?;
    let outgoing = parse_outgoing(outgoing)?;
    validate_balance(projected_minutes_in, outgoing.as_ref())?;
    Ok(ValidatedMinutes {
        projected_minutes_in,
        outgoing,
    })
}

fn parse_structured(items: &[Value]) -> Result<Vec<OutgoingEntry>, MinutesError> {
    let mut entries = Vec::with_capacity(items.len());
    for item in items {
        let name = item
            .get("playerName")
            .or_else(|| item.get("name"))
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default();
        if name.is_empty() {
            return Err(MinutesError::MissingName(item.to_string()));
        }
        let minutes = match item.get("minutes") {
            Some(Value::Number(n)) => match n.as_i64() {
                Some(v) => v,
                None => {
                    return Err(MinutesError::MinutesNotNumber {
                        name: name.to_string(),
                        raw: n.to_string(),
                    });
                }
            },
            Some(Value::Null) | None => {
                return Err(MinutesError::MinutesMissing(name.to_string()));
            }
            Some(other) => {
                return Err(MinutesError::MinutesNotNumber {
                    name: name.to_string(),
                    raw: other.to_string(),
                });
            }
        };
        let minutes = in_range(minutes).ok_or_else(|| MinutesError::MinutesOutOfRange {
            name: name.to_string(),
            minutes,
        })?;
        entries.push(OutgoingEntry {
            player_name: name.to_string(),
            minutes,
        });
    }
    Ok(entries)
}

fn parse_pairs(text: &str) -> Result<Vec<OutgoingEntry>, MinutesError> {
    let mut entries = Vec::new();
    for part in text.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (name, raw) = part.split_once(':').unwrap_or((part, ""));
        let name = name.trim();
        let raw = raw.trim();
        if name.is_empty() {
            return Err(MinutesError::MissingName(part.to_string()));
        }
        let minutes = parse_entry_minutes(name, raw)?;
        entries.push(OutgoingEntry {
            player_name: name.to_string(),
            minutes,
        });
    }
    Ok(entries)
}

fn parse_entry_minutes(name: &str, raw: &str) -> Result<u32, MinutesError> {
    if raw.is_empty() {
        return Err(MinutesError::MinutesMissing(name.to_string()));
    }
    let value = raw.parse::<i64>().map_err(|_| MinutesError::MinutesNotNumber {
        name: name.to_string(),
        raw: raw.to_string(),
    })?;
    in_range(value).ok_or_else(|| MinutesError::MinutesOutOfRange {
        name: name.to_string(),
        minutes: value,
    })
}

fn collect_allocation(entries: Vec<OutgoingEntry>) -> Option<OutgoingAllocation> {
    let mut allocation = OutgoingAllocation::new();
    for entry in entries {
        *allocation.entry(entry.player_name).or_insert(0) += entry.minutes;
    }
    if allocation.is_empty() {
        None
    } else {
        Some(allocation)
    }
}

fn in_range(value: i64) -> Option<u32> {
    if (0..=i64::from(MAX_MINUTES)).contains(&value) {
        u32::try_from(value).ok()
    } else {
        None
    }
}

/// The add/remove list behind the outgoing-minutes panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutgoingForm {
    pub entries: Vec<OutgoingEntry>,
}

impl OutgoingForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str, minutes: &str) -> Result<(), MinutesError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MinutesError::MissingName(format!(":{}", minutes.trim())));
        }
        let minutes = parse_entry_minutes(name, minutes.trim())?;
        self.entries.push(OutgoingEntry {
            player_name: name.to_string(),
            minutes,
        });
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Option<OutgoingEntry> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.minutes)).sum()
    }

    pub fn to_allocation(&self) -> Option<OutgoingAllocation> {
        collect_allocation(self.entries.clone())
    }

    /// Renders the list as `"Name:Minutes, Name2:Minutes"`.
    pub fn to_text(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("{}:{}", e.player_name, e.minutes))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Replaces the rows with a pasted list.
    ///
    /// The list is checked with the same rules as [`parse_outgoing`]; on error
    /// the current rows stay as they were.
    pub fn load_text(&mut self, text: &str) -> Result<(), MinutesError> {
        self.entries = parse_outgoing_entries(text)?;
        Ok(())
    }

    /// Re-checks every row, for rows that bypassed [`OutgoingForm::add`].
    pub fn check_rows(&self) -> Result<(), MinutesError> {
        for entry in &self.entries {
            let name = entry.player_name.trim();
            if name.is_empty() {
                return Err(MinutesError::MissingName(format!(":{}", entry.minutes)));
            }
            if entry.minutes > MAX_MINUTES {
                return Err(MinutesError::MinutesOutOfRange {
                    name: name.to_string(),
                    minutes: i64::from(entry.minutes),
                });
            }
        }
        Ok(())
    }
}

/// Incoming-minutes text, the outgoing list and the list's draft row.
#[derive(Debug, Clone, Default)]
pub struct MinutesForm {
    pub incoming: String,
    pub outgoing: OutgoingForm,
    pub draft_name: String,
    pub draft_minutes: String,
    /// Why the last pasted list was refused; blocks submit until resolved.
    pub rejected_paste: Option<MinutesError>,
}

impl MinutesForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Both draft fields hold something; mirrors the disabled "Add" button.
    pub fn can_add_draft(&self) -> bool {
        !self.draft_name.trim().is_empty() && !self.draft_minutes.trim().is_empty()
    }

    /// Moves the draft row into the list and clears the draft on success.
    pub fn add_draft(&mut self) -> Result<(), MinutesError> {
        self.outgoing.add(&self.draft_name, &self.draft_minutes)?;
        self.draft_name.clear();
        self.draft_minutes.clear();
        self.rejected_paste = None;
        Ok(())
    }

    /// Loads a pasted list into the outgoing rows, remembering a refusal.
    pub fn paste(&mut self, text: &str) -> Result<(), MinutesError> {
        match self.outgoing.load_text(text) {
            Ok(()) => {
                self.rejected_paste = None;
                Ok(())
            }
            Err(err) => {
                self.rejected_paste = Some(err.clone());
                Err(err)
            }
        }
    }

    pub fn build(&self) -> Result<ValidatedMinutes, MinutesError> {
        let projected_minutes_in = parse_incoming_minutes(&self.incoming)?;
        if let Some(err) = &self.rejected_paste {
            return Err(err.clone());
        }
        self.outgoing.check_rows()?;
        let outgoing = self.outgoing.to_allocation();
        validate_balance(projected_minutes_in, outgoing.as_ref())?;
        Ok(ValidatedMinutes {
            projected_minutes_in,
            outgoing,
        })
    }
}
