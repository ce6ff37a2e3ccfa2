// src/plan.rs
use std::collections::BTreeMap;
use std::fmt::Write as _;
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;
use tracing::warn;

const RECORD_SEP: char = ';';
const FIELD_SEP: char = '|';
const WEIGHT_SEP: char = ',';

/// The seven fixed weekday labels used as partition keys for the plan.
/// `Display` yields the accented label that is also the storage key;
/// parsing accepts accented and plain spellings, ignoring ASCII case.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Weekday {
    Lunes,
    Martes,
    #[strum(to_string = "Miércoles", serialize = "Miercoles")]
    Miercoles,
    Jueves,
    Viernes,
    #[strum(to_string = "Sábado", serialize = "Sabado")]
    Sabado,
    Domingo,
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Self::Lunes,
            chrono::Weekday::Tue => Self::Martes,
            chrono::Weekday::Wed => Self::Miercoles,
            chrono::Weekday::Thu => Self::Jueves,
            chrono::Weekday::Fri => Self::Viernes,
            chrono::Weekday::Sat => Self::Sabado,
            chrono::Weekday::Sun => Self::Domingo,
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum PlanError {
    #[error("Exercise '{0}' is already assigned to {1}")]
    AlreadyPresent(String, Weekday),
    #[error("Exercise '{0}' is not assigned to {1}")]
    ExerciseNotFound(String, Weekday),
}

#[derive(Error, Debug)]
enum RecordError {
    #[error("expected at least 3 '|'-separated fields, found {0}")]
    MissingFields(usize),
    #[error("invalid weight value '{0}'")]
    InvalidWeight(String),
}

/// An exercise assigned to a day, carrying its recorded weights. The weight
/// vector starts zeroed and grows when a slot beyond its length is written.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanEntry {
    pub name: String,
    pub description: String,
    pub weights: Vec<f64>,
}

impl PlanEntry {
    pub fn new(name: impl Into<String>, description: impl Into<String>, slots: usize) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            weights: vec![0.0; slots],
        }
    }

    fn serialize(&self) -> String {
        let mut record = format!("{}{FIELD_SEP}{}{FIELD_SEP}", self.name, self.description);
        for (i, weight) in self.weights.iter().enumerate() {
            if i > 0 {
                record.push(WEIGHT_SEP);
            }
            let _ = write!(record, "{weight}");
        }
        record
    }

    fn parse(record: &str) -> Result<Self, RecordError> {
        let fields: Vec<&str> = record.split(FIELD_SEP).collect();
        if fields.len() < 3 {
            return Err(RecordError::MissingFields(fields.len()));
        }
        let weights = fields[2]
            .split(WEIGHT_SEP)
            .map(|w| {
                w.trim()
                    .parse::<f64>()
                    .map_err(|_| RecordError::InvalidWeight(w.to_string()))
            })
            .collect::<Result<Vec<f64>, _>>()?;
        Ok(Self {
            name: fields[0].to_string(),
            description: fields[1].to_string(),
            weights,
        })
    }
}

/// Per-weekday ordered lists of plan entries. Every day's list is kept
/// sorted by name ascending, and no name appears twice within one day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeeklyPlan {
    days: BTreeMap<Weekday, Vec<PlanEntry>>,
}

impl WeeklyPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry to the day's list and re-sorts it.
    /// # Errors
    /// Returns `PlanError::AlreadyPresent` if the day already holds an entry
    /// with the same name; the list is left unchanged.
    pub fn assign(&mut self, day: Weekday, entry: PlanEntry) -> Result<(), PlanError> {
        let entries = self.days.entry(day).or_default();
        if entries.iter().any(|e| e.name == entry.name) {
            return Err(PlanError::AlreadyPresent(entry.name, day));
        }
        entries.push(entry);
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(())
    }

    /// Writes one slot of an entry's weight vector, growing the vector and
    /// zero-filling any gap when the index is beyond the current length.
    /// # Errors
    /// Returns `PlanError::ExerciseNotFound` if the name is not on that day.
    pub fn set_weight(
        &mut self,
        day: Weekday,
        name: &str,
        slot: usize,
        value: f64,
    ) -> Result<(), PlanError> {
        let entry = self
            .days
            .entry(day)
            .or_default()
            .iter_mut()
            .find(|e| e.name == name)
            .ok_or_else(|| PlanError::ExerciseNotFound(name.to_string(), day))?;
        if slot >= entry.weights.len() {
            entry.weights.resize(slot + 1, 0.0);
        }
        entry.weights[slot] = value;
        Ok(())
    }

    /// Removes one entry from a day and returns it.
    /// # Errors
    /// Returns `PlanError::ExerciseNotFound` if the name is not on that day.
    pub fn unassign(&mut self, day: Weekday, name: &str) -> Result<PlanEntry, PlanError> {
        let entries = self.days.entry(day).or_default();
        let position = entries
            .iter()
            .position(|e| e.name == name)
            .ok_or_else(|| PlanError::ExerciseNotFound(name.to_string(), day))?;
        Ok(entries.remove(position))
    }

    /// Empties the day's list, returning how many entries were dropped.
    /// Callers are expected to confirm with the user first.
    pub fn clear_day(&mut self, day: Weekday) -> usize {
        self.days.entry(day).or_default().drain(..).count()
    }

    /// The day's entries, sorted by name ascending. Empty for untouched days.
    pub fn entries(&self, day: Weekday) -> &[PlanEntry] {
        self.days.get(&day).map_or(&[], Vec::as_slice)
    }

    /// Flat-string form of one day: `name|description|w0,w1,…` records
    /// joined by `;`.
    pub fn serialize_day(&self, day: Weekday) -> String {
        self.entries(day)
            .iter()
            .map(PlanEntry::serialize)
            .collect::<Vec<_>>()
            .join(&RECORD_SEP.to_string())
    }

    /// Parses one day's flat-string form. A record with missing fields or an
    /// unparseable weight is logged and dropped; its neighbors still load.
    /// The result is sorted by name ascending.
    pub fn deserialize_day(raw: &str) -> Vec<PlanEntry> {
        let mut entries: Vec<PlanEntry> = raw
            .split(RECORD_SEP)
            .filter(|record| !record.is_empty())
            .filter_map(|record| match PlanEntry::parse(record) {
                Ok(entry) => Some(entry),
                Err(err) => {
                    warn!("Skipping malformed plan record '{record}': {err}");
                    None
                }
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }

    /// Replaces the day's list with the entries parsed from `raw`.
    pub fn load_day(&mut self, day: Weekday, raw: &str) {
        self.days.insert(day, Self::deserialize_day(raw));
    }
}
