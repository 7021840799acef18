//! Persistence for registered workouts: one JSON document mapping a date
//! string to the activities and durations logged for that day. Every
//! operation loads the whole document, mutates it in memory and rewrites
//! the file in full.

use crate::activity::Activity;
use crate::rows::EntryRow;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Default document name, created next to the executable's working directory.
pub const DATA_FILE: &str = "saved_data.json";

/// Aligned per-day lists: `activities[i]` was performed for `durations[i]`
/// minutes. Field names match the on-disk document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    #[serde(rename = "activity")]
    pub activities: Vec<String>,
    #[serde(rename = "unit")]
    pub durations: Vec<f64>,
}

impl DayRecord {
    fn push(&mut self, activity: Activity, minutes: f64) {
        self.activities.push(activity.title().to_string());
        self.durations.push(minutes);
    }
}

/// The full persisted mapping of date key to [`DayRecord`].
pub type SavedData = BTreeMap<String, DayRecord>;

#[derive(Debug)]
pub enum StoreError {
    /// The duration text of some row is not a positive number.
    InvalidDuration(String),
    /// A row still shows the date or workout placeholder.
    IncompleteRow,
    /// View or erase was requested but the document is empty or unreadable.
    NoSavedData,
    /// Erase-day was given a key that is not in the document.
    DateNotFound(String),
    Io(std::io::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::InvalidDuration(text) => {
                write!(f, "Invalid duration entered: {text:?}")
            }
            StoreError::IncompleteRow => {
                write!(f, "Choose a date and a workout for every entry")
            }
            StoreError::NoSavedData => write!(f, "No saved data found"),
            StoreError::DateNotFound(date) => {
                write!(f, "Date not found in saved data: {date}")
            }
            StoreError::Io(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

/// One row parsed and ready to be confirmed: the placeholder selections are
/// resolved and the duration text converted to minutes.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEntry {
    pub date: String,
    pub activity: Activity,
    pub minutes: f64,
}

impl PendingEntry {
    pub fn from_row(row: &EntryRow) -> Result<Self, StoreError> {
        let date = row.date.clone().ok_or(StoreError::IncompleteRow)?;
        let activity = row.activity.ok_or(StoreError::IncompleteRow)?;
        let minutes = parse_duration(&row.duration_text)?;
        Ok(Self {
            date,
            activity,
            minutes,
        })
    }

    /// Text shown in the save-this-activity confirmation dialog.
    pub fn describe(&self) -> String {
        format!(
            "{}: {} for {} minutes. Save this activity?",
            self.date, self.activity, self.minutes
        )
    }
}

fn parse_duration(text: &str) -> Result<f64, StoreError> {
    match text.trim().parse::<f64>() {
        Ok(minutes) if minutes > 0.0 && minutes.is_finite() => Ok(minutes),
        _ => Err(StoreError::InvalidDuration(text.to_string())),
    }
}

/// Rendered listing for one saved day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayReport {
    pub date: String,
    pub lines: Vec<String>,
}

/// Handle to the JSON document on disk.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document. A missing or corrupt file reads as an empty map;
    /// only an explicit view/erase turns that into [`StoreError::NoSavedData`].
    pub fn load(&self) -> SavedData {
        match std::fs::read_to_string(&self.path) {
            Ok(data) => serde_json::from_str(&data).unwrap_or_default(),
            Err(_) => SavedData::default(),
        }
    }

    fn save(&self, data: &SavedData) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(data)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    /// Parse and confirm each row in order, then rewrite the merged document
    /// once. An unparsable duration aborts the whole call before any write,
    /// even when earlier rows were already confirmed. Declining the
    /// confirmation skips that row. Returns how many entries were merged.
    pub fn register_entries<F>(
        &self,
        rows: &[EntryRow],
        mut confirm: F,
    ) -> Result<usize, StoreError>
    where
        F: FnMut(&PendingEntry) -> bool,
    {
        let mut confirmed = Vec::new();
        for row in rows {
            let entry = PendingEntry::from_row(row)?;
            if confirm(&entry) {
                confirmed.push(entry);
            }
        }
        self.commit(&confirmed)?;
        Ok(confirmed.len())
    }

    /// Merge already-confirmed entries into the document and rewrite it.
    /// Existing date keys get their lists appended to; new keys start with
    /// single-element lists.
    pub fn commit(&self, entries: &[PendingEntry]) -> Result<(), StoreError> {
        let mut data = self.load();
        for entry in entries {
            data.entry(entry.date.clone())
                .or_default()
                .push(entry.activity, entry.minutes);
        }
        self.save(&data)?;
        log::info!(
            "Registered {} entries to {}",
            entries.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Reset the document to `{}`.
    pub fn erase_all(&self) -> Result<(), StoreError> {
        self.save(&SavedData::default())
    }

    /// Remove one date key and rewrite the document.
    pub fn erase_day(&self, date: &str) -> Result<(), StoreError> {
        let mut data = self.load();
        if data.is_empty() {
            return Err(StoreError::NoSavedData);
        }
        if data.remove(date).is_none() {
            return Err(StoreError::DateNotFound(date.to_string()));
        }
        self.save(&data)
    }

    /// Date keys currently in the document, for the erase-day prompt.
    pub fn saved_dates(&self) -> Result<Vec<String>, StoreError> {
        let data = self.load();
        if data.is_empty() {
            return Err(StoreError::NoSavedData);
        }
        Ok(data.keys().cloned().collect())
    }

    /// Human-readable listing of everything saved, grouped by date.
    pub fn render_all(&self) -> Result<Vec<DayReport>, StoreError> {
        let data = self.load();
        if data.is_empty() {
            return Err(StoreError::NoSavedData);
        }
        Ok(data
            .iter()
            .map(|(date, record)| DayReport {
                date: date.clone(),
                lines: record
                    .activities
                    .iter()
                    .zip(&record.durations)
                    .map(|(activity, minutes)| {
                        // Stored labels are title form; unknown labels from a
                        // hand-edited file still render, just lowercased.
                        let label = Activity::parse(activity)
                            .map(|a| a.lowercase().to_string())
                            .unwrap_or_else(|| activity.to_lowercase());
                        format!("On {date} you did {label} for {minutes} minutes.")
                    })
                    .collect(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn row(date: &str, activity: Activity, duration: &str) -> EntryRow {
        EntryRow {
            date: Some(date.to_string()),
            activity: Some(activity),
            duration_text: duration.to_string(),
        }
    }

    fn store_in(dir: &tempfile::TempDir) -> Store {
        Store::new(dir.path().join(DATA_FILE))
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let dir = tempdir().unwrap();
        assert!(store_in(&dir).load().is_empty());
    }

    #[test]
    fn corrupt_file_loads_as_empty() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "{not json").unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn confirmed_entry_round_trips() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let merged = store
            .register_entries(&[row("Mon 03 June 2024", Activity::Running, "30")], |_| true)
            .unwrap();
        assert_eq!(merged, 1);

        let data = store.load();
        let record = &data["Mon 03 June 2024"];
        assert_eq!(record.activities, vec!["Running"]);
        assert_eq!(record.durations, vec![30.0]);
    }

    #[test]
    fn document_uses_activity_and_unit_field_names() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store
            .register_entries(&[row("Mon 03 June 2024", Activity::Running, "30")], |_| true)
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["Mon 03 June 2024"]["activity"][0], "Running");
        assert_eq!(raw["Mon 03 June 2024"]["unit"][0], 30.0);
    }

    #[test]
    fn same_day_entries_append_to_aligned_lists() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store
            .register_entries(
                &[
                    row("Tue 04 June 2024", Activity::Cycling, "20"),
                    row("Tue 04 June 2024", Activity::Walking, "15.5"),
                ],
                |_| true,
            )
            .unwrap();

        let data = store.load();
        let record = &data["Tue 04 June 2024"];
        assert_eq!(record.activities, vec!["Cycling", "Walking"]);
        assert_eq!(record.durations, vec![20.0, 15.5]);
    }

    #[test]
    fn declined_confirmations_are_absent() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let merged = store
            .register_entries(
                &[
                    row("Tue 04 June 2024", Activity::Cycling, "20"),
                    row("Wed 05 June 2024", Activity::Swimming, "40"),
                ],
                |entry| entry.activity == Activity::Swimming,
            )
            .unwrap();
        assert_eq!(merged, 1);

        let data = store.load();
        assert!(!data.contains_key("Tue 04 June 2024"));
        assert_eq!(data["Wed 05 June 2024"].activities, vec!["Swimming"]);
    }

    #[test]
    fn invalid_duration_aborts_without_writing() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store
            .register_entries(&[row("Mon 03 June 2024", Activity::Running, "30")], |_| true)
            .unwrap();
        let before = store.load();

        let mut confirms = 0;
        let err = store
            .register_entries(
                &[
                    row("Tue 04 June 2024", Activity::Cycling, "20"),
                    row("Tue 04 June 2024", Activity::Walking, "abc"),
                ],
                |_| {
                    confirms += 1;
                    true
                },
            )
            .unwrap_err();

        match err {
            StoreError::InvalidDuration(text) => assert_eq!(text, "abc"),
            e => panic!("unexpected error: {e:?}"),
        }
        // The first row was confirmed before the bad one was hit, but the
        // abort still leaves the document untouched.
        assert_eq!(confirms, 1);
        assert_eq!(store.load(), before);
    }

    #[test]
    fn zero_and_negative_durations_are_invalid() {
        for bad in ["0", "-5", ""] {
            let err = parse_duration(bad).unwrap_err();
            assert!(matches!(err, StoreError::InvalidDuration(_)), "{bad:?}");
        }
        assert_eq!(parse_duration(" 12.5 ").unwrap(), 12.5);
    }

    #[test]
    fn placeholder_row_is_rejected() {
        let err = PendingEntry::from_row(&EntryRow {
            date: None,
            activity: Some(Activity::Running),
            duration_text: "30".into(),
        })
        .unwrap_err();
        assert!(matches!(err, StoreError::IncompleteRow));
    }

    #[test]
    fn erase_all_resets_to_empty() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store
            .register_entries(&[row("Mon 03 June 2024", Activity::Running, "30")], |_| true)
            .unwrap();

        store.erase_all().unwrap();
        assert!(store.load().is_empty());
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "{}");
    }

    #[test]
    fn erase_day_removes_only_that_key() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store
            .register_entries(
                &[
                    row("Mon 03 June 2024", Activity::Running, "30"),
                    row("Tue 04 June 2024", Activity::Cycling, "20"),
                ],
                |_| true,
            )
            .unwrap();

        store.erase_day("Mon 03 June 2024").unwrap();
        let data = store.load();
        assert!(!data.contains_key("Mon 03 June 2024"));
        assert!(data.contains_key("Tue 04 June 2024"));
    }

    #[test]
    fn erase_day_unknown_key_leaves_document_unchanged() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store
            .register_entries(&[row("Mon 03 June 2024", Activity::Running, "30")], |_| true)
            .unwrap();
        let before = store.load();

        let err = store.erase_day("Fri 07 June 2024").unwrap_err();
        match err {
            StoreError::DateNotFound(date) => assert_eq!(date, "Fri 07 June 2024"),
            e => panic!("unexpected error: {e:?}"),
        }
        assert_eq!(store.load(), before);
    }

    #[test]
    fn erase_day_on_empty_store_is_no_saved_data() {
        let dir = tempdir().unwrap();
        let err = store_in(&dir).erase_day("Mon 03 June 2024").unwrap_err();
        assert!(matches!(err, StoreError::NoSavedData));
    }

    #[test]
    fn render_all_groups_lines_by_date() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store
            .register_entries(
                &[
                    row("Mon 03 June 2024", Activity::Running, "30"),
                    row("Mon 03 June 2024", Activity::Swimming, "45.5"),
                ],
                |_| true,
            )
            .unwrap();

        let reports = store.render_all().unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].date, "Mon 03 June 2024");
        assert_eq!(
            reports[0].lines,
            vec![
                "On Mon 03 June 2024 you did running for 30 minutes.",
                "On Mon 03 June 2024 you did swimming for 45.5 minutes.",
            ]
        );
    }

    #[test]
    fn render_all_on_empty_store_is_no_saved_data() {
        let dir = tempdir().unwrap();
        let err = store_in(&dir).render_all().unwrap_err();
        assert!(matches!(err, StoreError::NoSavedData));
    }

    #[test]
    fn saved_dates_lists_keys() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store
            .register_entries(
                &[
                    row("Mon 03 June 2024", Activity::Running, "30"),
                    row("Tue 04 June 2024", Activity::Cycling, "20"),
                ],
                |_| true,
            )
            .unwrap();

        let dates = store.saved_dates().unwrap();
        assert_eq!(dates.len(), 2);
        assert!(dates.contains(&"Mon 03 June 2024".to_string()));
    }
}
