//! In-progress entry rows shown on the form, before anything is saved.

use crate::activity::Activity;
use std::fmt;

/// One unsaved input line. `None` selections render as the
/// "Choose a date" / "Choose a workout" placeholders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryRow {
    pub date: Option<String>,
    pub activity: Option<Activity>,
    pub duration_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowError {
    NoRowsToRemove,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowError::NoRowsToRemove => write!(f, "No more entries to delete"),
        }
    }
}

impl std::error::Error for RowError {}

/// Ordered collection of entry rows. The form always shows at least one row,
/// so the list is created with a single placeholder and refuses to shrink
/// below that.
#[derive(Debug)]
pub struct RowList {
    rows: Vec<EntryRow>,
}

impl Default for RowList {
    fn default() -> Self {
        Self::new()
    }
}

impl RowList {
    pub fn new() -> Self {
        Self {
            rows: vec![EntryRow::default()],
        }
    }

    /// Append a fresh placeholder row.
    pub fn add_row(&mut self) {
        self.rows.push(EntryRow::default());
    }

    /// Drop the most recently added row. Fails when only one row is left.
    pub fn remove_last_row(&mut self) -> Result<(), RowError> {
        if self.rows.len() > 1 {
            self.rows.pop();
            Ok(())
        } else {
            Err(RowError::NoRowsToRemove)
        }
    }

    pub fn rows(&self) -> &[EntryRow] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [EntryRow] {
        &mut self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}
