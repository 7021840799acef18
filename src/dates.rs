// Candidate dates offered by the date dropdowns.
use chrono::{Duration, NaiveDate};

/// Key format used both in the dropdowns and in the persisted document,
/// e.g. "Mon 03 June 2024".
pub const DATE_FORMAT: &str = "%a %d %B %Y";

const WINDOW_DAYS: i64 = 10;

/// Rolling window of candidate date strings around `reference`: five days
/// before through four days after. Takes the reference date explicitly so
/// the window is reproducible in tests.
pub fn date_window(reference: NaiveDate) -> Vec<String> {
    let start = reference - Duration::days(5);
    (0..WINDOW_DAYS)
        .map(|i| (start + Duration::days(i)).format(DATE_FORMAT).to_string())
        .collect()
}
