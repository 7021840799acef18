use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed set of workout types the form offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activity {
    Aerobics,
    Cycling,
    Running,
    Swimming,
    Walking,
}

impl Activity {
    pub const ALL: [Activity; 5] = [
        Activity::Aerobics,
        Activity::Cycling,
        Activity::Running,
        Activity::Swimming,
        Activity::Walking,
    ];

    /// Title-form label, the form stored in the JSON document.
    pub fn title(self) -> &'static str {
        match self {
            Activity::Aerobics => "Aerobics",
            Activity::Cycling => "Cycling",
            Activity::Running => "Running",
            Activity::Swimming => "Swimming",
            Activity::Walking => "Walking",
        }
    }

    /// Lowercase label used in the saved-data listing.
    pub fn lowercase(self) -> &'static str {
        match self {
            Activity::Aerobics => "aerobics",
            Activity::Cycling => "cycling",
            Activity::Running => "running",
            Activity::Swimming => "swimming",
            Activity::Walking => "walking",
        }
    }

    /// Case-insensitive lookup, so "running" and "RUNNING" both resolve.
    pub fn parse(s: &str) -> Option<Activity> {
        Activity::ALL
            .into_iter()
            .find(|a| a.title().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}
