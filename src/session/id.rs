use anyhow::{Context, Result};
use chrono::{NaiveDateTime, Timelike};
use std::fmt;
use std::str::FromStr;

/// Directory-name format for session folders
const DIR_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";
/// Human-readable label format shown in the browser
const LABEL_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// Identifies one recorded meeting by its capture timestamp
/// (local time, second resolution)
///
/// The identifier doubles as the session's directory name in the form
/// `YYYY-MM-DD_HH-MM-SS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(NaiveDateTime);

impl SessionId {
    /// Session id for a recording starting now
    pub fn now() -> Self {
        let now = chrono::Local::now().naive_local();
        // Second resolution: sub-second precision never survives the
        // directory name roundtrip
        Self(now.with_nanosecond(0).unwrap_or(now))
    }

    pub fn from_timestamp(timestamp: NaiveDateTime) -> Self {
        Self(timestamp.with_nanosecond(0).unwrap_or(timestamp))
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.0
    }

    /// Directory name, e.g. `2025-10-28_09-30-00`
    pub fn dir_name(&self) -> String {
        self.0.format(DIR_FORMAT).to_string()
    }

    /// Human-readable label, e.g. `28-10-2025 09:30:00`
    pub fn label(&self) -> String {
        self.0.format(LABEL_FORMAT).to_string()
    }
}

impl FromStr for SessionId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let timestamp = NaiveDateTime::parse_from_str(s, DIR_FORMAT)
            .with_context(|| format!("Invalid session directory name: {}", s))?;
        Ok(Self(timestamp))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dir_name())
    }
}
