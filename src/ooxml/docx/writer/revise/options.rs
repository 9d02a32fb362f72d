//! Editing options.
//!
//! Options travel with a [`MutableDocument`](crate::ooxml::docx::writer::MutableDocument)
//! and can be loaded from YAML:
//!
//! ```rust
//! use docx_redline::ooxml::docx::writer::revise::{InteriorRunPolicy, ReviseOptions};
//!
//! let options = ReviseOptions::from_yaml_str(
//!     "author: Legal\ninitials: LG\ninterior_runs: keep_empty\n",
//! )?;
//! assert_eq!(options.author, "Legal");
//! assert_eq!(options.interior_runs, InteriorRunPolicy::KeepEmpty);
//! assert_eq!(options.date_format, "%Y-%m-%dT%H:%M:%S");
//! # Ok::<(), docx_redline::Error>(())
//! ```
use crate::common::error::{Error, Result};
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::fmt::Write as FmtWrite;

/// Timestamp layout used when the caller supplies no date: local time, no offset.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// What happens to runs lying strictly inside a cross-run range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteriorRunPolicy {
    /// Remove them; their text moves into the new run with the begin run's formatting.
    #[default]
    Drop,
    /// Keep them in place with their text cleared, so their formatting survives.
    KeepEmpty,
}

/// Defaults applied by the editing operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviseOptions {
    /// Author recorded when an operation is given none
    pub author: String,
    /// Comment initials recorded when an operation is given none
    pub initials: String,
    /// `strftime` layout for generated timestamps
    pub date_format: String,
    pub interior_runs: InteriorRunPolicy,
}

impl Default for ReviseOptions {
    fn default() -> Self {
        Self {
            author: "docx-redline".to_string(),
            initials: "DR".to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            interior_runs: InteriorRunPolicy::Drop,
        }
    }
}

impl ReviseOptions {
    /// Load options from a YAML document. Missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let options: Self =
            serde_saphyr::from_str(yaml).map_err(|e| Error::Config(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Reject date formats chrono cannot render.
    pub fn validate(&self) -> Result<()> {
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(Error::Config(format!(
                "invalid date_format: {:?}",
                self.date_format
            )));
        }
        Ok(())
    }

    /// The caller's date, or the current local time in `date_format`.
    pub fn resolve_date(&self, date: Option<&str>) -> String {
        match date {
            Some(d) => d.to_string(),
            None => self.now(),
        }
    }

    /// The caller's author, or the configured default.
    pub fn resolve_author(&self, author: Option<&str>) -> String {
        author.unwrap_or(&self.author).to_string()
    }

    fn now(&self) -> String {
        let now = chrono::Local::now();
        let mut out = String::with_capacity(19);
        if write!(out, "{}", now.format(&self.date_format)).is_err() {
            out.clear();
            out.push_str(&now.format(DEFAULT_DATE_FORMAT).to_string());
        }
        out
    }
}
