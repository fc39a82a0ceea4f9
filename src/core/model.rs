//! Result model
//!
//! Everything a command produces maps onto a [`Record`] before rendering, so
//! the text and jsonl outputs stay in sync.

use serde::Serialize;
use std::path::PathBuf;

use crate::core::error::ToolError;

/// A line that satisfied the search predicate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineMatch {
    /// 1-based line number
    pub line: u64,
    /// The line as read, original casing, without its terminator
    pub text: String,
}

impl LineMatch {
    pub fn new(line: u64, text: impl Into<String>) -> Self {
        Self {
            line,
            text: text.into(),
        }
    }
}

/// Outcome of a full search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchSummary {
    pub matches: u64,
    pub lines: u64,
    /// The scan stopped on a read error
    pub aborted: bool,
}

/// A directory entry selected by the extension filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub name: String,
    #[serde(skip)]
    pub path: PathBuf,
}

/// Per-file result of a move attempt
#[derive(Debug)]
pub enum MoveOutcome {
    Moved { name: String, to: PathBuf },
    Failed { name: String, error: ToolError },
}

impl MoveOutcome {
    pub fn is_moved(&self) -> bool {
        matches!(self, MoveOutcome::Moved { .. })
    }
}

/// Aggregate of a move batch
#[derive(Debug, Default)]
pub struct MoveSummary {
    pub outcomes: Vec<MoveOutcome>,
}

impl MoveSummary {
    pub fn push(&mut self, outcome: MoveOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn moved(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_moved()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.moved()
    }
}

/// One line of jsonl output
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Record<'a> {
    Match {
        line: u64,
        text: &'a str,
    },
    Entry {
        name: &'a str,
    },
    Moved {
        name: &'a str,
        to: String,
    },
    Failed {
        name: &'a str,
        code: &'static str,
        message: String,
    },
    Error {
        code: &'static str,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        path: Option<String>,
    },
    Summary {
        #[serde(skip_serializing_if = "Option::is_none")]
        matches: Option<u64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        found: Option<usize>,
        #[serde(skip_serializing_if = "Option::is_none")]
        moved: Option<usize>,
        #[serde(skip_serializing_if = "Option::is_none")]
        failed: Option<usize>,
    },
}

impl<'a> Record<'a> {
    pub fn from_match(m: &'a LineMatch) -> Self {
        Record::Match {
            line: m.line,
            text: &m.text,
        }
    }

    pub fn from_error(error: &ToolError) -> Self {
        Record::Error {
            code: error.code(),
            message: error.to_string(),
            path: error.path().map(|p| p.display().to_string()),
        }
    }

    pub fn from_outcome(outcome: &'a MoveOutcome) -> Self {
        match outcome {
            MoveOutcome::Moved { name, to } => Record::Moved {
                name: name.as_str(),
                to: to.display().to_string(),
            },
            MoveOutcome::Failed { name, error } => Record::Failed {
                name: name.as_str(),
                code: error.code(),
                message: error.to_string(),
            },
        }
    }

    pub fn search_summary(summary: &SearchSummary) -> Self {
        Record::Summary {
            matches: Some(summary.matches),
            found: None,
            moved: None,
            failed: None,
        }
    }

    pub fn list_summary(found: usize) -> Self {
        Record::Summary {
            matches: None,
            found: Some(found),
            moved: None,
            failed: None,
        }
    }

    pub fn move_summary(found: usize, summary: &MoveSummary) -> Self {
        Record::Summary {
            matches: None,
            found: Some(found),
            moved: Some(summary.moved()),
            failed: Some(summary.failed()),
        }
    }
}
