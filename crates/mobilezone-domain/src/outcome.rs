//! Outcome module - lifecycle of a remote search attempt

use crate::phone::PhoneRecord;
use serde::{Deserialize, Serialize};

/// Title used for a citation the provider left untitled
pub const DEFAULT_CITATION_TITLE: &str = "Source";

/// A source the remote search grounded its answer on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// Display title
    pub title: String,

    /// Source URI, carried without validation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl Citation {
    /// Build a citation, falling back to the default title
    pub fn new(title: Option<String>, uri: Option<String>) -> Self {
        let title = title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CITATION_TITLE.to_string());
        Self { title, uri }
    }
}

/// Payload of a settled search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchReport {
    /// Free-text market summary, or the user-facing error message
    pub summary: String,

    /// Sources backing the summary
    pub citations: Vec<Citation>,

    /// Normalized listings found by the search
    pub phones: Vec<PhoneRecord>,

    /// Whether this report is an error placeholder
    pub failed: bool,
}

impl SearchReport {
    /// A successful report
    pub fn found(
        summary: impl Into<String>,
        citations: Vec<Citation>,
        phones: Vec<PhoneRecord>,
    ) -> Self {
        Self {
            summary: summary.into(),
            citations,
            phones,
            failed: false,
        }
    }

    /// An error placeholder: no phones, no citations, a user-safe message
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            summary: message.into(),
            citations: Vec::new(),
            phones: Vec::new(),
            failed: true,
        }
    }
}

/// Tri-phase state of the remote search
///
/// Replaced wholesale on every submission; results never accumulate across
/// queries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum SearchOutcome {
    /// No query issued
    #[default]
    Idle,

    /// Request in flight
    Pending {
        /// Query being searched
        query: String,
    },

    /// Request finished, successfully or not
    Settled {
        /// Query that was searched
        query: String,
        /// Result payload
        report: SearchReport,
    },
}

impl SearchOutcome {
    /// Whether a request is in flight
    pub fn is_pending(&self) -> bool {
        matches!(self, SearchOutcome::Pending { .. })
    }

    /// Whether the outcome is settled
    pub fn is_settled(&self) -> bool {
        matches!(self, SearchOutcome::Settled { .. })
    }

    /// The settled report, if any
    pub fn report(&self) -> Option<&SearchReport> {
        match self {
            SearchOutcome::Settled { report, .. } => Some(report),
            _ => None,
        }
    }

    /// The query this outcome belongs to, if any
    pub fn query(&self) -> Option<&str> {
        match self {
            SearchOutcome::Idle => None,
            SearchOutcome::Pending { query } | SearchOutcome::Settled { query, .. } => {
                Some(query)
            }
        }
    }

    /// Phones of the settled report, empty otherwise
    pub fn phones(&self) -> &[PhoneRecord] {
        self.report().map(|r| r.phones.as_slice()).unwrap_or(&[])
    }
}
