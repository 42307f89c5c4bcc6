//! Risk flag report artifact.

use crate::core::types::Severity;
use serde::{Deserialize, Serialize};

/// A discrete identified risk finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flag {
    pub id: String,
    pub title: String,
    pub severity: Severity,
    pub category: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagSummary {
    pub total_flags: u64,
    pub critical: u64,
    pub high: u64,
    pub medium: u64,
    pub low: u64,
}

impl FlagSummary {
    /// Declared count for one severity.
    pub fn count(&self, severity: Severity) -> u64 {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagReport {
    pub tool_name: String,
    pub flags: Vec<Flag>,
    pub summary: FlagSummary,
}

impl FlagReport {
    /// Flag ids in report order.
    pub fn flag_ids(&self) -> impl Iterator<Item = &str> {
        self.flags.iter().map(|f| f.id.as_str())
    }

    /// Flags of Critical or High severity.
    pub fn elevated(&self) -> impl Iterator<Item = &Flag> {
        self.flags.iter().filter(|f| f.severity.is_elevated())
    }
}
