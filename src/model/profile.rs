//! Tool profile artifact.

use crate::core::types::GovernanceStatus;
use serde::{Deserialize, Serialize};

/// Normalized description of one AI tool in use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolProfile {
    pub tool_name: String,
    pub vendor: String,
    pub category: String,
    pub description: String,
    pub governance_status: GovernanceStatus,
    #[serde(default)]
    pub data_types_processed: Vec<String>,
    #[serde(default)]
    pub departments: Vec<String>,
    pub user_count: u64,
}
