use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationGroup {
    pub name: String,
    #[serde(rename = "totalMemoryMB")]
    pub total_memory_mb: u64,
    pub process_count: u32,
    pub display_color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptProcessDetail {
    pub label: String,
    #[serde(rename = "memoryMB")]
    pub memory_mb: u64,
    pub process_id: u32,
}

/// `is_subordinate` is a size-and-name heuristic, not an OS parent/child fact.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDetail {
    pub working_directory: String,
    pub project_label: String,
    #[serde(rename = "memoryMB")]
    pub memory_mb: u64,
    pub process_id: u32,
    pub is_subordinate: bool,
}

/// Memory is an even share of the editor helpers' total, so shares across
/// windows need not add up to the aggregate.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceDetail {
    pub path: String,
    #[serde(rename = "memoryMB")]
    pub memory_mb: u64,
    pub process_count: u32,
}

/// Memory is matched to the tab by position only. `estimated` marks values
/// that came from the fallback range instead of a renderer process.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabDetail {
    pub title: String,
    pub url: String,
    #[serde(rename = "memoryMB")]
    pub memory_mb: u64,
    pub estimated: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSnapshot {
    #[serde(rename = "totalMemoryGB")]
    pub total_memory_gb: f64,
    #[serde(rename = "usedMemoryGB")]
    pub used_memory_gb: f64,
    #[serde(rename = "freeMemoryGB")]
    pub free_memory_gb: f64,
    pub application_groups: Vec<ApplicationGroup>,
    pub tabs: Vec<TabDetail>,
    pub scripts: Vec<ScriptProcessDetail>,
    pub sessions: Vec<SessionDetail>,
    pub workspaces: Vec<WorkspaceDetail>,
    pub sampled_at: DateTime<Utc>,
}
