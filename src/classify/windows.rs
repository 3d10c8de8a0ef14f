//! Spreads editor helper memory across enumerated editor windows.

use std::sync::LazyLock;

use regex::Regex;

use crate::system::snapshot::WorkspaceDetail;

pub const AGGREGATE_LABEL: &str = "All windows";

// "main.rs — memscope" -> "memscope"; the label is whatever follows the last dash.
static TITLE_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[—–]\s*([^—–]+?)\s*$").expect("title pattern is valid"));

pub fn workspace_label(title: &str) -> String {
    TITLE_PATH
        .captures(title)
        .map(|caps| caps[1].to_string())
        .unwrap_or_else(|| title.to_string())
}

/// `titles` is `None` when window enumeration failed. Each window gets an
/// independently rounded even share, so the shares may not sum to the totals.
pub fn distribute(
    total_mb: u64,
    process_count: u32,
    titles: Option<&[String]>,
) -> Vec<WorkspaceDetail> {
    let aggregate = || WorkspaceDetail {
        path: AGGREGATE_LABEL.to_string(),
        memory_mb: total_mb,
        process_count,
    };

    let titles = match titles {
        None => return vec![aggregate()],
        Some([]) if process_count > 0 => return vec![aggregate()],
        Some([]) => return Vec::new(),
        Some(titles) => titles,
    };

    let n = titles.len() as f64;
    let memory_share = (total_mb as f64 / n).round() as u64;
    let count_share = (process_count as f64 / n).round() as u32;

    let mut workspaces: Vec<WorkspaceDetail> = titles
        .iter()
        .map(|title| WorkspaceDetail {
            path: workspace_label(title),
            memory_mb: memory_share,
            process_count: count_share,
        })
        .collect();
    workspaces.sort_by(|a, b| b.memory_mb.cmp(&a.memory_mb));
    workspaces
}
