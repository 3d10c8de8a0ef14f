//! Project labels and role flags for agent/editor session processes.

use regex::Regex;

use crate::config::{SourcesConfig, ThresholdsConfig};
use crate::system::process::ProcessRecord;
use crate::system::snapshot::SessionDetail;

pub const HOME_LABEL: &str = "home";

#[derive(Debug, Clone)]
pub struct SessionRules {
    min_mb: u64,
    primary_min_mb: u64,
    members: Regex,
    family_name: String,
    ignored_segments: Vec<String>,
}

impl SessionRules {
    /// `members` selects the family's processes; the subordinate check only
    /// looks for the literal `session_family` name.
    pub fn new(
        thresholds: &ThresholdsConfig,
        sources: &SourcesConfig,
        members: Regex,
        username: Option<String>,
    ) -> Self {
        let mut ignored_segments = sources.ignored_path_segments.clone();
        ignored_segments.extend(username);
        SessionRules {
            min_mb: thresholds.session_min_mb,
            primary_min_mb: thresholds.session_primary_min_mb,
            members,
            family_name: sources.session_family.clone(),
            ignored_segments,
        }
    }

    pub fn is_family(&self, record: &ProcessRecord) -> bool {
        self.members.is_match(&record.command)
    }

    /// Family members at or above the memory floor; the only ones worth a
    /// working-directory lookup.
    pub fn candidates<'a>(&self, records: &'a [ProcessRecord]) -> Vec<&'a ProcessRecord> {
        records
            .iter()
            .filter(|r| self.is_family(r) && r.memory_mb >= self.min_mb)
            .collect()
    }

    /// Last informative path segment, or [`HOME_LABEL`].
    pub fn project_label(&self, working_directory: &str) -> String {
        working_directory
            .split('/')
            .filter(|seg| !seg.is_empty())
            .filter(|seg| !self.ignored_segments.iter().any(|ignored| ignored == seg))
            .last()
            .unwrap_or(HOME_LABEL)
            .to_string()
    }

    /// Small and still carrying the family name verbatim: probably a helper.
    /// Best effort. The desktop app binary (`Claude`) does not match `claude`.
    pub fn is_subordinate(&self, record: &ProcessRecord) -> bool {
        record.memory_mb < self.primary_min_mb && record.command.contains(&self.family_name)
    }

    pub fn detail(&self, record: &ProcessRecord, working_directory: String) -> SessionDetail {
        SessionDetail {
            project_label: self.project_label(&working_directory),
            working_directory,
            memory_mb: record.memory_mb,
            process_id: record.pid,
            is_subordinate: self.is_subordinate(record),
        }
    }
}

pub fn sort_sessions(sessions: &mut [SessionDetail]) {
    sessions.sort_by(|a, b| b.memory_mb.cmp(&a.memory_mb));
}
