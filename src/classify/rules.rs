//! Ordered command-line classification into application groups.

use regex::{Regex, RegexBuilder};

use crate::config::GroupRuleConfig;
use crate::system::process::ProcessRecord;
use crate::system::snapshot::ApplicationGroup;

/// `(label, pattern, exclude, color)`; evaluated top to bottom.
const BUILTIN_RULES: &[(&str, &str, Option<&str>, &str)] = &[
    ("Chrome", r"google chrome", None, "#4285f4"),
    ("Safari", r"safari\.app|com\.apple\.webkit", None, "#1e90ff"),
    ("VS Code", r"visual studio code|code helper", None, "#007acc"),
    ("Claude", r"\bclaude\b", None, "#d97757"),
    ("Python", r"python", None, "#ffd43b"),
    (
        "Node.js",
        r"\bnode\b",
        Some(r"\bclaude\b|visual studio code|code helper"),
        "#68a063",
    ),
    ("Docker", r"docker|com\.docker", None, "#2496ed"),
    ("Slack", r"slack", None, "#4a154b"),
    ("Terminal", r"iterm|terminal\.app|\btmux\b", None, "#6e6e73"),
];

#[derive(Debug, Clone)]
pub struct GroupRule {
    pub label: String,
    pub color: String,
    pattern: Regex,
    exclude: Option<Regex>,
}

impl GroupRule {
    pub fn new(
        label: &str,
        pattern: &str,
        exclude: Option<&str>,
        color: &str,
    ) -> Result<Self, regex::Error> {
        let exclude = match exclude {
            Some(p) => Some(case_insensitive(p)?),
            None => None,
        };
        Ok(GroupRule {
            label: label.to_string(),
            color: color.to_string(),
            pattern: case_insensitive(pattern)?,
            exclude,
        })
    }

    /// Pattern matches and the exclusion, if any, does not.
    pub fn matches(&self, command: &str) -> bool {
        self.pattern.is_match(command)
            && !self.exclude.as_ref().is_some_and(|ex| ex.is_match(command))
    }
}

fn case_insensitive(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<GroupRule>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Classifier {
    pub fn new(rules: Vec<GroupRule>) -> Self {
        Classifier { rules }
    }

    pub fn builtin() -> Self {
        let rules = BUILTIN_RULES
            .iter()
            .filter_map(|&(label, pattern, exclude, color)| {
                GroupRule::new(label, pattern, exclude, color).ok()
            })
            .collect();
        Classifier { rules }
    }

    /// Builds rules from config, skipping entries whose regex does not compile.
    pub fn from_config(entries: &[GroupRuleConfig]) -> Self {
        let mut rules = Vec::with_capacity(entries.len());
        for entry in entries {
            match GroupRule::new(
                &entry.label,
                &entry.pattern,
                entry.exclude.as_deref(),
                &entry.color,
            ) {
                Ok(rule) => rules.push(rule),
                Err(err) => {
                    tracing::warn!(label = %entry.label, error = %err, "skipping invalid group rule");
                }
            }
        }
        Classifier { rules }
    }

    pub fn rules(&self) -> &[GroupRule] {
        &self.rules
    }

    /// Index of the first rule that owns `command`.
    pub fn classify(&self, command: &str) -> Option<usize> {
        self.rules.iter().position(|rule| rule.matches(command))
    }

    /// Sums memory and counts per group. Unclassified records are dropped and
    /// groups with no members are absent. Sorted by memory, descending.
    pub fn tally(&self, records: &[ProcessRecord]) -> Vec<ApplicationGroup> {
        let mut totals = vec![(0u64, 0u32); self.rules.len()];
        for record in records {
            if let Some(idx) = self.classify(&record.command) {
                totals[idx].0 += record.memory_mb;
                totals[idx].1 += 1;
            }
        }

        let mut groups: Vec<ApplicationGroup> = self
            .rules
            .iter()
            .zip(totals)
            .filter(|(_, (_, count))| *count > 0)
            .map(|(rule, (memory_mb, process_count))| ApplicationGroup {
                name: rule.label.clone(),
                total_memory_mb: memory_mb,
                process_count,
                display_color: rule.color.clone(),
            })
            .collect();
        groups.sort_by(|a, b| b.total_memory_mb.cmp(&a.total_memory_mb));
        groups
    }
}
