use chrono::Utc;
use futures::future::join_all;
use regex::Regex;
use tracing::Instrument;

use super::memory::{MemoryTotals, memory_totals, parse_vm_stat};
use super::process::{ProcessRecord, parse_process_table};
use super::snapshot::{
    ScriptProcessDetail, SessionDetail, SystemSnapshot, TabDetail, WorkspaceDetail,
};
use super::source::SnapshotSource;
use crate::classify::rules::Classifier;
use crate::classify::scripts::ScriptIdentifier;
use crate::classify::sessions::{SessionRules, sort_sessions};
use crate::classify::tabs::{FallbackRange, correlate_tabs, sort_tabs};
use crate::classify::windows::distribute;
use crate::config::{Config, SourcesConfig};

/// Turns one pass over a [`SnapshotSource`] into a [`SystemSnapshot`].
pub struct Collector<S> {
    source: S,
    classifier: Classifier,
    scripts: ScriptIdentifier,
    sessions: SessionRules,
    interpreter: Regex,
    renderer: Regex,
    editor_helper: Regex,
    fallback: FallbackRange,
    page_size_bytes: u64,
}

impl<S: SnapshotSource> Collector<S> {
    pub fn new(source: S, config: &Config) -> Self {
        let username = dirs::home_dir()
            .and_then(|home| home.file_name().map(|n| n.to_string_lossy().into_owned()));
        Self::with_username(source, config, username)
    }

    /// A `[sources]` pattern that fails to compile is replaced by its default.
    pub fn with_username(source: S, config: &Config, username: Option<String>) -> Self {
        let classifier = match &config.groups {
            Some(groups) => Classifier::from_config(groups),
            None => Classifier::builtin(),
        };
        let thresholds = &config.thresholds;
        let sources = &config.sources;
        let defaults = SourcesConfig::default();
        let members = source_pattern(
            "session_pattern",
            &sources.session_pattern,
            &defaults.session_pattern,
        );
        Collector {
            source,
            classifier,
            scripts: ScriptIdentifier::new(thresholds, config.tools.as_deref()),
            sessions: SessionRules::new(thresholds, sources, members, username),
            interpreter: source_pattern(
                "interpreter_pattern",
                &sources.interpreter_pattern,
                &defaults.interpreter_pattern,
            ),
            renderer: source_pattern(
                "renderer_pattern",
                &sources.renderer_pattern,
                &defaults.renderer_pattern,
            ),
            editor_helper: source_pattern(
                "editor_helper_pattern",
                &sources.editor_helper_pattern,
                &defaults.editor_helper_pattern,
            ),
            fallback: FallbackRange::new(
                thresholds.tab_fallback_min_mb,
                thresholds.tab_fallback_max_mb,
            ),
            page_size_bytes: config.general.page_size_bytes,
        }
    }

    /// Never fails: any collaborator error empties the part of the snapshot
    /// that depended on it. Scripts, sessions and workspaces read only the
    /// shared process table (plus per-item lookups that degrade in place), so
    /// a failed `ps` is the one error that empties them.
    pub async fn sample(&self) -> SystemSnapshot {
        let span = tracing::debug_span!("collector.sample");
        async {
            let records = match self.source.process_table().await {
                Ok(text) => parse_process_table(&text),
                Err(err) => {
                    tracing::warn!(error = %err, "process table unavailable");
                    Vec::new()
                }
            };

            let (totals, scripts, sessions, workspaces, tabs) = tokio::join!(
                self.memory(),
                self.script_details(&records),
                self.session_details(&records),
                self.workspace_details(&records),
                self.tab_details(&records),
            );

            SystemSnapshot {
                total_memory_gb: totals.total_gb,
                used_memory_gb: totals.used_gb,
                free_memory_gb: totals.free_gb,
                application_groups: self.classifier.tally(&records),
                tabs,
                scripts,
                sessions,
                workspaces,
                sampled_at: Utc::now(),
            }
        }
        .instrument(span)
        .await
    }

    async fn memory(&self) -> MemoryTotals {
        let (total, vm) = tokio::join!(self.source.total_memory_bytes(), self.source.vm_stat());
        let total = total.unwrap_or_else(|err| {
            tracing::warn!(error = %err, "total memory unavailable");
            0
        });
        let stats = match vm {
            Ok(text) => Some(parse_vm_stat(&text)),
            Err(err) => {
                tracing::warn!(error = %err, "vm_stat unavailable");
                None
            }
        };
        memory_totals(total, stats.as_ref(), self.page_size_bytes)
    }

    async fn script_details(&self, records: &[ProcessRecord]) -> Vec<ScriptProcessDetail> {
        let _span = tracing::debug_span!("collector.scripts").entered();
        let interpreters: Vec<ProcessRecord> = records
            .iter()
            .filter(|r| self.interpreter.is_match(&r.command))
            .cloned()
            .collect();
        self.scripts.identify(&interpreters)
    }

    async fn session_details(&self, records: &[ProcessRecord]) -> Vec<SessionDetail> {
        let lookups = self
            .sessions
            .candidates(records)
            .into_iter()
            .map(move |record| async move {
                let cwd = match self.source.working_directory(record.pid).await {
                    Ok(dir) => dir.trim().to_string(),
                    Err(err) => {
                        tracing::debug!(pid = record.pid, error = %err, "cwd lookup failed");
                        String::new()
                    }
                };
                self.sessions.detail(record, cwd)
            });
        let mut details = join_all(lookups)
            .instrument(tracing::debug_span!("collector.sessions"))
            .await;
        sort_sessions(&mut details);
        details
    }

    async fn workspace_details(&self, records: &[ProcessRecord]) -> Vec<WorkspaceDetail> {
        let (total_mb, count) = records
            .iter()
            .filter(|r| self.editor_helper.is_match(&r.command))
            .fold((0u64, 0u32), |(mb, n), r| (mb + r.memory_mb, n + 1));

        let titles = match self
            .source
            .window_titles()
            .instrument(tracing::debug_span!("collector.workspaces"))
            .await
        {
            Ok(titles) => Some(titles),
            Err(err) => {
                tracing::warn!(error = %err, "window enumeration failed, reporting aggregate");
                None
            }
        };
        distribute(total_mb, count, titles.as_deref())
    }

    async fn tab_details(&self, records: &[ProcessRecord]) -> Vec<TabDetail> {
        let tabs = match self
            .source
            .browser_tabs()
            .instrument(tracing::debug_span!("collector.tabs"))
            .await
        {
            Ok(tabs) => tabs,
            Err(err) => {
                tracing::warn!(error = %err, "tab enumeration failed");
                return Vec::new();
            }
        };
        let renderer_mb: Vec<u64> = records
            .iter()
            .filter(|r| self.renderer.is_match(&r.command))
            .map(|r| r.memory_mb)
            .collect();
        let mut details = correlate_tabs(&tabs, renderer_mb, self.fallback);
        sort_tabs(&mut details);
        details
    }
}

fn source_pattern(field: &'static str, pattern: &str, default: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|err| {
        tracing::warn!(field, error = %err, "invalid pattern, using default");
        Regex::new(default).expect("default source patterns are valid")
    })
}
