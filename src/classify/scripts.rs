//! Labels for interpreter processes: script file, known tool, or a cut-down
//! command line.

use regex::Regex;

use crate::config::{ThresholdsConfig, ToolMarkerConfig};
use crate::format::truncate_chars;
use crate::system::process::ProcessRecord;
use crate::system::snapshot::ScriptProcessDetail;

const SCRIPT_FILE_PATTERN: &str = r"([^\s/=]+\.py)(?:\s|$)";

const BUILTIN_TOOLS: &[(&str, &str)] = &[
    ("jupyter-lab", "JupyterLab"),
    ("jupyter-notebook", "Jupyter Notebook"),
    ("ipykernel", "Jupyter Kernel"),
    ("uvicorn", "Uvicorn"),
    ("gunicorn", "Gunicorn"),
    ("celery", "Celery"),
    ("streamlit", "Streamlit"),
    ("http.server", "HTTP Server"),
    ("-m pip", "pip"),
    ("mcp", "MCP Server"),
];

#[derive(Debug, Clone)]
struct ToolMarker {
    marker: String,
    label: String,
}

#[derive(Debug, Clone)]
pub struct ScriptIdentifier {
    script_file: Regex,
    tools: Vec<ToolMarker>,
    label_min_mb: u64,
    include_min_mb: u64,
    label_chars: usize,
}

impl ScriptIdentifier {
    pub fn new(thresholds: &ThresholdsConfig, tools: Option<&[ToolMarkerConfig]>) -> Self {
        let tools = match tools {
            Some(entries) => entries
                .iter()
                .map(|t| ToolMarker {
                    marker: t.marker.clone(),
                    label: t.label.clone(),
                })
                .collect(),
            None => BUILTIN_TOOLS
                .iter()
                .map(|&(marker, label)| ToolMarker {
                    marker: marker.to_string(),
                    label: label.to_string(),
                })
                .collect(),
        };
        ScriptIdentifier {
            script_file: Regex::new(SCRIPT_FILE_PATTERN).expect("script file pattern is valid"),
            tools,
            label_min_mb: thresholds.script_label_min_mb,
            include_min_mb: thresholds.script_include_min_mb,
            label_chars: thresholds.command_label_chars,
        }
    }

    /// Derives a label, or `None` when the process is unlabeled and too small
    /// to be worth a synthesized one.
    pub fn label(&self, record: &ProcessRecord) -> Option<String> {
        if let Some(caps) = self.script_file.captures(&record.command) {
            return Some(caps[1].to_string());
        }
        if let Some(tool) = self
            .tools
            .iter()
            .find(|t| record.command.contains(t.marker.as_str()))
        {
            return Some(tool.label.clone());
        }
        if record.memory_mb > self.label_min_mb {
            return Some(truncate_chars(&record.command, self.label_chars));
        }
        None
    }

    /// `records` must already be interpreter processes.
    pub fn identify(&self, records: &[ProcessRecord]) -> Vec<ScriptProcessDetail> {
        let mut details: Vec<ScriptProcessDetail> = records
            .iter()
            .filter_map(|record| {
                let label = self.label(record)?;
                (record.memory_mb >= self.include_min_mb).then(|| ScriptProcessDetail {
                    label,
                    memory_mb: record.memory_mb,
                    process_id: record.pid,
                })
            })
            .collect();
        details.sort_by(|a, b| b.memory_mb.cmp(&a.memory_mb));
        details
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identifier() -> ScriptIdentifier {
        ScriptIdentifier::new(&ThresholdsConfig::default(), None)
    }

    fn record(pid: u32, memory_mb: u64, command: &str) -> ProcessRecord {
        ProcessRecord {
            pid,
            memory_mb,
            command: command.to_string(),
        }
    }

    #[test]
    fn script_file_basename_wins() {
        let id = identifier();
        assert_eq!(
            id.label(&record(1, 20, "/usr/bin/python3 /srv/jobs/ingest_pipeline.py --dry-run"))
                .as_deref(),
            Some("ingest_pipeline.py")
        );
        // A script name beats a tool marker elsewhere in the command.
        assert_eq!(
            id.label(&record(1, 20, "python3 -m uvicorn_wrapper serve.py")).as_deref(),
            Some("serve.py")
        );
    }

    #[test]
    fn flag_prefix_is_not_part_of_the_script_name() {
        let id = identifier();
        assert_eq!(
            id.label(&record(1, 20, "python3 -m app --config=settings.py")).as_deref(),
            Some("settings.py")
        );
    }

    #[test]
    fn known_tool_marker() {
        let id = identifier();
        assert_eq!(
            id.label(&record(1, 20, "/usr/bin/python3 -m uvicorn app.main:app")).as_deref(),
            Some("Uvicorn")
        );
        assert_eq!(
            id.label(&record(1, 20, "python3 -m ipykernel_launcher -f kernel.json")).as_deref(),
            Some("Jupyter Kernel")
        );
    }

    #[test]
    fn synthesized_label_needs_significance() {
        let id = identifier();
        let cmd = "/opt/homebrew/bin/python3 -c import something_really_long_module_name; run()";
        assert_eq!(id.label(&record(1, 30, cmd)), None);
        let label = id.label(&record(1, 120, cmd)).unwrap();
        assert_eq!(label.chars().count(), 40);
        assert!(cmd.starts_with(&label));
    }

    #[test]
    fn inclusion_floor_applies_to_every_label() {
        let id = identifier();
        let details = id.identify(&[
            record(100, 200, "/usr/bin/python3 ingest_pipeline.py"),
            record(101, 5, "/usr/bin/python3 tiny.py"),
            record(102, 9, "/usr/bin/python3 -m uvicorn app:app"),
        ]);
        assert_eq!(
            details,
            vec![ScriptProcessDetail {
                label: "ingest_pipeline.py".into(),
                memory_mb: 200,
                process_id: 100,
            }]
        );
    }

    #[test]
    fn output_sorted_descending() {
        let id = identifier();
        let details = id.identify(&[
            record(1, 15, "python3 a.py"),
            record(2, 90, "python3 b.py"),
            record(3, 40, "python3 c.py"),
        ]);
        let pids: Vec<u32> = details.iter().map(|d| d.process_id).collect();
        assert_eq!(pids, vec![2, 3, 1]);
    }

    #[test]
    fn configured_tools_replace_builtins() {
        let tools = vec![ToolMarkerConfig {
            marker: "airflow".into(),
            label: "Airflow".into(),
        }];
        let id = ScriptIdentifier::new(&ThresholdsConfig::default(), Some(tools.as_slice()));
        assert_eq!(
            id.label(&record(1, 20, "python3 /usr/local/bin/airflow scheduler")).as_deref(),
            Some("Airflow")
        );
        assert_eq!(id.label(&record(1, 20, "python3 -m uvicorn app:app")), None);
    }
}
