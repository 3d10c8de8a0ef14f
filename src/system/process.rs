use crate::format::kb_to_mb;

// `ps aux` column layout:
// USER PID %CPU %MEM VSZ RSS TT STAT STARTED TIME COMMAND...
const PID_FIELD: usize = 1;
const RSS_FIELD: usize = 5;
const COMMAND_FIELD: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessRecord {
    pub pid: u32,
    pub memory_mb: u64,
    pub command: String,
}

/// Parses one process-table line. Header, short, or otherwise malformed lines
/// yield `None`.
pub fn parse_process_line(line: &str) -> Option<ProcessRecord> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() <= COMMAND_FIELD {
        return None;
    }
    let pid = fields[PID_FIELD].parse().ok()?;
    let rss_kb: u64 = fields[RSS_FIELD].parse().ok()?;
    Some(ProcessRecord {
        pid,
        memory_mb: kb_to_mb(rss_kb),
        command: fields[COMMAND_FIELD..].join(" "),
    })
}

pub fn parse_process_table(text: &str) -> Vec<ProcessRecord> {
    text.lines().filter_map(parse_process_line).collect()
}
