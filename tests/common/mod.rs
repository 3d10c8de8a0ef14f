#![allow(dead_code)]

use std::collections::HashMap;

use color_eyre::Result;
use color_eyre::eyre::eyre;
use memscope::classify::tabs::BrowserTab;
use memscope::config::Config;
use memscope::system::collector::Collector;
use memscope::system::source::SnapshotSource;

pub const GB: u64 = 1024 * 1024 * 1024;

/// Canned collaborator output. `None` means the source is unavailable.
#[derive(Clone, Debug, Default)]
pub struct FakeSource {
    pub ps: Option<String>,
    pub vm_stat: Option<String>,
    pub total_bytes: Option<u64>,
    pub cwd: HashMap<u32, String>,
    pub windows: Option<Vec<String>>,
    pub tabs: Option<Vec<BrowserTab>>,
}

impl SnapshotSource for FakeSource {
    async fn process_table(&self) -> Result<String> {
        self.ps.clone().ok_or_else(|| eyre!("ps unavailable"))
    }

    async fn vm_stat(&self) -> Result<String> {
        self.vm_stat.clone().ok_or_else(|| eyre!("vm_stat unavailable"))
    }

    async fn total_memory_bytes(&self) -> Result<u64> {
        self.total_bytes.ok_or_else(|| eyre!("sysctl unavailable"))
    }

    async fn working_directory(&self, pid: u32) -> Result<String> {
        self.cwd
            .get(&pid)
            .cloned()
            .ok_or_else(|| eyre!("lsof failed for {pid}"))
    }

    async fn window_titles(&self) -> Result<Vec<String>> {
        self.windows.clone().ok_or_else(|| eyre!("osascript denied"))
    }

    async fn browser_tabs(&self) -> Result<Vec<BrowserTab>> {
        self.tabs.clone().ok_or_else(|| eyre!("osascript denied"))
    }
}

pub fn ps_line(pid: u32, rss_kb: u64, command: &str) -> String {
    format!("alice {pid} 0.0 0.1 4000000 {rss_kb} ?? S 9:00AM 0:01.00 {command}")
}

pub fn ps_table(rows: &[(u32, u64, &str)]) -> String {
    let mut out = String::from("USER PID %CPU %MEM VSZ RSS TT STAT STARTED TIME COMMAND\n");
    for &(pid, rss_kb, command) in rows {
        out.push_str(&ps_line(pid, rss_kb, command));
        out.push('\n');
    }
    out
}

/// 32 GB machine: 4 GB wired, 8 GB active, 2 GB compressed at 16 KiB pages.
pub fn vm_stat_14gb_used() -> String {
    "Mach Virtual Memory Statistics: (page size of 16384 bytes)\n\
     Pages free:                               80000.\n\
     Pages active:                            524288.\n\
     Pages inactive:                          100000.\n\
     Pages wired down:                        262144.\n\
     Pages occupied by compressor:            131072.\n"
        .to_string()
}

pub fn tab(title: &str, url: &str) -> BrowserTab {
    BrowserTab {
        title: title.to_string(),
        url: url.to_string(),
    }
}

pub fn collector(source: FakeSource) -> Collector<FakeSource> {
    collector_with(source, &Config::default())
}

pub fn collector_with(source: FakeSource, config: &Config) -> Collector<FakeSource> {
    Collector::with_username(source, config, Some("alice".to_string()))
}

pub const CHROME: &str = "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome";
pub const RENDERER: &str = "/Applications/Google Chrome.app/Contents/Frameworks/Google Chrome Framework.framework/Versions/A/Helpers/Google Chrome Helper (Renderer).app/Contents/MacOS/Google Chrome Helper (Renderer) --type=renderer";
pub const CODE_HELPER: &str = "/Applications/Visual Studio Code.app/Contents/Frameworks/Code Helper (Plugin).app/Contents/MacOS/Code Helper (Plugin) --type=utility";
pub const CLAUDE: &str = "node /opt/homebrew/bin/claude";
pub const CLAUDE_MCP: &str = "node /opt/homebrew/bin/claude mcp serve";
pub const CLAUDE_DESKTOP: &str = "/Applications/Claude.app/Contents/MacOS/Claude";

/// A busy workstation with every detail source populated.
pub fn workstation() -> FakeSource {
    let ps = ps_table(&[
        (1, 20_480, "/sbin/launchd"),
        (100, 204_800, "/usr/bin/python3 ingest_pipeline.py"),
        (101, 5_120, "/usr/bin/python3 tiny.py"),
        (102, 71_680, "/opt/homebrew/bin/python3.12 -m uvicorn api.main:app"),
        (200, 409_600, CHROME),
        (201, 307_200, RENDERER),
        (202, 153_600, RENDERER),
        (300, 512_000, CLAUDE),
        (301, 61_440, CLAUDE_MCP),
        (302, 10_240, "claude --version"),
        (400, 256_000, CODE_HELPER),
        (401, 204_800, CODE_HELPER),
        (500, 102_400, "node /Users/alice/dev/web/server.js"),
    ]);
    let mut cwd = HashMap::new();
    cwd.insert(300, "/Users/alice/dev/memscope\n".to_string());
    cwd.insert(301, "/Users/alice".to_string());
    FakeSource {
        ps: Some(ps),
        vm_stat: Some(vm_stat_14gb_used()),
        total_bytes: Some(32 * GB),
        cwd,
        windows: Some(vec![
            "main.rs — memscope".to_string(),
            "index.ts — web".to_string(),
        ]),
        tabs: Some(vec![
            tab("Inbox", "https://mail.example.com/"),
            tab("regex - Rust", "https://docs.rs/regex"),
        ]),
    }
}
