//! Raw text collaborators: the process table, vm_stat, per-pid cwd lookups and
//! the window/tab enumerations obtained through AppleScript.

use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use sysinfo::System;
use tokio::process::Command;

use crate::classify::tabs::BrowserTab;
use crate::config::SourcesConfig;

/// Everything the collector needs from the host. Each call may fail
/// independently; the collector decides how to degrade.
#[allow(async_fn_in_trait)]
pub trait SnapshotSource {
    async fn process_table(&self) -> Result<String>;
    async fn vm_stat(&self) -> Result<String>;
    async fn total_memory_bytes(&self) -> Result<u64>;
    async fn working_directory(&self, pid: u32) -> Result<String>;
    async fn window_titles(&self) -> Result<Vec<String>>;
    async fn browser_tabs(&self) -> Result<Vec<BrowserTab>>;
}

/// Shells out to the stock macOS tools.
#[derive(Debug, Clone)]
pub struct CommandSource {
    browser_app: String,
    editor_app: String,
}

impl CommandSource {
    pub fn new(sources: &SourcesConfig) -> Self {
        CommandSource {
            browser_app: sources.browser_app.clone(),
            editor_app: sources.editor_app.clone(),
        }
    }

    fn tabs_script(&self) -> String {
        format!(
            r#"
tell application "System Events"
    if not (exists process "{app}") then return ""
end tell
tell application "{app}"
    set output to ""
    repeat with w from 1 to count of windows
        repeat with t from 1 to count of tabs of window w
            set tabTitle to title of tab t of window w
            set tabURL to URL of tab t of window w
            set output to output & tabTitle & "\t" & tabURL & "\n"
        end repeat
    end repeat
    return output
end tell
"#,
            app = self.browser_app
        )
    }

    fn windows_script(&self) -> String {
        format!(
            r#"
tell application "System Events"
    if not (exists process "{app}") then return ""
    set output to ""
    repeat with w in windows of process "{app}"
        set output to output & name of w & "\n"
    end repeat
    return output
end tell
"#,
            app = self.editor_app
        )
    }
}

impl SnapshotSource for CommandSource {
    async fn process_table(&self) -> Result<String> {
        run("ps", &["aux"]).await
    }

    async fn vm_stat(&self) -> Result<String> {
        run("vm_stat", &[]).await
    }

    async fn total_memory_bytes(&self) -> Result<u64> {
        let mut sys = System::new();
        sys.refresh_memory();
        match sys.total_memory() {
            0 => Err(eyre!("total physical memory unavailable")),
            bytes => Ok(bytes),
        }
    }

    async fn working_directory(&self, pid: u32) -> Result<String> {
        let pid = pid.to_string();
        let out = run("lsof", &["-a", "-p", &pid, "-d", "cwd", "-Fn"]).await?;
        Ok(parse_lsof_cwd(&out).unwrap_or_default())
    }

    async fn window_titles(&self) -> Result<Vec<String>> {
        let out = run("osascript", &["-e", &self.windows_script()]).await?;
        Ok(parse_window_titles(&out))
    }

    async fn browser_tabs(&self) -> Result<Vec<BrowserTab>> {
        let out = run("osascript", &["-e", &self.tabs_script()]).await?;
        Ok(parse_browser_tabs(&out))
    }
}

async fn run(program: &str, args: &[&str]) -> Result<String> {
    let output = Command::new(program)
        .args(args)
        .output()
        .await
        .wrap_err_with(|| format!("failed to spawn `{program}`"))?;
    if !output.status.success() {
        return Err(eyre!("`{program}` exited with {}", output.status));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// `lsof -Fn` prints one field per line; the name field starts with `n`.
pub fn parse_lsof_cwd(output: &str) -> Option<String> {
    output
        .lines()
        .find_map(|l| l.strip_prefix('n'))
        .map(str::to_string)
}

pub fn parse_window_titles(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// One `title<TAB>url` pair per line. Lines without a tab are skipped.
pub fn parse_browser_tabs(output: &str) -> Vec<BrowserTab> {
    output
        .lines()
        .filter_map(|line| {
            let (title, url) = line.trim_end_matches('\r').rsplit_once('\t')?;
            Some(BrowserTab {
                title: title.trim().to_string(),
                url: url.trim().to_string(),
            })
        })
        .collect()
}
