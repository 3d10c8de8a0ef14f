use std::io::{Write, stdout};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use memscope::config::{self, load_config, load_config_from_path};
use memscope::format::{format_mb, pad_columns};
use memscope::system::collector::Collector;
use memscope::system::snapshot::SystemSnapshot;
use memscope::system::source::CommandSource;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "memscope",
    about = "Sample host memory and group it by application"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep sampling and print one JSON document per line
    #[arg(long, default_value_t = false)]
    watch: bool,

    /// Sampling interval in milliseconds (watch mode)
    #[arg(long)]
    refresh_rate: Option<u64>,

    /// Pretty-print JSON output
    #[arg(long, default_value_t = false)]
    pretty: bool,

    /// Print a human-readable summary instead of JSON
    #[arg(long, default_value_t = false)]
    summary: bool,

    /// Emit logs to stderr as JSON lines
    #[arg(long, default_value_t = false)]
    log_json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.log_json)?;
    let config = load_config_for_cli(&cli);

    if cli.watch && cli.summary {
        return Err(eyre!("--summary cannot be combined with --watch"));
    }

    let source = CommandSource::new(&config.sources);
    let collector = Collector::new(source, &config);

    if !cli.watch {
        let snapshot = collector.sample().await;
        return emit(&snapshot, &cli, config.general.pretty);
    }

    let mut interval = tokio::time::interval(Duration::from_millis(config.general.refresh_rate_ms));
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let snapshot = collector.sample().await;
                emit(&snapshot, &cli, config.general.pretty)?;
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    Ok(())
}

fn init_tracing(json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| eyre!("failed to set tracing subscriber: {e}"))
}

fn load_config_for_cli(cli: &Cli) -> config::Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(rate) = cli.refresh_rate {
        config.general.refresh_rate_ms = rate;
    }
    if cli.pretty {
        config.general.pretty = true;
    }

    config
}

fn emit(snapshot: &SystemSnapshot, cli: &Cli, pretty: bool) -> Result<()> {
    let mut out = stdout().lock();
    if cli.summary {
        write_summary(&mut out, snapshot)?;
    } else if pretty {
        serde_json::to_writer_pretty(&mut out, snapshot)?;
        writeln!(out)?;
    } else {
        serde_json::to_writer(&mut out, snapshot)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

fn write_summary(out: &mut impl Write, snapshot: &SystemSnapshot) -> Result<()> {
    writeln!(
        out,
        "Memory: {:.1} GB used / {:.1} GB free / {:.1} GB total",
        snapshot.used_memory_gb, snapshot.free_memory_gb, snapshot.total_memory_gb
    )?;
    writeln!(out)?;
    for group in &snapshot.application_groups {
        writeln!(
            out,
            "{:<16} {:>10}  ({} procs)",
            group.name,
            format_mb(group.total_memory_mb),
            group.process_count
        )?;
    }
    if !snapshot.scripts.is_empty() {
        writeln!(out, "\nScripts")?;
        for s in &snapshot.scripts {
            writeln!(
                out,
                "  {} {:>10}  pid {}",
                pad_columns(&s.label, 40),
                format_mb(s.memory_mb),
                s.process_id
            )?;
        }
    }
    if !snapshot.sessions.is_empty() {
        writeln!(out, "\nSessions")?;
        for s in &snapshot.sessions {
            let role = if s.is_subordinate { "helper" } else { "main" };
            writeln!(
                out,
                "  {} {:>10}  {:<6} {}",
                pad_columns(&s.project_label, 24),
                format_mb(s.memory_mb),
                role,
                s.working_directory
            )?;
        }
    }
    if !snapshot.workspaces.is_empty() {
        writeln!(out, "\nWorkspaces")?;
        for w in &snapshot.workspaces {
            writeln!(
                out,
                "  {} {:>10}  ({} procs)",
                pad_columns(&w.path, 40),
                format_mb(w.memory_mb),
                w.process_count
            )?;
        }
    }
    if !snapshot.tabs.is_empty() {
        writeln!(out, "\nTabs")?;
        for t in &snapshot.tabs {
            let marker = if t.estimated { "~" } else { " " };
            writeln!(out, " {marker}{} {:>10}", pad_columns(&t.title, 40), format_mb(t.memory_mb))?;
        }
    }
    Ok(())
}
