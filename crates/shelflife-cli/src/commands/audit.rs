use crate::output::{Output, OutputFormat};
use color_eyre::eyre::Context;
use color_eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use media_audit_config::{Config, PathManager};
use media_audit_core::{FileSnapshotStore, StaleAudit};
use media_audit_models::{SizeOnDisk, Snapshot};
use owo_colors::OwoColorize;
use std::time::Duration;

pub async fn run_audit(force: bool, output: &Output) -> Result<()> {
    tracing::debug!("Audit command started");

    let config = Config::from_env()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load configuration: {}", e))?;
    config
        .validate()
        .map_err(|e| color_eyre::eyre::eyre!("Configuration is invalid: {}", e))?;

    let path_manager = PathManager::default();
    path_manager
        .ensure_directories()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create data directories: {}", e))?;

    let store = FileSnapshotStore::new(path_manager.snapshot_file());
    let audit = StaleAudit::new(&config, Box::new(store))
        .map_err(|e| color_eyre::eyre::eyre!("Failed to initialize service clients: {}", e))?;

    let spinner = if output.is_quiet() || output.format() != OutputFormat::Human {
        None
    } else {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_message(if force {
            "Auditing library..."
        } else {
            "Loading snapshot..."
        });
        Some(bar)
    };

    let snapshot = audit.snapshot(force).await;

    if let Some(bar) = &spinner {
        bar.finish_and_clear();
    }

    let snapshot = match snapshot {
        Ok(snapshot) => snapshot,
        Err(e) => {
            output.error(format!("Audit failed: {}", e));
            return Err(color_eyre::eyre::eyre!("{}", e));
        }
    };

    match output.format() {
        OutputFormat::Human => print_human(&snapshot, output),
        OutputFormat::Json | OutputFormat::JsonPretty => {
            let value = serde_json::to_value(&snapshot).context("Failed to serialize snapshot")?;
            output.print_json(&value);
        }
    }

    Ok(())
}

fn print_human(snapshot: &Snapshot, output: &Output) {
    if output.is_quiet() {
        return;
    }

    if snapshot.content.is_empty() {
        output.success("No stale items found");
        return;
    }

    println!(
        "{} stale items (as of {})",
        snapshot.content.len().to_string().bold(),
        snapshot.timestamp.format("%Y-%m-%d %H:%M UTC")
    );
    for candidate in &snapshot.content {
        let size = match &candidate.size {
            SizeOnDisk::Gibibytes(gib) => format!("{:.2} GiB", gib),
            SizeOnDisk::Unresolved => "size unresolved".to_string(),
        };
        println!(
            "  {} [{}] added {}, {}, requested by {}",
            candidate.title.bold(),
            candidate.kind.as_str(),
            candidate.added_at,
            size,
            candidate.requester
        );
    }
}
