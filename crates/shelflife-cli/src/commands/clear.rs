use crate::output::Output;
use color_eyre::eyre::Context;
use color_eyre::Result;
use media_audit_config::PathManager;

pub fn run_clear(output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let snapshot_file = path_manager.snapshot_file();

    if snapshot_file.exists() {
        std::fs::remove_file(&snapshot_file)
            .with_context(|| format!("Failed to delete {}", snapshot_file.display()))?;
        output.success(format!("Deleted snapshot at {}", snapshot_file.display()));
    } else {
        output.info("No persisted snapshot to delete");
    }
    Ok(())
}
