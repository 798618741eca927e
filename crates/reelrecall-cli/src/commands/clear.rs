use super::Workspace;
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;

pub fn run_clear(database: bool, workspace: &Workspace, output: &Output) -> Result<()> {
    if !database {
        output.warn("No clear option specified. Use --database");
        output.info("\nExample: reelrecall clear --database");
        return Ok(());
    }

    let path = workspace.database_path();
    if !path.exists() {
        output.info(format!("No database found at {}", path.display()));
        return Ok(());
    }

    let library = workspace.open_library()?;
    let removed = library
        .store()
        .clear()
        .map_err(|e| eyre!("Failed to clear database at {}: {}", path.display(), e))?;
    output.success(format!("Removed {} film(s) from {}", removed, path.display()));
    Ok(())
}
