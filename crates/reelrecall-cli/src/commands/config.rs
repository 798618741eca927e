use super::Workspace;
use crate::output::{styled_table, Output, OutputFormat};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::Cell;
use film_sync_config::Config;
use serde_json::json;

pub fn run_config(cmd: crate::ConfigCommands, workspace: &Workspace, output: &Output) -> Result<()> {
    match cmd {
        crate::ConfigCommands::Show => show_config(workspace, output),
        crate::ConfigCommands::SetUsername { username } => set_username(&username, workspace, output),
        crate::ConfigCommands::Init { force } => init_config(force, workspace, output),
    }
}

fn show_config(workspace: &Workspace, output: &Output) -> Result<()> {
    let config_file = workspace.paths.config_file();
    let config = &workspace.config;

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }
            if !config_file.exists() {
                output.warn(format!("Configuration file not found at: {} (showing defaults)", config_file.display()));
            }

            let mut table = styled_table(&["Setting", "Value"]);
            let rows = [
                ("Config file", config_file.display().to_string()),
                ("Database", workspace.database_path().display().to_string()),
                ("Username", config.letterboxd.username.clone().unwrap_or_else(|| "<not set>".to_string())),
                ("Base URL", config.letterboxd.base_url.clone()),
                ("Page delay", format!("{} ms", config.scraper.page_delay_ms)),
                ("Item delay", format!("{} ms", config.scraper.item_delay_ms)),
                ("Request timeout", format!("{} s", config.scraper.request_timeout_secs)),
                ("User agent", config.scraper.user_agent.clone()),
                (
                    "Log file",
                    config.logging.file
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "<stderr>".to_string()),
                ),
            ];
            for (name, value) in rows {
                table.add_row(vec![Cell::new(name), Cell::new(value)]);
            }
            println!("{}", table);
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "config_file": config_file.display().to_string(),
                "config_file_exists": config_file.exists(),
                "database": workspace.database_path().display().to_string(),
                "config": serde_json::to_value(config)?,
            }));
        }
    }
    Ok(())
}

fn set_username(username: &str, workspace: &Workspace, output: &Output) -> Result<()> {
    let username = username.trim();
    if username.is_empty() {
        return Err(eyre!("Username cannot be blank"));
    }

    let config_file = workspace.paths.config_file();
    let mut config = Config::load_or_default(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
    config.letterboxd.username = Some(username.to_string());
    config
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to save config to {}: {}", config_file.display(), e))?;

    output.success(format!("Username set to '{}' in {}", username, config_file.display()));
    Ok(())
}

fn init_config(force: bool, workspace: &Workspace, output: &Output) -> Result<()> {
    let config_file = workspace.paths.config_file();
    if config_file.exists() && !force {
        output.warn(format!("Configuration already exists at {}. Use --force to overwrite", config_file.display()));
        return Ok(());
    }

    workspace
        .paths
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create directories: {}", e))?;
    Config::default()
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to write config to {}: {}", config_file.display(), e))?;

    output.success(format!("Wrote default configuration to {}", config_file.display()));
    Ok(())
}
