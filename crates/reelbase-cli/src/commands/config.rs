use crate::output::Output;
use catalog_config::{Config, PathManager};
use color_eyre::eyre::{eyre, Context};
use color_eyre::Result;
use comfy_table::{Cell, Table};
use owo_colors::OwoColorize;
use serde_json::json;
use std::path::Path;

pub fn run_config(cmd: crate::ConfigCommands, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let config_file = path_manager.config_file();

    match cmd {
        crate::ConfigCommands::Show => show_config(&config_file, output),
        crate::ConfigCommands::Init { force } => init_config(&config_file, force, output),
        crate::ConfigCommands::Set { key, value } => set_config(&config_file, &key, &value, output),
    }
}

fn load(config_file: &Path) -> Result<Config> {
    Config::load_or_default(config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))
}

fn show_config(config_file: &Path, output: &Output) -> Result<()> {
    let config = load(config_file)?;
    let exists = config_file.exists();

    if !output.is_human() {
        let value = serde_json::to_value(&config).wrap_err("Failed to serialize config")?;
        output.json(&json!({
            "type": "config",
            "path": config_file.display().to_string(),
            "exists": exists,
            "config": value,
        }));
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_header(vec![
        Cell::new("Key").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Value").add_attribute(comfy_table::Attribute::Bold),
    ]);
    let path_or_default = |p: &Option<std::path::PathBuf>| {
        p.as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(default)".to_string())
    };
    table.add_row(vec!["api.base_url".to_string(), config.api.base_url.clone()]);
    table.add_row(vec!["ui.per_page".to_string(), config.ui.per_page.to_string()]);
    table.add_row(vec!["ui.search_debounce_ms".to_string(), config.ui.search_debounce_ms.to_string()]);
    table.add_row(vec!["ui.min_logged_query_len".to_string(), config.ui.min_logged_query_len.to_string()]);
    table.add_row(vec!["storage.dir".to_string(), path_or_default(&config.storage.dir)]);
    table.add_row(vec!["logging.file".to_string(), path_or_default(&config.logging.file)]);

    output.println(format!("{} {}", "Config file:".bright_cyan().bold(), config_file.display()));
    if !exists {
        output.println("(not written yet; showing defaults. Run `reelbase config init` to create it.)".dimmed().to_string());
    }
    output.table(&table);

    if let Err(e) = config.validate() {
        output.warn(format!("Configuration is invalid: {}", e));
    }
    Ok(())
}

fn init_config(config_file: &Path, force: bool, output: &Output) -> Result<()> {
    if config_file.exists() && !force {
        output.warn(format!("Config file already exists at {}", config_file.display()));
        output.println("Use --force to overwrite it with defaults.");
        return Ok(());
    }

    Config::default()
        .save_to_file(config_file)
        .map_err(|e| eyre!("Failed to write config to {}: {}", config_file.display(), e))?;
    output.success(format!("Wrote default config to {}", config_file.display()));
    output.json(&json!({ "type": "config", "path": config_file.display().to_string(), "written": true }));
    Ok(())
}

fn set_config(config_file: &Path, key: &str, value: &str, output: &Output) -> Result<()> {
    let mut config = load(config_file)?;
    config.set_value(key, value).map_err(|e| eyre!("{}", e))?;
    config
        .save_to_file(config_file)
        .map_err(|e| eyre!("Failed to write config to {}: {}", config_file.display(), e))?;

    output.success(format!("Set {} = {}", key, value.trim()));
    output.json(&json!({ "type": "config", "key": key, "value": value.trim() }));
    Ok(())
}
