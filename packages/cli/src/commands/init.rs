use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use folio_common::SystemClock;
use folio_editor::DocumentStore;
use folio_storage::JsonFileStore;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Data directory
    #[arg(short, long, default_value = ".folio")]
    pub data_dir: String,

    /// Environment variable holding the AI API key
    #[arg(long, default_value = "API_KEY")]
    pub api_key_env: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Folio library...".bright_blue().bold());

    let mut config = Config {
        data_dir: args.data_dir.clone(),
        ..Config::default()
    };
    config.ai.api_key_env = args.api_key_env;

    let data_dir = config.get_data_dir(cwd);
    if !data_dir.exists() {
        fs::create_dir_all(&data_dir)?;
        println!("  {} Created {}/", "✓".green(), args.data_dir);
    }

    // Opening the store seeds whichever collection is missing
    let store = DocumentStore::open(JsonFileStore::new(data_dir.clone()), Arc::new(SystemClock))?;
    println!(
        "  {} Library has {} project(s) and {} asset(s)",
        "✓".green(),
        store.projects().len(),
        store.assets().len()
    );

    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Library initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: folio tree");
    println!("  2. Export {} to enable AI features", config.ai.api_key_env);
    println!("  3. Run: folio read");

    Ok(())
}
