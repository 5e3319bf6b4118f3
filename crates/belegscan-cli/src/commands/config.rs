//! Config command - manage configuration.

use std::fs;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use belegscan_core::ScanConfig;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Initialize a new configuration file
    Init(InitArgs),

    /// Get a specific configuration value
    Get {
        /// Configuration key (e.g., "classifier.model")
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// New value
        value: String,
    },

    /// Show configuration file path
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub async fn run(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(),
        ConfigCommand::Init(init_args) => init_config(init_args),
        ConfigCommand::Get { key } => get_config(&key),
        ConfigCommand::Set { key, value } => set_config(&key, &value),
        ConfigCommand::Path => show_path(),
    }
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("belegscan")
        .join("config.json")
}

/// Load configuration for other commands: the explicit path when given,
/// otherwise the default file when it exists, otherwise defaults.
pub(crate) fn load_config(config_path: Option<&str>) -> anyhow::Result<ScanConfig> {
    match config_path {
        Some(path) => Ok(ScanConfig::from_file(std::path::Path::new(path))?),
        None => {
            let path = default_config_path();
            if path.exists() {
                Ok(ScanConfig::from_file(&path)?)
            } else {
                Ok(ScanConfig::default())
            }
        }
    }
}

fn load_or_default() -> anyhow::Result<ScanConfig> {
    let path = default_config_path();
    if path.exists() {
        Ok(ScanConfig::from_file(&path)?)
    } else {
        Ok(ScanConfig::default())
    }
}

fn show_config() -> anyhow::Result<()> {
    if !default_config_path().exists() {
        println!(
            "{} No config file found, showing defaults.",
            style("ℹ").blue()
        );
    }

    // api_key is redacted on display, not in the file
    let mut config = load_or_default()?;
    if config.classifier.api_key.is_some() {
        config.classifier.api_key = Some("<redacted>".to_string());
    }

    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn init_config(args: InitArgs) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or_else(default_config_path);

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    ScanConfig::default().save(&output_path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

fn get_config(key: &str) -> anyhow::Result<()> {
    let config = load_or_default()?;

    let value = match key {
        "classifier.api_key" => config
            .classifier
            .api_key
            .map_or_else(|| "(not set)".to_string(), |_| "<redacted>".to_string()),
        "classifier.model" => config.classifier.model,
        "classifier.base_url" => config.classifier.base_url,
        _ => anyhow::bail!("Unknown configuration key: {}", key),
    };

    println!("{}", value);
    Ok(())
}

fn set_config(key: &str, value: &str) -> anyhow::Result<()> {
    let config_path = default_config_path();
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut config = load_or_default()?;

    match key {
        "classifier.api_key" => config.classifier.api_key = Some(value.to_string()),
        "classifier.model" => config.classifier.model = value.to_string(),
        "classifier.base_url" => config.classifier.base_url = value.to_string(),
        _ => anyhow::bail!("Unknown configuration key: {}", key),
    }

    config.save(&config_path)?;

    let shown = if key == "classifier.api_key" {
        "<redacted>"
    } else {
        value
    };
    println!("{} Set {} = {}", style("✓").green(), key, shown);

    Ok(())
}

fn show_path() -> anyhow::Result<()> {
    let config_path = default_config_path();

    println!("Configuration file: {}", config_path.display());

    if config_path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'belegscan config init' to create a configuration file.");
    }

    Ok(())
}
