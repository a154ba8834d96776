//! Config command handler.

use loopcsv::Result;
use loopcsv::config::{CONFIG_PATH_ENV, LoopCsvConfig};
use loopcsv::observability::LOG_ENV;

/// Config command.
pub fn cmd_config(config: &LoopCsvConfig) -> Result<()> {
    println!("Current Configuration");
    println!("=====================");
    println!();

    println!("Config File Loaded:");
    match &config.source {
        Some(source) => println!("  - {}", source.display()),
        None => println!("  (none - using defaults)"),
    }
    println!();

    println!("{}", config.to_toml()?);

    println!("Environment:");
    for name in [CONFIG_PATH_ENV, LOG_ENV, "RUST_LOG"] {
        let value = std::env::var(name).unwrap_or_else(|_| "(unset)".to_string());
        println!("  {name}: {value}");
    }
    Ok(())
}
