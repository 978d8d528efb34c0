//! `placebook config`: read and edit `~/.placebook/config.ini`.
//!
//! Keys are written `section.key`, the same names `config list` prints.
//! Values go through the library's validation before anything is saved.

use clap::Subcommand;
use console::style;
use placebook::config::{config_file_path, ConfigFile, ConfigKey};

use super::common::display_path;
use crate::error::CliError;

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the current value of one setting
    Get {
        /// Setting name, e.g. remote.api_url
        key: String,
    },

    /// Change one setting and save the file
    Set {
        /// Setting name, e.g. query.distance_m
        key: String,

        /// New value, checked before saving
        value: String,
    },

    /// Print every setting grouped by section
    List,

    /// Print where the config file lives
    Path,
}

pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Get { key } => run_get(&key),
        ConfigCommands::Set { key, value } => run_set(&key, &value),
        ConfigCommands::List => run_list(),
        ConfigCommands::Path => run_path(),
    }
}

fn parse_key(key: &str) -> Result<ConfigKey, CliError> {
    key.parse().map_err(|_| {
        CliError::Config(format!(
            "no setting named '{}' (run `placebook config list` for names)",
            key
        ))
    })
}

/// `key = value` line for `config list`; empty values show as unset.
fn list_entry(key: ConfigKey, value: &str) -> String {
    let shown = if value.is_empty() {
        style("<unset>").dim().to_string()
    } else {
        value.to_string()
    };
    format!("  {:<18} {}", key.key_name(), shown)
}

fn run_get(key: &str) -> Result<(), CliError> {
    let key = parse_key(key)?;
    let value = key.get(&ConfigFile::load()?);
    println!("{}", if value.is_empty() { "<unset>" } else { &value });
    Ok(())
}

fn run_set(key: &str, value: &str) -> Result<(), CliError> {
    let key = parse_key(key)?;
    let mut config = ConfigFile::load()?;
    key.set(&mut config, value)?;
    config.save()?;

    println!("{} {} -> {}", style("updated").green(), key, key.get(&config));
    Ok(())
}

fn run_list() -> Result<(), CliError> {
    let config = ConfigFile::load()?;
    let mut previous: Option<&str> = None;

    for key in ConfigKey::all() {
        if previous != Some(key.section()) {
            if previous.is_some() {
                println!();
            }
            println!("{}", style(key.section()).bold().underlined());
            previous = Some(key.section());
        }
        println!("{}", list_entry(*key, &key.get(&config)));
    }
    Ok(())
}

fn run_path() -> Result<(), CliError> {
    println!("{}", display_path(&config_file_path()));
    Ok(())
}
