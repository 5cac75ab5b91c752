//! Simulate command implementation

use std::path::PathBuf;

use anyhow::{Context, Result};

use signet_core::config::{self, ConfigFile};
use signet_core::ClientSet;

use crate::output::{format_status, print_entry, print_warning};
use crate::sim::run_simulation;

/// Run the scripted simulation from the configuration file
///
/// A missing configuration file falls back to the defaults. `clients` and
/// `auto_sign_in` override the `[orchestrator]` section.
pub fn simulate_command(
    config_path: Option<&PathBuf>,
    clients: Option<&str>,
    auto_sign_in: Option<bool>,
    json: bool,
) -> Result<()> {
    let path = config_path
        .cloned()
        .unwrap_or_else(config::default_config_path);

    let mut file: ConfigFile = if path.exists() {
        config::load_config(&path)
            .with_context(|| format!("Failed to load config file: {:?}", path))?
    } else {
        print_warning(&format!(
            "No configuration file found at {:?}; using defaults",
            path
        ));
        ConfigFile::default()
    };

    if let Some(clients) = clients {
        file.orchestrator.clients = clients
            .parse::<ClientSet>()
            .with_context(|| format!("Invalid client list '{}'", clients))?;
    }
    if let Some(auto_sign_in) = auto_sign_in {
        file.orchestrator.auto_sign_in = auto_sign_in;
    }
    file.validate().context("Invalid configuration")?;

    tracing::info!(
        "Simulating {} steps for {}",
        file.simulation.steps.len(),
        file.orchestrator.clients
    );
    let report = run_simulation(
        file.orchestrator.clients,
        file.orchestrator.auto_sign_in,
        &file.simulation,
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for entry in &report.transcript {
        print_entry(entry);
    }
    println!();
    println!("{}", format_status(&report.status));

    Ok(())
}
