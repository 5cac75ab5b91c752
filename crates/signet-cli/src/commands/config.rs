//! Config command implementations

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::output::{print_error, print_info, print_success, print_warning};
use signet_core::config;

fn resolve_path(config_path: Option<&PathBuf>) -> PathBuf {
    config_path
        .cloned()
        .unwrap_or_else(config::default_config_path)
}

/// Show current configuration
pub fn config_show(config_path: Option<&PathBuf>) -> Result<()> {
    let path = resolve_path(config_path);

    if !path.exists() {
        print_warning(&format!("No configuration file found at {:?}", path));
        print_info("Run 'signet config init' to create one");
        return Ok(());
    }

    print_info(&format!("Configuration file: {:?}", path));
    println!();

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    println!("{}", content);

    Ok(())
}

/// Print the configuration file path
pub fn config_path(config_path: Option<&PathBuf>) -> Result<()> {
    println!("{}", resolve_path(config_path).display());
    Ok(())
}

/// Initialize default configuration
pub fn config_init(config_path: Option<&PathBuf>, force: bool) -> Result<()> {
    let config_file = resolve_path(config_path);
    let config_dir = config_file
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(config::default_config_dir);

    if !config_dir.as_os_str().is_empty() && !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)
            .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
        print_success(&format!("Created config directory: {:?}", config_dir));
    }

    if config_file.exists() && !force {
        print_error(&format!("Config file already exists: {:?}", config_file));
        print_info("Use --force to overwrite");
        return Ok(());
    }

    std::fs::write(&config_file, generate_default_config())
        .with_context(|| format!("Failed to write config file: {:?}", config_file))?;

    print_success(&format!("Created configuration file: {:?}", config_file));
    Ok(())
}

/// Default configuration content
pub fn generate_default_config() -> String {
    r#"# signet configuration

[orchestrator]
# Clients to sign in. They always connect in the order games, social, app_state.
clients = ["games"]

# Connect automatically when the host starts
auto_sign_in = false

[simulation]
# Whether the host reports the sign-in service as installed
service_available = true

# Lifecycle steps, applied in order: start, stop, sign_in, sign_out, reconnect
steps = ["start", "sign_in"]

# Outcomes of resolution requests, consumed in order; the last one repeats.
# succeed, decline, undeliverable
resolution = ["succeed"]

# Per-client connection scripts. Outcomes: connect, invite:<id>, fail,
# fail:<code>, fail_resolvable, hang, drop. The last outcome repeats, and
# clients without a script always connect.
#
# [simulation.clients.games]
# outcomes = ["fail_resolvable", "connect"]
# sign_out = "deferred"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use signet_core::config::ConfigFile;
    use signet_core::{ClientId, ClientSet};

    #[test]
    fn test_default_config_is_valid() {
        let config: ConfigFile = toml::from_str(&generate_default_config()).unwrap();
        config.validate().unwrap();
        assert_eq!(config.orchestrator.clients, ClientSet::from(ClientId::Games));
        assert!(!config.orchestrator.auto_sign_in);
        assert!(config.simulation.clients.scripted().is_empty());
    }

    #[test]
    fn test_init_respects_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signet").join("config.toml");

        config_init(Some(&path), false).unwrap();
        assert!(path.exists());

        std::fs::write(&path, "# edited").unwrap();
        config_init(Some(&path), false).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# edited");

        config_init(Some(&path), true).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            generate_default_config()
        );
    }
}
