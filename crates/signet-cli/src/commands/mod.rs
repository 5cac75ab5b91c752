//! CLI command implementations

mod config;
mod scopes;
mod simulate;

pub use config::{config_init, config_path, config_show, generate_default_config};
pub use scopes::scopes_command;
pub use simulate::simulate_command;
