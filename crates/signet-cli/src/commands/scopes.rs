//! Scopes command implementation

use anyhow::{Context, Result};

use signet_core::{ClientId, ClientSet};

use crate::output::format_scopes;

/// Print the scopes a request for `clients` asks for
pub fn scopes_command(clients: &[String]) -> Result<()> {
    let mut requested = ClientSet::NONE;
    for name in clients {
        let id: ClientId = name
            .parse()
            .with_context(|| format!("Invalid client name '{}'", name))?;
        requested = requested.with(id);
    }

    tracing::debug!("Deriving scopes for {}", requested);
    println!("{}", format_scopes(requested));
    Ok(())
}
