use anyhow::Result;
use spiced_core::Settings;

use crate::workspace::Workspace;

const MASK: &str = "********";

/// Print the effective settings, overrides applied. The password is masked.
pub fn settings(ws: &Workspace) -> Result<()> {
    print!("{}", masked(&ws.settings).to_toml_string()?);
    Ok(())
}

fn masked(settings: &Settings) -> Settings {
    let mut settings = settings.clone();
    if settings.database.postgres_password.is_some() {
        settings.database.postgres_password = Some(MASK.to_string());
    }
    settings
}
