use anyhow::Result;
use clap::ValueEnum;
use spiced_pack::ServiceRegistry;

use crate::workspace::Workspace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Yaml,
    Json,
}

/// Render the CodeBuild buildspec of a project.
pub fn render(ws: &Workspace, configs_path: &str, format: Format) -> Result<String> {
    let entry = ws.project(configs_path)?;
    let identity = entry.config.identity();
    let ctx = ws.context(&identity);
    let registry = ServiceRegistry::from_configs(&entry.config.services, &ctx)?;
    let spec = registry.buildspec(&ctx)?;

    Ok(match format {
        Format::Yaml => spec.to_yaml()?,
        Format::Json => format!("{}\n", spec.to_json()?),
    })
}

/// Print the CodeBuild buildspec of a project.
pub fn buildspec(ws: &Workspace, configs_path: &str, format: Format) -> Result<()> {
    print!("{}", render(ws, configs_path, format)?);
    Ok(())
}
