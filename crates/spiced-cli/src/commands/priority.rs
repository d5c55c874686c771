use anyhow::{Context, Result};
use spiced_state::{PriorityStore, PriorityTable};

use crate::workspace::Workspace;

pub fn allocate(ws: &Workspace, stack_name: &str) -> Result<()> {
    let priority = ws
        .priorities()?
        .allocate(stack_name)
        .with_context(|| format!("failed to allocate a priority for {stack_name}"))?;
    println!("{priority}");
    Ok(())
}

pub fn list(ws: &Workspace) -> Result<()> {
    let table = ws.priorities()?.load()?;
    for (stack, priority) in by_priority(&table) {
        println!("{priority:>5}  {stack}");
    }
    Ok(())
}

/// Entries by ascending priority.
fn by_priority(table: &PriorityTable) -> Vec<(&str, u32)> {
    let mut entries: Vec<(&str, u32)> = table
        .entries()
        .iter()
        .map(|(stack, priority)| (stack.as_str(), *priority))
        .collect();
    entries.sort_by_key(|(_, priority)| *priority);
    entries
}

pub fn init(ws: &Workspace) -> Result<()> {
    let path = &ws.settings.paths.priorities_file;
    PriorityStore::init(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    println!("✓ {}", path.display());
    Ok(())
}
