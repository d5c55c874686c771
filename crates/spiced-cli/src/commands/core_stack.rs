use anyhow::Result;
use spiced_stacks::CoreStack;

use super::deploy::CdkCommand;
use crate::workspace::Workspace;

/// Deploy the shared core stack. Only needed once per AWS account.
pub fn core(ws: &Workspace, dry_run: bool) -> Result<()> {
    let stack = CoreStack::new(&ws.settings);
    let command = CdkCommand::deploy(&stack.stack_name);
    if dry_run {
        println!("{command}");
    } else {
        command.run()?;
    }
    for warning in &stack.warnings {
        eprintln!("warning: {warning}");
    }
    Ok(())
}
