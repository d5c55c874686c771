use anyhow::{Context, Result};
use spiced_stacks::StackPlan;

use crate::workspace::Workspace;

/// Plan every stack of a project.
///
/// Allocates the listener rule priority of the project if it has none yet.
pub fn plan(ws: &Workspace, configs_path: &str, fargate_deploy_stage: bool) -> Result<StackPlan> {
    let entry = ws.project(configs_path)?;
    let identity = entry.config.identity();
    let store = ws.priorities()?;
    StackPlan::build(
        &entry.config,
        &ws.context(&identity),
        &store,
        fargate_deploy_stage,
    )
    .with_context(|| format!("failed to plan {configs_path}"))
}

/// Print the stack plan of a project as JSON.
pub fn synth(ws: &Workspace, configs_path: &str, fargate_deploy_stage: bool) -> Result<()> {
    let plan = plan(ws, configs_path, fargate_deploy_stage)?;
    println!("{}", plan.to_json()?);
    for warning in plan.warnings() {
        eprintln!("warning: {warning}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::testing::{RENAMED_COHORT, checkout, init_priorities};

    #[test]
    fn test_names_follow_the_cohort_field() {
        let (_dir, ws) = checkout(&[RENAMED_COHORT]);
        init_priorities(&ws);

        let plan = plan(&ws, "jasmine-2021/daniel-streif.toml", false).unwrap();
        assert_eq!(
            plan.services.stack_name,
            "SpicedlingFinalProjectServicesJasmineDanielStreif"
        );
        assert_eq!(
            plan.fargate_service.stack_name,
            "SpicedlingFinalProjectFargateServiceJasmineDanielStreif"
        );

        let store = ws.priorities().unwrap();
        assert_eq!(
            store
                .get("SpicedlingFinalProjectServicesJasmineDanielStreif")
                .unwrap(),
            Some(1)
        );
    }

    #[test]
    fn test_missing_priority_table_fails() {
        let (_dir, ws) = checkout(&[RENAMED_COHORT]);
        assert!(plan(&ws, "jasmine-2021/daniel-streif.toml", false).is_err());
    }
}
