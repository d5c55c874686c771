use anyhow::Result;
use serde_json::{Value, json};
use spiced_core::names::{FARGATE_SERVICE_ROLE, PIPELINE_ROLE, SERVICES_ROLE};
use spiced_core::{Namer, ProjectConfig};

use crate::workspace::Workspace;

/// Print every name derived for a project.
pub fn names(ws: &Workspace, configs_path: &str) -> Result<()> {
    let entry = ws.project(configs_path)?;
    let report = report(&ws.namer, &entry.config);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn report(namer: &Namer, config: &ProjectConfig) -> Value {
    let identity = config.identity();

    let services: Vec<_> = config
        .services
        .iter()
        .map(|service| {
            json!({
                "name": service.name,
                "repository": namer.resource_kebab(&service.name, &identity),
                "resource": namer.resource_camel(&service.name, &identity),
            })
        })
        .collect();

    json!({
        "identity": identity,
        "mainResource": namer.main_resource_pascal(&identity),
        "stacks": {
            "services": namer.services_stack_name(&identity),
            "fargateService": namer.fargate_service_stack_name(&identity),
            "pipeline": namer.pipeline_stack_name(&identity),
        },
        "buildRole": namer.resource_pascal_without_separator("BuildRole", &identity),
        "artifact": namer.resource_kebab("artifact", &identity),
        "tags": {
            "services": namer.stack_tags(SERVICES_ROLE, &identity),
            "fargateService": namer.stack_tags(FARGATE_SERVICE_ROLE, &identity),
            "pipeline": namer.stack_tags(PIPELINE_ROLE, &identity),
        },
        "services": services,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::testing::{RENAMED_COHORT, checkout};

    #[test]
    fn test_report_uses_the_cohort_field() {
        let (_dir, ws) = checkout(&[RENAMED_COHORT]);
        let entry = ws.project("jasmine-2021/daniel-streif.toml").unwrap();
        let report = report(&ws.namer, &entry.config);

        assert_eq!(report["identity"]["cohort"], "Jasmine");
        assert_eq!(
            report["stacks"]["services"],
            "SpicedlingFinalProjectServicesJasmineDanielStreif"
        );
        assert_eq!(
            report["services"][0]["repository"],
            "spicedling-final-project-jasmine-daniel-streif/node-server"
        );
        assert_eq!(report["tags"]["pipeline"]["ApplicationRole"], "Pipeline");
    }
}
