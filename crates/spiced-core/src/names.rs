//! Deterministic names and tags for everything deployed for a student.
//!
//! Every name is built by concatenating the stack prefix with the cohort,
//! first name and last name (plus a resource or stack name) and re-casing
//! the result. The concatenation order is part of the contract: changing it
//! renames, and therefore recreates, every downstream AWS resource.

use serde::{Deserialize, Serialize};

use crate::case::{camel_case, kebab_case, upper_first};
use crate::identity::SpicedlingIdentity;
use crate::settings::{NamingSettings, Settings};

/// Application roles used in stack tags.
pub const SERVICES_ROLE: &str = "Services";
pub const FARGATE_SERVICE_ROLE: &str = "Fargate Service";
pub const PIPELINE_ROLE: &str = "Pipeline";

/// Tags attached to every stack of a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackTags {
    pub application_group: String,
    pub application: String,
    pub application_role: String,
    pub spicedling_name: String,
    pub spicedling_cohort: String,
}

/// Derives resource names from a [`SpicedlingIdentity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namer {
    stack_prefix: String,
    application_group_tag: String,
    application_tag_prefix: String,
}

impl Namer {
    pub fn new(naming: &NamingSettings) -> Self {
        Self {
            stack_prefix: naming.stack_prefix.clone(),
            application_group_tag: naming.application_group_tag.clone(),
            application_tag_prefix: naming.application_tag_prefix.clone(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.naming)
    }

    pub fn stack_prefix(&self) -> &str {
        &self.stack_prefix
    }

    fn identity_key(&self, identity: &SpicedlingIdentity) -> String {
        format!(
            "{}{}{}{}",
            self.stack_prefix, identity.cohort, identity.first_name, identity.last_name
        )
    }

    // ── Main resources ─────────────────────────────────────────────

    /// Name shared by the cluster, service and pipeline of a student.
    pub fn main_resource_camel(&self, identity: &SpicedlingIdentity) -> String {
        camel_case(&self.identity_key(identity))
    }

    pub fn main_resource_pascal(&self, identity: &SpicedlingIdentity) -> String {
        upper_first(&self.main_resource_camel(identity))
    }

    // ── Stacks ─────────────────────────────────────────────────────

    /// `prefix + stack + cohort + first + last`, PascalCased.
    pub fn stack_name(&self, stack: &str, identity: &SpicedlingIdentity) -> String {
        upper_first(&camel_case(&format!(
            "{}{}{}{}{}",
            self.stack_prefix, stack, identity.cohort, identity.first_name, identity.last_name
        )))
    }

    pub fn services_stack_name(&self, identity: &SpicedlingIdentity) -> String {
        self.stack_name("Services", identity)
    }

    pub fn pipeline_stack_name(&self, identity: &SpicedlingIdentity) -> String {
        self.stack_name("Pipeline", identity)
    }

    pub fn fargate_service_stack_name(&self, identity: &SpicedlingIdentity) -> String {
        self.stack_name("FargateService", identity)
    }

    pub fn stack_tags(&self, application_role: &str, identity: &SpicedlingIdentity) -> StackTags {
        StackTags {
            application_group: self.application_group_tag.clone(),
            application: format!(
                "{} {} {} {}",
                self.application_tag_prefix,
                identity.cohort,
                identity.first_name,
                identity.last_name
            ),
            application_role: application_role.to_string(),
            spicedling_name: identity.full_name(),
            spicedling_cohort: identity.cohort.clone(),
        }
    }

    // ── Resources ──────────────────────────────────────────────────

    /// `kebab(prefix + cohort + first + last) / kebab(resource)`.
    pub fn resource_kebab(&self, resource: &str, identity: &SpicedlingIdentity) -> String {
        format!(
            "{}/{}",
            kebab_case(&self.identity_key(identity)),
            kebab_case(resource)
        )
    }

    /// `camel(prefix + cohort + first + last) / camel(resource)`.
    pub fn resource_camel(&self, resource: &str, identity: &SpicedlingIdentity) -> String {
        format!(
            "{}/{}",
            camel_case(&self.identity_key(identity)),
            camel_case(resource)
        )
    }

    pub fn resource_pascal(&self, resource: &str, identity: &SpicedlingIdentity) -> String {
        upper_first(&self.resource_camel(resource, identity))
    }

    /// `camel(prefix + cohort + first + last + resource)`.
    pub fn resource_camel_without_separator(
        &self,
        resource: &str,
        identity: &SpicedlingIdentity,
    ) -> String {
        camel_case(&format!("{}{}", self.identity_key(identity), resource))
    }

    pub fn resource_pascal_without_separator(
        &self,
        resource: &str,
        identity: &SpicedlingIdentity,
    ) -> String {
        upper_first(&self.resource_camel_without_separator(resource, identity))
    }
}

impl Default for Namer {
    fn default() -> Self {
        Self::new(&NamingSettings::default())
    }
}

/// Drop every character outside 7-bit ASCII (DEL included).
pub fn ascii(input: &str) -> String {
    input.chars().filter(|c| (*c as u32) < 127).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn daniel() -> SpicedlingIdentity {
        SpicedlingIdentity::new("Jasmine", "Daniel", "Streif")
    }

    fn magali() -> SpicedlingIdentity {
        SpicedlingIdentity::new("Jasmine", "Magali", "Gonçalves da Silva")
    }

    #[test]
    fn stack_names_put_the_stack_after_the_prefix() {
        let namer = Namer::default();
        assert_eq!(
            namer.services_stack_name(&daniel()),
            "SpicedlingFinalProjectServicesJasmineDanielStreif"
        );
        assert_eq!(
            namer.pipeline_stack_name(&daniel()),
            "SpicedlingFinalProjectPipelineJasmineDanielStreif"
        );
        assert_eq!(
            namer.fargate_service_stack_name(&daniel()),
            "SpicedlingFinalProjectFargateServiceJasmineDanielStreif"
        );
    }

    #[test]
    fn main_resource_names() {
        let namer = Namer::default();
        assert_eq!(
            namer.main_resource_camel(&daniel()),
            "spicedlingFinalProjectJasmineDanielStreif"
        );
        assert_eq!(
            namer.main_resource_pascal(&magali()),
            "SpicedlingFinalProjectJasmineMagaliGoncalvesDaSilva"
        );
    }

    #[test]
    fn resource_names_append_the_resource_last() {
        let namer = Namer::default();
        assert_eq!(
            namer.resource_kebab("Node Server", &daniel()),
            "spicedling-final-project-jasmine-daniel-streif/node-server"
        );
        assert_eq!(
            namer.resource_camel("Node Server", &daniel()),
            "spicedlingFinalProjectJasmineDanielStreif/nodeServer"
        );
        assert_eq!(
            namer.resource_pascal("Node Server", &daniel()),
            "SpicedlingFinalProjectJasmineDanielStreif/nodeServer"
        );
        assert_eq!(
            namer.resource_pascal_without_separator("BuildRole", &daniel()),
            "SpicedlingFinalProjectJasmineDanielStreifBuildRole"
        );
        assert_eq!(
            namer.resource_camel_without_separator("BuildRole", &daniel()),
            "spicedlingFinalProjectJasmineDanielStreifBuildRole"
        );
    }

    #[test]
    fn kebab_and_camel_differ_only_by_casing() {
        let namer = Namer::default();
        for identity in [daniel(), magali()] {
            for resource in ["Node Server", "Postgres", "artifact", "Build Role 2"] {
                let kebab = namer.resource_kebab(resource, &identity);
                let camel = namer.resource_camel(resource, &identity);
                assert_eq!(kebab, namer.resource_kebab(resource, &identity));

                let kebab_tokens: Vec<String> = kebab
                    .split(['-', '/'])
                    .map(str::to_string)
                    .collect();
                let camel_tokens: Vec<String> = crate::case::words(&camel.replace('/', " "))
                    .into_iter()
                    .map(|word| word.to_lowercase())
                    .collect();
                assert_eq!(kebab_tokens, camel_tokens, "{resource} for {identity:?}");
            }
        }
    }

    #[test]
    fn stack_tags() {
        let tags = Namer::default().stack_tags(PIPELINE_ROLE, &daniel());
        assert_eq!(tags.application_group, "Spicedlings Final Projects");
        assert_eq!(tags.application, "Spicedling Final Project Jasmine Daniel Streif");
        assert_eq!(tags.application_role, "Pipeline");
        assert_eq!(tags.spicedling_name, "Daniel Streif");
        assert_eq!(tags.spicedling_cohort, "Jasmine");

        let rendered = toml::to_string(&tags).unwrap();
        assert!(rendered.contains("ApplicationGroup = \"Spicedlings Final Projects\""));
        assert!(rendered.contains("SpicedlingCohort = \"Jasmine\""));
    }

    #[test]
    fn custom_prefix_is_used_everywhere() {
        let naming = NamingSettings {
            stack_prefix: "Bootcamp".to_string(),
            ..NamingSettings::default()
        };
        let namer = Namer::new(&naming);
        assert_eq!(namer.stack_name("Services", &daniel()), "BootcampServicesJasmineDanielStreif");
        assert_eq!(namer.resource_kebab("db", &daniel()), "bootcamp-jasmine-daniel-streif/db");
    }

    #[test]
    fn ascii_strips_non_ascii() {
        assert_eq!(
            ascii("Fargate Service - Jasmine - Magali Gonçalves da Silva"),
            "Fargate Service - Jasmine - Magali Gonalves da Silva"
        );
        assert_eq!(ascii("plain"), "plain");
        assert_eq!(ascii("del\u{7f}"), "del");
    }
}
