//! CodeBuild build specification.

use serde::{Deserialize, Serialize};

use crate::error::{PackError, PackResult};

pub const BUILDSPEC_VERSION: &str = "0.2";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSpec {
    pub version: String,
    pub phases: Phases,
    pub artifacts: Artifacts,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phases {
    pub pre_build: Phase,
    pub build: Phase,
    pub post_build: Phase,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub commands: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifacts {
    pub files: Vec<String>,
    pub name: String,
}

impl BuildSpec {
    pub fn new(
        pre_build: Vec<String>,
        build: Vec<String>,
        post_build: Vec<String>,
        artifact_name: String,
    ) -> Self {
        Self {
            version: BUILDSPEC_VERSION.to_string(),
            phases: Phases {
                pre_build: Phase { commands: pre_build },
                build: Phase { commands: build },
                post_build: Phase {
                    commands: post_build,
                },
            },
            artifacts: Artifacts {
                files: vec!["**/*".to_string()],
                name: artifact_name,
            },
        }
    }

    pub fn to_yaml(&self) -> PackResult<String> {
        serde_yaml::to_string(self).map_err(|e| PackError::Render(e.to_string()))
    }

    pub fn to_json(&self) -> PackResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| PackError::Render(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> BuildSpec {
        BuildSpec::new(
            vec!["aws --version".to_string()],
            vec!["docker build -f postgres.Dockerfile -t repo:latest .".to_string()],
            vec!["docker push repo:latest".to_string()],
            "prefix/artifact".to_string(),
        )
    }

    #[test]
    fn yaml_has_the_codebuild_layout() {
        let yaml = spec().to_yaml().unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(value["version"].as_str(), Some("0.2"));
        assert_eq!(
            value["phases"]["pre_build"]["commands"][0].as_str(),
            Some("aws --version")
        );
        assert_eq!(value["artifacts"]["files"][0].as_str(), Some("**/*"));
        assert_eq!(value["artifacts"]["name"].as_str(), Some("prefix/artifact"));
    }

    #[test]
    fn version_stays_a_string_in_yaml() {
        let yaml = spec().to_yaml().unwrap();
        assert!(yaml.contains("version: '0.2'"), "{yaml}");
    }

    #[test]
    fn json_rendering() {
        let json: serde_json::Value = serde_json::from_str(&spec().to_json().unwrap()).unwrap();
        assert_eq!(
            json["phases"]["post_build"]["commands"],
            serde_json::json!(["docker push repo:latest"])
        );
    }
}
