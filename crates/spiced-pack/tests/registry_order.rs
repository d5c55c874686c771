use spiced_core::{Namer, ProjectConfig, Settings};
use spiced_pack::{ServiceContext, ServiceRegistry};

const PROJECT: &str = r#"
firstName = "Magali"
lastName = "Gonçalves da Silva"
cohort = "Jasmine"
subDomain = "petition"

[repository]
gitHubOwner = "magaligds"
repoName = "petition"

[[services]]
type = "postgres"
name = "Database"
configs = { dbSetupScriptPath = "./sql/setup.sql" }

[[services]]
type = "node-server"
name = "Web Server"
configs = { portEnvironmentVariable = "PORT", databaseUrlEnvironmentVariable = "DATABASE_URL" }
environment = { NODE_ENV = "production" }
secretEnvironmentVariables = ["AWS_KEY", "AWS_SECRET"]
randomSecretEnvironmentVariables = ["COOKIE_SECRET"]
"#;

fn settings() -> Settings {
    let mut settings = Settings::default();
    settings.database.postgres_password = Some("postgres-pw".to_string());
    settings
}

#[test]
fn project_services_build_in_file_order() {
    let project: ProjectConfig = toml::from_str(PROJECT).unwrap();
    let settings = settings();
    let namer = Namer::from_settings(&settings);
    let identity = project.identity();
    let ctx = ServiceContext {
        identity: &identity,
        namer: &namer,
        settings: &settings,
    };

    let registry = ServiceRegistry::from_configs(&project.services, &ctx).unwrap();
    let names: Vec<&str> = registry.services().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Database", "Web Server"]);

    assert_eq!(
        registry.repository_names(),
        [
            "spicedling-final-project-jasmine-magali-goncalves-da-silva/database",
            "spicedling-final-project-jasmine-magali-goncalves-da-silva/web-server",
        ]
    );

    let build = registry.build_commands(&settings.build);
    assert_eq!(build.len(), 14);
    assert!(build[6].contains("--build-arg RELATIVE_DB_SETUP_SCRIPT_PATH=./sql/setup.sql"));
    assert!(build[13].starts_with("docker build -f node-server-no-build.Dockerfile"));

    let web = registry.get("Web Server").unwrap();
    assert_eq!(web.environment()["NODE_ENV"], "production");
    assert_eq!(web.environment()["PORT"], "8080");
    assert!(web.environment()["DATABASE_URL"].contains(":postgres-pw@localhost:5432/"));

    assert_eq!(
        registry.warnings(),
        ["Make sure to add appropriate values in the secrets manager for the secrets of the service \"Web Server\": AWS_KEY,AWS_SECRET."]
    );
}

#[test]
fn buildspec_yaml_carries_every_phase() {
    let project: ProjectConfig = toml::from_str(PROJECT).unwrap();
    let settings = settings();
    let namer = Namer::from_settings(&settings);
    let identity = project.identity();
    let ctx = ServiceContext {
        identity: &identity,
        namer: &namer,
        settings: &settings,
    };
    let registry = ServiceRegistry::from_configs(&project.services, &ctx).unwrap();
    let yaml = registry.buildspec(&ctx).unwrap().to_yaml().unwrap();

    let value: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
    let post_build = value["phases"]["post_build"]["commands"].as_sequence().unwrap();
    assert_eq!(post_build.len(), 8);
    assert!(
        post_build
            .last()
            .and_then(|c| c.as_str())
            .unwrap()
            .ends_with("> imagedefinitions.json")
    );
    assert_eq!(
        value["phases"]["pre_build"]["commands"][2].as_str(),
        Some("$(aws ecr get-login --no-include-email --region $AWS_DEFAULT_REGION)")
    );
}
