//! `spicedlings deploy`: pick a cohort, a student and a stack, then run
//! `npx cdk deploy` for it.
//!
//! The pipeline of a new project is deployed twice: once before the
//! Fargate service exists (so the first images get built), and once after
//! with `fargateDeployStage=true` to add the ECS deploy stage.

use std::fmt;
use std::io::{BufRead, Write};
use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use spiced_core::case::upper_first;
use spiced_core::{Namer, ProjectEntry};
use tracing::info;

use crate::prompt::select;
use crate::workspace::Workspace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Target {
    /// Pipeline without the deploy stage.
    Pipeline,
    FargateService,
    /// Pipeline with the deploy stage, once the Fargate service is up.
    PipelineDeployStage,
}

impl Target {
    pub const ALL: [Target; 3] = [
        Target::Pipeline,
        Target::FargateService,
        Target::PipelineDeployStage,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Target::Pipeline => "Pipeline [Step I]",
            Target::FargateService => "Fargate Service",
            Target::PipelineDeployStage => "Pipeline [Step II]",
        }
    }

    pub fn stack_name(&self, namer: &Namer, entry: &ProjectEntry) -> String {
        let identity = entry.directory_identity();
        match self {
            Target::Pipeline | Target::PipelineDeployStage => namer.pipeline_stack_name(&identity),
            Target::FargateService => namer.fargate_service_stack_name(&identity),
        }
    }

    fn context_args(&self) -> &'static [&'static str] {
        match self {
            Target::PipelineDeployStage => &["-c", "fargateDeployStage=true"],
            _ => &[],
        }
    }
}

/// A `cdk deploy` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CdkCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl CdkCommand {
    pub fn deploy(stack: &str) -> Self {
        Self {
            program: "npx".to_string(),
            args: vec!["cdk".to_string(), "deploy".to_string(), stack.to_string()],
        }
    }

    pub fn for_project(namer: &Namer, entry: &ProjectEntry, target: Target) -> Self {
        let mut command = Self::deploy(&target.stack_name(namer, entry));
        command
            .args
            .extend(target.context_args().iter().map(|a| a.to_string()));
        command.args.push("-c".to_string());
        command
            .args
            .push(format!("configsPath={}", entry.configs_path()));
        command
    }

    /// Run with inherited stdio; a non-zero exit is an error.
    pub fn run(&self) -> Result<()> {
        info!(command = %self, "running");
        let status = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .with_context(|| format!("failed to start {}", self.program))?;

        if !status.success() {
            let code = status.code().unwrap_or(-1);
            bail!("{self} exited with code {code}");
        }
        Ok(())
    }
}

impl fmt::Display for CdkCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.program, self.args.join(" "))
    }
}

#[derive(Debug, Default)]
pub struct DeployArgs {
    pub cohort: Option<String>,
    pub student: Option<String>,
    pub target: Option<Target>,
    pub dry_run: bool,
}

/// Resolve the deploy command, prompting for whatever `args` leaves open.
pub fn resolve<R: BufRead, W: Write>(
    ws: &Workspace,
    args: &DeployArgs,
    input: &mut R,
    output: &mut W,
) -> Result<CdkCommand> {
    let cohort = match &args.cohort {
        Some(cohort) => cohort.clone(),
        None => {
            let cohorts = ws.catalog.cohorts()?;
            let labels: Vec<String> = cohorts.iter().map(|c| upper_first(c)).collect();
            let index = select(input, output, "Which cohort would you like to deploy?", &labels)?;
            cohorts[index].clone()
        }
    };

    let entry = match &args.student {
        Some(student) => ws.catalog.project(&cohort, student)?,
        None => {
            let mut projects = ws.catalog.projects(&cohort)?;
            let labels: Vec<String> = projects.iter().map(ProjectEntry::display_name).collect();
            let index = select(input, output, "Which student would you like to deploy?", &labels)?;
            projects.swap_remove(index)
        }
    };

    let target = match args.target {
        Some(target) => target,
        None => {
            let labels: Vec<String> = Target::ALL.iter().map(|t| t.label().to_string()).collect();
            let index = select(input, output, "Which stack would you like to deploy?", &labels)?;
            Target::ALL[index]
        }
    };

    Ok(CdkCommand::for_project(&ws.namer, &entry, target))
}

pub fn deploy(ws: &Workspace, args: DeployArgs) -> Result<()> {
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stdout();
    let command = resolve(ws, &args, &mut input, &mut output)?;

    if args.dry_run {
        println!("{command}");
        return Ok(());
    }
    command.run()
}
