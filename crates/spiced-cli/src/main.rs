use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod prompt;
mod workspace;

use commands::buildspec::Format;
use commands::deploy::{DeployArgs, Target};
use workspace::Workspace;

#[derive(Parser)]
#[command(
    name = "spicedlings",
    about = "Deploy the Spicedlings final projects",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Checkout holding spicedlings.toml, the projects and the priority table
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,
    /// Log as JSON lines instead of text
    #[arg(long, global = true)]
    json_logs: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy a stack of a student's project.
    ///
    /// Prompts for the cohort, the student and the stack unless given as
    /// flags, then runs `npx cdk deploy`.
    Deploy {
        /// Cohort directory name
        #[arg(long)]
        cohort: Option<String>,
        /// Project file name, with or without .toml
        #[arg(long)]
        student: Option<String>,
        #[arg(long, value_enum)]
        target: Option<Target>,
        /// Print the command instead of running it
        #[arg(long)]
        dry_run: bool,
    },
    /// Deploy the shared core stack
    Core {
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the names and tags derived for a project (<cohort>/<file>)
    Names { project: String },
    /// Manage the target group priority table
    Priority {
        #[command(subcommand)]
        action: PriorityAction,
    },
    /// Print the CodeBuild buildspec of a project
    Buildspec {
        project: String,
        #[arg(short, long, value_enum, default_value = "yaml")]
        format: Format,
    },
    /// Print the stack plan of a project as JSON
    Synth {
        project: String,
        /// Include the pipeline deploy stage
        #[arg(long)]
        fargate_deploy_stage: bool,
    },
    /// Print the effective settings
    Settings,
}

#[derive(Subcommand)]
enum PriorityAction {
    /// Print the priority of a stack, allocating one if needed
    Allocate { stack: String },
    /// List all allocated priorities
    List,
    /// Create an empty priority table if there is none
    Init,
}

fn init_tracing(json: bool) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("spiced=info".parse()?);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs)?;

    let ws = Workspace::load(&cli.root)?;

    match cli.command {
        Commands::Deploy {
            cohort,
            student,
            target,
            dry_run,
        } => commands::deploy::deploy(
            &ws,
            DeployArgs {
                cohort,
                student,
                target,
                dry_run,
            },
        ),
        Commands::Core { dry_run } => commands::core_stack::core(&ws, dry_run),
        Commands::Names { project } => commands::names::names(&ws, &project),
        Commands::Priority { action } => match action {
            PriorityAction::Allocate { stack } => commands::priority::allocate(&ws, &stack),
            PriorityAction::List => commands::priority::list(&ws),
            PriorityAction::Init => commands::priority::init(&ws),
        },
        Commands::Buildspec { project, format } => {
            commands::buildspec::buildspec(&ws, &project, format)
        }
        Commands::Synth {
            project,
            fargate_deploy_stage,
        } => commands::synth::synth(&ws, &project, fargate_deploy_stage),
        Commands::Settings => commands::settings::settings(&ws),
    }
}
