//! Settings, projects and the priority table of a checkout.

use std::path::Path;

use anyhow::{Context, Result};
use spiced_core::{Namer, ProjectCatalog, ProjectEntry, Settings, SpicedlingIdentity};
use spiced_pack::ServiceContext;
use spiced_state::PriorityStore;
use tracing::debug;

pub struct Workspace {
    pub settings: Settings,
    pub namer: Namer,
    pub catalog: ProjectCatalog,
}

impl Workspace {
    pub fn load(root: &Path) -> Result<Self> {
        let settings = Settings::load(root)
            .with_context(|| format!("failed to load settings from {}", root.display()))?;
        debug!(
            projects = %settings.paths.projects_dir.display(),
            priorities = %settings.paths.priorities_file.display(),
            "workspace loaded"
        );
        Ok(Self {
            namer: Namer::from_settings(&settings),
            catalog: ProjectCatalog::new(&settings.paths.projects_dir),
            settings,
        })
    }

    /// Project addressed as `<cohort>/<file>`.
    pub fn project(&self, configs_path: &str) -> Result<ProjectEntry> {
        self.catalog
            .resolve(configs_path)
            .with_context(|| format!("unknown project {configs_path}"))
    }

    pub fn priorities(&self) -> Result<PriorityStore> {
        let path = &self.settings.paths.priorities_file;
        PriorityStore::open(path)
            .with_context(|| format!("failed to open priority table {}", path.display()))
    }

    pub fn context<'a>(&'a self, identity: &'a SpicedlingIdentity) -> ServiceContext<'a> {
        ServiceContext {
            identity,
            namer: &self.namer,
            settings: &self.settings,
        }
    }
}
