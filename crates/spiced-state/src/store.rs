//! PriorityStore: the priority table persisted as a JSON file.
//!
//! Every operation holds an advisory lock on a sidecar `<file>.lock` for
//! its whole read-modify-write, so overlapping deploys queue up instead of
//! handing out the same priority twice. Updates are written to a temporary
//! file and renamed over the table.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, info};

use crate::error::{StateError, StateResult};
use crate::table::PriorityTable;

/// Convert any `Display` error into a `StateError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StateError::$variant(e.to_string())
    };
}

/// File-backed priority table.
#[derive(Debug, Clone)]
pub struct PriorityStore {
    path: PathBuf,
}

/// Held for the duration of an operation; the lock is released on drop.
struct LockGuard {
    file: File,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

impl PriorityStore {
    /// Open an existing table. Fails when the file is missing.
    pub fn open(path: &Path) -> StateResult<Self> {
        if !path.is_file() {
            return Err(StateError::NotFound(path.display().to_string()));
        }
        debug!(?path, "priority table opened");
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Create an empty table (`{}`) unless one exists already.
    pub fn init(path: &Path) -> StateResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(map_err!(Write))?;
        }
        let store = Self {
            path: path.to_path_buf(),
        };
        let _guard = store.lock(true)?;
        if path.is_file() {
            debug!(?path, "priority table already exists");
        } else {
            store.write_table(&PriorityTable::new())?;
            info!(?path, "created empty priority table");
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Priority of `stack_name`, allocating the next free one on first use.
    ///
    /// Calling this again with the same name returns the same value and
    /// leaves the file untouched.
    pub fn allocate(&self, stack_name: &str) -> StateResult<u32> {
        let _guard = self.lock(true)?;
        let mut table = self.read_table()?;
        let (priority, inserted) = table.allocate(stack_name)?;
        if inserted {
            self.write_table(&table)?;
            info!(stack = stack_name, priority, "allocated target group priority");
        } else {
            debug!(stack = stack_name, priority, "reusing target group priority");
        }
        Ok(priority)
    }

    /// Priority of `stack_name` without allocating.
    pub fn get(&self, stack_name: &str) -> StateResult<Option<u32>> {
        let _guard = self.lock(false)?;
        Ok(self.read_table()?.get(stack_name))
    }

    /// Snapshot of the whole table.
    pub fn load(&self) -> StateResult<PriorityTable> {
        let _guard = self.lock(false)?;
        self.read_table()
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    fn lock(&self, exclusive: bool) -> StateResult<LockGuard> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.lock_path())
            .map_err(map_err!(Lock))?;
        if exclusive {
            file.lock_exclusive().map_err(map_err!(Lock))?;
        } else {
            file.lock_shared().map_err(map_err!(Lock))?;
        }
        Ok(LockGuard { file })
    }

    fn read_table(&self) -> StateResult<PriorityTable> {
        let content = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StateError::NotFound(self.path.display().to_string()),
            _ => StateError::Read(e.to_string()),
        })?;
        let entries: BTreeMap<String, u32> =
            serde_json::from_str(&content).map_err(map_err!(Deserialize))?;
        PriorityTable::from_entries(entries)
    }

    fn write_table(&self, table: &PriorityTable) -> StateResult<()> {
        let mut content =
            serde_json::to_string_pretty(table.entries()).map_err(map_err!(Serialize))?;
        content.push('\n');

        let mut tmp = self.path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, content).map_err(map_err!(Write))?;
        fs::rename(&tmp, &self.path).map_err(map_err!(Write))?;
        debug!(path = ?self.path, entries = table.len(), "priority table written");
        Ok(())
    }
}
