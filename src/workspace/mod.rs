use anyhow::{Context, Result};
use fs_err as fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use uuid::Uuid;

pub const SCRIPT_FILE: &str = "generated.py";
pub const STEP_FILE: &str = "model.step";
pub const STL_FILE: &str = "model.stl";

/// Scoped working directory for a single request: the assembled script, both
/// export targets, and any stage logs all live here, so concurrent or
/// back-to-back runs never share filesystem state.
///
/// Dropped without `persist()`, the directory and its contents are removed.
pub struct RunWorkspace {
    id: Uuid,
    dir: TempDir,
}

impl RunWorkspace {
    pub fn create(out_root: &Path) -> Result<Self> {
        fs::create_dir_all(out_root)?;
        // Absolute paths, so exports land here no matter what cwd the engine
        // interpreter decides to run with.
        let out_root = fs::canonicalize(out_root)?;
        let id = Uuid::new_v4();
        let dir = TempDir::with_prefix_in(format!("run-{id}-"), &out_root)
            .with_context(|| format!("failed to create run directory under {}", out_root.display()))?;
        Ok(Self { id, dir })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn script_path(&self) -> PathBuf {
        self.dir.path().join(SCRIPT_FILE)
    }

    pub fn step_path(&self) -> PathBuf {
        self.dir.path().join(STEP_FILE)
    }

    pub fn stl_path(&self) -> PathBuf {
        self.dir.path().join(STL_FILE)
    }

    pub fn write_script(&self, script: &str) -> Result<PathBuf> {
        let path = self.script_path();
        fs::write(&path, script)?;
        Ok(path)
    }

    /// Drop a named text artifact (stage log, captured output) into the run
    /// directory.
    pub fn save_text(&self, name: &str, text: &str) -> Result<PathBuf> {
        let path = self.dir.path().join(name);
        fs::write(&path, text)?;
        Ok(path)
    }

    /// Disarm cleanup and hand the directory over to the caller. Used after a
    /// successful run so the exports stay downloadable.
    pub fn persist(self) -> PathBuf {
        self.dir.keep()
    }
}
