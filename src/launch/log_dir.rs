use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::job::spec::LogDirLayout;
use crate::launch::task::TaskId;

impl LogDirLayout {
    /// `<base>/<component>_<task id>`
    pub fn path_for(&self, task_id: &TaskId) -> PathBuf {
        self.base.join(format!("{}_{}", self.component, task_id.as_str()))
    }

    /// Create the task's log directory and any missing parents
    ///
    /// Existing directories are left alone, so reruns of the same task succeed.
    pub fn ensure(&self, task_id: &TaskId) -> Result<PathBuf> {
        let path = self.path_for(task_id);
        fs::create_dir_all(&path)
            .with_context(|| format!("Can't create log directory {}", path.display()))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(base: PathBuf) -> LogDirLayout {
        LogDirLayout { base, component: "PPO".to_string() }
    }

    #[test]
    fn joins_component_and_task_id() {
        let task: TaskId = "3".parse().unwrap();
        assert_eq!(LogDirLayout::default().path_for(&task), PathBuf::from("Terrain/PPO_3"));
    }

    #[test]
    fn creation_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let layout = layout(dir.path().join("Terrain"));
        let task: TaskId = "7".parse().unwrap();

        let first = layout.ensure(&task).unwrap();
        let second = layout.ensure(&task).unwrap();

        assert_eq!(first, second);
        assert!(first.is_dir());
        assert!(dir.path().join("Terrain/PPO_7").is_dir());
    }

    #[test]
    fn fails_when_base_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("Terrain");
        fs::write(&base, "not a directory").unwrap();
        let task: TaskId = "1".parse().unwrap();

        let err = layout(base).ensure(&task).unwrap_err();
        assert!(err.to_string().contains("Can't create log directory"));
    }
}
