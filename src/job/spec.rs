use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Everything needed to describe one training job to SGE and to the launcher
///
/// Every field has a default, so an empty JSON object (or no file at all) describes the PPO
/// terrain job.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct JobSpec {
    pub name: String,
    pub cwd: bool,
    pub parallel_environment: ParallelEnvironment,
    pub memory: String,
    pub stdout: String,
    pub stderr: String,
    pub join_output: bool,
    pub array: Option<ArrayRange>,
    pub environment: Option<RuntimeEnvironment>,
    pub log_dir: LogDirLayout,
    pub target: TargetScript,
}

impl Default for JobSpec {
    fn default() -> Self {
        JobSpec {
            name: "ppo_terrain".to_string(),
            cwd: true,
            parallel_environment: ParallelEnvironment::default(),
            memory: "4G".to_string(),
            stdout: "$JOB_NAME.o$JOB_ID.$TASK_ID".to_string(),
            stderr: "$JOB_NAME.e$JOB_ID.$TASK_ID".to_string(),
            join_output: false,
            array: None,
            environment: None,
            log_dir: LogDirLayout::default(),
            target: TargetScript::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ParallelEnvironment {
    pub name: String,
    pub slots: u32,
}

impl Default for ParallelEnvironment {
    fn default() -> Self {
        ParallelEnvironment { name: "smp".to_string(), slots: 8 }
    }
}

/// Array task range (`-t first-last:step`)
///
/// A range that isn't enabled is still rendered, but commented out so the scheduler ignores it.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ArrayRange {
    pub first: u32,
    pub last: u32,
    #[serde(default = "default_step")]
    pub step: u32,
    #[serde(default)]
    pub enabled: bool,
}

fn default_step() -> u32 {
    1
}

impl ArrayRange {
    pub fn is_ordered(&self) -> bool {
        self.first <= self.last
    }
}

/// A conda-style environment that is activated before the target runs
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RuntimeEnvironment {
    pub prefix: PathBuf,
    pub name: Option<String>,
}

impl RuntimeEnvironment {
    /// Display name, falls back to the last component of the prefix
    pub fn display_name(&self) -> String {
        match (&self.name, self.prefix.file_name()) {
            (Some(name), _) => name.clone(),
            (None, Some(file_name)) => file_name.to_string_lossy().into_owned(),
            (None, None) => self.prefix.display().to_string(),
        }
    }
}

/// Per-task log directories are `<base>/<component>_<task id>`
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LogDirLayout {
    pub base: PathBuf,
    pub component: String,
}

impl Default for LogDirLayout {
    fn default() -> Self {
        LogDirLayout { base: PathBuf::from("Terrain"), component: "PPO".to_string() }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TargetScript {
    pub path: PathBuf,
    #[serde(default = "default_interpreter")]
    pub interpreter: Option<String>,
}

fn default_interpreter() -> Option<String> {
    Some("python".to_string())
}

impl Default for TargetScript {
    fn default() -> Self {
        TargetScript {
            path: PathBuf::from("cluster_run.py"),
            interpreter: default_interpreter(),
        }
    }
}
