use std::env;
use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use log::{error, info};

use crate::job::spec::JobSpec;
use crate::launch::invoke::{invoke, TaskExit};
use crate::launch::runtime::activate;
use crate::launch::target::{verify, TargetCheck};
use crate::launch::task::TaskId;

/// One array task's launch: scheduler-provided identity plus the job it belongs to
pub struct Launcher {
    pub task_id: TaskId,
    pub job: JobSpec,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The target ran, its status is the launcher's status
    Exited(TaskExit),
    MissingTarget(PathBuf),
}

impl Outcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Exited(exit) => exit.code,
            Outcome::MissingTarget(_) => 1,
        }
    }
}

impl Launcher {
    pub fn new(task_id: TaskId, job: JobSpec) -> Self {
        Launcher { task_id, job }
    }

    /// Activate the environment, create the log directory, check the target, then run it
    ///
    /// The log directory is created before the target is checked, so it exists even when the
    /// target is missing.
    pub fn run(&self) -> Result<Outcome> {
        let activation = activate(self.job.environment.as_ref(), env::var_os("PATH"))?;
        info!("{}", activation.describe());

        let log_dir = self.job.log_dir.ensure(&self.task_id)?;
        info!("log_dir created: {}", log_dir.display());

        let script = match verify(&self.job.target.path) {
            TargetCheck::Found(script) => script,
            TargetCheck::NotFound(script) => {
                error!("Target script not found: {}", script.display());
                return Ok(Outcome::MissingTarget(script));
            }
        };

        info!("About to run {} for task {}", script.display(), self.task_id);
        info!("Starting at {} on host {}", Local::now().to_rfc3339(), host_name());

        let exit = invoke(&script, self.job.target.interpreter.as_deref(), &activation)?;
        info!("{} exited with status {}", script.display(), exit.code);
        Ok(Outcome::Exited(exit))
    }
}

fn host_name() -> String {
    hostname::get()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "unknown".to_string())
}
