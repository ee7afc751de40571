use std::path::Path;
use std::process::Command;

use anyhow::{bail, Context, Result};
use log::info;

use crate::sge::script::JobScript;

impl JobScript {
    /// Hand the script to qsub
    ///
    /// qsub's reply is logged as-is. With `dry_run` set the command is only logged.
    pub fn submit(&self, qsub: &Path, dry_run: bool) -> Result<()> {
        let mut cmd = self.qsub_command(qsub);
        if dry_run {
            info!("--dry-run set, not submitting: {:?}", &cmd);
            return Ok(());
        }

        info!("Running qsub process");
        info!("{:?}", &cmd);
        let output = cmd
            .output()
            .with_context(|| format!("Failed to execute {}", qsub.display()))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            info!("{}", stdout.trim());
        }
        if !output.status.success() {
            bail!(
                "{} exited with {}: {}",
                qsub.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(())
    }

    fn qsub_command(&self, qsub: &Path) -> Command {
        let mut cmd = Command::new(qsub);
        cmd.arg(&self.path);
        cmd
    }
}
