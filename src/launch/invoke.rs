use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use anyhow::{Context, Result};
use log::info;

use crate::launch::runtime::Activation;

/// Exit status of the target, passed through untranslated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskExit {
    pub code: i32,
}

impl From<ExitStatus> for TaskExit {
    fn from(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return TaskExit { code };
        }
        // killed by a signal, report it the way a shell would
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return TaskExit { code: 128 + signal };
            }
        }
        TaskExit { code: 1 }
    }
}

/// Build the command for the target script, with no arguments of its own
pub fn command(script: &Path, interpreter: Option<&str>, activation: &Activation) -> Command {
    let mut cmd = match interpreter {
        Some(interpreter) => {
            let mut cmd = Command::new(interpreter);
            cmd.arg(script);
            cmd
        }
        None => Command::new(executable_path(script)),
    };
    cmd.envs(activation.vars.iter().map(|(key, value)| (key, value)));
    cmd.stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    cmd
}

/// Run the target in the foreground and wait for it to exit
pub fn invoke(
    script: &Path,
    interpreter: Option<&str>,
    activation: &Activation,
) -> Result<TaskExit> {
    let mut cmd = command(script, interpreter, activation);
    info!("{:?}", &cmd);
    let status = cmd
        .status()
        .with_context(|| format!("Failed to start {}", script.display()))?;
    Ok(TaskExit::from(status))
}

/// Relative scripts run from the working directory, not from PATH
fn executable_path(script: &Path) -> PathBuf {
    if script.is_relative() {
        Path::new(".").join(script)
    } else {
        script.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn script(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("task.sh");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn propagates_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let ok = script(dir.path(), "exit 0\n");
        assert_eq!(invoke(&ok, Some("sh"), &Activation::default()).unwrap(), TaskExit { code: 0 });

        let failing = script(dir.path(), "exit 42\n");
        let exit = invoke(&failing, Some("sh"), &Activation::default()).unwrap();
        assert_eq!(exit, TaskExit { code: 42 });
    }

    #[test]
    fn child_sees_activated_environment() {
        let dir = tempfile::tempdir().unwrap();
        let check = script(dir.path(), "[ \"$CONDA_DEFAULT_ENV\" = rl ] || exit 3\n");
        let activation = Activation {
            name: Some("rl".to_string()),
            vars: vec![("CONDA_DEFAULT_ENV".to_string(), "rl".into())],
        };
        assert_eq!(invoke(&check, Some("sh"), &activation).unwrap().code, 0);
        assert_eq!(invoke(&check, Some("sh"), &Activation::default()).unwrap().code, 3);
    }

    #[cfg(unix)]
    #[test]
    fn interpreter_resolves_against_activated_path() {
        use std::os::unix::fs::symlink;

        use crate::job::spec::RuntimeEnvironment;
        use crate::launch::runtime::activate;

        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("envs/rl");
        fs::create_dir_all(prefix.join("bin")).unwrap();
        // interpreter that only exists inside the environment
        symlink("/bin/sh", prefix.join("bin/qlaunch-env-sh")).unwrap();
        let task = script(dir.path(), "exit 7\n");

        let environment = RuntimeEnvironment { prefix, name: None };
        let activation = activate(Some(&environment), std::env::var_os("PATH")).unwrap();

        let exit = invoke(&task, Some("qlaunch-env-sh"), &activation).unwrap();
        assert_eq!(exit, TaskExit { code: 7 });
        assert!(invoke(&task, Some("qlaunch-env-sh"), &Activation::default()).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn signal_maps_to_shell_convention() {
        let dir = tempfile::tempdir().unwrap();
        let killed = script(dir.path(), "kill -9 $$\n");
        assert_eq!(invoke(&killed, Some("sh"), &Activation::default()).unwrap().code, 137);
    }

    #[test]
    fn relative_scripts_are_anchored_to_working_directory() {
        assert_eq!(executable_path(Path::new("train.sh")), PathBuf::from("./train.sh"));
        assert_eq!(executable_path(Path::new("/opt/train.sh")), PathBuf::from("/opt/train.sh"));
    }

    #[test]
    fn missing_interpreter_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let ok = script(dir.path(), "exit 0\n");
        let missing = Some("qlaunch-no-such-interpreter");
        let err = invoke(&ok, missing, &Activation::default()).unwrap_err();
        assert!(err.to_string().contains("Failed to start"));
    }
}
