use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::job::spec::RuntimeEnvironment;

/// Environment variables the child process gets on top of the launcher's own
#[derive(Debug, Default, PartialEq)]
pub struct Activation {
    pub name: Option<String>,
    pub vars: Vec<(String, OsString)>,
}

impl Activation {
    pub fn describe(&self) -> String {
        match &self.name {
            Some(name) => format!("runtime environment {name} loaded"),
            None => "no runtime environment configured, using inherited environment".to_string(),
        }
    }
}

/// Activate a conda-style environment by prefix
///
/// `<prefix>/bin` goes to the front of `current_path`, and `CONDA_PREFIX` / `CONDA_DEFAULT_ENV`
/// are set the way `conda activate` would.
pub fn activate(
    environment: Option<&RuntimeEnvironment>,
    current_path: Option<OsString>,
) -> Result<Activation> {
    let environment = match environment {
        Some(environment) => environment,
        None => return Ok(Activation::default()),
    };

    let bin = environment.prefix.join("bin");
    if !bin.is_dir() {
        bail!(
            "Runtime environment {} has no bin directory at {}",
            environment.display_name(),
            bin.display()
        );
    }

    let mut paths: Vec<PathBuf> = vec![bin];
    if let Some(current) = current_path {
        paths.extend(env::split_paths(&current));
    }
    let path = env::join_paths(paths).context("Can't build PATH for runtime environment")?;
    let name = environment.display_name();

    Ok(Activation {
        vars: vec![
            ("PATH".to_string(), path),
            ("CONDA_PREFIX".to_string(), environment.prefix.clone().into_os_string()),
            ("CONDA_DEFAULT_ENV".to_string(), OsString::from(&name)),
        ],
        name: Some(name),
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn no_environment_is_a_no_op() {
        let activation = activate(None, Some(OsString::from("/usr/bin"))).unwrap();
        assert_eq!(activation, Activation::default());
        assert!(activation.describe().starts_with("no runtime environment"));
    }

    #[test]
    fn prepends_bin_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("envs/rl");
        fs::create_dir_all(prefix.join("bin")).unwrap();
        let environment = RuntimeEnvironment { prefix: prefix.clone(), name: None };

        let current = Some(OsString::from("/usr/bin:/bin"));
        let activation = activate(Some(&environment), current).unwrap();

        assert_eq!(activation.name.as_deref(), Some("rl"));
        let (key, path) = &activation.vars[0];
        assert_eq!(key, "PATH");
        let paths: Vec<PathBuf> = env::split_paths(path).collect();
        let expected = vec![prefix.join("bin"), PathBuf::from("/usr/bin"), PathBuf::from("/bin")];
        assert_eq!(paths, expected);
        assert!(activation.vars.contains(&("CONDA_DEFAULT_ENV".to_string(), OsString::from("rl"))));
        assert!(activation.vars.contains(&("CONDA_PREFIX".to_string(), prefix.into_os_string())));
    }

    #[test]
    fn missing_prefix_fails() {
        let dir = tempfile::tempdir().unwrap();
        let environment = RuntimeEnvironment {
            prefix: dir.path().join("missing"),
            name: Some("rl".to_string()),
        };
        let err = activate(Some(&environment), None).unwrap_err();
        assert!(err.to_string().contains("has no bin directory"));
    }
}
