use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use log::info;
use serde::Serialize;
use tinytemplate::{format_unescaped, TinyTemplate};

use crate::job::spec::JobSpec;

/// A JobScript is the path to a job script that's submitted to SGE via qsub
#[derive(Debug)]
pub struct JobScript {
    pub path: PathBuf,
}

/// How the rendered script calls back into the launcher
pub struct Invocation {
    /// qlaunch binary the job runs on the execution host
    pub launcher: PathBuf,
    /// Job description passed to `qlaunch run`, absolute so it survives `-cwd` changes
    pub config: Option<PathBuf>,
}

impl JobSpec {
    /// Render the job script and write it to `out_path`, replacing any existing file
    pub fn stage(&self, invocation: &Invocation, out_path: &Path) -> Result<JobScript> {
        info!("Rendering job {} to {}", self.name, out_path.display());
        let content = self.render(invocation)?;

        let mut file = File::create(out_path)
            .with_context(|| format!("Can't write job script {}", out_path.display()))?;
        file.write_all(content.as_bytes())?;

        Ok(JobScript { path: out_path.to_path_buf() })
    }

    /// Complete job script: `#$` directives first, then the launcher call
    pub fn render(&self, invocation: &Invocation) -> Result<String> {
        let header = render_header(self)?;
        let body = render_body(self, invocation)?;
        // order is important, qsub stops reading directives at the first command
        Ok(format!("{}{}", header.content, body.content))
    }
}

/// Rendered `#$` header
///
/// SGE reads `#$` lines as qsub options. A disabled array range is rendered as `##$`, which SGE
/// ignores, so it can be switched on by editing one character.
struct Header {
    content: String,
}

/// Rendered commands: hand over to `qlaunch run` on the execution host
struct Body {
    content: String,
}

/// Rendering context for header
#[derive(Serialize)]
struct HeaderContext {
    name: String,
    time_now: String,
    cwd: bool,
    pe_name: String,
    slots: u32,
    memory: String,
    stdout: String,
    stderr: String,
    join_output: bool,
    array: Option<String>,
    array_enabled: bool,
}

/// Rendering context for body, paths are already shell quoted
#[derive(Serialize)]
struct BodyContext {
    environment: Option<String>,
    launcher: String,
    config: Option<String>,
}

/// Wrap `value` in single quotes for bash, `'` becomes `'\''`
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Directive values are copied verbatim, a line break would start a new `#$` line
fn single_line<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    if value.chars().any(char::is_control) {
        bail!("{field} can't contain control characters: {value:?}");
    }
    Ok(value)
}

fn template(name: &'static str, text: &'static str) -> Result<TinyTemplate<'static>> {
    let mut tt = TinyTemplate::new();
    tt.set_default_formatter(&format_unescaped);
    tt.add_template(name, text)?;
    Ok(tt)
}

/// Render the `#$` header using TinyTemplate
fn render_header(job: &JobSpec) -> Result<Header> {
    /// included header template
    static HEADER: &str =
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/templates/header.txt"));
    let tt = template("header", HEADER)?;

    let context = HeaderContext {
        name: single_line("name", &job.name)?.to_string(),
        time_now: Utc::now().to_string(),
        cwd: job.cwd,
        pe_name: single_line("parallel environment", &job.parallel_environment.name)?.to_string(),
        slots: job.parallel_environment.slots,
        memory: single_line("memory", &job.memory)?.to_string(),
        stdout: single_line("stdout", &job.stdout)?.to_string(),
        stderr: single_line("stderr", &job.stderr)?.to_string(),
        join_output: job.join_output,
        array: job.array.as_ref().map(|a| format!("{}-{}:{}", a.first, a.last, a.step)),
        array_enabled: job.array.as_ref().map_or(false, |a| a.enabled),
    };

    Ok(Header { content: tt.render("header", &context)? })
}

/// Render the launcher call using TinyTemplate
fn render_body(job: &JobSpec, invocation: &Invocation) -> Result<Body> {
    /// included body template
    static BODY: &str =
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/templates/body.txt"));
    let tt = template("body", BODY)?;

    let environment = match &job.environment {
        Some(environment) => {
            Some(single_line("environment", &environment.display_name())?.to_string())
        }
        None => None,
    };
    let context = BodyContext {
        environment,
        launcher: shell_quote(&invocation.launcher.display().to_string()),
        config: invocation.config.as_ref().map(|c| shell_quote(&c.display().to_string())),
    };

    Ok(Body { content: tt.render("body", &context)? })
}
