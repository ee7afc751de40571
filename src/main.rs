use std::env;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::{error, info};

use crate::job::load_job;
use crate::launch::launcher::Launcher;
use crate::launch::task::TaskId;
use crate::sge::script::Invocation;

mod job;
mod launch;
mod sge;

/// Launch reinforcement learning training jobs on SGE
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Prepare the task's log directory and run the training script (on the execution host)
    Run {
        /// Job description JSON, defaults apply when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Array task identifier, set by SGE
        #[arg(long, env = "SGE_TASK_ID", default_value = "undefined")]
        task_id: TaskId,
        /// Job name, set by SGE
        #[arg(long, env = "JOB_NAME")]
        job_name: Option<String>,
    },
    /// Write an SGE job script that calls `qlaunch run`
    Render {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Path of the job script to write
        #[arg(short, long, default_value = "job.sh")]
        out: PathBuf,
    },
    /// Render the job script and submit it with qsub
    Submit {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long, default_value = "job.sh")]
        out: PathBuf,
        /// qsub executable
        #[arg(long, default_value = "qsub")]
        qsub: PathBuf,
        /// Render the script but don't submit it
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match dispatch(args.command) {
        Ok(code) => process::exit(code),
        Err(err) => {
            error!("{err:#}");
            process::exit(1);
        }
    }
}

fn dispatch(command: Command) -> Result<i32> {
    match command {
        Command::Run { config, task_id, job_name } => {
            let job_name = job_name.as_deref().unwrap_or("(unnamed)");
            info!("terve! starting task {} of job {}", task_id, job_name);
            let job = load_job(config.as_deref())?;
            let outcome = Launcher::new(task_id, job).run()?;
            Ok(outcome.exit_code())
        }
        Command::Render { config, out } => {
            let job = load_job(config.as_deref())?;
            let script = job.stage(&invocation(config.as_deref())?, &out)?;
            info!("Job script written to {}", script.path.display());
            Ok(0)
        }
        Command::Submit { config, out, qsub, dry_run } => {
            let job = load_job(config.as_deref())?;
            let script = job.stage(&invocation(config.as_deref())?, &out)?;
            script.submit(&qsub, dry_run)?;
            Ok(0)
        }
    }
}

/// The rendered script calls this binary back with an absolute config path
fn invocation(config: Option<&Path>) -> Result<Invocation> {
    let launcher = env::current_exe().context("Can't locate the qlaunch executable")?;
    let config = config
        .map(|path| {
            path.canonicalize()
                .with_context(|| format!("Can't resolve {}", path.display()))
        })
        .transpose()?;
    Ok(Invocation { launcher, config })
}
