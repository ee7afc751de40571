//! Job descriptions: declarative scheduler metadata plus what the launcher runs
//!
//! A job description is an optional JSON file. It's validated against an embedded JSON schema
//! before being deserialised, and any field it leaves out takes the default PPO terrain value.

use std::path::Path;

use anyhow::Result;
use log::info;

use crate::job::read::JobFile;
use crate::job::spec::JobSpec;

/// Typed job description and its defaults
pub mod spec;

/// Compile the embedded JSON schema
pub mod schema;

/// Read, validate, and deserialise job description files
pub mod read;

/// Load the job description at `path`, or the default job when no path is given
pub fn load_job(path: Option<&Path>) -> Result<JobSpec> {
    match path {
        Some(path) => {
            let file = JobFile {
                path: path.to_path_buf(),
                compiled_schema: schema::load_schema()?,
            };
            Ok(file.read()?)
        }
        None => {
            info!("No job description given, using defaults");
            Ok(JobSpec::default())
        }
    }
}
