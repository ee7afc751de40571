use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use jsonschema::JSONSchema;
use log::{info, warn};
use serde_json::Value;

use crate::job::spec::JobSpec;

#[derive(Debug)]
pub enum JobError {
    ReadError(String),
    JSONDecodeError(String),
    JSONValidationError(Vec<String>),
    DeserialisationError(String),
    ArrayRangeError { first: u32, last: u32 },
}

impl fmt::Display for JobError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            JobError::ReadError(err) => write!(f, "can't read job description: {err}"),
            JobError::JSONDecodeError(err) => write!(f, "job description isn't valid JSON: {err}"),
            JobError::JSONValidationError(errors) => {
                write!(f, "job description fails validation: {}", errors.join("; "))
            }
            JobError::DeserialisationError(err) => {
                write!(f, "can't deserialise job description: {err}")
            }
            JobError::ArrayRangeError { first, last } => {
                write!(f, "array range {first}-{last} is empty, first must not exceed last")
            }
        }
    }
}

impl std::error::Error for JobError {}

/// A job description file on disk and the schema it must satisfy
pub struct JobFile {
    pub path: PathBuf,
    pub compiled_schema: JSONSchema,
}

impl JobFile {
    pub fn read(&self) -> Result<JobSpec, JobError> {
        let json: Value = self.parse_untyped_json()?;

        match self.validate(&json) {
            Ok(_) => {
                info!("Job description is valid");
                let job = self.parse_json(json)?;
                check_array(&job)?;
                Ok(job)
            }
            Err(err) => {
                warn!("Job description fails validation");
                Err(err)
            }
        }
    }

    fn validate(&self, json: &Value) -> Result<(), JobError> {
        info!("Validating job description against JSON schema");
        self.compiled_schema.validate(json).map_err(|errors| {
            let messages = errors
                .map(|err| format!("{} (at '{}')", err, err.instance_path))
                .collect();
            JobError::JSONValidationError(messages)
        })
    }

    fn read_file(&self) -> Result<String, JobError> {
        let path: &Path = self.path.as_path();
        info!("Reading job description at {}", path.display());
        fs::read_to_string(path).map_err(|err| {
            warn!("Can't read job description at path {}: {}", path.display(), err);
            JobError::ReadError(format!("{}: {}", path.display(), err))
        })
    }

    fn parse_json(&self, value: Value) -> Result<JobSpec, JobError> {
        serde_json::from_value::<JobSpec>(value)
            .map_err(|err| JobError::DeserialisationError(err.to_string()))
    }

    fn parse_untyped_json(&self) -> Result<Value, JobError> {
        let json_string = self.read_file()?;
        serde_json::from_str::<Value>(&json_string)
            .map_err(|err| JobError::JSONDecodeError(err.to_string()))
    }
}

fn check_array(job: &JobSpec) -> Result<(), JobError> {
    match &job.array {
        Some(array) if !array.is_ordered() => {
            Err(JobError::ArrayRangeError { first: array.first, last: array.last })
        }
        _ => Ok(()),
    }
}
