use std::fmt;
use std::str::FromStr;

/// Task identifier handed out by the scheduler
///
/// SGE sets `SGE_TASK_ID` to the array index, or to `undefined` outside array jobs. The token
/// ends up in a directory name, so it can't be empty or contain path separators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskId(String);

impl TaskId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum TaskIdError {
    Empty,
    PathLike(String),
}

impl fmt::Display for TaskIdError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TaskIdError::Empty => write!(f, "task id is empty"),
            TaskIdError::PathLike(id) => {
                write!(f, "task id '{id}' can't be used as a directory name")
            }
        }
    }
}

impl std::error::Error for TaskIdError {}

impl FromStr for TaskId {
    type Err = TaskIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim();
        if id.is_empty() {
            return Err(TaskIdError::Empty);
        }
        if id == "." || id == ".." || id.contains(['/', '\\']) {
            return Err(TaskIdError::PathLike(id.to_string()));
        }
        Ok(TaskId(id.to_string()))
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
