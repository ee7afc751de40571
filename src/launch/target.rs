use std::path::{Path, PathBuf};

/// Result of looking for the target script before it's invoked
#[derive(Debug, PartialEq, Eq)]
pub enum TargetCheck {
    Found(PathBuf),
    NotFound(PathBuf),
}

pub fn verify(path: &Path) -> TargetCheck {
    if path.is_file() {
        TargetCheck::Found(path.to_path_buf())
    } else {
        TargetCheck::NotFound(path.to_path_buf())
    }
}
