//! Run one array task: activate the runtime environment, prepare its log directory, and hand
//! over to the training script

/// Scheduler task identifiers
pub mod task;

/// Per-task log directory layout
pub mod log_dir;

/// Target script presence check
pub mod target;

/// Runtime environment activation
pub mod runtime;

/// Start the target and pass its exit status through
pub mod invoke;

/// The launch sequence for one task
pub mod launcher;
