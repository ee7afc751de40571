//! Render SGE job scripts and submit them

/// Render the `#$` directive block and launcher call with TinyTemplate
pub mod script;

/// Run qsub on a rendered script
pub mod submit;
