//! Candidate scripts in the source directory.
//!
//! Discovery lists the source directory and checks every filename against
//! the kebab-case naming rule before anything is installed.

pub mod discovery;
pub mod naming;

pub use discovery::{discover, locate_source_dir, CandidateScript, Discovery};
pub use naming::is_valid_script_name;
