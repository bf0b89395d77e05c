//! Shell integration: putting the install directory on `PATH`.

pub mod detect;
pub mod profile;

pub use detect::{detect_shell, startup_file, DetectedShell, ProfilePolicy, Shell};
pub use profile::{is_on_search_path, shell_path_value, PathUpdate, PATH_UPDATE_MARKER};
