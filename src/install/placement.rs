//! Putting a single script in place.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::error::InstallError;

/// How scripts land in the install directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstallMode {
    /// Independent copy of the script, marked executable.
    #[default]
    Copy,
    /// Symbolic link back to the script in the source directory.
    Symlink,
}

impl fmt::Display for InstallMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Copy => f.write_str("copy"),
            Self::Symlink => f.write_str("symlink"),
        }
    }
}

/// Whether anything (including a dangling symlink) occupies `path`.
pub fn destination_exists(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Replace whatever is at `destination` with `source`.
///
/// Refuses when `destination` resolves to the source file itself, since
/// removing it would delete the script.
pub fn place(source: &Path, destination: &Path, mode: InstallMode) -> Result<(), InstallError> {
    if is_same_file(source, destination) {
        return Err(InstallError::SameFile(destination.to_path_buf()));
    }
    remove_existing(destination)?;
    match mode {
        InstallMode::Copy => copy_executable(source, destination),
        InstallMode::Symlink => link(source, destination),
    }
}

/// A destination symlink is never the same file: removing it only drops the link.
fn is_same_file(source: &Path, destination: &Path) -> bool {
    let is_link = destination
        .symlink_metadata()
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false);
    if is_link {
        return false;
    }
    match (source.canonicalize(), destination.canonicalize()) {
        (Ok(source), Ok(destination)) => source == destination,
        _ => false,
    }
}

fn remove_existing(destination: &Path) -> Result<(), InstallError> {
    match destination.symlink_metadata() {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(InstallError::io("inspect", destination, err)),
        Ok(meta) if meta.is_dir() => Err(InstallError::DestinationIsDirectory(
            destination.to_path_buf(),
        )),
        Ok(_) => fs::remove_file(destination)
            .map_err(|err| InstallError::io("remove", destination, err)),
    }
}

fn copy_executable(source: &Path, destination: &Path) -> Result<(), InstallError> {
    fs::copy(source, destination).map_err(|err| InstallError::io("copy to", destination, err))?;
    make_executable(destination)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<(), InstallError> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)
        .map_err(|err| InstallError::io("inspect", path, err))?
        .permissions();
    let mode = perms.mode();
    // Execute wherever read is allowed, and always for the owner
    perms.set_mode(mode | ((mode & 0o444) >> 2) | 0o100);
    fs::set_permissions(path, perms).map_err(|err| InstallError::io("chmod", path, err))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<(), InstallError> {
    Ok(())
}

fn link(source: &Path, destination: &Path) -> Result<(), InstallError> {
    let target = source
        .canonicalize()
        .map_err(|err| InstallError::io("resolve", source, err))?;

    #[cfg(unix)]
    let linked = std::os::unix::fs::symlink(&target, destination);
    #[cfg(windows)]
    let linked = std::os::windows::fs::symlink_file(&target, destination);

    linked.map_err(|err| InstallError::io("symlink", destination, err))
}
