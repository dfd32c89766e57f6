//! Simulator executable lookup.

use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Resolve the configured executable to a runnable file.
///
/// A bare name (`ngspice`) is searched on `PATH`. An explicit path is used
/// if it exists; otherwise its file name is searched on `PATH`, so a stale
/// `/usr/bin/ngspice` still finds `/usr/local/bin/ngspice`.
pub fn locate_executable(configured: &Path) -> Option<PathBuf> {
    let explicit = configured.components().count() > 1 || configured.is_absolute();

    if explicit {
        if is_executable_file(configured) {
            return Some(configured.to_path_buf());
        }
        log::warn!(
            "configured simulator {} not found, searching PATH",
            configured.display()
        );
    }

    search_path(configured.file_name()?)
}

/// Find `name` in the directories listed in `PATH`.
pub fn search_path(name: &OsStr) -> Option<PathBuf> {
    let path = env::var_os("PATH")?;
    search_dirs(name, env::split_paths(&path))
}

/// Find `name` in `dirs`, first match wins.
pub fn search_dirs<I>(name: &OsStr, dirs: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    dirs.into_iter()
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable_file(candidate))
}

#[cfg(unix)]
fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable_file(path: &Path) -> bool {
    path.is_file()
}
