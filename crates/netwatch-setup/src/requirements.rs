//! External tools the dashboard shells out to, and how to find them.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// A system program the dashboard depends on, and the apt package that provides it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirement {
    pub program: &'static str,
    pub package: &'static str,
    /// Required tools make the dashboard useless when absent.
    pub required: bool,
    pub purpose: &'static str,
}

pub const REQUIREMENTS: &[Requirement] = &[
    Requirement {
        program: "netstat",
        package: "net-tools",
        required: true,
        purpose: "lists established TCP connections",
    },
    Requirement {
        program: "iftop",
        package: "iftop",
        required: false,
        purpose: "interactive per-flow bandwidth inspection",
    },
];

/// Locate `program` in the directories of a `PATH`-style value.
pub fn find_in_path(program: &str, path_var: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(path_var)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Requirements from `requirements` with no matching program on `path_var`.
pub fn plan<'a>(requirements: &'a [Requirement], path_var: &OsStr) -> Vec<&'a Requirement> {
    requirements
        .iter()
        .filter(|req| find_in_path(req.program, path_var).is_none())
        .collect()
}
