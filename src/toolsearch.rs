use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

use indexmap::IndexSet;
use log::{debug, info, warn};

/// Resolves tool names to something which can be passed to
/// [`std::process::Command`].
pub trait ToolFind {
    /// Returns the path of the tool or the bare name if it could not be
    /// found.
    fn find_tool(&self, name: &str) -> PathBuf;
}

impl<T: ToolFind + ?Sized> ToolFind for &T {
    fn find_tool(&self, name: &str) -> PathBuf {
        (**self).find_tool(name)
    }
}

/// Variant of the MSVC tools to prefer when they are not on the `PATH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolArch {
    X86,
    X64,
}

impl ToolArch {
    /// The variant matching the pointer width of this build.
    pub fn host() -> ToolArch {
        if cfg!(target_pointer_width = "64") {
            ToolArch::X64
        } else {
            ToolArch::X86
        }
    }

    /// Directory name prefix the tool variant is installed under.
    pub fn marker(&self) -> &'static str {
        match self {
            ToolArch::X86 => "x86",
            ToolArch::X64 => "x64",
        }
    }
}

impl Default for ToolArch {
    fn default() -> Self {
        Self::host()
    }
}

impl std::fmt::Display for ToolArch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.marker())
    }
}

/// Visual Studio install directory relative to a drive root.
pub const VISUAL_STUDIO_DIR: &str = "Program Files (x86)\\Microsoft Visual Studio";

/// Finds tools in the `PATH` and then in Visual Studio installs.
#[derive(Debug, Default)]
pub struct ToolSearcher {
    search_paths: IndexSet<PathBuf>,
    install_roots: IndexSet<PathBuf>,
    arch: ToolArch,
}

impl ToolSearcher {
    pub fn new(arch: ToolArch) -> ToolSearcher {
        Self {
            search_paths: IndexSet::new(),
            install_roots: IndexSet::new(),
            arch,
        }
    }

    /// Creates a searcher using the `PATH` environment variable and the
    /// Visual Studio directory of each fixed drive.
    pub fn from_env(arch: ToolArch) -> ToolSearcher {
        let mut searcher = Self::new(arch);

        if let Some(path) = std::env::var_os("PATH") {
            searcher.extend_search_paths(std::env::split_paths(&path));
        }

        searcher.extend_install_roots(
            fixed_drive_roots()
                .into_iter()
                .map(|root| root.join(VISUAL_STUDIO_DIR)),
        );

        searcher
    }

    pub fn arch(&self) -> ToolArch {
        self.arch
    }

    pub fn extend_search_paths<I, P>(&mut self, search_paths: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.search_paths
            .extend(search_paths.into_iter().map(|v| v.into()));
    }

    pub fn extend_install_roots<I, P>(&mut self, install_roots: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.install_roots
            .extend(install_roots.into_iter().map(|v| v.into()));
    }

    /// Returns the `PATH` directory containing the tool executable.
    pub fn find_in_search_paths(&self, exe_name: &str) -> Option<&Path> {
        self.search_paths
            .iter()
            .filter(|search_path| search_path.is_dir())
            .find(|search_path| search_path.join(exe_name).is_file())
            .map(PathBuf::as_path)
    }

    /// Searches the install roots for the tool executable built for the
    /// searcher's architecture.
    pub fn find_in_install_roots(&self, exe_name: &str) -> std::io::Result<Option<PathBuf>> {
        for root in &self.install_roots {
            if !root.is_dir() {
                debug!("skipping missing install root {}", root.display());
                continue;
            }

            let mut candidates = Vec::new();
            collect_files_named(root, exe_name, &mut candidates)?;

            if let Some(found) = candidates
                .into_iter()
                .find(|candidate| has_arch_marker(candidate, self.arch.marker()))
            {
                return Ok(Some(found));
            }
        }

        Ok(None)
    }
}

impl ToolFind for ToolSearcher {
    fn find_tool(&self, name: &str) -> PathBuf {
        let exe_name = executable_name(name);

        if let Some(dir) = self.find_in_search_paths(&exe_name) {
            info!("{name} found in PATH at '{}'", dir.display());
            return PathBuf::from(name);
        }

        info!("{name} is not present in PATH; searching Visual Studio installs");

        match self.find_in_install_roots(&exe_name) {
            Ok(Some(found)) => {
                info!("{name} detected at '{}'", found.display());
                found
            }
            Ok(None) => {
                debug!("no {} build of {exe_name} found", self.arch);
                PathBuf::from(name)
            }
            Err(e) => {
                warn!("unable to search for {name} on local drives: {e}");
                PathBuf::from(name)
            }
        }
    }
}

/// Appends `.exe` to names without an extension.
pub fn executable_name(name: &str) -> String {
    if Path::new(name).extension().is_some() {
        name.to_string()
    } else {
        format!("{name}.exe")
    }
}

/// Checks if the directory containing `path` has a path segment starting
/// with `marker`.
fn has_arch_marker(path: &Path, marker: &str) -> bool {
    path.parent().is_some_and(|dir| {
        dir.components().any(|component| {
            component
                .as_os_str()
                .to_str()
                .is_some_and(|segment| segment.starts_with(marker))
        })
    })
}

/// Recursively collects files under `dir` whose name matches `file_name`
/// ignoring ASCII case. Entries are visited in sorted order.
fn collect_files_named(
    dir: &Path,
    file_name: &str,
    found: &mut Vec<PathBuf>,
) -> std::io::Result<()> {
    let mut entries = std::fs::read_dir(dir)?.collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            collect_files_named(&entry.path(), file_name, found)?;
        } else if file_type.is_file() && eq_ignore_ascii_case(&entry.file_name(), file_name) {
            found.push(entry.path());
        }
    }

    Ok(())
}

fn eq_ignore_ascii_case(name: &OsStr, expected: &str) -> bool {
    name.to_str()
        .is_some_and(|name| name.eq_ignore_ascii_case(expected))
}

/// Root directories of the local fixed drives.
#[cfg(windows)]
fn fixed_drive_roots() -> Vec<PathBuf> {
    ('C'..='Z')
        .map(|letter| PathBuf::from(format!("{letter}:\\")))
        .filter(|root| root.is_dir())
        .collect()
}

#[cfg(not(windows))]
fn fixed_drive_roots() -> Vec<PathBuf> {
    Vec::new()
}
