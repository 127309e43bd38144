use std::{
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
    process::Command,
};

use log::debug;

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("could not start {tool}: {error}")]
    Spawn { tool: String, error: std::io::Error },

    #[error("{tool} failed with exit code {code}")]
    Failed { tool: String, code: i32 },

    #[error("{tool} was terminated before exiting")]
    Terminated { tool: String },
}

impl ToolError {
    /// Returns the exit code of the tool if it ran to completion.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ToolError::Failed { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// An argument passed to an external tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolArg {
    /// Passed as is.
    Plain(OsString),

    /// A path joined to its flag, e.g. `/out:"widgets.dmp"`.
    ///
    /// On Windows the path is quoted and the argument is passed verbatim.
    Path { flag: &'static str, path: PathBuf },
}

impl ToolArg {
    fn apply(&self, command: &mut Command) {
        match self {
            ToolArg::Plain(arg) => {
                command.arg(arg);
            }
            #[cfg(windows)]
            ToolArg::Path { flag, path } => {
                use std::os::windows::process::CommandExt;

                let mut arg = OsString::from(*flag);
                arg.push("\"");
                arg.push(path);
                arg.push("\"");
                command.raw_arg(arg);
            }
            #[cfg(not(windows))]
            ToolArg::Path { flag, path } => {
                let mut arg = OsString::from(*flag);
                arg.push(path);
                command.arg(arg);
            }
        }
    }
}

impl std::fmt::Display for ToolArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolArg::Plain(arg) => write!(f, "{}", arg.to_string_lossy()),
            ToolArg::Path { flag, path } => write!(f, "{flag}\"{}\"", path.display()),
        }
    }
}

/// A program and the arguments to run it with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    program: PathBuf,
    args: Vec<ToolArg>,
}

impl ToolInvocation {
    pub fn new(program: impl Into<PathBuf>) -> ToolInvocation {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Adds a plain argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(ToolArg::Plain(arg.as_ref().to_os_string()));
        self
    }

    /// Adds a path argument prefixed with `flag`.
    pub fn path_arg(mut self, flag: &'static str, path: impl Into<PathBuf>) -> Self {
        self.args.push(ToolArg::Path {
            flag,
            path: path.into(),
        });
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[ToolArg] {
        &self.args
    }

    /// Returns the path passed with `flag`.
    pub fn path_for(&self, flag: &str) -> Option<&Path> {
        self.args.iter().find_map(|arg| match arg {
            ToolArg::Path { flag: f, path } if *f == flag => Some(path.as_path()),
            _ => None,
        })
    }

    /// The file name of the program without its extension.
    pub fn tool_name(&self) -> String {
        self.program
            .file_stem()
            .unwrap_or(self.program.as_os_str())
            .to_string_lossy()
            .into_owned()
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        for arg in &self.args {
            arg.apply(&mut command);
        }

        command
    }
}

impl std::fmt::Display for ToolInvocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }

        Ok(())
    }
}

/// Runs external tools.
pub trait ToolRun {
    fn run_tool(&self, invocation: &ToolInvocation) -> Result<(), ToolError>;
}

impl<T: ToolRun + ?Sized> ToolRun for &T {
    fn run_tool(&self, invocation: &ToolInvocation) -> Result<(), ToolError> {
        (**self).run_tool(invocation)
    }
}

/// Runs tools as child processes and waits for them to exit.
///
/// The child inherits the standard streams. Only the exit code is checked.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> ProcessRunner {
        Self
    }
}

impl ToolRun for ProcessRunner {
    fn run_tool(&self, invocation: &ToolInvocation) -> Result<(), ToolError> {
        debug!("running {invocation}");

        let status = invocation
            .command()
            .status()
            .map_err(|error| ToolError::Spawn {
                tool: invocation.tool_name(),
                error,
            })?;

        match status.code() {
            Some(0) => Ok(()),
            Some(code) => Err(ToolError::Failed {
                tool: invocation.tool_name(),
                code,
            }),
            None => Err(ToolError::Terminated {
                tool: invocation.tool_name(),
            }),
        }
    }
}
