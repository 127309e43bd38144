use crate::{
    process::{ProcessRunner, ToolRun},
    toolsearch::{ToolArch, ToolFind, ToolSearcher},
};

use super::Converter;

/// Configures a [`Converter`].
pub struct ConverterBuilder<F: ToolFind, R: ToolRun> {
    /// Resolves `dumpbin` and `lib`.
    pub(super) tool_finder: F,

    /// Runs the resolved tools.
    pub(super) tool_runner: R,

    /// Whether to remove the intermediate files.
    pub(super) clean: bool,
}

impl ConverterBuilder<ToolSearcher, ProcessRunner> {
    /// Creates a new [`ConverterBuilder`] which searches the environment for
    /// the host variant of the tools and runs them as child processes.
    pub fn new() -> Self {
        Self {
            tool_finder: ToolSearcher::from_env(ToolArch::host()),
            tool_runner: ProcessRunner::new(),
            clean: true,
        }
    }
}

impl Default for ConverterBuilder<ToolSearcher, ProcessRunner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: ToolFind, R: ToolRun> ConverterBuilder<F, R> {
    /// Set the tool finder used for resolving `dumpbin` and `lib`.
    pub fn tool_finder<T: ToolFind>(self, tool_finder: T) -> ConverterBuilder<T, R> {
        ConverterBuilder {
            tool_finder,
            tool_runner: self.tool_runner,
            clean: self.clean,
        }
    }

    /// Set the runner used for running the tools.
    pub fn tool_runner<T: ToolRun>(self, tool_runner: T) -> ConverterBuilder<F, T> {
        ConverterBuilder {
            tool_finder: self.tool_finder,
            tool_runner,
            clean: self.clean,
        }
    }

    /// Remove the dump and definition files once they are no longer needed.
    ///
    /// Defaults to `true`.
    pub fn clean(mut self, val: bool) -> Self {
        self.clean = val;
        self
    }

    /// Finishes configuring the converter.
    pub fn build(self) -> Converter<F, R> {
        Converter {
            tool_finder: self.tool_finder,
            tool_runner: self.tool_runner,
            clean: self.clean,
        }
    }
}
