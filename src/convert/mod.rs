use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::{
    dump,
    image::{self, ImageMachine},
    process::{ProcessRunner, ToolInvocation, ToolRun},
    toolsearch::{ToolFind, ToolSearcher},
};

mod builder;
pub mod error;
mod paths;
mod scoped;

pub use builder::*;
pub use error::ConvertError;
pub use paths::ConvertPaths;
pub use scoped::ScopedFile;

/// Name of the exports dumper.
pub const DUMPBIN: &str = "dumpbin";

/// Name of the import library generator.
pub const LIB: &str = "lib";

/// Machine type of the generated import libraries.
///
/// This does not follow the dumper architecture.
pub const LIB_MACHINE: ImageMachine = ImageMachine::ArmNt;

/// Converts DLLs into import libraries using `dumpbin` and `lib`.
pub struct Converter<F: ToolFind, R: ToolRun> {
    tool_finder: F,
    tool_runner: R,
    clean: bool,
}

impl Converter<ToolSearcher, ProcessRunner> {
    /// Returns a [`ConverterBuilder`] for configuring a converter.
    pub fn builder() -> ConverterBuilder<ToolSearcher, ProcessRunner> {
        ConverterBuilder::new()
    }
}

impl<F: ToolFind, R: ToolRun> Converter<F, R> {
    /// Generates the import library for `input` and returns its path.
    ///
    /// The stages run in order and the first failure ends the conversion.
    /// Intermediate files are removed after the stage that reads them, even
    /// when it fails.
    pub fn convert(&self, input: impl AsRef<Path>) -> Result<PathBuf, ConvertError> {
        let input = input.as_ref();
        if !input.is_file() {
            return Err(ConvertError::InputNotFound(input.to_path_buf()));
        }

        info!("file to process: '{}'", input.display());
        check_image(input);

        let paths = ConvertPaths::from_input(input);

        let dump_file = ScopedFile::new(&paths.dump, self.clean);
        self.tool_runner
            .run_tool(&self.dumpbin_invocation(input, dump_file.path()))
            .map_err(ConvertError::Dump)?;

        let def_file = ScopedFile::new(&paths.def, self.clean);
        let listing = dump::translate_file(dump_file.path(), def_file.path())?;
        drop(dump_file);

        debug!(
            "wrote {} export(s) to {}",
            listing.len(),
            def_file.path().display()
        );

        self.tool_runner
            .run_tool(&self.lib_invocation(def_file.path(), &paths.lib))
            .map_err(ConvertError::Archive)?;
        drop(def_file);

        info!("file '{}' processed successfully", input.display());
        Ok(paths.lib)
    }

    /// `dumpbin /out:"<dump>" /exports "<input>"`
    fn dumpbin_invocation(&self, input: &Path, dump: &Path) -> ToolInvocation {
        ToolInvocation::new(self.tool_finder.find_tool(DUMPBIN))
            .path_arg("/out:", dump)
            .arg("/exports")
            .path_arg("", input)
    }

    /// `lib /machine:arm /def:"<def>" /out:"<lib>"`
    fn lib_invocation(&self, def: &Path, lib: &Path) -> ToolInvocation {
        ToolInvocation::new(self.tool_finder.find_tool(LIB))
            .arg(format!("/machine:{}", LIB_MACHINE.lib_name()))
            .path_arg("/def:", def)
            .path_arg("/out:", lib)
    }
}

/// Warns about inputs the generated import library will not fit.
fn check_image(input: &Path) {
    let image = match image::inspect_file(input) {
        Ok(image) => image,
        Err(e) => {
            warn!("{}: {e}", input.display());
            return;
        }
    };

    if !image.is_dll {
        warn!("{}: image is not a DLL", input.display());
    }

    match image.known_machine() {
        Some(machine) if machine.is_compatible(LIB_MACHINE) => {
            debug!("{}: machine type {machine}", input.display());
        }
        Some(machine) => warn!(
            "{}: machine type {machine} does not match the import library machine type {LIB_MACHINE}",
            input.display()
        ),
        None => warn!(
            "{}: unknown machine type {:#06x}",
            input.display(),
            image.machine
        ),
    }
}
