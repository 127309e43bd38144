use std::path::{Path, PathBuf};

/// File paths derived from the input DLL path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertPaths {
    /// Exports listing written by `dumpbin`.
    pub dump: PathBuf,

    /// Module-definition file passed to `lib`.
    pub def: PathBuf,

    /// Import library written by `lib`.
    pub lib: PathBuf,
}

impl ConvertPaths {
    /// Derives the paths for `input`.
    ///
    /// The extension is everything after the last `.` in the file name. A
    /// file name without a `.` is used whole.
    pub fn from_input(input: impl AsRef<Path>) -> ConvertPaths {
        let input = input.as_ref();
        Self {
            dump: replace_extension(input, "dmp"),
            def: replace_extension(input, "def"),
            lib: replace_extension(input, "lib"),
        }
    }
}

fn replace_extension(path: &Path, extension: &str) -> PathBuf {
    match path.file_name().and_then(|name| name.to_str()) {
        Some(name) => {
            let stem = name.rfind('.').map_or(name, |idx| &name[..idx]);
            path.with_file_name(format!("{stem}.{extension}"))
        }
        None => path.with_extension(extension),
    }
}
