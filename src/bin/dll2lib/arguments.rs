use std::{ffi::OsString, path::PathBuf};

use anyhow::bail;
use clap::{CommandFactory, Parser, ValueEnum, error::ErrorKind};
use clap_verbosity_flag::{Verbosity, WarnLevel};

/// Flags accepted in the `/flag` form.
const SLASH_FLAGS: [&str; 4] = ["noclean", "x64", "verbose", "help"];

#[derive(Parser, Debug)]
#[command(
    version,
    about,
    override_usage = "dll2lib [options] <dll>",
    after_help = "Flags may also be written as /noclean, /x64, /verbose and /help."
)]
pub struct CliArgs {
    /// DLL to generate the import library for
    #[arg(value_name = "dll", value_hint = clap::ValueHint::FilePath)]
    pub dll: PathBuf,

    /// Don't delete intermediate files
    #[arg(long)]
    pub noclean: bool,

    /// Use the x64 version of dumpbin.exe
    #[arg(long)]
    pub x64: bool,

    /// Print colored output
    #[arg(long, value_name = "color", default_value_t = ColorOption::Auto)]
    pub color: ColorOption,

    #[command(flatten)]
    pub verbose: Verbosity<WarnLevel>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorOption {
    #[value(name = "never")]
    Never,

    #[value(name = "auto")]
    Auto,

    #[value(name = "always")]
    Always,

    #[value(name = "ansi")]
    AlwaysAnsi,
}

impl std::fmt::Display for ColorOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(v) = self.to_possible_value() {
            write!(f, "{}", v.get_name())?;
        }

        Ok(())
    }
}

impl From<ColorOption> for termcolor::ColorChoice {
    fn from(val: ColorOption) -> Self {
        match val {
            ColorOption::Never => termcolor::ColorChoice::Never,
            ColorOption::Auto => termcolor::ColorChoice::Auto,
            ColorOption::Always => termcolor::ColorChoice::Always,
            ColorOption::AlwaysAnsi => termcolor::ColorChoice::AlwaysAnsi,
        }
    }
}

/// Error for arguments which were rejected after printing the usage.
#[derive(Debug)]
pub struct UsageError;

impl std::fmt::Display for UsageError {
    fn fmt(&self, _f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Ok(())
    }
}

impl std::error::Error for UsageError {}

/// A `/`-prefixed argument which is not a known flag.
#[derive(Debug, PartialEq, Eq)]
pub struct UnknownArgument(pub String);

/// Rewrites `/flag` and `-help` arguments into their clap long forms.
///
/// The `/` forms and help flags are case-insensitive. On hosts where `/` starts absolute
/// paths, an unknown `/` argument naming an existing path is kept as is.
pub fn normalize_arguments<I>(args: I) -> Result<Vec<OsString>, UnknownArgument>
where
    I: IntoIterator<Item = OsString>,
{
    let mut args = args.into_iter();
    let mut normalized = Vec::from_iter(args.next());

    for arg in args {
        let Some(value) = arg.to_str() else {
            normalized.push(arg);
            continue;
        };

        let lowered = value.to_ascii_lowercase();
        if lowered == "-help" || lowered == "--help" {
            normalized.push("--help".into());
        } else if let Some(flag) = lowered.strip_prefix('/') {
            if SLASH_FLAGS.contains(&flag) {
                normalized.push(format!("--{flag}").into());
            } else if !cfg!(windows) && std::path::Path::new(value).exists() {
                normalized.push(arg);
            } else {
                return Err(UnknownArgument(value.to_string()));
            }
        } else {
            normalized.push(arg);
        }
    }

    Ok(normalized)
}

/// Parses the command line arguments into the [`CliArgs`].
///
/// Usage errors and help output are printed here and reported as
/// [`UsageError`].
pub fn parse_arguments() -> anyhow::Result<CliArgs> {
    // The logger is configured from the parsed arguments so it is not
    // available yet.
    let args = match argfile::expand_args_from(
        std::env::args_os(),
        argfile::parse_fromfile,
        argfile::PREFIX,
    ) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: could not expand response file: {e}");
            bail!(UsageError);
        }
    };

    let args = match normalize_arguments(args) {
        Ok(args) => args,
        Err(UnknownArgument(arg)) => {
            CliArgs::command()
                .error(
                    ErrorKind::UnknownArgument,
                    format!("unknown command line argument: {arg}"),
                )
                .print()?;
            bail!(UsageError);
        }
    };

    let args = match CliArgs::try_parse_from(args) {
        Ok(args) => args,
        Err(e) if e.kind() == ErrorKind::DisplayVersion => e.exit(),
        Err(e) => {
            e.print()?;
            bail!(UsageError);
        }
    };

    crate::logging::setup_logger(&args)?;

    Ok(args)
}
