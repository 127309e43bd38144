use anyhow::Result;
use arguments::{CliArgs, UsageError};
use log::{debug, error, info};

use dll2lib::{
    convert::ConverterBuilder,
    toolsearch::{ToolArch, ToolSearcher},
};

mod arguments;
mod logging;

/// Exit status for every failure.
const EXIT_FAILURE: i32 = -1;

/// cli entrypoint
fn main() {
    if let Err(e) = try_main() {
        if !e.is::<UsageError>() {
            error!("{e}");
        }

        std::process::exit(EXIT_FAILURE);
    }
}

/// Main program entrypoint
fn try_main() -> Result<()> {
    let args = arguments::parse_arguments()?;

    let it = std::time::Instant::now();

    let convert_res = run_converter(&args);

    let elapsed = std::time::Instant::now() - it;
    debug!("conversion time: {}ms", elapsed.as_micros() as f64 / 1000f64);

    convert_res
}

fn run_converter(args: &CliArgs) -> Result<()> {
    let tool_arch = if args.x64 {
        ToolArch::X64
    } else {
        ToolArch::host()
    };

    info!("use '{tool_arch}' dumpbin.exe");

    let converter = ConverterBuilder::new()
        .tool_finder(ToolSearcher::from_env(tool_arch))
        .clean(!args.noclean)
        .build();

    let library = converter.convert(&args.dll)?;
    debug!("wrote {}", library.display());

    Ok(())
}
