use std::io::{IsTerminal, Write};

use log::Level;
use termcolor::{Buffer, BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

use crate::arguments::{CliArgs, ColorOption};

/// Logs warnings and errors to stderr and progress messages to stdout.
struct CliLogger {
    stdout: BufferWriter,
    stderr: BufferWriter,
}

impl CliLogger {
    fn write_record(buffer: &mut Buffer, record: &log::Record) -> std::io::Result<()> {
        write!(buffer, "{}: ", env!("CARGO_BIN_NAME"))?;

        let tag = match record.level() {
            Level::Error => Some(("error:", Color::Red)),
            Level::Warn => Some(("warn:", Color::Yellow)),
            Level::Info => None,
            Level::Debug => Some(("debug:", Color::White)),
            Level::Trace => Some(("trace:", Color::Blue)),
        };

        if let Some((tag, color)) = tag {
            let _ = buffer.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
            write!(buffer, "{tag}")?;
            buffer.reset()?;
            write!(buffer, " ")?;
        }

        writeln!(buffer, "{}", record.args())
    }
}

impl log::Log for CliLogger {
    #[inline]
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        if record.args().as_str().is_some_and(|args| args.is_empty()) {
            return;
        }

        let writer = if record.level() <= Level::Warn {
            &self.stderr
        } else {
            &self.stdout
        };

        let mut buffer = writer.buffer();
        if Self::write_record(&mut buffer, record).is_ok() {
            let _ = writer.print(&buffer);
        }
    }

    fn flush(&self) {}
}

fn stream_choice(choice: ColorChoice, is_terminal: bool) -> ColorChoice {
    if choice == ColorChoice::Auto && !is_terminal {
        ColorChoice::Never
    } else {
        choice
    }
}

/// Sets up logging for the cli
pub fn setup_logger(args: &CliArgs) -> anyhow::Result<()> {
    let color_disabled = std::env::var("TERM")
        .ok()
        .is_some_and(|term| term.eq_ignore_ascii_case("dumb"))
        || std::env::var_os("NO_COLOR").is_some();

    let color_option = match args.color {
        ColorOption::Auto if color_disabled => ColorChoice::Never,
        color => color.into(),
    };

    log::set_boxed_logger(Box::from(CliLogger {
        stdout: BufferWriter::stdout(stream_choice(
            color_option,
            std::io::stdout().is_terminal(),
        )),
        stderr: BufferWriter::stderr(stream_choice(
            color_option,
            std::io::stderr().is_terminal(),
        )),
    }))
    .map(|()| log::set_max_level(args.verbose.log_level_filter()))?;

    Ok(())
}
