//! Translation of `dumpbin /exports` listings into module-definition files.
//!
//! The listing is positional. The parser walks it with [`ExportListingParser`]
//! one line at a time, moving through a [`DumpSection`] per structural part:
//!
//! ```text
//! <3 header lines>
//! File Type: DLL
//! <10 info lines>
//!     ordinal hint RVA      name
//!
//!           1    0 00001000 CreateWidget
//!           2    1          HeapAlloc (forwarded to NTDLL.RtlAllocateHeap)
//!
//!   Summary
//! ```

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter},
    path::Path,
};

use log::debug;

use crate::moduledef::{DefinitionEntry, DefinitionListing};

pub use error::{DumpFormatError, ListingError, RowErrorKind, TranslateError};
pub use row::{ExportName, ExportRecord, NONAME_SENTINEL};

mod error;
mod row;

const HEADER_LINES: usize = 3;
const INFO_LINES: usize = 10;

const FILE_TYPE_DLL: &str = "File Type: DLL";
const COLUMN_HEADER: &str = "ordinal";
const SUMMARY: &str = "Summary";

/// Structural section of the listing the parser expects next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpSection {
    /// Skipping header lines; holds the number left to skip.
    Header(usize),
    FileType,
    /// Skipping info lines; holds the number left to skip.
    Info(usize),
    ColumnHeader,
    Separator,
    Rows,
    Trailer,
    Done,
}

impl std::fmt::Display for DumpSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DumpSection::Header(remaining) => write!(f, "{remaining} more header line(s)"),
            DumpSection::FileType => write!(f, "'{FILE_TYPE_DLL}'"),
            DumpSection::Info(remaining) => write!(f, "{remaining} more info line(s)"),
            DumpSection::ColumnHeader => write!(f, "'{COLUMN_HEADER}'"),
            DumpSection::Separator => write!(f, "empty line"),
            DumpSection::Rows => write!(f, "export row or empty line"),
            DumpSection::Trailer => write!(f, "'{SUMMARY}'"),
            DumpSection::Done => write!(f, "nothing"),
        }
    }
}

/// Line-driven parser for the exports section of a dump listing.
#[derive(Debug, Clone)]
pub struct ExportListingParser {
    section: DumpSection,
    line: usize,
}

impl Default for ExportListingParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ExportListingParser {
    pub fn new() -> ExportListingParser {
        Self {
            section: DumpSection::Header(HEADER_LINES),
            line: 0,
        }
    }

    /// The section the next line is expected to belong to.
    pub fn section(&self) -> DumpSection {
        self.section
    }

    /// Returns `true` once the `Summary` line has been consumed.
    pub fn is_done(&self) -> bool {
        self.section == DumpSection::Done
    }

    /// Feeds the next line of the listing without its line terminator.
    ///
    /// Returns the export described by the line if it is an export row. Lines
    /// fed after the `Summary` line are ignored.
    pub fn feed(&mut self, line: &str) -> Result<Option<ExportRecord>, DumpFormatError> {
        if self.is_done() {
            return Ok(None);
        }

        self.line += 1;

        let mut record = None;
        self.section = match self.section {
            DumpSection::Header(remaining) if remaining > 1 => DumpSection::Header(remaining - 1),
            DumpSection::Header(_) => DumpSection::FileType,
            DumpSection::FileType => {
                let file_type = line.trim();
                if file_type != FILE_TYPE_DLL {
                    return Err(DumpFormatError::FileType {
                        line: self.line,
                        found: file_type.to_string(),
                    });
                }

                DumpSection::Info(INFO_LINES)
            }
            DumpSection::Info(remaining) if remaining > 1 => DumpSection::Info(remaining - 1),
            DumpSection::Info(_) => DumpSection::ColumnHeader,
            DumpSection::ColumnHeader => {
                if !line.trim_start().starts_with(COLUMN_HEADER) {
                    return Err(DumpFormatError::ColumnHeader { line: self.line });
                }

                DumpSection::Separator
            }
            DumpSection::Separator => {
                if !line.trim().is_empty() {
                    return Err(DumpFormatError::Separator { line: self.line });
                }

                DumpSection::Rows
            }
            // Only a zero length line ends the table. Whitespace-only lines
            // are rows.
            DumpSection::Rows if line.is_empty() => DumpSection::Trailer,
            DumpSection::Rows => {
                record = Some(ExportRecord::parse(line).map_err(|reason| {
                    DumpFormatError::MalformedRow {
                        line: self.line,
                        row: line.to_string(),
                        reason,
                    }
                })?);

                DumpSection::Rows
            }
            DumpSection::Trailer => {
                if !line.trim().starts_with(SUMMARY) {
                    return Err(DumpFormatError::Summary { line: self.line });
                }

                DumpSection::Done
            }
            DumpSection::Done => DumpSection::Done,
        };

        Ok(record)
    }

    /// Checks that the listing was complete.
    pub fn finish(&self) -> Result<(), DumpFormatError> {
        if self.is_done() {
            Ok(())
        } else {
            Err(DumpFormatError::UnexpectedEof(self.section))
        }
    }
}

/// Reads lines from the dump listing.
///
/// Lines end at `\n` with an optional `\r` before it. The listing is written
/// in the host code page so invalid UTF-8 is replaced instead of rejected.
struct DumpLines<R: BufRead> {
    reader: R,
    buffer: Vec<u8>,
}

impl<R: BufRead> DumpLines<R> {
    fn new(reader: R) -> DumpLines<R> {
        Self {
            reader,
            buffer: Vec::new(),
        }
    }

    fn next_line(&mut self) -> std::io::Result<Option<String>> {
        self.buffer.clear();
        if self.reader.read_until(b'\n', &mut self.buffer)? == 0 {
            return Ok(None);
        }

        if self.buffer.last() == Some(&b'\n') {
            self.buffer.pop();
            if self.buffer.last() == Some(&b'\r') {
                self.buffer.pop();
            }
        }

        Ok(Some(String::from_utf8_lossy(&self.buffer).into_owned()))
    }
}

/// Parses the export records out of a dump listing.
///
/// Reading stops after the `Summary` line.
pub fn parse_exports<R: BufRead>(reader: R) -> Result<Vec<ExportRecord>, ListingError> {
    let mut parser = ExportListingParser::new();
    let mut lines = DumpLines::new(reader);
    let mut records = Vec::new();

    while !parser.is_done() {
        let Some(line) = lines.next_line()? else {
            break;
        };

        if let Some(record) = parser.feed(&line)? {
            records.push(record);
        }
    }

    parser.finish()?;
    Ok(records)
}

/// Builds the definition listing for a set of export records.
///
/// Exports without a name are skipped.
pub fn definition_listing<'a, I>(records: I) -> DefinitionListing
where
    I: IntoIterator<Item = &'a ExportRecord>,
{
    records
        .into_iter()
        .filter_map(|record| record.name.as_str())
        .map(DefinitionEntry::new)
        .collect()
}

/// Parses a dump listing and returns its definition listing.
pub fn translate<R: BufRead>(reader: R) -> Result<DefinitionListing, ListingError> {
    let records = parse_exports(reader)?;
    Ok(definition_listing(&records))
}

/// Translates the dump file at `dump_path` into a definition file at
/// `def_path`.
///
/// The definition file is only created once the whole listing parsed.
pub fn translate_file(
    dump_path: impl AsRef<Path>,
    def_path: impl AsRef<Path>,
) -> Result<DefinitionListing, TranslateError> {
    let dump_path = dump_path.as_ref();
    let def_path = def_path.as_ref();

    let dump_file = File::open(dump_path).map_err(|error| TranslateError::Read {
        path: dump_path.to_path_buf(),
        error,
    })?;

    let listing = translate(BufReader::new(dump_file)).map_err(|e| match e {
        ListingError::Io(error) => TranslateError::Read {
            path: dump_path.to_path_buf(),
            error,
        },
        ListingError::Format(error) => TranslateError::Format {
            path: dump_path.to_path_buf(),
            error,
        },
    })?;

    debug!(
        "{}: {} export(s) for the definition file",
        dump_path.display(),
        listing.len()
    );

    File::create(def_path)
        .and_then(|def_file| listing.write_to(BufWriter::new(def_file)))
        .map_err(|error| TranslateError::Write {
            path: def_path.to_path_buf(),
            error,
        })?;

    Ok(listing)
}
