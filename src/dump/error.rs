use std::path::PathBuf;

use super::DumpSection;

/// Structural errors in a `dumpbin /exports` listing.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DumpFormatError {
    #[error("unexpected end of file; expected {0}")]
    UnexpectedEof(DumpSection),

    #[error("line {line}: unexpected file type: {found}")]
    FileType { line: usize, found: String },

    #[error("line {line}: unexpected input; expected 'ordinal'")]
    ColumnHeader { line: usize },

    #[error("line {line}: unexpected input; expected empty line")]
    Separator { line: usize },

    #[error("line {line}: malformed export row '{row}': {reason}")]
    MalformedRow {
        line: usize,
        row: String,
        reason: RowErrorKind,
    },

    #[error("line {line}: unexpected input; expected 'Summary'")]
    Summary { line: usize },
}

#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum RowErrorKind {
    #[error("truncated forwarder")]
    Forwarder,
}

/// Errors from translating a dump file into a definition file.
#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("could not read {}: {error}", .path.display())]
    Read {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("could not write {}: {error}", .path.display())]
    Write {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("{}: {error}", .path.display())]
    Format {
        path: PathBuf,
        error: DumpFormatError,
    },
}

/// Errors from parsing a listing out of a reader.
#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Format(#[from] DumpFormatError),
}
