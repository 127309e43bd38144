use std::path::PathBuf;

use crate::{dump::TranslateError, process::ToolError};

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("could not find input file {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("could not dump exports: {0}")]
    Dump(ToolError),

    #[error("could not create definition file: {0}")]
    Translate(#[from] TranslateError),

    #[error("could not create import library: {0}")]
    Archive(ToolError),
}
