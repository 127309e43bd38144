use super::error::RowErrorKind;

/// Name column value for exports which only have an ordinal.
pub const NONAME_SENTINEL: &str = "[NONAME]";

/// The name of an exported symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportName {
    Named(String),
    NoName,
}

impl ExportName {
    /// Returns the symbol name if the export has one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ExportName::Named(name) => Some(name),
            ExportName::NoName => None,
        }
    }
}

/// A single row from the exports table of a dump listing.
///
/// ```text
///           1    0 00001000 CreateWidget
///           2    1          Forwarded (forwarded to OTHER.Target)
///           3      00001010 [NONAME]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRecord {
    pub ordinal: Option<u32>,
    pub hint: Option<u16>,
    pub name: ExportName,
    pub forwarder: Option<String>,
}

impl ExportRecord {
    /// Parses an export row.
    ///
    /// The row is split on single spaces so column padding produces empty
    /// tokens. The name is the last token, or the fourth token from the end
    /// when the last one closes a `(forwarded to ...)` suffix. An empty name
    /// token is kept as an empty name. The ordinal and hint columns are read
    /// when they parse and left empty otherwise.
    pub fn parse(row: &str) -> Result<ExportRecord, RowErrorKind> {
        let words = row.split(' ').collect::<Vec<_>>();
        let mut index = words.len() - 1;

        let forwarder = if words[index].ends_with(')') {
            let target = words[index].trim_end_matches(')').to_string();
            index = index.checked_sub(3).ok_or(RowErrorKind::Forwarder)?;
            Some(target)
        } else {
            None
        };

        let name = match words[index] {
            NONAME_SENTINEL => ExportName::NoName,
            name => ExportName::Named(name.to_string()),
        };

        let mut columns = words[..index].iter().filter(|word| !word.is_empty());

        let ordinal = columns.next().and_then(|word| word.parse::<u32>().ok());

        let columns = columns.collect::<Vec<_>>();

        // Forwarded rows have no RVA column and unnamed rows have no hint.
        let hint = if forwarder.is_some() || columns.len() >= 2 {
            columns
                .first()
                .and_then(|word| u16::from_str_radix(word, 16).ok())
        } else {
            None
        };

        Ok(Self {
            ordinal,
            hint,
            name,
            forwarder,
        })
    }

    pub fn is_forwarded(&self) -> bool {
        self.forwarder.is_some()
    }
}
