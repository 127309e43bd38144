use std::io::Write;

/// Export names which must be declared `PRIVATE` in a module-definition file.
///
/// These are DLL lifecycle hooks, COM registration entry points and RAS dial
/// customization hooks. `lib.exe` warns when they are exported without the
/// `PRIVATE` attribute. Kept sorted for [`is_private_symbol`].
pub const PRIVATE_SYMBOLS: [&str; 15] = [
    "DllCanUnloadNow",
    "DllGetClassFactoryFromClassString",
    "DllGetClassObject",
    "DllGetDocumentation",
    "DllInitialize",
    "DllInstall",
    "DllRegisterServer",
    "DllRegisterServerEx",
    "DllRegisterServerExW",
    "DllUnload",
    "DllUnregisterServer",
    "RasCustomDeleteEntryNotify",
    "RasCustomDial",
    "RasCustomDialDlg",
    "RasCustomEntryDlg",
];

/// Returns `true` if the export name is in [`PRIVATE_SYMBOLS`].
pub fn is_private_symbol(name: &str) -> bool {
    PRIVATE_SYMBOLS.binary_search(&name).is_ok()
}

/// Line ending used when writing definition files.
pub const LINE_ENDING: &str = if cfg!(windows) { "\r\n" } else { "\n" };

/// A single symbol line in the `EXPORTS` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionEntry {
    pub name: String,
    pub private: bool,
}

impl DefinitionEntry {
    /// Creates a new entry, marking it private if the name is a reserved
    /// export.
    pub fn new(name: impl Into<String>) -> DefinitionEntry {
        let name = name.into();
        let private = is_private_symbol(&name);
        Self { name, private }
    }
}

impl std::fmt::Display for DefinitionEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.private {
            write!(f, "{} PRIVATE", self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

/// The `EXPORTS` section of a module-definition file.
///
/// Entries keep the order they were pushed in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefinitionListing {
    entries: Vec<DefinitionEntry>,
}

impl DefinitionListing {
    pub fn new() -> DefinitionListing {
        Default::default()
    }

    pub fn push(&mut self, entry: DefinitionEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[DefinitionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes the listing using the host line ending.
    pub fn write_to<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        write!(writer, "EXPORTS{LINE_ENDING}")?;
        for entry in &self.entries {
            write!(writer, "{entry}{LINE_ENDING}")?;
        }

        writer.flush()
    }
}

impl std::fmt::Display for DefinitionListing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EXPORTS{LINE_ENDING}")?;
        for entry in &self.entries {
            write!(f, "{entry}{LINE_ENDING}")?;
        }

        Ok(())
    }
}

impl FromIterator<DefinitionEntry> for DefinitionListing {
    fn from_iter<T: IntoIterator<Item = DefinitionEntry>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
