use std::{cell::RefCell, path::PathBuf};

use dll2lib::{
    process::{ToolError, ToolInvocation, ToolRun},
    toolsearch::ToolFind,
};

/// Resolves every tool to its bare name.
pub struct BareNameFinder;

impl ToolFind for BareNameFinder {
    fn find_tool(&self, name: &str) -> PathBuf {
        PathBuf::from(name)
    }
}

/// Stands in for `dumpbin` and `lib`.
///
/// `dumpbin` writes the configured listing to its `/out:` path. `lib`
/// records the definition file it was given and writes a placeholder
/// archive.
pub struct FakeToolRunner {
    listing: &'static str,
    dumpbin_exit: i32,
    lib_exit: i32,
    invocations: RefCell<Vec<ToolInvocation>>,
    definitions: RefCell<Vec<String>>,
}

pub const FAKE_ARCHIVE: &[u8] = b"!<arch>\n";

impl FakeToolRunner {
    pub fn new(listing: &'static str) -> FakeToolRunner {
        Self {
            listing,
            dumpbin_exit: 0,
            lib_exit: 0,
            invocations: RefCell::new(Vec::new()),
            definitions: RefCell::new(Vec::new()),
        }
    }

    pub fn dumpbin_exit(mut self, code: i32) -> Self {
        self.dumpbin_exit = code;
        self
    }

    pub fn lib_exit(mut self, code: i32) -> Self {
        self.lib_exit = code;
        self
    }

    pub fn invocations(&self) -> Vec<ToolInvocation> {
        self.invocations.borrow().clone()
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.invocations
            .borrow()
            .iter()
            .map(|invocation| invocation.tool_name())
            .collect()
    }

    /// Contents of the definition files passed to `lib`.
    pub fn definitions(&self) -> Vec<String> {
        self.definitions.borrow().clone()
    }

    fn exit(tool: &str, code: i32) -> Result<(), ToolError> {
        if code == 0 {
            Ok(())
        } else {
            Err(ToolError::Failed {
                tool: tool.to_string(),
                code,
            })
        }
    }
}

impl ToolRun for FakeToolRunner {
    fn run_tool(&self, invocation: &ToolInvocation) -> Result<(), ToolError> {
        self.invocations.borrow_mut().push(invocation.clone());

        let tool = invocation.tool_name();
        let out = invocation
            .path_for("/out:")
            .expect("tool invocation should have an /out: path");

        match tool.as_str() {
            "dumpbin" => {
                // dumpbin leaves a partial listing behind when it fails.
                let listing = if self.dumpbin_exit == 0 {
                    self.listing
                } else {
                    &self.listing[..self.listing.len() / 2]
                };

                std::fs::write(out, listing).expect("Could not write dump listing");
                Self::exit(&tool, self.dumpbin_exit)
            }
            "lib" => {
                let def = invocation
                    .path_for("/def:")
                    .expect("lib invocation should have a /def: path");

                self.definitions.borrow_mut().push(
                    std::fs::read_to_string(def).expect("Could not read definition file"),
                );

                Self::exit(&tool, self.lib_exit)?;
                std::fs::write(out, FAKE_ARCHIVE).expect("Could not write archive");
                Ok(())
            }
            _ => panic!("unexpected tool {tool}"),
        }
    }
}
