//! Generates static import libraries from the exports of a DLL.
//!
//! The exports are listed with `dumpbin /exports`, translated into a
//! module-definition file and passed to `lib /def:`.

pub mod convert;
pub mod dump;
pub mod image;
pub mod moduledef;
pub mod process;
pub mod toolsearch;
