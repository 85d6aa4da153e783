#![forbid(unsafe_code)]

//! QElectroTech project model (headless).
//!
//! Design goals:
//! - faithful round-tripping of `.qet` project XML (read, edit in memory, write)
//! - deterministic terminal extraction: one flat, sorted, renumbered table per project
//! - no GUI and no I/O beyond the project file itself

pub mod dom;
pub mod error;
pub mod project;
pub mod terminal;
pub mod xref;

pub use dom::{XmlDocument, XmlNode};
pub use error::{Error, Result};
pub use project::{QetProject, fill_reserve_gaps};
pub use terminal::{Terminal, TerminalKind, TerminalMeta};

#[cfg(test)]
mod tests;
