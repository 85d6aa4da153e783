#![forbid(unsafe_code)]

//! Headless terminal-block renderer.
//!
//! Takes the sorted terminal records of one block and produces, in two
//! deterministic steps, the QElectroTech element that draws the block:
//! geometry first ([`layout::layout_terminal_block`]), XML second
//! ([`xml::element_xml`]).

pub mod layout;
mod logo;
pub mod style;
pub mod xml;

pub use layout::{Orientation, Primitive, TerminalBlockLayout, layout_terminal_block};
pub use style::BlockStyle;
pub use xml::element_xml;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("terminal block {name:?} has no terminals")]
    EmptyBlock { name: String },
    #[error("invalid block style: {message}")]
    InvalidStyle { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
