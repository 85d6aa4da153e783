#![forbid(unsafe_code)]

//! Terminal-block generator for QElectroTech projects.
//!
//! The pipeline is a single batch pass over one `.qet` file: parse the
//! project, extract the terminal table, lay out one block per block name and
//! reinsert the generated elements into the project's embedded collection.
//!
//! ```no_run
//! use bornier::{BlockStyle, QetProject, generate_terminal_blocks};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut project = QetProject::load("machine.qet")?;
//! let generated = generate_terminal_blocks(&mut project, &BlockStyle::default())?;
//! println!("generated {} terminal blocks", generated.len());
//! project.save("machine.qet")?;
//! # Ok(())
//! # }
//! ```

pub use bornier_core::{
    Error as CoreError, QetProject, Terminal, TerminalKind, TerminalMeta, XmlDocument, XmlNode,
    fill_reserve_gaps,
};
pub use bornier_render::{
    BlockStyle, Error as RenderError, Primitive, TerminalBlockLayout, element_xml,
    layout_terminal_block,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] bornier_core::Error),
    #[error(transparent)]
    Render(#[from] bornier_render::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Lays out the named block from the project's current terminal table.
///
/// Reserve gaps are filled first when any record of the block asks for
/// reserve terminals.
pub fn layout_block(
    project: &QetProject,
    name: &str,
    style: &BlockStyle,
) -> Result<TerminalBlockLayout> {
    let mut terminals = project.terminals_of_block(name);
    if terminals
        .iter()
        .any(|t| t.reserve_count > 0 || !t.reserve_positions.is_empty())
    {
        fill_reserve_gaps(&mut terminals, &style.reservation_label);
    }
    Ok(layout_terminal_block(name, &terminals, style)?)
}

/// Generates every terminal block of the project and inserts the elements
/// into the embedded collection. Returns the block names in generation order.
pub fn generate_terminal_blocks(
    project: &mut QetProject,
    style: &BlockStyle,
) -> Result<Vec<String>> {
    let names = project.block_names();
    for name in &names {
        let layout = layout_block(project, name, style)?;
        let element = element_xml(&layout, style);
        project.insert_terminal_block(name, element)?;
    }
    Ok(names)
}
