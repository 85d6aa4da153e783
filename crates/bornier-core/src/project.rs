//! The QElectroTech project model.
//!
//! Loads a `.qet` document, discovers every terminal element across the
//! diagram pages, decodes the packed plugin metadata and computes
//! cross-reference labels, and supports writing updated metadata and
//! generated terminal-block elements back into the document.

use crate::dom::{XmlDocument, XmlNode};
use crate::error::{Error, Result};
use crate::terminal::{Terminal, TerminalMeta, encode_meta};
use crate::xref::{DEFAULT_XREF_FORMAT, DiagramGrid, XrefContext, format_xref};
use indexmap::IndexSet;
use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::Path;
use std::sync::OnceLock;

fn re_block_label() -> &'static Regex {
    static ONCE: OnceLock<Regex> = OnceLock::new();
    ONCE.get_or_init(|| Regex::new(r"^(.+):(.+)$").unwrap())
}

#[derive(Debug, Clone)]
pub struct QetProject {
    doc: XmlDocument,
    version: String,
    page_offset: u32,
    total_pages: u32,
    xref_format: String,
    terminal_types: Vec<String>,
    terminals: Vec<Terminal>,
}

impl QetProject {
    pub fn parse(text: &str) -> Result<Self> {
        let doc = XmlDocument::parse(text)?;
        if doc.root.name != "project" {
            return Err(Error::InvalidProject {
                message: format!("root element is <{}>, expected <project>", doc.root.name),
            });
        }

        let version = doc.root.attr("version").unwrap_or_default().to_string();

        // From QET 0.8 on the attribute is gone and the offset is zero.
        let page_offset = match doc.root.attr("folioSheetQuantity") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(raw, "unparsable folioSheetQuantity, assuming 0");
                0
            }),
            None => {
                tracing::debug!("no folioSheetQuantity attribute, assuming 0");
                0
            }
        };

        let xref_format = doc
            .root
            .descendants()
            .find(|n| n.name == "newdiagrams")
            .and_then(|n| n.child("report"))
            .and_then(|n| n.attr("label"))
            .unwrap_or(DEFAULT_XREF_FORMAT)
            .to_string();

        let total_pages =
            doc.root.children_named("diagram").count() as u32 + page_offset;

        let terminal_types = terminal_element_types(&doc.root);

        let mut project = Self {
            doc,
            version,
            page_offset,
            total_pages,
            xref_format,
            terminal_types,
            terminals: Vec::new(),
        };
        project.terminals = project.extract_terminals();
        Ok(project)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn xref_format(&self) -> &str {
        &self.xref_format
    }

    /// Element names from the embedded collection whose definition is of
    /// `link_type="terminal"`.
    pub fn terminal_types(&self) -> &[String] {
        &self.terminal_types
    }

    /// All terminals of the project, sorted by block name (descending) and
    /// position, with positions renumbered 1..n per block.
    pub fn terminals(&self) -> &[Terminal] {
        &self.terminals
    }

    /// Unique block names in first-seen order of the sorted table.
    pub fn block_names(&self) -> Vec<String> {
        let set: IndexSet<&str> = self.terminals.iter().map(|t| t.block_name.as_str()).collect();
        set.into_iter().map(str::to_string).collect()
    }

    pub fn terminals_of_block(&self, name: &str) -> Vec<Terminal> {
        self.terminals
            .iter()
            .filter(|t| t.block_name == name)
            .cloned()
            .collect()
    }

    /// Length of the longest terminal block.
    pub fn max_block_len(&self) -> usize {
        let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
        for t in &self.terminals {
            *counts.entry(t.block_name.as_str()).or_default() += 1;
        }
        counts.values().copied().max().unwrap_or(0)
    }

    fn extract_terminals(&self) -> Vec<Terminal> {
        // Raw `%p` position strings sort exactly like the stored text; the
        // canonical numbering is applied afterwards.
        let mut found: Vec<(String, Terminal)> = Vec::new();

        for diagram in self.doc.root.children_named("diagram") {
            for element in diagram.descendants().filter(|n| n.name == "element") {
                let Some(label) = element_label(element) else {
                    continue;
                };
                let label = label.trim();
                if !self.is_terminal_element(element, label) {
                    continue;
                }
                let mut parts = label.split(':');
                let (block_name, terminal_name) = match (parts.next(), parts.next()) {
                    (Some(block), Some(name)) => (block.to_string(), name.to_string()),
                    _ => continue,
                };

                let meta = TerminalMeta::decode(&element_function(element).unwrap_or_default());
                let cable = cable_number(diagram, element);
                let xref = self.element_xref(diagram, element);
                let raw_position = meta
                    .position
                    .clone()
                    .unwrap_or_else(|| terminal_name.clone());

                found.push((
                    raw_position,
                    Terminal {
                        uuid: element.attr("uuid").unwrap_or_default().to_string(),
                        block_name,
                        name: terminal_name,
                        position: 0,
                        xref,
                        cable,
                        kind: meta.kind,
                        hose: meta.hose.clone(),
                        hose_conductor: meta.hose_conductor.clone(),
                        bridge: meta.bridged(),
                        reserve_count: meta.reserve_count,
                        reserve_positions: meta.reserve_positions.clone(),
                        strip_size: meta.strip_size,
                    },
                ));
            }
        }

        // ORDER BY block_name DESC, position ASC; stable, so document order
        // breaks ties.
        found.sort_by(|(pos_a, a), (pos_b, b)| {
            b.block_name
                .cmp(&a.block_name)
                .then_with(|| pos_a.cmp(pos_b))
        });

        let mut terminals: Vec<Terminal> = found.into_iter().map(|(_, t)| t).collect();
        renumber_positions(&mut terminals);
        terminals
    }

    fn is_terminal_element(&self, element: &XmlNode, label: &str) -> bool {
        if !re_block_label().is_match(label) {
            return false;
        }
        let Some(element_type) = element.attr("type") else {
            return false;
        };
        self.terminal_types
            .iter()
            .any(|t| element_type.ends_with(t.as_str()))
    }

    fn element_xref(&self, diagram: &XmlNode, element: &XmlNode) -> String {
        let grid = DiagramGrid {
            rows: attr_u32(diagram, "rows", 8),
            row_size: attr_u32(diagram, "rowsize", 80),
            cols: attr_u32(diagram, "cols", 17),
            col_size: attr_u32(diagram, "colsize", 60),
        };
        let x = attr_coord(element, "x");
        let y = attr_coord(element, "y");
        let (row_letter, column) = grid.cell(x, y);

        let ctx = XrefContext {
            page: attr_u32(diagram, "order", 1) + self.page_offset,
            total_pages: self.total_pages,
            folio: diagram.attr("folio").unwrap_or_default(),
            machine: diagram.attr("machine").unwrap_or_default(),
            locmach: diagram.attr("locmach").unwrap_or_default(),
        };
        format_xref(&self.xref_format, &ctx, row_letter, column)
    }

    /// Re-encodes the packed metadata of every matching element.
    ///
    /// Elements are matched by uuid; a missing
    /// `elementInformation[name="function"]` node is created with `show="0"`.
    pub fn update_terminals(&mut self, updates: &[Terminal]) {
        let by_uuid: FxHashMap<&str, &Terminal> = updates
            .iter()
            .filter(|t| !t.uuid.is_empty())
            .map(|t| (t.uuid.as_str(), t))
            .collect();

        for diagram in &mut self.doc.root.children {
            if diagram.name != "diagram" {
                continue;
            }
            diagram.for_each_descendant_mut(&mut |element| {
                if element.name != "element" {
                    return;
                }
                let Some(terminal) = element.attr("uuid").and_then(|u| by_uuid.get(u)) else {
                    return;
                };
                let value = encode_meta(terminal);

                if element.child("elementInformations").is_none() {
                    element.push_child(XmlNode::new("elementInformations"));
                }
                let Some(infos) = element.child_mut("elementInformations") else {
                    return;
                };
                match infos
                    .children
                    .iter_mut()
                    .find(|n| n.name == "elementInformation" && n.attr("name") == Some("function"))
                {
                    Some(info) => info.text = Some(value),
                    None => infos.push_child(
                        XmlNode::new("elementInformation")
                            .with_attr("name", "function")
                            .with_attr("show", "0")
                            .with_text(value),
                    ),
                }
            });
        }

        self.terminals = self.extract_terminals();
    }

    /// Inserts a generated terminal-block element into the embedded
    /// collection, replacing any previous `TB_<name>.elmt`.
    pub fn insert_terminal_block(&mut self, name: &str, node: XmlNode) -> Result<()> {
        let element_name = format!("TB_{name}.elmt");
        let category = self
            .doc
            .root
            .child_mut("collection")
            .and_then(|c| c.child_mut("category"))
            .ok_or_else(|| Error::InvalidProject {
                message: "project has no collection/category node".to_string(),
            })?;

        let removed = category
            .remove_descendants_where(&|n| n.name == "element" && n.attr("name") == Some(element_name.as_str()));
        if removed > 0 {
            tracing::debug!(element = %element_name, removed, "replaced existing terminal block");
        }
        category.insert_child(0, node);
        Ok(())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.doc.save(path)
    }

    pub fn to_xml_string(&self) -> String {
        self.doc.to_xml_string()
    }
}

/// Collection element names whose definition links as a terminal.
fn terminal_element_types(root: &XmlNode) -> Vec<String> {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut types = Vec::new();
    let Some(collection) = root.child("collection") else {
        return types;
    };
    for element in collection.descendants().filter(|n| n.name == "element") {
        let Some(definition) = element.children.first() else {
            continue;
        };
        if definition.attr("link_type") != Some("terminal") {
            continue;
        }
        if let Some(name) = element.attr("name") {
            if seen.insert(name) {
                types.push(name.to_string());
            }
        }
    }
    types
}

/// The element's display label.
///
/// Taken from the `dynamic_texts` section; older QET files carry it in
/// `elementInformations` as `label` (or `formula` when the label is empty).
fn element_label(element: &XmlNode) -> Option<String> {
    if let Some(dynamic_texts) = element.child("dynamic_texts") {
        for d in dynamic_texts.children_named("dynamic_elmt_text") {
            if d.attr("text_from") == Some("ElementInfo") {
                return Some(d.child("text").and_then(|t| t.text.clone()).unwrap_or_default());
            }
        }
    }

    let infos = element.child("elementInformations")?;
    let mut label = String::new();
    let mut formula = String::new();
    for info in infos.children_named("elementInformation") {
        match info.attr("name") {
            Some("label") => label = info.text.clone().unwrap_or_default(),
            Some("formula") => formula = info.text.clone().unwrap_or_default(),
            _ => {}
        }
    }
    if label.is_empty() { Some(formula) } else { Some(label) }
}

/// Text of `elementInformation[name="function"]`, the packed metadata slot.
fn element_function(element: &XmlNode) -> Option<String> {
    element
        .child("elementInformations")?
        .children_named("elementInformation")
        .find(|n| n.attr("name") == Some("function"))
        .and_then(|n| n.text.clone())
}

/// Conductor number wired to the element.
///
/// Both pins are looked up in the diagram's conductor list; the first pin's
/// number wins, the second is the fallback.
fn cable_number(diagram: &XmlNode, element: &XmlNode) -> String {
    let pins: Vec<&str> = element
        .child("terminals")
        .map(|t| {
            t.children_named("terminal")
                .filter_map(|n| n.attr("id"))
                .collect()
        })
        .unwrap_or_default();

    let lookup = |pin: &str| -> String {
        let Some(conductors) = diagram.child("conductors") else {
            return String::new();
        };
        let mut num = String::new();
        for conductor in conductors.children_named("conductor") {
            let wired = conductor
                .attrs
                .iter()
                .any(|(k, v)| k.starts_with("terminal") && v == pin);
            if wired {
                num = conductor.attr("num").unwrap_or_default().to_string();
            }
        }
        num
    };

    let first = pins.first().map(|p| lookup(p)).unwrap_or_default();
    if !first.is_empty() {
        return first;
    }
    pins.get(1).map(|p| lookup(p)).unwrap_or_default()
}

fn attr_u32(node: &XmlNode, key: &str, default: u32) -> u32 {
    node.attr(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Element coordinates are stored as floats; the grid math uses integers.
fn attr_coord(node: &XmlNode, key: &str) -> i64 {
    node.attr(key)
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or(0.0) as i64
}

/// Renumbers positions 1..n within each run of equal block names.
fn renumber_positions(terminals: &mut [Terminal]) {
    let mut previous_block = String::new();
    let mut next = 1;
    for t in terminals {
        if t.block_name != previous_block {
            next = 1;
            previous_block = t.block_name.clone();
        }
        t.position = next;
        next += 1;
    }
}

/// Fills numeric numbering gaps of a single block with reserve terminals.
///
/// Works only when every terminal name in the slice is numeric; gaps in
/// `1..max`, explicitly requested positions and `reserve_count` extra slots
/// past the end are synthesized with the given reservation label, then the
/// block is re-sorted numerically and renumbered.
pub fn fill_reserve_gaps(terminals: &mut Vec<Terminal>, reservation_label: &str) {
    let Some(block_name) = terminals.first().map(|t| t.block_name.clone()) else {
        return;
    };
    let mut numbers: Vec<u32> = Vec::with_capacity(terminals.len());
    for t in terminals.iter() {
        match t.name.parse() {
            Ok(n) => numbers.push(n),
            Err(_) => return,
        }
    }

    let max = numbers.iter().copied().max().unwrap_or(0);
    let extra = terminals.iter().map(|t| t.reserve_count).max().unwrap_or(0);
    let mut wanted: Vec<u32> = (1..=max + extra).collect();
    for raw in terminals
        .iter()
        .flat_map(|t| t.reserve_positions.split([',', ' ', ';']))
    {
        if let Ok(n) = raw.trim().parse::<u32>() {
            if n > 0 && !wanted.contains(&n) {
                wanted.push(n);
            }
        }
    }

    let have: FxHashSet<u32> = numbers.iter().copied().collect();
    for n in wanted {
        if !have.contains(&n) {
            terminals.push(Terminal::reserve(&block_name, n.to_string(), reservation_label));
        }
    }

    terminals.sort_by_key(|t| t.name.parse::<u32>().unwrap_or(u32::MAX));
    renumber_positions(terminals);
}
