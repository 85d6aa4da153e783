//! Owned, mutable XML tree for `.qet` documents.
//!
//! `roxmltree` is used for parsing only; the project file has to be edited in
//! place (terminal metadata rewrites, generated block insertion) and written
//! back, so the parsed document is converted into this owned tree.

use crate::error::Result;
use indexmap::IndexMap;
use regex::Regex;
use std::fmt::Write as _;
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlNode {
    pub name: String,
    pub attrs: IndexMap<String, String>,
    pub text: Option<String>,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: IndexMap::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: XmlNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(key.into(), value.into());
    }

    pub fn push_child(&mut self, child: XmlNode) {
        self.children.push(child);
    }

    pub fn insert_child(&mut self, index: usize, child: XmlNode) {
        let index = index.min(self.children.len());
        self.children.insert(index, child);
    }

    /// First direct child with the given element name.
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut XmlNode> {
        self.children.iter_mut().find(|c| c.name == name)
    }

    /// Direct children with the given element name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Depth-first traversal over this node and all descendants.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Depth-first mutable visit of this node and all descendants.
    pub fn for_each_descendant_mut(&mut self, f: &mut impl FnMut(&mut XmlNode)) {
        f(self);
        for child in &mut self.children {
            child.for_each_descendant_mut(f);
        }
    }

    /// Removes matching elements anywhere under this node. Returns the number
    /// of removed elements.
    pub fn remove_descendants_where(&mut self, pred: &impl Fn(&XmlNode) -> bool) -> usize {
        let before = self.children.len();
        self.children.retain(|c| !pred(c));
        let mut removed = before - self.children.len();
        for child in &mut self.children {
            removed += child.remove_descendants_where(pred);
        }
        removed
    }

    fn write(&self, out: &mut String, indent: usize) {
        let pad = "  ".repeat(indent);
        let _ = write!(out, "{pad}<{}", self.name);
        for (key, value) in &self.attrs {
            let _ = write!(out, " {key}=\"{}\"", escape_attr(value));
        }
        match (&self.text, self.children.is_empty()) {
            (None, true) => {
                out.push_str("/>\n");
            }
            (Some(text), true) => {
                let _ = writeln!(out, ">{}</{}>", escape_text(text), self.name);
            }
            (text, false) => {
                out.push_str(">");
                if let Some(text) = text {
                    out.push_str(&escape_text(text));
                }
                out.push('\n');
                for child in &self.children {
                    child.write(out, indent + 1);
                }
                let _ = writeln!(out, "{pad}</{}>", self.name);
            }
        }
    }
}

pub struct Descendants<'a> {
    stack: Vec<&'a XmlNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    pub root: XmlNode,
    has_declaration: bool,
}

impl XmlDocument {
    /// Parses a document, sanitizing undeclared namespace prefixes first.
    pub fn parse(text: &str) -> Result<Self> {
        let sanitized = sanitize_namespaces(text);
        let doc = roxmltree::Document::parse(&sanitized)?;
        let root = build_node(doc.root_element(), true);
        Ok(Self {
            root,
            has_declaration: text.trim_start().starts_with("<?xml"),
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_xml_string())?;
        Ok(())
    }

    pub fn to_xml_string(&self) -> String {
        let mut out = String::new();
        if self.has_declaration {
            out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
        }
        self.root.write(&mut out, 0);
        out
    }
}

fn qualified_name(n: roxmltree::Node<'_, '_>, local: &str, namespace: Option<&str>) -> String {
    match namespace
        .and_then(|uri| n.lookup_prefix(uri))
        .filter(|p| !p.is_empty())
    {
        Some(prefix) => format!("{prefix}:{local}"),
        None => local.to_string(),
    }
}

fn build_node(n: roxmltree::Node<'_, '_>, is_root: bool) -> XmlNode {
    let mut node = XmlNode::new(qualified_name(n, n.tag_name().name(), n.tag_name().namespace()));

    // Namespace declarations are not part of `roxmltree`'s attribute list.
    // Re-attaching the in-scope set at the root is enough for `.qet` files.
    if is_root {
        for ns in n.namespaces() {
            match ns.name() {
                Some(prefix) => node
                    .attrs
                    .insert(format!("xmlns:{prefix}"), ns.uri().to_string()),
                None => node.attrs.insert("xmlns".to_string(), ns.uri().to_string()),
            };
        }
    }

    for a in n.attributes() {
        node.attrs.insert(
            qualified_name(n, a.name(), a.namespace()),
            a.value().to_string(),
        );
    }

    node.text = n
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    for c in n.children().filter(|c| c.is_element()) {
        node.children.push(build_node(c, false));
    }

    node
}

fn re_prefix() -> &'static Regex {
    static ONCE: OnceLock<Regex> = OnceLock::new();
    ONCE.get_or_init(|| Regex::new(r"[\s<](\w+):").unwrap())
}

/// Declares undeclared namespace prefixes on the root element.
///
/// QET projects that were edited to carry a custom logo can reference
/// `ns0:`/`dc:`/`rdf:` prefixes without ever declaring them, which a strict
/// XML parser rejects. The synthetic declarations only exist in memory; the
/// file on disk is untouched until `save`.
pub fn sanitize_namespaces(text: &str) -> String {
    let mut missing: Vec<&str> = Vec::new();
    for caps in re_prefix().captures_iter(text) {
        let prefix = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        if !(prefix.starts_with("ns") || prefix.starts_with("dc") || prefix.starts_with("rdf")) {
            continue;
        }
        if missing.contains(&prefix) {
            continue;
        }
        if text.contains(&format!("xmlns:{prefix}=")) {
            continue;
        }
        missing.push(prefix);
    }
    if missing.is_empty() {
        return text.to_string();
    }

    let mut declarations = String::new();
    for prefix in &missing {
        let _ = write!(declarations, " xmlns:{prefix}=\"{prefix}\"");
    }
    tracing::debug!(prefixes = ?missing, "declaring missing xml namespaces");

    // Insert into the root element start tag, skipping the declaration and
    // any comments or doctype before it.
    let mut search_from = 0usize;
    while let Some(rel) = text[search_from..].find('<') {
        let start = search_from + rel;
        let rest = &text[start..];
        if rest.starts_with("<?") || rest.starts_with("<!") {
            match rest.find('>') {
                Some(end_rel) => {
                    search_from = start + end_rel + 1;
                    continue;
                }
                None => return text.to_string(),
            }
        }
        let Some(tag_end_rel) = rest.find('>') else {
            return text.to_string();
        };
        let mut insert_at = start + tag_end_rel;
        if text[..insert_at].ends_with('/') {
            insert_at -= 1;
        }
        let mut out = String::with_capacity(text.len() + declarations.len());
        out.push_str(&text[..insert_at]);
        out.push_str(&declarations);
        out.push_str(&text[insert_at..]);
        return out;
    }
    text.to_string()
}

pub(crate) fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

pub(crate) fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}
