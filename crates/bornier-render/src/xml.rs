//! QElectroTech element XML for a laid-out terminal block.
//!
//! The element lands in the project's embedded collection as
//! `TB_<name>.elmt`; QET treats it like any hand-drawn symbol.

use crate::layout::{Orientation, Primitive, TerminalBlockLayout};
use crate::style::BlockStyle;
use bornier_core::XmlNode;
use uuid::Uuid;

const PRIMITIVE_STYLE: &str = "line-style:normal;line-weight:normal;filling:none;color:black";

/// Localized element names; QET shows the one matching the UI language.
const NAME_TEMPLATES: &[(&str, &str)] = &[
    ("de", "Terminalblock"),
    ("ru", "Терминальный блок"),
    ("pt", "Bloco terminal"),
    ("en", "Terminal block"),
    ("it", "Terminal block"),
    ("fr", "Bornier"),
    ("pl", "Blok zacisków"),
    ("es", "Bornero"),
    ("nl", "Eindblok"),
    ("cs", "Terminálový blok"),
];

fn fmt(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    if v.abs() < 0.0005 {
        return "0".to_string();
    }
    let mut r = (v * 1000.0).round() / 1000.0;
    if r.abs() < 0.0005 {
        r = 0.0;
    }
    let mut s = format!("{r:.3}");
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" { "0".to_string() } else { s }
}

fn braced_uuid() -> String {
    Uuid::new_v4().braced().to_string()
}

pub fn element_xml(layout: &TerminalBlockLayout, style: &BlockStyle) -> XmlNode {
    let element_name = format!("TB_{}", layout.name);

    let mut definition = XmlNode::new("definition")
        .with_attr("height", fmt(layout.height))
        .with_attr("width", fmt(layout.width))
        .with_attr("hotspot_x", "5")
        .with_attr("hotspot_y", "24")
        .with_attr("link_type", "simple")
        .with_attr("orientation", "dyyy")
        .with_attr("version", "0.4")
        .with_attr("type", "element");

    definition.push_child(XmlNode::new("uuid").with_attr("uuid", braced_uuid()));

    let mut names = XmlNode::new("names");
    for (lang, template) in NAME_TEMPLATES {
        names.push_child(
            XmlNode::new("name")
                .with_attr("lang", *lang)
                .with_text(format!("{template} {element_name}")),
        );
    }
    definition.push_child(names);

    // The element label shown on the diagram, bound to the element info.
    definition.push_child(
        XmlNode::new("dynamic_text")
            .with_attr("x", fmt(style.head_width + 5.0))
            .with_attr("y", fmt(style.head_height + 5.0))
            .with_attr("z", "2")
            .with_attr("text_from", "ElementInfo")
            .with_attr("text_width", "-1")
            .with_attr("uuid", braced_uuid())
            .with_attr("font_size", "10")
            .with_attr("frame", "false")
            .with_child(XmlNode::new("text").with_text(layout.name.clone()))
            .with_child(XmlNode::new("info_name").with_text("label")),
    );

    definition.push_child(XmlNode::new("informations").with_text("Terminal block"));

    let mut description = XmlNode::new("description");
    for primitive in &layout.primitives {
        description.push_child(primitive_xml(primitive));
    }
    definition.push_child(description);

    XmlNode::new("element")
        .with_attr("name", format!("{element_name}.elmt"))
        .with_child(definition)
}

fn primitive_xml(primitive: &Primitive) -> XmlNode {
    match primitive {
        Primitive::Rect {
            x,
            y,
            width,
            height,
        } => XmlNode::new("rect")
            .with_attr("x", fmt(*x))
            .with_attr("y", fmt(*y))
            .with_attr("width", fmt(*width))
            .with_attr("height", fmt(*height))
            .with_attr("antialias", "false")
            .with_attr("style", PRIMITIVE_STYLE),
        Primitive::Line { x1, y1, x2, y2 } => XmlNode::new("line")
            .with_attr("x1", fmt(*x1))
            .with_attr("x2", fmt(*x2))
            .with_attr("y1", fmt(*y1))
            .with_attr("y2", fmt(*y2))
            .with_attr("length1", "1.5")
            .with_attr("length2", "1.5")
            .with_attr("end1", "none")
            .with_attr("end2", "none")
            .with_attr("antialias", "false")
            .with_attr("style", PRIMITIVE_STYLE),
        Primitive::Circle { x, y, diameter } => XmlNode::new("circle")
            .with_attr("x", fmt(*x))
            .with_attr("y", fmt(*y))
            .with_attr("diameter", fmt(*diameter))
            .with_attr("antialias", "false")
            .with_attr("style", PRIMITIVE_STYLE),
        Primitive::Label {
            x,
            y,
            font_size,
            text,
            color,
        } => {
            let mut label = XmlNode::new("dynamic_text")
                .with_attr("x", fmt(*x))
                .with_attr("y", fmt(*y))
                .with_attr("z", "3")
                .with_attr("text_from", "UserText")
                .with_attr("uuid", braced_uuid())
                .with_attr("font_size", fmt(*font_size))
                .with_attr("frame", "false")
                .with_attr("rotation", "270")
                .with_child(XmlNode::new("text").with_text(text.clone()));
            if let Some(color) = color {
                label.push_child(XmlNode::new("color").with_text(color.clone()));
            }
            label
        }
        Primitive::Anchor { x, y, orientation } => XmlNode::new("terminal")
            .with_attr("x", fmt(*x))
            .with_attr("y", fmt(*y))
            .with_attr(
                "orientation",
                match orientation {
                    Orientation::North => "n",
                    Orientation::South => "s",
                },
            ),
    }
}
