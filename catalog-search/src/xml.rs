//! Namespace-aware XML navigation and a small event writer.
//!
//! Capability and catalog documents are matched on local element names, with
//! namespace URIs checked where two vocabularies share a name (Dublin Core vs
//! ISO elements in CSW responses).

use anyhow::{Context, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use roxmltree::{Document, Node, ParsingOptions};

pub const NS_CSW: &str = "http://www.opengis.net/cat/csw/2.0.2";
pub const NS_OGC: &str = "http://www.opengis.net/ogc";
pub const NS_GML: &str = "http://www.opengis.net/gml";
pub const NS_OWS: &str = "http://www.opengis.net/ows";
pub const NS_DC: &str = "http://purl.org/dc/elements/1.1/";
pub const NS_DCT: &str = "http://purl.org/dc/terms/";

/// Parses `body`, accepting a DOCTYPE. WMS 1.1.1 servers send one with
/// capabilities and DescribeLayer responses.
pub fn parse(body: &str) -> Result<Document<'_>> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    Document::parse_with_options(body, options).context("Failed to parse XML document")
}

/// Local name of an element.
pub fn local_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

pub fn is_element(node: Node<'_, '_>, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}

/// First child element with the given local name.
pub fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| is_element(*n, name))
}

/// All child elements with the given local name, in document order.
pub fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children().filter(move |n| is_element(*n, name))
}

pub fn elements<'a, 'input: 'a>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children().filter(|n| n.is_element())
}

/// First descendant element (including `node` itself) with the given local name.
pub fn descendant<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.descendants().find(|n| is_element(*n, name))
}

/// Follows a chain of child elements by local name.
pub fn path<'a, 'input>(node: Node<'a, 'input>, names: &[&str]) -> Option<Node<'a, 'input>> {
    names.iter().try_fold(node, |current, name| child(current, name))
}

/// Trimmed text content, `None` when empty.
pub fn text(node: Node<'_, '_>) -> Option<String> {
    let collected: String = node
        .descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect();
    let trimmed = collected.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn child_text(node: Node<'_, '_>, name: &str) -> Option<String> {
    child(node, name).and_then(text)
}

/// Attribute by local name, ignoring its namespace (`xlink:href` -> `href`).
pub fn attr<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attributes()
        .find(|a| a.name() == name)
        .map(|a| a.value())
}

/// Raw source text of an element, markup included.
pub fn raw(node: Node<'_, '_>) -> String {
    node.document().input_text()[node.range()].to_string()
}

pub fn parse_f64(value: &str) -> Option<f64> {
    value.trim().parse().ok()
}

/// Parses a whitespace-separated coordinate pair such as `"-180 -90"`.
pub fn parse_corner(value: &str) -> Option<(f64, f64)> {
    let mut parts = value.split_whitespace().map(parse_f64);
    match (parts.next(), parts.next()) {
        (Some(Some(a)), Some(Some(b))) => Some((a, b)),
        _ => None,
    }
}

/// Minimal XML event writer used to marshal request documents.
pub struct XmlWriter {
    writer: Writer<Vec<u8>>,
}

impl XmlWriter {
    pub fn new() -> Result<Self> {
        let mut writer = Writer::new(Vec::new());
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .context("Failed to write XML declaration")?;
        Ok(Self { writer })
    }

    /// Writer for a fragment, without an XML declaration.
    pub fn fragment() -> Self {
        Self {
            writer: Writer::new(Vec::new()),
        }
    }

    pub fn start(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        let mut start = BytesStart::new(name);
        for attribute in attributes {
            start.push_attribute(*attribute);
        }
        self.writer
            .write_event(Event::Start(start))
            .with_context(|| format!("Failed to write <{}>", name))?;
        Ok(())
    }

    pub fn end(&mut self, name: &str) -> Result<()> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .with_context(|| format!("Failed to write </{}>", name))?;
        Ok(())
    }

    pub fn text_element(
        &mut self,
        name: &str,
        attributes: &[(&str, &str)],
        text: &str,
    ) -> Result<()> {
        self.start(name, attributes)?;
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .with_context(|| format!("Failed to write text of <{}>", name))?;
        self.end(name)
    }

    pub fn finish(self) -> Result<String> {
        String::from_utf8(self.writer.into_inner()).context("Generated XML is not valid UTF-8")
    }
}
