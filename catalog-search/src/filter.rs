//! OGC Filter Encoding predicates for CSW constraints.
//!
//! Predicates are built bottom-up from `PropertyIsLike` and `BBOX` leaves and
//! combined with `And`/`Or`. They marshal into `ogc:Filter` markup and parse
//! back into an identical tree.

use anyhow::{bail, Context, Result};
use roxmltree::Node;
use serde::{Deserialize, Serialize};

use crate::xml::{self, XmlWriter, NS_GML, NS_OGC};

pub const WILDCARD: &str = "%";
pub const SINGLE_CHAR: &str = "_";
pub const ESCAPE_CHAR: &str = "\\";
pub const ANY_TEXT: &str = "AnyText";
const BBOX_PROPERTY: &str = "ows:BoundingBox";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum FilterPredicate {
    #[serde(rename_all = "camelCase")]
    PropertyIsLike {
        property_name: String,
        literal: String,
        wild_card: String,
        single_char: String,
        escape_char: String,
    },
    #[serde(rename = "bbox", rename_all = "camelCase")]
    BBox {
        low_lat: f64,
        low_lon: f64,
        high_lat: f64,
        high_lon: f64,
        srs_name: String,
    },
    And { ops: Vec<FilterPredicate> },
    Or { ops: Vec<FilterPredicate> },
}

/// `PropertyIsLike` leaf; `value` is wrapped in wildcards on any side that lacks one.
pub fn property_is_like(property: &str, value: &str) -> FilterPredicate {
    let mut literal = String::with_capacity(value.len() + 2);
    if !value.starts_with(WILDCARD) {
        literal.push_str(WILDCARD);
    }
    literal.push_str(value);
    if !value.ends_with(WILDCARD) || value == WILDCARD {
        literal.push_str(WILDCARD);
    }
    FilterPredicate::PropertyIsLike {
        property_name: property.to_string(),
        literal,
        wild_card: WILDCARD.to_string(),
        single_char: SINGLE_CHAR.to_string(),
        escape_char: ESCAPE_CHAR.to_string(),
    }
}

/// Full-text predicate on the CSW `AnyText` queryable.
pub fn any_text(text: &str) -> FilterPredicate {
    property_is_like(ANY_TEXT, text)
}

pub fn bbox(
    low_lat: f64,
    low_lon: f64,
    high_lat: f64,
    high_lon: f64,
    srs_name: &str,
) -> FilterPredicate {
    FilterPredicate::BBox {
        low_lat,
        low_lon,
        high_lat,
        high_lon,
        srs_name: srs_name.to_string(),
    }
}

pub fn and(ops: Vec<FilterPredicate>) -> Result<FilterPredicate> {
    if ops.len() < 2 {
        bail!("And requires at least two predicates, got {}", ops.len());
    }
    Ok(FilterPredicate::And { ops })
}

pub fn or(ops: Vec<FilterPredicate>) -> Result<FilterPredicate> {
    if ops.len() < 2 {
        bail!("Or requires at least two predicates, got {}", ops.len());
    }
    Ok(FilterPredicate::Or { ops })
}

/// Top-level `ogc:Filter` wrapper placed inside a CSW constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub predicate: FilterPredicate,
}

pub fn filter(predicate: FilterPredicate) -> Filter {
    Filter { predicate }
}

impl Filter {
    /// Writes `<ogc:Filter>`; `declare_namespaces` adds xmlns attributes for
    /// standalone documents.
    pub fn write(&self, writer: &mut XmlWriter, declare_namespaces: bool) -> Result<()> {
        if declare_namespaces {
            writer.start("ogc:Filter", &[("xmlns:ogc", NS_OGC), ("xmlns:gml", NS_GML)])?;
        } else {
            writer.start("ogc:Filter", &[])?;
        }
        write_predicate(writer, &self.predicate)?;
        writer.end("ogc:Filter")
    }

    pub fn to_xml(&self) -> Result<String> {
        let mut writer = XmlWriter::fragment();
        self.write(&mut writer, true)?;
        writer.finish()
    }

    pub fn from_xml(body: &str) -> Result<Self> {
        let doc = xml::parse(body)?;
        Self::from_node(doc.root_element())
    }

    /// Reads an `ogc:Filter` element.
    pub fn from_node(node: Node<'_, '_>) -> Result<Self> {
        if !xml::is_element(node, "Filter") {
            bail!("Expected ogc:Filter, found <{}>", xml::local_name(node));
        }
        let mut predicates = xml::elements(node);
        let first = predicates
            .next()
            .context("ogc:Filter has no predicate")?;
        if predicates.next().is_some() {
            bail!("ogc:Filter must contain exactly one predicate");
        }
        Ok(Filter {
            predicate: read_predicate(first)?,
        })
    }
}

fn write_predicate(writer: &mut XmlWriter, predicate: &FilterPredicate) -> Result<()> {
    match predicate {
        FilterPredicate::PropertyIsLike {
            property_name,
            literal,
            wild_card,
            single_char,
            escape_char,
        } => {
            writer.start(
                "ogc:PropertyIsLike",
                &[
                    ("wildCard", wild_card.as_str()),
                    ("singleChar", single_char.as_str()),
                    ("escapeChar", escape_char.as_str()),
                ],
            )?;
            writer.text_element("ogc:PropertyName", &[], property_name)?;
            writer.text_element("ogc:Literal", &[], literal)?;
            writer.end("ogc:PropertyIsLike")
        }
        FilterPredicate::BBox {
            low_lat,
            low_lon,
            high_lat,
            high_lon,
            srs_name,
        } => {
            writer.start("ogc:BBOX", &[])?;
            writer.text_element("ogc:PropertyName", &[], BBOX_PROPERTY)?;
            writer.start("gml:Envelope", &[("srsName", srs_name.as_str())])?;
            writer.text_element("gml:lowerCorner", &[], &format!("{} {}", low_lat, low_lon))?;
            writer.text_element("gml:upperCorner", &[], &format!("{} {}", high_lat, high_lon))?;
            writer.end("gml:Envelope")?;
            writer.end("ogc:BBOX")
        }
        FilterPredicate::And { ops } => write_logical(writer, "ogc:And", ops),
        FilterPredicate::Or { ops } => write_logical(writer, "ogc:Or", ops),
    }
}

fn write_logical(writer: &mut XmlWriter, name: &str, ops: &[FilterPredicate]) -> Result<()> {
    writer.start(name, &[])?;
    for op in ops {
        write_predicate(writer, op)?;
    }
    writer.end(name)
}

fn read_predicate(node: Node<'_, '_>) -> Result<FilterPredicate> {
    match xml::local_name(node) {
        "PropertyIsLike" => {
            // Filter Encoding 1.0 spells the escape attribute `escape`.
            let escape_char = xml::attr(node, "escapeChar")
                .or_else(|| xml::attr(node, "escape"))
                .unwrap_or(ESCAPE_CHAR);
            Ok(FilterPredicate::PropertyIsLike {
                property_name: xml::child_text(node, "PropertyName")
                    .context("PropertyIsLike without PropertyName")?,
                literal: xml::child(node, "Literal")
                    .and_then(|literal| literal.text())
                    .unwrap_or_default()
                    .to_string(),
                wild_card: xml::attr(node, "wildCard").unwrap_or(WILDCARD).to_string(),
                single_char: xml::attr(node, "singleChar").unwrap_or(SINGLE_CHAR).to_string(),
                escape_char: escape_char.to_string(),
            })
        }
        "BBOX" => {
            let envelope = xml::child(node, "Envelope").context("BBOX without gml:Envelope")?;
            let corner = |name: &str| -> Result<(f64, f64)> {
                let value = xml::child_text(envelope, name)
                    .with_context(|| format!("gml:Envelope without {}", name))?;
                xml::parse_corner(&value)
                    .with_context(|| format!("Invalid {} coordinates: {:?}", name, value))
            };
            let (low_lat, low_lon) = corner("lowerCorner")?;
            let (high_lat, high_lon) = corner("upperCorner")?;
            Ok(FilterPredicate::BBox {
                low_lat,
                low_lon,
                high_lat,
                high_lon,
                srs_name: xml::attr(envelope, "srsName").unwrap_or_default().to_string(),
            })
        }
        "And" => Ok(FilterPredicate::And {
            ops: read_operands(node)?,
        }),
        "Or" => Ok(FilterPredicate::Or {
            ops: read_operands(node)?,
        }),
        other => bail!("Unsupported filter predicate <{}>", other),
    }
}

fn read_operands(node: Node<'_, '_>) -> Result<Vec<FilterPredicate>> {
    xml::elements(node).map(read_predicate).collect()
}
