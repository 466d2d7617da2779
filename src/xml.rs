//! Namespace-agnostic XML element tree.
//!
//! CAMT files from different banks disagree on prefixes and namespace URIs, so
//! elements and attributes are stored under their local name only. The tree is
//! built from `quick-xml` events; lookups go one child level at a time.

use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// An XML element with its local name, attributes, text and child elements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

/// Parse `xml` into a tree and return its root element.
pub fn parse_document(xml: &str) -> Result<Element> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(Element::from_start(&start)?),
            Event::Empty(start) => {
                let element = Element::from_start(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| Error::Xml("unexpected closing tag".to_string()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                match stack.last_mut() {
                    Some(current) => current.text.push_str(&text),
                    None if !text.trim().is_empty() => {
                        return Err(Error::Xml("text outside of the root element".to_string()));
                    }
                    None => {}
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(Error::Xml(format!("unclosed element <{}>", open.name)));
    }

    root.ok_or_else(|| Error::Xml("document has no root element".to_string()))
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(Error::Xml("multiple root elements".to_string()));
    }
    *root = Some(element);
    Ok(())
}

impl Element {
    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();

        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = attr.key.as_ref();
            if key == b"xmlns" || key.starts_with(b"xmlns:") {
                continue;
            }
            let local = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            attributes.push((local, attr.unescape_value()?.into_owned()));
        }

        Ok(Element {
            name,
            attributes,
            text: String::new(),
            children: Vec::new(),
        })
    }

    /// Local name of the element.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value of the attribute with the given local name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First direct child with the given local name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children with the given local name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Text content of the element and its descendants, trimmed.
    pub fn text(&self) -> String {
        let mut content = String::new();
        self.collect_text(&mut content);
        content.trim().to_string()
    }

    fn collect_text(&self, out: &mut String) {
        out.push_str(&self.text);
        for child in &self.children {
            child.collect_text(out);
        }
    }
}

// Slash-separated relative paths such as `"FrToDt/FrDtTm"`, resolved one
// child level per segment. A missing segment means "not found".
impl Element {
    /// Element at `path`.
    pub fn find(&self, path: &str) -> Option<&Element> {
        path.split('/').try_fold(self, |current, segment| current.child(segment))
    }

    /// All elements matching the last segment of `path` under its parent.
    pub fn find_all<'a>(&'a self, path: &'a str) -> Vec<&'a Element> {
        let (parent, last) = match path.rsplit_once('/') {
            Some((parent, last)) => (self.find(parent), last),
            None => (Some(self), path),
        };
        parent
            .map(|p| p.children_named(last).collect())
            .unwrap_or_default()
    }

    /// Trimmed text at `path`, or an empty string when not found.
    pub fn text_at(&self, path: &str) -> String {
        self.find(path).map(Element::text).unwrap_or_default()
    }

    /// Trimmed text at `path`, `None` when not found or empty.
    pub fn opt_text_at(&self, path: &str) -> Option<String> {
        Some(self.text_at(path)).filter(|text| !text.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ns:Document xmlns:ns="urn:iso:std:iso:20022:tech:xsd:camt.053.001.02">
  <ns:Stmt>
    <ns:FrToDt><ns:FrDtTm>2024-01-01T00:00:00</ns:FrDtTm></ns:FrToDt>
    <ns:Amt ns:Ccy="CHF">10.00</ns:Amt>
    <ns:Ntry>A</ns:Ntry>
    <ns:Ntry>B &amp; C</ns:Ntry>
    <ns:Empty/>
  </ns:Stmt>
</ns:Document>"#;

    #[test]
    fn test_local_names_ignore_prefix() {
        let root = parse_document(SAMPLE).unwrap();
        assert_eq!(root.name(), "Document");
        assert!(root.child("Stmt").is_some());
        assert_eq!(root.find("Stmt/Amt").and_then(|a| a.attribute("Ccy")), Some("CHF"));
    }

    #[test]
    fn test_path_lookup() {
        let root = parse_document(SAMPLE).unwrap();
        assert_eq!(root.text_at("Stmt/FrToDt/FrDtTm"), "2024-01-01T00:00:00");
        assert_eq!(root.text_at("Stmt/FrToDt/ToDtTm"), "");
        assert_eq!(root.text_at("Missing/FrToDt"), "");
        assert_eq!(root.opt_text_at("Stmt/Empty"), None);
    }

    #[test]
    fn test_find_all_returns_every_match() {
        let root = parse_document(SAMPLE).unwrap();
        let entries: Vec<String> = root.find_all("Stmt/Ntry").iter().map(|e| e.text()).collect();
        assert_eq!(entries, vec!["A", "B & C"]);
        assert!(root.find_all("Nope/Ntry").is_empty());
    }

    #[test]
    fn test_unprefixed_default_namespace() {
        let root = parse_document(
            r#"<Document xmlns="urn:iso:std:iso:20022:tech:xsd:camt.053.001.08"><GrpHdr><MsgId>M1</MsgId></GrpHdr></Document>"#,
        )
        .unwrap();
        assert_eq!(root.text_at("GrpHdr/MsgId"), "M1");
    }

    #[test]
    fn test_malformed_xml_is_rejected() {
        assert!(parse_document("<Document><Stmt></Document>").is_err());
        assert!(parse_document("<Document><Stmt>").is_err());
        assert!(parse_document("not xml at all").is_err());
        assert!(parse_document("").is_err());
    }
}
