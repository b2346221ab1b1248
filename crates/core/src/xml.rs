//! Owned XML element tree with local-name matching.
//!
//! EPUB documents mix namespace prefixes freely (`dc:title` vs `title`,
//! `opf:scheme` vs `scheme`), so element and attribute lookups here match
//! on the local name with any prefix stripped.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::XmlError;

#[derive(Debug, Clone, PartialEq)]
pub struct XmlAttr {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// One element: local name, attributes (local names), ordered children.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    name: String,
    attrs: Vec<XmlAttr>,
    children: Vec<XmlNode>,
}

impl XmlElement {
    /// Parses a document and returns its root element.
    pub fn parse(xml: &str) -> Result<XmlElement, XmlError> {
        let mut reader = Reader::from_str(xml);
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event()? {
                Event::Start(e) => stack.push(element_from_start(&e)),
                Event::Empty(e) => {
                    let el = element_from_start(&e);
                    attach(&mut stack, &mut root, el);
                }
                Event::End(_) => {
                    if let Some(el) = stack.pop() {
                        attach(&mut stack, &mut root, el);
                    }
                }
                Event::Text(e) => {
                    let text = e.unescape().unwrap_or_default().into_owned();
                    if !text.is_empty() {
                        if let Some(parent) = stack.last_mut() {
                            parent.children.push(XmlNode::Text(text));
                        }
                    }
                }
                Event::CData(e) => {
                    let raw = e.into_inner();
                    let text = String::from_utf8_lossy(&raw).into_owned();
                    if !text.is_empty() {
                        if let Some(parent) = stack.last_mut() {
                            parent.children.push(XmlNode::Text(text));
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(XmlError::Truncated);
        }
        root.ok_or(XmlError::NoRoot)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// First attribute whose local name matches, empty values included.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Direct element children in document order.
    pub fn children(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(el) => Some(el),
            XmlNode::Text(_) => None,
        })
    }

    /// All descendant elements in document order, self excluded.
    pub fn descendants(&self) -> Descendants<'_> {
        let mut stack: Vec<&XmlElement> = self.children().collect();
        stack.reverse();
        Descendants { stack }
    }

    /// First descendant with the given local name.
    pub fn find(&self, name: &str) -> Option<&XmlElement> {
        self.descendants().find(|el| el.name == name)
    }

    /// Every descendant with the given local name, document order.
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.descendants().filter(move |el| el.name == name)
    }

    /// Concatenated text of self and all descendants, trimmed at the edges.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out.trim().to_string()
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                XmlNode::Text(t) => out.push_str(t),
                XmlNode::Element(el) => el.collect_text(out),
            }
        }
    }
}

/// Depth-first document-order walk over descendant elements.
pub struct Descendants<'a> {
    stack: Vec<&'a XmlElement>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlElement;

    fn next(&mut self) -> Option<Self::Item> {
        let el = self.stack.pop()?;
        for child in el.children().collect::<Vec<_>>().into_iter().rev() {
            self.stack.push(child);
        }
        Some(el)
    }
}

/// Trimmed text content of an element, or the empty string.
pub fn text_of(el: Option<&XmlElement>) -> String {
    el.map(XmlElement::text).unwrap_or_default()
}

/// Trimmed text of every matching descendant, empties dropped.
pub fn texts_of(parent: Option<&XmlElement>, name: &str) -> Vec<String> {
    parent
        .map(|p| {
            p.find_all(name)
                .map(XmlElement::text)
                .filter(|t| !t.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn attach(stack: &mut Vec<XmlElement>, root: &mut Option<XmlElement>, el: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(XmlNode::Element(el)),
        None => {
            if root.is_none() {
                *root = Some(el);
            }
        }
    }
}

fn element_from_start(e: &BytesStart) -> XmlElement {
    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
    let mut attrs = Vec::new();
    for attr in e.attributes().flatten() {
        let key = attr.key.as_ref();
        if key == b"xmlns" || key.starts_with(b"xmlns:") {
            continue;
        }
        let name = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map(|v| v.into_owned())
            .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
        attrs.push(XmlAttr { name, value });
    }
    XmlElement {
        name,
        attrs,
        children: Vec::new(),
    }
}
