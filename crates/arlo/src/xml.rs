//! Owned XML element tree for the Arlo resource documents.
//!
//! The API paginates by `Link rel="next"` elements and nests resources
//! several levels deep, so responses are parsed into a small owned tree
//! that supports merging pages (appending top-level children) and
//! fixed-depth child lookups. Not a general-purpose XML model: no
//! namespaces, comments, or processing instructions.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// One parsed element: tag name, attributes, direct text, child elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    fn from_start(e: &BytesStart<'_>) -> Result<Self, String> {
        let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
        let mut attrs = Vec::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|e| format!("bad attribute in <{}>: {}", name, e))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            let value = attr
                .unescape_value()
                .map_err(|e| format!("bad attribute value in <{}>: {}", name, e))?
                .to_string();
            attrs.push((key, value));
        }
        Ok(Self {
            name,
            attrs,
            text: String::new(),
            children: Vec::new(),
        })
    }

    /// Attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// First direct child with the given tag name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children with the given tag name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Text content of the first direct child with the given tag name.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.as_str())
    }

    /// Pre-order traversal of all descendant elements (excluding self).
    pub fn descendants(&self) -> Descendants<'_> {
        let mut stack: Vec<&Element> = self.children.iter().collect();
        stack.reverse();
        Descendants { stack }
    }

    /// Append every top-level child of `page` to this element, preserving
    /// order. Used to merge paginated responses into one tree.
    pub fn merge_page(&mut self, mut page: Element) {
        self.children.append(&mut page.children);
    }

    /// The `href` of a direct `Link rel="next"` child, if any.
    pub fn next_link(&self) -> Option<&str> {
        self.children_named("Link")
            .find(|l| l.attr("rel") == Some("next"))
            .and_then(|l| l.attr("href"))
    }
}

pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let el = self.stack.pop()?;
        self.stack.extend(el.children.iter().rev());
        Some(el)
    }
}

/// Parse an XML document into its root element.
pub fn parse(xml: &str) -> Result<Element, String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                stack.push(Element::from_start(e)?);
            }
            Ok(Event::Empty(ref e)) => {
                let el = Element::from_start(e)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(el),
                    // Whole document is a single self-closing element.
                    None => return Ok(el),
                }
            }
            Ok(Event::Text(ref t)) => {
                if let Some(top) = stack.last_mut() {
                    let text = t
                        .unescape()
                        .map_err(|e| format!("bad text in <{}>: {}", top.name, e))?;
                    top.text.push_str(&text);
                }
            }
            Ok(Event::End(_)) => {
                let el = stack.pop().ok_or("unbalanced closing tag")?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(el),
                    None => return Ok(el),
                }
            }
            Ok(Event::Eof) => return Err("document has no root element".into()),
            Err(e) => return Err(format!("XML parse error: {}", e)),
            _ => {}
        }
        buf.clear();
    }
}
