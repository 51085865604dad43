//! XML document abstraction layer.
//!
//! `ConfigDocument` and `Element` wrap `quick-xml` events in a small arena
//! tree so the translator never touches the XML reader directly.
//!
//! General entities declared in an internal DTD subset are expanded with
//! their literal value. Parameter and external entities are not supported.

use std::borrow::Cow;
use std::collections::HashMap;
use std::ops::Range;
use std::path::Path;

use quick_xml::escape::{unescape_with, EscapeError};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::ConfigError;

/// Parsed XML document paired with its source text.
///
/// Elements are stored in document order (pre-order of start tags), so the
/// descendants of any element occupy a contiguous index range directly after it.
#[derive(Debug)]
pub struct ConfigDocument {
    nodes: Vec<Node>,
    source: String,
}

#[derive(Debug)]
struct Node {
    name: String,
    attributes: Vec<(String, String)>,
    content: Vec<Content>,
    /// One past the index of the last descendant.
    end: usize,
    offset: usize,
}

#[derive(Debug)]
enum Content {
    Element(usize),
    Text(String),
}

/// Borrowed handle to a single element of a [`ConfigDocument`].
#[derive(Debug, Clone, Copy)]
pub struct Element<'a> {
    doc: &'a ConfigDocument,
    index: usize,
}

impl ConfigDocument {
    /// Parse an XML source string into a document.
    ///
    /// Returns `ConfigError::ParseError` for anything that is not a single
    /// well-formed root element.
    ///
    /// Line endings are normalized to `\n` before parsing.
    pub fn parse(source: &str) -> Result<Self, ConfigError> {
        let source = normalize_line_endings(source);
        TreeBuilder::new(&source).build()
    }

    /// Load and parse an XML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::ReadError(e)
            }
        })?;
        Self::parse(&content)
    }

    #[cfg(test)]
    pub(crate) fn root(&self) -> Element<'_> {
        Element {
            doc: self,
            index: 0,
        }
    }

    /// All elements named `tag` anywhere in the document, root included,
    /// in document order.
    pub fn find_elements(&self, tag: &str) -> Vec<Element<'_>> {
        self.elements_named(0..self.nodes.len(), tag)
    }

    fn elements_named(&self, range: Range<usize>, tag: &str) -> Vec<Element<'_>> {
        range
            .filter(|&index| self.nodes[index].name == tag)
            .map(|index| Element { doc: self, index })
            .collect()
    }
}

impl<'a> Element<'a> {
    fn node(&self) -> &'a Node {
        &self.doc.nodes[self.index]
    }

    #[cfg(test)]
    pub(crate) fn name(&self) -> &'a str {
        &self.node().name
    }

    /// Unescaped value of the attribute `name`, if present.
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.node()
            .attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Concatenated text and CDATA of this element and all descendants.
    ///
    /// Whitespace is preserved exactly.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for content in &self.node().content {
            match content {
                Content::Text(text) => out.push_str(text),
                Content::Element(index) => Element {
                    doc: self.doc,
                    index: *index,
                }
                .collect_text(out),
            }
        }
    }

    /// All descendant elements named `tag`, at any depth, in document order.
    ///
    /// The element itself is never included.
    pub fn find_elements(&self, tag: &str) -> Vec<Element<'a>> {
        self.doc.elements_named(self.index + 1..self.node().end, tag)
    }

    /// 1-based line number of this element's start tag.
    pub fn line(&self) -> usize {
        line_at(&self.doc.source, self.node().offset)
    }
}

fn normalize_line_endings(source: &str) -> Cow<'_, str> {
    if source.contains('\r') {
        Cow::Owned(source.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(source)
    }
}

/// Literal tab, CR and LF in attribute values become spaces.
fn normalize_attribute_whitespace(raw: &str) -> String {
    raw.chars()
        .map(|c| if matches!(c, '\t' | '\r' | '\n') { ' ' } else { c })
        .collect()
}

fn predefined_entity(name: &str) -> Option<&'static str> {
    match name {
        "lt" => Some("<"),
        "gt" => Some(">"),
        "amp" => Some("&"),
        "apos" => Some("'"),
        "quot" => Some("\""),
        _ => None,
    }
}

/// Splits `name "value"` off the text following `<!ENTITY`.
///
/// Returns the name, the literal value and the remaining text, or `None` for
/// parameter entities and external (`SYSTEM`/`PUBLIC`) entities.
fn entity_declaration(decl: &str) -> Option<(&str, &str, &str)> {
    let decl = decl.trim_start();
    if decl.starts_with('%') {
        return None;
    }
    let (name, rest) = decl.split_at(decl.find(char::is_whitespace)?);
    let rest = rest.trim_start();
    let quote = rest.chars().next().filter(|&c| c == '"' || c == '\'')?;
    let body = &rest[1..];
    let value_end = body.find(quote)?;
    Some((name, &body[..value_end], &body[value_end + 1..]))
}

// Offsets inside the escape error point into the text slice, not the file.
fn describe_escape(e: &EscapeError) -> String {
    match e {
        EscapeError::UnrecognizedEntity(_, name) => format!("unrecognized entity `{name}`"),
        EscapeError::UnterminatedEntity(_) => "unterminated entity reference".to_string(),
        EscapeError::InvalidCharRef(cause) => format!("invalid character reference: {cause}"),
    }
}

fn line_at(source: &str, offset: usize) -> usize {
    source[..offset.min(source.len())]
        .bytes()
        .filter(|&b| b == b'\n')
        .count()
        + 1
}

/// Folds reader events into the arena, tracking the chain of open elements.
struct TreeBuilder<'s> {
    source: &'s str,
    nodes: Vec<Node>,
    open: Vec<usize>,
    entities: HashMap<String, String>,
}

impl<'s> TreeBuilder<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            nodes: Vec::new(),
            open: Vec::new(),
            entities: HashMap::new(),
        }
    }

    fn build(mut self) -> Result<ConfigDocument, ConfigError> {
        let mut reader = Reader::from_str(self.source);
        loop {
            let offset = reader.buffer_position() as usize;
            let event = reader
                .read_event()
                .map_err(|e| self.error(reader.buffer_position() as usize, e))?;
            match event {
                Event::Start(start) => {
                    let index = self.open_element(&start, offset)?;
                    self.open.push(index);
                }
                Event::Empty(start) => {
                    self.open_element(&start, offset)?;
                }
                Event::End(_) => {
                    let index = self.open.pop().ok_or_else(|| {
                        self.error(offset, "closing tag without an open element")
                    })?;
                    self.nodes[index].end = self.nodes.len();
                }
                Event::Text(text) => {
                    let raw = self.decode(&text, offset)?;
                    let text = self.unescape(&raw, offset)?;
                    self.push_text(text, offset)?;
                }
                Event::CData(data) => {
                    let text = String::from_utf8(data.into_inner().into_owned())
                        .map_err(|e| self.error(offset, e))?;
                    self.push_text(Cow::Owned(text), offset)?;
                }
                Event::DocType(doctype) => {
                    let doctype = self.decode(&doctype, offset)?;
                    self.declare_entities(&doctype);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(&index) = self.open.last() {
            let node = &self.nodes[index];
            return Err(self.error(
                node.offset,
                format!("element <{}> is never closed", node.name),
            ));
        }
        if self.nodes.is_empty() {
            return Err(ConfigError::ParseError(
                "document has no root element".to_string(),
            ));
        }

        Ok(ConfigDocument {
            nodes: self.nodes,
            source: self.source.to_string(),
        })
    }

    fn open_element(
        &mut self,
        start: &BytesStart<'_>,
        offset: usize,
    ) -> Result<usize, ConfigError> {
        if self.open.is_empty() && !self.nodes.is_empty() {
            return Err(self.error(offset, "more than one root element"));
        }

        let name = self.decode(start.name().as_ref(), offset)?;
        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(|e| self.error(offset, e))?;
            let key = self.decode(attribute.key.as_ref(), offset)?;
            let raw = normalize_attribute_whitespace(&self.decode(&attribute.value, offset)?);
            let value = self.unescape(&raw, offset)?.into_owned();
            attributes.push((key, value));
        }

        let index = self.nodes.len();
        if let Some(&parent) = self.open.last() {
            self.nodes[parent].content.push(Content::Element(index));
        }
        self.nodes.push(Node {
            name,
            attributes,
            content: Vec::new(),
            end: index + 1,
            offset,
        });
        Ok(index)
    }

    fn push_text(&mut self, text: Cow<'_, str>, offset: usize) -> Result<(), ConfigError> {
        match self.open.last() {
            Some(&parent) => {
                self.nodes[parent]
                    .content
                    .push(Content::Text(text.into_owned()));
                Ok(())
            }
            None if text.trim().is_empty() => Ok(()),
            None => Err(self.error(offset, "text outside the root element")),
        }
    }

    /// Record general entities from the DOCTYPE's internal subset.
    /// The first declaration of a name wins.
    fn declare_entities(&mut self, doctype: &str) {
        const ENTITY: &str = "<!ENTITY";
        let mut rest = doctype;
        while let Some(start) = rest.find(ENTITY) {
            rest = &rest[start + ENTITY.len()..];
            let Some((name, value, tail)) = entity_declaration(rest) else {
                continue;
            };
            self.entities
                .entry(name.to_string())
                .or_insert_with(|| value.to_string());
            rest = tail;
        }
    }

    fn unescape<'r>(&self, raw: &'r str, offset: usize) -> Result<Cow<'r, str>, ConfigError> {
        unescape_with(raw, |name| {
            predefined_entity(name).or_else(|| self.entities.get(name).map(String::as_str))
        })
        .map_err(|e| self.error(offset, describe_escape(&e)))
    }

    fn decode(&self, bytes: &[u8], offset: usize) -> Result<String, ConfigError> {
        std::str::from_utf8(bytes)
            .map(String::from)
            .map_err(|e| self.error(offset, e))
    }

    fn error(&self, offset: usize, cause: impl std::fmt::Display) -> ConfigError {
        ConfigError::ParseError(format!("line {}: {cause}", line_at(self.source, offset)))
    }
}
