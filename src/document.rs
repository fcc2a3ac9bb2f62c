//! Read-only XML element tree.
//!
//! Built with quick-xml, which never expands external entities. Oversized
//! input is refused up front; a DOCTYPE (or, when DOCTYPEs are allowed, an
//! entity declaration inside one) aborts the parse as soon as it is read.

use crate::config::XmlConfig;
use crate::error::SoapError;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fmt;

const ENTITY_DECL: &[u8] = b"<!ENTITY";

/// Namespace permanently bound to the `xml` prefix.
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// A parsed XML document.
///
/// Elements live in a flat arena and refer to each other by index; use
/// [`Element`] handles to navigate.
#[derive(Debug, Clone, Default)]
pub struct Document {
    elements: Vec<ElementData>,
    roots: Vec<usize>,
}

#[derive(Debug, Clone)]
struct ElementData {
    name: String,
    attributes: Vec<(String, String)>,
    /// Namespace declarations made on this element (`None` = default namespace)
    declarations: Vec<(Option<String>, String)>,
    parent: Option<usize>,
    children: Vec<usize>,
    text: String,
}

impl Document {
    /// Parse a document with default intake limits.
    pub fn parse(xml: &str) -> Result<Self, SoapError> {
        Self::parse_with(xml, &XmlConfig::default())
    }

    /// Parse a document with the given intake limits.
    ///
    /// Blank input produces a document without children.
    pub fn parse_with(xml: &str, config: &XmlConfig) -> Result<Self, SoapError> {
        check_intake(xml, config)?;

        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut doc = Document::default();
        let mut stack: Vec<usize> = Vec::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    let id = doc.push_element(e, stack.last().copied())?;
                    stack.push(id);
                }
                Ok(Event::Empty(ref e)) => {
                    doc.push_element(e, stack.last().copied())?;
                }
                Ok(Event::End(_)) => {
                    stack.pop();
                }
                Ok(Event::Text(ref e)) => {
                    if let Some(&id) = stack.last() {
                        let text = e.unescape().map_err(xml_error)?;
                        doc.elements[id].text.push_str(&text);
                    }
                }
                Ok(Event::CData(ref e)) => {
                    if let Some(&id) = stack.last() {
                        let text = std::str::from_utf8(e).map_err(xml_error)?;
                        doc.elements[id].text.push_str(text);
                    }
                }
                Ok(Event::DocType(ref e)) => check_doctype(e, config)?,
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(SoapError::XmlParse(format!(
                        "{} at position {}",
                        e,
                        reader.buffer_position()
                    )));
                }
            }
        }

        if let Some(&open) = stack.last() {
            return Err(SoapError::XmlParse(format!(
                "Unclosed element <{}>",
                doc.elements[open].name
            )));
        }

        Ok(doc)
    }

    /// Whether the document has no top-level elements.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Top-level elements in document order.
    pub fn children(&self) -> Children<'_> {
        Children {
            doc: self,
            ids: self.roots.iter(),
        }
    }

    /// The first top-level element.
    pub fn root(&self) -> Option<Element<'_>> {
        self.children().next()
    }

    fn element(&self, id: usize) -> Element<'_> {
        Element { doc: self, id }
    }

    fn push_element(&mut self, start: &BytesStart<'_>, parent: Option<usize>) -> Result<usize, SoapError> {
        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(xml_error)?
            .to_string();

        let mut attributes = Vec::new();
        let mut declarations = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(xml_error)?;
            let key = std::str::from_utf8(attr.key.as_ref()).map_err(xml_error)?;
            let raw = std::str::from_utf8(&attr.value).map_err(xml_error)?;
            let value = unescape(raw).map_err(xml_error)?.into_owned();

            if key == "xmlns" {
                declarations.push((None, value));
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                declarations.push((Some(prefix.to_string()), value));
            } else {
                attributes.push((key.to_string(), value));
            }
        }

        let id = self.elements.len();
        self.elements.push(ElementData {
            name,
            attributes,
            declarations,
            parent,
            children: Vec::new(),
            text: String::new(),
        });

        match parent {
            Some(parent) => self.elements[parent].children.push(id),
            None => self.roots.push(id),
        }

        Ok(id)
    }
}

/// Reject input the tree builder must never see.
fn check_intake(xml: &str, config: &XmlConfig) -> Result<(), SoapError> {
    if xml.len() > config.max_document_size {
        return Err(SoapError::DocumentTooLarge {
            size: xml.len(),
            max: config.max_document_size,
        });
    }

    Ok(())
}

/// Entity declarations live in the DOCTYPE internal subset.
fn check_doctype(doctype: &[u8], config: &XmlConfig) -> Result<(), SoapError> {
    if config.block_doctype {
        return Err(SoapError::XxeDetected(
            "DOCTYPE declarations are not allowed".to_string(),
        ));
    }

    let declares_entity = doctype
        .windows(ENTITY_DECL.len())
        .any(|window| window == ENTITY_DECL);
    if config.block_entities && declares_entity {
        return Err(SoapError::XxeDetected(
            "Entity declarations are not allowed".to_string(),
        ));
    }

    Ok(())
}

fn xml_error(err: impl fmt::Display) -> SoapError {
    SoapError::XmlParse(err.to_string())
}

/// Split a qualified name at its first colon.
pub(crate) fn split_qname(name: &str) -> (Option<&str>, &str) {
    match name.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, name),
    }
}

/// Handle to one element of a [`Document`].
#[derive(Clone, Copy)]
pub struct Element<'a> {
    doc: &'a Document,
    id: usize,
}

impl<'a> Element<'a> {
    fn data(&self) -> &'a ElementData {
        &self.doc.elements[self.id]
    }

    /// Qualified name as written, e.g. `soap:Body`.
    pub fn name(&self) -> &'a str {
        &self.data().name
    }

    /// Name with any prefix stripped.
    pub fn local_name(&self) -> &'a str {
        split_qname(self.name()).1
    }

    pub fn prefix(&self) -> Option<&'a str> {
        split_qname(self.name()).0
    }

    /// Namespace URI of this element, resolved from its prefix or the
    /// default namespace in scope.
    pub fn namespace(&self) -> Option<&'a str> {
        self.lookup_namespace(self.prefix())
    }

    /// Resolve a prefix (`None` for the default namespace) against the
    /// declarations in scope at this element.
    pub fn lookup_namespace(&self, prefix: Option<&str>) -> Option<&'a str> {
        if prefix == Some("xml") {
            return Some(XML_NS);
        }

        let mut current = Some(*self);
        while let Some(element) = current {
            let declared = element
                .data()
                .declarations
                .iter()
                .find(|(declared, _)| declared.as_deref() == prefix);

            if let Some((_, uri)) = declared {
                // xmlns="" undeclares the default namespace
                return (!uri.is_empty()).then_some(uri.as_str());
            }
            current = element.parent();
        }

        None
    }

    pub fn parent(&self) -> Option<Element<'a>> {
        self.data().parent.map(|id| self.doc.element(id))
    }

    /// Element children in document order.
    pub fn children(&self) -> Children<'a> {
        Children {
            doc: self.doc,
            ids: self.data().children.iter(),
        }
    }

    /// Attribute value by qualified name.
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.data()
            .attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Attribute value by namespace URI and local name.
    ///
    /// Unprefixed attributes are in no namespace and never match.
    pub fn attribute_ns(&self, namespace: &str, local_name: &str) -> Option<&'a str> {
        self.data()
            .attributes
            .iter()
            .find(|(key, _)| match split_qname(key) {
                (Some(prefix), local) => {
                    local == local_name && self.lookup_namespace(Some(prefix)) == Some(namespace)
                }
                (None, _) => false,
            })
            .map(|(_, value)| value.as_str())
    }

    /// All attributes as `(qualified name, value)`, namespace declarations excluded.
    pub fn attributes(&self) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.data()
            .attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Concatenated direct text content (trimmed per text node).
    pub fn text(&self) -> &'a str {
        &self.data().text
    }
}

impl fmt::Debug for Element<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("name", &self.name())
            .field("namespace", &self.namespace())
            .finish()
    }
}

/// Iterator over element children.
#[derive(Clone)]
pub struct Children<'a> {
    doc: &'a Document,
    ids: std::slice::Iter<'a, usize>,
}

impl<'a> Iterator for Children<'a> {
    type Item = Element<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.ids.next().map(|&id| self.doc.element(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl ExactSizeIterator for Children<'_> {}
