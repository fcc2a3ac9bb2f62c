//! SOAP envelope structural validation and node extraction.

use crate::document::{Children, Document};
use crate::fault::Fault;
use crate::node::{HeaderNode, MessageNode};
use crate::query::NamespaceScope;
use std::cell::OnceCell;
use tracing::debug;

const ENVELOPE_PATH: &str = "/soap:Envelope";
const BODY_PATH: &str = "/soap:Envelope/soap:Body";
const HEADER_PATH: &str = "/soap:Envelope/soap:Header";
const MESSAGES_PATH: &str = "/soap:Envelope/soap:Body/*";

/// Validates the envelope shape of one parsed document and hands out its
/// header and message nodes.
///
/// The document cannot change while the parser holds it, so the structural
/// check runs at most once per parser; every accessor consults its outcome
/// before yielding anything.
pub struct Parser<'a> {
    document: &'a Document,
    soap_ns: String,
    scope: NamespaceScope<'a>,
    validated: OnceCell<Result<(), Fault>>,
}

impl<'a> Parser<'a> {
    /// Create a parser recognizing envelopes in `soap_ns`.
    pub fn new(document: &'a Document, soap_ns: impl Into<String>) -> Self {
        let soap_ns = soap_ns.into();
        let scope = NamespaceScope::new(document).bind("soap", soap_ns.clone());
        Self {
            document,
            soap_ns,
            scope,
            validated: OnceCell::new(),
        }
    }

    pub fn document(&self) -> &'a Document {
        self.document
    }

    pub fn soap_namespace(&self) -> &str {
        &self.soap_ns
    }

    /// Number of element children of the SOAP Body.
    pub fn count_messages(&self) -> usize {
        self.scope.count(MESSAGES_PATH)
    }

    /// Check the envelope structure.
    ///
    /// Fails with a `Sender` fault at the first violated rule, in order:
    /// empty document, missing Envelope, missing Body, multiple Bodies, no
    /// message elements, multiple Headers.
    pub fn ensure_basics(&self) -> Result<(), Fault> {
        self.validated
            .get_or_init(|| self.check_structure())
            .clone()
    }

    fn check_structure(&self) -> Result<(), Fault> {
        if self.document.is_empty() {
            return Err(structure_fault("Document is Empty", "EmptyDoc"));
        }

        if self.scope.count(ENVELOPE_PATH) == 0 {
            return Err(structure_fault(
                "Could not find a SOAP Envelope node",
                "MissingEnvelope",
            ));
        }

        match self.scope.count(BODY_PATH) {
            0 => {
                return Err(structure_fault(
                    "Could not find a SOAP Body node",
                    "MissingBody",
                ))
            }
            1 => {}
            _ => {
                return Err(structure_fault(
                    "Multiple SOAP Body nodes found",
                    "MultiBody",
                ))
            }
        }

        if self.count_messages() == 0 {
            return Err(structure_fault("No Message Nodes found", "NoMessage"));
        }

        if self.scope.count(HEADER_PATH) > 1 {
            return Err(structure_fault(
                "Multiple SOAP Header nodes found",
                "MultiHeader",
            ));
        }

        Ok(())
    }

    /// Header entries in document order. Empty when there is no Header.
    pub fn headers(&self) -> Result<Headers<'_>, Fault> {
        self.ensure_basics()?;
        let header = self.scope.select(HEADER_PATH).into_iter().next();
        Ok(Headers {
            children: header.map(|header| header.children()),
            soap_ns: &self.soap_ns,
        })
    }

    /// Message entries (Body children) in document order.
    pub fn messages(&self) -> Result<Messages<'_>, Fault> {
        self.ensure_basics()?;
        let body = self.scope.select(BODY_PATH).into_iter().next();
        Ok(Messages {
            children: body.map(|body| body.children()),
            soap_ns: &self.soap_ns,
        })
    }
}

fn structure_fault(message: &str, sub_code: &str) -> Fault {
    debug!(sub_code, reason = message, "SOAP envelope rejected");
    Fault::new(message, "sender", ["Parser", sub_code])
}

/// Lazy sequence of [`HeaderNode`]s.
pub struct Headers<'a> {
    children: Option<Children<'a>>,
    soap_ns: &'a str,
}

impl<'a> Iterator for Headers<'a> {
    type Item = HeaderNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.children.as_mut()?.next()?;
        Some(HeaderNode::new(element, self.soap_ns))
    }
}

/// Lazy sequence of [`MessageNode`]s.
pub struct Messages<'a> {
    children: Option<Children<'a>>,
    soap_ns: &'a str,
}

impl<'a> Iterator for Messages<'a> {
    type Item = MessageNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.children.as_mut()?.next()?;
        Some(MessageNode::new(element, self.soap_ns))
    }
}
