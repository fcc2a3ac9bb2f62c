//! Typed views over parsed SOAP elements.

use crate::config::SOAP_11_NS;
use crate::document::Element;

/// One element plus the SOAP namespace it was parsed under.
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    element: Element<'a>,
    soap_ns: &'a str,
}

impl<'a> Node<'a> {
    pub fn new(element: Element<'a>, soap_ns: &'a str) -> Self {
        Self { element, soap_ns }
    }

    /// Local name with any `prefix:` stripped.
    pub fn tag(&self) -> &'a str {
        self.element.local_name()
    }

    /// Text before the first colon of the qualified name.
    pub fn prefix(&self) -> Option<&'a str> {
        self.element.prefix()
    }

    /// Namespace bound to the prefix (or the default namespace) in scope.
    pub fn namespace(&self) -> Option<&'a str> {
        self.element.namespace()
    }

    pub fn element(&self) -> Element<'a> {
        self.element
    }

    pub fn soap_namespace(&self) -> &'a str {
        self.soap_ns
    }

    /// Attribute in the SOAP envelope namespace.
    fn soap_attribute(&self, local_name: &str) -> Option<&'a str> {
        self.element.attribute_ns(self.soap_ns, local_name)
    }
}

/// A child of the SOAP Header.
///
/// `role` and `must_understand` are read once, at construction. Under the
/// SOAP 1.1 namespace the role comes from the `actor` attribute.
#[derive(Debug, Clone, Copy)]
pub struct HeaderNode<'a> {
    node: Node<'a>,
    role: Option<&'a str>,
    must_understand: bool,
}

impl<'a> HeaderNode<'a> {
    pub fn new(element: Element<'a>, soap_ns: &'a str) -> Self {
        let node = Node::new(element, soap_ns);
        let role_attribute = if soap_ns == SOAP_11_NS { "actor" } else { "role" };

        let role = node.soap_attribute(role_attribute);
        let must_understand = node
            .soap_attribute("mustUnderstand")
            .map(|value| {
                let value = value.trim();
                value == "1" || value.eq_ignore_ascii_case("true")
            })
            .unwrap_or(false);

        Self {
            node,
            role,
            must_understand,
        }
    }

    /// Role URI the header is addressed to, as written.
    pub fn role(&self) -> Option<&'a str> {
        self.role
    }

    pub fn must_understand(&self) -> bool {
        self.must_understand
    }

    pub fn node(&self) -> &Node<'a> {
        &self.node
    }

    pub fn tag(&self) -> &'a str {
        self.node.tag()
    }

    pub fn prefix(&self) -> Option<&'a str> {
        self.node.prefix()
    }

    pub fn namespace(&self) -> Option<&'a str> {
        self.node.namespace()
    }

    pub fn element(&self) -> Element<'a> {
        self.node.element()
    }
}

/// A child of the SOAP Body.
#[derive(Debug, Clone, Copy)]
pub struct MessageNode<'a> {
    node: Node<'a>,
}

impl<'a> MessageNode<'a> {
    pub fn new(element: Element<'a>, soap_ns: &'a str) -> Self {
        Self {
            node: Node::new(element, soap_ns),
        }
    }

    pub fn node(&self) -> &Node<'a> {
        &self.node
    }

    pub fn tag(&self) -> &'a str {
        self.node.tag()
    }

    pub fn prefix(&self) -> Option<&'a str> {
        self.node.prefix()
    }

    pub fn namespace(&self) -> Option<&'a str> {
        self.node.namespace()
    }

    pub fn element(&self) -> Element<'a> {
        self.node.element()
    }
}
