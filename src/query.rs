//! Namespace-scoped path queries over a [`Document`].
//!
//! Supports absolute child-axis paths such as `/soap:Envelope/soap:Body/*`.
//! A step is `prefix:local`, a bare `local` (matches elements in no
//! namespace) or `*` (any element).

use crate::document::{split_qname, Document, Element};

/// Query handle with a set of prefix bindings.
#[derive(Debug, Clone)]
pub struct NamespaceScope<'a> {
    doc: &'a Document,
    bindings: Vec<(String, String)>,
}

impl<'a> NamespaceScope<'a> {
    pub fn new(doc: &'a Document) -> Self {
        Self {
            doc,
            bindings: Vec::new(),
        }
    }

    /// Bind `prefix` to `uri` for use in query paths. Rebinding replaces.
    pub fn bind(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let uri = uri.into();
        match self.bindings.iter_mut().find(|(bound, _)| *bound == prefix) {
            Some(binding) => binding.1 = uri,
            None => self.bindings.push((prefix, uri)),
        }
        self
    }

    fn resolve(&self, prefix: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|(bound, _)| bound == prefix)
            .map(|(_, uri)| uri.as_str())
    }

    /// Elements matching `path`, in document order.
    ///
    /// Relative paths and steps with an unbound prefix match nothing.
    pub fn select(&self, path: &str) -> Vec<Element<'a>> {
        let Some(path) = path.strip_prefix('/') else {
            return Vec::new();
        };

        let mut steps = path.split('/');
        let Some(first) = steps.next() else {
            return Vec::new();
        };

        let mut current: Vec<Element<'a>> = self
            .doc
            .children()
            .filter(|element| self.matches(first, element))
            .collect();

        for step in steps {
            current = current
                .iter()
                .flat_map(|element| element.children())
                .filter(|element| self.matches(step, element))
                .collect();
        }

        current
    }

    /// Number of elements matching `path`.
    pub fn count(&self, path: &str) -> usize {
        self.select(path).len()
    }

    fn matches(&self, step: &str, element: &Element<'_>) -> bool {
        if step == "*" {
            return true;
        }

        match split_qname(step) {
            (Some(prefix), local) => match self.resolve(prefix) {
                Some(uri) => element.local_name() == local && element.namespace() == Some(uri),
                None => false,
            },
            (None, local) => element.local_name() == local && element.namespace().is_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOAP_NS: &str = "http://www.w3.org/2003/05/soap-envelope";

    fn sample() -> Document {
        Document::parse(
            r#"<env:Envelope xmlns:env="http://www.w3.org/2003/05/soap-envelope">
  <env:Body>
    <m:First xmlns:m="urn:m"/>
    <Second/>
    <env:Body/>
  </env:Body>
</env:Envelope>"#,
        )
        .unwrap()
    }

    #[test]
    fn test_prefix_independent_matching() {
        let doc = sample();
        let scope = NamespaceScope::new(&doc).bind("soap", SOAP_NS);
        assert_eq!(scope.count("/soap:Envelope"), 1);
        assert_eq!(scope.count("/soap:Envelope/soap:Body"), 1);
        assert_eq!(scope.count("/soap:Envelope/soap:Header"), 0);
    }

    #[test]
    fn test_wildcard_in_order() {
        let doc = sample();
        let scope = NamespaceScope::new(&doc).bind("soap", SOAP_NS);
        let names: Vec<&str> = scope
            .select("/soap:Envelope/soap:Body/*")
            .iter()
            .map(|e| e.name())
            .collect();
        assert_eq!(names, ["m:First", "Second", "env:Body"]);
    }

    #[test]
    fn test_unprefixed_step_matches_no_namespace() {
        let doc = sample();
        let scope = NamespaceScope::new(&doc).bind("soap", SOAP_NS);
        assert_eq!(scope.count("/soap:Envelope/soap:Body/Second"), 1);
        assert_eq!(scope.count("/soap:Envelope/soap:Body/First"), 0);
    }

    #[test]
    fn test_unbound_prefix_and_relative_path() {
        let doc = sample();
        let scope = NamespaceScope::new(&doc);
        assert_eq!(scope.count("/soap:Envelope"), 0);
        assert_eq!(scope.count("Envelope"), 0);
    }

    #[test]
    fn test_rebind() {
        let doc = sample();
        let scope = NamespaceScope::new(&doc)
            .bind("soap", "urn:wrong")
            .bind("soap", SOAP_NS);
        assert_eq!(scope.count("/soap:Envelope"), 1);
    }
}
