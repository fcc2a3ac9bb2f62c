//! Response fragments produced by handlers.

use quick_xml::escape::escape;

/// A buildable piece of XML returned by a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Character data, escaped on render
    Text(String),
    /// An element with attributes and child fragments
    Element {
        name: String,
        attributes: Vec<(String, String)>,
        children: Vec<Fragment>,
    },
}

impl Fragment {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// An empty element named `name` (qualified names allowed).
    pub fn element(name: impl Into<String>) -> Self {
        Self::Element {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute. No effect on text fragments.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let Self::Element { attributes, .. } = &mut self {
            attributes.push((key.into(), value.into()));
        }
        self
    }

    /// Append a child. No effect on text fragments.
    pub fn with_child(mut self, child: Fragment) -> Self {
        if let Self::Element { children, .. } = &mut self {
            children.push(child);
        }
        self
    }

    /// Append a text child.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(Self::text(text))
    }

    /// Render to an XML string.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    fn render_into(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(&escape(text.as_str())),
            Self::Element {
                name,
                attributes,
                children,
            } => {
                out.push('<');
                out.push_str(name);
                for (key, value) in attributes {
                    out.push(' ');
                    out.push_str(key);
                    out.push_str("=\"");
                    out.push_str(&escape(value.as_str()));
                    out.push('"');
                }

                if children.is_empty() {
                    out.push_str("/>");
                    return;
                }

                out.push('>');
                for child in children {
                    child.render_into(out);
                }
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
        }
    }
}

/// Ordered collection of fragments produced by one dispatch pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseTree {
    fragments: Vec<Fragment>,
}

impl ResponseTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, fragment: Fragment) {
        self.fragments.push(fragment);
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Fragment> {
        self.fragments.iter()
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Render every fragment in order, concatenated.
    pub fn render(&self) -> String {
        self.fragments.iter().map(Fragment::render).collect()
    }
}

impl Extend<Fragment> for ResponseTree {
    fn extend<T: IntoIterator<Item = Fragment>>(&mut self, iter: T) {
        self.fragments.extend(iter);
    }
}

impl IntoIterator for ResponseTree {
    type Item = Fragment;
    type IntoIter = std::vec::IntoIter<Fragment>;

    fn into_iter(self) -> Self::IntoIter {
        self.fragments.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResponseTree {
    type Item = &'a Fragment;
    type IntoIter = std::slice::Iter<'a, Fragment>;

    fn into_iter(self) -> Self::IntoIter {
        self.fragments.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_text_escaped() {
        assert_eq!(Fragment::text("Pong").render(), "Pong");
        assert_eq!(Fragment::text("a < b & c").render(), "a &lt; b &amp; c");
    }

    #[test]
    fn test_render_element() {
        let fragment = Fragment::element("m:PingResponse")
            .with_attribute("xmlns:m", "urn:x")
            .with_child(Fragment::element("m:Reply").with_text("Pong"))
            .with_child(Fragment::element("m:Empty"));
        assert_eq!(
            fragment.render(),
            r#"<m:PingResponse xmlns:m="urn:x"><m:Reply>Pong</m:Reply><m:Empty/></m:PingResponse>"#
        );
    }

    #[test]
    fn test_attribute_escaped() {
        let fragment = Fragment::element("a").with_attribute("title", "\"quoted\"");
        assert_eq!(fragment.render(), r#"<a title="&quot;quoted&quot;"/>"#);
    }

    #[test]
    fn test_text_ignores_builders() {
        let fragment = Fragment::text("x").with_attribute("k", "v").with_text("y");
        assert_eq!(fragment, Fragment::text("x"));
    }

    #[test]
    fn test_tree_order_and_render() {
        let mut tree = ResponseTree::new();
        assert!(tree.is_empty());
        tree.push(Fragment::text("one"));
        tree.extend([Fragment::text("two"), Fragment::element("three")]);
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.render(), "onetwo<three/>");
        assert_eq!(tree.iter().next(), Some(&Fragment::text("one")));
    }
}
