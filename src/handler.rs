//! Pluggable handlers and the `(namespace, tag)` registry they live in.

use crate::error::SoapError;
use crate::node::{HeaderNode, MessageNode};
use crate::normalize::strip_to_word;
use crate::response::Fragment;
use indexmap::IndexMap;

/// What a handler returns: an optional fragment for the response tree.
///
/// Errors are passed back to the dispatcher's caller unchanged.
pub type HandlerResult = anyhow::Result<Option<Fragment>>;

/// Something that processes one node of type `N`.
pub trait Handler<N> {
    fn process(&self, node: &N) -> HandlerResult;
}

/// A handler for header entries.
pub type BoxedHeaderHandler = Box<dyn for<'a> Handler<HeaderNode<'a>> + Send + Sync>;

/// A handler for message entries.
pub type BoxedMessageHandler = Box<dyn for<'a> Handler<MessageNode<'a>> + Send + Sync>;

/// Handlers keyed by `(namespace URI, tag name)`.
///
/// Keys are normalized the same way on insert and lookup: the namespace is
/// trimmed and the tag reduced to word characters. Re-registering a key
/// replaces the handler.
pub(crate) struct Registry<H> {
    entries: IndexMap<(String, String), H>,
}

impl<H> Registry<H> {
    pub(crate) fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, uri: &str, name: &str, handler: H) -> Result<(), SoapError> {
        let uri = uri.trim();
        if uri.is_empty() {
            return Err(SoapError::InvalidArgument(
                "namespace URI must not be empty".to_string(),
            ));
        }

        let name = strip_to_word(name);
        if name.is_empty() {
            return Err(SoapError::InvalidArgument(
                "tag name must contain word characters".to_string(),
            ));
        }

        self.entries.insert((uri.to_string(), name), handler);
        Ok(())
    }

    pub(crate) fn get(&self, uri: Option<&str>, tag: &str) -> Option<&H> {
        let uri = uri?.trim();
        self.entries.get(&(uri.to_string(), strip_to_word(tag)))
    }

    pub(crate) fn contains(&self, uri: Option<&str>, tag: &str) -> bool {
        self.get(uri, tag).is_some()
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .keys()
            .map(|(uri, name)| (uri.as_str(), name.as_str()))
    }
}
