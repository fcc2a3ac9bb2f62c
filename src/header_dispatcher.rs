//! Header dispatch with MustUnderstand enforcement.
//!
//! Processing is all-or-nothing: every header targeted at one of our roles
//! and flagged `mustUnderstand` is checked before any handler runs, so an
//! unmet requirement rejects the whole message without side effects.

use crate::config::{DispatchConfig, SoapVersion};
use crate::error::{DispatchError, SoapError};
use crate::fault::Fault;
use crate::handler::{BoxedHeaderHandler, Handler, Registry};
use crate::node::HeaderNode;
use crate::normalize::normalize_uri;
use crate::parser::Parser;
use crate::response::ResponseTree;
use indexmap::IndexSet;
use serde_json::{json, Map};
use tracing::{debug, warn};

/// Routes header entries to registered handlers.
pub struct HeaderDispatcher {
    roles: IndexSet<String>,
    headers: Registry<BoxedHeaderHandler>,
}

impl Default for HeaderDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaderDispatcher {
    /// Create a dispatcher acting in the SOAP 1.2 `next` and
    /// `ultimateReceiver` roles.
    pub fn new() -> Self {
        Self::for_version(SoapVersion::default())
    }

    /// Create a dispatcher acting in the standard roles of `version`.
    pub fn for_version(version: SoapVersion) -> Self {
        Self::with_roles(version.default_roles())
    }

    /// Create a dispatcher acting in exactly the given roles.
    pub fn with_roles<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dispatcher = Self {
            roles: IndexSet::new(),
            headers: Registry::new(),
        };
        for role in roles {
            dispatcher.add_role(role.as_ref());
        }
        dispatcher
    }

    /// Create a dispatcher acting in the configured roles.
    pub fn from_config(config: &DispatchConfig) -> Self {
        Self::with_roles(config.header_roles())
    }

    /// Act in an additional role. Blank and duplicate roles are ignored.
    pub fn add_role(&mut self, role: &str) {
        let role = normalize_uri(role);
        if !role.is_empty() {
            self.roles.insert(role);
        }
    }

    /// Whether a header addressed to `role` targets this node.
    ///
    /// An absent or blank role always matches.
    pub fn has_role(&self, role: Option<&str>) -> bool {
        match role.map(normalize_uri) {
            None => true,
            Some(role) if role.is_empty() => true,
            Some(role) => self.roles.contains(&role),
        }
    }

    /// Normalized roles in insertion order.
    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.roles.iter().map(String::as_str)
    }

    /// Register `handler` for headers named `name` in namespace `uri`.
    ///
    /// Fails when `uri` is blank or `name` has no word characters. An
    /// existing registration for the same key is replaced.
    pub fn add_header<H>(&mut self, uri: &str, name: &str, handler: H) -> Result<(), SoapError>
    where
        H: for<'a> Handler<HeaderNode<'a>> + Send + Sync + 'static,
    {
        self.headers.insert(uri, name, Box::new(handler))
    }

    /// Whether a handler is registered for `(uri, tag)`.
    pub fn understands(&self, uri: Option<&str>, tag: &str) -> bool {
        self.headers.contains(uri, tag)
    }

    /// Registered `(namespace, tag)` keys in registration order.
    pub fn registered(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.keys()
    }

    /// Check every targeted mandatory header is understood.
    ///
    /// Returns the `MustUnderstand` fault for the first one that is not.
    pub fn validate(&self, parser: &Parser<'_>) -> Result<(), Fault> {
        for header in parser.headers()? {
            if !self.has_role(header.role()) || !header.must_understand() {
                continue;
            }

            if !self.understands(header.namespace(), header.tag()) {
                warn!(
                    header = header.tag(),
                    namespace = ?header.namespace(),
                    role = ?header.role(),
                    "Mandatory SOAP header not understood"
                );
                return Err(not_understood(&header));
            }
        }

        Ok(())
    }

    /// Validate, then run every targeted header through its handler.
    ///
    /// No handler runs unless validation succeeds. Handler errors are
    /// returned as-is and stop processing.
    pub fn process(&self, parser: &Parser<'_>) -> Result<ResponseTree, DispatchError> {
        self.validate(parser)?;

        let mut tree = ResponseTree::new();
        for header in parser.headers()? {
            if !self.has_role(header.role()) {
                debug!(header = header.tag(), role = ?header.role(), "Header not targeted at us, skipping");
                continue;
            }

            let Some(handler) = self.headers.get(header.namespace(), header.tag()) else {
                continue;
            };

            debug!(
                header = header.tag(),
                namespace = ?header.namespace(),
                "Dispatching SOAP header"
            );
            if let Some(fragment) = handler.process(&header).map_err(DispatchError::Handler)? {
                tree.push(fragment);
            }
        }

        Ok(tree)
    }
}

fn not_understood(header: &HeaderNode<'_>) -> Fault {
    let mut details = Map::new();
    details.insert(
        "NotUnderstood".to_string(),
        json!({
            "Header": header.tag(),
            "Namespace": header.namespace(),
        }),
    );

    Fault::new(
        "Mandatory Soap Header is not understood",
        "mustunderstand",
        Vec::<String>::new(),
    )
    .with_role(header.role())
    .with_details(details)
}
