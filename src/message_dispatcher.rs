//! Message dispatch: best-effort fan-out of Body entries to handlers.

use crate::error::{DispatchError, SoapError};
use crate::handler::{BoxedMessageHandler, Handler, Registry};
use crate::node::MessageNode;
use crate::parser::Parser;
use crate::response::ResponseTree;
use tracing::debug;

/// Routes message entries to registered handlers.
///
/// Messages without a handler are skipped silently; unlike headers there is
/// no fault for an unrecognized message.
pub struct MessageDispatcher {
    messages: Registry<BoxedMessageHandler>,
}

impl Default for MessageDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageDispatcher {
    pub fn new() -> Self {
        Self {
            messages: Registry::new(),
        }
    }

    /// Register `handler` for messages named `name` in namespace `uri`.
    ///
    /// Same key rules as [`HeaderDispatcher::add_header`](crate::HeaderDispatcher::add_header).
    pub fn add_message<H>(&mut self, uri: &str, name: &str, handler: H) -> Result<(), SoapError>
    where
        H: for<'a> Handler<MessageNode<'a>> + Send + Sync + 'static,
    {
        self.messages.insert(uri, name, Box::new(handler))
    }

    pub fn understands(&self, uri: Option<&str>, tag: &str) -> bool {
        self.messages.contains(uri, tag)
    }

    /// Registered `(namespace, tag)` keys in registration order.
    pub fn registered(&self) -> impl Iterator<Item = (&str, &str)> {
        self.messages.keys()
    }

    /// Run every message with a registered handler, collecting fragments.
    pub fn process(&self, parser: &Parser<'_>) -> Result<ResponseTree, DispatchError> {
        let mut tree = ResponseTree::new();

        for message in parser.messages()? {
            let Some(handler) = self.messages.get(message.namespace(), message.tag()) else {
                debug!(
                    message = message.tag(),
                    namespace = ?message.namespace(),
                    "No handler registered for SOAP message, skipping"
                );
                continue;
            };

            debug!(
                message = message.tag(),
                namespace = ?message.namespace(),
                "Dispatching SOAP message"
            );
            if let Some(fragment) = handler.process(&message).map_err(DispatchError::Handler)? {
                tree.push(fragment);
            }
        }

        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SOAP_12_NS;
    use crate::document::Document;
    use crate::handler::HandlerResult;
    use crate::response::Fragment;

    struct PongHandler;

    impl<'a> Handler<MessageNode<'a>> for PongHandler {
        fn process(&self, _node: &MessageNode<'a>) -> HandlerResult {
            Ok(Some(Fragment::text("Pong")))
        }
    }

    struct FailingHandler;

    impl<'a> Handler<MessageNode<'a>> for FailingHandler {
        fn process(&self, node: &MessageNode<'a>) -> HandlerResult {
            anyhow::bail!("cannot handle {}", node.tag())
        }
    }

    fn body(messages: &str) -> Document {
        Document::parse(&format!(
            r#"<s:Envelope xmlns:s="http://www.w3.org/2003/05/soap-envelope"><s:Body>{}</s:Body></s:Envelope>"#,
            messages
        ))
        .unwrap()
    }

    #[test]
    fn test_ping_pong() {
        let doc = body(r#"<x:Ping xmlns:x="urn:x"/>"#);
        let parser = Parser::new(&doc, SOAP_12_NS);
        let mut dispatcher = MessageDispatcher::new();
        dispatcher.add_message("urn:x", "Ping", PongHandler).unwrap();

        let tree = dispatcher.process(&parser).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.render(), "Pong");
    }

    #[test]
    fn test_unregistered_message_skipped() {
        let doc = body(r#"<x:Unknown xmlns:x="urn:x"/><x:Ping xmlns:x="urn:x"/>"#);
        let parser = Parser::new(&doc, SOAP_12_NS);
        let mut dispatcher = MessageDispatcher::new();
        dispatcher.add_message("urn:x", "Ping", PongHandler).unwrap();

        let tree = dispatcher.process(&parser).unwrap();
        assert_eq!(tree.render(), "Pong");

        let empty = MessageDispatcher::new().process(&parser).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_hyphenated_message_dispatched() {
        let doc = body(r#"<m:Get-Price xmlns:m="urn:x"/>"#);
        let parser = Parser::new(&doc, SOAP_12_NS);
        let mut dispatcher = MessageDispatcher::new();
        dispatcher.add_message("urn:x", "Get-Price", PongHandler).unwrap();

        assert_eq!(dispatcher.process(&parser).unwrap().render(), "Pong");
    }

    #[test]
    fn test_add_message_validation() {
        let mut dispatcher = MessageDispatcher::new();
        assert!(dispatcher.add_message(" ", "Ping", PongHandler).is_err());
        assert!(dispatcher.add_message("urn:x", "", PongHandler).is_err());
        assert!(dispatcher.add_message("urn:x", "<Ping>", PongHandler).is_ok());
        assert!(dispatcher.understands(Some("urn:x"), "Ping"));
        assert_eq!(dispatcher.registered().collect::<Vec<_>>(), [("urn:x", "Ping")]);
    }

    #[test]
    fn test_handler_error_passed_through() {
        let doc = body(r#"<x:Ping xmlns:x="urn:x"/>"#);
        let parser = Parser::new(&doc, SOAP_12_NS);
        let mut dispatcher = MessageDispatcher::new();
        dispatcher.add_message("urn:x", "Ping", FailingHandler).unwrap();

        let err = dispatcher.process(&parser).unwrap_err();
        assert!(err.is_handler_error());
        assert!(err.fault().is_none());
        assert_eq!(err.to_string(), "cannot handle Ping");
    }

    #[test]
    fn test_structural_fault() {
        let doc = body("");
        let parser = Parser::new(&doc, SOAP_12_NS);
        let err = MessageDispatcher::new().process(&parser).unwrap_err();
        assert_eq!(err.fault().map(|f| f.message()), Some("No Message Nodes found"));
    }
}
