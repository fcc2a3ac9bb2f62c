//! SOAP request processing for Zentinel.
//!
//! Validates SOAP envelope structure, enforces MustUnderstand headers for the
//! roles this node plays, and dispatches header and message entries to
//! pluggable handlers keyed by `(namespace, local name)`.
//!
//! # Features
//!
//! - Envelope structural validation (Envelope, Body, Header cardinality)
//! - Role-based header targeting
//! - All-or-nothing MustUnderstand enforcement
//! - Header and message dispatch to registered handlers
//! - Normalized SOAP Fault model
//!
//! # Example
//!
//! ```ignore
//! use zentinel_soap_dispatch::{Document, HeaderDispatcher, MessageDispatcher, Parser};
//!
//! let doc = Document::parse(xml)?;
//! let parser = Parser::new(&doc, zentinel_soap_dispatch::config::SOAP_12_NS);
//!
//! let headers = header_dispatcher.process(&parser)?;
//! let messages = message_dispatcher.process(&parser)?;
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod fault;
pub mod handler;
pub mod header_dispatcher;
pub mod message_dispatcher;
pub mod node;
pub mod normalize;
pub mod parser;
pub mod query;
pub mod response;

pub use config::DispatchConfig;
pub use document::Document;
pub use error::{DispatchError, SoapError};
pub use fault::{Fault, PrimeCode};
pub use handler::{Handler, HandlerResult};
pub use header_dispatcher::HeaderDispatcher;
pub use message_dispatcher::MessageDispatcher;
pub use node::{HeaderNode, MessageNode, Node};
pub use parser::Parser;
pub use response::{Fragment, ResponseTree};
