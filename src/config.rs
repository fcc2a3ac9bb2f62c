//! Configuration types for the SOAP dispatch pipeline.

use crate::error::SoapError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// SOAP 1.1 envelope namespace.
pub const SOAP_11_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
/// SOAP 1.2 envelope namespace.
pub const SOAP_12_NS: &str = "http://www.w3.org/2003/05/soap-envelope";

/// SOAP 1.1 actor: the next node along the message path.
pub const ROLE_11_NEXT: &str = "http://schemas.xmlsoap.org/soap/actor/next";

/// SOAP 1.2 role: the next node along the message path.
pub const ROLE_NEXT: &str = "http://www.w3.org/2003/05/soap-envelope/role/next";
/// SOAP 1.2 role: the final recipient of the message.
pub const ROLE_ULTIMATE_RECEIVER: &str =
    "http://www.w3.org/2003/05/soap-envelope/role/ultimateReceiver";

/// Main configuration for the dispatch pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Config version
    pub version: String,

    /// Envelope vocabulary settings
    pub envelope: EnvelopeConfig,

    /// Roles this node acts in
    pub roles: RolesConfig,

    /// XML intake limits
    pub xml: XmlConfig,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            version: "1".to_string(),
            envelope: EnvelopeConfig::default(),
            roles: RolesConfig::default(),
            xml: XmlConfig::default(),
        }
    }
}

impl DispatchConfig {
    /// Parse configuration from YAML text.
    pub fn from_yaml(yaml: &str) -> Result<Self, SoapError> {
        serde_yaml::from_str(yaml).map_err(|e| SoapError::Config(e.to_string()))
    }

    /// Load configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SoapError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// The envelope namespace the parser should recognize.
    pub fn soap_namespace(&self) -> &str {
        self.envelope
            .namespace
            .as_deref()
            .unwrap_or_else(|| self.envelope.version.namespace())
    }

    /// SOAP version of the recognized envelope namespace.
    ///
    /// A custom namespace falls back to the configured `version`.
    pub fn soap_version(&self) -> SoapVersion {
        SoapVersion::from_namespace(self.soap_namespace()).unwrap_or(self.envelope.version)
    }

    /// Roles a header dispatcher should act in, defaults first.
    pub fn header_roles(&self) -> Vec<String> {
        let defaults = match &self.roles.defaults {
            Some(defaults) => defaults.clone(),
            None => self
                .soap_version()
                .default_roles()
                .iter()
                .map(|role| role.to_string())
                .collect(),
        };
        defaults
            .into_iter()
            .chain(self.roles.additional.iter().cloned())
            .collect()
    }
}

/// SOAP versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SoapVersion {
    /// SOAP 1.1 (namespace: http://schemas.xmlsoap.org/soap/envelope/)
    #[serde(rename = "1.1")]
    Soap11,
    /// SOAP 1.2 (namespace: http://www.w3.org/2003/05/soap-envelope)
    #[serde(rename = "1.2")]
    #[default]
    Soap12,
}

impl SoapVersion {
    /// Envelope namespace URI of this version.
    pub fn namespace(&self) -> &'static str {
        match self {
            Self::Soap11 => SOAP_11_NS,
            Self::Soap12 => SOAP_12_NS,
        }
    }

    /// Detect the version from an envelope namespace URI.
    pub fn from_namespace(uri: &str) -> Option<Self> {
        match uri {
            SOAP_11_NS => Some(Self::Soap11),
            SOAP_12_NS => Some(Self::Soap12),
            _ => None,
        }
    }

    /// Roles every node of this version acts in.
    pub fn default_roles(&self) -> &'static [&'static str] {
        match self {
            Self::Soap11 => &[ROLE_11_NEXT],
            Self::Soap12 => &[ROLE_NEXT, ROLE_ULTIMATE_RECEIVER],
        }
    }
}

/// Envelope vocabulary configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvelopeConfig {
    /// SOAP version to recognize
    pub version: SoapVersion,

    /// Explicit envelope namespace, overrides `version`
    pub namespace: Option<String>,
}

/// Role configuration for header targeting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RolesConfig {
    /// Roles every dispatcher starts with. Unset means the envelope
    /// version's standard roles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<Vec<String>>,

    /// Extra roles this node plays
    pub additional: Vec<String>,
}

/// XML intake configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct XmlConfig {
    /// Maximum document size to accept (bytes)
    pub max_document_size: usize,

    /// Block DOCTYPE declarations
    pub block_doctype: bool,

    /// Block entity declarations
    pub block_entities: bool,
}

impl Default for XmlConfig {
    fn default() -> Self {
        Self {
            max_document_size: 1_048_576, // 1MB
            block_doctype: true,
            block_entities: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DispatchConfig::default();
        assert_eq!(config.envelope.version, SoapVersion::Soap12);
        assert_eq!(config.soap_namespace(), SOAP_12_NS);
        assert!(config.roles.defaults.is_none());
        assert_eq!(config.header_roles(), [ROLE_NEXT, ROLE_ULTIMATE_RECEIVER]);
        assert!(config.xml.block_doctype);
    }

    #[test]
    fn test_config_serialization() {
        let config = DispatchConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed = DispatchConfig::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.xml.max_document_size, config.xml.max_document_size);
        assert_eq!(parsed.roles.defaults, config.roles.defaults);
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
version: "1"
envelope:
  version: "1.1"
roles:
  additional:
    - "http://example.org/roles/auditor"
xml:
  max_document_size: 4096
  block_doctype: false
"#;
        let config = DispatchConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.envelope.version, SoapVersion::Soap11);
        assert_eq!(config.soap_namespace(), SOAP_11_NS);
        assert_eq!(config.soap_version(), SoapVersion::Soap11);
        assert_eq!(
            config.header_roles(),
            [ROLE_11_NEXT, "http://example.org/roles/auditor"]
        );
        assert_eq!(config.xml.max_document_size, 4096);
        assert!(!config.xml.block_doctype);
        assert!(config.xml.block_entities);
    }

    #[test]
    fn test_namespace_override() {
        let yaml = r#"
envelope:
  namespace: "urn:custom:envelope"
"#;
        let config = DispatchConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.soap_namespace(), "urn:custom:envelope");
    }

    #[test]
    fn test_header_roles_follow_envelope() {
        let config = DispatchConfig::from_yaml(&format!(
            "envelope:\n  namespace: \"{}\"\n",
            SOAP_11_NS
        ))
        .unwrap();
        assert_eq!(config.soap_version(), SoapVersion::Soap11);
        assert_eq!(config.header_roles(), [ROLE_11_NEXT]);

        let custom = DispatchConfig::from_yaml(
            "envelope:\n  version: \"1.1\"\nroles:\n  defaults: [\"urn:a\"]\n  additional: [\"urn:b\"]\n",
        )
        .unwrap();
        assert_eq!(custom.header_roles(), ["urn:a", "urn:b"]);

        let none = DispatchConfig::from_yaml("roles:\n  defaults: []\n").unwrap();
        assert!(none.header_roles().is_empty());
    }

    #[test]
    fn test_invalid_yaml() {
        let err = DispatchConfig::from_yaml("xml: [unterminated").unwrap_err();
        assert!(matches!(err, SoapError::Config(_)));
    }

    #[test]
    fn test_version_from_namespace() {
        assert_eq!(SoapVersion::from_namespace(SOAP_11_NS), Some(SoapVersion::Soap11));
        assert_eq!(SoapVersion::from_namespace(SOAP_12_NS), Some(SoapVersion::Soap12));
        assert_eq!(SoapVersion::from_namespace("urn:other"), None);
    }
}
