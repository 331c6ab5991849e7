//! Manifest kinds with payload maps

/// Classification of a manifest kind for substitution purposes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceKind {
    Secret,
    ConfigMap,
    Other(String),
}

impl ResourceKind {
    pub fn parse(kind: &str) -> Self {
        match kind {
            "Secret" => Self::Secret,
            "ConfigMap" => Self::ConfigMap,
            other => Self::Other(other.to_string()),
        }
    }

    /// Top-level field whose values are base64 encoded at rest
    pub fn encoded_payload_field(&self) -> Option<&'static str> {
        match self {
            Self::Secret => Some("data"),
            Self::ConfigMap => Some("binaryData"),
            Self::Other(_) => None,
        }
    }

    /// Top-level key/value payload maps
    pub fn payload_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Secret => &["data", "stringData"],
            Self::ConfigMap => &["data", "binaryData"],
            Self::Other(_) => &[],
        }
    }

    /// Whether the removal policy may be used on this kind
    pub fn supports_removal(&self) -> bool {
        !self.payload_fields().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(ResourceKind::parse("Secret"), ResourceKind::Secret);
        assert_eq!(ResourceKind::parse("ConfigMap"), ResourceKind::ConfigMap);
        assert_eq!(
            ResourceKind::parse("secret"),
            ResourceKind::Other("secret".to_string())
        );
    }

    #[test]
    fn test_payload_fields() {
        assert_eq!(ResourceKind::Secret.encoded_payload_field(), Some("data"));
        assert_eq!(ResourceKind::ConfigMap.encoded_payload_field(), Some("binaryData"));
        assert!(ResourceKind::parse("Deployment").encoded_payload_field().is_none());

        assert!(ResourceKind::Secret.supports_removal());
        assert!(ResourceKind::ConfigMap.supports_removal());
        assert!(!ResourceKind::parse("Service").supports_removal());
    }
}
