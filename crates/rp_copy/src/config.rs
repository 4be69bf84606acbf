use serde::{Deserialize, Serialize};

use crate::serializer::SerializationKind;

/// Settings of an [`ObjectCopier`](crate::ObjectCopier).
///
/// Missing keys take their default when deserialized, so a partial
/// document such as `{"parallel": false}` is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CopierConfig {
    /// Apply the field pairs of one copy concurrently.
    ///
    /// Has no effect without the `rayon` feature.
    pub parallel: bool,
    /// The adapter used for text round trips.
    pub serializer: SerializationKind,
}

impl Default for CopierConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            serializer: SerializationKind::Json,
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::CopierConfig;
    use crate::serializer::SerializationKind;

    #[test]
    fn partial_json() {
        let config: CopierConfig = serde_json::from_str(r#"{"parallel": false}"#).unwrap();
        assert!(!config.parallel);
        assert_eq!(config.serializer, SerializationKind::Json);
    }

    #[test]
    fn ron_document() {
        let config: CopierConfig = ron::from_str("(serializer: ron)").unwrap();
        assert!(config.parallel);
        assert_eq!(config.serializer, SerializationKind::Ron);
    }
}
