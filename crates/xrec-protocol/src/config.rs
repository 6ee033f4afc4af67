use serde::{Deserialize, Serialize};
use xrec_codec::MAX_VL_LENGTH;

/// Limits applied while decoding untrusted bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Deepest allowed nesting of objects and arrays below the top level.
    pub max_depth: u32,
    /// Largest accepted blob payload, in bytes.
    pub max_blob_len: usize,
    /// When `true`, top-level decoding stops at the end of the record and
    /// ignores whatever follows instead of rejecting it.
    pub allow_trailing_bytes: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_depth: 10,
            max_blob_len: MAX_VL_LENGTH,
            allow_trailing_bytes: false,
        }
    }
}

impl CodecConfig {
    /// Tight limits for peers that only exchange flat records.
    pub fn strict() -> Self {
        Self {
            max_depth: 4,
            max_blob_len: 4096,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = CodecConfig::default();
        assert_eq!(c.max_depth, 10);
        assert_eq!(c.max_blob_len, MAX_VL_LENGTH);
        assert!(!c.allow_trailing_bytes);
    }

    #[test]
    fn strict_keeps_trailing_rule() {
        let c = CodecConfig::strict();
        assert_eq!(c.max_depth, 4);
        assert!(!c.allow_trailing_bytes);
    }

    #[test]
    fn partial_json_uses_defaults() {
        let c: CodecConfig = serde_json::from_str(r#"{"max_depth": 3}"#).unwrap();
        assert_eq!(c.max_depth, 3);
        assert_eq!(c.max_blob_len, MAX_VL_LENGTH);
    }

    #[test]
    fn loads_from_toml() {
        let c: CodecConfig = toml::from_str("max_blob_len = 256\nallow_trailing_bytes = true\n").unwrap();
        assert_eq!(c.max_depth, 10);
        assert_eq!(c.max_blob_len, 256);
        assert!(c.allow_trailing_bytes);
    }
}
