use crate::core::errors::{LookupError, Result};

/// Keyserver key identifier: `0x` followed by 16 hex digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyIdentifier(String);

impl KeyIdentifier {
    /// Total length including the `0x` prefix.
    pub const LEN: usize = 18;

    /// Parse a strictly formatted identifier, e.g. `0xD03F6F865226FE8B`.
    pub fn parse(s: &str) -> Result<Self> {
        let valid = s.len() == Self::LEN
            && s.starts_with("0x")
            && s[2..].bytes().all(|b| b.is_ascii_hexdigit());
        if !valid {
            return Err(LookupError::NotFound);
        }
        Ok(Self(s.to_string()))
    }

    /// Wrap an 18-character slice cut out of an index response as-is.
    pub(crate) fn from_index_slice(slice: &str) -> Self {
        Self(slice.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for KeyIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
