use crate::core::errors::Result;
use crate::core::models::parsed_key::ParsedKey;

/// Port for reading an armored key block into structured keys.
///
/// Implementations live in `adapters::keyring`.
pub trait Keyring: Send + Sync {
    /// Parse every key in `armored`.
    ///
    /// Malformed input and a block holding no keys are both reported as
    /// `LookupError::BadKey`, each with its own reason.
    fn read_armored(&self, armored: &str) -> Result<Vec<ParsedKey>>;

    /// Human-readable name of this parser (e.g. "rpgp").
    fn name(&self) -> &str;
}
