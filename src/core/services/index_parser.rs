use tracing::trace;

use crate::core::errors::{LookupError, Result};
use crate::core::models::key_identifier::KeyIdentifier;

/// Text that precedes the first key identifier in an index response,
/// as in `...op=vindex&amp;search=0xD03F6F865226FE8B...`.
pub const KEY_MARKER: &str = ";search=0x";

/// Number of hex digits following [`KEY_MARKER`].
const HEX_DIGITS: usize = 16;

/// Cut the first key identifier out of an `op=index` response.
///
/// The identifier is the `0x` at the end of the first [`KEY_MARKER`] plus
/// the 16 characters after it. Those characters are taken as they are:
/// the keyserver's page layout is the contract here, not a hex grammar.
pub fn extract_key_identifier(index: &str) -> Result<KeyIdentifier> {
    let marker_at = index.find(KEY_MARKER).ok_or(LookupError::NotFound)?;
    let end = marker_at + KEY_MARKER.len() + HEX_DIGITS;
    let start = end - KeyIdentifier::LEN;

    let slice = index.get(start..end).ok_or(LookupError::NotFound)?;
    trace!(key_id = slice, "found key identifier in index response");
    Ok(KeyIdentifier::from_index_slice(slice))
}
