use crate::core::errors::{LookupError, Result};
use crate::core::models::armored_key::{BEGIN_MARKER, END_MARKER};

/// Locate the armored public key block inside an `op=get` response.
///
/// Returns the exact text from the start of the first begin line through
/// the end of the first end line. Either line missing, or the end line
/// not coming after the begin line, means no key.
pub fn extract_armored_block(response: &str) -> Result<&str> {
    let begin = response.find(BEGIN_MARKER).ok_or(LookupError::NotFound)?;
    let end = response.find(END_MARKER).ok_or(LookupError::NotFound)?;
    if end <= begin {
        return Err(LookupError::NotFound);
    }
    Ok(&response[begin..end + END_MARKER.len()])
}
