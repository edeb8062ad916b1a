/// First line of an ASCII-armored public key block.
pub const BEGIN_MARKER: &str = "-----BEGIN PGP PUBLIC KEY BLOCK-----";

/// Last line of an ASCII-armored public key block.
pub const END_MARKER: &str = "-----END PGP PUBLIC KEY BLOCK-----";

/// A validated, ASCII-armored public key block.
///
/// Holds the text exactly as the keyserver sent it, from the first
/// character of [`BEGIN_MARKER`] through the last character of
/// [`END_MARKER`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArmoredKey(String);

impl ArmoredKey {
    pub(crate) fn new(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for ArmoredKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ArmoredKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ArmoredKey> for String {
    fn from(key: ArmoredKey) -> Self {
        key.0
    }
}
