use crate::core::models::identity::Identity;

/// What the keyring parser reports about one public key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedKey {
    pub identities: Vec<Identity>,
}

impl ParsedKey {
    /// True if any identity's email equals `email` exactly (case-sensitive).
    pub fn has_email(&self, email: &str) -> bool {
        self.identities.iter().any(|identity| identity.email == email)
    }
}
