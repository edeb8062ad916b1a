use pgp::composed::{Deserializable, SignedPublicKey};

use crate::core::errors::{LookupError, Result};
use crate::core::models::identity::Identity;
use crate::core::models::parsed_key::ParsedKey;
use crate::core::traits::keyring::Keyring;

/// Keyring parser backed by rPGP.
///
/// Only reads packets; signatures on the key are not verified.
#[derive(Debug, Clone, Copy, Default)]
pub struct PgpKeyring;

impl PgpKeyring {
    pub fn new() -> Self {
        Self
    }
}

fn parsed_key(key: &SignedPublicKey) -> ParsedKey {
    let identities = key
        .details
        .users
        .iter()
        .map(|user| Identity::from_user_id(&String::from_utf8_lossy(user.id.id())))
        .collect();
    ParsedKey { identities }
}

impl Keyring for PgpKeyring {
    fn read_armored(&self, armored: &str) -> Result<Vec<ParsedKey>> {
        let (keys, _headers) =
            SignedPublicKey::from_string_many(armored).map_err(|e| LookupError::BadKey {
                reason: e.to_string(),
            })?;

        let keys = keys
            .map(|key| key.map(|key| parsed_key(&key)))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| LookupError::BadKey {
                reason: e.to_string(),
            })?;

        if keys.is_empty() {
            return Err(LookupError::BadKey {
                reason: "armored block contains no keys".into(),
            });
        }
        Ok(keys)
    }

    fn name(&self) -> &str {
        "rpgp"
    }
}
