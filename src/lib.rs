//! Look up a PGP public key on a public keyserver by email address.
//!
//! A lookup asks the keyserver's `op=index` endpoint for keys matching the
//! email, takes the first listed key identifier, fetches that key with
//! `op=get&exact=on`, and returns the armored block only if one of the
//! key's identities carries exactly the requested email.
//!
//! ```no_run
//! # async fn f() -> pks_lookup::Result<()> {
//! use std::time::Duration;
//! use pks_lookup::LookupContext;
//!
//! let ctx = LookupContext::with_timeout(Duration::from_secs(3));
//! let key = pks_lookup::lookup(&ctx, "lookup.example@antontsv.github.io").await?;
//! println!("{key}");
//! # Ok(())
//! # }
//! ```
//!
//! The transport and the keyring parser are traits, so a [`KeyLookup`] can
//! be assembled from other implementations with [`KeyLookup::with_parts`].

pub mod adapters;
pub mod config;
pub mod core;

use std::time::Duration;

pub use crate::adapters::keyring::pgp_keyring::PgpKeyring;
pub use crate::adapters::transport::http_transport::HttpTransport;
pub use crate::config::lookup_config::{
    DEFAULT_KEYSERVER_URL, DEFAULT_MAX_RESPONSE_BYTES, LookupConfig,
};
pub use crate::core::errors::{ErrorKind, LookupError, Result};
pub use crate::core::models::armored_key::{ArmoredKey, BEGIN_MARKER, END_MARKER};
pub use crate::core::models::identity::Identity;
pub use crate::core::models::key_identifier::KeyIdentifier;
pub use crate::core::models::lookup_context::LookupContext;
pub use crate::core::models::parsed_key::ParsedKey;
pub use crate::core::services::key_lookup::KeyLookup;
pub use crate::core::traits::keyring::Keyring;
pub use crate::core::traits::transport::{QueryParams, Transport};

/// A lookup over HTTP(S) with rPGP validation.
pub type DefaultKeyLookup = KeyLookup<HttpTransport, PgpKeyring>;

impl KeyLookup<HttpTransport, PgpKeyring> {
    /// Build a lookup against the configured keyserver.
    pub fn new(config: &LookupConfig) -> Result<Self> {
        Ok(Self::with_parts(HttpTransport::new(config)?, PgpKeyring::new()))
    }
}

/// Search the default keyserver for `email` and return its validated key.
///
/// `ctx` bounds both network calls. Cancelling it, or letting its deadline
/// pass, ends the lookup with a cancellation error.
pub async fn lookup(ctx: &LookupContext, email: &str) -> Result<ArmoredKey> {
    KeyLookup::new(&LookupConfig::default())?
        .lookup(ctx, email)
        .await
}

/// Blocking form of [`lookup`] for callers without an async runtime.
///
/// Fails with a transport error when called from inside a tokio runtime;
/// async callers use [`lookup`] directly.
pub fn lookup_blocking(timeout: Duration, email: &str) -> Result<ArmoredKey> {
    if tokio::runtime::Handle::try_current().is_ok() {
        return Err(LookupError::Transport {
            reason: "lookup_blocking called from inside an async runtime; use lookup instead"
                .into(),
        });
    }

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| LookupError::Transport {
            reason: format!("Failed to create async runtime: {e}"),
        })?;

    rt.block_on(async {
        let ctx = LookupContext::with_timeout(timeout);
        lookup(&ctx, email).await
    })
}
