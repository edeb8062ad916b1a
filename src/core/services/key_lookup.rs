use tracing::{debug, instrument, trace};

use crate::core::errors::{LookupError, Result};
use crate::core::models::armored_key::ArmoredKey;
use crate::core::models::lookup_context::LookupContext;
use crate::core::services::{armor, index_parser};
use crate::core::traits::keyring::Keyring;
use crate::core::traits::transport::{QueryParams, Transport};

/// Finds a public key by email through a `Transport` and checks it with
/// a `Keyring`.
///
/// Holds no per-lookup state, so a single instance can serve any number
/// of concurrent lookups.
#[derive(Debug, Clone)]
pub struct KeyLookup<T: Transport, K: Keyring> {
    transport: T,
    keyring: K,
}

impl<T: Transport, K: Keyring> KeyLookup<T, K> {
    /// Build a lookup from explicit transport and keyring implementations.
    pub fn with_parts(transport: T, keyring: K) -> Self {
        Self { transport, keyring }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn keyring(&self) -> &K {
        &self.keyring
    }

    /// Look up the first key listed for `email` and return it armored.
    ///
    /// Two requests are made in order: `op=index` to find the key
    /// identifier, then `op=get&exact=on` to fetch the key itself. The key
    /// is only returned if one of its identities carries `email` exactly.
    #[instrument(level = "debug", skip_all)]
    pub async fn lookup(&self, ctx: &LookupContext, email: &str) -> Result<ArmoredKey> {
        trace!(email, "looking up key");
        let mut params = QueryParams::new();
        params.insert("op", "index".into());
        params.insert("search", email.to_string());
        let index = self.transport.get(ctx, &params).await?;
        debug!(bytes = index.len(), "index queried");

        let key_id = index_parser::extract_key_identifier(&index)?;
        debug!(%key_id, "identifier extracted");

        params.insert("exact", "on".into());
        params.insert("op", "get".into());
        params.insert("search", key_id.to_string());
        let response = self.transport.get(ctx, &params).await?;
        debug!(bytes = response.len(), "key queried");

        let block = armor::extract_armored_block(&response)?;
        debug!(bytes = block.len(), "key extracted");

        self.validate(block, email)?;
        debug!(keyring = self.keyring.name(), "key validated");

        Ok(ArmoredKey::new(block.to_string()))
    }

    /// The first key in `block` must parse and list `email` on one of its
    /// identities.
    fn validate(&self, block: &str, email: &str) -> Result<()> {
        let keys = self.keyring.read_armored(block)?;
        let first = keys.first().ok_or_else(|| LookupError::BadKey {
            reason: "no keys in armored block".into(),
        })?;

        if !first.has_email(email) {
            debug!(
                identities = first.identities.len(),
                "no identity matches requested email"
            );
            return Err(LookupError::EmailMismatch {
                email: email.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use tracing_subscriber::fmt::MakeWriter;

    use super::*;
    use crate::core::errors::ErrorKind;
    use crate::core::models::armored_key::{BEGIN_MARKER, END_MARKER};
    use crate::core::models::identity::Identity;
    use crate::core::models::parsed_key::ParsedKey;

    const EMAIL: &str = "lookup.example@antontsv.github.io";
    const USER_ID: &str = "Go PGP Lookup example <lookup.example@antontsv.github.io>";
    const INDEX: &str =
        "<pre>pub 4096R/<a href=\"/pks/lookup?op=get&amp;search=0xA428256FF000508F\">F000508F</a>";

    fn key_page() -> String {
        format!("<html><pre>\n{BEGIN_MARKER}\n\nxsBNBFoV\n=z5uK\n{END_MARKER}\n</pre></html>")
    }

    /// Replays canned responses and records every request.
    #[derive(Default)]
    struct FakeTransport {
        responses: Mutex<VecDeque<Result<String>>>,
        requests: Mutex<Vec<QueryParams>>,
    }

    impl FakeTransport {
        fn replying(responses: Vec<Result<String>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::default(),
            }
        }

        fn requests(&self) -> Vec<QueryParams> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl Transport for FakeTransport {
        async fn get(&self, ctx: &LookupContext, params: &QueryParams) -> Result<String> {
            ctx.check()?;
            self.requests.lock().unwrap().push(params.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(LookupError::Transport {
                    reason: "no canned response".into(),
                }))
        }
    }

    /// Returns fixed keys, or a parse failure when `keys` is `None`.
    struct FakeKeyring {
        keys: Option<Vec<ParsedKey>>,
    }

    impl FakeKeyring {
        fn with_user_ids(user_ids: &[&str]) -> Self {
            Self {
                keys: Some(vec![ParsedKey {
                    identities: user_ids.iter().map(|u| Identity::from_user_id(u)).collect(),
                }]),
            }
        }
    }

    impl Keyring for FakeKeyring {
        fn read_armored(&self, armored: &str) -> Result<Vec<ParsedKey>> {
            assert!(armored.starts_with(BEGIN_MARKER));
            self.keys.clone().ok_or_else(|| LookupError::BadKey {
                reason: "unparseable".into(),
            })
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    fn service(
        responses: Vec<Result<String>>,
        keyring: FakeKeyring,
    ) -> KeyLookup<FakeTransport, FakeKeyring> {
        KeyLookup::with_parts(FakeTransport::replying(responses), keyring)
    }

    #[tokio::test]
    async fn returns_validated_block_verbatim() {
        let lookup = service(
            vec![Ok(INDEX.into()), Ok(key_page())],
            FakeKeyring::with_user_ids(&[USER_ID]),
        );

        let key = lookup
            .lookup(&LookupContext::background(), EMAIL)
            .await
            .unwrap();

        assert_eq!(
            key.as_str(),
            format!("{BEGIN_MARKER}\n\nxsBNBFoV\n=z5uK\n{END_MARKER}")
        );
    }

    #[tokio::test]
    async fn sends_index_then_exact_get() {
        let lookup = service(
            vec![Ok(INDEX.into()), Ok(key_page())],
            FakeKeyring::with_user_ids(&[USER_ID]),
        );
        lookup
            .lookup(&LookupContext::background(), EMAIL)
            .await
            .unwrap();

        let requests = lookup.transport().requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].get("op").unwrap(), "index");
        assert_eq!(requests[0].get("search").unwrap(), EMAIL);
        assert!(!requests[0].contains_key("exact"));
        assert_eq!(requests[1].get("op").unwrap(), "get");
        assert_eq!(requests[1].get("exact").unwrap(), "on");
        assert_eq!(requests[1].get("search").unwrap(), "0xA428256FF000508F");
    }

    #[tokio::test]
    async fn no_marker_stops_after_index() {
        let lookup = service(
            vec![Ok("<html>No results found</html>".into())],
            FakeKeyring::with_user_ids(&[USER_ID]),
        );
        let err = lookup
            .lookup(&LookupContext::background(), "something@non-existing.com")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(lookup.transport().requests().len(), 1);
    }

    #[tokio::test]
    async fn missing_armor_is_not_found() {
        let lookup = service(
            vec![Ok(INDEX.into()), Ok("<html>No key</html>".into())],
            FakeKeyring::with_user_ids(&[USER_ID]),
        );
        let err = lookup
            .lookup(&LookupContext::background(), EMAIL)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn unparseable_key_is_bad_key() {
        let lookup = service(
            vec![Ok(INDEX.into()), Ok(key_page())],
            FakeKeyring { keys: None },
        );
        let err = lookup
            .lookup(&LookupContext::background(), EMAIL)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedKey);
    }

    #[tokio::test]
    async fn empty_keyring_is_bad_key() {
        let lookup = service(
            vec![Ok(INDEX.into()), Ok(key_page())],
            FakeKeyring {
                keys: Some(Vec::new()),
            },
        );
        let err = lookup
            .lookup(&LookupContext::background(), EMAIL)
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::BadKey { .. }));
    }

    #[tokio::test]
    async fn other_identities_are_email_mismatch() {
        let lookup = service(
            vec![Ok(INDEX.into()), Ok(key_page())],
            FakeKeyring::with_user_ids(&[
                "Someone Else <someone@example.org>",
                "Lookup <LOOKUP.EXAMPLE@antontsv.github.io>",
            ]),
        );
        let err = lookup
            .lookup(&LookupContext::background(), EMAIL)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IdentityMismatch);
    }

    #[tokio::test]
    async fn only_first_key_is_checked() {
        let keyring = FakeKeyring {
            keys: Some(vec![
                ParsedKey {
                    identities: vec![Identity::from_user_id("Other <other@example.org>")],
                },
                ParsedKey {
                    identities: vec![Identity::from_user_id(USER_ID)],
                },
            ]),
        };
        let lookup = service(vec![Ok(INDEX.into()), Ok(key_page())], keyring);
        let err = lookup
            .lookup(&LookupContext::background(), EMAIL)
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::EmailMismatch { .. }));
    }

    #[tokio::test]
    async fn transport_failure_on_second_call_propagates() {
        let lookup = service(
            vec![
                Ok(INDEX.into()),
                Err(LookupError::HttpStatus { status: 502 }),
            ],
            FakeKeyring::with_user_ids(&[USER_ID]),
        );
        let err = lookup
            .lookup(&LookupContext::background(), EMAIL)
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::HttpStatus { status: 502 }));
    }

    #[tokio::test]
    async fn cancelled_context_makes_no_request() {
        let lookup = service(
            vec![Ok(INDEX.into()), Ok(key_page())],
            FakeKeyring::with_user_ids(&[USER_ID]),
        );
        let ctx = LookupContext::with_timeout(Duration::from_secs(5));
        ctx.cancel();

        let err = lookup.lookup(&ctx, EMAIL).await.unwrap_err();
        assert!(err.is_cancellation());
        assert!(lookup.transport().requests().is_empty());
    }

    /// Collects formatted log output in memory.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[tokio::test]
    async fn debug_logs_leave_out_email() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let lookup = service(
            vec![Ok(INDEX.into()), Ok(key_page())],
            FakeKeyring::with_user_ids(&[USER_ID]),
        );
        lookup
            .lookup(&LookupContext::background(), EMAIL)
            .await
            .unwrap();

        let output = logs.contents();
        assert!(output.contains("key validated"));
        assert!(!output.contains(EMAIL));
    }
}
