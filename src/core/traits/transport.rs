use std::collections::BTreeMap;
use std::future::Future;

use crate::core::errors::Result;
use crate::core::models::lookup_context::LookupContext;

/// Query parameters for one keyserver request (`op`, `search`, `exact`).
///
/// Ordered by name so the encoded query string is stable.
pub type QueryParams = BTreeMap<&'static str, String>;

/// Port for fetching text from the keyserver's lookup endpoint.
///
/// Implementations live in `adapters::transport`. One instance is shared
/// by every lookup made through a `KeyLookup`, so it must be usable from
/// several tasks at once.
pub trait Transport: Send + Sync {
    /// Issue a GET with `params` and return the (possibly truncated) body.
    ///
    /// Must give up with a cancellation error as soon as `ctx` is cancelled
    /// or its deadline passes.
    fn get(
        &self,
        ctx: &LookupContext,
        params: &QueryParams,
    ) -> impl Future<Output = Result<String>> + Send;
}
