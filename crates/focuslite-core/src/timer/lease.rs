//! Cross-process ownership of a running countdown.
//!
//! Only the holder of the driver lease may tick. The lease lives in the
//! store under [`keys::DRIVER`], is renewed on every tick and may be taken
//! over once its heartbeat is older than [`LEASE_TTL_SECS`].

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::storage::{keys, KvStore};

/// Seconds without a heartbeat after which a lease is stale.
pub const LEASE_TTL_SECS: i64 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverLease {
    pub owner: String,
    pub heartbeat: DateTime<Utc>,
}

impl DriverLease {
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        now - self.heartbeat < Duration::seconds(LEASE_TTL_SECS)
    }
}

/// Raw stored text plus the decoded lease. Undecodable text counts as no lease.
fn current<S: KvStore + ?Sized>(store: &S) -> Result<(Option<String>, Option<DriverLease>)> {
    let raw = store.get_raw(keys::DRIVER)?;
    let lease = raw
        .as_deref()
        .and_then(|raw| serde_json::from_str::<Option<DriverLease>>(raw).ok())
        .flatten();
    Ok((raw, lease))
}

/// The live lease holder, if any.
pub fn holder<S: KvStore + ?Sized>(store: &S, now: DateTime<Utc>) -> Result<Option<DriverLease>> {
    Ok(current(store)?.1.filter(|lease| lease.is_live(now)))
}

/// Claim or renew the lease for `owner`.
///
/// Returns `false` when another owner holds a live lease or wins the race
/// for it.
pub fn claim<S: KvStore + ?Sized>(store: &S, owner: &str, now: DateTime<Utc>) -> Result<bool> {
    let (raw, lease) = current(store)?;
    if let Some(lease) = &lease {
        if lease.owner != owner && lease.is_live(now) {
            return Ok(false);
        }
    }
    let next = serde_json::to_string(&DriverLease {
        owner: owner.to_string(),
        heartbeat: now,
    })?;
    store.compare_and_set_raw(keys::DRIVER, raw.as_deref(), &next)
}

/// Drop the lease if `owner` still holds it.
pub fn release<S: KvStore + ?Sized>(store: &S, owner: &str) -> Result<()> {
    let (raw, lease) = current(store)?;
    if lease.is_some_and(|lease| lease.owner == owner) {
        store.compare_and_set_raw(keys::DRIVER, raw.as_deref(), "null")?;
    }
    Ok(())
}
