use std::fmt::{Debug, Display};
use std::hash::Hash;

use uuid::Uuid;

/// Namespace under which non-UUID functional keys are hashed into stream ids.
///
/// Fixed for the lifetime of the system: changing it would re-key every
/// aggregate whose id is derived rather than intrinsic.
pub const KEY_NAMESPACE: Uuid = Uuid::from_u128(0xa5f1_c1d4_93a7_4bd6_8a1e_6f2c_0c8b_9d3e);

/// A functional key identifying one aggregate instance.
///
/// Keys are immutable value objects: equality and hashing must agree, and the
/// `Display` form must be stable because it feeds the stream-id derivation for
/// keys that are not themselves UUIDs.
pub trait FunctionalKey: Clone + Eq + Hash + Display + Debug + Send + Sync + 'static {
    /// Returns the key's intrinsic UUID, when the key is itself globally
    /// unique. Keys without one derive their stream id via
    /// [`stream_id_for`].
    fn unique_id(&self) -> Option<Uuid> {
        None
    }
}

impl FunctionalKey for Uuid {
    fn unique_id(&self) -> Option<Uuid> {
        Some(*self)
    }
}

impl FunctionalKey for String {}

/// Derives the stream id for an aggregate of kind `kind` addressed by `key`.
///
/// A key with an intrinsic UUID is used as-is. Any other key is combined with
/// the aggregate kind and hashed under [`KEY_NAMESPACE`], so equal keys owned
/// by different aggregate kinds still map to distinct streams, and repeated
/// calls always produce the same id.
pub fn stream_id_for<K: FunctionalKey>(kind: &str, key: &K) -> Uuid {
    match key.unique_id() {
        Some(id) => id,
        None => Uuid::new_v5(&KEY_NAMESPACE, format!("{kind}_{key}").as_bytes()),
    }
}
