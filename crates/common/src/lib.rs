//! Shared key plumbing for the event-sourcing system.
//!
//! Aggregates are addressed by functional keys chosen by the domain (a UUID,
//! a natural string key, or a dedicated newtype). This crate defines the
//! [`FunctionalKey`] contract and the deterministic derivation of stream ids
//! from keys.

pub mod keys;

pub use keys::{FunctionalKey, KEY_NAMESPACE, stream_id_for};
