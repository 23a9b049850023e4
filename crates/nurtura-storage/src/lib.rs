//! nurtura-storage
//!
//! S3-backed persistence for the cascade engine. Records are JSON objects
//! at the canonical keys defined in `nurtura_core::keys`; create-once
//! semantics come from `If-None-Match` conditional PUTs, which is how the
//! engine's at-most-once generation guarantees survive concurrent
//! writers.

pub mod error;
pub mod objects;
pub mod state;
pub mod store;

pub use error::StorageError;
pub use store::S3Store;
