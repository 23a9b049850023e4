//! nurtura-catalog
//!
//! Tenant-wide assessment configuration. Pure data — no AWS dependency.
//! Defines the pool/section/question hierarchy, the age-window
//! applicability filter, and the score-aggregation rules up to the
//! weighted concern index.

pub mod applicability;
pub mod catalog;
pub mod error;
pub mod scoring;

pub use catalog::{Catalog, Pool, Question, Section};
pub use error::CatalogError;
