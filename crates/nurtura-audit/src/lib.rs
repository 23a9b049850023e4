//! nurtura-audit
//!
//! Structured audit events for clinically-relevant actions.

pub mod events;

pub use events::AuditEvent;
