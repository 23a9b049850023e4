use serde::Serialize;
use tracing::info;

/// A structured audit event for report-generation and review actions.
///
/// Events are logged via `tracing` so they land in the log pipeline next
/// to the engine's operational logs. The `actor` follows the system
/// convention (`system:pool_summary:{pool_id}`, `system:final_report:{child_id}`)
/// for automatic triggers, or the reviewer's subject for sign-offs.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub action: String,
    pub resource_type: String,
    pub resource_id: String,
    pub actor: String,
    pub outcome: String,
    pub details: Option<serde_json::Value>,
}

impl AuditEvent {
    pub fn new(
        action: impl Into<String>,
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
        actor: impl Into<String>,
    ) -> Self {
        Self {
            action: action.into(),
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
            actor: actor.into(),
            outcome: "success".to_string(),
            details: None,
        }
    }

    pub fn failed(mut self, error: impl std::fmt::Display) -> Self {
        self.outcome = "failure".to_string();
        self.details = Some(serde_json::json!({ "error": error.to_string() }));
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Emit this audit event via tracing.
    pub fn emit(&self) {
        info!(
            audit.action = %self.action,
            audit.resource_type = %self.resource_type,
            audit.resource_id = %self.resource_id,
            audit.actor = %self.actor,
            audit.outcome = %self.outcome,
            "audit event"
        );
    }
}
