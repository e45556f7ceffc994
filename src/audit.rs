use serde_json::Value;
use uuid::Uuid;

use crate::error::AppResult;

/// Emits a structured audit event on the `audit` target.
pub fn log_audit(
    actor: Option<Uuid>,
    action: &str,
    resource: Option<&str>,
    metadata: Option<Value>,
) -> AppResult<()> {
    let metadata = metadata
        .map(|value| serde_json::to_string(&value))
        .transpose()
        .map_err(anyhow::Error::from)?;

    tracing::info!(
        target: "audit",
        actor = ?actor,
        action,
        resource = resource.unwrap_or("-"),
        metadata = metadata.as_deref().unwrap_or("{}"),
        "audit"
    );
    Ok(())
}

/// Records an audit event; a failure is logged and never surfaced.
pub fn record(actor: Option<Uuid>, action: &str, resource: &str, metadata: Value) {
    if let Err(err) = log_audit(actor, action, Some(resource), Some(metadata)) {
        tracing::warn!(error = %err, "audit log failed");
    }
}
