//! Tracing-backed notification sink.

use async_trait::async_trait;
use civdraft_core::session::{NotificationSink, SessionEvent};

/// A [`NotificationSink`] that logs every event through `tracing`.
///
/// Useful as the default sink when no presentation layer is attached;
/// real deployments forward events to their messaging surface instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotificationSink;

#[async_trait]
impl NotificationSink for TracingNotificationSink {
    async fn publish(&self, event: SessionEvent) {
        match &event {
            SessionEvent::PhaseAdvanced { session_id, from, to } => {
                tracing::info!(session = %session_id, %from, %to, "phase advanced");
            }
            SessionEvent::ResolutionComputed { session_id, settings } => {
                tracing::info!(
                    session = %session_id,
                    categories = settings.len(),
                    "ruleset resolved"
                );
            }
            SessionEvent::AllocationFailed { session_id, reason } => {
                tracing::warn!(session = %session_id, %reason, "pool allocation failed");
            }
        }
    }
}
