//! # Notification Sinks
//!
//! Fire-and-forget event emission on confirmed transitions.
//!
//! Delivery failure must never roll back the transition that produced
//! the event; callers log a warning and move on. The tracing sink is
//! always available; a NATS sink ships behind the `nats` feature.

use crate::domain::events::SettlementEvent;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for notification delivery.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Event serialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Transport-level publish failure.
    #[error("publish error: {0}")]
    Publish(String),
}

impl NotifyError {
    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Creates a publish error.
    #[must_use]
    pub fn publish(msg: impl Into<String>) -> Self {
        Self::Publish(msg.into())
    }
}

/// Result type for notification operations.
pub type NotifyResult<T> = Result<T, NotifyError>;

/// Port for publishing settlement events.
#[async_trait]
pub trait NotificationSink: Send + Sync + fmt::Debug {
    /// Publishes an event.
    ///
    /// # Errors
    ///
    /// Returns an error on delivery failure; callers treat this as
    /// advisory and never roll back the underlying transition.
    async fn publish(&self, event: &SettlementEvent) -> NotifyResult<()>;
}

/// Sink that emits events as structured log records.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotificationSink;

impl TracingNotificationSink {
    /// Creates a tracing sink.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationSink for TracingNotificationSink {
    async fn publish(&self, event: &SettlementEvent) -> NotifyResult<()> {
        let payload = serde_json::to_string(event)
            .map_err(|e| NotifyError::serialization(e.to_string()))?;
        tracing::info!(
            event = event.event_name(),
            asset_id = ?event.as_domain_event().asset_id(),
            %payload,
            "settlement event"
        );
        Ok(())
    }
}

/// Sink that publishes events to NATS subjects.
///
/// Subjects are `<prefix>.<EventName>`, payloads are JSON.
#[cfg(feature = "nats")]
#[derive(Debug, Clone)]
pub struct NatsNotificationSink {
    client: async_nats::Client,
    subject_prefix: String,
}

#[cfg(feature = "nats")]
impl NatsNotificationSink {
    /// Creates a NATS sink with the given subject prefix.
    #[must_use]
    pub fn new(client: async_nats::Client, subject_prefix: impl Into<String>) -> Self {
        Self {
            client,
            subject_prefix: subject_prefix.into(),
        }
    }
}

#[cfg(feature = "nats")]
#[async_trait]
impl NotificationSink for NatsNotificationSink {
    async fn publish(&self, event: &SettlementEvent) -> NotifyResult<()> {
        let subject = format!("{}.{}", self.subject_prefix, event.event_name());
        let payload = serde_json::to_vec(event)
            .map_err(|e| NotifyError::serialization(e.to_string()))?;
        self.client
            .publish(subject, payload.into())
            .await
            .map_err(|e| NotifyError::publish(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::events::asset_events::{AssetCancelled, AssetEvent};
    use crate::domain::value_objects::AssetId;

    #[tokio::test]
    async fn tracing_sink_accepts_events() {
        let sink = TracingNotificationSink::new();
        let event: SettlementEvent =
            AssetEvent::Cancelled(AssetCancelled::new(AssetId::new(1))).into();
        sink.publish(&event).await.unwrap();
    }
}
