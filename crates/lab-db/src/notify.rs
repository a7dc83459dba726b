//! Notification collaborator.
//!
//! The engine hands a [`Notification`] to a [`Notifier`] after a decision has
//! committed. Delivery is fire-and-forget: a failure is logged and the
//! transition stands.

use lab_core::entities::{Notification, ResearchSubmission};
use lab_core::enums::Decision;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error)]
pub enum NotifyError {
    /// The receiving side of a channel notifier has been dropped.
    #[error("notification channel closed")]
    Closed,

    /// The channel buffer is full.
    #[error("notification channel full")]
    Full,
}

/// Sink for post-transition notifications. Must not block.
pub trait Notifier: Send + Sync {
    /// Hand off one notification.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError` if the notification could not be queued.
    fn notify(&self, notification: Notification) -> Result<(), NotifyError>;
}

/// Default notifier: writes each notification to the tracing log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) -> Result<(), NotifyError> {
        tracing::info!(
            recipient = %notification.recipient_id,
            title = %notification.title,
            "notification: {}",
            notification.body
        );
        Ok(())
    }
}

/// Forwards notifications into a bounded tokio channel for an external
/// delivery worker.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::Sender<Notification>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiver its notifications arrive on.
    #[must_use]
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Notification>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) -> Result<(), NotifyError> {
        self.sender.try_send(notification).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => NotifyError::Full,
            mpsc::error::TrySendError::Closed(_) => NotifyError::Closed,
        })
    }
}

/// Build the owner-facing message for a committed decision.
#[must_use]
pub fn decision_notification(research: &ResearchSubmission, decision: Decision) -> Notification {
    let (title, verb) = match decision {
        Decision::Approved => ("Research approved", "approved"),
        Decision::Disapproved => ("Research disapproved", "disapproved"),
    };
    Notification {
        recipient_id: research.owner_id.clone(),
        title: title.to_string(),
        body: format!("Your research \"{}\" has been {verb}.", research.title),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use lab_core::enums::ResearchStatus;
    use pretty_assertions::assert_eq;

    use super::*;

    fn research() -> ResearchSubmission {
        ResearchSubmission {
            id: "res-00000001".into(),
            owner_id: "usr-owner".into(),
            title: "Soil microbiomes".into(),
            abstract_text: None,
            status: ResearchStatus::Approved,
            publication_date: Some(Utc::now()),
            views: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn decision_message_goes_to_owner() {
        let n = decision_notification(&research(), Decision::Disapproved);
        assert_eq!(n.recipient_id, "usr-owner");
        assert_eq!(n.title, "Research disapproved");
        assert_eq!(n.body, "Your research \"Soil microbiomes\" has been disapproved.");
    }

    #[tokio::test]
    async fn channel_notifier_delivers() {
        let (notifier, mut rx) = ChannelNotifier::channel(4);
        notifier
            .notify(decision_notification(&research(), Decision::Approved))
            .unwrap();
        let received = rx.recv().await.unwrap();
        assert_eq!(received.title, "Research approved");
    }

    #[test]
    fn channel_notifier_reports_closed_and_full() {
        let (notifier, rx) = ChannelNotifier::channel(1);
        notifier
            .notify(decision_notification(&research(), Decision::Approved))
            .unwrap();
        assert!(matches!(
            notifier.notify(decision_notification(&research(), Decision::Approved)),
            Err(NotifyError::Full)
        ));
        drop(rx);
        assert!(matches!(
            notifier.notify(decision_notification(&research(), Decision::Approved)),
            Err(NotifyError::Closed)
        ));
    }

    #[test]
    fn tracing_notifier_never_fails() {
        assert!(
            TracingNotifier
                .notify(decision_notification(&research(), Decision::Approved))
                .is_ok()
        );
    }
}
