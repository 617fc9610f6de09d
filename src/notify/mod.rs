// src/notify/mod.rs

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::models::Complaint;

// ─────────────────────────────────────────────────────────────────────────────
// Contract
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("invalid destination address: {0}")]
    InvalidAddress(String),

    #[error("transport failure: {0}")]
    Transport(String),
}

/// One outbound message to a citizen's contact address.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub delivery_id: Uuid,
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Notification {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            delivery_id: Uuid::new_v4(),
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}

#[async_trait]
pub trait NotificationTransport: Send + Sync {
    async fn deliver(&self, note: &Notification) -> Result<(), NotificationError>;
}

pub fn check_address(to: &str) -> Result<(), NotificationError> {
    let ok = !to.contains(char::is_whitespace)
        && match to.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && domain
                        .rsplit_once('.')
                        .map_or(false, |(host, tld)| !host.is_empty() && !tld.is_empty())
            }
            None => false,
        };
    if ok {
        Ok(())
    } else {
        Err(NotificationError::InvalidAddress(to.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Transports
// ─────────────────────────────────────────────────────────────────────────────

const SIMULATED_LATENCY: Duration = Duration::from_millis(500);

/// Local stand-in for a real mail provider: validates the address, waits a
/// fixed simulated latency, logs the message.
pub struct LogTransport;

#[async_trait]
impl NotificationTransport for LogTransport {
    async fn deliver(&self, note: &Notification) -> Result<(), NotificationError> {
        check_address(&note.to)?;
        tokio::time::sleep(SIMULATED_LATENCY).await;
        info!(
            delivery_id = %note.delivery_id,
            to = %note.to,
            subject = %note.subject,
            "email notification sent"
        );
        Ok(())
    }
}

/// POSTs the (to, subject, body) triple as JSON to a configured hook, for
/// deployments that bridge to a real mail sender.
pub struct WebhookTransport {
    url: String,
    client: reqwest::Client,
}

impl WebhookTransport {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl NotificationTransport for WebhookTransport {
    async fn deliver(&self, note: &Notification) -> Result<(), NotificationError> {
        check_address(&note.to)?;
        self.client
            .post(&self.url)
            .json(note)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| NotificationError::Transport(e.to_string()))?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Dispatch queue
// ─────────────────────────────────────────────────────────────────────────────

/// Fire-and-forget handle the store enqueues on. Mutations never await
/// delivery; the dispatcher drains the queue on its own task.
#[derive(Clone)]
pub struct NotificationQueue {
    tx: UnboundedSender<Notification>,
}

impl NotificationQueue {
    pub fn channel() -> (Self, UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn enqueue(&self, note: Notification) {
        if self.tx.send(note).is_err() {
            warn!("notification dispatcher is gone, dropping message");
        }
    }
}

const RETRY_DELAY: Duration = Duration::from_secs(2);

async fn deliver_with_retry(transport: &dyn NotificationTransport, note: &Notification) {
    match transport.deliver(note).await {
        Ok(()) => {}
        Err(NotificationError::InvalidAddress(addr)) => {
            warn!(delivery_id = %note.delivery_id, %addr, "notification dropped: invalid address");
        }
        Err(e) => {
            warn!(delivery_id = %note.delivery_id, error = %e, "delivery failed, retrying once");
            tokio::time::sleep(RETRY_DELAY).await;
            if let Err(e) = transport.deliver(note).await {
                error!(delivery_id = %note.delivery_id, error = %e, "delivery failed after retry, dropping");
            }
        }
    }
}

/// Drains the queue until every sender is gone. A failed delivery is retried
/// once after a short delay; a second failure is logged and the message
/// dropped.
pub fn spawn_dispatcher(
    mut rx: UnboundedReceiver<Notification>,
    transport: Arc<dyn NotificationTransport>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(note) = rx.recv().await {
            deliver_with_retry(transport.as_ref(), &note).await;
        }
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Message templates
// ─────────────────────────────────────────────────────────────────────────────

pub fn registration(c: &Complaint) -> Notification {
    Notification::new(
        &c.email,
        format!("Your complaint has been registered [{}]", c.id),
        format!(
            "Dear {},\n\nYour complaint regarding \"{}\" has been successfully registered \
             with ID: {}.\n\nYou can check the status of your complaint using this ID.\n\n\
             Thank you for your feedback.",
            c.citizen_name, c.subject, c.id
        ),
    )
}

pub fn status_update(c: &Complaint, response: Option<&str>) -> Notification {
    let staff_note = match response {
        Some(msg) => format!("Staff response: {msg}\n\n"),
        None => String::new(),
    };
    Notification::new(
        &c.email,
        format!("Status update for your complaint [{}]", c.id),
        format!(
            "Dear {},\n\nThe status of your complaint regarding \"{}\" (ID: {}) has been \
             updated to: {}.\n\n{}Thank you for your patience.",
            c.citizen_name,
            c.subject,
            c.id,
            c.status.as_str().to_uppercase(),
            staff_note
        ),
    )
}

pub fn new_response(c: &Complaint, message: &str) -> Notification {
    Notification::new(
        &c.email,
        format!("New response to your complaint [{}]", c.id),
        format!(
            "Dear {},\n\nA new response has been added to your complaint regarding \"{}\" \
             (ID: {}):\n\n\"{}\"\n\nThank you for your patience.",
            c.citizen_name, c.subject, c.id, message
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn address_check_accepts_plain_emails() {
        assert!(check_address("a@b.com").is_ok());
        assert!(check_address("citizen.name@city.gov.example").is_ok());
    }

    #[test]
    fn address_check_rejects_malformed_addresses() {
        for bad in ["", "no-at-sign", "@missing.local", "user@nodot", "spaced user@b.com"] {
            assert!(
                matches!(check_address(bad), Err(NotificationError::InvalidAddress(_))),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn log_transport_resolves_for_valid_address() {
        let note = Notification::new("a@b.com", "subject", "body");
        assert!(LogTransport.deliver(&note).await.is_ok());
    }

    struct FlakyTransport {
        attempts: AtomicUsize,
    }

    #[async_trait]
    impl NotificationTransport for FlakyTransport {
        async fn deliver(&self, _note: &Notification) -> Result<(), NotificationError> {
            if self.attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(NotificationError::Transport("connection reset".into()))
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failure_is_retried_once() {
        let transport = FlakyTransport {
            attempts: AtomicUsize::new(0),
        };
        let note = Notification::new("a@b.com", "subject", "body");

        deliver_with_retry(&transport, &note).await;

        assert_eq!(transport.attempts.load(Ordering::SeqCst), 2);
    }

    struct CountingTransport {
        attempts: AtomicUsize,
    }

    #[async_trait]
    impl NotificationTransport for CountingTransport {
        async fn deliver(&self, note: &Notification) -> Result<(), NotificationError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            check_address(&note.to)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_address_is_not_retried() {
        let transport = CountingTransport {
            attempts: AtomicUsize::new(0),
        };
        let note = Notification::new("not-an-address", "subject", "body");

        deliver_with_retry(&transport, &note).await;

        assert_eq!(transport.attempts.load(Ordering::SeqCst), 1);
    }
}
