// src/store/mod.rs

pub mod ticket;

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::{Complaint, ComplaintStatus, Department, NewComplaint, ResponseEntry};
use crate::notify::{self, NotificationQueue};
use crate::persist::SnapshotStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("complaint not found: {0}")]
    NotFound(String),

    #[error("illegal status transition: {from} -> {to}")]
    IllegalTransition {
        from: ComplaintStatus,
        to: ComplaintStatus,
    },

    #[error("failed to persist snapshot: {0}")]
    Persist(#[from] anyhow::Error),
}

/// Authoritative owner of the complaint collection. Every mutation applies
/// under the write lock, persists the snapshot before the lock is released,
/// and only then queues the citizen notification. Nothing else mutates the
/// collection.
pub struct ComplaintStore {
    complaints: RwLock<Vec<Complaint>>,
    persist: Arc<dyn SnapshotStore>,
    queue: NotificationQueue,
}

impl ComplaintStore {
    /// Reload the persisted snapshot (if any) and take ownership of it.
    pub async fn open(
        persist: Arc<dyn SnapshotStore>,
        queue: NotificationQueue,
    ) -> anyhow::Result<Self> {
        let complaints = persist.load().await?.unwrap_or_default();
        debug!(count = complaints.len(), "complaint store loaded");
        Ok(Self {
            complaints: RwLock::new(complaints),
            persist,
            queue,
        })
    }

    /// Register a new complaint: assign a ticket id, stamp both timestamps
    /// with the same instant, persist, then queue the confirmation email.
    /// Input arrives pre-validated from the handler layer.
    pub async fn create(&self, input: NewComplaint) -> Result<Complaint, StoreError> {
        let now = Utc::now();
        let mut guard = self.complaints.write().await;

        // The generator is not collision-free within one millisecond window.
        let id = loop {
            let candidate = ticket::generate_ticket_id();
            if !guard.iter().any(|c| c.id == candidate) {
                break candidate;
            }
        };

        let complaint = Complaint {
            id,
            citizen_name: input.citizen_name,
            email: input.email,
            phone: input.phone,
            department: input.department,
            subject: input.subject,
            description: input.description,
            location: input.location,
            status: ComplaintStatus::Pending,
            created_at: now,
            updated_at: now,
            response_message: None,
            responses: Vec::new(),
            assigned_to: None,
        };
        guard.push(complaint.clone());
        self.persist.save(&guard).await?;
        drop(guard);

        self.queue.enqueue(notify::registration(&complaint));
        Ok(complaint)
    }

    /// Pure lookup, no side effects.
    pub async fn get_by_id(&self, id: &str) -> Option<Complaint> {
        self.complaints
            .read()
            .await
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }

    /// Move a complaint through the status workflow, optionally recording a
    /// staff response with the change. Illegal transitions are rejected
    /// before anything mutates; the citizen is notified after the snapshot
    /// is durably applied.
    pub async fn update_status(
        &self,
        id: &str,
        new_status: ComplaintStatus,
        response_message: Option<String>,
        author: Option<String>,
    ) -> Result<Complaint, StoreError> {
        let mut guard = self.complaints.write().await;
        let complaint = guard
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if !complaint.status.can_transition_to(new_status) {
            return Err(StoreError::IllegalTransition {
                from: complaint.status,
                to: new_status,
            });
        }

        complaint.status = new_status;
        complaint.updated_at = Utc::now();
        if let Some(message) = response_message.clone() {
            record_response(complaint, message, author);
        }
        let updated = complaint.clone();

        self.persist.save(&guard).await?;
        drop(guard);

        self.queue
            .enqueue(notify::status_update(&updated, response_message.as_deref()));
        Ok(updated)
    }

    /// Record a staff response without touching the status. The latest
    /// message is what citizens see; the full history stays on the record.
    pub async fn add_response(
        &self,
        id: &str,
        message: String,
        author: Option<String>,
    ) -> Result<Complaint, StoreError> {
        let mut guard = self.complaints.write().await;
        let complaint = guard
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        complaint.updated_at = Utc::now();
        record_response(complaint, message.clone(), author);
        let updated = complaint.clone();

        self.persist.save(&guard).await?;
        drop(guard);

        self.queue.enqueue(notify::new_response(&updated, &message));
        Ok(updated)
    }

    /// Route a complaint to a staff member. No notification side effect.
    pub async fn assign(&self, id: &str, staff_id: String) -> Result<Complaint, StoreError> {
        let mut guard = self.complaints.write().await;
        let complaint = guard
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        complaint.assigned_to = Some(staff_id);
        complaint.updated_at = Utc::now();
        let updated = complaint.clone();

        self.persist.save(&guard).await?;
        Ok(updated)
    }

    pub async fn list_by_department(&self, department: Department) -> Vec<Complaint> {
        self.complaints
            .read()
            .await
            .iter()
            .filter(|c| c.department == department)
            .cloned()
            .collect()
    }

    pub async fn list_by_status(&self, status: ComplaintStatus) -> Vec<Complaint> {
        self.complaints
            .read()
            .await
            .iter()
            .filter(|c| c.status == status)
            .cloned()
            .collect()
    }

    /// Snapshot of the whole collection for the read-side projections.
    pub async fn all(&self) -> Vec<Complaint> {
        self.complaints.read().await.clone()
    }
}

fn record_response(complaint: &mut Complaint, message: String, author: Option<String>) {
    complaint.response_message = Some(message.clone());
    complaint.responses.push(ResponseEntry {
        timestamp: complaint.updated_at,
        author,
        message,
    });
}
