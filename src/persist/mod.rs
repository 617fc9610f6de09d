// src/persist/mod.rs

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;

use crate::models::Complaint;

/// Fixed storage name; snapshots written under it reload as-is at startup.
pub const DEFAULT_DATA_FILE: &str = "complaint-storage.json";

/// Narrow persistence seam for the complaint collection. The store itself is
/// storage-agnostic: production snapshots to a JSON file, tests plug in a
/// no-op.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Reload the last snapshot, or `None` when nothing was persisted yet.
    async fn load(&self) -> anyhow::Result<Option<Vec<Complaint>>>;

    /// Replace the snapshot with the current collection.
    async fn save(&self, complaints: &[Complaint]) -> anyhow::Result<()>;
}

/// Whole-collection JSON snapshot under one file. No migration logic: the
/// on-disk shape is exactly the serialized complaint list.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotStore for JsonFileStore {
    async fn load(&self) -> anyhow::Result<Option<Vec<Complaint>>> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, complaints: &[Complaint]) -> anyhow::Result<()> {
        let bytes = serde_json::to_vec_pretty(complaints)?;
        fs::write(&self.path, bytes).await?;
        Ok(())
    }
}

/// Keeps nothing. Used where durability is irrelevant.
#[cfg(test)]
pub struct NullStore;

#[cfg(test)]
#[async_trait]
impl SnapshotStore for NullStore {
    async fn load(&self) -> anyhow::Result<Option<Vec<Complaint>>> {
        Ok(None)
    }

    async fn save(&self, _complaints: &[Complaint]) -> anyhow::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ComplaintStatus, Department};
    use chrono::Utc;

    fn sample() -> Complaint {
        let now = Utc::now();
        Complaint {
            id: "CMP-123456-007".into(),
            citizen_name: "Jane Citizen".into(),
            email: "jane@example.com".into(),
            phone: Some("5551234567".into()),
            department: Department::Water,
            subject: "No water pressure".into(),
            description: "There has been no water pressure on Elm Street since Monday morning.".into(),
            location: Some("Elm Street".into()),
            status: ComplaintStatus::Pending,
            created_at: now,
            updated_at: now,
            response_message: None,
            responses: Vec::new(),
            assigned_to: None,
        }
    }

    #[tokio::test]
    async fn missing_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("complaint-storage.json"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn reload_reconstructs_records() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("complaint-storage.json"));

        store.save(&[sample()]).await.unwrap();
        let loaded = store.load().await.unwrap().unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "CMP-123456-007");
        assert_eq!(loaded[0].department, Department::Water);
        assert_eq!(loaded[0].status, ComplaintStatus::Pending);
        assert!(loaded[0].responses.is_empty());
    }

    #[tokio::test]
    async fn old_snapshots_without_history_still_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("complaint-storage.json");

        // Serialized before the `responses` field existed.
        let legacy = serde_json::json!([{
            "id": "CMP-654321-042",
            "citizenName": "Old Record",
            "email": "old@example.com",
            "phone": null,
            "department": "roads",
            "subject": "Pothole",
            "description": "A pothole that predates the response history field entirely.",
            "location": null,
            "status": "resolved",
            "createdAt": "2024-11-02T08:30:00Z",
            "updatedAt": "2024-11-04T16:45:00Z",
            "responseMessage": "Patched.",
            "assignedTo": "2"
        }]);
        tokio::fs::write(&path, serde_json::to_vec(&legacy).unwrap()).await.unwrap();

        let store = JsonFileStore::new(path);
        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded[0].status, ComplaintStatus::Resolved);
        assert_eq!(loaded[0].response_message.as_deref(), Some("Patched."));
        assert!(loaded[0].responses.is_empty());
    }
}
